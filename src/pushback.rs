// Pushback buffer (C1)
//
// A LIFO byte stack with lazy fallback to standard input. Every expansion
// product the engine produces is unread here so the tokenizer rescans it -
// this buffer is the mechanism that makes m4-style rescanning work at all.
//
// Modeled on the teacher's FileHandle::get_line line-buffered reader
// (files.rs), generalized from line-at-a-time String reads to a byte-level
// stack that can be pushed onto mid-stream.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{M4Error, M4Result};

pub struct Pushback {
    // stack[0] is the bottom; the last element is read next. Pushing a
    // string therefore happens in reverse, so that popping yields the
    // string's bytes in original left-to-right order.
    stack: Vec<u8>,
    stdin_enabled: bool,
}

impl Pushback {
    pub fn new(stdin_enabled: bool) -> Pushback {
        Pushback {
            stack: Vec::new(),
            stdin_enabled,
        }
    }

    /// read pops one byte, falling back to stdin when the stack is empty
    /// and stdin reads are enabled.
    pub fn read(&mut self) -> M4Result<Option<u8>> {
        if let Some(b) = self.stack.pop() {
            return Ok(Some(b));
        }
        if !self.stdin_enabled {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        match io::stdin().read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) => Err(M4Error::Io(e, "reading standard input")),
        }
    }

    pub fn unread(&mut self, byte: u8) {
        self.stack.push(byte);
    }

    /// unread_str pushes bytes in reverse so a subsequent left-to-right
    /// sequence of reads reproduces `s` in its original order.
    pub fn unread_str(&mut self, s: &[u8]) {
        self.stack.extend(s.iter().rev());
    }

    /// prepend_file loads a file's contents so they are read, in file
    /// order, before anything currently buffered.
    pub fn prepend_file(&mut self, path: &Path) -> M4Result<()> {
        let contents =
            fs::read(path).map_err(|e| M4Error::Io(e, "reading include/command-line file"))?;
        self.unread_str(&contents);
        Ok(())
    }

    pub fn is_empty_and_stdin_disabled(&self) -> bool {
        self.stack.is_empty() && !self.stdin_enabled
    }
}
