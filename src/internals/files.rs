// File-path builtins (C7)
//
// Grounded in the teacher's files.rs, which handled on-disk file access
// for the Forth reader (FileHandle, get_line). Generalized here to the
// handful of m4 builtins that touch the filesystem or the platform path
// convention directly, rather than going through the pushback buffer's
// own prepend_file (used for include and for files named on the command
// line).

use std::path::PathBuf;

use crate::engine::Engine;
use crate::error::M4Result;

impl Engine {
    /// include(path) - insert file contents into the pushback buffer so
    /// they are read next, in file order; fatal on I/O error.
    pub fn bi_include(&mut self, args: &[&[u8]]) -> M4Result<()> {
        let path = args.first().copied().unwrap_or(b"");
        let path = PathBuf::from(String::from_utf8_lossy(path).into_owned());
        self.pushback.prepend_file(&path)
    }

    /// maketemp(template) - generate a unique name from template, per the
    /// 'X'-suffix convention: each trailing 'X' is replaced with a digit
    /// derived from the process id so concurrent processes do not collide.
    pub fn bi_maketemp(&mut self, args: &[&[u8]]) -> M4Result<Vec<u8>> {
        let template = args.first().copied().unwrap_or(b"");
        let trailing_x = template.iter().rev().take_while(|&&b| b == b'X').count();
        if trailing_x == 0 {
            return Ok(template.to_vec());
        }
        let prefix_len = template.len() - trailing_x;
        let mut out = template[..prefix_len].to_vec();
        let pid = std::process::id();
        let digits = format!("{pid:0width$}", width = trailing_x);
        let digits = &digits[digits.len().saturating_sub(trailing_x)..];
        out.extend_from_slice(digits.as_bytes());
        Ok(out)
    }
}

/// dirsep - platform path separator as text.
pub fn dirsep() -> &'static [u8] {
    if cfg!(windows) {
        b"\\"
    } else {
        b"/"
    }
}
