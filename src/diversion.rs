// Diversion set (C5)
//
// Eleven output buffers: numbered 0..9 plus a discard sink at -1.
// Grounded in the teacher's FileHandle/FType buffered-I/O pattern
// (internals/files.rs), generalized from on-disk files to in-memory
// byte buffers multiplexed by a single "current" pointer.
//
// undivert is a buffer-to-buffer copy only - it never touches real
// output itself. Whatever lands in buffer 0 as a result reaches the
// terminal through the same opportunistic flush (flush_diversion_zero)
// and end-of-run flush (finalize) that ordinary diversion-0 writes do,
// so callers never need to know whether a byte arrived there directly
// or via undivert.

use std::io::Write;

use crate::error::{M4Error, M4Result};

pub struct Diversions {
    buffers: [Vec<u8>; 10],
    sink: Vec<u8>,
    current: i8,
}

impl Diversions {
    pub fn new() -> Diversions {
        Diversions {
            buffers: Default::default(),
            sink: Vec::new(),
            current: 0,
        }
    }

    pub fn current(&self) -> i8 {
        self.current
    }

    /// divert sets the current output target. n must be in -1..=9;
    /// callers validate the decimal/"-1" text form before calling this.
    pub fn divert(&mut self, n: i8) {
        debug_assert!((-1..=9).contains(&n));
        self.current = n;
    }

    /// write appends to whichever buffer is current, or discards it if
    /// current is the sink.
    pub fn write(&mut self, bytes: &[u8]) {
        if self.current == -1 {
            self.sink.extend_from_slice(bytes);
            return;
        }
        self.buffers[self.current as usize].extend_from_slice(bytes);
    }

    /// flush_diversion_zero drains diversion 0 to real output immediately
    /// - this supports interactive use without waiting for end of input.
    pub fn flush_diversion_zero(&mut self, out: &mut impl Write) -> M4Result<()> {
        if !self.buffers[0].is_empty() {
            out.write_all(&self.buffers[0])
                .map_err(|e| M4Error::Io(e, "writing diversion 0 to standard output"))?;
            self.buffers[0].clear();
        }
        Ok(())
    }

    /// undivert_one copies diversion k's bytes onto the current
    /// diversion. A diversion is never copied onto itself. The caller
    /// decides clear_source: the no-argument form always clears, and the
    /// named form clears only when the current diversion is 0 (the copy
    /// is standing in for an immediate flush there) - copied into any
    /// other diversion, the source is left alone since it hasn't been
    /// emitted yet.
    pub fn undivert_one(&mut self, k: usize, clear_source: bool) {
        if self.current as usize == k {
            return;
        }
        let bytes = if clear_source {
            std::mem::take(&mut self.buffers[k])
        } else {
            self.buffers[k].clone()
        };
        self.buffers[self.current as usize].extend_from_slice(&bytes);
    }

    /// undivert_all is the no-argument form, copying 1..9 onto the
    /// current diversion in order and clearing each source.
    pub fn undivert_all(&mut self) {
        for k in 1..=9 {
            self.undivert_one(k, true);
        }
    }

    /// finalize is called at normal termination: diversion 0 is flushed,
    /// then 1..9 are flushed to standard output in numeric order.
    pub fn finalize(&mut self, out: &mut impl Write) -> M4Result<()> {
        self.flush_diversion_zero(out)?;
        for k in 1..=9 {
            if !self.buffers[k].is_empty() {
                out.write_all(&self.buffers[k])
                    .map_err(|e| M4Error::Io(e, "flushing diversion at exit"))?;
                self.buffers[k].clear();
            }
        }
        Ok(())
    }

}

impl Default for Diversions {
    fn default() -> Diversions {
        Diversions::new()
    }
}
