// Diagnostic and diversion-control builtins (C7)
//
// Grounded in the teacher's console.rs, which mixed interactive display
// (dump-style words) with a shell-out via std::process::Command.
// Generalized here from printing VM stack contents to printing macro
// definitions and diversion bookkeeping, and the shell-out becomes
// esyscmd.

use std::process::Command;

use crate::engine::Engine;
use crate::error::{M4Error, M4Result};
use crate::internals::general::parse_word;
use crate::symtab::Definition;

fn parse_diversion(builtin: &'static str, s: &[u8]) -> M4Result<i8> {
    if s == b"-1" {
        return Ok(-1);
    }
    let n = parse_word(builtin, s).map_err(|_| {
        M4Error::BadDivertNumber(String::from_utf8_lossy(s).into_owned())
    })?;
    if n > 9 {
        return Err(M4Error::BadDivertNumber(String::from_utf8_lossy(s).into_owned()));
    }
    Ok(n as i8)
}

impl Engine {
    /// divert(n) - no argument selects diversion 0.
    pub fn bi_divert(&mut self, args: &[&[u8]]) -> M4Result<()> {
        let arg = args.first().copied().unwrap_or(b"0");
        let n = parse_diversion("divert", arg)?;
        self.diversions.divert(n);
        Ok(())
    }

    /// divnum - current diversion number as decimal text.
    pub fn bi_divnum(&mut self) -> Vec<u8> {
        self.diversions.current().to_string().into_bytes()
    }

    /// undivert(...) - no arguments copies and clears 1..9, in order,
    /// onto the current diversion. A named diversion is copied onto the
    /// current one and, when the current diversion is 0, cleared just
    /// like the flush it stands in for; copied into any other diversion
    /// it is left untouched, since it hasn't actually been emitted yet.
    pub fn bi_undivert(&mut self, args: &[&[u8]]) -> M4Result<()> {
        if args.is_empty() {
            self.diversions.undivert_all();
            return Ok(());
        }
        let clear_source = self.diversions.current() == 0;
        for a in args {
            let n = parse_diversion("undivert", a)?;
            if n < 0 {
                continue;
            }
            self.diversions.undivert_one(n as usize, clear_source);
        }
        Ok(())
    }

    /// dumpdef(name...) - write each macro's definition to the diagnostic
    /// channel; with no arguments, dumps the whole table.
    pub fn bi_dumpdef(&mut self, args: &[&[u8]]) {
        if args.is_empty() {
            let lines: Vec<String> = self
                .symtab
                .entries()
                .map(|(name, def)| format_def(name, def))
                .collect();
            for line in lines {
                self.msg.line(&line);
            }
            return;
        }
        for name in args.iter().filter(|n| !n.is_empty()) {
            let line = match self.symtab.lookup(name) {
                Some(def) => format_def(name, def),
                None => format!("{}: undefined", String::from_utf8_lossy(name)),
            };
            self.msg.line(&line);
        }
    }

    /// errprint(s1..s9) - write each non-empty argument as its own line
    /// to the diagnostic channel.
    pub fn bi_errprint(&mut self, args: &[&[u8]]) {
        for a in args.iter().filter(|a| !a.is_empty()) {
            self.msg.line(&String::from_utf8_lossy(a).into_owned());
        }
    }

    /// htdist - report the symbol table's bucket-length distribution to
    /// the diagnostic channel (non-empty buckets and the longest chain).
    pub fn bi_htdist(&mut self) {
        let hist = self.symtab.histogram();
        let used = hist.iter().filter(|&&n| n > 0).count();
        let max = hist.iter().copied().max().unwrap_or(0);
        let total: usize = hist.iter().sum();
        self.msg.line(&format!(
            "htdist: {total} entries in {used} non-empty buckets (of {}), longest chain {max}",
            hist.len()
        ));
    }

    /// esyscmd(cmd) - run cmd through the platform shell, returning its
    /// captured standard output stripped of NUL bytes; fatal if the shell
    /// cannot be started or exits non-zero.
    pub fn bi_esyscmd(&mut self, args: &[&[u8]]) -> M4Result<Vec<u8>> {
        let cmd = args.first().copied().unwrap_or(b"");
        let cmd_str = String::from_utf8_lossy(cmd).into_owned();
        let output = Command::new("sh")
            .arg("-c")
            .arg(&cmd_str)
            .output()
            .map_err(|e| M4Error::Io(e, "spawning esyscmd shell"))?;
        if !output.status.success() {
            return Err(M4Error::ShellCommandFailed {
                cmd: cmd_str,
                status: output.status.code().unwrap_or(-1),
            });
        }
        Ok(output.stdout.into_iter().filter(|&b| b != 0).collect())
    }
}

fn format_def(name: &[u8], def: &Definition) -> String {
    let name = String::from_utf8_lossy(name);
    match def {
        Definition::Builtin(tag) => {
            format!("{name}: <builtin {}>", crate::internals::compiler::doc_for(*tag))
        }
        Definition::User(body) => format!("{name}: `{}'", String::from_utf8_lossy(body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;

    fn engine() -> Engine {
        Engine::new(false)
    }

    #[test]
    fn divert_selects_the_named_diversion() {
        let mut e = engine();
        e.bi_divert(&[b"3"]).unwrap();
        assert_eq!(e.diversions.current(), 3);
    }

    #[test]
    fn divert_with_no_args_means_diversion_zero() {
        let mut e = engine();
        e.bi_divert(&[b"3"]).unwrap();
        e.bi_divert(&[]).unwrap();
        assert_eq!(e.diversions.current(), 0);
    }

    #[test]
    fn divert_rejects_out_of_range_numbers() {
        let mut e = engine();
        assert!(e.bi_divert(&[b"42"]).is_err());
    }

    #[test]
    fn divnum_reports_current_diversion() {
        let mut e = engine();
        e.bi_divert(&[b"2"]).unwrap();
        assert_eq!(e.bi_divnum(), b"2");
    }

    #[test]
    fn dumpdef_of_a_user_macro_does_not_panic() {
        let mut e = engine();
        e.bi_define(&[b"foo", b"bar"]).unwrap();
        e.bi_dumpdef(&[b"foo"]);
    }

    #[test]
    fn dumpdef_of_missing_name_does_not_panic() {
        let mut e = engine();
        e.bi_dumpdef(&[b"nope"]);
    }

    #[test]
    fn errprint_does_not_panic() {
        let mut e = engine();
        e.bi_errprint(&[b"hello", b"world"]);
    }

    #[test]
    fn htdist_does_not_panic_on_empty_table() {
        let mut e = engine();
        e.bi_htdist();
    }

    #[test]
    fn esyscmd_captures_stdout() {
        let mut e = engine();
        let out = e.bi_esyscmd(&[b"echo hi"]).unwrap();
        assert_eq!(out, b"hi\n");
    }

    #[test]
    fn esyscmd_fails_on_nonzero_exit() {
        let mut e = engine();
        assert!(e.bi_esyscmd(&[b"exit 1"]).is_err());
    }

    #[test]
    fn esyscmd_strips_nul_bytes() {
        let mut e = engine();
        let out = e.bi_esyscmd(&[b"printf 'a\\0b'"]).unwrap();
        assert_eq!(out, b"ab");
    }
}
