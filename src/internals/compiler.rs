// Definition and control builtins (C7)
//
// Grounded in the teacher's compiler.rs, which owned word definition and
// control-flow dispatch for the Forth engine (f_colon, f_semicolon, the
// quit/eval loop). Generalized here from compiling Forth words to
// upserting macro bodies and branching on rescanned text.

use crate::engine::Engine;
use crate::error::{M4Error, M4Result};
use crate::internals::builtin::BuiltinTag;
use crate::symtab::Definition;

impl Engine {
    /// define(name, body) - body is optional; absent means an empty body.
    pub fn bi_define(&mut self, args: &[&[u8]]) -> M4Result<()> {
        let name = args.first().copied().unwrap_or(b"");
        if name.is_empty() {
            return Ok(());
        }
        let body = args.get(1).copied().unwrap_or(b"").to_vec();
        self.symtab.upsert(name, Definition::User(body));
        Ok(())
    }

    /// undefine(name) - silent if the name is absent; that's benign, not
    /// an error.
    pub fn bi_undefine(&mut self, args: &[&[u8]]) -> M4Result<()> {
        let name = args.first().copied().unwrap_or(b"");
        self.symtab.delete(name);
        Ok(())
    }

    /// changequote(L, R) - both must be single, distinct, printable-graphic
    /// bytes, none of them '(', ')', or ','.
    pub fn bi_changequote(&mut self, args: &[&[u8]]) -> M4Result<()> {
        let l = args.first().copied().unwrap_or(b"`");
        let r = args.get(1).copied().unwrap_or(b"'");
        let valid = |b: &[u8]| -> Option<u8> {
            if b.len() != 1 {
                return None;
            }
            let c = b[0];
            if c.is_ascii_graphic() && c != b'(' && c != b')' && c != b',' {
                Some(c)
            } else {
                None
            }
        };
        match (valid(l), valid(r)) {
            (Some(lb), Some(rb)) if lb != rb => {
                self.quote.left = lb;
                self.quote.right = rb;
                Ok(())
            }
            _ => Err(M4Error::BadChangequote),
        }
    }

    /// ifdef(name, yes, no) - rescan yes if name is defined, else no.
    pub fn bi_ifdef(&mut self, args: &[&[u8]]) -> M4Result<Vec<u8>> {
        let name = args.first().copied().unwrap_or(b"");
        let yes = args.get(1).copied().unwrap_or(b"");
        let no = args.get(2).copied().unwrap_or(b"");
        Ok(if self.symtab.lookup(name).is_some() {
            yes.to_vec()
        } else {
            no.to_vec()
        })
    }

    /// ifelse(a, b, yes, no) - the two-branch form only; the traditional
    /// chained three-way form is not supported.
    pub fn bi_ifelse(&mut self, args: &[&[u8]]) -> M4Result<Vec<u8>> {
        let a = args.first().copied().unwrap_or(b"");
        let b = args.get(1).copied().unwrap_or(b"");
        let yes = args.get(2).copied().unwrap_or(b"");
        let no = args.get(3).copied().unwrap_or(b"");
        Ok(if a == b { yes.to_vec() } else { no.to_vec() })
    }

    /// dnl - discard input up to and including the next newline token.
    pub fn bi_dnl(&mut self) -> M4Result<()> {
        loop {
            match self.pushback.read()? {
                Some(b'\n') | None => break,
                Some(_) => continue,
            }
        }
        Ok(())
    }

    pub fn seed_builtins(&mut self) {
        for spec in crate::internals::builtin::CATALOGUE {
            self.symtab
                .upsert(spec.name.as_bytes(), Definition::Builtin(spec.tag));
        }
    }
}

pub fn doc_for(tag: BuiltinTag) -> &'static str {
    crate::internals::builtin::CATALOGUE
        .iter()
        .find(|b| b.tag == tag)
        .map(|b| b.doc)
        .unwrap_or("")
}
