// Expansion engine (C6)
//
// Grounded in the teacher's main dispatch loop (internals/compiler.rs's
// quit/eval cycle calling into ForthRuntime): a single step() function
// reads one token at a time and either writes it straight through,
// starts collecting a macro call, or closes one and rescans its result.
// Recursion is never used for nested calls - the call stack (C4) holds
// one frame per open, unmatched '(' the same way the teacher's
// control_stack held one marker per open control construct.

use crate::callstack::{CallFrame, CallStack, FrameKind};
use crate::diversion::Diversions;
use crate::error::{M4Error, M4Result};
use crate::internals::builtin::{self, BuiltinTag};
use crate::internals::files;
use crate::internals::general;
use crate::messages::Msg;
use crate::pushback::Pushback;
use crate::symtab::{Definition, SymbolTable};
use crate::token::{self, Token};

/// The active pair of quote delimiters; defaults to the traditional
/// backquote/apostrophe pair. Quoted text nests: every left delimiter
/// seen while already inside a quote increases depth, and only the
/// delimiter that brings depth back to zero closes it.
pub struct QuoteState {
    pub left: u8,
    pub right: u8,
}

impl Default for QuoteState {
    fn default() -> QuoteState {
        QuoteState {
            left: b'`',
            right: b'\'',
        }
    }
}

pub struct Engine {
    pub pushback: Pushback,
    pub symtab: SymbolTable,
    pub callstack: CallStack,
    pub diversions: Diversions,
    pub quote: QuoteState,
    pub msg: Msg,
}

impl Engine {
    pub fn new(stdin_enabled: bool) -> Engine {
        let mut engine = Engine {
            pushback: Pushback::new(stdin_enabled),
            symtab: SymbolTable::new(),
            callstack: CallStack::new(),
            diversions: Diversions::new(),
            quote: QuoteState::default(),
            msg: Msg::new(),
        };
        engine.seed_builtins();
        engine
    }

    /// define_from_cli implements -Dname[=val]: val defaults to the
    /// empty body when absent.
    pub fn define_from_cli(&mut self, name: &[u8], val: Option<&[u8]>) {
        self.symtab
            .upsert(name, Definition::User(val.unwrap_or(b"").to_vec()));
    }

    /// undefine_from_cli implements -Uname.
    pub fn undefine_from_cli(&mut self, name: &[u8]) {
        self.symtab.delete(name);
    }

    /// run drives the engine to exhaustion: every byte from the pushback
    /// buffer (files queued ahead of standard input, or standard input
    /// alone) is consumed, diversion 0 is flushed opportunistically
    /// between top-level tokens, and diversions 1..9 are flushed in
    /// order at normal termination. An open macro call at end of input
    /// is a fatal, reported condition.
    pub fn run(&mut self, out: &mut impl std::io::Write) -> M4Result<()> {
        loop {
            if self.callstack.is_empty() {
                self.diversions.flush_diversion_zero(out)?;
            }
            if !self.step()? {
                break;
            }
        }
        if !self.callstack.is_empty() {
            return Err(M4Error::UnterminatedCall);
        }
        self.diversions.finalize(out)
    }

    /// step processes one token. Returns Ok(false) at end of input.
    fn step(&mut self) -> M4Result<bool> {
        let first = match self.pushback.read()? {
            Some(b) => b,
            None => return Ok(false),
        };
        if first == self.quote.left {
            let text = self.read_quoted()?;
            self.emit_bytes(&text);
            return Ok(true);
        }
        self.pushback.unread(first);
        match token::next_token(&mut self.pushback)? {
            Some(Token::Ident(name)) => self.handle_identifier(name)?,
            Some(Token::Byte(b)) => self.handle_byte(b)?,
            None => return Ok(false),
        }
        Ok(true)
    }

    /// read_quoted consumes bytes up to the matching right delimiter,
    /// preserving any nested delimiter pairs literally and stripping
    /// only the outermost pair. Quoted text is never rescanned.
    fn read_quoted(&mut self) -> M4Result<Vec<u8>> {
        let mut depth: u32 = 1;
        let mut out = Vec::new();
        loop {
            match self.pushback.read()? {
                None => return Err(M4Error::UnterminatedQuote),
                Some(b) if b == self.quote.left => {
                    depth += 1;
                    out.push(b);
                }
                Some(b) if b == self.quote.right => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(b);
                }
                Some(b) => out.push(b),
            }
        }
    }

    fn handle_identifier(&mut self, name: Vec<u8>) -> M4Result<()> {
        let def = match self.symtab.lookup(&name) {
            Some(d) => d.clone(),
            None => {
                self.emit_bytes(&name);
                return Ok(());
            }
        };
        match self.pushback.read()? {
            Some(b'(') => {
                self.callstack.push(CallFrame::new(name, Some(&def)));
            }
            other => {
                if let Some(b) = other {
                    self.pushback.unread(b);
                }
                if has_noarg_form(&def) {
                    let result = self.dispatch(&def, &[])?;
                    self.pushback.unread_str(&result);
                } else {
                    self.emit_bytes(&name);
                }
            }
        }
        Ok(())
    }

    /// handle_byte routes a single non-identifier byte: when a call is
    /// open it is either argument-collection punctuation ('(' ')' ',')
    /// or literal argument text; otherwise it is final output text.
    fn handle_byte(&mut self, b: u8) -> M4Result<()> {
        if self.callstack.is_empty() {
            self.diversions.write(&[b]);
            return Ok(());
        }
        match b {
            b'(' => {
                let frame = self.callstack.top_mut().expect("checked non-empty above");
                frame.bracket_depth += 1;
                frame.skip_ws = false;
                frame.current_arg_mut().push(b);
            }
            b')' => {
                let depth = {
                    let frame = self.callstack.top_mut().expect("checked non-empty above");
                    frame.bracket_depth -= 1;
                    frame.bracket_depth
                };
                if depth == 0 {
                    self.close_call()?;
                } else {
                    let frame = self.callstack.top_mut().expect("checked non-empty above");
                    frame.skip_ws = false;
                    frame.current_arg_mut().push(b);
                }
            }
            b',' => {
                let frame = self.callstack.top_mut().expect("checked non-empty above");
                if frame.bracket_depth == 1 {
                    frame.next_arg().map_err(|()| M4Error::TooManyArguments)?;
                } else {
                    frame.skip_ws = false;
                    frame.current_arg_mut().push(b);
                }
            }
            _ => {
                let frame = self.callstack.top_mut().expect("checked non-empty above");
                if frame.skip_ws && b.is_ascii_whitespace() {
                    // Discard unquoted whitespace leading an argument.
                } else {
                    frame.skip_ws = false;
                    frame.current_arg_mut().push(b);
                }
            }
        }
        Ok(())
    }

    /// close_call pops the innermost frame, runs its macro with the
    /// arguments collected so far, and rescans the result.
    fn close_call(&mut self) -> M4Result<()> {
        let frame = self
            .callstack
            .pop()
            .expect("close_call only runs with a frame on top");
        let def = match &frame.kind {
            FrameKind::Builtin(tag) => Definition::Builtin(*tag),
            FrameKind::User(body) => Definition::User(body.clone()),
        };
        let owned_args: Vec<Vec<u8>> = (1..=9).map(|i| frame.arg(i).to_vec()).collect();
        let arg_refs: Vec<&[u8]> = owned_args.iter().map(|v| v.as_slice()).collect();
        let result = self.dispatch(&def, &arg_refs)?;
        self.pushback.unread_str(&result);
        Ok(())
    }

    /// emit_bytes writes already-final text: to the current call frame's
    /// argument if one is open, otherwise to the current diversion.
    fn emit_bytes(&mut self, bytes: &[u8]) {
        if let Some(frame) = self.callstack.top_mut() {
            frame.skip_ws = false;
            frame.current_arg_mut().extend_from_slice(bytes);
        } else {
            self.diversions.write(bytes);
        }
    }

    fn dispatch(&mut self, def: &Definition, args: &[&[u8]]) -> M4Result<Vec<u8>> {
        match def {
            Definition::User(body) => Ok(substitute_args(body, args)),
            Definition::Builtin(tag) => self.dispatch_builtin(*tag, args),
        }
    }

    fn dispatch_builtin(&mut self, tag: BuiltinTag, args: &[&[u8]]) -> M4Result<Vec<u8>> {
        let a = |i: usize| args.get(i).copied().unwrap_or(b"");
        match tag {
            BuiltinTag::Define => {
                self.bi_define(args)?;
                Ok(Vec::new())
            }
            BuiltinTag::Undefine => {
                self.bi_undefine(args)?;
                Ok(Vec::new())
            }
            BuiltinTag::Changequote => {
                self.bi_changequote(args)?;
                Ok(Vec::new())
            }
            BuiltinTag::Divert => {
                self.bi_divert(args)?;
                Ok(Vec::new())
            }
            BuiltinTag::Divnum => Ok(self.bi_divnum()),
            BuiltinTag::Undivert => {
                self.bi_undivert(args)?;
                Ok(Vec::new())
            }
            BuiltinTag::Dumpdef => {
                self.bi_dumpdef(args);
                Ok(Vec::new())
            }
            BuiltinTag::Errprint => {
                self.bi_errprint(args);
                Ok(Vec::new())
            }
            BuiltinTag::Ifdef => self.bi_ifdef(args),
            BuiltinTag::Ifelse => self.bi_ifelse(args),
            BuiltinTag::Include => {
                self.bi_include(args)?;
                Ok(Vec::new())
            }
            BuiltinTag::Len => Ok(general::len(a(0))),
            BuiltinTag::Index => Ok(general::index(a(0), a(1))),
            BuiltinTag::Substr => general::substr(a(0), a(1), a(2)),
            BuiltinTag::Translit => Ok(general::translit(a(0), a(1), a(2))),
            BuiltinTag::Dnl => {
                self.bi_dnl()?;
                Ok(Vec::new())
            }
            BuiltinTag::Incr => general::incr(a(0)),
            BuiltinTag::Add => general::add(args),
            BuiltinTag::Mult => general::mult(args),
            BuiltinTag::Sub => general::sub(args),
            BuiltinTag::Div => general::div(args),
            BuiltinTag::Mod => general::modulo(args),
            BuiltinTag::Dirsep => Ok(files::dirsep().to_vec()),
            BuiltinTag::Htdist => {
                self.bi_htdist();
                Ok(Vec::new())
            }
            BuiltinTag::Esyscmd => self.bi_esyscmd(args),
            BuiltinTag::Maketemp => self.bi_maketemp(args),
        }
    }
}

/// has_noarg_form decides whether an identifier with no following '('
/// still triggers expansion: user macros always do (their body may
/// simply not reference any $n), builtins only when the catalogue says
/// the bare name is meaningful (builtin.rs::has_noarg_form).
fn has_noarg_form(def: &Definition) -> bool {
    match def {
        Definition::User(_) => true,
        Definition::Builtin(tag) => builtin::has_noarg_form(*tag),
    }
}

/// substitute_args replaces every `$1`..`$9` in body with the
/// corresponding argument (missing arguments substitute as empty); any
/// other byte, including a lone `$` or `$0`, passes through unchanged.
fn substitute_args(body: &[u8], args: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len());
    let mut i = 0;
    while i < body.len() {
        if body[i] == b'$' && i + 1 < body.len() && body[i + 1].is_ascii_digit() && body[i + 1] != b'0' {
            let n = (body[i + 1] - b'0') as usize;
            out.extend_from_slice(args.get(n - 1).copied().unwrap_or(b""));
            i += 2;
        } else {
            out.push(body[i]);
            i += 1;
        }
    }
    out
}
