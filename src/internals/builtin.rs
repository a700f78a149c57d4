// Built-in catalogue and dispatch (C7 registration half)
//
// Grounded in the teacher's add_builtin(name, fn, doc) registration
// pattern (runtime.rs::compile_builtins / kernel.rs::BuiltInFn): a single
// table maps names to a tagged implementation rather than comparing
// strings in the hot loop.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTag {
    Define,
    Undefine,
    Changequote,
    Divert,
    Divnum,
    Undivert,
    Dumpdef,
    Errprint,
    Ifdef,
    Ifelse,
    Include,
    Len,
    Index,
    Substr,
    Translit,
    Dnl,
    Incr,
    Add,
    Mult,
    Sub,
    Div,
    Mod,
    Dirsep,
    Htdist,
    Esyscmd,
    Maketemp,
}

pub struct BuiltinSpec {
    pub name: &'static str,
    pub tag: BuiltinTag,
    pub doc: &'static str,
}

/// The full catalogue, in the order new built-ins get seeded into the
/// symbol table at startup.
pub const CATALOGUE: &[BuiltinSpec] = &[
    BuiltinSpec { name: "define", tag: BuiltinTag::Define, doc: "define(name, body) - upsert a macro; body may contain $1..$9" },
    BuiltinSpec { name: "undefine", tag: BuiltinTag::Undefine, doc: "undefine(name) - delete a macro; silent if absent" },
    BuiltinSpec { name: "changequote", tag: BuiltinTag::Changequote, doc: "changequote(L, R) - set the quote delimiters" },
    BuiltinSpec { name: "divert", tag: BuiltinTag::Divert, doc: "divert(n) - select the current output diversion" },
    BuiltinSpec { name: "divnum", tag: BuiltinTag::Divnum, doc: "divnum - current diversion number as decimal" },
    BuiltinSpec { name: "undivert", tag: BuiltinTag::Undivert, doc: "undivert(...) - copy/flush diversions" },
    BuiltinSpec { name: "dumpdef", tag: BuiltinTag::Dumpdef, doc: "dumpdef(n1..n9) - print macro definitions to the diagnostic channel" },
    BuiltinSpec { name: "errprint", tag: BuiltinTag::Errprint, doc: "errprint(s1..s9) - write lines to the diagnostic channel" },
    BuiltinSpec { name: "ifdef", tag: BuiltinTag::Ifdef, doc: "ifdef(name, yes, no) - branch on macro existence" },
    BuiltinSpec { name: "ifelse", tag: BuiltinTag::Ifelse, doc: "ifelse(a, b, yes, no) - branch on byte-exact equality" },
    BuiltinSpec { name: "include", tag: BuiltinTag::Include, doc: "include(path) - insert a file's contents into the input" },
    BuiltinSpec { name: "len", tag: BuiltinTag::Len, doc: "len(s) - decimal length of s" },
    BuiltinSpec { name: "index", tag: BuiltinTag::Index, doc: "index(haystack, needle) - byte offset of first occurrence, or -1" },
    BuiltinSpec { name: "substr", tag: BuiltinTag::Substr, doc: "substr(s, start, len) - byte substring, clamped" },
    BuiltinSpec { name: "translit", tag: BuiltinTag::Translit, doc: "translit(s, from, to) - per-byte transliteration" },
    BuiltinSpec { name: "dnl", tag: BuiltinTag::Dnl, doc: "dnl - discard input up to and including the next newline" },
    BuiltinSpec { name: "incr", tag: BuiltinTag::Incr, doc: "incr(n) - n + 1" },
    BuiltinSpec { name: "add", tag: BuiltinTag::Add, doc: "add(n1..n9) - sum, identity 0" },
    BuiltinSpec { name: "mult", tag: BuiltinTag::Mult, doc: "mult(n1..n9) - product, identity 1" },
    BuiltinSpec { name: "sub", tag: BuiltinTag::Sub, doc: "sub(n1..n9) - left-to-right subtraction" },
    BuiltinSpec { name: "div", tag: BuiltinTag::Div, doc: "div(n1..n9) - left-to-right division" },
    BuiltinSpec { name: "mod", tag: BuiltinTag::Mod, doc: "mod(n1..n9) - left-to-right modulo" },
    BuiltinSpec { name: "dirsep", tag: BuiltinTag::Dirsep, doc: "dirsep - platform path separator" },
    BuiltinSpec { name: "htdist", tag: BuiltinTag::Htdist, doc: "htdist - symbol-table bucket-length histogram" },
    BuiltinSpec { name: "esyscmd", tag: BuiltinTag::Esyscmd, doc: "esyscmd(cmd) - run a shell command, capture stdout" },
    BuiltinSpec { name: "maketemp", tag: BuiltinTag::Maketemp, doc: "maketemp(template) - generate a unique name" },
];

/// Built-ins that have a defined, useful no-argument form - an
/// identifier not immediately followed by '(' takes this path.
/// Everything else, if invoked without arguments, is passed through as
/// literal text - it has no meaning without its arguments.
pub fn has_noarg_form(tag: BuiltinTag) -> bool {
    matches!(
        tag,
        BuiltinTag::Dnl
            | BuiltinTag::Divnum
            | BuiltinTag::Undivert
            | BuiltinTag::Divert
            | BuiltinTag::Htdist
            | BuiltinTag::Dirsep
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_names_are_unique() {
        let mut names: Vec<&str> = CATALOGUE.iter().map(|b| b.name).collect();
        names.sort();
        let mut dedup = names.clone();
        dedup.dedup();
        assert_eq!(names.len(), dedup.len());
    }

    #[test]
    fn dnl_has_a_noarg_form() {
        assert!(has_noarg_form(BuiltinTag::Dnl));
    }

    #[test]
    fn define_has_no_noarg_form() {
        assert!(!has_noarg_form(BuiltinTag::Define));
    }
}
