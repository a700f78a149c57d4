// End-to-end acceptance tests against the documented scenarios and
// invariants, run through the whole pipeline (pushback -> tokenizer ->
// expansion engine -> diversions) rather than any single component.
//
// This lives as its own inline-test module (matching the teacher's
// convention of per-file `#[cfg(test)] mod tests` rather than a
// `tests/` integration directory) because the crate ships as a binary
// with no library target, same as the teacher.

use crate::engine::Engine;

fn expand(input: &[u8]) -> String {
    let mut e = Engine::new(false);
    e.pushback.unread_str(input);
    let mut out = Vec::new();
    e.run(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn scenario_changequote_and_positional_params() {
    assert_eq!(
        expand(b"changequote([,])define(cool,$1 and $2)cool(goat, mice)"),
        "goat and mice"
    );
}

#[test]
fn scenario_double_substitution() {
    assert_eq!(expand(b"define(x, $1$1)x(ab)"), "abab");
}

#[test]
fn scenario_two_branch_ifelse() {
    assert_eq!(
        expand(b"ifelse(a, a, yes, no)ifelse(a, b, yes, no)"),
        "yesno"
    );
}

#[test]
fn scenario_ifdef_undefine_roundtrip() {
    assert_eq!(
        expand(b"changequote([,])define(y,5)ifdef([y],T,F)undefine([y])ifdef([y],T,F)"),
        "TF"
    );
}

// An explicit undivert from diversion 0 stands in for an immediate
// flush, so it clears diversion 2's buffer - "hello " appears exactly
// once, reordered after "world ".
#[test]
fn scenario_divert_and_undivert_reorder_output() {
    assert_eq!(
        expand(b"divert(2)hello divert(0)world undivert(2)"),
        "world hello "
    );
}

// Applying translit's per-byte map (a->x, b->y, c->z, s deleted since it
// falls past the end of "xyz", n passes through unmapped) to "bananas"
// gives "yxnxnx", matching internals::general's own translit tests.
#[test]
fn scenario_substr_and_translit_compose() {
    assert_eq!(
        expand(b"substr(elephant, 2, 4)translit(bananas, abcs, xyz)"),
        "ephayxnxnx"
    );
}

/// P3: quoted text is never subject to macro recognition, round-trip.
#[test]
fn invariant_p3_quoted_text_is_never_expanded() {
    assert_eq!(
        expand(b"define(`X', `not this')`X'"),
        "X"
    );
}

/// P4: rescanning is transitive across a chain of indirections.
#[test]
fn invariant_p4_rescanning_is_transitive() {
    assert_eq!(
        expand(b"define(`a', `b')define(`b', `c')a"),
        "c"
    );
}

/// P5: define then undefine of the same name restores prior absence.
#[test]
fn invariant_p5_define_then_undefine_is_a_no_op_on_the_table() {
    assert_eq!(
        expand(b"ifdef(`n', `before-yes', `before-no')define(`n', `1')undefine(`n')ifdef(`n', `after-yes', `after-no')"),
        "before-noafter-no"
    );
}

/// P6: incr is total up to WORD_MAX - 1 and fails exactly at WORD_MAX.
#[test]
fn invariant_p6_incr_fails_only_at_word_max() {
    let mut e = Engine::new(false);
    e.pushback
        .unread_str(format!("incr({})", u64::MAX - 1).as_bytes());
    let mut out = Vec::new();
    e.run(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), u64::MAX.to_string());

    let mut e2 = Engine::new(false);
    e2.pushback.unread_str(format!("incr({})", u64::MAX).as_bytes());
    let mut out2 = Vec::new();
    assert!(e2.run(&mut out2).is_err());
}

/// Nested macro calls with multiple arguments rescan correctly even when
/// the outer call's arguments are themselves macro invocations.
#[test]
fn nested_calls_rescan_before_the_outer_call_closes() {
    assert_eq!(
        expand(b"define(`double', `$1$1')define(`pair', `$1-$2')pair(double(`a'), double(`b'))"),
        "aa-bb"
    );
}
