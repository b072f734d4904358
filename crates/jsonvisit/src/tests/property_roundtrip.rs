use quickcheck::QuickCheck;

use crate::{Value, dump_string, load};

const TESTS: u64 = 1_000;

/// Any tree survives serialize-then-parse. Unsigned integers small enough
/// for `i64` reparse as signed, which the cross-variant equality absorbs;
/// floats rely on the shortest round-trip rendering.
#[test]
fn compact_text_roundtrips() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let text = dump_string(&value, true).expect("finite tree serializes");
        load(&text) == Ok(value)
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Value) -> bool);
}

/// Pretty output carries the same document, just with whitespace the parser
/// skips.
#[test]
fn pretty_text_roundtrips() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let text = dump_string(&value, false).expect("finite tree serializes");
        load(&text) == Ok(value)
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Value) -> bool);
}

/// One parse normalizes the text; further round trips reproduce it byte for
/// byte.
#[test]
fn serialized_form_is_stable() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let first = dump_string(&value, true).expect("finite tree serializes");
        let reparsed = load(&first).expect("own output parses");
        let second = dump_string(&reparsed, true).expect("finite tree serializes");
        first == second
    }

    QuickCheck::new()
        .tests(TESTS)
        .quickcheck(prop as fn(Value) -> bool);
}
