//! Shared proptest strategies for unit tests.

use proptest::prelude::*;

use crate::BOUNDARY_CHARS;

/// A sensitive value, including values that are part of the default
/// placeholders (`Name`, `e`, `The`).
pub(crate) fn arb_sensitive_value() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_numbered_value(),
        prop::string::string_regex("[A-Za-z][a-z-]{0,8}").unwrap(),
        prop::sample::select(vec!["Name", "e", "The", "ame", "Machine", "User"])
            .prop_map(str::to_string),
    ]
}

/// A sensitive value ending in a digit, so it never occurs in [`arb_filler`].
pub(crate) fn arb_numbered_value() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z-]{2,10}[0-9]").unwrap()
}

/// One of the boundary characters.
pub(crate) fn arb_boundary() -> impl Strategy<Value = char> {
    prop::sample::select(BOUNDARY_CHARS.to_vec())
}

/// Filler text drawn from letters, punctuation and boundary characters.
pub(crate) fn arb_filler(max_len: usize) -> impl Strategy<Value = String> {
    prop::string::string_regex(&format!("[a-z./: \\t\\n\\r]{{0,{max_len}}}")).unwrap()
}
