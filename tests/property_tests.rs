//! Integration property tests for snapshot-scrub.
//!
//! These tests validate the scrubbing and normalization guarantees end to
//! end using property-based testing.

use proptest::prelude::*;
use snapshot_scrub::{
    scrub, scrub_stack_trace, BoundaryTable, Replacements, BOUNDARY_CHARS,
    DEFAULT_MACHINE_PLACEHOLDER, DEFAULT_USER_PLACEHOLDER,
};

// Strategy: a host or user name, including pieces of the default placeholders
fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-z][a-z-]{2,12}[0-9]{1,3}").unwrap(),
        prop::string::string_regex("[A-Za-z][A-Za-z-]{0,10}").unwrap(),
        prop::sample::select(vec!["Name", "e", "The", "Machine", "User", "serName"])
            .prop_map(str::to_string),
    ]
}

// Strategy: a boundary character
fn arb_boundary() -> impl Strategy<Value = char> {
    prop::sample::select(BOUNDARY_CHARS.to_vec())
}

// Strategy: a non-boundary character
fn arb_glue() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['a', 'Z', '.', '/', ':', '-', '_', '@'])
}

// Strategy: a line that looks like one from a captured trace
fn arb_trace_line() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[A-Za-z.]{1,20}Exception: [a-z ]{0,20}").unwrap(),
        prop::string::string_regex(" {0,4}at [A-Za-z.+<>_]{1,30}\\([A-Za-z0-9 ,]{0,20}\\)( in /[a-z/]{1,20}\\.cs:line [0-9]{1,3})?").unwrap(),
        prop::string::string_regex(" {0,4}at [A-Za-z.+]{1,20}[(]?[A-Za-z ]{0,10}").unwrap(),
        Just("--- End of stack trace from previous location where exception was thrown ---".to_string()),
        Just("   at System.Runtime.CompilerServices.TaskAwaiter.ThrowForNonSuccess(Task task)".to_string()),
        Just("   at InnerVerifier.Throws(Action target)".to_string()),
        Just(String::new()),
    ]
}

fn arb_trace() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(arb_trace_line(), 0..12),
        prop::sample::select(vec!["\n", "\r\n", "\r"]),
    )
        .prop_map(|(lines, terminator)| lines.join(terminator))
}

proptest! {
    /// Property: bVb becomes bPb and V becomes P for every boundary
    #[test]
    fn proptest_boundary_guarantees(
        value in arb_name(),
        boundary in arb_boundary()
    ) {
        let table = BoundaryTable::new(value.clone(), DEFAULT_MACHINE_PLACEHOLDER);

        let mut wrapped = format!("{boundary}{value}{boundary}");
        scrub(&mut wrapped, &table);
        prop_assert_eq!(wrapped, format!("{boundary}{DEFAULT_MACHINE_PLACEHOLDER}{boundary}"));

        let mut bare = value.clone();
        scrub(&mut bare, &table);
        prop_assert_eq!(bare.as_str(), DEFAULT_MACHINE_PLACEHOLDER);
    }

    /// Property: a value glued to non-boundary text on both sides survives
    #[test]
    fn proptest_glued_value_untouched(
        value in arb_name(),
        before in arb_glue(),
        after in arb_glue()
    ) {
        let table = BoundaryTable::new(value.clone(), DEFAULT_USER_PLACEHOLDER);
        let original = format!("{before}{value}{after}");
        let mut buffer = original.clone();

        scrub(&mut buffer, &table);

        prop_assert_eq!(buffer, original);
    }

    /// Property: placeholders already in the text are never scrubbed again
    #[test]
    fn proptest_placeholder_text_untouched(
        value in arb_name(),
        first in arb_boundary(),
        second in arb_boundary()
    ) {
        let table = BoundaryTable::new(value, DEFAULT_MACHINE_PLACEHOLDER);
        let original = format!(
            "{first}{DEFAULT_MACHINE_PLACEHOLDER}{second}{DEFAULT_MACHINE_PLACEHOLDER}"
        );
        let mut buffer = original.clone();

        scrub(&mut buffer, &table);

        prop_assert_eq!(buffer, original);
    }

    /// Property: scrubbing both names twice equals scrubbing once
    #[test]
    fn proptest_replacements_idempotent(
        machine in arb_name(),
        user in arb_name(),
        words in prop::collection::vec(
            prop_oneof![
                Just(0u8),
                Just(1u8),
                Just(2u8),
            ],
            0..12
        ),
        separators in prop::collection::vec(arb_boundary(), 12)
    ) {
        let replacements = Replacements::new(&machine, &user);
        let mut text = String::new();
        for (word, separator) in words.iter().zip(&separators) {
            match *word {
                0 => text.push_str(&machine),
                1 => text.push_str(&user),
                _ => text.push_str("word"),
            }
            text.push(*separator);
        }

        let mut once = text.clone();
        replacements.scrub_all(&mut once);
        let mut twice = once.clone();
        replacements.scrub_all(&mut twice);

        prop_assert_eq!(once, twice);
    }

    /// Property: normalization is total and its output is tidy
    #[test]
    fn proptest_normalizer_total(
        trace in arb_trace(),
        remove_params in any::<bool>()
    ) {
        let output = scrub_stack_trace(&trace, remove_params);

        prop_assert_eq!(output.trim_end(), output.as_str());
        prop_assert!(!output.contains('\r'));
        for line in output.lines() {
            prop_assert_eq!(line.trim_start(), line);
            prop_assert!(!line.contains("InnerVerifier.Throws"));
            prop_assert!(!line.contains("TaskAwaiter"));
            if line.starts_with("at ") {
                prop_assert!(!line.contains('+'));
                prop_assert!(!line.contains(" in /"));
            }
        }
    }

    /// Property: the parameter policy never changes which lines are kept
    #[test]
    fn proptest_policy_keeps_same_lines(trace in arb_trace()) {
        let kept = scrub_stack_trace(&trace, false).lines().count();
        let collapsed = scrub_stack_trace(&trace, true).lines().count();

        prop_assert_eq!(kept, collapsed);
    }

    /// Property: arbitrary text never panics the normalizer
    #[test]
    fn proptest_normalizer_accepts_any_text(
        text in any::<String>(),
        remove_params in any::<bool>()
    ) {
        let _ = scrub_stack_trace(&text, remove_params);
    }
}
