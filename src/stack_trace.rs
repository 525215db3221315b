//! Stack-trace normalization.
//!
//! Drops frames that vary between runs or machines and canonicalizes the
//! rest, so that a captured exception renders identically everywhere.

use crate::classify::{classify_line, LineKind};

/// Placeholder appended after `(` when a parameter list is collapsed.
const COLLAPSED_PARAMS: &str = "...)";

/// Normalizes stack-trace text under a fixed parameter policy.
///
/// The default policy keeps parameter lists and strips everything after the
/// first `)`, which removes source-location suffixes such as
/// `in /build/src/Foo.cs:line 42`.
///
/// # Examples
///
/// ```
/// use snapshot_scrub::StackTraceNormalizer;
///
/// let trace = "System.Exception: boom\n   at Foo.Bar(Int32 x) in /src/Foo.cs:line 9\n";
///
/// assert_eq!(
///     StackTraceNormalizer::default().normalize(trace),
///     "System.Exception: boom\nat Foo.Bar(Int32 x)"
/// );
/// assert_eq!(
///     StackTraceNormalizer::new(true).normalize(trace),
///     "System.Exception: boom\nat Foo.Bar(...)"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StackTraceNormalizer {
    remove_params: bool,
}

impl StackTraceNormalizer {
    /// Creates a normalizer; `remove_params` collapses parameter lists to `(...)`.
    pub fn new(remove_params: bool) -> Self {
        Self { remove_params }
    }

    /// Returns whether parameter lists are collapsed.
    pub fn remove_params(&self) -> bool {
        self.remove_params
    }

    /// Normalizes a full trace.
    ///
    /// Lines are split on any line terminator, classified, and reassembled
    /// with `\n` in their original order. Trailing whitespace of the result is
    /// trimmed. Never fails.
    pub fn normalize(&self, trace: &str) -> String {
        let mut output = String::with_capacity(trace.len());
        let mut lines = 0usize;
        let mut dropped = 0usize;

        for line in split_lines(trace) {
            lines += 1;
            match classify_line(line) {
                LineKind::Ignored => dropped += 1,
                LineKind::Passthrough(text) => {
                    output.push_str(text);
                    output.push('\n');
                }
                LineKind::Frame(frame) => {
                    output.push_str(&normalize_frame(frame, self.remove_params));
                    output.push('\n');
                }
            }
        }

        let end = output.trim_end().len();
        output.truncate(end);

        tracing::trace!(
            lines,
            kept = lines - dropped,
            dropped,
            remove_params = self.remove_params,
            "normalized stack trace"
        );
        output
    }
}

/// Normalizes `trace` with the given parameter policy.
///
/// Shorthand for `StackTraceNormalizer::new(remove_params).normalize(trace)`.
///
/// # Examples
///
/// ```
/// use snapshot_scrub::scrub_stack_trace;
///
/// let trace = "Exception: boom\n   at A.B()\n   at InnerVerifier.Throws()\n";
/// assert_eq!(scrub_stack_trace(trace, false), "Exception: boom\nat A.B()");
/// ```
pub fn scrub_stack_trace(trace: &str, remove_params: bool) -> String {
    StackTraceNormalizer::new(remove_params).normalize(trace)
}

/// Normalizes a single left-trimmed frame line.
///
/// With `remove_params`, the text is cut after the first `(`: an empty `()`
/// is kept, anything else becomes `(...)`. Without it, the text is cut after
/// the first `)`. A missing parenthesis leaves the text as is. Then `+` becomes
/// `.` and `" ("` becomes `"("`.
///
/// # Examples
///
/// ```
/// use snapshot_scrub::normalize_frame;
///
/// assert_eq!(normalize_frame("at Outer+Inner.Method()", false), "at Outer.Inner.Method()");
/// assert_eq!(normalize_frame("at Foo.Bar(int x) in /a.cs:line 3", true), "at Foo.Bar(...)");
/// ```
pub fn normalize_frame(frame: &str, remove_params: bool) -> String {
    let truncated = if remove_params {
        collapse_params(frame)
    } else {
        strip_location(frame).to_string()
    };

    truncated.replace('+', ".").replace(" (", "(")
}

fn collapse_params(frame: &str) -> String {
    let Some(open) = frame.find('(') else {
        return frame.to_string();
    };

    let head = &frame[..=open];
    if frame[open + 1..].starts_with(')') {
        format!("{head})")
    } else {
        format!("{head}{COLLAPSED_PARAMS}")
    }
}

fn strip_location(frame: &str) -> &str {
    match frame.find(')') {
        Some(close) => &frame[..=close],
        None => frame,
    }
}

/// Splits text on `\r\n`, `\n`, `\r`, form feed, NEL, and the Unicode line and
/// paragraph separators.
///
/// A trailing terminator yields a final empty line.
fn split_lines(text: &str) -> Lines<'_> {
    Lines { rest: Some(text) }
}

struct Lines<'a> {
    rest: Option<&'a str>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        match rest.char_indices().find(|(_, c)| is_line_terminator(*c)) {
            None => {
                self.rest = None;
                Some(rest)
            }
            Some((index, terminator)) => {
                let mut next = index + terminator.len_utf8();
                if terminator == '\r' && rest[next..].starts_with('\n') {
                    next += 1;
                }
                self.rest = Some(&rest[next..]);
                Some(&rest[..index])
            }
        }
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}
