//! Per-line classification of stack-trace text.
//!
//! Each heuristic is a standalone predicate so new generated-frame shapes can
//! be recognized without touching the normalizer loop.

/// Prefix that marks a call-frame line once leading whitespace is removed.
pub const FRAME_PREFIX: &str = "at ";

const STATE_MACHINE_ANGLES: &str = "<>";
const STATE_MACHINE_MOVE_NEXT: &str = ".MoveNext()";
const TASK_AWAITER: &str = "System.Runtime.CompilerServices.TaskAwaiter";
const RETHROW_BOUNDARY: &str =
    "End of stack trace from previous location where exception was thrown";
const THROW_HELPER_PREFIXES: [&str; 2] = ["at InnerVerifier.Throws", "at InnerVerifier.<Throws"];

/// Outcome of classifying one line of a stack trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// The line contributes nothing to the output.
    Ignored,
    /// A non-frame line (exception header, message, separator), left-trimmed.
    Passthrough(&'a str),
    /// A call-frame line, left-trimmed and starting with [`FRAME_PREFIX`].
    Frame(&'a str),
}

/// Classifies a single raw line of stack-trace text.
///
/// Rules apply in order: generated/plumbing lines are ignored outright, lines
/// that are not frames pass through, the library's own throw-helper frames
/// are ignored, and everything else is a frame.
///
/// # Examples
///
/// ```
/// use snapshot_scrub::{classify_line, LineKind};
///
/// assert_eq!(
///     classify_line("System.Exception: boom"),
///     LineKind::Passthrough("System.Exception: boom")
/// );
/// assert_eq!(classify_line("   at Foo.Bar()"), LineKind::Frame("at Foo.Bar()"));
/// assert_eq!(classify_line("   at InnerVerifier.Throws(Action)"), LineKind::Ignored);
/// ```
pub fn classify_line(line: &str) -> LineKind<'_> {
    if is_state_machine_frame(line) || is_task_awaiter_frame(line) || is_rethrow_boundary(line) {
        return LineKind::Ignored;
    }

    let trimmed = line.trim_start();
    if !trimmed.starts_with(FRAME_PREFIX) {
        return LineKind::Passthrough(trimmed);
    }

    if is_throw_helper_frame(trimmed) {
        return LineKind::Ignored;
    }

    LineKind::Frame(trimmed)
}

/// Returns `true` for frames emitted by compiler-generated async or iterator
/// state machines (`<>` together with `.MoveNext()`).
pub fn is_state_machine_frame(line: &str) -> bool {
    line.contains(STATE_MACHINE_ANGLES) && line.contains(STATE_MACHINE_MOVE_NEXT)
}

/// Returns `true` for the runtime's task-await plumbing frames.
pub fn is_task_awaiter_frame(line: &str) -> bool {
    line.contains(TASK_AWAITER)
}

/// Returns `true` for the notice the runtime inserts where an exception was
/// captured and rethrown.
pub fn is_rethrow_boundary(line: &str) -> bool {
    line.contains(RETHROW_BOUNDARY)
}

/// Returns `true` for the assertion library's own throwing entry points.
///
/// Expects a left-trimmed line.
pub fn is_throw_helper_frame(trimmed: &str) -> bool {
    THROW_HELPER_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(*prefix))
}
