//! Machine-name and user-name scrubbing.
//!
//! [`scrub`] applies one [`BoundaryTable`] to a buffer. [`Replacements`] is the
//! immutable machine/user table pair, and [`ScrubSession`] owns the current
//! pair and is the only place it can be replaced.

use std::sync::Arc;

use crate::boundary::BoundaryTable;
use crate::config::{ScrubConfig, DEFAULT_MACHINE_PLACEHOLDER, DEFAULT_USER_PLACEHOLDER};
use crate::error::Error;
use crate::stack_trace::StackTraceNormalizer;

/// Replaces occurrences of the table's value in `buffer`, in place.
///
/// If the whole buffer is the value (optionally wrapped in one leading and one
/// trailing boundary character) it is replaced outright. Otherwise every
/// occurrence with a boundary character on at least one side is replaced in a
/// single left-to-right pass over the original text. An occurrence glued to
/// non-boundary text on both sides is left alone, and so is one that overlaps
/// a placeholder already present in the buffer, which makes a second scrub a
/// no-op even when the value is part of the placeholder.
///
/// # Examples
///
/// ```
/// use snapshot_scrub::{scrub, BoundaryTable};
///
/// let table = BoundaryTable::new("alice", "TheUserName");
///
/// let mut buffer = String::from("user alice, not malice");
/// scrub(&mut buffer, &table);
/// assert_eq!(buffer, "user TheUserName, not malice");
///
/// let mut whole = String::from("alice");
/// scrub(&mut whole, &table);
/// assert_eq!(whole, "TheUserName");
/// ```
pub fn scrub(buffer: &mut String, table: &BoundaryTable) {
    scrub_guarded(buffer, table, &[table.placeholder()]);
}

/// Scrubs `buffer` with `table`, leaving every occurrence of a `guards`
/// string intact.
fn scrub_guarded(buffer: &mut String, table: &BoundaryTable, guards: &[&str]) {
    if table.is_empty() {
        return;
    }
    if let Some(replacement) = table.exact_replacement(buffer) {
        buffer.clear();
        buffer.push_str(replacement);
        return;
    }

    let value = table.value();
    let guarded = guarded_spans(buffer, guards);
    let mut output = String::with_capacity(buffer.len());
    let mut copied = 0;
    let mut from = 0;

    while let Some(offset) = buffer[from..].find(value) {
        let start = from + offset;
        let end = start + value.len();
        if table.delimits(buffer, start) && !splits_guard(&guarded, start, end) {
            output.push_str(&buffer[copied..start]);
            output.push_str(table.placeholder());
            copied = end;
            from = end;
        } else {
            from = start + buffer[start..].chars().next().map_or(1, char::len_utf8);
        }
    }

    if copied > 0 {
        output.push_str(&buffer[copied..]);
        *buffer = output;
    }
}

fn guarded_spans(text: &str, guards: &[&str]) -> Vec<(usize, usize)> {
    guards
        .iter()
        .filter(|guard| !guard.is_empty())
        .flat_map(move |guard| {
            text.match_indices(*guard)
                .map(|(start, found)| (start, start + found.len()))
        })
        .collect()
}

// An occurrence may contain a guard but must not cut into one.
fn splits_guard(guarded: &[(usize, usize)], start: usize, end: usize) -> bool {
    guarded.iter().any(|&(guard_start, guard_end)| {
        guard_start < end && start < guard_end && !(start <= guard_start && guard_end <= end)
    })
}

/// The machine-name and user-name tables in effect for a scrubbing session.
///
/// A `Replacements` value never changes after construction; share it across
/// threads with `Arc` and build a new one to pick up new names.
///
/// # Examples
///
/// ```
/// use snapshot_scrub::Replacements;
///
/// let replacements = Replacements::new("ci-runner-04", "builder");
///
/// let mut buffer = String::from("built on ci-runner-04 by builder");
/// replacements.scrub_all(&mut buffer);
/// assert_eq!(buffer, "built on TheMachineName by TheUserName");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacements {
    machine_name: BoundaryTable,
    user_name: BoundaryTable,
}

impl Replacements {
    /// Builds the tables with the default placeholders.
    pub fn new(machine_name: &str, user_name: &str) -> Self {
        Self {
            machine_name: BoundaryTable::new(machine_name, DEFAULT_MACHINE_PLACEHOLDER),
            user_name: BoundaryTable::new(user_name, DEFAULT_USER_PLACEHOLDER),
        }
    }

    /// Builds the tables from a validated configuration.
    pub fn from_config(config: &ScrubConfig) -> Self {
        Self {
            machine_name: BoundaryTable::new(config.machine_name(), config.machine_placeholder()),
            user_name: BoundaryTable::new(config.user_name(), config.user_placeholder()),
        }
    }

    /// Returns the machine-name table.
    pub fn machine_name(&self) -> &BoundaryTable {
        &self.machine_name
    }

    /// Returns the user-name table.
    pub fn user_name(&self) -> &BoundaryTable {
        &self.user_name
    }

    /// Replaces the machine name in `buffer`.
    ///
    /// Both placeholders are left intact, so the user placeholder is never
    /// scrubbed as if it held the machine name.
    pub fn scrub_machine_name(&self, buffer: &mut String) {
        scrub_guarded(buffer, &self.machine_name, &self.placeholders());
    }

    /// Replaces the user name in `buffer`.
    pub fn scrub_user_name(&self, buffer: &mut String) {
        scrub_guarded(buffer, &self.user_name, &self.placeholders());
    }

    /// Replaces the machine name, then the user name.
    pub fn scrub_all(&self, buffer: &mut String) {
        self.scrub_machine_name(buffer);
        self.scrub_user_name(buffer);
    }

    fn placeholders(&self) -> [&str; 2] {
        [self.machine_name.placeholder(), self.user_name.placeholder()]
    }
}

/// Owner of the replacement tables and stack-trace policy for a test run.
///
/// Resetting takes `&mut self`, so it cannot overlap with scrubs that borrow
/// the session. Threads that need to scrub concurrently take an
/// `Arc<Replacements>` via [`replacements`](Self::replacements); a later reset
/// swaps in a new pair and leaves their handle on the old, consistent one.
///
/// # Examples
///
/// ```
/// use snapshot_scrub::ScrubSession;
///
/// let mut session = ScrubSession::new("old-host", "old-user");
/// session.reset_replacements("new-host", "new-user");
///
/// let mut buffer = String::from("on new-host\n");
/// session.scrub_machine_name(&mut buffer);
/// assert_eq!(buffer, "on TheMachineName\n");
/// ```
#[derive(Debug, Clone)]
pub struct ScrubSession {
    replacements: Arc<Replacements>,
    machine_placeholder: String,
    user_placeholder: String,
    normalizer: StackTraceNormalizer,
}

impl ScrubSession {
    /// Creates a session with default placeholders that keeps trace parameters.
    pub fn new(machine_name: &str, user_name: &str) -> Self {
        tracing::debug!(
            machine_name_len = machine_name.len(),
            user_name_len = user_name.len(),
            "building scrub session"
        );
        Self {
            replacements: Arc::new(Replacements::new(machine_name, user_name)),
            machine_placeholder: DEFAULT_MACHINE_PLACEHOLDER.to_string(),
            user_placeholder: DEFAULT_USER_PLACEHOLDER.to_string(),
            normalizer: StackTraceNormalizer::default(),
        }
    }

    /// Creates a session from a validated configuration.
    pub fn from_config(config: &ScrubConfig) -> Self {
        tracing::debug!(
            machine_name_len = config.machine_name().len(),
            user_name_len = config.user_name().len(),
            remove_params = config.remove_params(),
            "building scrub session"
        );
        Self {
            replacements: Arc::new(Replacements::from_config(config)),
            machine_placeholder: config.machine_placeholder().to_string(),
            user_placeholder: config.user_placeholder().to_string(),
            normalizer: StackTraceNormalizer::new(config.remove_params()),
        }
    }

    /// Creates a session from the machine and user names in the environment.
    ///
    /// # Errors
    ///
    /// Fails if either name cannot be resolved; see
    /// [`ScrubConfig::from_env`].
    pub fn from_env() -> Result<Self, Error> {
        let config = ScrubConfig::from_env()?;
        Ok(Self::from_config(&config))
    }

    /// Rebuilds both tables for new names and swaps them in.
    ///
    /// Placeholders and the stack-trace policy are unchanged.
    pub fn reset_replacements(&mut self, machine_name: &str, user_name: &str) {
        tracing::debug!(
            machine_name_len = machine_name.len(),
            user_name_len = user_name.len(),
            "resetting scrub replacements"
        );
        self.replacements = Arc::new(Replacements {
            machine_name: BoundaryTable::new(machine_name, self.machine_placeholder.as_str()),
            user_name: BoundaryTable::new(user_name, self.user_placeholder.as_str()),
        });
    }

    /// Returns a shared handle to the current tables.
    pub fn replacements(&self) -> Arc<Replacements> {
        Arc::clone(&self.replacements)
    }

    /// Returns the stack-trace normalizer for this session.
    pub fn normalizer(&self) -> StackTraceNormalizer {
        self.normalizer
    }

    /// Replaces the machine name in `buffer`.
    pub fn scrub_machine_name(&self, buffer: &mut String) {
        self.replacements.scrub_machine_name(buffer);
    }

    /// Replaces the user name in `buffer`.
    pub fn scrub_user_name(&self, buffer: &mut String) {
        self.replacements.scrub_user_name(buffer);
    }

    /// Normalizes a stack trace with the session's parameter policy.
    pub fn scrub_stack_trace(&self, trace: &str) -> String {
        self.normalizer.normalize(trace)
    }
}
