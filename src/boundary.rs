//! Boundary-delimited replacement tables.
//!
//! A sensitive value is only replaced where it is delimited by a boundary
//! character, so that e.g. a machine name of `build` does not corrupt the word
//! `rebuild`. [`BoundaryTable`] precomputes every wrapped variant of a value
//! once, so scrubbing never has to reason about boundaries at match time.

use std::collections::HashMap;

/// Characters that delimit a sensitive value from surrounding text.
///
/// Every pair of substring keys built from this set differs in its boundary
/// character, which keeps [`BoundaryTable::substring_pairs`] order-independent.
/// Extending the set requires re-checking that property.
pub const BOUNDARY_CHARS: [char; 4] = [' ', '\t', '\n', '\r'];

/// Precomputed replacement tables for one sensitive value.
///
/// The table is immutable once built. It holds two maps:
///
/// - an **exact** map, consulted when the whole buffer is the value, bare or
///   wrapped in one leading and one trailing boundary character;
/// - a **substring** list of single-sided pairs (`b + value`, `value + b`)
///   used for occurrences in the middle of a larger buffer.
///
/// # Examples
///
/// ```
/// use snapshot_scrub::BoundaryTable;
///
/// let table = BoundaryTable::new("build-agent-7", "TheMachineName");
///
/// assert_eq!(table.exact_replacement("build-agent-7"), Some("TheMachineName"));
/// assert_eq!(table.exact_replacement(" build-agent-7\n"), Some(" TheMachineName\n"));
/// assert_eq!(table.exact_replacement("xbuild-agent-7"), None);
/// assert_eq!(table.substring_pairs().count(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryTable {
    value: String,
    placeholder: String,
    exact: HashMap<String, String>,
    substring: Vec<SubstringPair>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SubstringPair {
    key: String,
    replacement: String,
    // byte offset of the value inside `key`
    value_start: usize,
}

impl BoundaryTable {
    /// Builds the exact and substring tables for `value`.
    ///
    /// An empty `value` yields empty tables; scrubbing with such a table
    /// leaves every buffer untouched.
    pub fn new(value: impl Into<String>, placeholder: impl Into<String>) -> Self {
        let value = value.into();
        let placeholder = placeholder.into();

        if value.is_empty() {
            return Self {
                value,
                placeholder,
                exact: HashMap::new(),
                substring: Vec::new(),
            };
        }

        let mut substring = Vec::with_capacity(BOUNDARY_CHARS.len() * 2);
        for boundary in BOUNDARY_CHARS {
            substring.push(SubstringPair {
                key: format!("{boundary}{value}"),
                replacement: format!("{boundary}{placeholder}"),
                value_start: boundary.len_utf8(),
            });
            substring.push(SubstringPair {
                key: format!("{value}{boundary}"),
                replacement: format!("{placeholder}{boundary}"),
                value_start: 0,
            });
        }

        let mut exact = HashMap::with_capacity(1 + BOUNDARY_CHARS.len() * BOUNDARY_CHARS.len());
        exact.insert(value.clone(), placeholder.clone());
        for before in BOUNDARY_CHARS {
            for after in BOUNDARY_CHARS {
                exact.insert(
                    format!("{before}{value}{after}"),
                    format!("{before}{placeholder}{after}"),
                );
            }
        }

        Self {
            value,
            placeholder,
            exact,
            substring,
        }
    }

    /// Returns the sensitive value this table replaces.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the placeholder substituted for the value.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Returns `true` if the table was built from an empty value.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Looks up a whole-buffer replacement.
    ///
    /// Returns the placeholder form when `text` is exactly the value, possibly
    /// wrapped in one leading and one trailing boundary character.
    pub fn exact_replacement(&self, text: &str) -> Option<&str> {
        self.exact.get(text).map(String::as_str)
    }

    /// Iterates over the single-sided `(key, replacement)` pairs.
    pub fn substring_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.substring
            .iter()
            .map(|pair| (pair.key.as_str(), pair.replacement.as_str()))
    }

    /// Returns `true` if the value occurrence starting at byte `start` of
    /// `text` is matched by one of the substring keys.
    pub(crate) fn delimits(&self, text: &str, start: usize) -> bool {
        self.substring.iter().any(|pair| {
            start
                .checked_sub(pair.value_start)
                .and_then(|at| text.get(at..))
                .is_some_and(|rest| rest.starts_with(pair.key.as_str()))
        })
    }
}
