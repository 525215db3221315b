//! Deterministic scrubbing of environment-dependent text for snapshot tests.
//!
//! Recorded test output often contains fragments that differ between
//! machines and runs. This crate normalizes them so snapshots compare equal
//! everywhere:
//! - **Value scrubbing**: the local machine and user names are replaced by
//!   stable placeholders wherever they stand apart from surrounding text
//! - **Stack-trace normalization**: generated and plumbing frames are dropped,
//!   source locations or parameter lists are stripped, and nested-type
//!   separators are flattened
//!
//! # Core Types
//!
//! - [`BoundaryTable`]: Precomputed boundary-aware variants of one value
//! - [`Replacements`]: Immutable machine-name/user-name table pair
//! - [`ScrubSession`]: Owner of the current tables; the only place they are reset
//! - [`StackTraceNormalizer`]: Line-oriented trace normalizer
//! - [`ScrubConfig`]: Validated session configuration
//!
//! # Examples
//!
//! ```
//! use snapshot_scrub::{ScrubConfig, ScrubSession};
//!
//! let config = ScrubConfig::builder()
//!     .machine_name("build-07")
//!     .user_name("jenkins")
//!     .build()
//!     .expect("names supplied");
//! let session = ScrubSession::from_config(&config);
//!
//! let mut field = String::from("checked out by jenkins on build-07");
//! session.scrub_machine_name(&mut field);
//! session.scrub_user_name(&mut field);
//! assert_eq!(field, "checked out by TheUserName on TheMachineName");
//!
//! let trace = "System.Exception: boom\n   at Outer+Inner.Run() in /ws/Run.cs:line 3\n";
//! assert_eq!(
//!     session.scrub_stack_trace(trace),
//!     "System.Exception: boom\nat Outer.Inner.Run()"
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod boundary;
mod classify;
mod config;
mod error;
mod scrubber;
mod stack_trace;

#[cfg(test)]
pub(crate) mod test_utils;

pub use boundary::{BoundaryTable, BOUNDARY_CHARS};
pub use classify::{
    classify_line, is_rethrow_boundary, is_state_machine_frame, is_task_awaiter_frame,
    is_throw_helper_frame, LineKind, FRAME_PREFIX,
};
pub use config::{
    NameKind, ScrubConfig, ScrubConfigBuilder, DEFAULT_MACHINE_PLACEHOLDER,
    DEFAULT_USER_PLACEHOLDER,
};
pub use error::{Error, ErrorKind};
pub use scrubber::{scrub, Replacements, ScrubSession};
pub use stack_trace::{normalize_frame, scrub_stack_trace, StackTraceNormalizer};
