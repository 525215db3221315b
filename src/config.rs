//! Session configuration.
//!
//! [`ScrubConfig`] gathers the inputs a scrubbing session needs: the machine
//! and user names to redact, the placeholders that replace them, and the
//! stack-trace parameter policy. It is built either explicitly through
//! [`ScrubConfig::builder`] or from the process environment, falling back to
//! the operating system when no variable names the host or user.

use crate::error::{Error, ErrorKind};

/// Placeholder substituted for the machine name by default.
pub const DEFAULT_MACHINE_PLACEHOLDER: &str = "TheMachineName";

/// Placeholder substituted for the user name by default.
pub const DEFAULT_USER_PLACEHOLDER: &str = "TheUserName";

const MACHINE_NAME_VARS: [&str; 2] = ["COMPUTERNAME", "HOSTNAME"];
const USER_NAME_VARS: [&str; 2] = ["USERNAME", "USER"];

/// Which name a fallback source is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// The local machine name.
    Machine,
    /// The local user name.
    User,
}

/// Validated configuration for a [`ScrubSession`](crate::ScrubSession).
///
/// # Examples
///
/// ```
/// use snapshot_scrub::ScrubConfig;
///
/// let config = ScrubConfig::builder()
///     .machine_name("ci-runner-04")
///     .user_name("builder")
///     .remove_params(true)
///     .build()
///     .expect("names supplied");
///
/// assert_eq!(config.machine_name(), "ci-runner-04");
/// assert_eq!(config.machine_placeholder(), "TheMachineName");
/// assert!(config.remove_params());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubConfig {
    machine_name: String,
    user_name: String,
    machine_placeholder: String,
    user_placeholder: String,
    remove_params: bool,
}

impl ScrubConfig {
    /// Starts a builder with default placeholders and `remove_params = false`.
    pub fn builder() -> ScrubConfigBuilder {
        ScrubConfigBuilder::default()
    }

    /// Reads the machine and user names from the process environment.
    ///
    /// The machine name comes from `COMPUTERNAME`, then `HOSTNAME`; the user
    /// name from `USERNAME`, then `USER`. Empty variables count as unset.
    /// When none is set the name is asked from the operating system.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingMachineName`] or
    /// [`ErrorKind::MissingUserName`] when neither the environment nor the
    /// operating system yields a name.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup_with_fallback(|key| std::env::var(key).ok(), system_name)
    }

    /// Like [`from_env`](Self::from_env), but resolves variables through
    /// `lookup` instead of the real environment and never asks the operating
    /// system.
    ///
    /// # Examples
    ///
    /// ```
    /// use snapshot_scrub::ScrubConfig;
    ///
    /// let config = ScrubConfig::from_lookup(|key| match key {
    ///     "HOSTNAME" => Some("devbox".to_string()),
    ///     "USER" => Some("sam".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.machine_name(), "devbox");
    /// assert_eq!(config.user_name(), "sam");
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        Self::from_lookup_with_fallback(lookup, |_| None)
    }

    /// Resolves variables through `lookup`, then asks `fallback` for any
    /// name no variable supplied.
    ///
    /// # Examples
    ///
    /// ```
    /// use snapshot_scrub::{NameKind, ScrubConfig};
    ///
    /// let config = ScrubConfig::from_lookup_with_fallback(
    ///     |key| (key == "USER").then(|| "sam".to_string()),
    ///     |kind| match kind {
    ///         NameKind::Machine => Some("devbox".to_string()),
    ///         NameKind::User => None,
    ///     },
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(config.machine_name(), "devbox");
    /// assert_eq!(config.user_name(), "sam");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingMachineName`] or
    /// [`ErrorKind::MissingUserName`] when both sources come up empty.
    pub fn from_lookup_with_fallback(
        lookup: impl Fn(&str) -> Option<String>,
        fallback: impl Fn(NameKind) -> Option<String>,
    ) -> Result<Self, Error> {
        let machine_name = resolve(&lookup, &fallback, NameKind::Machine, &MACHINE_NAME_VARS)
            .ok_or_else(|| {
                tracing::warn!(candidates = ?MACHINE_NAME_VARS, "machine name not found");
                Error::new(
                    ErrorKind::MissingMachineName,
                    format!(
                        "none of {} is set and no fallback name was found",
                        MACHINE_NAME_VARS.join(", ")
                    ),
                )
            })?;
        let user_name = resolve(&lookup, &fallback, NameKind::User, &USER_NAME_VARS)
            .ok_or_else(|| {
                tracing::warn!(candidates = ?USER_NAME_VARS, "user name not found");
                Error::new(
                    ErrorKind::MissingUserName,
                    format!(
                        "none of {} is set and no fallback name was found",
                        USER_NAME_VARS.join(", ")
                    ),
                )
            })?;

        Self::builder()
            .machine_name(machine_name)
            .user_name(user_name)
            .build()
    }

    /// Returns the machine name to redact.
    pub fn machine_name(&self) -> &str {
        &self.machine_name
    }

    /// Returns the user name to redact.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Returns the placeholder for the machine name.
    pub fn machine_placeholder(&self) -> &str {
        &self.machine_placeholder
    }

    /// Returns the placeholder for the user name.
    pub fn user_placeholder(&self) -> &str {
        &self.user_placeholder
    }

    /// Returns whether stack-trace frames have their parameter lists collapsed.
    pub fn remove_params(&self) -> bool {
        self.remove_params
    }
}

fn resolve(
    lookup: &impl Fn(&str) -> Option<String>,
    fallback: &impl Fn(NameKind) -> Option<String>,
    kind: NameKind,
    keys: &[&str],
) -> Option<String> {
    if let Some(value) = first_set(lookup, keys) {
        return Some(value);
    }
    tracing::debug!(?kind, candidates = ?keys, "no variable set, asking the system");
    fallback(kind).filter(|value| !value.is_empty())
}

fn first_set(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| lookup(*key))
        .find(|value| !value.is_empty())
}

fn system_name(kind: NameKind) -> Option<String> {
    let name = match kind {
        NameKind::Machine => whoami::fallible::hostname(),
        NameKind::User => whoami::fallible::username(),
    };
    name.ok()
}

/// Builder for [`ScrubConfig`].
#[derive(Debug, Clone)]
pub struct ScrubConfigBuilder {
    machine_name: Option<String>,
    user_name: Option<String>,
    machine_placeholder: String,
    user_placeholder: String,
    remove_params: bool,
}

impl Default for ScrubConfigBuilder {
    fn default() -> Self {
        Self {
            machine_name: None,
            user_name: None,
            machine_placeholder: DEFAULT_MACHINE_PLACEHOLDER.to_string(),
            user_placeholder: DEFAULT_USER_PLACEHOLDER.to_string(),
            remove_params: false,
        }
    }
}

impl ScrubConfigBuilder {
    /// Sets the machine name to redact.
    pub fn machine_name(mut self, name: impl Into<String>) -> Self {
        self.machine_name = Some(name.into());
        self
    }

    /// Sets the user name to redact.
    pub fn user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }

    /// Overrides the machine-name placeholder.
    pub fn machine_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.machine_placeholder = placeholder.into();
        self
    }

    /// Overrides the user-name placeholder.
    pub fn user_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.user_placeholder = placeholder.into();
        self
    }

    /// Sets the stack-trace parameter policy.
    pub fn remove_params(mut self, remove_params: bool) -> Self {
        self.remove_params = remove_params;
        self
    }

    /// Validates the builder and produces a [`ScrubConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if either name was never supplied, or if either
    /// placeholder is empty.
    pub fn build(self) -> Result<ScrubConfig, Error> {
        let machine_name = self.machine_name.ok_or_else(|| {
            Error::new(ErrorKind::MissingMachineName, "machine name was not supplied")
        })?;
        let user_name = self
            .user_name
            .ok_or_else(|| Error::new(ErrorKind::MissingUserName, "user name was not supplied"))?;

        if self.machine_placeholder.is_empty() {
            return Err(Error::new(
                ErrorKind::EmptyPlaceholder,
                "machine placeholder must not be empty",
            ));
        }
        if self.user_placeholder.is_empty() {
            return Err(Error::new(
                ErrorKind::EmptyPlaceholder,
                "user placeholder must not be empty",
            ));
        }

        Ok(ScrubConfig {
            machine_name,
            user_name,
            machine_placeholder: self.machine_placeholder,
            user_placeholder: self.user_placeholder,
            remove_params: self.remove_params,
        })
    }
}
