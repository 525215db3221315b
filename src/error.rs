use std::fmt;

/// Errors that can occur while configuring a scrubbing session.
///
/// Scrubbing and stack-trace normalization themselves never fail; only
/// resolving the machine/user names and validating placeholders can.
///
/// # Examples
///
/// ```
/// use snapshot_scrub::{Error, ErrorKind};
///
/// let error = Error::new(ErrorKind::MissingUserName, "no user variable set");
/// assert_eq!(error.kind(), ErrorKind::MissingUserName);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    /// Creates a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scrub configuration failed ({}): {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

/// Kind of configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No machine name was supplied and none could be read from the environment.
    MissingMachineName,
    /// No user name was supplied and none could be read from the environment.
    MissingUserName,
    /// A placeholder was empty, which would erase values instead of replacing them.
    EmptyPlaceholder,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMachineName => write!(f, "missing machine name"),
            Self::MissingUserName => write!(f, "missing user name"),
            Self::EmptyPlaceholder => write!(f, "empty placeholder"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_accessors() {
        let error = Error::new(ErrorKind::EmptyPlaceholder, "machine placeholder");

        assert_eq!(error.kind(), ErrorKind::EmptyPlaceholder);
        assert_eq!(error.message(), "machine placeholder");
    }

    #[test]
    fn error_display() {
        let error = Error::new(ErrorKind::MissingMachineName, "checked COMPUTERNAME, HOSTNAME");
        let output = format!("{}", error);

        assert!(output.contains("scrub configuration failed"));
        assert!(output.contains("missing machine name"));
        assert!(output.contains("HOSTNAME"));
    }

    #[test]
    fn error_kinds_display() {
        assert_eq!(
            format!("{}", ErrorKind::MissingMachineName),
            "missing machine name"
        );
        assert_eq!(format!("{}", ErrorKind::MissingUserName), "missing user name");
        assert_eq!(format!("{}", ErrorKind::EmptyPlaceholder), "empty placeholder");
    }
}
