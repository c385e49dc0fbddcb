//! Error aliases and the `ErrorType` tag that command handlers attach to failures.
//!
//! Internally everything is an `anyhow::Error` with context. At the command boundary, failures are
//! tagged with an `ErrorType` so that `main` can choose an exit code without parsing messages.

use serde::{Deserialize, Serialize};
use std::process::ExitCode;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of a failure that escaped a command handler.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The data directory or `config.json` is missing or invalid.
    Config,
    /// The SQLite store failed.
    Database,
    /// The input file could not be read or held no usable rows.
    Import,
    /// The command arguments were inconsistent.
    Request,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

impl ErrorType {
    /// The process exit code used when a command fails with this kind of error.
    pub fn exit_code(self) -> ExitCode {
        match self {
            ErrorType::Config => ExitCode::from(2),
            ErrorType::Database => ExitCode::from(3),
            ErrorType::Import => ExitCode::from(4),
            ErrorType::Request => ExitCode::from(5),
        }
    }
}

/// Finds the `ErrorType` tag attached by `pub_result`, if any.
pub fn error_type(e: &Error) -> Option<ErrorType> {
    e.downcast_ref::<ErrorType>().copied()
}

/// Tags the error side of a `Result` with an `ErrorType` before it leaves a public command.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.into().context(error_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_pub_result_tags_error() {
        let r: std::result::Result<(), Error> = Err(anyhow!("disk on fire"));
        let e = r.pub_result(ErrorType::Database).unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Database));
        assert!(format!("{e:#}").contains("disk on fire"));
    }

    #[test]
    fn test_untagged_error() {
        let e = anyhow!("plain");
        assert_eq!(error_type(&e), None);
    }

    #[test]
    fn test_error_type_display() {
        assert_eq!(ErrorType::Import.to_string(), "import");
        assert_eq!("config".parse::<ErrorType>().unwrap(), ErrorType::Config);
    }
}
