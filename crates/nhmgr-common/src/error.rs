//! Error types for next-hop manager operations.
//!
//! All errors implement `std::error::Error` via `thiserror`. Per-entry
//! conditions (bad index, malformed address) are recovered locally by the
//! manager; only arithmetic overflow aborts an allocation attempt.

use std::io;
use thiserror::Error;

/// Result type alias for next-hop manager operations.
pub type NhMgrResult<T> = Result<T, NhMgrError>;

/// Errors that can occur while managing a next-hop group.
#[derive(Debug, Error)]
pub enum NhMgrError {
    /// A configuration entry could not be parsed (bad ordinal index).
    #[error("Invalid configuration entry '{key}': {message}")]
    ConfigParse {
        /// The offending configuration key.
        key: String,
        /// Error message.
        message: String,
    },

    /// A next-hop address string is not a valid IP address.
    #[error("Invalid next-hop address: '{address}'")]
    AddressParse {
        /// The raw address string.
        address: String,
    },

    /// The LCM slot table would be too large to compute or materialize.
    #[error("Slot table overflow computing lcm(1..{nexthops}) next-hops")]
    Overflow {
        /// Number of configured next-hops.
        nexthops: usize,
    },

    /// Failed to execute a shell command (spawn error).
    #[error("Failed to execute shell command '{command}': {source}")]
    ShellExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Shell command returned non-zero exit code.
    #[error("Shell command failed: '{command}' (exit code {exit_code}): {output}")]
    ShellCommandFailed {
        /// The command that failed.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// Combined stdout/stderr output.
        output: String,
    },

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl NhMgrError {
    /// Creates a configuration parse error.
    pub fn config_parse(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates an address parse error.
    pub fn address_parse(address: impl Into<String>) -> Self {
        Self::AddressParse {
            address: address.into(),
        }
    }

    /// Creates a slot table overflow error.
    pub fn overflow(nexthops: usize) -> Self {
        Self::Overflow { nexthops }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_display() {
        let err = NhMgrError::config_parse("7f", "not an integer");
        assert_eq!(
            err.to_string(),
            "Invalid configuration entry '7f': not an integer"
        );
    }

    #[test]
    fn test_address_parse_display() {
        let err = NhMgrError::address_parse("10.0.0.999");
        assert_eq!(err.to_string(), "Invalid next-hop address: '10.0.0.999'");
    }

    #[test]
    fn test_overflow_display() {
        let err = NhMgrError::overflow(100);
        assert!(err.to_string().contains("lcm(1..100)"));
    }

    #[test]
    fn test_shell_command_failed() {
        let err = NhMgrError::ShellCommandFailed {
            command: "ip route replace default".to_string(),
            exit_code: 2,
            output: "Operation not permitted".to_string(),
        };
        assert!(err.to_string().contains("ip route replace"));
        assert!(err.to_string().contains("exit code 2"));
    }
}
