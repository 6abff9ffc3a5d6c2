// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `aten_pe` library.
//!
//! This module separates failures into three layers: configuration
//! validation, device communication, and the bootstrap outcome reported to
//! the host (a retryable "not ready" signal).

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during device communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The supplied configuration is invalid.
    ///
    /// This is a permanent failure: retrying with the same configuration
    /// will fail the same way.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The device could not be bootstrapped and setup should be retried later.
    #[error("device {host}:{port} is not ready: {source}")]
    NotReady {
        /// Host of the device that failed.
        host: String,
        /// Port of the device that failed.
        port: u16,
        /// The underlying communication failure.
        #[source]
        source: ProtocolError,
    },

    /// The device session has been closed.
    #[error("device session is not connected")]
    NotConnected,
}

impl Error {
    /// Returns `true` if the operation may succeed when retried later.
    ///
    /// Bootstrap failures and transient communication failures are
    /// retryable. Configuration errors, rejected commands and closed
    /// sessions are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NotReady { .. } => true,
            Self::Protocol(e) => e.is_transient(),
            Self::Config(_) | Self::NotConnected => false,
        }
    }
}

/// Errors reported by a [`PduClient`](crate::protocol::PduClient) or raised
/// while waiting on one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The device refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The blocking worker running a device call panicked or was cancelled.
    #[error("worker task failed: {0}")]
    TaskFailed(String),
}

impl ProtocolError {
    /// Returns `true` for failures that are likely to clear up on their own.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Timeout(_) | Self::TaskFailed(_)
        )
    }
}

/// Errors related to configuration validation and parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The host is empty.
    #[error("host must not be empty")]
    MissingHost,

    /// The port is outside the valid range.
    #[error("port {0} is out of range [1, 65535]")]
    InvalidPort(u16),

    /// A timeout or interval was set to zero.
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ready_display_names_device() {
        let err = Error::NotReady {
            host: "10.0.0.5".to_string(),
            port: 161,
            source: ProtocolError::ConnectionFailed("no route to host".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "device 10.0.0.5:161 is not ready: connection failed: no route to host"
        );
    }

    #[test]
    fn not_ready_is_retryable() {
        let err = Error::NotReady {
            host: "pdu".to_string(),
            port: 161,
            source: ProtocolError::AuthenticationFailed,
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn config_error_is_permanent() {
        let err: Error = ConfigError::MissingHost.into();
        assert!(!err.is_retryable());
        assert!(matches!(err, Error::Config(ConfigError::MissingHost)));
    }

    #[test]
    fn protocol_transience() {
        assert!(ProtocolError::Timeout(500).is_transient());
        assert!(!ProtocolError::Rejected("bad outlet".to_string()).is_transient());
        assert!(!Error::from(ProtocolError::AuthenticationFailed).is_retryable());
    }

    #[test]
    fn timeout_display() {
        assert_eq!(
            ProtocolError::Timeout(10_000).to_string(),
            "request timed out after 10000 ms"
        );
    }
}
