// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration for a power distribution unit.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// SNMP security level derived from the configured keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityLevel {
    /// Community-string access, no user keys.
    NoAuthNoPriv,
    /// Authenticated user without encryption.
    AuthNoPriv,
    /// Authenticated and encrypted user.
    AuthPriv,
}

/// Parameters needed to open a connection to the device.
///
/// These are handed to [`PduClient::initialize`](crate::protocol::PduClient::initialize).
/// Missing fields take the documented defaults when deserialized.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Hostname or IP address of the device.
    pub host: String,
    /// SNMP port.
    #[serde(default = "ConnectionParams::default_port")]
    pub port: u16,
    /// SNMP community string.
    #[serde(default = "ConnectionParams::default_community")]
    pub community: String,
    /// SNMP user name.
    #[serde(default = "ConnectionParams::default_username")]
    pub username: String,
    /// Authentication key for secure SNMP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_key: Option<String>,
    /// Privacy (encryption) key for secure SNMP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priv_key: Option<String>,
}

impl ConnectionParams {
    /// Default SNMP port.
    pub const DEFAULT_PORT: u16 = 161;
    /// Default community string.
    pub const DEFAULT_COMMUNITY: &'static str = "private";
    /// Default user name.
    pub const DEFAULT_USERNAME: &'static str = "administrator";

    /// Creates parameters for the specified host with default credentials.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            community: Self::DEFAULT_COMMUNITY.to_string(),
            username: Self::DEFAULT_USERNAME.to_string(),
            auth_key: None,
            priv_key: None,
        }
    }

    fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    fn default_community() -> String {
        Self::DEFAULT_COMMUNITY.to_string()
    }

    fn default_username() -> String {
        Self::DEFAULT_USERNAME.to_string()
    }

    /// Returns the security level implied by the configured keys.
    #[must_use]
    pub fn security_level(&self) -> SecurityLevel {
        match (&self.auth_key, &self.priv_key) {
            (Some(_), Some(_)) => SecurityLevel::AuthPriv,
            (Some(_), None) => SecurityLevel::AuthNoPriv,
            (None, _) => SecurityLevel::NoAuthNoPriv,
        }
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Keys and community are secrets; keep them out of logs.
impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("security_level", &self.security_level())
            .finish_non_exhaustive()
    }
}

/// Full configuration of one power distribution unit.
///
/// # Examples
///
/// ```
/// use aten_pe::PduConfig;
/// use std::time::Duration;
///
/// // Defaults: port 161, community "private", user "administrator"
/// let config = PduConfig::new("10.0.0.5");
///
/// // With all options
/// let config = PduConfig::new("10.0.0.5")
///     .with_port(1161)
///     .with_community("public")
///     .with_username("admin")
///     .with_auth_key("auth-secret")
///     .with_priv_key("priv-secret")
///     .with_timeout(Duration::from_secs(5))
///     .with_scan_interval(Duration::from_secs(60));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PduConfig {
    /// Connection parameters.
    #[serde(flatten)]
    pub connection: ConnectionParams,
    /// Upper bound for every device call.
    #[serde(
        default = "PduConfig::default_timeout",
        rename = "timeout_secs",
        with = "duration_secs"
    )]
    pub timeout: Duration,
    /// Period between two status polls.
    #[serde(
        default = "PduConfig::default_scan_interval",
        rename = "scan_interval_secs",
        with = "duration_secs"
    )]
    pub scan_interval: Duration,
}

impl PduConfig {
    /// Default device call timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default status poll period.
    pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(30);

    /// Creates a configuration for the specified host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            connection: ConnectionParams::new(host),
            timeout: Self::DEFAULT_TIMEOUT,
            scan_interval: Self::DEFAULT_SCAN_INTERVAL,
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is malformed or lacks a
    /// host, or the validation error if the values are out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn default_timeout() -> Duration {
        Self::DEFAULT_TIMEOUT
    }

    fn default_scan_interval() -> Duration {
        Self::DEFAULT_SCAN_INTERVAL
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.connection.port = port;
        self
    }

    /// Sets the community string.
    #[must_use]
    pub fn with_community(mut self, community: impl Into<String>) -> Self {
        self.connection.community = community.into();
        self
    }

    /// Sets the user name.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.connection.username = username.into();
        self
    }

    /// Sets the authentication key.
    #[must_use]
    pub fn with_auth_key(mut self, key: impl Into<String>) -> Self {
        self.connection.auth_key = Some(key.into());
        self
    }

    /// Sets the privacy key.
    #[must_use]
    pub fn with_priv_key(mut self, key: impl Into<String>) -> Self {
        self.connection.priv_key = Some(key.into());
        self
    }

    /// Sets the device call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the status poll period.
    #[must_use]
    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.connection.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.connection.port
    }

    /// Checks that the configuration can be used to open a session.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingHost`] if the host is blank
    /// - [`ConfigError::InvalidPort`] if the port is 0
    /// - [`ConfigError::ZeroDuration`] if the timeout or scan interval is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection.host.trim().is_empty() {
            return Err(ConfigError::MissingHost);
        }
        if self.connection.port == 0 {
            return Err(ConfigError::InvalidPort(0));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("timeout"));
        }
        if self.scan_interval.is_zero() {
            return Err(ConfigError::ZeroDuration("scan interval"));
        }
        Ok(())
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
