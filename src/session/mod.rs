// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device session management.
//!
//! A [`DeviceSession`] owns an initialized [`PduClient`] and bounds every
//! call made through it by the configured timeout. Switches share one
//! session through an `Arc`.
//!
//! # Lifecycle
//!
//! 1. [`DeviceSession::initialize`] runs the client's blocking
//!    `initialize` on tokio's blocking pool
//! 2. [`fetch_identity`](DeviceSession::fetch_identity) and
//!    [`outlets`](DeviceSession::outlets) discover the device
//! 3. switches issue commands and status queries concurrently
//! 4. [`close`](DeviceSession::close) releases the transport; later calls
//!    fail with [`Error::NotConnected`]
//!
//! ```no_run
//! use aten_pe::protocol::SimulatedPdu;
//! use aten_pe::{DeviceSession, PduConfig};
//!
//! # async fn example() -> aten_pe::Result<()> {
//! let pdu = SimulatedPdu::new("AA:BB:CC:DD:EE:FF").with_outlet("0.0.1", Some("Router"));
//! let session = DeviceSession::initialize(&PduConfig::new("10.0.0.5"), pdu).await?;
//!
//! let identity = session.fetch_identity().await?;
//! let outlets = session.outlets().collect().await?;
//! println!("{} has {} outlets", identity.name, outlets.len());
//!
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

mod outlet_walk;

pub use outlet_walk::OutletWalk;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::{ConnectionParams, PduConfig};
use crate::error::{Error, ProtocolError, Result};
use crate::identity::DeviceIdentity;
use crate::protocol::PduClient;
use crate::types::{OutletCommand, OutletId};

/// An initialized connection to one power distribution unit.
#[derive(Debug)]
pub struct DeviceSession<C: PduClient> {
    client: C,
    params: ConnectionParams,
    timeout: Duration,
    connected: AtomicBool,
}

impl<C: PduClient> DeviceSession<C> {
    /// Validates `config` and initializes `client` against it.
    ///
    /// The client's blocking `initialize` runs on a worker thread. If it does
    /// not finish within the configured timeout the session is abandoned;
    /// the worker thread itself cannot be interrupted and finishes in the
    /// background.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an invalid configuration and
    /// [`Error::Protocol`] if the client fails, panics, or times out.
    pub async fn initialize(config: &PduConfig, mut client: C) -> Result<Self> {
        config.validate()?;

        let params = config.connection.clone();
        let worker_params = params.clone();

        if params.priv_key.is_some() && params.auth_key.is_none() {
            tracing::warn!(
                host = %params.host,
                "Privacy key is ignored without an authentication key"
            );
        }
        tracing::debug!(host = %params.host, port = params.port, "Initializing device transport");

        let task = tokio::task::spawn_blocking(move || {
            client.initialize(&worker_params).map(|()| client)
        });

        let client = match tokio::time::timeout(config.timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_error)) => {
                return Err(ProtocolError::TaskFailed(join_error.to_string()).into());
            }
            Err(_) => return Err(ProtocolError::Timeout(millis(config.timeout)).into()),
        };

        Ok(Self {
            client,
            params,
            timeout: config.timeout,
            connected: AtomicBool::new(true),
        })
    }

    /// Returns the connection parameters.
    #[must_use]
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Returns the per-call timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `true` until the session is closed.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Returns the underlying client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Reads the device identity.
    ///
    /// The four fields are read one after another; the device may change
    /// between reads and no consistency across them is assumed.
    ///
    /// # Errors
    ///
    /// Returns error if any read fails, times out, or the session is closed.
    pub async fn fetch_identity(&self) -> Result<DeviceIdentity> {
        let mac = self.call(self.client.device_mac()).await?;
        let name = self.call(self.client.device_name()).await?;
        let model = self.call(self.client.model_name()).await?;
        let firmware_version = self.call(self.client.firmware_version()).await?;

        Ok(DeviceIdentity {
            mac,
            name,
            model,
            firmware_version,
        })
    }

    /// Starts a walk over the device's outlets in device order.
    #[must_use]
    pub fn outlets(&self) -> OutletWalk<'_, C> {
        OutletWalk::new(self)
    }

    /// Reads the raw status string of an outlet.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails, times out, or the session is closed.
    pub async fn outlet_status(&self, outlet: &OutletId) -> Result<String> {
        self.call(self.client.outlet_status(outlet)).await
    }

    /// Switches an outlet on or off.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails, times out, or the session is closed.
    pub async fn set_outlet_status(&self, outlet: &OutletId, command: OutletCommand) -> Result<()> {
        tracing::debug!(outlet = %outlet, command = %command, "Sending outlet command");
        self.call(self.client.set_outlet_status(outlet, command))
            .await
    }

    /// Closes the session.
    ///
    /// Only the first call reaches the client; later calls return `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns error if the client fails to release the transport. The
    /// session counts as closed either way.
    pub async fn close(&self) -> Result<()> {
        if !self.connected.swap(false, Ordering::AcqRel) {
            return Ok(());
        }

        tracing::debug!(host = %self.params.host, port = self.params.port, "Closing device session");

        match tokio::time::timeout(self.timeout, self.client.close()).await {
            Ok(result) => result.map_err(Error::Protocol),
            Err(_) => Err(ProtocolError::Timeout(millis(self.timeout)).into()),
        }
    }

    /// Runs a client call, bounded by the session timeout.
    pub(crate) async fn call<T>(
        &self,
        request: impl Future<Output = std::result::Result<T, ProtocolError>>,
    ) -> Result<T> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }

        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result.map_err(Error::Protocol),
            Err(_) => Err(ProtocolError::Timeout(millis(self.timeout)).into()),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
