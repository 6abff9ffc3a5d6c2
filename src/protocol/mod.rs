// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device client abstraction.
//!
//! The SNMP transport that actually talks to an ATEN PE unit lives outside
//! this crate. It plugs in by implementing [`PduClient`], which exposes the
//! handful of logical operations the switch layer needs.
//!
//! # Clients
//!
//! - [`SimulatedPdu`]: in-memory device with per-operation failure injection,
//!   used by the tests and the demo

mod simulated;

pub use simulated::{Operation, SimulatedPdu};

use std::future::Future;

use crate::config::ConnectionParams;
use crate::error::ProtocolError;
use crate::types::{Outlet, OutletCommand, OutletId};

/// Client for a single power distribution unit.
///
/// [`initialize`](Self::initialize) is a blocking call; the session runs it
/// on tokio's blocking pool. Every other operation is async and may be
/// issued concurrently from several switches, so implementations must
/// serialize or pipeline requests themselves.
pub trait PduClient: Send + Sync + 'static {
    /// Opens the transport and authenticates.
    ///
    /// This may block the calling thread on network I/O.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the device cannot be reached or rejects
    /// the credentials.
    fn initialize(&mut self, params: &ConnectionParams) -> Result<(), ProtocolError>;

    /// Reads the MAC address of the device.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the query fails.
    fn device_mac(&self) -> impl Future<Output = Result<String, ProtocolError>> + Send;

    /// Reads the name configured on the device.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the query fails.
    fn device_name(&self) -> impl Future<Output = Result<String, ProtocolError>> + Send;

    /// Reads the model string.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the query fails.
    fn model_name(&self) -> impl Future<Output = Result<String, ProtocolError>> + Send;

    /// Reads the firmware version.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the query fails.
    fn firmware_version(&self) -> impl Future<Output = Result<String, ProtocolError>> + Send;

    /// Returns the outlet following `after` in device order.
    ///
    /// `None` asks for the first outlet. `Ok(None)` ends the walk.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the query fails.
    fn next_outlet(
        &self,
        after: Option<&OutletId>,
    ) -> impl Future<Output = Result<Option<Outlet>, ProtocolError>> + Send;

    /// Reads the raw status string of an outlet.
    ///
    /// ATEN units report `"on"` and `"off"`, plus transitional values the
    /// caller is free to ignore.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the query fails.
    fn outlet_status(
        &self,
        outlet: &OutletId,
    ) -> impl Future<Output = Result<String, ProtocolError>> + Send;

    /// Switches an outlet on or off.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command is not acknowledged.
    fn set_outlet_status(
        &self,
        outlet: &OutletId,
        command: OutletCommand,
    ) -> impl Future<Output = Result<(), ProtocolError>> + Send;

    /// Releases the transport.
    ///
    /// The default implementation does nothing.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the transport reports a failure while
    /// shutting down.
    fn close(&self) -> impl Future<Output = Result<(), ProtocolError>> + Send {
        async { Ok(()) }
    }
}
