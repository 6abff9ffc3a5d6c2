// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory power distribution unit.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::ConnectionParams;
use crate::error::ProtocolError;
use crate::protocol::PduClient;
use crate::types::{Outlet, OutletCommand, OutletId};

/// A device operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// [`PduClient::initialize`].
    Initialize,
    /// [`PduClient::device_mac`].
    DeviceMac,
    /// [`PduClient::device_name`].
    DeviceName,
    /// [`PduClient::model_name`].
    ModelName,
    /// [`PduClient::firmware_version`].
    FirmwareVersion,
    /// [`PduClient::next_outlet`].
    ListOutlets,
    /// [`PduClient::outlet_status`].
    OutletStatus,
    /// [`PduClient::set_outlet_status`].
    SetOutletStatus,
    /// [`PduClient::close`].
    Close,
}

#[derive(Debug)]
struct Inner {
    mac: String,
    name: String,
    model: String,
    firmware: String,
    outlets: Vec<Outlet>,
    status: HashMap<OutletId, String>,
    failures: HashMap<Operation, ProtocolError>,
    initialize_delay: Duration,
    latency: Duration,
    params: Option<ConnectionParams>,
    closed: bool,
    commands: Vec<(OutletId, OutletCommand)>,
}

/// Simulated ATEN PE unit implementing [`PduClient`].
///
/// Clones share the same device, so a test can keep a handle to inspect
/// and script the device after handing a clone to a session.
///
/// # Examples
///
/// ```
/// use aten_pe::protocol::{Operation, SimulatedPdu};
/// use aten_pe::ProtocolError;
///
/// let pdu = SimulatedPdu::new("AA:BB:CC:DD:EE:FF")
///     .with_outlet("0.0.0", None)
///     .with_outlet("0.0.1", Some("Router"));
///
/// pdu.fail(Operation::DeviceMac, ProtocolError::Timeout(100));
/// assert_eq!(pdu.outlet_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedPdu {
    inner: Arc<Mutex<Inner>>,
}

impl SimulatedPdu {
    /// Status reported for outlets that were never switched.
    pub const INITIAL_STATUS: &'static str = "off";

    /// Creates a device with the given MAC address and no outlets.
    #[must_use]
    pub fn new(mac: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                mac: mac.into(),
                name: "PE PDU".to_string(),
                model: "PE8108G".to_string(),
                firmware: "1.0.0".to_string(),
                outlets: Vec::new(),
                status: HashMap::new(),
                failures: HashMap::new(),
                initialize_delay: Duration::ZERO,
                latency: Duration::ZERO,
                params: None,
                closed: false,
                commands: Vec::new(),
            })),
        }
    }

    /// Sets the name, model and firmware version reported by the device.
    #[must_use]
    pub fn with_identity(
        self,
        name: impl Into<String>,
        model: impl Into<String>,
        firmware: impl Into<String>,
    ) -> Self {
        {
            let mut inner = self.inner.lock();
            inner.name = name.into();
            inner.model = model.into();
            inner.firmware = firmware.into();
        }
        self
    }

    /// Appends an outlet, initially reporting `"off"`.
    #[must_use]
    pub fn with_outlet(self, id: impl Into<OutletId>, name: Option<&str>) -> Self {
        {
            let mut inner = self.inner.lock();
            let outlet = Outlet::new(id, name);
            inner
                .status
                .insert(outlet.id.clone(), Self::INITIAL_STATUS.to_string());
            inner.outlets.push(outlet);
        }
        self
    }

    /// Makes `initialize` block its thread for `delay`.
    #[must_use]
    pub fn with_initialize_delay(self, delay: Duration) -> Self {
        self.inner.lock().initialize_delay = delay;
        self
    }

    /// Delays every async operation by `latency`.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        self.inner.lock().latency = latency;
        self
    }

    /// Makes `operation` fail with `error` until [`recover`](Self::recover) is called.
    pub fn fail(&self, operation: Operation, error: ProtocolError) {
        self.inner.lock().failures.insert(operation, error);
    }

    /// Clears an injected failure.
    pub fn recover(&self, operation: Operation) {
        self.inner.lock().failures.remove(&operation);
    }

    /// Overrides the status string reported for an outlet.
    pub fn report_status(&self, outlet: impl Into<OutletId>, status: impl Into<String>) {
        self.inner.lock().status.insert(outlet.into(), status.into());
    }

    /// Returns the status string currently reported for an outlet.
    #[must_use]
    pub fn status_of(&self, outlet: &OutletId) -> Option<String> {
        self.inner.lock().status.get(outlet).cloned()
    }

    /// Returns the number of outlets.
    #[must_use]
    pub fn outlet_count(&self) -> usize {
        self.inner.lock().outlets.len()
    }

    /// Returns every acknowledged on/off command, oldest first.
    #[must_use]
    pub fn commands(&self) -> Vec<(OutletId, OutletCommand)> {
        self.inner.lock().commands.clone()
    }

    /// Returns the parameters the device was initialized with.
    #[must_use]
    pub fn initialized_with(&self) -> Option<ConnectionParams> {
        self.inner.lock().params.clone()
    }

    /// Returns `true` once `close` has succeeded.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    fn check(&self, operation: Operation) -> Result<(), ProtocolError> {
        let inner = self.inner.lock();
        if let Some(error) = inner.failures.get(&operation) {
            return Err(error.clone());
        }
        if operation != Operation::Initialize && inner.params.is_none() {
            return Err(ProtocolError::ConnectionFailed(
                "transport not initialized".to_string(),
            ));
        }
        Ok(())
    }

    async fn begin(&self, operation: Operation) -> Result<(), ProtocolError> {
        let latency = self.inner.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.check(operation)
    }
}

impl PduClient for SimulatedPdu {
    fn initialize(&mut self, params: &ConnectionParams) -> Result<(), ProtocolError> {
        let delay = self.inner.lock().initialize_delay;
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        self.check(Operation::Initialize)?;
        let mut inner = self.inner.lock();
        inner.params = Some(params.clone());
        inner.closed = false;
        Ok(())
    }

    async fn device_mac(&self) -> Result<String, ProtocolError> {
        self.begin(Operation::DeviceMac).await?;
        Ok(self.inner.lock().mac.clone())
    }

    async fn device_name(&self) -> Result<String, ProtocolError> {
        self.begin(Operation::DeviceName).await?;
        Ok(self.inner.lock().name.clone())
    }

    async fn model_name(&self) -> Result<String, ProtocolError> {
        self.begin(Operation::ModelName).await?;
        Ok(self.inner.lock().model.clone())
    }

    async fn firmware_version(&self) -> Result<String, ProtocolError> {
        self.begin(Operation::FirmwareVersion).await?;
        Ok(self.inner.lock().firmware.clone())
    }

    async fn next_outlet(&self, after: Option<&OutletId>) -> Result<Option<Outlet>, ProtocolError> {
        self.begin(Operation::ListOutlets).await?;
        let inner = self.inner.lock();
        let next = match after {
            None => inner.outlets.first(),
            Some(previous) => inner
                .outlets
                .iter()
                .position(|o| &o.id == previous)
                .and_then(|i| inner.outlets.get(i + 1)),
        };
        Ok(next.cloned())
    }

    async fn outlet_status(&self, outlet: &OutletId) -> Result<String, ProtocolError> {
        self.begin(Operation::OutletStatus).await?;
        self.inner
            .lock()
            .status
            .get(outlet)
            .cloned()
            .ok_or_else(|| ProtocolError::Rejected(format!("no such outlet: {outlet}")))
    }

    async fn set_outlet_status(
        &self,
        outlet: &OutletId,
        command: OutletCommand,
    ) -> Result<(), ProtocolError> {
        self.begin(Operation::SetOutletStatus).await?;
        let mut inner = self.inner.lock();
        let Some(status) = inner.status.get_mut(outlet) else {
            return Err(ProtocolError::Rejected(format!("no such outlet: {outlet}")));
        };
        *status = command.as_str().to_string();
        inner.commands.push((outlet.clone(), command));
        Ok(())
    }

    async fn close(&self) -> Result<(), ProtocolError> {
        self.check(Operation::Close)?;
        self.inner.lock().closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized() -> SimulatedPdu {
        let mut pdu = SimulatedPdu::new("AA:BB:CC:DD:EE:FF")
            .with_outlet("0.0.0", None)
            .with_outlet("0.0.1", Some("Router"));
        pdu.initialize(&ConnectionParams::new("10.0.0.5")).unwrap();
        pdu
    }

    #[tokio::test]
    async fn requires_initialize() {
        let pdu = SimulatedPdu::new("AA:BB:CC:DD:EE:FF");
        let result = pdu.device_mac().await;
        assert!(matches!(result, Err(ProtocolError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn walks_outlets_in_order() {
        let pdu = initialized();

        let first = pdu.next_outlet(None).await.unwrap().unwrap();
        assert_eq!(first.id.as_str(), "0.0.0");
        assert!(first.name.is_none());

        let second = pdu.next_outlet(Some(&first.id)).await.unwrap().unwrap();
        assert_eq!(second.name.as_deref(), Some("Router"));

        assert!(pdu.next_outlet(Some(&second.id)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_status_is_reported_back() {
        let pdu = initialized();
        let id = OutletId::new("0.0.1");

        pdu.set_outlet_status(&id, OutletCommand::On).await.unwrap();

        assert_eq!(pdu.outlet_status(&id).await.unwrap(), "on");
        assert_eq!(pdu.commands(), vec![(id, OutletCommand::On)]);
    }

    #[tokio::test]
    async fn unknown_outlet_is_rejected() {
        let pdu = initialized();
        let result = pdu
            .set_outlet_status(&OutletId::new("9.9.9"), OutletCommand::Off)
            .await;
        assert!(matches!(result, Err(ProtocolError::Rejected(_))));
        assert!(pdu.commands().is_empty());
    }

    #[tokio::test]
    async fn injected_failure_until_recovered() {
        let pdu = initialized();
        pdu.fail(Operation::ModelName, ProtocolError::Timeout(10));

        assert_eq!(pdu.model_name().await, Err(ProtocolError::Timeout(10)));

        pdu.recover(Operation::ModelName);
        assert_eq!(pdu.model_name().await.unwrap(), "PE8108G");
    }

    #[test]
    fn initialize_failure_leaves_device_uninitialized() {
        let mut pdu = SimulatedPdu::new("AA:BB:CC:DD:EE:FF");
        pdu.fail(Operation::Initialize, ProtocolError::AuthenticationFailed);

        let result = pdu.initialize(&ConnectionParams::new("10.0.0.5"));

        assert_eq!(result, Err(ProtocolError::AuthenticationFailed));
        assert!(pdu.initialized_with().is_none());
    }
}
