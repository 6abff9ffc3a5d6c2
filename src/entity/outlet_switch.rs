// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch for a single outlet of an ATEN PE unit.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::entity::{DeviceClass, SwitchEntity};
use crate::error::Result;
use crate::event::{EventBus, SwitchEvent};
use crate::identity::DeviceInfo;
use crate::protocol::PduClient;
use crate::session::DeviceSession;
use crate::types::{Outlet, OutletCommand, OutletId, SwitchState};

/// Switch controlling one outlet through a shared [`DeviceSession`].
///
/// The unique id is `"{mac}-{outlet id}"`. The state starts out
/// [`SwitchState::Unknown`] and changes only when a command is acknowledged
/// or a refresh reads back `"on"` or `"off"`.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use aten_pe::entity::{OutletSwitch, SwitchEntity};
/// use aten_pe::event::EventBus;
/// use aten_pe::protocol::SimulatedPdu;
/// use aten_pe::types::Outlet;
/// use aten_pe::{DeviceInfo, DeviceSession, PduConfig};
///
/// # async fn example() -> aten_pe::Result<()> {
/// let pdu = SimulatedPdu::new("AA:BB:CC:DD:EE:FF").with_outlet("0.0.1", Some("Router"));
/// let session = Arc::new(DeviceSession::initialize(&PduConfig::new("10.0.0.5"), pdu).await?);
/// let identity = session.fetch_identity().await?;
/// let info = Arc::new(DeviceInfo::from(&identity));
///
/// let switch = OutletSwitch::new(
///     session,
///     info,
///     &identity.mac,
///     Outlet::new("0.0.1", Some("Router")),
///     EventBus::new(),
/// );
/// switch.turn_on().await?;
/// assert_eq!(switch.is_on(), Some(true));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OutletSwitch<C: PduClient> {
    session: Arc<DeviceSession<C>>,
    device_info: Arc<DeviceInfo>,
    outlet: OutletId,
    unique_id: String,
    name: String,
    state: RwLock<SwitchState>,
    events: EventBus,
}

impl<C: PduClient> OutletSwitch<C> {
    /// Creates a switch for `outlet` on the device identified by `mac`.
    #[must_use]
    pub fn new(
        session: Arc<DeviceSession<C>>,
        device_info: Arc<DeviceInfo>,
        mac: &str,
        outlet: Outlet,
        events: EventBus,
    ) -> Self {
        let name = outlet.display_name();
        Self {
            session,
            device_info,
            unique_id: format!("{mac}-{}", outlet.id),
            outlet: outlet.id,
            name,
            state: RwLock::default(),
            events,
        }
    }

    /// Returns the outlet this switch controls.
    #[must_use]
    pub fn outlet_id(&self) -> &OutletId {
        &self.outlet
    }

    /// Returns the session shared with the other switches of the device.
    #[must_use]
    pub fn session(&self) -> &Arc<DeviceSession<C>> {
        &self.session
    }

    async fn send(&self, command: OutletCommand) -> Result<()> {
        self.session.set_outlet_status(&self.outlet, command).await?;
        self.transition(command.target_state());
        Ok(())
    }

    /// Moves to `next`, publishing an event if the state actually changed.
    fn transition(&self, next: SwitchState) {
        let previous = std::mem::replace(&mut *self.state.write(), next);
        if previous != next {
            let notified = self
                .events
                .publish(SwitchEvent::state_changed(&self.unique_id, previous, next));
            tracing::debug!(
                unique_id = %self.unique_id,
                previous = %previous,
                current = %next,
                subscribers = notified,
                "Switch state changed"
            );
        }
    }
}

impl<C: PduClient> SwitchEntity for OutletSwitch<C> {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn device_class(&self) -> DeviceClass {
        DeviceClass::Outlet
    }

    fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    fn state(&self) -> SwitchState {
        *self.state.read()
    }

    async fn turn_on(&self) -> Result<()> {
        self.send(OutletCommand::On).await
    }

    async fn turn_off(&self) -> Result<()> {
        self.send(OutletCommand::Off).await
    }

    async fn refresh(&self) -> Result<()> {
        let status = self.session.outlet_status(&self.outlet).await?;

        match SwitchState::from_status(&status) {
            Some(next) => self.transition(next),
            None => {
                tracing::debug!(
                    unique_id = %self.unique_id,
                    status = %status,
                    "Ignoring unrecognized outlet status"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PduConfig;
    use crate::error::{Error, ProtocolError};
    use crate::identity::DeviceIdentity;
    use crate::protocol::{Operation, SimulatedPdu};

    const MAC: &str = "AA:BB:CC:DD:EE:FF";

    async fn switch(pdu: &SimulatedPdu, outlet: Outlet) -> OutletSwitch<SimulatedPdu> {
        let session = DeviceSession::initialize(&PduConfig::new("10.0.0.5"), pdu.clone())
            .await
            .unwrap();
        let info = DeviceInfo::from(&DeviceIdentity {
            mac: MAC.to_string(),
            name: "Rack A".to_string(),
            model: "PE8108G".to_string(),
            firmware_version: "1.4.0".to_string(),
        });
        OutletSwitch::new(
            Arc::new(session),
            Arc::new(info),
            MAC,
            outlet,
            EventBus::new(),
        )
    }

    fn pdu() -> SimulatedPdu {
        SimulatedPdu::new(MAC)
            .with_outlet("0.0.0", None)
            .with_outlet("0.0.1", Some("Router"))
    }

    #[tokio::test]
    async fn identity_fields() {
        let pdu = pdu();
        let named = switch(&pdu, Outlet::new("0.0.1", Some("Router"))).await;
        let unnamed = switch(&pdu, Outlet::new("0.0.0", None::<String>)).await;

        assert_eq!(named.unique_id(), "AA:BB:CC:DD:EE:FF-0.0.1");
        assert_eq!(named.name(), "Router");
        assert_eq!(unnamed.unique_id(), "AA:BB:CC:DD:EE:FF-0.0.0");
        assert_eq!(unnamed.name(), "Outlet 0.0.0");
        assert_eq!(named.device_class(), DeviceClass::Outlet);
        assert_eq!(named.device_info().mac(), Some(MAC));
    }

    #[tokio::test]
    async fn starts_unknown() {
        let switch = switch(&pdu(), Outlet::new("0.0.1", Some("Router"))).await;
        assert_eq!(switch.state(), SwitchState::Unknown);
        assert_eq!(switch.descriptor().is_on, None);
    }

    #[tokio::test]
    async fn turn_on_and_off_track_state() {
        let pdu = pdu();
        let switch = switch(&pdu, Outlet::new("0.0.1", Some("Router"))).await;

        switch.turn_on().await.unwrap();
        assert_eq!(switch.state(), SwitchState::On);
        assert_eq!(pdu.status_of(switch.outlet_id()).as_deref(), Some("on"));

        switch.turn_off().await.unwrap();
        assert_eq!(switch.state(), SwitchState::Off);
        assert_eq!(
            pdu.commands(),
            vec![
                (OutletId::new("0.0.1"), OutletCommand::On),
                (OutletId::new("0.0.1"), OutletCommand::Off),
            ]
        );
    }

    #[tokio::test]
    async fn failed_command_leaves_state_unchanged() {
        let pdu = pdu();
        let switch = switch(&pdu, Outlet::new("0.0.1", Some("Router"))).await;
        pdu.fail(
            Operation::SetOutletStatus,
            ProtocolError::ConnectionFailed("reset".to_string()),
        );

        let result = switch.turn_on().await;
        assert!(matches!(result, Err(Error::Protocol(_))));
        assert_eq!(switch.state(), SwitchState::Unknown);

        pdu.recover(Operation::SetOutletStatus);
        switch.turn_on().await.unwrap();
        pdu.fail(Operation::SetOutletStatus, ProtocolError::Timeout(50));

        assert!(switch.turn_off().await.is_err());
        assert_eq!(switch.state(), SwitchState::On);
    }

    #[tokio::test]
    async fn refresh_applies_recognized_status() {
        let pdu = pdu();
        let switch = switch(&pdu, Outlet::new("0.0.1", Some("Router"))).await;

        pdu.report_status("0.0.1", "on");
        switch.refresh().await.unwrap();
        assert_eq!(switch.state(), SwitchState::On);

        pdu.report_status("0.0.1", "off");
        switch.refresh().await.unwrap();
        assert_eq!(switch.state(), SwitchState::Off);
    }

    #[tokio::test]
    async fn refresh_ignores_unrecognized_status() {
        let pdu = pdu();
        let switch = switch(&pdu, Outlet::new("0.0.1", Some("Router"))).await;

        pdu.report_status("0.0.1", "pending");
        switch.refresh().await.unwrap();
        assert_eq!(switch.state(), SwitchState::Unknown);

        switch.turn_on().await.unwrap();
        pdu.report_status("0.0.1", "fault");
        switch.refresh().await.unwrap();
        assert_eq!(switch.state(), SwitchState::On);
    }

    #[tokio::test]
    async fn refresh_failure_propagates_and_keeps_state() {
        let pdu = pdu();
        let switch = switch(&pdu, Outlet::new("0.0.1", Some("Router"))).await;
        switch.turn_off().await.unwrap();
        pdu.fail(Operation::OutletStatus, ProtocolError::Timeout(50));

        let result = switch.refresh().await;

        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::Timeout(50)))
        ));
        assert_eq!(switch.state(), SwitchState::Off);
    }

    #[tokio::test]
    async fn publishes_only_actual_changes() {
        let pdu = pdu();
        let switch = switch(&pdu, Outlet::new("0.0.1", Some("Router"))).await;
        let mut rx = switch.events.subscribe();

        switch.turn_on().await.unwrap();
        switch.turn_on().await.unwrap();
        pdu.report_status("0.0.1", "off");
        switch.refresh().await.unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(matches!(
            first,
            SwitchEvent::StateChanged {
                previous: SwitchState::Unknown,
                current: SwitchState::On,
                ..
            }
        ));
        assert!(matches!(
            second,
            SwitchEvent::StateChanged {
                previous: SwitchState::On,
                current: SwitchState::Off,
                ..
            }
        ));
        assert!(rx.try_recv().is_err());
    }
}
