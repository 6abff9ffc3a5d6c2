// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for switch commands, refresh and polling.

use std::sync::Arc;
use std::time::Duration;

use aten_pe::protocol::{Operation, SimulatedPdu};
use aten_pe::{
    Error, OutletCommand, OutletId, OutletSwitch, PduConfig, PduIntegration, ProtocolError,
    SwitchEntity, SwitchEvent, SwitchState, setup,
};

const ROUTER: &str = "AA:BB:CC:DD:EE:FF-0.0.1";
const SPARE: &str = "AA:BB:CC:DD:EE:FF-0.0.0";

fn rack() -> SimulatedPdu {
    SimulatedPdu::new("AA:BB:CC:DD:EE:FF")
        .with_outlet("0.0.0", None)
        .with_outlet("0.0.1", Some("Router"))
}

async fn bring_up(pdu: &SimulatedPdu, config: &PduConfig) -> PduIntegration<SimulatedPdu> {
    setup(config, pdu.clone(), |_: Vec<Arc<OutletSwitch<SimulatedPdu>>>| {})
        .await
        .unwrap()
}

// ============================================================================
// Commands and refresh
// ============================================================================

mod commands {
    use super::*;

    #[tokio::test]
    async fn turn_off_then_refresh_reads_device() {
        let pdu = rack();
        let integration = bring_up(&pdu, &PduConfig::new("10.0.0.5")).await;
        let router = integration.switch(ROUTER).unwrap();

        router.turn_off().await.unwrap();
        assert_eq!(router.state(), SwitchState::Off);
        assert_eq!(
            pdu.commands(),
            vec![(OutletId::new("0.0.1"), OutletCommand::Off)]
        );

        // Someone switched the outlet back on at the front panel.
        pdu.report_status("0.0.1", "on");
        router.refresh().await.unwrap();
        assert_eq!(router.state(), SwitchState::On);
        assert_eq!(router.is_on(), Some(true));
    }

    #[tokio::test]
    async fn failing_command_leaves_state_unchanged() {
        let pdu = rack();
        let integration = bring_up(&pdu, &PduConfig::new("10.0.0.5")).await;
        let router = integration.switch(ROUTER).unwrap();
        let before = router.state();

        pdu.fail(
            Operation::SetOutletStatus,
            ProtocolError::Rejected("read-only community".to_string()),
        );
        let err = router.turn_on().await.unwrap_err();

        assert!(matches!(err, Error::Protocol(ProtocolError::Rejected(_))));
        assert!(!err.is_retryable());
        assert_eq!(router.state(), before);
        assert!(pdu.commands().is_empty());
    }

    #[tokio::test]
    async fn unrecognized_status_never_overrides_known_state() {
        let pdu = rack();
        let integration = bring_up(&pdu, &PduConfig::new("10.0.0.5")).await;
        let router = integration.switch(ROUTER).unwrap();
        router.turn_on().await.unwrap();

        for status in ["fault", "ON", " on", ""] {
            pdu.report_status("0.0.1", status);
            router.refresh().await.unwrap();
            assert_eq!(router.state(), SwitchState::On, "status {status:?}");
        }
    }

    #[tokio::test]
    async fn commands_to_different_outlets_run_concurrently() {
        let pdu = rack().with_latency(Duration::from_millis(20));
        let integration = bring_up(&pdu, &PduConfig::new("10.0.0.5")).await;
        let router = integration.switch(ROUTER).unwrap();
        let spare = integration.switch(SPARE).unwrap();

        let (a, b) = tokio::join!(router.turn_on(), spare.turn_off());
        a.unwrap();
        b.unwrap();

        assert_eq!(router.state(), SwitchState::On);
        assert_eq!(spare.state(), SwitchState::Off);
        assert_eq!(pdu.status_of(&OutletId::new("0.0.1")).as_deref(), Some("on"));
        assert_eq!(pdu.status_of(&OutletId::new("0.0.0")).as_deref(), Some("off"));
    }

    #[tokio::test]
    async fn descriptor_reflects_current_state() {
        let pdu = rack();
        pdu.report_status("0.0.1", "maintenance");
        let integration = bring_up(&pdu, &PduConfig::new("10.0.0.5")).await;
        let router = integration.switch(ROUTER).unwrap();

        assert_eq!(router.descriptor().is_on, None);
        router.turn_on().await.unwrap();

        let descriptor = router.descriptor();
        assert_eq!(descriptor.unique_id, ROUTER);
        assert_eq!(descriptor.display_name, "Router");
        assert_eq!(descriptor.is_on, Some(true));
    }
}

// ============================================================================
// Events, polling and unload
// ============================================================================

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn state_changes_are_broadcast() {
        let pdu = rack();
        let integration = bring_up(&pdu, &PduConfig::new("10.0.0.5")).await;
        let mut rx = integration.subscribe();
        let router = integration.switch(ROUTER).unwrap();

        router.turn_on().await.unwrap();

        match rx.recv().await.unwrap() {
            SwitchEvent::StateChanged {
                unique_id,
                previous,
                current,
                ..
            } => {
                assert_eq!(unique_id, ROUTER);
                assert_eq!(previous, SwitchState::Off);
                assert_eq!(current, SwitchState::On);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn polling_picks_up_external_changes() {
        let pdu = rack();
        let config = PduConfig::new("10.0.0.5").with_scan_interval(Duration::from_millis(10));
        let mut integration = bring_up(&pdu, &config).await;
        integration.start_polling();

        pdu.report_status("0.0.0", "on");
        pdu.report_status("0.0.1", "on");
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(
            integration
                .switches()
                .iter()
                .all(|s| s.state() == SwitchState::On)
        );
        integration.unload().await.unwrap();
    }

    #[tokio::test]
    async fn polling_failures_are_reported() {
        let pdu = rack();
        let config = PduConfig::new("10.0.0.5").with_scan_interval(Duration::from_millis(10));
        let mut integration = bring_up(&pdu, &config).await;
        let mut rx = integration.subscribe();

        pdu.fail(Operation::OutletStatus, ProtocolError::Timeout(10));
        integration.start_polling();

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SwitchEvent::RefreshFailed { .. }));
        assert!(integration.is_polling());
        integration.unload().await.unwrap();
    }

    #[tokio::test]
    async fn unload_disconnects_every_switch() {
        let pdu = rack();
        let integration = bring_up(&pdu, &PduConfig::new("10.0.0.5")).await;
        let switches = integration.switches().to_vec();

        integration.unload().await.unwrap();

        assert!(pdu.is_closed());
        for switch in &switches {
            assert!(matches!(switch.refresh().await, Err(Error::NotConnected)));
            assert!(matches!(switch.turn_off().await, Err(Error::NotConnected)));
        }
    }
}
