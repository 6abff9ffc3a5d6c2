// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Drives a simulated ATEN PE unit through setup, commands, polling and unload.
//!
//! Run with:
//!
//! ```bash
//! RUST_LOG=debug cargo run --example simulated_pdu
//! ```

use std::sync::Arc;
use std::time::Duration;

use aten_pe::protocol::SimulatedPdu;
use aten_pe::{OutletSwitch, PduConfig, SwitchEntity, SwitchEvent, setup};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let pdu = SimulatedPdu::new("AA:BB:CC:DD:EE:FF")
        .with_identity("Rack A", "PE8108G", "1.4.0")
        .with_outlet("0.0.0", None)
        .with_outlet("0.0.1", Some("Router"))
        .with_outlet("0.0.2", Some("NAS"))
        .with_latency(Duration::from_millis(5));

    let config = PduConfig::new("10.0.0.5")
        .with_username("administrator")
        .with_auth_key("auth-secret")
        .with_scan_interval(Duration::from_millis(200));

    let register = |switches: Vec<Arc<OutletSwitch<SimulatedPdu>>>| {
        for switch in &switches {
            println!(
                "registered {:<28} {:<14} {}",
                switch.unique_id(),
                switch.name(),
                switch.state()
            );
        }
    };

    let mut integration = setup(&config, pdu.clone(), register).await?;
    let mut events = integration.subscribe();
    integration.start_polling();

    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SwitchEvent::StateChanged {
                    unique_id,
                    previous,
                    current,
                    ..
                } => println!("event    {unique_id}: {previous} -> {current}"),
                SwitchEvent::RefreshFailed { unique_id, error, .. } => {
                    println!("event    {unique_id}: refresh failed: {error}");
                }
                SwitchEvent::Unloaded { mac } => {
                    println!("event    {mac} unloaded");
                    break;
                }
            }
        }
    });

    if let Some(router) = integration.switch("AA:BB:CC:DD:EE:FF-0.0.1") {
        router.turn_on().await?;
    }

    // Flip an outlet behind the integration's back and let polling notice.
    pdu.report_status("0.0.2", "on");
    tokio::time::sleep(Duration::from_millis(500)).await;

    for switch in integration.switches() {
        println!("state    {:<14} {:?}", switch.name(), switch.is_on());
    }

    integration.unload().await?;
    printer.await?;
    Ok(())
}
