// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bootstrap of one power distribution unit into a set of switches.
//!
//! [`setup`] connects to the device, reads its identity, walks its outlets,
//! builds one [`OutletSwitch`] per outlet, refreshes each once, and hands
//! them to the host through an [`AddEntities`] callback. Any failure along
//! the way aborts the whole setup: the host receives either every switch or
//! none, and a device that could not be reached is reported as
//! [`Error::NotReady`] so the host can retry later.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use aten_pe::entity::{OutletSwitch, SwitchEntity};
//! use aten_pe::protocol::SimulatedPdu;
//! use aten_pe::{PduConfig, setup};
//!
//! # async fn example() -> aten_pe::Result<()> {
//! let pdu = SimulatedPdu::new("AA:BB:CC:DD:EE:FF")
//!     .with_outlet("0.0.0", None)
//!     .with_outlet("0.0.1", Some("Router"));
//!
//! let register = |switches: Vec<Arc<OutletSwitch<SimulatedPdu>>>| {
//!     for switch in &switches {
//!         println!("{} -> {}", switch.unique_id(), switch.name());
//!     }
//! };
//! let mut integration = setup(&PduConfig::new("10.0.0.5"), pdu, register).await?;
//!
//! integration.start_polling();
//! // ...
//! integration.unload().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::config::PduConfig;
use crate::entity::{OutletSwitch, SwitchEntity};
use crate::error::{Error, Result};
use crate::event::{EventBus, SwitchEvent};
use crate::identity::{DeviceIdentity, DeviceInfo};
use crate::polling::{PollingHandle, spawn_polling};
use crate::protocol::PduClient;
use crate::session::DeviceSession;

/// Callback through which the host receives the switches of a device.
///
/// Implemented for every `FnOnce(Vec<Arc<S>>)` closure.
pub trait AddEntities<S> {
    /// Registers `entities` with the host.
    fn add_entities(self, entities: Vec<Arc<S>>);
}

impl<S, F> AddEntities<S> for F
where
    F: FnOnce(Vec<Arc<S>>),
{
    fn add_entities(self, entities: Vec<Arc<S>>) {
        self(entities);
    }
}

/// A bootstrapped power distribution unit and its switches.
#[derive(Debug)]
pub struct PduIntegration<C: PduClient> {
    config: PduConfig,
    session: Arc<DeviceSession<C>>,
    identity: DeviceIdentity,
    device_info: Arc<DeviceInfo>,
    switches: Vec<Arc<OutletSwitch<C>>>,
    events: EventBus,
    poller: Option<PollingHandle>,
}

/// Bootstraps a device and registers its switches through `registrar`.
///
/// Every switch is refreshed once before registration. A failing initial
/// refresh is logged and leaves that switch in the unknown state; it does
/// not abort setup.
///
/// # Errors
///
/// - [`Error::Config`] if `config` is invalid (permanent)
/// - [`Error::NotReady`] if initializing, reading the identity, or listing
///   outlets fails (retryable)
///
/// `registrar` is not called when an error is returned.
pub async fn setup<C, R>(config: &PduConfig, client: C, registrar: R) -> Result<PduIntegration<C>>
where
    C: PduClient,
    R: AddEntities<OutletSwitch<C>>,
{
    let integration = match bootstrap(config, client).await {
        Ok(integration) => integration,
        Err(Error::Protocol(source)) => {
            tracing::error!(
                host = %config.host(),
                port = config.port(),
                error = %source,
                "Failed to initialize device"
            );
            return Err(Error::NotReady {
                host: config.host().to_string(),
                port: config.port(),
                source,
            });
        }
        Err(e) => {
            tracing::error!(
                host = %config.host(),
                port = config.port(),
                error = %e,
                "Failed to set up device"
            );
            return Err(e);
        }
    };

    for switch in &integration.switches {
        if let Err(e) = switch.refresh().await {
            tracing::warn!(
                unique_id = %switch.unique_id(),
                error = %e,
                "Initial refresh failed"
            );
        }
    }

    tracing::info!(
        host = %config.host(),
        mac = %integration.identity.mac,
        model = %integration.identity.model,
        switches = integration.switches.len(),
        "Device set up"
    );

    registrar.add_entities(integration.switches.clone());
    Ok(integration)
}

async fn bootstrap<C: PduClient>(config: &PduConfig, client: C) -> Result<PduIntegration<C>> {
    let session = Arc::new(DeviceSession::initialize(config, client).await?);

    let identity = session.fetch_identity().await?;
    let outlets = session.outlets().collect().await?;

    let device_info = Arc::new(DeviceInfo::from(&identity));
    let events = EventBus::new();
    let switches = outlets
        .into_iter()
        .map(|outlet| {
            Arc::new(OutletSwitch::new(
                Arc::clone(&session),
                Arc::clone(&device_info),
                &identity.mac,
                outlet,
                events.clone(),
            ))
        })
        .collect();

    Ok(PduIntegration {
        config: config.clone(),
        session,
        identity,
        device_info,
        switches,
        events,
        poller: None,
    })
}

impl<C: PduClient> PduIntegration<C> {
    /// Returns the identity read at bootstrap.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Returns the device descriptor.
    #[must_use]
    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    /// Returns the shared session.
    #[must_use]
    pub fn session(&self) -> &Arc<DeviceSession<C>> {
        &self.session
    }

    /// Returns every switch in device order.
    #[must_use]
    pub fn switches(&self) -> &[Arc<OutletSwitch<C>>] {
        &self.switches
    }

    /// Finds a switch by unique id.
    #[must_use]
    pub fn switch(&self, unique_id: &str) -> Option<&Arc<OutletSwitch<C>>> {
        self.switches.iter().find(|s| s.unique_id() == unique_id)
    }

    /// Subscribes to switch events.
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SwitchEvent> {
        self.events.subscribe()
    }

    /// Starts polling every switch at the configured scan interval.
    ///
    /// Does nothing if polling is already running.
    pub fn start_polling(&mut self) {
        if self.is_polling() {
            return;
        }
        self.poller = Some(spawn_polling(
            self.switches.clone(),
            self.config.scan_interval,
            self.events.clone(),
        ));
    }

    /// Stops polling.
    pub fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }

    /// Returns `true` while polling is running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(PollingHandle::is_running)
    }

    /// Stops polling and closes the session.
    ///
    /// Switches still held by the host fail with [`Error::NotConnected`]
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns error if the client fails to release the transport.
    pub async fn unload(mut self) -> Result<()> {
        self.stop_polling();
        let result = self.session.close().await;
        self.events.publish(SwitchEvent::Unloaded {
            mac: self.identity.mac.clone(),
        });
        tracing::info!(host = %self.config.host(), mac = %self.identity.mac, "Device unloaded");
        result
    }
}
