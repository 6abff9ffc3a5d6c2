// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `aten_pe` - Expose the outlets of ATEN PE power distribution units as switches.
//!
//! The library bootstraps a session with a PDU, discovers its outlets, and
//! builds one switch per outlet. Each switch sends on/off commands and
//! reconciles its last-known state with the status the device reports.
//!
//! The SNMP transport is not part of this crate: it plugs in through the
//! [`PduClient`](protocol::PduClient) trait. A [`SimulatedPdu`](protocol::SimulatedPdu)
//! is provided for tests and demos.
//!
//! # Features
//!
//! - **Bootstrap**: connect, read identity, enumerate outlets, all-or-nothing
//! - **Switch control**: on/off commands that only update state once acknowledged
//! - **State sync**: periodic polling that ignores unrecognized status strings
//! - **Events**: broadcast notifications of state changes and poll failures
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use aten_pe::entity::{OutletSwitch, SwitchEntity};
//! use aten_pe::protocol::SimulatedPdu;
//! use aten_pe::{PduConfig, setup};
//!
//! #[tokio::main]
//! async fn main() -> aten_pe::Result<()> {
//!     let pdu = SimulatedPdu::new("AA:BB:CC:DD:EE:FF").with_outlet("0.0.1", Some("Router"));
//!     let config = PduConfig::new("10.0.0.5").with_community("private");
//!
//!     let integration = setup(&config, pdu, |_: Vec<Arc<OutletSwitch<SimulatedPdu>>>| {}).await?;
//!
//!     let router = integration.switch("AA:BB:CC:DD:EE:FF-0.0.1").expect("outlet exists");
//!     router.turn_off().await?;
//!     assert_eq!(router.is_on(), Some(false));
//!
//!     integration.unload().await
//! }
//! ```
//!
//! # Retrying Setup
//!
//! [`setup`] reports an unreachable device as [`Error::NotReady`]. Check
//! [`Error::is_retryable`] to tell it apart from a broken configuration:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use aten_pe::entity::OutletSwitch;
//! # use aten_pe::protocol::SimulatedPdu;
//! # use aten_pe::{PduConfig, setup};
//! # async fn example() {
//! let config = PduConfig::new("10.0.0.5");
//! match setup(&config, SimulatedPdu::new("AA:BB:CC:DD:EE:FF"), |_: Vec<Arc<OutletSwitch<SimulatedPdu>>>| {}).await {
//!     Ok(_integration) => {}
//!     Err(e) if e.is_retryable() => { /* schedule another attempt */ }
//!     Err(e) => panic!("misconfigured: {e}"),
//! }
//! # }
//! ```

mod config;
pub mod entity;
pub mod error;
pub mod event;
mod identity;
mod integration;
mod polling;
pub mod protocol;
pub mod session;
pub mod types;

pub use config::{ConnectionParams, PduConfig, SecurityLevel};
pub use entity::{DeviceClass, EntityDescriptor, OutletSwitch, SwitchEntity};
pub use error::{ConfigError, Error, ProtocolError, Result};
pub use event::{EventBus, SwitchEvent};
pub use identity::{DeviceIdentity, DeviceInfo};
pub use integration::{AddEntities, PduIntegration, setup};
pub use polling::{PollingHandle, spawn_polling};
pub use protocol::{PduClient, SimulatedPdu};
pub use session::{DeviceSession, OutletWalk};
pub use types::{Outlet, OutletCommand, OutletId, SwitchState};
