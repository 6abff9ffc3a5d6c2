// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for switch state changes.
//!
//! Each integration owns an [`EventBus`]. Switches publish
//! [`SwitchEvent::StateChanged`] whenever their last-known state moves, and
//! the poller publishes [`SwitchEvent::RefreshFailed`] when a poll fails.
//!
//! # Examples
//!
//! ```
//! use aten_pe::event::{EventBus, SwitchEvent};
//! use aten_pe::types::SwitchState;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(SwitchEvent::state_changed(
//!     "AA:BB:CC:DD:EE:FF-0.0.1",
//!     SwitchState::Off,
//!     SwitchState::On,
//! ));
//! ```

mod event_bus;
mod switch_event;

pub use event_bus::EventBus;
pub use switch_event::SwitchEvent;
