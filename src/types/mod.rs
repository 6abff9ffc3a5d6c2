// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for outlet control.
//!
//! # Types
//!
//! - [`OutletId`] - Opaque device-assigned outlet identifier
//! - [`Outlet`] - Identifier plus optional device-configured name
//! - [`OutletCommand`] - On/Off command sent to an outlet
//! - [`SwitchState`] - Unknown/On/Off last-known state of a switch

mod outlet;
mod switch_state;

pub use outlet::{Outlet, OutletId};
pub use switch_state::{OutletCommand, SwitchState};
