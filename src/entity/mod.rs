// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch entities exposed to the host.
//!
//! [`SwitchEntity`] is the interface the host drives; [`OutletSwitch`] is
//! the implementation for a single ATEN PE outlet.

mod outlet_switch;

pub use outlet_switch::OutletSwitch;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::identity::DeviceInfo;
use crate::types::SwitchState;

/// Kind of switch, used by the host to pick icons and semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// A power outlet.
    Outlet,
}

/// Snapshot of a switch as registered with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Stable unique id.
    pub unique_id: String,
    /// Display name.
    pub display_name: String,
    /// Kind of switch.
    pub device_class: DeviceClass,
    /// Last known on/off flag, `None` while unknown.
    pub is_on: Option<bool>,
}

/// A remotely controlled on/off switch.
///
/// Commands and refreshes perform device I/O and may be issued concurrently.
pub trait SwitchEntity: Send + Sync {
    /// Returns the stable unique id.
    fn unique_id(&self) -> &str;

    /// Returns the display name.
    fn name(&self) -> &str;

    /// Returns the kind of switch.
    fn device_class(&self) -> DeviceClass;

    /// Returns the descriptor of the device this switch belongs to.
    fn device_info(&self) -> &DeviceInfo;

    /// Returns the last known state.
    fn state(&self) -> SwitchState;

    /// Returns the last known on/off flag, `None` while unknown.
    fn is_on(&self) -> Option<bool> {
        self.state().is_on()
    }

    /// Turns the switch on.
    ///
    /// # Errors
    ///
    /// Returns error if the device does not acknowledge the command; the
    /// state is left untouched in that case.
    fn turn_on(&self) -> impl Future<Output = Result<()>> + Send;

    /// Turns the switch off.
    ///
    /// # Errors
    ///
    /// Returns error if the device does not acknowledge the command; the
    /// state is left untouched in that case.
    fn turn_off(&self) -> impl Future<Output = Result<()>> + Send;

    /// Reconciles the state with what the device reports.
    ///
    /// # Errors
    ///
    /// Returns error if the status query fails; the state is left untouched
    /// in that case.
    fn refresh(&self) -> impl Future<Output = Result<()>> + Send;

    /// Returns a snapshot for the host.
    fn descriptor(&self) -> EntityDescriptor {
        EntityDescriptor {
            unique_id: self.unique_id().to_string(),
            display_name: self.name().to_string(),
            device_class: self.device_class(),
            is_on: self.is_on(),
        }
    }
}
