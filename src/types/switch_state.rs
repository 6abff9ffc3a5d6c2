// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet power types.
//!
//! [`OutletCommand`] is what gets sent to the device, [`SwitchState`] is
//! what a switch remembers about it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Command sent to a single outlet.
///
/// # Examples
///
/// ```
/// use aten_pe::types::OutletCommand;
///
/// assert_eq!(OutletCommand::On.as_str(), "on");
/// assert_eq!(OutletCommand::Off.target_state().is_on(), Some(false));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutletCommand {
    /// Switch the outlet on.
    On,
    /// Switch the outlet off.
    Off,
}

impl OutletCommand {
    /// Returns the status string understood by the device.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    /// Returns the switch state reached once the command succeeded.
    #[must_use]
    pub const fn target_state(&self) -> SwitchState {
        match self {
            Self::On => SwitchState::On,
            Self::Off => SwitchState::Off,
        }
    }
}

impl fmt::Display for OutletCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last known state of an outlet switch.
///
/// A switch starts out [`Unknown`](Self::Unknown) and only leaves it once a
/// command succeeds or the device reports a recognized status.
///
/// # Examples
///
/// ```
/// use aten_pe::types::SwitchState;
///
/// assert_eq!(SwitchState::from_status("on"), Some(SwitchState::On));
/// assert_eq!(SwitchState::from_status("pending"), None);
/// assert_eq!(SwitchState::Unknown.is_on(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchState {
    /// No status has been observed yet.
    #[default]
    Unknown,
    /// The outlet is powered.
    On,
    /// The outlet is not powered.
    Off,
}

impl SwitchState {
    /// Interprets a status string reported by the device.
    ///
    /// Only the exact strings `"on"` and `"off"` are recognized. Anything
    /// else (transitional states, faults, empty strings) yields `None`,
    /// meaning the report carries no new information.
    #[must_use]
    pub fn from_status(status: &str) -> Option<Self> {
        match status {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            _ => None,
        }
    }

    /// Returns the on/off flag, or `None` while the state is unknown.
    #[must_use]
    pub const fn is_on(&self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::On => Some(true),
            Self::Off => Some(false),
        }
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::On => "on",
            Self::Off => "off",
        })
    }
}
