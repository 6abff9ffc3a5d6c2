// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::SwitchState;

/// Events emitted by an integration.
///
/// Every event names the switch it concerns by unique id, except
/// [`Unloaded`](Self::Unloaded) which concerns the whole device.
///
/// # Examples
///
/// ```
/// use aten_pe::event::SwitchEvent;
/// use aten_pe::types::SwitchState;
///
/// let event = SwitchEvent::state_changed(
///     "AA:BB:CC:DD:EE:FF-0.0.1",
///     SwitchState::Unknown,
///     SwitchState::On,
/// );
/// assert!(event.is_state_change());
/// assert_eq!(event.unique_id(), Some("AA:BB:CC:DD:EE:FF-0.0.1"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwitchEvent {
    /// A switch moved to a different state.
    StateChanged {
        /// Unique id of the switch.
        unique_id: String,
        /// State before the change.
        previous: SwitchState,
        /// State after the change.
        current: SwitchState,
        /// When the change was observed.
        at: DateTime<Utc>,
    },

    /// A background status poll failed.
    RefreshFailed {
        /// Unique id of the switch.
        unique_id: String,
        /// Description of the failure.
        error: String,
        /// When the failure happened.
        at: DateTime<Utc>,
    },

    /// The integration was unloaded and its session closed.
    Unloaded {
        /// MAC address of the device.
        mac: String,
    },
}

impl SwitchEvent {
    /// Returns the unique id of the switch this event concerns.
    #[must_use]
    pub fn unique_id(&self) -> Option<&str> {
        match self {
            Self::StateChanged { unique_id, .. } | Self::RefreshFailed { unique_id, .. } => {
                Some(unique_id)
            }
            Self::Unloaded { .. } => None,
        }
    }

    /// Returns `true` if this is a state change event.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Creates a state changed event stamped with the current time.
    #[must_use]
    pub fn state_changed(
        unique_id: impl Into<String>,
        previous: SwitchState,
        current: SwitchState,
    ) -> Self {
        Self::StateChanged {
            unique_id: unique_id.into(),
            previous,
            current,
            at: Utc::now(),
        }
    }

    /// Creates a refresh failed event stamped with the current time.
    #[must_use]
    pub fn refresh_failed(unique_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self::RefreshFailed {
            unique_id: unique_id.into(),
            error: error.into(),
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_id_extraction() {
        let changed = SwitchEvent::state_changed("mac-1", SwitchState::Off, SwitchState::On);
        assert_eq!(changed.unique_id(), Some("mac-1"));

        let failed = SwitchEvent::refresh_failed("mac-2", "timeout");
        assert_eq!(failed.unique_id(), Some("mac-2"));
        assert!(!failed.is_state_change());

        let unloaded = SwitchEvent::Unloaded {
            mac: "mac".to_string(),
        };
        assert_eq!(unloaded.unique_id(), None);
    }

    #[test]
    fn serializes_with_type_tag() {
        let event = SwitchEvent::state_changed("mac-1", SwitchState::Unknown, SwitchState::Off);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "state_changed");
        assert_eq!(json["previous"], "unknown");
        assert_eq!(json["current"], "off");
    }
}
