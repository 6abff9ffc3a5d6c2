// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identity and the descriptor surfaced to the host.

use serde::{Deserialize, Serialize};

/// Identity metadata read from the device once at bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// MAC address, used to derive switch unique ids.
    pub mac: String,
    /// Name configured on the device.
    pub name: String,
    /// Model string.
    pub model: String,
    /// Firmware version.
    pub firmware_version: String,
}

/// Device descriptor registered with the host.
///
/// # Examples
///
/// ```
/// use aten_pe::{DeviceIdentity, DeviceInfo};
///
/// let identity = DeviceIdentity {
///     mac: "AA:BB:CC:DD:EE:FF".to_string(),
///     name: "Rack A".to_string(),
///     model: "PE8108G".to_string(),
///     firmware_version: "1.4.0".to_string(),
/// };
/// let info = DeviceInfo::from(&identity);
///
/// assert_eq!(info.manufacturer, "ATEN");
/// assert_eq!(info.mac(), Some("AA:BB:CC:DD:EE:FF"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// `(kind, identifier)` pairs linking the device to the network.
    pub connections: Vec<(String, String)>,
    /// Manufacturer, always [`DeviceInfo::MANUFACTURER`].
    pub manufacturer: String,
    /// Model string.
    pub model: String,
    /// Device name.
    pub name: String,
    /// Firmware version.
    pub sw_version: String,
}

impl DeviceInfo {
    /// Manufacturer reported for every device.
    pub const MANUFACTURER: &'static str = "ATEN";
    /// Connection kind for network MAC addresses.
    pub const CONNECTION_NETWORK_MAC: &'static str = "mac";

    /// Returns the MAC address connection, if present.
    #[must_use]
    pub fn mac(&self) -> Option<&str> {
        self.connections
            .iter()
            .find(|(kind, _)| kind == Self::CONNECTION_NETWORK_MAC)
            .map(|(_, mac)| mac.as_str())
    }
}

impl From<&DeviceIdentity> for DeviceInfo {
    fn from(identity: &DeviceIdentity) -> Self {
        Self {
            connections: vec![(
                Self::CONNECTION_NETWORK_MAC.to_string(),
                identity.mac.clone(),
            )],
            manufacturer: Self::MANUFACTURER.to_string(),
            model: identity.model.clone(),
            name: identity.name.clone(),
            sw_version: identity.firmware_version.clone(),
        }
    }
}
