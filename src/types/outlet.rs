// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet addressing types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of an outlet on the device.
///
/// The device chooses the format (ATEN units report dotted indices such as
/// `"0.0.1"`); this library never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutletId(String);

impl OutletId {
    /// Creates an outlet identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OutletId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for OutletId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// An outlet as reported by the device during discovery.
///
/// # Examples
///
/// ```
/// use aten_pe::types::Outlet;
///
/// let named = Outlet::new("0.0.1", Some("Router"));
/// assert_eq!(named.display_name(), "Router");
///
/// let unnamed = Outlet::new("0.0.0", None::<String>);
/// assert_eq!(unnamed.display_name(), "Outlet 0.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outlet {
    /// Device-assigned identifier.
    pub id: OutletId,
    /// Name configured on the device, if any.
    pub name: Option<String>,
}

impl Outlet {
    /// Creates an outlet.
    ///
    /// An empty name is stored as `None`.
    #[must_use]
    pub fn new(id: impl Into<OutletId>, name: Option<impl Into<String>>) -> Self {
        let name = name.map(Into::into).filter(|n: &String| !n.is_empty());
        Self {
            id: id.into(),
            name,
        }
    }

    /// Returns the name to show for this outlet.
    ///
    /// Falls back to `"Outlet {id}"` when the device supplies no name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Outlet {}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_becomes_none() {
        let outlet = Outlet::new("0.0.0", Some(""));
        assert!(outlet.name.is_none());
        assert_eq!(outlet.display_name(), "Outlet 0.0.0");
    }

    #[test]
    fn device_name_is_used_verbatim() {
        let outlet = Outlet::new("0.0.3", Some("  NAS rack "));
        assert_eq!(outlet.display_name(), "  NAS rack ");
    }

    #[test]
    fn fallback_even_when_name_set_empty_directly() {
        let outlet = Outlet {
            id: OutletId::new("7"),
            name: Some(String::new()),
        };
        assert_eq!(outlet.display_name(), "Outlet 7");
    }

    #[test]
    fn outlet_id_display() {
        assert_eq!(OutletId::from("0.0.1").to_string(), "0.0.1");
    }
}
