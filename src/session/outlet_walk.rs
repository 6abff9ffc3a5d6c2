// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lazy outlet enumeration.

use std::collections::HashSet;

use crate::error::Result;
use crate::protocol::PduClient;
use crate::types::{Outlet, OutletId};

use super::DeviceSession;

/// Walk over a device's outlets, fetching one outlet per step.
///
/// The walk is finite and cannot be restarted: once it returns `Ok(None)`
/// every later call returns `Ok(None)` too. Start a new walk from the
/// session to enumerate again. An outlet id the device already returned
/// ends the walk, so a device whose listing wraps around still terminates.
#[derive(Debug)]
pub struct OutletWalk<'a, C: PduClient> {
    session: &'a DeviceSession<C>,
    last: Option<OutletId>,
    seen: HashSet<OutletId>,
    finished: bool,
}

impl<'a, C: PduClient> OutletWalk<'a, C> {
    pub(super) fn new(session: &'a DeviceSession<C>) -> Self {
        Self {
            session,
            last: None,
            seen: HashSet::new(),
            finished: false,
        }
    }

    /// Fetches the next outlet.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails. The walk can be resumed after an
    /// error; it picks up after the last outlet returned.
    pub async fn next(&mut self) -> Result<Option<Outlet>> {
        if self.finished {
            return Ok(None);
        }

        let client = self.session.client();
        let next = self
            .session
            .call(client.next_outlet(self.last.as_ref()))
            .await?;

        match next {
            Some(outlet) if self.seen.contains(&outlet.id) => {
                // A device wrapping around to an earlier id would loop forever.
                tracing::warn!(outlet = %outlet.id, "Device repeated outlet id, ending walk");
                self.finished = true;
                Ok(None)
            }
            Some(outlet) => {
                self.seen.insert(outlet.id.clone());
                self.last = Some(outlet.id.clone());
                Ok(Some(outlet))
            }
            None => {
                self.finished = true;
                Ok(None)
            }
        }
    }

    /// Drains the walk into a vector.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; outlets fetched before it are
    /// discarded.
    pub async fn collect(mut self) -> Result<Vec<Outlet>> {
        let mut outlets = Vec::new();
        while let Some(outlet) = self.next().await? {
            outlets.push(outlet);
        }
        Ok(outlets)
    }

    /// Returns `true` once the walk has reached the end.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
