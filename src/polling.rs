// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic status polling.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::entity::SwitchEntity;
use crate::event::{EventBus, SwitchEvent};

/// Handle to a running poll loop.
///
/// The loop stops when the handle is stopped or dropped.
#[derive(Debug)]
pub struct PollingHandle {
    task: JoinHandle<()>,
}

impl PollingHandle {
    /// Returns `true` while the loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops the loop.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns a task refreshing every switch once per `interval`.
///
/// The first poll happens one `interval` after spawning. Switches are
/// refreshed one after another; a failing refresh is logged, reported on
/// `events` as [`SwitchEvent::RefreshFailed`], and does not stop the loop.
///
/// # Panics
///
/// Panics if `interval` is zero or if called outside a tokio runtime.
pub fn spawn_polling<S>(switches: Vec<Arc<S>>, interval: Duration, events: EventBus) -> PollingHandle
where
    S: SwitchEntity + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            for switch in &switches {
                if let Err(e) = switch.refresh().await {
                    tracing::warn!(
                        unique_id = %switch.unique_id(),
                        error = %e,
                        "Failed to refresh switch"
                    );
                    events.publish(SwitchEvent::refresh_failed(
                        switch.unique_id(),
                        e.to_string(),
                    ));
                }
            }
        }
    });

    PollingHandle { task }
}
