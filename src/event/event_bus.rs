// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel shared by the switches of one device.

use tokio::sync::broadcast;

use super::SwitchEvent;

const CAPACITY: usize = 256;

/// Fan-out of [`SwitchEvent`]s to any number of subscribers.
///
/// Clones share the same channel, so every switch of a device can hold its
/// own handle. A subscriber only sees events published after it subscribed.
/// One that falls more than 256 events behind skips the oldest ones and
/// gets `RecvError::Lagged` on its next receive.
///
/// # Examples
///
/// ```
/// use aten_pe::event::{EventBus, SwitchEvent};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(SwitchEvent::Unloaded {
///     mac: "AA:BB:CC:DD:EE:FF".to_string(),
/// });
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SwitchEvent>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CAPACITY);
        Self { sender }
    }

    /// Returns a receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SwitchEvent> {
        self.sender.subscribe()
    }

    /// Returns how many receivers are currently subscribed.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Sends `event` to every subscriber and returns how many got it.
    ///
    /// An event published with nobody listening is dropped.
    pub fn publish(&self, event: SwitchEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
