//! Shared request throttle: one admission per fixed interval.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Token bucket shared by every in-flight task.
///
/// [`acquire`](Throttle::acquire) hands out admission slots spaced at least
/// one interval apart across all concurrent callers combined. Slots are
/// reserved under the lock and slept on outside it, so a caller cancelled
/// mid-sleep wastes its own slot but never blocks the others.
pub struct Throttle {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Waits until this caller's admission slot comes up.
    ///
    /// The first caller after an idle gap is admitted immediately; everyone
    /// queued behind it is pushed back one interval each.
    pub async fn acquire(&self) {
        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next_slot {
                Some(at) if at > now => at,
                _ => now,
            };
            *next_slot = Some(slot + self.interval);
            slot
        };
        sleep_until(slot).await;
    }
}
