// src/utils/rate.rs

//! Shared fixed-interval request gate.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Admits at most one caller per interval.
///
/// Politeness pacing lives in this shared gate rather than in the call
/// sites, so a bounded pool of workers still produces the same observable
/// request spacing as a sequential loop.
pub struct RateGate {
    interval: Duration,
    next_slot: Mutex<Instant>,
}

impl RateGate {
    /// Create a gate with the given minimum interval between admissions.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Convenience constructor from milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Wait until this caller's admission slot arrives.
    pub async fn wait(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = if *next > now { *next } else { now };
            *next = slot + self.interval;
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}
