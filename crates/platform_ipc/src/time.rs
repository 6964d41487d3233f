//! Clock contracts shared by cache freshness checks and adapters.

use std::{cell::Cell, rc::Rc};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of unix-millisecond timestamps for freshness decisions.
pub trait Clock {
    /// Returns the current unix timestamp in milliseconds.
    fn now_unix_ms(&self) -> u64;
}

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Wall-clock time for browser and native targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_ms(&self) -> u64 {
        unix_time_ms_now()
    }
}

/// Settable clock for deterministic staleness tests.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    /// Creates a clock pinned at `now_unix_ms`.
    pub fn at(now_unix_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(now_unix_ms)),
        }
    }

    /// Moves the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }

    /// Pins the clock at `now_unix_ms`.
    pub fn set(&self, now_unix_ms: u64) {
        self.now.set(now_unix_ms);
    }
}

impl Clock for ManualClock {
    fn now_unix_ms(&self) -> u64 {
        self.now.get()
    }
}
