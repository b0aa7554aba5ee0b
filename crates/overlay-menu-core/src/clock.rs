//! Monotonic millisecond clocks.
//!
//! The repeat navigator measures held-key timing in whole milliseconds from
//! a [`Clock`]. Embedders normally hand the engine their game clock; the two
//! implementations here cover the common cases.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// A monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed epoch. Never decreases.
    fn now_ms(&self) -> u64;
}

/// Wall-clock time measured from the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Create a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// A clock advanced by hand, for tests and fixed-step simulations.
///
/// ```
/// use overlay_menu_core::{Clock, ManualClock};
///
/// let clock = ManualClock::new(0);
/// clock.advance(16);
/// assert_eq!(clock.now_ms(), 16);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    /// Move the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Jump to `now_ms`. Earlier values are ignored to stay monotonic.
    pub fn set(&self, now_ms: u64) {
        self.now.fetch_max(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(100);
        clock.advance(50);
        assert_eq!(clock.now_ms(), 150);
    }

    #[test]
    fn test_manual_clock_is_monotonic() {
        let clock = ManualClock::new(500);
        clock.set(200);
        assert_eq!(clock.now_ms(), 500);
        clock.set(900);
        assert_eq!(clock.now_ms(), 900);
    }

    #[test]
    fn test_system_clock_never_goes_back() {
        let clock = SystemClock::new();
        let first = clock.now_ms();
        let second = clock.now_ms();
        assert!(second >= first);
    }
}
