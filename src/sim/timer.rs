//! The two timer styles used by the simulation
//!
//! - `Deadline`: a point on the monotonic game clock. Immune to frame-time
//!   integration error. Used for reload, fire rate and gadget cooldowns.
//! - `Countdown`: a remaining amount reduced by summed frame deltas. Used for
//!   the extraction countdown and turret lifespans.

use serde::{Deserialize, Serialize};

/// A moment on the game clock (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deadline {
    pub at_ms: f64,
}

impl Deadline {
    /// A deadline that has always already passed. Finite so it survives JSON.
    pub const PASSED: Deadline = Deadline { at_ms: f64::MIN };

    pub fn at(at_ms: f64) -> Self {
        Self { at_ms }
    }

    /// Deadline `duration_ms` after `start_ms`
    pub fn after(start_ms: f64, duration_ms: f64) -> Self {
        Self { at_ms: start_ms + duration_ms }
    }

    /// Strictly past the deadline
    #[inline]
    pub fn has_passed(&self, now_ms: f64) -> bool {
        now_ms > self.at_ms
    }

    /// Milliseconds left (0 once passed)
    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        (self.at_ms - now_ms).max(0.0)
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::PASSED
    }
}

/// An accumulated-delta countdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    pub remaining: f32,
}

impl Countdown {
    pub fn new(remaining: f32) -> Self {
        Self { remaining }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Subtract `amount`. Returns true only on the call that reaches zero;
    /// the remaining value snaps to exactly 0.
    pub fn advance(&mut self, amount: f32) -> bool {
        if self.is_expired() {
            return false;
        }
        self.remaining -= amount;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_is_strict() {
        let d = Deadline::after(1000.0, 1500.0);
        assert!(!d.has_passed(2500.0));
        assert!(d.has_passed(2500.1));
        assert_eq!(d.remaining_ms(2000.0), 500.0);
        assert_eq!(d.remaining_ms(9000.0), 0.0);
    }

    #[test]
    fn test_passed_deadline() {
        assert!(Deadline::PASSED.has_passed(0.0));
        assert!(Deadline::default().has_passed(-1.0e12));
        assert_eq!(Deadline::PASSED.remaining_ms(0.0), 0.0);
    }

    #[test]
    fn test_passed_deadline_json() {
        let json = serde_json::to_string(&Deadline::PASSED).unwrap();
        let back: Deadline = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Deadline::PASSED);
        assert!(back.has_passed(0.0));
    }

    #[test]
    fn test_countdown_snaps_once() {
        let mut c = Countdown::new(0.016);
        assert!(c.advance(0.020));
        assert_eq!(c.remaining, 0.0);
        // Already expired: no second crossing
        assert!(!c.advance(0.020));
        assert_eq!(c.remaining, 0.0);
    }

    #[test]
    fn test_countdown_partial() {
        let mut c = Countdown::new(1.0);
        assert!(!c.advance(0.25));
        assert!((c.remaining - 0.75).abs() < 1e-6);
        assert!(!c.is_expired());
    }
}
