//! Pausable game clock
//!
//! The host delivers monotonically increasing wall-clock timestamps. The
//! simulation reads game time instead: wall time minus everything spent
//! paused, so deadline timers (reload, fire rate, gadget) freeze while the
//! game is paused.

/// Maps host timestamps (ms) to game time (ms)
#[derive(Debug, Clone, Default)]
pub struct GameClock {
    paused_total_ms: f64,
    paused_at: Option<f64>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Stop game time at `now_ms`. No-op if already paused.
    pub fn pause(&mut self, now_ms: f64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now_ms);
        }
    }

    /// Resume game time. No-op if not paused.
    pub fn resume(&mut self, now_ms: f64) {
        if let Some(at) = self.paused_at.take() {
            self.paused_total_ms += (now_ms - at).max(0.0);
        }
    }

    /// Game time at host time `now_ms`
    pub fn game_time(&self, now_ms: f64) -> f64 {
        let now = self.paused_at.unwrap_or(now_ms);
        now - self.paused_total_ms
    }
}
