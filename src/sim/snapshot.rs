//! Read-only HUD projection of the run state

use serde::Serialize;

use super::phase::{GamePhase, Outcome};
use super::state::GameState;

/// What the UI layer shows; copied out of `GameState` once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    /// Rounded up so a sliver of health never reads as 0
    pub health: u32,
    pub max_health: u32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub reloading: bool,
    /// Seconds until extraction opens
    pub time_left: f32,
    /// Seconds held in the zone, if it is open
    pub extraction_progress: Option<f32>,
    pub session_currency: u64,
    pub score: u64,
    pub wave: u32,
    pub phase: GamePhase,
    pub turret_ready: bool,
    pub outcome: Option<Outcome>,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState, now_ms: f64) -> Self {
        let player = &state.player;
        Self {
            health: player.health.max(0.0).ceil() as u32,
            max_health: player.max_health.ceil() as u32,
            ammo: player.ammo,
            max_ammo: player.max_ammo,
            reloading: player.is_reloading(),
            time_left: state.countdown.remaining,
            extraction_progress: state.extraction.as_ref().map(|z| z.progress),
            session_currency: state.session_currency,
            score: state.score,
            wave: state.wave,
            phase: state.phase,
            turret_ready: player.turret_ready.has_passed(now_ms),
            outcome: state.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Upgrades;
    use crate::sim::timer::Deadline;
    use crate::tuning::Tuning;

    #[test]
    fn test_health_rounds_up() {
        let mut state = GameState::new(1, Tuning::default(), &Upgrades::default());
        state.player.health = 0.2;
        let hud = HudSnapshot::from_state(&state, 0.0);
        assert_eq!(hud.health, 1);
        assert_eq!(hud.max_health, 100);

        state.player.health = 99.5;
        assert_eq!(HudSnapshot::from_state(&state, 0.0).health, 100);
    }

    #[test]
    fn test_turret_ready_flag() {
        let mut state = GameState::new(1, Tuning::default(), &Upgrades::default());
        assert!(HudSnapshot::from_state(&state, 0.0).turret_ready);
        state.player.turret_ready = Deadline::at(5000.0);
        assert!(!HudSnapshot::from_state(&state, 4000.0).turret_ready);
        assert!(HudSnapshot::from_state(&state, 5001.0).turret_ready);
    }

    #[test]
    fn test_serializes_for_ui() {
        let state = GameState::new(1, Tuning::default(), &Upgrades::default());
        let json = serde_json::to_value(HudSnapshot::from_state(&state, 0.0)).unwrap();
        assert_eq!(json["ammo"], 30);
        assert_eq!(json["phase"], "Menu");
        assert_eq!(json["time_left"], 120.0);
    }
}
