//! Game session
//!
//! Owns the run state, the meta-progression record and the collaborators.
//! The host calls `frame` once per display refresh with a monotonically
//! increasing timestamp, plus the UI commands below in between frames.

use crate::audio::{AudioSink, SoundEffect};
use crate::persistence::{SaveData, SaveStore, load_or_default};
use crate::platform::GameClock;
use crate::shop::{self, PurchaseError, UpgradeKind};
use crate::sim::{GamePhase, GameState, HudSnapshot, Outcome, PhaseEvent, TickInput, generate_level, tick};
use crate::tuning::Tuning;

/// Longest frame fed to the simulation (tab-switch guard)
pub const MAX_FRAME_MS: f64 = 250.0;

pub struct Session<S: SaveStore, A: AudioSink> {
    tuning: Tuning,
    state: GameState,
    save: SaveData,
    store: S,
    audio: A,
    clock: GameClock,
    last_frame_ms: Option<f64>,
    hud: HudSnapshot,
    /// Current run's outcome has been applied to `save`
    settled: bool,
}

impl<S: SaveStore, A: AudioSink> Session<S, A> {
    /// Start at the main menu with progress loaded from `store`
    pub fn new(tuning: Tuning, store: S, audio: A) -> Self {
        let save = load_or_default(&store);
        let state = GameState::new(0, tuning.clone(), &save.upgrades);
        let hud = HudSnapshot::from_state(&state, 0.0);
        Self {
            tuning,
            state,
            save,
            store,
            audio,
            clock: GameClock::new(),
            last_frame_ms: None,
            hud,
            settled: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn save_data(&self) -> &SaveData {
        &self.save
    }

    /// Latest HUD projection (refreshed every frame)
    pub fn hud(&self) -> &HudSnapshot {
        &self.hud
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.audio.set_volume(volume);
    }

    // === UI commands ===

    fn command(&mut self, event: PhaseEvent) -> bool {
        let applied = self.state.apply_phase_event(event);
        if applied {
            self.audio.play(SoundEffect::Click);
        }
        applied
    }

    pub fn open_lobby(&mut self) -> bool {
        self.command(PhaseEvent::OpenLobby)
    }

    pub fn open_tutorial(&mut self) -> bool {
        self.command(PhaseEvent::OpenTutorial)
    }

    pub fn close_tutorial(&mut self) -> bool {
        self.command(PhaseEvent::CloseTutorial)
    }

    /// Back to the main menu. From the pause menu this silently abandons the
    /// run and its session currency.
    pub fn return_to_menu(&mut self) -> bool {
        if self.state.phase != GamePhase::Paused {
            return self.command(PhaseEvent::ReturnToMenu);
        }
        let applied = self.state.apply_phase_event(PhaseEvent::ReturnToMenu);
        if applied {
            log::info!("Run aborted, {} session currency lost", self.state.session_currency);
        }
        applied
    }

    /// Leave the report screen
    pub fn continue_to_lobby(&mut self) -> bool {
        self.command(PhaseEvent::Continue)
    }

    pub fn pause(&mut self, now_ms: f64) -> bool {
        let applied = self.state.apply_phase_event(PhaseEvent::Pause);
        self.sync_clock(now_ms);
        applied
    }

    pub fn resume(&mut self, now_ms: f64) -> bool {
        let applied = self.state.apply_phase_event(PhaseEvent::Resume);
        self.sync_clock(now_ms);
        applied
    }

    /// Buy an upgrade with banked currency and persist the result
    pub fn buy_upgrade(&mut self, kind: UpgradeKind) -> Result<u32, PurchaseError> {
        let level = shop::purchase(&mut self.save, kind, self.tuning.upgrade_base_cost)?;
        self.audio.play(SoundEffect::Click);
        self.persist();
        Ok(level)
    }

    /// Cost of the next level of `kind`
    pub fn upgrade_cost(&self, kind: UpgradeKind) -> u64 {
        shop::upgrade_cost(kind.level(&self.save.upgrades), self.tuning.upgrade_base_cost)
    }

    /// Start a fresh run from the lobby.
    ///
    /// Regenerates the level and resets every run-scoped value; banked
    /// currency and upgrades carry over.
    pub fn deploy(&mut self, seed: u64) -> bool {
        if self.state.phase.next(PhaseEvent::Deploy).is_none() {
            return false;
        }

        let mut state = GameState::new(seed, self.tuning.clone(), &self.save.upgrades);
        let level = generate_level(&mut state.rng, state.bounds);
        state.obstacles = level.obstacles;
        state.decorations = level.decorations;
        state.phase = self.state.phase;
        state.apply_phase_event(PhaseEvent::Deploy);

        self.state = state;
        self.clock = GameClock::new();
        self.last_frame_ms = None;
        self.settled = false;
        self.audio.play(SoundEffect::Click);
        log::info!("Deployed run with seed {seed}");
        true
    }

    // === Frame driving ===

    /// Advance one display frame at host time `now_ms`
    pub fn frame(&mut self, now_ms: f64, input: &TickInput) -> &HudSnapshot {
        let dt_ms = match self.last_frame_ms {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);

        tick(&mut self.state, input, dt_ms as f32, self.clock.game_time(now_ms));
        self.sync_clock(now_ms);

        for event in self.state.drain_events() {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.audio.play(effect);
            }
        }

        self.settle_run();

        self.hud = HudSnapshot::from_state(&self.state, self.clock.game_time(now_ms));
        &self.hud
    }

    /// Game time stands still exactly while paused
    fn sync_clock(&mut self, now_ms: f64) {
        if self.state.phase == GamePhase::Paused {
            self.clock.pause(now_ms);
        } else {
            self.clock.resume(now_ms);
        }
    }

    /// Bank session currency on a win, drop it on a loss
    fn settle_run(&mut self) {
        if self.settled {
            return;
        }
        let Some(outcome) = self.state.outcome else {
            return;
        };
        self.settled = true;

        match outcome {
            Outcome::Won => {
                self.save.total_currency += self.state.session_currency;
                log::info!(
                    "Extracted with {} currency, {} banked",
                    self.state.session_currency,
                    self.save.total_currency
                );
                self.persist();
            }
            Outcome::Lost => {
                log::info!("Run lost, {} session currency discarded", self.state.session_currency);
            }
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.save) {
            log::warn!("Failed to save progress: {e}");
        }
    }
}
