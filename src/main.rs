//! Extraction Run entry point
//!
//! Native builds run a headless autopilot through the whole loop (shop,
//! deploy, fight, extract) with logging, driven at a fixed 60 Hz frame
//! clock. Usage: `extraction-run [tuning.json] [save.json]`

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use glam::Vec2;

    use extraction_run::audio::LogAudio;
    use extraction_run::persistence::JsonFileStore;
    use extraction_run::platform::InputState;
    use extraction_run::shop::UpgradeKind;
    use extraction_run::sim::{GamePhase, GameState};
    use extraction_run::{Session, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten minutes of game time
    const MAX_FRAMES: u32 = 36_000;
    /// Back off from enemies closer than this
    const KITE_DISTANCE: f32 = 220.0;

    /// Press or release a movement key pair to follow `amount`
    fn steer(input: &mut InputState, amount: f32, negative: &str, positive: &str) {
        input.key_up(negative);
        input.key_up(positive);
        if amount < -0.3 {
            input.key_down(negative);
        } else if amount > 0.3 {
            input.key_down(positive);
        }
    }

    /// Pick held keys and aim for this frame
    fn drive(state: &GameState, input: &mut InputState) {
        let player = state.player.body.pos;
        let nearest = state
            .enemies
            .iter()
            .min_by(|a, b| {
                let da = a.body.pos.distance_squared(player);
                let db = b.body.pos.distance_squared(player);
                da.total_cmp(&db)
            })
            .map(|e| e.body.pos);

        let heading = match (&state.extraction, nearest) {
            (Some(zone), _) => zone.pos - player,
            (None, Some(enemy)) if enemy.distance(player) < KITE_DISTANCE => player - enemy,
            _ => state.bounds / 2.0 - player,
        };
        let dir = heading.normalize_or_zero();
        steer(input, dir.x, "a", "d");
        steer(input, dir.y, "w", "s");

        match nearest {
            Some(enemy) => {
                input.set_pointer(enemy);
                input.set_fire(true);
            }
            None => {
                input.set_pointer(player + Vec2::X);
                input.set_fire(false);
            }
        }

        let swarmed = nearest.is_some_and(|e| e.distance(player) < KITE_DISTANCE);
        if swarmed {
            input.key_down(" ");
        } else {
            input.key_up(" ");
        }

        let low_ammo = state.player.ammo < state.player.max_ammo / 4;
        if low_ammo && nearest.is_none() {
            input.key_down("r");
        } else {
            input.key_up("r");
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let tuning = match args.next() {
            Some(path) => Tuning::load(path),
            None => Tuning::default(),
        };
        let save_path = args.next().unwrap_or_else(|| "extraction-run-save.json".to_string());

        let mut session = Session::new(tuning, JsonFileStore::new(save_path), LogAudio::new());
        session.open_lobby();

        // Spend banked currency, cheapest line first
        loop {
            let Some(kind) = UpgradeKind::ALL
                .into_iter()
                .min_by_key(|kind| session.upgrade_cost(*kind))
            else {
                break;
            };
            if session.buy_upgrade(kind).is_err() {
                break;
            }
        }

        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        session.deploy(seed);

        let mut input = InputState::new();
        let mut now = 0.0;
        let mut frames = 0;
        while session.phase() != GamePhase::Report && frames < MAX_FRAMES {
            drive(session.state(), &mut input);
            let tick_input = input.take_tick_input();
            let hud = session.frame(now, &tick_input);
            if frames % 600 == 0 {
                log::info!(
                    "t={:>5.1}s hp={} ammo={}/{} score={} currency={} phase={:?}",
                    now / 1000.0,
                    hud.health,
                    hud.ammo,
                    hud.max_ammo,
                    hud.score,
                    hud.session_currency,
                    hud.phase
                );
            }
            now += FRAME_MS;
            frames += 1;
        }

        if session.phase() != GamePhase::Report {
            log::warn!("Autopilot stopped after {frames} frames without an outcome");
        }

        match serde_json::to_string_pretty(session.hud()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize HUD: {e}"),
        }
        log::info!(
            "Banked currency: {} ({} sounds played)",
            session.save_data().total_currency,
            session.audio().played
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Extraction Run (native autopilot) starting...");
    autopilot::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `Session` directly
}
