//! Simulation core
//!
//! All gameplay logic lives here. It never touches rendering, audio or
//! storage; collaborators read `GameState`, drained `GameEvent`s and the
//! `HudSnapshot`.
//! - Seeded RNG only (one `Pcg32` per run)
//! - Per-frame movement, millisecond timers
//! - Entities are removed only in the end-of-frame purge

pub mod collision;
pub mod level;
pub mod phase;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Obstacle, attempt_move, circle_rect_intersects, is_position_blocked};
pub use level::{Level, generate_level, place_extraction_zone};
pub use phase::{GamePhase, Outcome, PhaseEvent};
pub use snapshot::HudSnapshot;
pub use state::{
    Body, Bullet, BulletSource, Decoration, DecorationKind, Enemy, EnemyKind, Entity,
    ExtractionZone, GameEvent, GameState, Particle, ParticleKind, Player, ReloadState, Scrap,
    Turret,
};
pub use tick::{TickInput, tick};
pub use timer::{Countdown, Deadline};
