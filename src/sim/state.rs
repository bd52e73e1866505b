//! Game state and core simulation types
//!
//! Everything a run owns lives in `GameState`. Entity categories are kept in
//! parallel homogeneous collections and share the `Body` base through the
//! `Entity` trait.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Obstacle;
use super::phase::{GamePhase, Outcome, PhaseEvent};
use super::timer::{Countdown, Deadline};
use crate::consts::*;
use crate::persistence::Upgrades;
use crate::tuning::Tuning;

/// Shared base shape of every mobile thing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Facing angle (radians)
    pub rotation: f32,
    /// Marked for removal at the end of the frame
    pub dead: bool,
}

impl Body {
    pub fn new(id: u32, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            rotation: 0.0,
            dead: false,
        }
    }
}

/// Access to the common base of an entity category
pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn is_dead(&self) -> bool {
        self.body().dead
    }

    fn kill(&mut self) {
        self.body_mut().dead = true;
    }
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                #[inline]
                fn body(&self) -> &Body {
                    &self.body
                }
                #[inline]
                fn body_mut(&mut self) -> &mut Body {
                    &mut self.body
                }
            }
        )*
    };
}

impl_entity!(Player, Enemy, Bullet, Scrap, Turret, Particle);

/// Remove every dead entity from a collection
pub fn purge_dead<T: Entity>(entities: &mut Vec<T>) {
    entities.retain(|e| !e.is_dead());
}

/// Weapon reload state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReloadState {
    Ready,
    Reloading { started_ms: f64 },
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub health: f32,
    pub max_health: f32,
    /// Movement per frame
    pub speed: f32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub reload: ReloadState,
    /// Earliest moment the next shot may fire
    pub next_shot: Deadline,
    /// Shot interval after fire-rate upgrades
    pub fire_interval_ms: f64,
    pub damage_multiplier: f32,
    /// Gadget (turret) becomes available after this
    pub turret_ready: Deadline,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning, upgrades: &Upgrades) -> Self {
        Self {
            body: Body::new(0, pos, PLAYER_RADIUS),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            speed: tuning.base_player_speed * (1.0 + upgrades.speed_level as f32 * SPEED_PER_LEVEL),
            ammo: tuning.magazine_size,
            max_ammo: tuning.magazine_size,
            reload: ReloadState::Ready,
            next_shot: Deadline::PASSED,
            fire_interval_ms: tuning.fire_interval_ms / upgrades.fire_rate_level.max(1) as f64,
            damage_multiplier: 1.0 + upgrades.damage_level as f32 * DAMAGE_PER_LEVEL,
            turret_ready: Deadline::PASSED,
        }
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.reload, ReloadState::Reloading { .. })
    }

    /// Apply damage, clamping health into `[0, max_health]`
    pub fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        if self.health <= 0.0 {
            self.body.dead = true;
        }
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast, fragile
    Drone,
    /// Slow, tough
    Walker,
}

impl EnemyKind {
    pub fn radius(self) -> f32 {
        match self {
            EnemyKind::Drone => DRONE_RADIUS,
            EnemyKind::Walker => WALKER_RADIUS,
        }
    }

    pub fn base_health(self) -> f32 {
        match self {
            EnemyKind::Drone => DRONE_HEALTH,
            EnemyKind::Walker => WALKER_HEALTH,
        }
    }

    pub fn speed(self, tuning: &Tuning) -> f32 {
        match self {
            EnemyKind::Drone => tuning.drone_speed,
            EnemyKind::Walker => tuning.walker_speed,
        }
    }

    pub fn score(self) -> u64 {
        match self {
            EnemyKind::Drone => DRONE_SCORE,
            EnemyKind::Walker => WALKER_SCORE,
        }
    }

    /// Explosion intensity on death
    pub fn explosion(self) -> u32 {
        match self {
            EnemyKind::Drone => DRONE_EXPLOSION,
            EnemyKind::Walker => WALKER_EXPLOSION,
        }
    }

    /// Scrap pickups dropped on death
    pub fn scrap_drop(self) -> u32 {
        match self {
            EnemyKind::Drone => DRONE_SCRAP,
            EnemyKind::Walker => WALKER_SCRAP,
        }
    }
}

/// An enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    /// May go negative; death triggers at <= 0
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    /// Idle animation phase offset
    pub phase_offset: f32,
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletSource {
    Player,
    Turret,
}

impl BulletSource {
    /// Display color (RGB)
    pub fn color(self) -> u32 {
        match self {
            BulletSource::Player => 0x06b6d4,
            BulletSource::Turret => 0x10b981,
        }
    }
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub body: Body,
    pub damage: f32,
    pub source: BulletSource,
    pub color: u32,
}

/// A currency pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scrap {
    pub body: Body,
    pub value: u64,
    /// Magnet range, larger than the physical radius
    pub attract_radius: f32,
}

/// A deployed auto-turret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub body: Body,
    /// Remaining lifespan (ms)
    pub life: Countdown,
    pub max_life: f32,
    pub next_shot: Deadline,
    /// Enemy currently aimed at
    pub target: Option<u32>,
}

/// Particle categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Spark,
    Debris,
}

impl ParticleKind {
    pub fn color(self) -> u32 {
        match self {
            ParticleKind::Spark => 0xf59e0b,
            ParticleKind::Debris => 0x334155,
        }
    }
}

/// A visual particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub body: Body,
    pub kind: ParticleKind,
    /// 1 at birth, dead at 0
    pub life: f32,
    /// Lifetime in seconds
    pub max_life: f32,
    pub size: f32,
    pub color: u32,
    /// Radians per frame
    pub spin: Option<f32>,
}

/// Decoration categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorationKind {
    Rubble,
    Crater,
}

/// A visual-only floor prop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decoration {
    pub pos: Vec2,
    pub size: f32,
    pub rotation: f32,
    pub kind: DecorationKind,
}

/// The circle the player must hold to extract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionZone {
    pub pos: Vec2,
    pub radius: f32,
    /// Seconds held so far
    pub progress: f32,
}

/// Notifications raised during a tick for collaborators (audio, UI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerShot,
    TurretShot,
    Explosion { pos: Vec2, intensity: u32 },
    TurretDeployed { pos: Vec2 },
    ReloadStarted,
    ReloadFinished,
    ScrapCollected { value: u64 },
    EnemyKilled { kind: EnemyKind },
    ExtractionOpened { pos: Vec2 },
    RunEnded(Outcome),
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed
    pub seed: u64,
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Playfield size
    pub bounds: Vec2,
    pub phase: GamePhase,
    /// Total simulated time (ms)
    pub run_time_ms: f64,
    /// Seconds until the extraction zone opens
    pub countdown: Countdown,
    pub extraction: Option<ExtractionZone>,
    /// Currency earned this run (lost unless extracted)
    pub session_currency: u64,
    pub score: u64,
    pub wave: u32,
    pub screen_shake: f32,
    pub outcome: Option<Outcome>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub scrap: Vec<Scrap>,
    pub turrets: Vec<Turret>,
    pub particles: Vec<Particle>,
    pub obstacles: Vec<Obstacle>,
    pub decorations: Vec<Decoration>,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID (0 is the player)
    next_id: u32,
}

impl GameState {
    /// Create an empty run in the main menu
    pub fn new(seed: u64, tuning: Tuning, upgrades: &Upgrades) -> Self {
        let center = tuning.arena_center();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bounds: Vec2::new(tuning.arena_width, tuning.arena_height),
            phase: GamePhase::Menu,
            run_time_ms: 0.0,
            countdown: Countdown::new(tuning.run_duration_secs),
            extraction: None,
            session_currency: 0,
            score: 0,
            wave: 1,
            screen_shake: 0.0,
            outcome: None,
            player: Player::new(center, &tuning, upgrades),
            enemies: Vec::new(),
            bullets: Vec::new(),
            scrap: Vec::new(),
            turrets: Vec::new(),
            particles: Vec::new(),
            obstacles: Vec::new(),
            decorations: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Apply a phase event, logging the transition. Returns whether it applied.
    pub fn apply_phase_event(&mut self, event: PhaseEvent) -> bool {
        match self.phase.next(event) {
            Some(next) => {
                if next != self.phase {
                    log::info!("Phase {:?} -> {:?} ({:?})", self.phase, next, event);
                }
                self.phase = next;
                true
            }
            None => false,
        }
    }

    /// End the run. Only the first outcome sticks.
    pub fn end_run(&mut self, outcome: Outcome) {
        if self.outcome.is_some() {
            return;
        }
        let event = match outcome {
            Outcome::Won => PhaseEvent::Extracted,
            Outcome::Lost => PhaseEvent::Died,
        };
        if self.apply_phase_event(event) {
            self.outcome = Some(outcome);
            self.events.push(GameEvent::RunEnded(outcome));
            log::info!(
                "Run ended: {:?} (score {}, session currency {})",
                outcome,
                self.score,
                self.session_currency
            );
        }
    }

    /// Drop every dead entity
    pub fn purge_dead(&mut self) {
        purge_dead(&mut self.enemies);
        purge_dead(&mut self.bullets);
        purge_dead(&mut self.particles);
        purge_dead(&mut self.scrap);
        purge_dead(&mut self.turrets);
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether the simulation advances in the current phase
    pub fn is_simulating(&self) -> bool {
        self.phase.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(1, Tuning::default(), &Upgrades::default())
    }

    #[test]
    fn test_new_state() {
        let s = state();
        assert_eq!(s.phase, GamePhase::Menu);
        assert_eq!(s.player.body.pos, Vec2::new(640.0, 360.0));
        assert_eq!(s.player.ammo, 30);
        assert!(s.extraction.is_none());
        assert!(s.enemies.is_empty());
    }

    #[test]
    fn test_player_upgrades() {
        let upgrades = Upgrades {
            damage_level: 2,
            fire_rate_level: 3,
            speed_level: 5,
        };
        let p = Player::new(Vec2::ZERO, &Tuning::default(), &upgrades);
        assert!((p.speed - 6.0).abs() < 1e-5);
        assert!((p.damage_multiplier - 1.4).abs() < 1e-5);
        assert!((p.fire_interval_ms - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_damage_clamps_health() {
        let mut s = state();
        s.player.health = 0.4;
        s.player.apply_damage(0.5);
        assert_eq!(s.player.health, 0.0);
        assert!(s.player.body.dead);

        let mut s = state();
        s.player.apply_damage(-50.0);
        assert_eq!(s.player.health, s.player.max_health);
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut s = state();
        let a = s.next_entity_id();
        let b = s.next_entity_id();
        assert!(b > a);
        assert_ne!(a, s.player.body.id);
    }

    #[test]
    fn test_kill_then_purge() {
        let mut s = state();
        for _ in 0..3 {
            let id = s.next_entity_id();
            s.scrap.push(Scrap {
                body: Body::new(id, Vec2::ZERO, 6.0),
                value: 10,
                attract_radius: 50.0,
            });
        }
        s.scrap[1].kill();
        assert!(s.scrap[1].is_dead());
        assert!(!s.scrap[0].is_dead());

        s.purge_dead();
        assert_eq!(s.scrap.len(), 2);
        assert!(s.scrap.iter().all(|e| !e.is_dead()));
    }

    #[test]
    fn test_end_run_is_idempotent() {
        let mut s = state();
        s.phase = GamePhase::Extracting;
        s.end_run(Outcome::Won);
        s.end_run(Outcome::Lost);
        assert_eq!(s.outcome, Some(Outcome::Won));
        assert_eq!(s.phase, GamePhase::Report);
        assert_eq!(s.drain_events(), vec![GameEvent::RunEnded(Outcome::Won)]);
        assert!(s.events.is_empty());
    }

    #[test]
    fn test_fresh_state_json_roundtrip() {
        let s = state();
        let json = serde_json::to_string(&s).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(back.seed, s.seed);
        assert_eq!(back.phase, s.phase);
        assert_eq!(back.tuning, s.tuning);
        assert_eq!(back.player.ammo, s.player.ammo);
        assert_eq!(back.player.next_shot, s.player.next_shot);
        assert_eq!(back.player.turret_ready, s.player.turret_ready);
        assert!(back.player.next_shot.has_passed(0.0));
        assert!(back.player.turret_ready.has_passed(0.0));
    }
}
