//! Entity factories
//!
//! Randomized but bounded construction of enemies, pickups, effects and
//! projectiles. Every factory takes the RNG explicitly so runs stay
//! reproducible from their seed.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{
    Body, Bullet, BulletSource, Enemy, EnemyKind, GameEvent, GameState, Particle, ParticleKind,
    Scrap, Turret,
};
use super::timer::{Countdown, Deadline};
use crate::consts::*;
use crate::{direction, random_range};

/// Edge of the playfield an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..4) {
            0 => Side::Top,
            1 => Side::Right,
            2 => Side::Bottom,
            _ => Side::Left,
        }
    }

    /// Random point just outside this edge
    pub fn spawn_point<R: Rng + ?Sized>(self, rng: &mut R, bounds: Vec2) -> Vec2 {
        let m = ENEMY_SPAWN_MARGIN;
        match self {
            Side::Top => Vec2::new(rng.random::<f32>() * bounds.x, -m),
            Side::Right => Vec2::new(bounds.x + m, rng.random::<f32>() * bounds.y),
            Side::Bottom => Vec2::new(rng.random::<f32>() * bounds.x, bounds.y + m),
            Side::Left => Vec2::new(-m, rng.random::<f32>() * bounds.y),
        }
    }
}

/// Build an enemy of `kind` at `pos`, health scaled by the current score
pub fn make_enemy<R: Rng + ?Sized>(
    rng: &mut R,
    id: u32,
    kind: EnemyKind,
    pos: Vec2,
    speed: f32,
    score: u64,
) -> Enemy {
    let health = kind.base_health() * (1.0 + score as f32 / ENEMY_HEALTH_SCORE_DIVISOR);
    Enemy {
        body: Body::new(id, pos, kind.radius()),
        kind,
        health,
        max_health: health,
        speed,
        phase_offset: rng.random::<f32>() * TAU,
    }
}

/// Spawn one enemy just outside a random screen edge
pub fn spawn_enemy(state: &mut GameState) {
    let id = state.next_entity_id();
    let rng = &mut state.rng;
    let kind = if rng.random_bool(WALKER_CHANCE) {
        EnemyKind::Walker
    } else {
        EnemyKind::Drone
    };
    let pos = Side::random(rng).spawn_point(rng, state.bounds);
    let speed = kind.speed(&state.tuning);
    let enemy = make_enemy(rng, id, kind, pos, speed, state.score);
    state.enemies.push(enemy);
}

/// Scatter `count` scrap pickups from `pos`
pub fn spawn_scrap(state: &mut GameState, pos: Vec2, count: u32) {
    for _ in 0..count {
        let id = state.next_entity_id();
        let rng = &mut state.rng;
        let angle = rng.random::<f32>() * TAU;
        let speed = random_range(rng, 1.0, 3.0);
        let mut body = Body::new(id, pos, SCRAP_RADIUS);
        body.vel = direction(angle) * speed;
        body.rotation = rng.random::<f32>() * TAU;
        state.scrap.push(Scrap {
            body,
            value: SCRAP_VALUE,
            attract_radius: SCRAP_ATTRACT_RADIUS,
        });
    }
}

/// A fast, short-lived spark
pub fn make_spark<R: Rng + ?Sized>(rng: &mut R, id: u32, pos: Vec2) -> Particle {
    let angle = rng.random::<f32>() * TAU;
    let speed = random_range(rng, 2.0, 8.0);
    let mut body = Body::new(id, pos, random_range(rng, 0.5, 2.0));
    body.vel = direction(angle) * speed;
    body.rotation = angle;
    Particle {
        body,
        kind: ParticleKind::Spark,
        life: 1.0,
        max_life: random_range(rng, 0.3, 0.6),
        size: random_range(rng, 1.0, 3.0),
        color: ParticleKind::Spark.color(),
        spin: None,
    }
}

/// A slow, tumbling debris chunk
pub fn make_debris<R: Rng + ?Sized>(rng: &mut R, id: u32, pos: Vec2) -> Particle {
    let angle = rng.random::<f32>() * TAU;
    let speed = random_range(rng, 1.0, 4.0);
    let mut body = Body::new(id, pos, random_range(rng, 2.0, 5.0));
    body.vel = direction(angle) * speed;
    body.rotation = rng.random::<f32>() * TAU;
    Particle {
        body,
        kind: ParticleKind::Debris,
        life: 1.0,
        max_life: random_range(rng, 0.8, 1.5),
        size: random_range(rng, 3.0, 8.0),
        color: ParticleKind::Debris.color(),
        spin: Some(random_range(rng, -0.2, 0.2)),
    }
}

/// Burst of `intensity * 2` sparks and `intensity` debris, plus screen shake
pub fn create_explosion(state: &mut GameState, pos: Vec2, intensity: u32) {
    for _ in 0..intensity * 2 {
        let id = state.next_entity_id();
        let spark = make_spark(&mut state.rng, id, pos);
        state.particles.push(spark);
    }
    for _ in 0..intensity {
        let id = state.next_entity_id();
        let debris = make_debris(&mut state.rng, id, pos);
        state.particles.push(debris);
    }
    state.screen_shake += intensity as f32 * EXPLOSION_SHAKE_PER_INTENSITY;
    state.events.push(GameEvent::Explosion { pos, intensity });
}

/// A bullet leaving `origin` along `angle`
pub fn make_bullet(id: u32, origin: Vec2, angle: f32, speed: f32, damage: f32, source: BulletSource) -> Bullet {
    let mut body = Body::new(id, origin, BULLET_RADIUS);
    body.vel = direction(angle) * speed;
    body.rotation = angle;
    Bullet {
        body,
        damage,
        source,
        color: source.color(),
    }
}

/// A turret at `pos` living `lifespan_ms`
pub fn make_turret(id: u32, pos: Vec2, rotation: f32, lifespan_ms: f32) -> Turret {
    let mut body = Body::new(id, pos, TURRET_RADIUS);
    body.rotation = rotation;
    Turret {
        body,
        life: Countdown::new(lifespan_ms),
        max_life: lifespan_ms,
        next_shot: Deadline::PASSED,
        target: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Upgrades;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state() -> GameState {
        GameState::new(42, Tuning::default(), &Upgrades::default())
    }

    #[test]
    fn test_enemy_health_scales_with_score() {
        let mut rng = Pcg32::seed_from_u64(1);
        let e = make_enemy(&mut rng, 1, EnemyKind::Walker, Vec2::ZERO, 1.0, 2000);
        assert!((e.health - 24.0).abs() < 1e-5);
        assert_eq!(e.health, e.max_health);
        assert_eq!(e.body.radius, WALKER_RADIUS);
        assert!((0.0..=TAU).contains(&e.phase_offset));
    }

    #[test]
    fn test_spawned_enemies_start_off_screen() {
        let mut s = state();
        for _ in 0..200 {
            spawn_enemy(&mut s);
        }
        let b = s.bounds;
        for e in &s.enemies {
            let p = e.body.pos;
            let outside = p.x < 0.0 || p.y < 0.0 || p.x > b.x || p.y > b.y;
            assert!(outside, "enemy spawned on screen at {p:?}");
            assert_eq!(e.speed, e.kind.speed(&s.tuning));
        }
        let walkers = s.enemies.iter().filter(|e| e.kind == EnemyKind::Walker).count();
        // ~20% walkers
        assert!((15..=70).contains(&walkers), "walkers: {walkers}");
    }

    #[test]
    fn test_explosion_counts_and_shake() {
        let mut s = state();
        create_explosion(&mut s, Vec2::new(10.0, 10.0), 5);
        let sparks = s.particles.iter().filter(|p| p.kind == ParticleKind::Spark).count();
        let debris = s.particles.iter().filter(|p| p.kind == ParticleKind::Debris).count();
        assert_eq!(sparks, 10);
        assert_eq!(debris, 5);
        assert!((s.screen_shake - 4.0).abs() < 1e-5);
        for p in &s.particles {
            match p.kind {
                ParticleKind::Spark => {
                    assert!((0.3..=0.6).contains(&p.max_life));
                    assert!(p.spin.is_none());
                }
                ParticleKind::Debris => {
                    assert!((0.8..=1.5).contains(&p.max_life));
                    assert!(p.spin.is_some());
                }
            }
            assert_eq!(p.life, 1.0);
        }
        assert_eq!(
            s.events,
            vec![GameEvent::Explosion { pos: Vec2::new(10.0, 10.0), intensity: 5 }]
        );
    }

    #[test]
    fn test_scrap_scatter() {
        let mut s = state();
        spawn_scrap(&mut s, Vec2::new(100.0, 100.0), 5);
        assert_eq!(s.scrap.len(), 5);
        for scrap in &s.scrap {
            let speed = scrap.body.vel.length();
            assert!((0.999..=3.001).contains(&speed));
            assert_eq!(scrap.value, SCRAP_VALUE);
            assert!(scrap.attract_radius > scrap.body.radius);
        }
    }

    #[test]
    fn test_bullet_heading() {
        let b = make_bullet(3, Vec2::ZERO, 0.0, 12.0, 2.5, BulletSource::Turret);
        assert_eq!(b.body.vel, Vec2::new(12.0, 0.0));
        assert_eq!(b.color, BulletSource::Turret.color());
    }
}
