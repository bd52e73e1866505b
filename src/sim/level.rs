//! Level generation
//!
//! One static layout per deployment: rectangular walls kept clear of the
//! spawn point, plus purely visual floor props.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::collision::{Obstacle, is_position_blocked};
use super::state::{Decoration, DecorationKind};
use crate::consts::*;
use crate::random_range;

/// A generated layout
#[derive(Debug, Clone, Default)]
pub struct Level {
    pub obstacles: Vec<Obstacle>,
    pub decorations: Vec<Decoration>,
}

/// Generate walls and props for a playfield of size `bounds`.
///
/// Candidates whose center falls within `SPAWN_CLEARANCE` of the playfield
/// center are dropped, not retried, so a level has at most
/// `OBSTACLE_CANDIDATES` walls.
pub fn generate_level<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2) -> Level {
    let center = bounds / 2.0;
    let mut obstacles = Vec::with_capacity(OBSTACLE_CANDIDATES);

    for i in 0..OBSTACLE_CANDIDATES {
        let w = random_range(rng, OBSTACLE_MIN_SIZE, OBSTACLE_MAX_SIZE);
        let h = random_range(rng, OBSTACLE_MIN_SIZE, OBSTACLE_MAX_SIZE);
        let x = random_range(rng, 0.0, (bounds.x - w).max(0.0));
        let y = random_range(rng, 0.0, (bounds.y - h).max(0.0));
        let obstacle = Obstacle::new(i as u32, x, y, w, h);
        if obstacle.center().distance(center) > SPAWN_CLEARANCE {
            obstacles.push(obstacle);
        }
    }

    let decorations = (0..DECORATION_COUNT)
        .map(|_| Decoration {
            pos: Vec2::new(
                random_range(rng, 0.0, bounds.x),
                random_range(rng, 0.0, bounds.y),
            ),
            size: random_range(rng, DECORATION_MIN_SIZE, DECORATION_MAX_SIZE),
            rotation: random_range(rng, 0.0, TAU),
            kind: if rng.random_bool(RUBBLE_CHANCE) {
                DecorationKind::Rubble
            } else {
                DecorationKind::Crater
            },
        })
        .collect();

    log::info!(
        "Generated level: {} obstacles ({} rejected near spawn), {} decorations",
        obstacles.len(),
        OBSTACLE_CANDIDATES - obstacles.len(),
        DECORATION_COUNT
    );

    Level {
        obstacles,
        decorations,
    }
}

/// Pick an extraction zone center inside the playfield margin.
///
/// Tries `ZONE_PLACEMENT_ATTEMPTS` spots clear of obstacles; if none is
/// found the last candidate is used anyway.
pub fn place_extraction_zone<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: Vec2,
    radius: f32,
    obstacles: &[Obstacle],
) -> Vec2 {
    let mut attempts = 0;
    loop {
        let pos = Vec2::new(
            random_range(rng, ZONE_MARGIN, bounds.x - ZONE_MARGIN),
            random_range(rng, ZONE_MARGIN, bounds.y - ZONE_MARGIN),
        );
        attempts += 1;
        if !is_position_blocked(pos, radius, obstacles) {
            return pos;
        }
        if attempts >= ZONE_PLACEMENT_ATTEMPTS {
            log::warn!("No clear extraction spot after {} attempts, using {:?}", attempts, pos);
            return pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const BOUNDS: Vec2 = Vec2::new(1280.0, 720.0);

    #[test]
    fn test_level_respects_limits() {
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let level = generate_level(&mut rng, BOUNDS);

            assert!(level.obstacles.len() <= OBSTACLE_CANDIDATES);
            assert_eq!(level.decorations.len(), DECORATION_COUNT);

            for obs in &level.obstacles {
                assert!((OBSTACLE_MIN_SIZE..=OBSTACLE_MAX_SIZE).contains(&obs.size.x));
                assert!((OBSTACLE_MIN_SIZE..=OBSTACLE_MAX_SIZE).contains(&obs.size.y));
                assert!(obs.pos.x >= 0.0 && obs.max().x <= BOUNDS.x + 1e-3);
                assert!(obs.pos.y >= 0.0 && obs.max().y <= BOUNDS.y + 1e-3);
                assert!(obs.center().distance(BOUNDS / 2.0) > SPAWN_CLEARANCE);
            }
            for d in &level.decorations {
                assert!((DECORATION_MIN_SIZE..=DECORATION_MAX_SIZE).contains(&d.size));
            }
        }
    }

    #[test]
    fn test_huge_field_keeps_every_candidate() {
        // The clearance circle is a negligible share of this playfield
        let bounds = Vec2::new(1_000_000.0, 1_000_000.0);
        for seed in 0..5 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let level = generate_level(&mut rng, bounds);
            assert_eq!(level.obstacles.len(), OBSTACLE_CANDIDATES);
        }
    }

    #[test]
    fn test_spawn_point_is_clear() {
        // Worst case: a 200x200 wall centered just beyond the clearance
        // still leaves room for the player at the center.
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let level = generate_level(&mut rng, BOUNDS);
            assert!(!is_position_blocked(BOUNDS / 2.0, PLAYER_RADIUS, &level.obstacles));
        }
    }

    #[test]
    fn test_zone_avoids_obstacles() {
        let mut rng = Pcg32::seed_from_u64(3);
        let wall = Obstacle::new(0, 0.0, 0.0, 640.0, 720.0);
        for _ in 0..20 {
            let pos = place_extraction_zone(&mut rng, BOUNDS, 100.0, &[wall.clone()]);
            assert!(!is_position_blocked(pos, 100.0, &[wall.clone()]));
            assert!(pos.x >= ZONE_MARGIN && pos.x <= BOUNDS.x - ZONE_MARGIN);
        }
    }

    #[test]
    fn test_zone_falls_back_when_fully_blocked() {
        let mut rng = Pcg32::seed_from_u64(3);
        let wall = Obstacle::new(0, 0.0, 0.0, BOUNDS.x, BOUNDS.y);
        let pos = place_extraction_zone(&mut rng, BOUNDS, 100.0, &[wall]);
        assert!(pos.x >= ZONE_MARGIN && pos.y >= ZONE_MARGIN);
        assert!(pos.x <= BOUNDS.x - ZONE_MARGIN && pos.y <= BOUNDS.y - ZONE_MARGIN);
    }

    #[test]
    fn test_same_seed_same_level() {
        let a = generate_level(&mut Pcg32::seed_from_u64(9), BOUNDS);
        let b = generate_level(&mut Pcg32::seed_from_u64(9), BOUNDS);
        assert_eq!(a.obstacles, b.obstacles);
    }
}
