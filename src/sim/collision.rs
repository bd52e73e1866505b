//! Collision detection and movement resolution against static obstacles
//!
//! Everything that walks uses `attempt_move`: each axis is tried on its own
//! so an entity blocked on one axis still slides along the other.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Body;

/// A static axis-aligned wall (top-left corner + size)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    pub fn new(id: u32, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// True if the point of `rect` closest to `center` lies within `radius`
pub fn circle_rect_intersects(center: Vec2, radius: f32, rect: &Obstacle) -> bool {
    let closest = center.clamp(rect.min(), rect.max());
    center.distance_squared(closest) < radius * radius
}

/// True if a circle at `pos` overlaps any obstacle
pub fn is_position_blocked(pos: Vec2, radius: f32, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|obs| circle_rect_intersects(pos, radius, obs))
}

/// Move `body` by `delta`, one axis at a time.
///
/// Each candidate coordinate is clamped to the playfield (inset by the body
/// radius) and committed only if it does not overlap an obstacle.
/// Returns which axes were blocked.
pub fn attempt_move(body: &mut Body, delta: Vec2, bounds: Vec2, obstacles: &[Obstacle]) -> (bool, bool) {
    let r = body.radius;

    let next_x = (body.pos.x + delta.x).clamp(r, (bounds.x - r).max(r));
    let blocked_x = is_position_blocked(Vec2::new(next_x, body.pos.y), r, obstacles);
    if !blocked_x {
        body.pos.x = next_x;
    }

    let next_y = (body.pos.y + delta.y).clamp(r, (bounds.y - r).max(r));
    let blocked_y = is_position_blocked(Vec2::new(body.pos.x, next_y), r, obstacles);
    if !blocked_y {
        body.pos.y = next_y;
    }

    (blocked_x, blocked_y)
}

/// Advance a bouncing body by its velocity without bounds clamping.
///
/// A blocked axis keeps its position and reflects its velocity, scaled by
/// `restitution` (negative).
pub fn bounce_move(body: &mut Body, restitution: f32, obstacles: &[Obstacle]) {
    let next = body.pos + body.vel;
    let r = body.radius;

    if is_position_blocked(Vec2::new(next.x, body.pos.y), r, obstacles) {
        body.vel.x *= restitution;
    } else {
        body.pos.x = next.x;
    }

    if is_position_blocked(Vec2::new(body.pos.x, next.y), r, obstacles) {
        body.vel.y *= restitution;
    } else {
        body.pos.y = next.y;
    }
}

/// Circle-circle overlap (strict)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BOUNDS: Vec2 = Vec2::new(1000.0, 1000.0);

    fn body_at(x: f32, y: f32, radius: f32) -> Body {
        Body::new(1, Vec2::new(x, y), radius)
    }

    #[test]
    fn test_circle_rect_intersects() {
        let rect = Obstacle::new(0, 100.0, 100.0, 50.0, 50.0);
        // Center inside the rect
        assert!(circle_rect_intersects(Vec2::new(120.0, 120.0), 1.0, &rect));
        // Touching the left edge within radius
        assert!(circle_rect_intersects(Vec2::new(95.0, 120.0), 6.0, &rect));
        // Exactly radius away does not count
        assert!(!circle_rect_intersects(Vec2::new(90.0, 120.0), 10.0, &rect));
        // Near the corner but outside on the diagonal
        assert!(!circle_rect_intersects(Vec2::new(92.0, 92.0), 10.0, &rect));
    }

    #[test]
    fn test_move_free() {
        let mut body = body_at(500.0, 500.0, 10.0);
        let blocked = attempt_move(&mut body, Vec2::new(3.0, -4.0), BOUNDS, &[]);
        assert_eq!(blocked, (false, false));
        assert_eq!(body.pos, Vec2::new(503.0, 496.0));
    }

    #[test]
    fn test_move_clamped_to_bounds() {
        let mut body = body_at(12.0, 995.0, 10.0);
        attempt_move(&mut body, Vec2::new(-50.0, 50.0), BOUNDS, &[]);
        assert_eq!(body.pos, Vec2::new(10.0, 990.0));
    }

    #[test]
    fn test_wall_slide() {
        // Wall directly to the right; only the x approach is blocked
        let wall = Obstacle::new(0, 215.0, 0.0, 100.0, 1000.0);
        let mut body = body_at(200.0, 500.0, 10.0);
        let blocked = attempt_move(&mut body, Vec2::new(8.0, 5.0), BOUNDS, &[wall]);
        assert_eq!(blocked, (true, false));
        assert_eq!(body.pos.x, 200.0);
        assert_eq!(body.pos.y, 505.0);
    }

    #[test]
    fn test_bounce_reflects_blocked_axis() {
        let wall = Obstacle::new(0, 110.0, 0.0, 50.0, 1000.0);
        let mut body = body_at(100.0, 500.0, 6.0);
        body.vel = Vec2::new(8.0, 2.0);
        bounce_move(&mut body, -0.5, &[wall]);
        assert_eq!(body.pos, Vec2::new(100.0, 502.0));
        assert_eq!(body.vel, Vec2::new(-4.0, 2.0));
    }

    proptest! {
        #[test]
        fn prop_slide_along_vertical_wall(
            y in 100.0f32..900.0,
            dx in 1.0f32..20.0,
            dy in -20.0f32..20.0,
            radius in 2.0f32..30.0,
        ) {
            // Body sits flush against a full-height wall on its right
            let wall = Obstacle::new(0, 500.0, 0.0, 100.0, 1000.0);
            let start_x = 500.0 - radius - 0.01;
            let mut body = body_at(start_x, y, radius);
            attempt_move(&mut body, Vec2::new(dx, dy), BOUNDS, &[wall.clone()]);

            prop_assert_eq!(body.pos.x, start_x);
            let expected_y = (y + dy).clamp(radius, BOUNDS.y - radius);
            prop_assert!((body.pos.y - expected_y).abs() < 1e-3);
            prop_assert!(!is_position_blocked(body.pos, radius, &[wall]));
        }

        #[test]
        fn prop_never_ends_inside_obstacle(
            x in 0.0f32..1000.0,
            y in 0.0f32..1000.0,
            dx in -30.0f32..30.0,
            dy in -30.0f32..30.0,
        ) {
            let wall = Obstacle::new(0, 400.0, 400.0, 200.0, 200.0);
            let mut body = body_at(x, y, 10.0);
            prop_assume!(!is_position_blocked(body.pos, 10.0, &[wall.clone()]));
            attempt_move(&mut body, Vec2::new(dx, dy), BOUNDS, &[wall.clone()]);
            prop_assert!(!is_position_blocked(body.pos, 10.0, &[wall]));
        }
    }
}
