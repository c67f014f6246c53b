//! Circle collision and arena bounds
//!
//! Every moving thing in the arena is a circle. Overlap is strict: two circles
//! that exactly touch do not collide.

use glam::Vec2;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, OFF_ARENA_MARGIN};

/// Anything with a position and a collision radius
pub trait Kinematic {
    fn pos(&self) -> Vec2;
    fn radius(&self) -> f32;

    /// Distance between centers
    fn distance_to(&self, other: &impl Kinematic) -> f32 {
        self.pos().distance(other.pos())
    }

    /// Strict circle overlap test
    fn collides_with(&self, other: &impl Kinematic) -> bool {
        circles_overlap(self.pos(), self.radius(), other.pos(), other.radius())
    }

    /// True once the entity has left the arena plus margin
    fn is_off_arena(&self) -> bool {
        is_off_arena(self.pos())
    }
}

/// Check overlap between two circles (`distance < ra + rb`)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Check if a point lies strictly inside a radius around `center`
#[inline]
pub fn within_radius(center: Vec2, point: Vec2, radius: f32) -> bool {
    center.distance(point) < radius
}

/// Check if a point is beyond the arena frame plus margin on any side
#[inline]
pub fn is_off_arena(pos: Vec2) -> bool {
    pos.x < -OFF_ARENA_MARGIN
        || pos.x > ARENA_WIDTH + OFF_ARENA_MARGIN
        || pos.y < -OFF_ARENA_MARGIN
        || pos.y > ARENA_HEIGHT + OFF_ARENA_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dot(Vec2, f32);

    impl Kinematic for Dot {
        fn pos(&self) -> Vec2 {
            self.0
        }
        fn radius(&self) -> f32 {
            self.1
        }
    }

    #[test]
    fn test_overlap_hit() {
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0));
    }

    #[test]
    fn test_tangent_is_miss() {
        // Exactly touching: 20 == 10 + 10
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0));
    }

    #[test]
    fn test_kinematic_defaults() {
        let a = Dot(Vec2::new(100.0, 100.0), 15.0);
        let b = Dot(Vec2::new(110.0, 100.0), 4.0);
        assert!(a.collides_with(&b));
        assert!((a.distance_to(&b) - 10.0).abs() < 1e-6);
        assert!(!a.is_off_arena());
    }

    #[test]
    fn test_within_radius_strict() {
        let c = Vec2::new(400.0, 300.0);
        assert!(!within_radius(c, Vec2::new(500.0, 300.0), 100.0));
        assert!(within_radius(c, Vec2::new(499.99, 300.0), 100.0));
    }

    #[test]
    fn test_off_arena_margin() {
        assert!(!is_off_arena(Vec2::new(-100.0, 300.0)));
        assert!(is_off_arena(Vec2::new(-100.5, 300.0)));
        assert!(is_off_arena(Vec2::new(900.5, 300.0)));
        assert!(is_off_arena(Vec2::new(400.0, -101.0)));
        assert!(is_off_arena(Vec2::new(400.0, 701.0)));
        assert!(!is_off_arena(Vec2::new(850.0, 650.0)));
    }
}
