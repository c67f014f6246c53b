//! Enemy projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Kinematic;
use super::enemy::EnemyKind;
use crate::consts::BULLET_RADIUS;

/// Flight rule of a bullet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BulletKind {
    /// Travels in a straight line until it leaves the arena
    Linear,
    /// Travels outward from `center` and parks on the circle of `max_radius`
    RadialLimited {
        center: Vec2,
        max_radius: f32,
        stopped: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Variant that fired it (drives the colour)
    pub origin: EnemyKind,
    pub kind: BulletKind,
}

impl Bullet {
    pub fn linear(pos: Vec2, vel: Vec2, origin: EnemyKind) -> Self {
        Self {
            pos,
            vel,
            radius: BULLET_RADIUS,
            origin,
            kind: BulletKind::Linear,
        }
    }

    pub fn radial_limited(pos: Vec2, vel: Vec2, center: Vec2, max_radius: f32, origin: EnemyKind) -> Self {
        Self {
            pos,
            vel,
            radius: BULLET_RADIUS,
            origin,
            kind: BulletKind::RadialLimited {
                center,
                max_radius,
                stopped: false,
            },
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.kind, BulletKind::RadialLimited { stopped: true, .. })
    }

    /// Integrate position by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        match &mut self.kind {
            BulletKind::Linear => {
                self.pos += self.vel * dt;
            }
            BulletKind::RadialLimited {
                center,
                max_radius,
                stopped,
            } => {
                if *stopped {
                    return;
                }
                let next = self.pos + self.vel * dt;
                let offset = next - *center;
                if offset.length() >= *max_radius {
                    let angle = offset.y.atan2(offset.x);
                    self.pos = *center + crate::unit_from_angle(angle) * *max_radius;
                    self.vel = Vec2::ZERO;
                    *stopped = true;
                } else {
                    self.pos = next;
                }
            }
        }
    }
}

impl Kinematic for Bullet {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}
