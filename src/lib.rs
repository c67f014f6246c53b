//! Close Corners - A twin-player arena survival game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (movement, spawning, combat, scoring)
//! - `game`: Session flow (title, playing, game over) around the simulation
//! - `persistence`: Key-value storage with in-memory fallback
//! - `highscores`: Best score tracking
//! - `settings`: Player preferences
//! - `audio`: Sound/music cues emitted for the host's audio system
//! - `snapshot`: Read-only frame view for the renderer

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod snapshot;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use game::{FrameSignal, Session, SessionPhase};
pub use highscores::HighScore;
pub use settings::{PlayerMode, Settings};
pub use snapshot::Snapshot;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Inset of the play rectangle from the arena frame
    pub const PADDING_X: f32 = 90.0;
    pub const PADDING_Y: f32 = 75.0;
    /// Entities further than this outside the frame are discarded
    pub const OFF_ARENA_MARGIN: f32 = 100.0;

    /// Longest frame delta the simulation integrates (ms)
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Player
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const PLAYER_INVULNERABILITY_MS: f64 = 750.0;
    pub const DIAGONAL_SCALE: f32 = 0.707;
    pub const MAX_HEARTS: u8 = 3;

    /// Dash
    pub const DASH_DURATION_MS: f64 = 120.0;
    pub const DASH_COOLDOWN_MS: f64 = 900.0;
    pub const DASH_SPEED_MULTIPLIER: f32 = 3.0;

    /// Flash (area ability)
    pub const FLASH_COST: u8 = 4;
    pub const FLASH_RANGE: f32 = 100.0;
    pub const FLASH_DAMAGE: u8 = 1;
    /// How long the flash stays visible after use (ms)
    pub const FLASH_VISIBLE_MS: f64 = 200.0;
    pub const MAX_POWER: u8 = FLASH_COST * 3;

    /// Seeker (red)
    pub const SEEKER_SPEED: f32 = 80.0;
    pub const SEEKER_RADIUS: f32 = 10.0;
    pub const SEEKER_SHOOT_INTERVAL_MS: f64 = 2000.0;
    pub const SEEKER_MIN_SHOOT_DISTANCE: f32 = 75.0;
    pub const SEEKER_BULLET_SPEED: f32 = 200.0;

    /// Flocking (green)
    pub const FLOCKING_RADIUS: f32 = 12.0;
    pub const FLOCKING_HEARTS: u8 = 2;
    pub const FLOCKING_ACC_LIMIT: f32 = 120.0;
    pub const FLOCKING_VEL_LIMIT: f32 = 90.0;
    pub const FLOCKING_REPULSION_STRENGTH: f32 = 800.0;
    pub const FLOCKING_REPULSION_RADIUS: f32 = 80.0;

    /// Anti-gravity (pink)
    pub const ANTI_GRAVITY_RADIUS: f32 = 14.0;
    pub const ANTI_GRAVITY_ACC_LIMIT: f32 = 10.0;
    pub const ANTI_GRAVITY_ACC_STRENGTH: f32 = 300.0;
    pub const ANTI_GRAVITY_DAMPING: f32 = 0.85;
    pub const ANTI_GRAVITY_AVOID_PLAYER: f32 = 0.4;
    pub const ANTI_GRAVITY_CLOSE_DISTANCE: f32 = 50.0;
    pub const ANTI_GRAVITY_NEIGHBORS: usize = 3;
    /// Neighbours are pulled this fraction further away from the player
    pub const ANTI_GRAVITY_PLAYER_OFFSET_DIVISOR: f32 = 4.0;
    /// Below this distance the player term is ignored
    pub const ANTI_GRAVITY_PLAYER_DEADZONE: f32 = 5.0;

    /// Orbiter (yellow)
    pub const ORBITER_SPEED: f32 = 50.0;
    pub const ORBITER_RADIUS: f32 = 10.0;
    pub const ORBITER_TARGET_BLEND: f32 = 0.7;
    pub const ORBITER_SHOOT_MIN_DISTANCE: f32 = SEEKER_MIN_SHOOT_DISTANCE;
    pub const ORBITER_SHOOT_MAX_DISTANCE: f32 = 95.0;
    pub const ORBITER_SHOOT_COOLDOWN_MS: f64 = 2000.0;
    pub const ORBITER_BULLET_SPEED: f32 = 100.0;
    pub const ORBITER_BULLETS_PER_SHOT: usize = 14;

    /// Ambusher (blue)
    pub const AMBUSHER_SPEED: f32 = 60.0;
    pub const AMBUSHER_RADIUS: f32 = 12.0;
    pub const AMBUSHER_SNAP_DISTANCE: f32 = 5.0;
    /// Fraction of the play area the ambush point is drawn from
    pub const AMBUSHER_TARGET_SPAN: f32 = 0.8;
    pub const AMBUSHER_BULLET_SPEED: f32 = 150.0;
    pub const AMBUSHER_BULLET_RADIUS: f32 = 80.0;
    pub const AMBUSHER_BULLETS_PER_SHOT: usize = 8;

    pub const BULLET_RADIUS: f32 = 4.0;

    /// Spawn schedule (seconds)
    pub const SPAWN_DELAY_START: f64 = 1.0;
    pub const SPAWN_DELAY_MIN: f64 = 0.1;
    pub const SPAWN_DELAY_STEP: f64 = 0.002;
    /// Base weight multiplier applied to a variant each time it is picked
    pub const SPAWN_WEIGHT_DECAY: f32 = 0.99;
    pub const SPAWN_WEIGHT_FLOOR: f32 = 1.0;
}

/// Axis-aligned rectangle the players are confined to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub min: Vec2,
    pub size: Vec2,
}

impl PlayArea {
    /// The arena frame inset by the fixed padding
    pub fn standard() -> Self {
        use consts::*;
        Self {
            min: Vec2::new(PADDING_X, PADDING_Y),
            size: Vec2::new(ARENA_WIDTH - PADDING_X * 2.0, ARENA_HEIGHT - PADDING_Y * 2.0),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Clamp a circle of the given radius so it stays fully inside
    pub fn clamp_circle(&self, pos: Vec2, radius: f32) -> Vec2 {
        let lo = self.min + Vec2::splat(radius);
        let hi = self.max() - Vec2::splat(radius);
        pos.clamp(lo, hi)
    }
}

/// Unit vector from `from` toward `to` and the distance between them.
///
/// Returns a zero vector when the points coincide.
#[inline]
pub fn heading_to(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    let dist = delta.length();
    if dist > 0.0 {
        (delta / dist, dist)
    } else {
        (Vec2::ZERO, 0.0)
    }
}

/// Unit vector for an angle in radians
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_area_bounds() {
        let area = PlayArea::standard();
        assert_eq!(area.min, Vec2::new(90.0, 75.0));
        assert_eq!(area.max(), Vec2::new(710.0, 525.0));
    }

    #[test]
    fn test_clamp_circle() {
        let area = PlayArea::standard();
        let clamped = area.clamp_circle(Vec2::new(0.0, 1000.0), 15.0);
        assert_eq!(clamped, Vec2::new(105.0, 510.0));

        let inside = Vec2::new(300.0, 300.0);
        assert_eq!(area.clamp_circle(inside, 15.0), inside);
    }

    #[test]
    fn test_heading_to() {
        let (dir, dist) = heading_to(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((dist - 5.0).abs() < 1e-6);
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-6);

        let (dir, dist) = heading_to(Vec2::ONE, Vec2::ONE);
        assert_eq!(dir, Vec2::ZERO);
        assert_eq!(dist, 0.0);
    }
}
