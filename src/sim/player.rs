//! Player avatar: movement, dash, flash power, hearts and score

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Kinematic;
use super::tick::PlayerInput;
use crate::PlayArea;
use crate::consts::*;

/// Dash phase derived from timestamps
///
/// Cooling down is not stored: it is read off the recorded dash end time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashPhase {
    Idle,
    Dashing,
    CoolingDown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// 1-based player number
    pub index: u8,
    pub pos: Vec2,
    pub radius: f32,
    pub hearts: u8,
    pub power: u8,
    pub score: u64,
    pub dashing: bool,
    pub dash_start: f64,
    /// When the last dash ended (None = never dashed)
    pub dash_end: Option<f64>,
    /// Last non-zero movement direction
    pub last_direction: Vec2,
    /// When the flash was last used
    pub last_flash: Option<f64>,
    pub invulnerable_until: f64,
}

impl Player {
    pub fn new(index: u8, pos: Vec2) -> Self {
        Self {
            index,
            pos,
            radius: PLAYER_RADIUS,
            hearts: MAX_HEARTS,
            power: 0,
            score: 0,
            dashing: false,
            dash_start: 0.0,
            dash_end: None,
            last_direction: Vec2::ZERO,
            last_flash: None,
            invulnerable_until: 0.0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hearts > 0
    }

    #[inline]
    pub fn is_invulnerable(&self, now: f64) -> bool {
        now < self.invulnerable_until
    }

    /// Alive and not inside an invulnerability window
    pub fn is_hittable(&self, now: f64) -> bool {
        self.is_alive() && !self.is_invulnerable(now)
    }

    pub fn is_cooling_down(&self, now: f64) -> bool {
        !self.dashing && self.dash_end.is_some_and(|end| now - end < DASH_COOLDOWN_MS)
    }

    pub fn dash_phase(&self, now: f64) -> DashPhase {
        if self.dashing {
            DashPhase::Dashing
        } else if self.is_cooling_down(now) {
            DashPhase::CoolingDown
        } else {
            DashPhase::Idle
        }
    }

    /// Whether the flash effect should still be shown
    pub fn flash_visible(&self, now: f64) -> bool {
        self.last_flash.is_some_and(|t| now - t < FLASH_VISIBLE_MS)
    }

    /// Apply held directions for one frame and clamp to the play area
    pub fn update_movement(&mut self, input: &PlayerInput, now: f64, dt: f32, area: &PlayArea) {
        if self.dashing && now - self.dash_start >= DASH_DURATION_MS {
            self.dashing = false;
            self.dash_end = Some(now);
        }

        let dir = input.direction();
        if dir != Vec2::ZERO {
            self.last_direction = dir;
        }

        let speed = if self.dashing {
            PLAYER_SPEED * DASH_SPEED_MULTIPLIER
        } else {
            PLAYER_SPEED
        };

        self.pos = area.clamp_circle(self.pos + dir * speed * dt, self.radius);
    }

    /// Start a dash if idle, off cooldown and facing somewhere
    pub fn try_dash(&mut self, now: f64) -> bool {
        let rested = self.dash_end.is_none_or(|end| now - end >= DASH_COOLDOWN_MS);
        if self.dashing || !rested || self.last_direction == Vec2::ZERO {
            return false;
        }
        self.dashing = true;
        self.dash_start = now;
        true
    }

    /// Spend power on a flash. Returns false when there is not enough.
    pub fn try_flash(&mut self, now: f64) -> bool {
        if self.power < FLASH_COST {
            return false;
        }
        self.power -= FLASH_COST;
        self.last_flash = Some(now);
        true
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn add_power(&mut self, amount: u8) {
        self.power = self.power.saturating_add(amount).min(MAX_POWER);
    }

    /// Restore hearts up to the cap. Returns true if any were gained.
    pub fn heal(&mut self, amount: u8) -> bool {
        let before = self.hearts;
        self.hearts = self.hearts.saturating_add(amount).min(MAX_HEARTS);
        self.hearts > before
    }

    /// Lose hearts and start an invulnerability window. Returns true if this killed the player.
    pub fn take_damage(&mut self, amount: u8, now: f64) -> bool {
        self.hearts = self.hearts.saturating_sub(amount);
        self.invulnerable_until = now + PLAYER_INVULNERABILITY_MS;
        self.hearts == 0
    }
}

impl Kinematic for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn held(right: bool, down: bool) -> PlayerInput {
        PlayerInput {
            right,
            down,
            ..Default::default()
        }
    }

    fn player() -> Player {
        Player::new(1, Vec2::new(400.0, 300.0))
    }

    #[test]
    fn test_straight_movement() {
        let mut p = player();
        p.update_movement(&held(true, false), 0.0, 0.1, &PlayArea::standard());
        assert!((p.pos - Vec2::new(420.0, 300.0)).length() < 1e-4);
        assert_eq!(p.last_direction, Vec2::X);
    }

    #[test]
    fn test_diagonal_is_scaled() {
        let mut p = player();
        p.update_movement(&held(true, true), 0.0, 0.1, &PlayArea::standard());
        let moved = p.pos - Vec2::new(400.0, 300.0);
        assert!((moved.x - 200.0 * 0.707 * 0.1).abs() < 1e-3);
        assert!((moved.y - 200.0 * 0.707 * 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_left_beats_right() {
        let input = PlayerInput {
            left: true,
            right: true,
            up: true,
            down: true,
            ..Default::default()
        };
        let dir = input.direction();
        assert!(dir.x < 0.0 && dir.y < 0.0);
    }

    #[test]
    fn test_clamped_to_play_area() {
        let area = PlayArea::standard();
        let mut p = Player::new(1, Vec2::new(area.max().x - 16.0, 300.0));
        for _ in 0..10 {
            p.update_movement(&held(true, false), 0.0, 0.1, &area);
        }
        assert_eq!(p.pos.x, area.max().x - PLAYER_RADIUS);
    }

    #[test]
    fn test_last_direction_retained() {
        let mut p = player();
        p.update_movement(&held(false, true), 0.0, DT, &PlayArea::standard());
        p.update_movement(&PlayerInput::default(), 10.0, DT, &PlayArea::standard());
        assert_eq!(p.last_direction, Vec2::Y);
    }

    #[test]
    fn test_dash_requires_direction() {
        let mut p = player();
        assert!(!p.try_dash(1000.0));
        assert!(!p.dashing);
    }

    #[test]
    fn test_dash_cycle() {
        let area = PlayArea::standard();
        let mut p = player();
        p.update_movement(&held(true, false), 1000.0, DT, &area);
        assert!(p.try_dash(1000.0));
        assert_eq!(p.dash_phase(1010.0), DashPhase::Dashing);

        // Already dashing: no-op, start time unchanged
        assert!(!p.try_dash(1050.0));
        assert_eq!(p.dash_start, 1000.0);

        // Dash speed while active
        let before = p.pos.x;
        p.update_movement(&held(true, false), 1100.0, 0.01, &area);
        assert!((p.pos.x - before - 6.0).abs() < 1e-3);

        // Expires on the first update after the duration
        p.update_movement(&held(true, false), 1120.0, DT, &area);
        assert!(!p.dashing);
        assert_eq!(p.dash_end, Some(1120.0));
        assert_eq!(p.dash_phase(1500.0), DashPhase::CoolingDown);

        // Still cooling down
        assert!(!p.try_dash(1500.0));
        assert!(!p.try_dash(2019.0));

        // Cooldown elapsed
        assert_eq!(p.dash_phase(2020.0), DashPhase::Idle);
        assert!(p.try_dash(2020.0));
    }

    #[test]
    fn test_flash_costs_power() {
        let mut p = player();
        assert!(!p.try_flash(0.0));
        p.add_power(5);
        assert!(p.try_flash(100.0));
        assert_eq!(p.power, 1);
        assert!(p.flash_visible(250.0));
        assert!(!p.flash_visible(300.0));
    }

    #[test]
    fn test_power_and_hearts_clamped() {
        let mut p = player();
        p.add_power(200);
        assert_eq!(p.power, MAX_POWER);

        assert!(!p.heal(1));
        assert_eq!(p.hearts, MAX_HEARTS);

        assert!(p.take_damage(10, 0.0));
        assert_eq!(p.hearts, 0);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_invulnerability_window() {
        let mut p = player();
        p.take_damage(1, 1000.0);
        assert!(p.is_invulnerable(1749.0));
        assert!(!p.is_hittable(1749.0));
        assert!(!p.is_invulnerable(1750.0));
        assert!(p.is_hittable(1750.0));
    }
}
