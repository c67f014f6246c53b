//! Demo-mode player control
//!
//! Drives a player from the game state alone, for the headless runner and
//! the title-screen attract loop. Output depends only on the state.

use glam::Vec2;

use super::action::Action;
use super::collision::within_radius;
use super::state::GameState;
use super::tick::PlayerInput;
use crate::consts::*;

/// Threats closer than this are fled from
const AWARENESS_RADIUS: f32 = 120.0;
/// Dash when a threat gets this close
const PANIC_DISTANCE: f32 = 40.0;
/// Minimum enemies in range before spending power on a flash
const FLASH_CROWD: usize = 2;
/// Axis share of the steering vector needed to hold that direction
const AXIS_THRESHOLD: f32 = 0.38;

/// Pick this frame's input for player `index`
pub fn drive(state: &GameState, index: usize) -> PlayerInput {
    let Some(player) = state.players.get(index) else {
        return PlayerInput::default();
    };
    if !player.is_alive() {
        return PlayerInput::default();
    }
    let pos = player.pos;

    // Anything that would cost a heart on contact
    let threats: Vec<Vec2> = state
        .enemies
        .iter()
        .filter(|e| e.on_player_collision().contains(&Action::HealthDelta(-1)))
        .map(|e| e.pos)
        .chain(state.bullets.iter().map(|b| b.pos))
        .collect();

    let mut flee = Vec2::ZERO;
    let mut closest = f32::INFINITY;
    for &threat in &threats {
        let away = pos - threat;
        let dist = away.length();
        closest = closest.min(dist);
        if dist > 0.0 && dist < AWARENESS_RADIUS {
            // Closer threats weigh more
            flee += away / dist * (AWARENESS_RADIUS - dist) / AWARENESS_RADIUS;
        }
    }

    let steer = if flee != Vec2::ZERO {
        // Lean back toward the middle so fleeing does not pin us in a corner
        let center = state.area.min + state.area.size / 2.0;
        flee + (center - pos).normalize_or_zero() * 0.25
    } else {
        // Safe: go collect the nearest enemy that pays on contact
        state
            .enemies
            .iter()
            .filter(|e| {
                e.on_player_collision()
                    .iter()
                    .any(|a| matches!(a, Action::ScoreAndRemove { score, .. } if *score > 0))
            })
            .map(|e| e.pos - pos)
            .min_by(|a, b| a.length().total_cmp(&b.length()))
            .unwrap_or(Vec2::ZERO)
    };

    let crowd = state
        .enemies
        .iter()
        .filter(|e| within_radius(pos, e.pos, FLASH_RANGE))
        .count();

    let mut input = steering_input(steer);
    input.dash = closest < PANIC_DISTANCE;
    input.ability = player.power >= FLASH_COST && crowd >= FLASH_CROWD;
    input
}

/// Snap a free steering vector to the eight held-key directions
fn steering_input(steer: Vec2) -> PlayerInput {
    let dir = steer.normalize_or_zero();
    PlayerInput {
        left: dir.x < -AXIS_THRESHOLD,
        right: dir.x > AXIS_THRESHOLD,
        up: dir.y < -AXIS_THRESHOLD,
        down: dir.y > AXIS_THRESHOLD,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PlayerMode;
    use crate::sim::Enemy;

    fn state() -> GameState {
        let mut state = GameState::with_seed(PlayerMode::Single, 9);
        state.spawner.delay = f64::INFINITY;
        state
    }

    #[test]
    fn test_flees_threat() {
        let mut state = state();
        let pos = state.players[0].pos;
        state.insert_enemy(|id| Enemy::flocking(id, pos + Vec2::new(60.0, 0.0)));

        let input = drive(&state, 0);
        assert!(input.left);
        assert!(!input.right);
        assert!(!input.dash);
    }

    #[test]
    fn test_dashes_when_cornered() {
        let mut state = state();
        let pos = state.players[0].pos;
        state.insert_enemy(|id| Enemy::flocking(id, pos + Vec2::new(0.0, 30.0)));

        let input = drive(&state, 0);
        assert!(input.up);
        assert!(input.dash);
    }

    #[test]
    fn test_chases_prey_when_safe() {
        let mut state = state();
        let pos = state.players[0].pos;
        state.insert_enemy(|id| Enemy::seeker(id, pos + Vec2::new(0.0, 200.0)));

        let input = drive(&state, 0);
        assert!(input.down);
        assert!(!input.left && !input.right);
    }

    #[test]
    fn test_flashes_into_crowd() {
        let mut state = state();
        let pos = state.players[0].pos;
        state.insert_enemy(|id| Enemy::seeker(id, pos + Vec2::new(50.0, 0.0)));
        state.insert_enemy(|id| Enemy::seeker(id, pos + Vec2::new(-50.0, 0.0)));

        assert!(!drive(&state, 0).ability);
        state.players[0].power = FLASH_COST;
        assert!(drive(&state, 0).ability);
    }

    #[test]
    fn test_idle_when_dead_or_missing() {
        let mut state = state();
        assert_eq!(drive(&state, 1), PlayerInput::default());
        state.players[0].hearts = 0;
        assert_eq!(drive(&state, 0), PlayerInput::default());
    }
}
