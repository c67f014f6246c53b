//! Per-frame simulation tick
//!
//! Advances the game by one host frame. Order within a frame is fixed:
//! players, spawner, enemies, bullets, then any flashes triggered this frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionOutcome};
use super::collision::{Kinematic, within_radius};
use super::enemy::Enemy;
use super::spatial::EnemyField;
use super::spawner::spawn_position;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Held directions and edge-triggered buttons for one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pressed this frame
    pub dash: bool,
    /// Pressed this frame
    pub ability: bool,
}

impl PlayerInput {
    const UP: u8 = 1;
    const DOWN: u8 = 1 << 1;
    const LEFT: u8 = 1 << 2;
    const RIGHT: u8 = 1 << 3;
    const DASH: u8 = 1 << 4;
    const ABILITY: u8 = 1 << 5;

    /// Decode the packed form used across the wasm boundary
    pub fn from_bits(bits: u8) -> Self {
        Self {
            up: bits & Self::UP != 0,
            down: bits & Self::DOWN != 0,
            left: bits & Self::LEFT != 0,
            right: bits & Self::RIGHT != 0,
            dash: bits & Self::DASH != 0,
            ability: bits & Self::ABILITY != 0,
        }
    }

    pub fn bits(&self) -> u8 {
        let mut bits = 0;
        for (held, bit) in [
            (self.up, Self::UP),
            (self.down, Self::DOWN),
            (self.left, Self::LEFT),
            (self.right, Self::RIGHT),
            (self.dash, Self::DASH),
            (self.ability, Self::ABILITY),
        ] {
            if held {
                bits |= bit;
            }
        }
        bits
    }

    /// Movement direction: left wins over right, up over down.
    ///
    /// Diagonals are scaled down so they are not faster than straight moves.
    pub fn direction(&self) -> Vec2 {
        let x = if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        };
        let y = if self.up {
            -1.0
        } else if self.down {
            1.0
        } else {
            0.0
        };
        let dir = Vec2::new(x, y);
        if x != 0.0 && y != 0.0 {
            dir * DIAGONAL_SCALE
        } else {
            dir
        }
    }
}

/// Host input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Monotonic host clock (ms)
    pub time_ms: f64,
    /// Time since the previous frame (ms)
    pub delta_ms: f64,
    /// Per-player input; the second entry is ignored in single mode
    pub players: [PlayerInput; 2],
    /// Start/restart pressed this frame (handled by the session)
    pub start: bool,
}

/// State of the game after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    GameOver,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    if state.phase == GamePhase::GameOver {
        return TickOutcome::GameOver;
    }

    state.events.clear();
    state.frame += 1;

    let start = *state.start_time.get_or_insert(input.time_ms);
    let now = input.time_ms - start;
    state.time = now;
    let delta_ms = if input.delta_ms.is_finite() { input.delta_ms } else { 0.0 };
    let dt = (delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS) / 1000.0) as f32;

    // Players: movement and dash now, flashes latched until enemies and bullets have moved
    let mut flashes = Vec::new();
    let area = state.area;
    for (i, player) in state.players.iter_mut().enumerate() {
        if !player.is_alive() {
            continue;
        }
        let controls = input.players.get(i).copied().unwrap_or_default();
        player.update_movement(&controls, now, dt, &area);
        if controls.dash {
            player.try_dash(now);
        }
        if controls.ability {
            flashes.push(i);
        }
    }

    spawn_enemies(state, now);
    update_enemies(state, now, dt);
    update_bullets(state, now, dt);

    for player in flashes {
        resolve_flash(state, player, now);
    }

    if state.phase == GamePhase::GameOver {
        TickOutcome::GameOver
    } else {
        TickOutcome::Continue
    }
}

fn spawn_enemies(state: &mut GameState, now: f64) {
    let Some(kind) = state.spawner.poll(now / 1000.0, &state.enemies, &mut state.rng) else {
        return;
    };
    let pos = spawn_position(&mut state.rng);
    let id = state.next_entity_id();
    let enemy = Enemy::spawn(kind, id, pos, &state.area, &mut state.rng);
    log::debug!(
        "Spawned {} #{} at ({:.0}, {:.0}), next delay {:.3}s",
        kind.as_str(),
        id,
        pos.x,
        pos.y,
        state.spawner.delay
    );
    state.enemies.push(enemy);
    state.events.push(GameEvent::EnemySpawned { kind });
}

/// Move every enemy, collect their shots and resolve contact with players.
///
/// Reverse order so a removal never skips an enemy.
fn update_enemies(state: &mut GameState, now: f64, dt: f32) {
    for i in (0..state.enemies.len()).rev() {
        let target = state.players[state.nearest_living_player(state.enemies[i].pos)].pos;

        let mut enemy = state.enemies[i].clone();
        enemy.advance(&EnemyField::new(&state.enemies), target, dt);
        let shots = enemy.ranged_attack(target, now);
        state.enemies[i] = enemy;

        if !shots.is_empty() {
            state.events.push(GameEvent::BulletFired {
                origin: state.enemies[i].kind(),
                count: shots.len(),
            });
            state.bullets.extend(shots);
        }

        let hit = state
            .players
            .iter()
            .position(|p| p.is_hittable(now) && p.collides_with(&state.enemies[i]));
        if let Some(player) = hit {
            let kind = state.enemies[i].kind();
            let actions = state.enemies[i].on_player_collision();
            let outcome = apply_actions(state, player, i, &actions, now);
            if outcome.removed {
                log::debug!("Player {} touched {} for {} points", player + 1, kind.as_str(), outcome.score);
            }
        }
    }
}

fn update_bullets(state: &mut GameState, now: f64, dt: f32) {
    for i in (0..state.bullets.len()).rev() {
        state.bullets[i].advance(dt);
        if state.bullets[i].is_off_arena() {
            state.bullets.remove(i);
            continue;
        }
        let hit = state
            .players
            .iter()
            .position(|p| p.is_hittable(now) && p.collides_with(&state.bullets[i]));
        if let Some(player) = hit {
            state.bullets.remove(i);
            damage_player(state, player, 1, now);
        }
    }
}

/// Spend power and hit everything strictly inside the flash radius
fn resolve_flash(state: &mut GameState, player: usize, now: f64) {
    if !state.players[player].is_alive() || !state.players[player].try_flash(now) {
        return;
    }
    let center = state.players[player].pos;

    let mut hits = 0;
    let mut removed = 0;
    let mut scored = 0;
    for i in (0..state.enemies.len()).rev() {
        if !within_radius(center, state.enemies[i].pos, FLASH_RANGE) {
            continue;
        }
        let actions = state.enemies[i].on_area_damage(FLASH_DAMAGE);
        if !actions.is_empty() {
            hits += 1;
        }
        let outcome = apply_actions(state, player, i, &actions, now);
        if outcome.removed {
            removed += 1;
            scored += outcome.score;
        }
    }
    state.bullets.retain(|b| !within_radius(center, b.pos, FLASH_RANGE));

    log::debug!(
        "Player {} flashed at {:.0}ms: {} reacted, {} removed, {} points",
        player + 1,
        now,
        hits,
        removed,
        scored
    );
    state.events.push(GameEvent::AbilityUsed { player, hits });
}

/// Apply a reaction batch from the enemy at `enemy` to `player`.
///
/// The batch stops at the first removal, so an enemy is removed at most once.
pub(crate) fn apply_actions(
    state: &mut GameState,
    player: usize,
    enemy: usize,
    actions: &[Action],
    now: f64,
) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    for action in actions {
        match *action {
            Action::ScoreAndRemove { score, power } => {
                let p = &mut state.players[player];
                p.add_score(score);
                p.add_power(power);
                let removed = state.enemies.remove(enemy);
                state.events.push(GameEvent::EnemyRemoved {
                    player,
                    kind: removed.kind(),
                    score,
                });
                outcome.removed = true;
                outcome.score = score;
            }
            Action::HealthDelta(delta) if delta < 0 => {
                let amount = u8::try_from(delta.unsigned_abs()).unwrap_or(u8::MAX);
                damage_player(state, player, amount, now);
            }
            Action::HealthDelta(delta) => {
                let amount = u8::try_from(delta).unwrap_or(u8::MAX);
                if state.players[player].heal(amount) {
                    state.events.push(GameEvent::HeartGained { player });
                }
            }
        }
        if action.is_terminal() {
            break;
        }
    }
    outcome
}

/// Hurt a player unless invulnerable, then check for game over
fn damage_player(state: &mut GameState, player: usize, amount: u8, now: f64) {
    let p = &mut state.players[player];
    if p.is_invulnerable(now) {
        return;
    }
    p.take_damage(amount, now);
    state.events.push(GameEvent::PlayerHit { player });

    if state.phase == GamePhase::Playing && state.players.iter().all(|p| !p.is_alive()) {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!(
            "Game over after {:.1}s, scores {:?}",
            now / 1000.0,
            state.scores()
        );
    }
}
