//! Read-only view of a session for the renderer
//!
//! Nothing here mutates the game; the host draws straight from a [`Snapshot`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::game::SessionPhase;
use crate::sim::{Bullet, Enemy, EnemyKind, GameState, Player};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub radius: f32,
    pub hearts: u8,
    pub power: u8,
    pub score: u64,
    pub dashing: bool,
    pub cooling_down: bool,
    pub ability_flash_active: bool,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub hit_points: u8,
    /// Only for shielded variants
    pub shield: Option<bool>,
    /// Ambusher destination
    pub target: Option<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub radius: f32,
    pub origin: EnemyKind,
    pub stopped: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    /// Game time (ms)
    pub time: f64,
    pub players: Vec<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub high_score: u64,
}

/// Build a snapshot of the current game
pub fn build_snapshot(state: &GameState, phase: SessionPhase, high_score: u64) -> Snapshot {
    let now = state.time;
    Snapshot {
        phase,
        time: now,
        players: state.players.iter().map(|p| player_view(p, now)).collect(),
        enemies: state.enemies.iter().map(enemy_view).collect(),
        bullets: state.bullets.iter().map(bullet_view).collect(),
        high_score,
    }
}

fn player_view(player: &Player, now: f64) -> PlayerView {
    PlayerView {
        pos: player.pos,
        radius: player.radius,
        hearts: player.hearts,
        power: player.power,
        score: player.score,
        dashing: player.dashing,
        cooling_down: player.is_cooling_down(now),
        ability_flash_active: player.flash_visible(now),
        alive: player.is_alive(),
    }
}

fn enemy_view(enemy: &Enemy) -> EnemyView {
    EnemyView {
        id: enemy.id,
        kind: enemy.kind(),
        pos: enemy.pos,
        radius: enemy.radius,
        hit_points: enemy.hit_points,
        shield: enemy.shield(),
        target: enemy.ambush_target(),
    }
}

fn bullet_view(bullet: &Bullet) -> BulletView {
    BulletView {
        pos: bullet.pos,
        radius: bullet.radius,
        origin: bullet.origin,
        stopped: bullet.is_stopped(),
    }
}
