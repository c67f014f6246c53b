//! Game state and core simulation types
//!
//! Everything the per-frame tick reads or mutates lives in [`GameState`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::enemy::{Enemy, EnemyKind};
use super::player::Player;
use super::spawner::Spawner;
use crate::PlayArea;
use crate::settings::PlayerMode;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every player is out of hearts; the simulation is frozen
    GameOver,
}

/// Things that happened during a tick, for audio and UI.
///
/// Cleared at the start of every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { kind: EnemyKind },
    /// An enemy fired a volley of `count` bullets
    BulletFired { origin: EnemyKind, count: usize },
    PlayerHit { player: usize },
    HeartGained { player: usize },
    /// An enemy was removed by a reaction batch
    EnemyRemoved { player: usize, kind: EnemyKind, score: u64 },
    /// A player used the flash; `hits` enemies reacted to it
    AbilityUsed { player: usize, hits: usize },
    GameOver,
}

/// Complete simulation state for one game
#[derive(Debug, Clone)]
pub struct GameState {
    pub mode: PlayerMode,
    pub area: PlayArea,
    pub players: Vec<Player>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub spawner: Spawner,
    pub phase: GamePhase,
    /// Host clock (ms) at the first tick; game time is measured from here
    pub start_time: Option<f64>,
    /// Game time of the latest tick (ms)
    pub time: f64,
    /// Ticks processed
    pub frame: u64,
    /// Events raised by the latest tick
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// New game with an unseeded RNG
    pub fn new(mode: PlayerMode) -> Self {
        Self::with_seed(mode, rand::random())
    }

    /// New game with a fixed seed (tests, tooling)
    pub fn with_seed(mode: PlayerMode, seed: u64) -> Self {
        let area = PlayArea::standard();
        Self {
            mode,
            area,
            players: starting_players(mode, &area),
            enemies: Vec::new(),
            bullets: Vec::new(),
            spawner: Spawner::default(),
            phase: GamePhase::Playing,
            start_time: None,
            time: 0.0,
            frame: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an enemy with a fresh ID, returning the ID
    pub fn insert_enemy(&mut self, build: impl FnOnce(u32) -> Enemy) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(build(id));
        id
    }

    /// Scores of every player, in player order
    pub fn scores(&self) -> Vec<u64> {
        self.players.iter().map(|p| p.score).collect()
    }

    /// Index of the closest living player; the first player if none are alive.
    ///
    /// Ties go to the earlier player.
    pub fn nearest_living_player(&self, pos: Vec2) -> usize {
        let mut best: Option<(usize, f32)> = None;
        for (i, player) in self.players.iter().enumerate() {
            if !player.is_alive() {
                continue;
            }
            let dist = player.pos.distance(pos);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }
        best.map_or(0, |(i, _)| i)
    }
}

/// Players at their starting spots: centered for one, thirds for two
fn starting_players(mode: PlayerMode, area: &PlayArea) -> Vec<Player> {
    let mid_y = area.min.y + area.size.y / 2.0;
    match mode {
        PlayerMode::Single => vec![Player::new(1, Vec2::new(area.min.x + area.size.x / 2.0, mid_y))],
        PlayerMode::Duo => vec![
            Player::new(1, Vec2::new(area.min.x + area.size.x / 3.0, mid_y)),
            Player::new(2, Vec2::new(area.min.x + area.size.x * 2.0 / 3.0, mid_y)),
        ],
    }
}
