//! Enemy spawn table and schedule
//!
//! Variant choice is a weighted roulette over variants still under their
//! on-screen cap. Each weight is boosted by how far its variant is under the
//! cap, and a picked variant's base weight decays a little so early favourites
//! slowly give way to the rarer ones.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use crate::consts::*;

/// One row of the spawn table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub kind: EnemyKind,
    /// Base probability weight (decays as the variant is picked)
    pub weight: f32,
    /// Max simultaneous enemies of this variant
    pub max_on_screen: usize,
}

/// Spawn table plus the accelerating spawn clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub entries: Vec<SpawnEntry>,
    /// Seconds between spawns
    pub delay: f64,
    /// Game time of the last spawn (seconds)
    pub last_spawn: f64,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new(vec![
            SpawnEntry {
                kind: EnemyKind::Seeker,
                weight: 100.0,
                max_on_screen: 50,
            },
            SpawnEntry {
                kind: EnemyKind::Flocking,
                weight: 30.0,
                max_on_screen: 7,
            },
            SpawnEntry {
                kind: EnemyKind::AntiGravity,
                weight: 20.0,
                max_on_screen: 3,
            },
            SpawnEntry {
                kind: EnemyKind::Orbiter,
                weight: 12.0,
                max_on_screen: 5,
            },
            SpawnEntry {
                kind: EnemyKind::Ambusher,
                weight: 8.0,
                max_on_screen: 6,
            },
        ])
    }
}

impl Spawner {
    pub fn new(entries: Vec<SpawnEntry>) -> Self {
        Self {
            entries,
            delay: SPAWN_DELAY_START,
            last_spawn: 0.0,
        }
    }

    /// Current base weight of a variant
    pub fn weight_of(&self, kind: EnemyKind) -> Option<f32> {
        self.entries.iter().find(|e| e.kind == kind).map(|e| e.weight)
    }

    /// Whether the spawn delay has elapsed at `elapsed` seconds of game time
    pub fn is_due(&self, elapsed: f64) -> bool {
        elapsed - self.last_spawn >= self.delay
    }

    /// Pick a variant for the current population, or None if every variant is capped.
    ///
    /// The picked variant's base weight is decayed by 1% (floored at 1).
    pub fn candidate(&mut self, enemies: &[Enemy], rng: &mut impl Rng) -> Option<EnemyKind> {
        let adjusted: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                let count = enemies.iter().filter(|e| e.kind() == entry.kind).count();
                (count < entry.max_on_screen)
                    .then(|| (i, entry.weight * ((entry.max_on_screen - count) as f32).sqrt()))
            })
            .collect();

        if adjusted.is_empty() {
            return None;
        }
        let total: f32 = adjusted.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return None;
        }

        let roll = rng.random_range(0.0..total);
        let mut cumulative = 0.0;
        for &(i, weight) in &adjusted {
            cumulative += weight;
            if roll < cumulative {
                let entry = &mut self.entries[i];
                entry.weight = (entry.weight * SPAWN_WEIGHT_DECAY).max(SPAWN_WEIGHT_FLOOR);
                return Some(entry.kind);
            }
        }

        panic!("spawn roulette exhausted: roll {roll} >= total {total}");
    }

    /// Run the schedule: returns a variant when one is due and eligible.
    ///
    /// A successful pick shortens the delay and restarts the clock.
    pub fn poll(&mut self, elapsed: f64, enemies: &[Enemy], rng: &mut impl Rng) -> Option<EnemyKind> {
        if !self.is_due(elapsed) {
            return None;
        }
        let kind = self.candidate(enemies, rng)?;
        self.delay = (self.delay - SPAWN_DELAY_STEP).max(SPAWN_DELAY_MIN);
        self.last_spawn = elapsed;
        Some(kind)
    }
}

/// Random point on one of the four arena edges
pub fn spawn_position(rng: &mut impl Rng) -> Vec2 {
    let side = rng.random_range(0..4u8);
    edge_point(side, rng.random::<f32>())
}

/// Point at fraction `t` along edge `side` (0 top, 1 right, 2 bottom, 3 left)
pub fn edge_point(side: u8, t: f32) -> Vec2 {
    match side {
        0 => Vec2::new(t * ARENA_WIDTH, 0.0),
        1 => Vec2::new(ARENA_WIDTH, t * ARENA_HEIGHT),
        2 => Vec2::new(t * ARENA_WIDTH, ARENA_HEIGHT),
        3 => Vec2::new(0.0, t * ARENA_HEIGHT),
        _ => panic!("invalid spawn side {side}"),
    }
}
