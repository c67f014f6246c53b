//! Neighbour lookups over the live enemy list
//!
//! Steering code only ever sees enemies through [`SpatialQuery`], so the
//! linear scan here can be replaced by a grid without touching behaviour.

use glam::Vec2;

use super::enemy::{Enemy, EnemyKind};

/// Read-only view of one sibling enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
}

pub trait SpatialQuery {
    /// Every enemy except `exclude`, in list order
    fn neighbors(&self, exclude: u32) -> Vec<Neighbor>;

    /// Enemies (except `exclude`) strictly closer than `radius` to `center`
    fn within_radius(&self, exclude: u32, center: Vec2, radius: f32) -> Vec<Neighbor> {
        self.neighbors(exclude)
            .into_iter()
            .filter(|n| n.pos.distance(center) < radius)
            .collect()
    }
}

/// Linear scan over a slice of enemies
#[derive(Clone, Copy)]
pub struct EnemyField<'a> {
    enemies: &'a [Enemy],
}

impl<'a> EnemyField<'a> {
    pub fn new(enemies: &'a [Enemy]) -> Self {
        Self { enemies }
    }
}

impl SpatialQuery for EnemyField<'_> {
    fn neighbors(&self, exclude: u32) -> Vec<Neighbor> {
        self.enemies
            .iter()
            .filter(|e| e.id != exclude)
            .map(|e| Neighbor {
                id: e.id,
                kind: e.kind(),
                pos: e.pos,
            })
            .collect()
    }
}
