//! Results of enemy reactions
//!
//! Enemies never touch players directly. A reaction returns a short batch of
//! actions which the tick applies in order, against the player involved.

use serde::{Deserialize, Serialize};

/// A single effect requested by an enemy reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Grant score and power, then remove the enemy. Ends the batch.
    ScoreAndRemove { score: u64, power: u8 },
    /// Change the player's hearts (negative hurts, positive heals)
    HealthDelta(i32),
}

impl Action {
    /// Removal with nothing granted
    pub const REMOVE: Action = Action::ScoreAndRemove { score: 0, power: 0 };

    /// Whether applying this action removes the enemy
    pub fn is_terminal(&self) -> bool {
        matches!(self, Action::ScoreAndRemove { .. })
    }
}

/// Up to two actions; no reaction produces more
pub type Actions = Vec<Action>;

/// What a batch did once applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// The enemy was removed by this batch
    pub removed: bool,
    /// Score actually granted
    pub score: u64,
}
