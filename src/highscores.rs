//! Best score across sessions
//!
//! Stored as a plain decimal string so older saves stay readable.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Best score seen so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "--close-corners-highScore";

    /// Load the stored best, or zero if missing or unreadable
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(text)) => match text.trim().parse::<u64>() {
                Ok(best) => {
                    log::info!("Loaded high score {best}");
                    Self { best }
                }
                Err(e) => {
                    log::warn!("Ignoring malformed high score {text:?}: {e}");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read high score: {e}");
                Self::default()
            }
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Whether `score` would beat the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Fold in the final scores of a game and persist the result.
    ///
    /// Returns the new best. The stored value is written even if unchanged.
    pub fn register(&mut self, store: &mut impl KeyValueStore, scores: &[u64]) -> u64 {
        let top = scores.iter().copied().max().unwrap_or(0);
        if self.qualifies(top) {
            log::info!("New high score {top} (was {})", self.best);
            self.best = top;
        }
        if let Err(e) = store.set(Self::STORAGE_KEY, &self.best.to_string()) {
            log::warn!("Could not save high score: {e}");
        }
        self.best
    }
}
