//! Browser bindings
//!
//! The page owns the canvas, keyboard and Web Audio. Each animation frame it
//! calls [`WebGame::frame`] with packed key bits, then draws from
//! [`WebGame::snapshot_json`] and plays whatever [`WebGame::drain_audio_json`]
//! returns.

use wasm_bindgen::prelude::*;

use crate::audio::QueuedAudio;
use crate::game::{FrameSignal, Session};
use crate::persistence::{FallbackStore, LocalStorage};
use crate::settings::PlayerMode;
use crate::sim::{PlayerInput, TickInput};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Close Corners starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session<FallbackStore<LocalStorage>, QueuedAudio>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(duo: bool) -> WebGame {
        let mut session = Session::new(FallbackStore::new(LocalStorage), QueuedAudio::default());
        session.set_mode(if duo { PlayerMode::Duo } else { PlayerMode::Single });
        WebGame { session }
    }

    /// Advance one animation frame. Returns true on the frame the game ends.
    pub fn frame(&mut self, time: f64, delta: f64, p1_bits: u8, p2_bits: u8, start: bool) -> bool {
        let input = TickInput {
            time_ms: time,
            delta_ms: delta,
            players: [PlayerInput::from_bits(p1_bits), PlayerInput::from_bits(p2_bits)],
            start,
        };
        self.session.frame(&input) == FrameSignal::GameOver
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_else(|e| {
            log::warn!("Snapshot encode failed: {e}");
            String::from("null")
        })
    }

    /// Audio cues raised since the last call
    pub fn drain_audio_json(&mut self) -> String {
        let cues = self.session.audio_mut().sink_mut().drain();
        serde_json::to_string(&cues).unwrap_or_else(|e| {
            log::warn!("Audio cue encode failed: {e}");
            String::from("[]")
        })
    }

    pub fn high_score(&self) -> u64 {
        self.session.high_score()
    }
}
