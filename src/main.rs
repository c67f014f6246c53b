//! Close Corners entry point
//!
//! Native builds run a headless demo: autopilot players at 60 Hz, saving the
//! high score next to the working directory. The browser build is driven
//! through `close_corners::wasm::WebGame` instead.

#[cfg(not(target_arch = "wasm32"))]
use close_corners::{
    FrameSignal, PlayerMode, Session, SessionPhase,
    audio::LogAudio,
    persistence::{FallbackStore, JsonFileStore},
    sim::{TickInput, autopilot},
};

#[cfg(not(target_arch = "wasm32"))]
const SAVE_FILE: &str = "close-corners-save.json";
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: f64 = 1000.0 / 60.0;
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FRAMES: u64 = 60 * 60;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let (frames, mode) = match parse_args(std::env::args().skip(1)) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("usage: close-corners [frames] [single|duo]");
            std::process::exit(2);
        }
    };

    log::info!("Close Corners (native) starting, {frames} frames");

    let mut session = Session::new(FallbackStore::new(JsonFileStore::new(SAVE_FILE)), LogAudio);
    if let Some(mode) = mode {
        session.set_mode(mode);
    }

    let mut start = true;
    let mut finished = Vec::new();
    for frame in 0..frames {
        let state = session.state();
        let input = TickInput {
            time_ms: frame as f64 * FRAME_MS,
            delta_ms: FRAME_MS,
            players: [autopilot::drive(state, 0), autopilot::drive(state, 1)],
            start,
        };
        start = false;

        match session.frame(&input) {
            FrameSignal::GameOver => {
                finished.push(session.state().scores());
                start = true;
            }
            FrameSignal::Idle | FrameSignal::Started | FrameSignal::Running => {}
        }
    }

    for (i, scores) in finished.iter().enumerate() {
        println!("game {}: {}", i + 1, format_scores(scores));
    }
    if session.phase() == SessionPhase::Playing {
        println!("unfinished: {}", format_scores(&session.state().scores()));
    }
    println!("high score: {}", session.high_score());
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(u64, Option<PlayerMode>), String> {
    let frames = match args.next() {
        Some(arg) => arg.parse().map_err(|_| format!("bad frame count {arg:?}"))?,
        None => DEFAULT_FRAMES,
    };
    let mode = match args.next() {
        Some(arg) => Some(PlayerMode::from_str(&arg).ok_or_else(|| format!("unknown mode {arg:?}"))?),
        None => None,
    };
    Ok((frames, mode))
}

#[cfg(not(target_arch = "wasm32"))]
fn format_scores(scores: &[u64]) -> String {
    scores
        .iter()
        .enumerate()
        .map(|(i, s)| format!("P{} {}", i + 1, s))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is close_corners::wasm::wasm_main
}
