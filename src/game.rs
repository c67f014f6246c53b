//! Session flow: title screen, play, game over, restart
//!
//! A [`Session`] owns the running [`GameState`] together with everything that
//! outlives a single game (high score, settings, storage, audio).

use serde::{Deserialize, Serialize};

use crate::audio::{AudioManager, AudioSink, MusicTrack};
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::settings::{PlayerMode, Settings};
use crate::sim::{GameState, TickInput, TickOutcome, tick};
use crate::snapshot::{Snapshot, build_snapshot};

/// Which screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Title,
    Playing,
    GameOver,
}

/// What a frame did, for the host loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSignal {
    /// Waiting on a menu screen
    Idle,
    /// A new game was started this frame
    Started,
    /// The game advanced
    Running,
    /// The game ended this frame
    GameOver,
}

pub struct Session<K, A> {
    phase: SessionPhase,
    state: GameState,
    high_score: HighScore,
    settings: Settings,
    store: K,
    audio: AudioManager<A>,
    seed: Option<u64>,
    games_played: u32,
}

impl<K: KeyValueStore, A: AudioSink> Session<K, A> {
    /// Load settings and the high score, and show the title screen
    pub fn new(store: K, sink: A) -> Self {
        let settings = Settings::load(&store);
        let high_score = HighScore::load(&store);
        let mut audio = AudioManager::new(sink, &settings);
        audio.play_music(MusicTrack::Title);
        log::info!(
            "Session ready: {} mode, high score {}",
            settings.player_mode.as_str(),
            high_score.best()
        );
        Self {
            phase: SessionPhase::Title,
            state: GameState::new(settings.player_mode),
            high_score,
            settings,
            store,
            audio,
            seed: None,
            games_played: 0,
        }
    }

    /// Seed every game this session starts (tests, replays)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.state = self.fresh_state();
        self
    }

    /// Run one host frame
    pub fn frame(&mut self, input: &TickInput) -> FrameSignal {
        match self.phase {
            SessionPhase::Title | SessionPhase::GameOver => {
                if input.start {
                    self.start_game();
                    FrameSignal::Started
                } else {
                    FrameSignal::Idle
                }
            }
            SessionPhase::Playing => {
                let outcome = tick(&mut self.state, input);
                self.audio.play_events(&self.state.events);
                match outcome {
                    TickOutcome::Continue => FrameSignal::Running,
                    TickOutcome::GameOver => {
                        self.finish_game();
                        FrameSignal::GameOver
                    }
                }
            }
        }
    }

    /// Throw away the current game and start a new one
    pub fn start_game(&mut self) {
        self.state = self.fresh_state();
        self.phase = SessionPhase::Playing;
        self.games_played += 1;
        self.audio.play_music(MusicTrack::Game);
        log::info!(
            "Game {} started ({} mode)",
            self.games_played,
            self.state.mode.as_str()
        );
    }

    fn finish_game(&mut self) {
        self.phase = SessionPhase::GameOver;
        let scores = self.state.scores();
        let best = self.high_score.register(&mut self.store, &scores);
        self.audio.play_music(MusicTrack::GameOver);
        log::info!("Game {} over: scores {:?}, best {}", self.games_played, scores, best);
    }

    fn fresh_state(&self) -> GameState {
        match self.seed {
            Some(seed) => GameState::with_seed(self.settings.player_mode, seed.wrapping_add(self.games_played as u64)),
            None => GameState::new(self.settings.player_mode),
        }
    }

    /// Change the player count; applies from the next game
    pub fn set_mode(&mut self, mode: PlayerMode) {
        if self.settings.player_mode == mode {
            return;
        }
        self.settings.player_mode = mode;
        self.settings.save(&mut self.store);
        if self.phase == SessionPhase::Title {
            self.state = self.fresh_state();
        }
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        self.settings = settings;
        self.settings.save(&mut self.store);
    }

    pub fn snapshot(&self) -> Snapshot {
        build_snapshot(&self.state, self.phase, self.high_score.best())
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager<A> {
        &mut self.audio
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCue, QueuedAudio};
    use crate::consts::MAX_HEARTS;
    use crate::persistence::MemoryStore;
    use crate::sim::{Bullet, Enemy, EnemyKind, PlayerInput};

    fn input(time_ms: f64, start: bool) -> TickInput {
        TickInput {
            time_ms,
            delta_ms: 16.0,
            players: [PlayerInput::default(); 2],
            start,
        }
    }

    fn session(best: Option<&str>) -> Session<MemoryStore, QueuedAudio> {
        let mut store = MemoryStore::new();
        if let Some(best) = best {
            store.set(HighScore::STORAGE_KEY, best).unwrap();
        }
        Session::new(store, QueuedAudio::default()).with_seed(11)
    }

    #[test]
    fn test_title_waits_for_start() {
        let mut s = session(None);
        assert_eq!(s.phase(), SessionPhase::Title);
        assert_eq!(s.frame(&input(0.0, false)), FrameSignal::Idle);
        assert_eq!(s.frame(&input(16.0, true)), FrameSignal::Started);
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert_eq!(s.frame(&input(32.0, false)), FrameSignal::Running);

        // Clock starts at the first played frame
        assert_eq!(s.state().start_time, Some(32.0));
        assert_eq!(s.audio_mut().current_music(), Some(MusicTrack::Game));
    }

    #[test]
    fn test_game_over_records_high_score() {
        let mut s = session(Some("50"));
        assert_eq!(s.high_score(), 50);
        s.frame(&input(0.0, true));

        let state = s.state_mut();
        state.spawner.delay = f64::INFINITY;
        state.players[0].hearts = 1;
        state.players[0].score = 120;
        state.players[1].hearts = 0;
        let pos = state.players[0].pos;
        state.insert_enemy(|id| Enemy::flocking(id, pos));

        assert_eq!(s.frame(&input(16.0, false)), FrameSignal::GameOver);
        assert_eq!(s.phase(), SessionPhase::GameOver);
        assert_eq!(s.state().players[0].hearts, 0);
        assert_eq!(s.high_score(), 120);
        assert_eq!(s.store().get(HighScore::STORAGE_KEY).unwrap().as_deref(), Some("120"));

        // Frozen until restart
        assert_eq!(s.frame(&input(32.0, false)), FrameSignal::Idle);
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let mut s = session(Some("500"));
        s.frame(&input(0.0, true));
        let state = s.state_mut();
        for p in &mut state.players {
            p.hearts = 0;
        }
        state.players[0].hearts = 1;
        state.players[0].score = 90;
        state.players[0].invulnerable_until = 0.0;
        let pos = state.players[0].pos;
        state.bullets.push(Bullet::linear(pos, glam::Vec2::ZERO, EnemyKind::Seeker));

        assert_eq!(s.frame(&input(16.0, false)), FrameSignal::GameOver);
        assert_eq!(s.high_score(), 500);
    }

    #[test]
    fn test_restart_resets_everything_but_high_score() {
        let mut s = session(None);
        s.frame(&input(0.0, true));
        let state = s.state_mut();
        state.players[0].score = 300;
        state.players[0].power = 7;
        state.players[0].hearts = 1;
        state.players[1].hearts = 0;
        let pos = state.players[0].pos;
        state.insert_enemy(|id| Enemy::flocking(id, pos));
        state.insert_enemy(|id| Enemy::seeker(id, glam::Vec2::new(5.0, 5.0)));
        state.bullets.push(Bullet::linear(glam::Vec2::new(5.0, 5.0), glam::Vec2::ZERO, EnemyKind::Seeker));
        s.frame(&input(16.0, false));
        assert_eq!(s.phase(), SessionPhase::GameOver);

        assert_eq!(s.frame(&input(5000.0, true)), FrameSignal::Started);
        let state = s.state();
        assert_eq!(state.players.len(), 2);
        assert!(state.players.iter().all(|p| p.hearts == MAX_HEARTS && p.power == 0 && p.score == 0));
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.start_time, None);
        assert_eq!(state.spawner.delay, crate::consts::SPAWN_DELAY_START);
        assert_eq!(s.high_score(), 300);
        assert_eq!(s.games_played(), 2);
    }

    #[test]
    fn test_mode_change_applies_on_title() {
        let mut s = session(None);
        s.set_mode(PlayerMode::Single);
        assert_eq!(s.state().players.len(), 1);
        assert_eq!(Settings::load(s.store()).player_mode, PlayerMode::Single);
    }

    #[test]
    fn test_events_reach_audio() {
        let mut s = session(None);
        s.frame(&input(0.0, true));
        s.audio_mut().sink_mut().drain();

        let state = s.state_mut();
        state.spawner.delay = f64::INFINITY;
        let pos = state.players[0].pos;
        state.bullets.push(Bullet::linear(pos, glam::Vec2::ZERO, EnemyKind::Seeker));
        s.frame(&input(16.0, false));

        let cues = s.audio_mut().sink_mut().drain();
        assert!(cues.iter().any(|c| matches!(c, AudioCue::Effect { effect: crate::audio::SoundEffect::PlayerHit, .. })));
    }
}
