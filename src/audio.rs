//! Audio cues
//!
//! The simulation only raises [`GameEvent`]s. This module turns them into
//! sound effect and music cues and hands them to an [`AudioSink`]; actual
//! synthesis belongs to the host.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// An enemy fired
    BulletFired,
    /// A player lost a heart
    PlayerHit,
    /// A player regained a heart
    HeartGained,
    /// An enemy was taken out for points
    EnemyCaptured,
    /// A player used the flash
    AbilityUsed,
}

/// Background music
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicTrack {
    Title,
    Game,
    GameOver,
}

/// One cue for the host, with its effective volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AudioCue {
    Effect { effect: SoundEffect, volume: f32 },
    Music { track: MusicTrack, volume: f32 },
}

/// Where cues go
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    fn music(&mut self, track: MusicTrack, volume: f32);
}

/// Drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
    fn music(&mut self, _track: MusicTrack, _volume: f32) {}
}

/// Writes cues to the log at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {effect:?} @ {volume:.2}");
    }

    fn music(&mut self, track: MusicTrack, volume: f32) {
        log::debug!("music {track:?} @ {volume:.2}");
    }
}

/// Buffers cues until the host drains them
#[derive(Debug, Clone, Default)]
pub struct QueuedAudio {
    cues: Vec<AudioCue>,
}

impl QueuedAudio {
    pub fn drain(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.cues)
    }
}

impl AudioSink for QueuedAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.cues.push(AudioCue::Effect { effect, volume });
    }

    fn music(&mut self, track: MusicTrack, volume: f32) {
        self.cues.push(AudioCue::Music { track, volume });
    }
}

/// Sound effects for one frame's events, each at most once, in first-seen order
pub fn effects_for(events: &[GameEvent]) -> Vec<SoundEffect> {
    let mut effects = Vec::new();
    for event in events {
        let effect = match *event {
            GameEvent::BulletFired { .. } => Some(SoundEffect::BulletFired),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::PlayerHit),
            GameEvent::HeartGained { .. } => Some(SoundEffect::HeartGained),
            GameEvent::EnemyRemoved { score, .. } if score > 0 => Some(SoundEffect::EnemyCaptured),
            GameEvent::AbilityUsed { .. } => Some(SoundEffect::AbilityUsed),
            _ => None,
        };
        if let Some(effect) = effect
            && !effects.contains(&effect)
        {
            effects.push(effect);
        }
        // A flash that landed also counts as a capture
        if matches!(event, GameEvent::AbilityUsed { hits, .. } if *hits > 0)
            && !effects.contains(&SoundEffect::EnemyCaptured)
        {
            effects.push(SoundEffect::EnemyCaptured);
        }
    }
    effects
}

/// Applies settings and music state on top of a sink
pub struct AudioManager<S> {
    sink: S,
    sfx_volume: f32,
    music_volume: f32,
    current_music: Option<MusicTrack>,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        let mut manager = Self {
            sink,
            sfx_volume: 0.0,
            music_volume: 0.0,
            current_music: None,
        };
        manager.apply_settings(settings);
        manager
    }

    /// Take new volumes; music that was silenced resumes once audible again
    pub fn apply_settings(&mut self, settings: &Settings) {
        let was_silent = self.music_volume <= 0.0;
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
        if was_silent
            && self.music_volume > 0.0
            && let Some(track) = self.current_music
        {
            self.sink.music(track, self.music_volume);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Play the effects for a frame's events
    pub fn play_events(&mut self, events: &[GameEvent]) {
        if self.sfx_volume <= 0.0 {
            return;
        }
        for effect in effects_for(events) {
            self.sink.play(effect, self.sfx_volume);
        }
    }

    /// Switch music; repeated requests for the playing track are ignored
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.current_music == Some(track) {
            return;
        }
        self.current_music = Some(track);
        if self.music_volume > 0.0 {
            self.sink.music(track, self.music_volume);
        }
    }

    pub fn current_music(&self) -> Option<MusicTrack> {
        self.current_music
    }
}
