//! Audio collaborator
//!
//! The core never plays sound itself. The session maps drained `GameEvent`s
//! and UI commands to `SoundEffect`s and hands them to an `AudioSink`. Each
//! effect carries a small procedural recipe (oscillator + envelope) that a
//! playback backend can synthesize; no sample files needed.

use crate::sim::{GameEvent, Outcome};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player or turret fires
    Shoot,
    /// Any explosion, and losing a run
    Explosion,
    /// UI commands and turret deploy
    Click,
    /// Scrap pickup, and a won run
    Collect,
    /// Extraction zone opened
    ExtractionAlarm,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    /// Low-passed white noise
    Noise,
}

/// Synthesis recipe for one effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    /// Frequency (or noise filter cutoff) at the start
    pub start_hz: f32,
    pub end_hz: f32,
    pub peak_gain: f32,
    pub duration_secs: f32,
}

impl SoundEffect {
    /// Effect triggered by a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::PlayerShot | GameEvent::TurretShot => Some(SoundEffect::Shoot),
            GameEvent::Explosion { .. } => Some(SoundEffect::Explosion),
            GameEvent::TurretDeployed { .. } => Some(SoundEffect::Click),
            GameEvent::ScrapCollected { .. } => Some(SoundEffect::Collect),
            GameEvent::ExtractionOpened { .. } => Some(SoundEffect::ExtractionAlarm),
            GameEvent::RunEnded(Outcome::Won) => Some(SoundEffect::Collect),
            GameEvent::RunEnded(Outcome::Lost) => Some(SoundEffect::Explosion),
            GameEvent::ReloadStarted | GameEvent::ReloadFinished | GameEvent::EnemyKilled { .. } => None,
        }
    }

    pub fn voice(self) -> Voice {
        match self {
            // Falling square chirp
            SoundEffect::Shoot => Voice {
                waveform: Waveform::Square,
                start_hz: 800.0,
                end_hz: 100.0,
                peak_gain: 0.3,
                duration_secs: 0.1,
            },
            // Thud: noise with a closing low-pass
            SoundEffect::Explosion => Voice {
                waveform: Waveform::Noise,
                start_hz: 800.0,
                end_hz: 0.0,
                peak_gain: 0.5,
                duration_secs: 0.4,
            },
            SoundEffect::Click => Voice {
                waveform: Waveform::Sine,
                start_hz: 1200.0,
                end_hz: 600.0,
                peak_gain: 0.2,
                duration_secs: 0.05,
            },
            // Rising blip
            SoundEffect::Collect => Voice {
                waveform: Waveform::Sine,
                start_hz: 1500.0,
                end_hz: 2000.0,
                peak_gain: 0.1,
                duration_secs: 0.1,
            },
            // Two-tone siren, steps up an octave halfway
            SoundEffect::ExtractionAlarm => Voice {
                waveform: Waveform::Triangle,
                start_hz: 440.0,
                end_hz: 880.0,
                peak_gain: 0.1,
                duration_secs: 1.0,
            },
        }
    }
}

/// Anything that can play effects
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    /// Set master volume (0.0 - 1.0)
    fn set_volume(&mut self, _volume: f32) {}
}

/// Sink that logs effects instead of playing them (headless runs)
#[derive(Debug, Clone)]
pub struct LogAudio {
    volume: f32,
    muted: bool,
    /// Effects requested so far
    pub played: usize,
}

impl Default for LogAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl LogAudio {
    pub fn new() -> Self {
        Self {
            volume: 0.5,
            muted: false,
            played: 0,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Gain an effect would be played at
    fn effective_gain(&self, voice: &Voice) -> f32 {
        if self.muted {
            0.0
        } else {
            voice.peak_gain * self.volume
        }
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        let voice = effect.voice();
        let gain = self.effective_gain(&voice);
        if gain <= 0.0 {
            return;
        }
        self.played += 1;
        log::trace!(
            "sfx {:?}: {:?} {:.0}->{:.0} Hz, gain {:.2}, {:.2}s",
            effect,
            voice.waveform,
            voice.start_hz,
            voice.end_hz,
            gain,
            voice.duration_secs
        );
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_event_mapping() {
        assert_eq!(SoundEffect::for_event(&GameEvent::TurretShot), Some(SoundEffect::Shoot));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Explosion { pos: Vec2::ZERO, intensity: 2 }),
            Some(SoundEffect::Explosion)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ExtractionOpened { pos: Vec2::ZERO }),
            Some(SoundEffect::ExtractionAlarm)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::RunEnded(Outcome::Won)),
            Some(SoundEffect::Collect)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::ReloadStarted), None);
    }

    #[test]
    fn test_log_audio_volume() {
        let mut audio = LogAudio::new();
        audio.set_volume(3.0);
        assert_eq!(audio.volume(), 1.0);
        audio.play(SoundEffect::Click);
        assert_eq!(audio.played, 1);

        audio.set_muted(true);
        audio.play(SoundEffect::Click);
        assert_eq!(audio.played, 1);

        audio.set_muted(false);
        audio.set_volume(0.0);
        audio.play(SoundEffect::Shoot);
        assert_eq!(audio.played, 1);
    }
}
