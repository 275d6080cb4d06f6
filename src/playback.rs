/*!
 * Playback control facade.
 *
 * The audio engine is an external collaborator reached through the
 * `AudioBackend` trait. UI intents, whether they come from buttons or the
 * keyboard, become `PlaybackCommand`s that the `PlaybackController` applies.
 */

use log::{debug, warn};

use crate::app_config::PlaybackConfig;

/// Interface of the external audio engine
pub trait AudioBackend {
    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Move the playback position
    fn set_current_time(&mut self, seconds: f64);

    /// Total length in seconds; may be unknown (NaN) before metadata loads
    fn duration(&self) -> f64;

    fn play(&mut self);

    fn pause(&mut self);

    fn set_playback_rate(&mut self, rate: f64);

    /// Output volume in `[0, 1]`
    fn set_volume(&mut self, volume: f64);
}

/// Change notifications emitted by the audio engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    /// Playback position moved
    TimeUpdate(f64),
    /// Metadata loaded with a new duration
    DurationChange(f64),
    /// Playback reached the end
    Ended,
}

/// Intents the facade understands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackCommand {
    TogglePlay,
    /// Seek to an absolute position
    SeekTo(f64),
    /// Seek forward by the configured skip distance
    SkipForward,
    /// Seek backward by the configured skip distance
    SkipBackward,
    /// Raise the rate by one step
    RateUp,
    /// Lower the rate by one step
    RateDown,
    ResetRate,
    /// Seek to a position and start playing if paused
    JumpTo(f64),
    /// Set the output volume, clamped to `[0, 1]`
    SetVolume(f64),
}

/// Keys with a playback shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Other(char),
}

/// Element holding keyboard focus when a key is pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Document,
    TextInput,
    TextArea,
}

impl FocusTarget {
    pub fn is_text_entry(&self) -> bool {
        matches!(self, FocusTarget::TextInput | FocusTarget::TextArea)
    }
}

/// Map a key press to a command. Shortcuts never fire while the user is
/// typing in a text field.
pub fn command_for_key(key: Key, focus: FocusTarget) -> Option<PlaybackCommand> {
    if focus.is_text_entry() {
        return None;
    }

    match key {
        Key::Space => Some(PlaybackCommand::TogglePlay),
        Key::ArrowLeft => Some(PlaybackCommand::SkipBackward),
        Key::ArrowRight => Some(PlaybackCommand::SkipForward),
        Key::ArrowUp => Some(PlaybackCommand::RateUp),
        Key::ArrowDown => Some(PlaybackCommand::RateDown),
        Key::Other(_) => None,
    }
}

/// Coordinates an audio backend with playback state
pub struct PlaybackController<A: AudioBackend> {
    audio: A,
    config: PlaybackConfig,
    is_playing: bool,
    playback_rate: f64,
    volume: f64,
    duration: f64,
}

impl<A: AudioBackend> PlaybackController<A> {
    pub fn new(mut audio: A, config: PlaybackConfig) -> Self {
        if !(config.min_rate <= config.max_rate) {
            warn!(
                "Playback rate bounds are inverted or unset (min {}, max {}); rate changes pin to the maximum",
                config.min_rate, config.max_rate
            );
        }

        let duration = audio.duration();
        let playback_rate = config.default_rate;
        let volume = clamp_volume(config.volume).unwrap_or(1.0);
        audio.set_volume(volume);

        Self {
            audio,
            config,
            is_playing: false,
            playback_rate,
            volume,
            duration,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Last known duration; NaN until the backend reports one
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn current_time(&self) -> f64 {
        self.audio.current_time()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Handle a key press; returns the command that was applied, if any
    pub fn handle_key(&mut self, key: Key, focus: FocusTarget) -> Option<PlaybackCommand> {
        let command = command_for_key(key, focus)?;
        self.dispatch(command);
        Some(command)
    }

    /// Apply a command to the backend
    pub fn dispatch(&mut self, command: PlaybackCommand) {
        debug!("Playback command: {:?}", command);

        match command {
            PlaybackCommand::TogglePlay => {
                if self.is_playing {
                    self.audio.pause();
                } else {
                    self.audio.play();
                }
                self.is_playing = !self.is_playing;
            }
            PlaybackCommand::SeekTo(seconds) => {
                self.audio.set_current_time(self.clamp_position(seconds));
            }
            PlaybackCommand::SkipForward => {
                let target = self.audio.current_time() + self.config.skip_secs;
                self.audio.set_current_time(self.clamp_position(target));
            }
            PlaybackCommand::SkipBackward => {
                let target = self.audio.current_time() - self.config.skip_secs;
                self.audio.set_current_time(self.clamp_position(target));
            }
            PlaybackCommand::RateUp => self.set_rate(self.playback_rate + self.config.rate_step),
            PlaybackCommand::RateDown => self.set_rate(self.playback_rate - self.config.rate_step),
            PlaybackCommand::ResetRate => self.set_rate(self.config.default_rate),
            PlaybackCommand::JumpTo(seconds) => {
                self.audio.set_current_time(self.clamp_position(seconds));
                if !self.is_playing {
                    self.audio.play();
                    self.is_playing = true;
                }
            }
            PlaybackCommand::SetVolume(volume) => match clamp_volume(volume) {
                Some(volume) => {
                    self.volume = volume;
                    self.audio.set_volume(volume);
                }
                None => warn!("Ignoring non-numeric volume {}", volume),
            },
        }
    }

    /// Update cached state from an engine notification
    pub fn handle_event(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::TimeUpdate(_) => {}
            AudioEvent::DurationChange(duration) => self.duration = duration,
            AudioEvent::Ended => self.is_playing = false,
        }
    }

    // With min > max the result is max; a NaN bound is skipped
    fn set_rate(&mut self, rate: f64) {
        if !rate.is_finite() {
            warn!("Ignoring playback rate {}", rate);
            return;
        }
        let rate = rate.max(self.config.min_rate).min(self.config.max_rate);
        self.playback_rate = rate;
        self.audio.set_playback_rate(rate);
    }

    // Positions are clamped to [0, duration]; with an unknown duration only
    // the lower bound applies.
    fn clamp_position(&self, seconds: f64) -> f64 {
        let lower = seconds.max(0.0);
        if self.duration.is_finite() && self.duration > 0.0 {
            lower.min(self.duration)
        } else {
            lower
        }
    }
}

fn clamp_volume(volume: f64) -> Option<f64> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}
