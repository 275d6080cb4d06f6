use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles loading, validating and saving the settings for
/// caption handling, playback control and the track catalog.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Caption format and authoring settings
    #[serde(default)]
    pub captions: CaptionConfig,

    /// Playback control settings
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Caption fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Track catalog
    #[serde(default = "default_tracks")]
    pub tracks: Vec<TrackInfo>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Caption format and authoring settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CaptionConfig {
    /// Header line written at the top of exported files
    #[serde(default = "default_header")]
    pub header: String,

    /// Length of a cue inserted by the editor, in seconds
    #[serde(default = "default_new_cue_duration_secs")]
    pub new_cue_duration_secs: f64,

    /// Text of a cue inserted by the editor
    #[serde(default = "default_placeholder_text")]
    pub placeholder_text: String,

    /// Marker shown on the current line when nothing is active
    #[serde(default = "default_idle_marker")]
    pub idle_marker: String,

    /// Export file stem used when no track is selected
    #[serde(default = "default_fallback_export_name")]
    pub fallback_export_name: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            header: default_header(),
            new_cue_duration_secs: default_new_cue_duration_secs(),
            placeholder_text: default_placeholder_text(),
            idle_marker: default_idle_marker(),
            fallback_export_name: default_fallback_export_name(),
        }
    }
}

/// Playback control settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaybackConfig {
    /// Relative seek distance in seconds
    #[serde(default = "default_skip_secs")]
    pub skip_secs: f64,

    /// Playback rate change per step
    #[serde(default = "default_rate_step")]
    pub rate_step: f64,

    /// Slowest allowed playback rate
    #[serde(default = "default_min_rate")]
    pub min_rate: f64,

    /// Fastest allowed playback rate
    #[serde(default = "default_max_rate")]
    pub max_rate: f64,

    /// Rate restored by a reset
    #[serde(default = "default_rate")]
    pub default_rate: f64,

    /// Initial output volume in `[0, 1]`
    #[serde(default = "default_volume")]
    pub volume: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            skip_secs: default_skip_secs(),
            rate_step: default_rate_step(),
            min_rate: default_min_rate(),
            max_rate: default_max_rate(),
            default_rate: default_rate(),
            volume: default_volume(),
        }
    }
}

/// Caption fetch settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Information about a track in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackInfo {
    /// Track identifier, also used as the export file stem
    pub id: String,
    /// Display title
    pub title: String,
    /// Duration in seconds
    pub duration_secs: f64,
    /// Audio stream URL
    #[serde(default)]
    pub audio_url: String,
    /// Artist name
    #[serde(default)]
    pub artist: Option<String>,
    /// Album name
    #[serde(default)]
    pub album: Option<String>,
    /// Caption file URL; many tracks have none
    #[serde(default)]
    pub caption_url: Option<String>,
}

impl TrackInfo {
    pub fn new(id: &str, title: &str, duration_secs: f64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            duration_secs,
            audio_url: String::new(),
            artist: None,
            album: None,
            caption_url: None,
        }
    }

    /// Attach a caption URL
    pub fn with_captions(mut self, url: &str) -> Self {
        self.caption_url = Some(url.to_string());
        self
    }

    /// Caption URL, treating an empty string as absent
    pub fn caption_url(&self) -> Option<&str> {
        self.caption_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_header() -> String {
    crate::caption_processor::CAPTION_HEADER.to_string()
}

fn default_new_cue_duration_secs() -> f64 {
    5.0
}

fn default_placeholder_text() -> String {
    "New lyric line...".to_string()
}

fn default_idle_marker() -> String {
    crate::teleprompter::IDLE_MARKER.to_string()
}

fn default_fallback_export_name() -> String {
    "lyrics".to_string()
}

fn default_skip_secs() -> f64 {
    5.0
}

fn default_rate_step() -> f64 {
    0.25
}

fn default_min_rate() -> f64 {
    0.25
}

fn default_max_rate() -> f64 {
    2.0
}

fn default_rate() -> f64 {
    1.0
}

fn default_volume() -> f64 {
    0.7
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_tracks() -> Vec<TrackInfo> {
    let album = |mut track: TrackInfo| {
        track.artist = Some("Not the Jester".to_string());
        track.album = Some("Arcane Sessions".to_string());
        track
    };

    vec![
        album(TrackInfo::new("1", "Mystic Wanderer", 245.0)),
        album(TrackInfo::new("2", "The Fool's Journey", 198.0)),
        album(TrackInfo::new("3", "Twilight Divination", 312.0)),
        album(TrackInfo::new("4", "Beneath the Velvet Moon", 267.0)),
    ]
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.captions.header.trim().is_empty() {
            return Err(anyhow!("Caption header must not be empty"));
        }

        if !(self.captions.new_cue_duration_secs > 0.0) {
            return Err(anyhow!(
                "New cue duration must be positive, got {}",
                self.captions.new_cue_duration_secs
            ));
        }

        let playback = &self.playback;
        if !(playback.skip_secs > 0.0) || !(playback.rate_step > 0.0) {
            return Err(anyhow!("Skip distance and rate step must be positive"));
        }

        if !(playback.min_rate > 0.0
            && playback.min_rate <= playback.default_rate
            && playback.default_rate <= playback.max_rate)
        {
            return Err(anyhow!(
                "Playback rates must satisfy 0 < min ({}) <= default ({}) <= max ({})",
                playback.min_rate,
                playback.default_rate,
                playback.max_rate
            ));
        }

        if !(0.0..=1.0).contains(&playback.volume) {
            return Err(anyhow!("Volume must be between 0 and 1, got {}", playback.volume));
        }

        let mut seen = HashSet::new();
        for track in &self.tracks {
            if track.id.trim().is_empty() {
                return Err(anyhow!("Track '{}' has an empty id", track.title));
            }
            if !seen.insert(track.id.as_str()) {
                return Err(anyhow!("Duplicate track id: {}", track.id));
            }
        }

        Ok(())
    }

    /// Look up a track by id
    pub fn find_track(&self, id: &str) -> Option<&TrackInfo> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Load the configuration file, writing a default one if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            captions: CaptionConfig::default(),
            playback: PlaybackConfig::default(),
            fetch: FetchConfig::default(),
            tracks: default_tracks(),
            log_level: LogLevel::default(),
        }
    }
}
