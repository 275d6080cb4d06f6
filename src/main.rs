// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use lyricsync::app_config::{self, Config, TrackInfo};
use lyricsync::caption_fetch::{CaptionSource, FileCaptionSource};
use lyricsync::caption_processor::{parse_captions, write_captions, CaptionCollection};
use lyricsync::cue_index::CueWindow;
use lyricsync::file_utils::FileManager;
use lyricsync::lyrics_session::LyricsDisplay;
use lyricsync::playback::{AudioBackend, AudioEvent, PlaybackCommand, PlaybackController};
use lyricsync::teleprompter::{render_window, TeleprompterView};
use lyricsync::timestamp;
use lyricsync::validation::TimecodeValidator;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite a caption file in canonical, time-sorted form
    Normalize {
        /// Caption file to read
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Where to write the result (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the teleprompter lines at given playback positions
    Show {
        /// Caption file to read
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Playback positions in seconds or as timestamps (e.g. 01:05.5)
        #[arg(long = "at", required = true, num_args = 1..)]
        positions: Vec<String>,
    },

    /// Simulate playback and print the lyrics as they change
    Follow {
        /// Caption file to read
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Simulated tick length in seconds
        #[arg(long, default_value_t = 0.25)]
        step: f64,

        /// Stop at this position (defaults to the end of the last cue)
        #[arg(long)]
        until: Option<f64>,

        /// Playback rate steps to apply before starting (+ faster, - slower)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        rate_steps: i32,
    },

    /// Report timecode problems in caption files
    Lint {
        /// Caption file or directory to scan
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// List the configured tracks
    Tracks,

    /// Generate shell completions for lyricsync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// lyricsync - synchronized lyrics tooling
///
/// Parses, checks and previews WebVTT caption files used as synchronized
/// lyrics.
#[derive(Parser, Debug)]
#[command(name = "lyricsync")]
#[command(version)]
#[command(about = "Synchronized lyrics caption tooling")]
#[command(long_about = "lyricsync parses, normalizes, previews and lints WebVTT caption files used as synchronized lyrics.

EXAMPLES:
    lyricsync normalize song.vtt -o clean.vtt     # Rewrite in canonical form
    lyricsync show song.vtt --at 3 01:05.5        # Teleprompter at two positions
    lyricsync follow song.vtt --rate-steps 2      # Simulate playback at 1.5x
    lyricsync lint captions/                      # Check every .vtt file
    lyricsync completions bash > lyricsync.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Audio engine stand-in that advances time on demand
struct SimulatedAudio {
    current_time: f64,
    duration: f64,
    rate: f64,
    volume: f64,
    playing: bool,
}

impl SimulatedAudio {
    fn new(duration: f64) -> Self {
        Self {
            current_time: 0.0,
            duration,
            rate: 1.0,
            volume: 1.0,
            playing: false,
        }
    }
}

impl AudioBackend for SimulatedAudio {
    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info by default; updated once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "lyricsync", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = Config::load_or_create(&cli.config_path)?;
    config.validate().context("Configuration validation failed")?;

    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    match cli.command {
        Commands::Normalize { input, output } => run_normalize(&config, &input, output.as_deref()),
        Commands::Show { input, positions } => run_show(&config, &input, &positions),
        Commands::Follow { input, step, until, rate_steps } => {
            run_follow(&config, &input, step, until, rate_steps).await
        }
        Commands::Lint { path } => run_lint(&path),
        Commands::Tracks => {
            run_tracks(&config);
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn run_normalize(config: &Config, input: &Path, output: Option<&Path>) -> Result<()> {
    let collection = CaptionCollection::from_file(input)?;

    match output {
        Some(output) => {
            let path = FileManager::resolve_output_path(output, input, &config.captions.fallback_export_name);
            collection.write_to_vtt(&path, &config.captions.header)?;
            info!("Wrote {} cues to {:?}", collection.cues.len(), path);
        }
        None => print!("{}", write_captions(&config.captions.header, &collection.cues)),
    }

    Ok(())
}

// Accepts plain seconds ("12.5") as well as caption timestamps ("00:12.500")
fn parse_position(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| timestamp::decode(raw))
}

fn print_view(config: &Config, position: f64, view: &TeleprompterView) {
    let [previous, current, next] = view.lines(&config.captions.idle_marker);
    println!("[{}]", timestamp::encode(position));
    println!("    {}", previous);
    println!("  > {}", current);
    println!("    {}", next);
}

fn run_show(config: &Config, input: &Path, positions: &[String]) -> Result<()> {
    let collection = CaptionCollection::from_file(input)?;
    if collection.cues.is_empty() {
        warn!("No cues found in {:?}", input);
        return Ok(());
    }

    for raw in positions {
        let position = parse_position(raw);
        let view = render_window(&CueWindow::at(position, &collection.cues));
        print_view(config, position, &view);
    }

    Ok(())
}

// The simulated clock must move forward and reach a finite end
fn check_follow_args(step: f64, until: Option<f64>) -> Result<()> {
    if !(step > 0.0 && step.is_finite()) {
        return Err(anyhow!("Step must be a positive number, got {}", step));
    }
    if let Some(until) = until.filter(|u| !u.is_finite()) {
        return Err(anyhow!("Until must be a finite position, got {}", until));
    }
    Ok(())
}

async fn run_follow(config: &Config, input: &Path, step: f64, until: Option<f64>, rate_steps: i32) -> Result<()> {
    check_follow_args(step, until)?;

    let url = input.to_string_lossy().to_string();
    let mut display = LyricsDisplay::new();
    let track = TrackInfo::new("follow", &url, 0.0).with_captions(&url);

    if let Some((ticket, url)) = display.select_track(&track) {
        let result = FileCaptionSource.fetch(&url).await;
        display.apply_fetch(ticket, result);
    }

    let end = until
        .or_else(|| display.cues().iter().map(|c| c.end_time).reduce(f64::max))
        .unwrap_or(0.0);
    if display.cues().is_empty() {
        warn!("No lyrics to follow in {:?}", input);
        return Ok(());
    }

    let mut player = PlaybackController::new(SimulatedAudio::new(end), config.playback.clone());
    let rate_command = if rate_steps >= 0 { PlaybackCommand::RateUp } else { PlaybackCommand::RateDown };
    for _ in 0..rate_steps.unsigned_abs() {
        player.dispatch(rate_command);
    }
    player.dispatch(PlaybackCommand::TogglePlay);
    info!("Following {:?} at {}x", input, player.playback_rate());

    let mut last_view: Option<TeleprompterView> = None;
    loop {
        let position = player.current_time();
        display.handle_audio(AudioEvent::TimeUpdate(position));

        let view = display.view();
        if view != last_view {
            if let Some(view) = &view {
                print_view(config, position, view);
            }
            last_view = view;
        }

        if position >= end {
            player.handle_event(AudioEvent::Ended);
            break;
        }
        player.dispatch(PlaybackCommand::SeekTo(position + step * player.playback_rate()));
    }

    let audio = player.audio();
    debug!(
        "Playback finished at {:.3}s, rate {}x, volume {}, playing = {}",
        audio.current_time, audio.rate, audio.volume, audio.playing
    );
    Ok(())
}

fn run_lint(path: &Path) -> Result<()> {
    if !FileManager::file_exists(path) && !FileManager::dir_exists(path) {
        return Err(anyhow!("No such file or directory: {}", path.display()));
    }

    let files = FileManager::find_caption_files(path)?;
    if files.is_empty() {
        warn!("No caption files found under {:?}", path);
        return Ok(());
    }

    let validator = TimecodeValidator::new();
    let mut failing_files = 0;

    for file in &files {
        let content = FileManager::read_to_string(file)?;
        let cues = parse_captions(&content);
        let result = validator.validate(&cues);

        if result.passed {
            info!("{}: {} cues OK", file.display(), cues.len());
            continue;
        }

        failing_files += 1;
        warn!("{}: {} issue(s)", file.display(), result.total_issues);
        for cue_result in result.failed_cues() {
            let cue = &cues[cue_result.index];
            for issue in &cue_result.issues {
                println!(
                    "{}: cue {} ({} --> {}): {}",
                    file.display(),
                    cue_result.index + 1,
                    cue.format_start_time(),
                    cue.format_end_time(),
                    issue
                );
            }
        }
    }

    if failing_files > 0 {
        return Err(anyhow!("{} of {} caption file(s) have timecode issues", failing_files, files.len()));
    }

    info!("Checked {} caption file(s)", files.len());
    Ok(())
}

fn run_tracks(config: &Config) {
    for track in &config.tracks {
        println!(
            "{:>4}  {:<28} {:>6}  {}",
            track.id,
            track.title,
            timestamp::format_duration(track.duration_secs),
            track.caption_url().unwrap_or("-")
        );
    }
}
