use std::fmt;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::{debug, warn};
use uuid::Uuid;

use crate::file_utils::FileManager;
use crate::timestamp;

// @module: Caption file parsing and serialization

/// Header line every exported caption file starts with
pub const CAPTION_HEADER: &str = "WEBVTT";

/// Separator between the start and end timestamp of a cue
const ARROW: &str = "-->";

/// Stable identity of a cue, independent of its position in a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CueId(Uuid);

impl CueId {
    /// Generate a fresh identity
    pub fn generate() -> Self {
        CueId(Uuid::new_v4())
    }
}

impl fmt::Display for CueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// @struct: Single timed caption entry
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    // @field: Identity assigned at creation
    pub id: CueId,

    // @field: Start time in seconds
    pub start_time: f64,

    // @field: End time in seconds (exclusive)
    pub end_time: f64,

    // @field: Display text, one logical line
    pub text: String,
}

/// Editable fields of a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueField {
    Start,
    End,
    Text,
}

impl CueField {
    /// Whether editing this field can change the ordering of a sequence
    pub fn is_timestamp(&self) -> bool {
        matches!(self, CueField::Start | CueField::End)
    }
}

impl Cue {
    /// Create a cue with a freshly generated identity
    pub fn new(start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Cue {
            id: CueId::generate(),
            start_time,
            end_time,
            text: text.into(),
        }
    }

    /// Length of the cue in seconds; zero or negative for degenerate cues
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// True when `end <= start`; such a cue is kept but never becomes active
    pub fn is_degenerate(&self) -> bool {
        self.end_time <= self.start_time
    }

    /// Whether the half-open interval `[start, end)` contains the position
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start_time && position < self.end_time
    }

    /// Convert start time to a canonical caption timestamp
    pub fn format_start_time(&self) -> String {
        timestamp::encode(self.start_time)
    }

    /// Convert end time to a canonical caption timestamp
    pub fn format_end_time(&self) -> String {
        timestamp::encode(self.end_time)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} {} {}", self.format_start_time(), ARROW, self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Stable sort by start time; cues with equal start keep their relative order
pub fn sort_cues(cues: &mut [Cue]) {
    cues.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
}

/// Parse caption text into cues, in input order.
///
/// A line containing `-->` starts a cue; the non-empty lines after it, up to
/// the next blank line, are joined with single spaces into the cue text.
/// Timestamp lines without any text are dropped. Nothing here fails:
/// unreadable timestamps decode to zero.
pub fn parse_captions(content: &str) -> Vec<Cue> {
    let lines: Vec<&str> = content.lines().collect();
    let mut cues = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();

        if let Some((start_token, end_token)) = line.split_once(ARROW) {
            let timing_line = i + 1;
            i += 1;

            let mut text_lines = Vec::new();
            while i < lines.len() && !lines[i].trim().is_empty() {
                text_lines.push(lines[i].trim());
                i += 1;
            }

            if text_lines.is_empty() {
                debug!("Dropping timestamp line {} with no text: {}", timing_line, line);
            } else {
                cues.push(Cue::new(
                    timestamp::decode(start_token.trim()),
                    timestamp::decode(end_token.trim()),
                    text_lines.join(" "),
                ));
            }
        }

        i += 1;
    }

    debug!("Parsed {} cues from {} lines", cues.len(), lines.len());
    cues
}

/// Serialize cues into canonical caption text, sorted by start time
pub fn write_captions(header: &str, cues: &[Cue]) -> String {
    let mut ordered: Vec<&Cue> = cues.iter().collect();
    ordered.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    let mut output = format!("{}\n\n", header);
    for cue in ordered {
        output.push_str(&cue.to_string());
    }
    output
}

/// Collection of cues with the file they came from
#[derive(Debug)]
pub struct CaptionCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Cues in start-time order
    pub cues: Vec<Cue>,
}

impl CaptionCollection {
    /// Create an empty collection
    pub fn new(source_file: PathBuf) -> Self {
        CaptionCollection {
            source_file,
            cues: Vec::new(),
        }
    }

    /// Parse caption text and sort the result
    pub fn from_text(source_file: PathBuf, content: &str) -> Self {
        let mut cues = parse_captions(content);
        sort_cues(&mut cues);

        let degenerate = cues.iter().filter(|c| c.is_degenerate()).count();
        if degenerate > 0 {
            warn!("{} cue(s) in {:?} end before they start and will never display", degenerate, source_file);
        }

        CaptionCollection { source_file, cues }
    }

    /// Read and parse a caption file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        Ok(Self::from_text(path.to_path_buf(), &content))
    }

    /// Canonical caption text for this collection
    pub fn to_vtt(&self) -> String {
        write_captions(CAPTION_HEADER, &self.cues)
    }

    /// Write the sorted cues to a file under the given header line
    pub fn write_to_vtt<P: AsRef<Path>>(&self, path: P, header: &str) -> Result<()> {
        let path = path.as_ref();
        FileManager::write_to_file(path, &write_captions(header, &self.cues))
            .with_context(|| format!("Failed to write caption file: {}", path.display()))
    }
}

impl fmt::Display for CaptionCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Caption Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}
