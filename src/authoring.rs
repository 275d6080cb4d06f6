/*!
 * Cue authoring engine.
 *
 * The editor owns the cue sequence of the selected track and keeps it sorted
 * by start time after every timestamp change. Per track it moves through
 * `Unselected -> Loaded -> Edited -> Loaded` (on export); switching tracks
 * discards unsaved edits.
 */

use anyhow::Result;
use log::{error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::{CaptionConfig, TrackInfo};
use crate::caption_fetch::{FetchTicket, RequestTracker};
use crate::caption_processor::{parse_captions, sort_cues, write_captions, Cue, CueField, CueId};
use crate::cue_index::{active_index, CueWindow};
use crate::errors::{EditorError, FetchError};
use crate::file_utils::{FileManager, CAPTION_EXTENSION};
use crate::playback::PlaybackCommand;
use crate::teleprompter::{render_window, TeleprompterView};
use crate::timestamp;
use crate::validation::timecodes::TimecodeValidator;

/// Lifecycle state of the editor for the selected track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Unselected,
    /// Track selected, no unsaved edits
    Loaded,
    /// Track selected with unsaved edits
    Edited,
}

/// Serialized caption file ready to be saved or downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionExport {
    /// `<track>.vtt`
    pub file_name: String,
    /// Canonical caption text
    pub contents: String,
}

/// In-memory cue editor bound to one selected track
#[derive(Debug)]
pub struct CueEditor {
    config: CaptionConfig,
    track_id: Option<String>,
    cues: Vec<Cue>,
    has_unsaved_changes: bool,
    requests: RequestTracker,
}

impl CueEditor {
    pub fn new(config: CaptionConfig) -> Self {
        Self {
            config,
            track_id: None,
            cues: Vec::new(),
            has_unsaved_changes: false,
            requests: RequestTracker::new(),
        }
    }

    pub fn state(&self) -> EditorState {
        match (&self.track_id, self.has_unsaved_changes) {
            (None, _) => EditorState::Unselected,
            (Some(_), false) => EditorState::Loaded,
            (Some(_), true) => EditorState::Edited,
        }
    }

    pub fn track_id(&self) -> Option<&str> {
        self.track_id.as_deref()
    }

    /// Cues in start-time order
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn cue(&self, id: CueId) -> Option<&Cue> {
        self.cues.iter().find(|c| c.id == id)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    /// Switch to another track, dropping the current cues.
    ///
    /// Returns a ticket when the track has captions to fetch; pass it back
    /// with the fetch result to `apply_fetch`.
    pub fn select_track(&mut self, track: &TrackInfo) -> Option<FetchTicket> {
        self.discard("switching track");
        self.track_id = Some(track.id.clone());
        info!("Editing captions for track {} ({})", track.id, track.title);

        match track.caption_url() {
            Some(_) => Some(self.requests.issue()),
            None => {
                self.requests.invalidate();
                None
            }
        }
    }

    /// Leave the current track without selecting another
    pub fn deselect(&mut self) {
        self.discard("deselecting track");
        self.track_id = None;
        self.requests.invalidate();
    }

    /// Apply the result of a caption fetch. Stale results are ignored and
    /// reported as `false`.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, result: Result<String, FetchError>) -> bool {
        if !self.requests.complete(ticket) {
            warn!("Ignoring caption fetch for a previous track selection");
            return false;
        }

        match result {
            Ok(text) => self.load_text(&text),
            Err(e) => {
                error!("Error loading captions: {}", e);
                self.cues.clear();
                self.has_unsaved_changes = false;
            }
        }
        true
    }

    /// Replace the cue sequence with parsed caption text
    pub fn load_text(&mut self, text: &str) {
        let mut cues = parse_captions(text);
        sort_cues(&mut cues);
        self.cues = cues;
        self.has_unsaved_changes = false;
    }

    /// Insert a placeholder cue starting at `position`
    pub fn add_cue(&mut self, position: f64) -> Result<CueId, EditorError> {
        self.ensure_selected()?;

        let cue = Cue::new(
            position,
            position + self.config.new_cue_duration_secs,
            self.config.placeholder_text.clone(),
        );
        let id = cue.id;
        self.insert(cue);
        Ok(id)
    }

    /// Copy a cue's text into a new cue of the same length right after it
    pub fn duplicate_cue(&mut self, id: CueId) -> Result<CueId, EditorError> {
        self.ensure_selected()?;

        let source = self.cue(id).ok_or(EditorError::CueNotFound(id))?;
        let cue = Cue::new(source.end_time, source.end_time + source.duration(), source.text.clone());
        let new_id = cue.id;
        self.insert(cue);
        Ok(new_id)
    }

    /// Edit one field. Timestamp values are decoded leniently; an unreadable
    /// value becomes zero.
    pub fn update_cue(&mut self, id: CueId, field: CueField, value: &str) -> Result<(), EditorError> {
        self.ensure_selected()?;

        let cue = self
            .cues
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(EditorError::CueNotFound(id))?;

        match field {
            CueField::Start => cue.start_time = timestamp::decode(value),
            CueField::End => cue.end_time = timestamp::decode(value),
            CueField::Text => cue.text = value.to_string(),
        }

        if field.is_timestamp() {
            sort_cues(&mut self.cues);
        }
        self.has_unsaved_changes = true;
        Ok(())
    }

    /// Write the live playback position into a field
    pub fn set_field_from_position(&mut self, id: CueId, field: CueField, position: f64) -> Result<(), EditorError> {
        let value = timestamp::encode(position);
        self.update_cue(id, field, &value)
    }

    /// Remove a cue. Asking the user for confirmation is the caller's job.
    pub fn delete_cue(&mut self, id: CueId) -> Result<(), EditorError> {
        self.ensure_selected()?;

        let index = self
            .cues
            .iter()
            .position(|c| c.id == id)
            .ok_or(EditorError::CueNotFound(id))?;
        self.cues.remove(index);
        self.has_unsaved_changes = true;
        Ok(())
    }

    /// Serialize the cues and mark the editor clean
    pub fn export(&mut self) -> CaptionExport {
        let export = self.serialize();
        info!("Exported {} cues as {}", self.cues.len(), export.file_name);
        self.has_unsaved_changes = false;
        export
    }

    /// Export into `dir` and return the written path. The editor stays dirty
    /// if the write fails.
    pub fn export_to_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<PathBuf> {
        let export = self.serialize();
        let path = FileManager::caption_output_path(dir, self.export_stem());
        FileManager::write_to_file(&path, &export.contents)?;

        info!("Exported {} cues to {}", self.cues.len(), path.display());
        self.has_unsaved_changes = false;
        Ok(path)
    }

    /// Cue to highlight at the live position
    pub fn current_cue(&self, position: f64) -> Option<&Cue> {
        active_index(position, &self.cues).map(|i| &self.cues[i])
    }

    /// Teleprompter preview of the in-memory cues; none when there are no cues
    pub fn preview(&self, position: f64) -> Option<TeleprompterView> {
        if self.cues.is_empty() {
            return None;
        }
        Some(render_window(&CueWindow::at(position, &self.cues)))
    }

    /// Command that moves playback to the start of a cue
    pub fn jump_to_cue(&self, id: CueId) -> Result<PlaybackCommand, EditorError> {
        let cue = self.cue(id).ok_or(EditorError::CueNotFound(id))?;
        Ok(PlaybackCommand::JumpTo(cue.start_time))
    }

    fn serialize(&self) -> CaptionExport {
        let report = TimecodeValidator::new().validate(&self.cues);
        if report.overlap_count() > 0 {
            warn!("Exporting {} overlapping cue(s)", report.overlap_count());
        }

        CaptionExport {
            file_name: format!("{}.{}", self.export_stem(), CAPTION_EXTENSION),
            contents: write_captions(&self.config.header, &self.cues),
        }
    }

    fn export_stem(&self) -> &str {
        self.track_id.as_deref().unwrap_or(&self.config.fallback_export_name)
    }

    fn insert(&mut self, cue: Cue) {
        self.cues.push(cue);
        sort_cues(&mut self.cues);
        self.has_unsaved_changes = true;
    }

    fn ensure_selected(&self) -> Result<(), EditorError> {
        match self.track_id {
            Some(_) => Ok(()),
            None => Err(EditorError::NoTrackSelected),
        }
    }

    fn discard(&mut self, reason: &str) {
        if self.has_unsaved_changes {
            warn!(
                "Discarding {} unsaved cue edit(s) for track {} while {}",
                self.cues.len(),
                self.track_id.as_deref().unwrap_or("?"),
                reason
            );
        }
        self.cues.clear();
        self.has_unsaved_changes = false;
    }
}
