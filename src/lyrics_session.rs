use anyhow::{anyhow, Result};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::app_config::TrackInfo;
use crate::caption_fetch::{CaptionSource, FetchTicket, RequestTracker};
use crate::caption_processor::{parse_captions, sort_cues, Cue};
use crate::cue_index::CueWindow;
use crate::errors::FetchError;
use crate::playback::AudioEvent;
use crate::teleprompter::{render_window, TeleprompterView};

// @module: Read-only lyric display driven by playback

/// Display-side state for the selected track
#[derive(Debug, Default)]
pub struct LyricsDisplay {
    caption_url: Option<String>,
    cues: Vec<Cue>,
    position: f64,
    requests: RequestTracker,
}

impl LyricsDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a track. Returns the ticket and URL to fetch when the track
    /// has captions; until the fetch lands no cue is active.
    pub fn select_track(&mut self, track: &TrackInfo) -> Option<(FetchTicket, String)> {
        self.cues.clear();
        self.position = 0.0;
        self.caption_url = track.caption_url().map(str::to_string);

        match &self.caption_url {
            Some(url) => {
                info!("Loading lyrics for {} from {}", track.title, url);
                Some((self.requests.issue(), url.clone()))
            }
            None => {
                debug!("Track {} has no captions", track.id);
                self.requests.invalidate();
                None
            }
        }
    }

    /// Drop the selection entirely
    pub fn clear(&mut self) {
        self.cues.clear();
        self.position = 0.0;
        self.caption_url = None;
        self.requests.invalidate();
    }

    /// Install fetched captions if the ticket still matches the selection
    pub fn apply_fetch(&mut self, ticket: FetchTicket, result: Result<String, FetchError>) -> bool {
        if !self.requests.complete(ticket) {
            warn!("Discarding captions fetched for a previous track selection");
            return false;
        }

        match result {
            Ok(text) => {
                let mut cues = parse_captions(&text);
                sort_cues(&mut cues);
                debug!("Loaded {} lyric cues", cues.len());
                self.cues = cues;
            }
            Err(e) => {
                error!("Error loading caption file: {}", e);
                self.cues.clear();
            }
        }
        true
    }

    pub fn set_position(&mut self, position: f64) {
        self.position = position;
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Track audio engine notifications
    pub fn handle_audio(&mut self, event: AudioEvent) {
        if let AudioEvent::TimeUpdate(position) = event {
            self.set_position(position);
        }
    }

    /// What to show; `None` means render nothing at all (no captions for the
    /// track, a failed fetch, or a fetch still pending)
    pub fn view(&self) -> Option<TeleprompterView> {
        if self.caption_url.is_none() || self.cues.is_empty() {
            return None;
        }
        Some(render_window(&CueWindow::at(self.position, &self.cues)))
    }
}

/// Messages accepted by the lyrics task
#[derive(Debug)]
pub enum LyricsEvent {
    SelectTrack(TrackInfo),
    ClearTrack,
    Audio(AudioEvent),
    CaptionsLoaded {
        ticket: FetchTicket,
        result: Result<String, FetchError>,
    },
}

/// Handle to a running lyrics task
pub struct LyricsHandle {
    events: mpsc::UnboundedSender<LyricsEvent>,
    view: watch::Receiver<Option<TeleprompterView>>,
    task: JoinHandle<()>,
}

impl LyricsHandle {
    pub fn select_track(&self, track: TrackInfo) -> Result<()> {
        self.send(LyricsEvent::SelectTrack(track))
    }

    pub fn clear_track(&self) -> Result<()> {
        self.send(LyricsEvent::ClearTrack)
    }

    pub fn audio_event(&self, event: AudioEvent) -> Result<()> {
        self.send(LyricsEvent::Audio(event))
    }

    pub fn time_update(&self, position: f64) -> Result<()> {
        self.audio_event(AudioEvent::TimeUpdate(position))
    }

    /// Latest published view
    pub fn view(&self) -> Option<TeleprompterView> {
        self.view.borrow().clone()
    }

    /// Receiver that is notified whenever the view is republished
    pub fn subscribe(&self) -> watch::Receiver<Option<TeleprompterView>> {
        self.view.clone()
    }

    /// Stop the task and wait for it to finish
    pub async fn shutdown(self) {
        let LyricsHandle { events, task, .. } = self;
        drop(events);
        if let Err(e) = task.await {
            error!("Lyrics task ended abnormally: {}", e);
        }
    }

    fn send(&self, event: LyricsEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| anyhow!("Lyrics session has stopped"))
    }
}

/// Start the lyrics task. The task is the only writer of the cue sequence;
/// fetches run in their own tasks and report back through the same channel.
pub fn spawn_lyrics_session(source: Arc<dyn CaptionSource>) -> LyricsHandle {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(None);

    // Weak, so the task ends once the handle is gone and in-flight fetches finish
    let fetch_tx = events_tx.downgrade();

    let task = tokio::spawn(async move {
        let mut display = LyricsDisplay::new();

        while let Some(event) = events_rx.recv().await {
            match event {
                LyricsEvent::SelectTrack(track) => {
                    if let Some((ticket, url)) = display.select_track(&track) {
                        if let Some(tx) = fetch_tx.upgrade() {
                            let source = Arc::clone(&source);
                            tokio::spawn(async move {
                                let result = source.fetch(&url).await;
                                let _ = tx.send(LyricsEvent::CaptionsLoaded { ticket, result });
                            });
                        }
                    }
                }
                LyricsEvent::ClearTrack => display.clear(),
                LyricsEvent::Audio(audio) => display.handle_audio(audio),
                LyricsEvent::CaptionsLoaded { ticket, result } => {
                    display.apply_fetch(ticket, result);
                }
            }

            view_tx.send_if_modified(|current| {
                let next = display.view();
                if *current != next {
                    *current = next;
                    true
                } else {
                    false
                }
            });
        }

        debug!("Lyrics session stopped");
    });

    LyricsHandle {
        events: events_tx,
        view: view_rx,
        task,
    }
}
