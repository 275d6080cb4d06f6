/*!
 * Integration tests for the lyrics display session task
 */

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use lyricsync::app_config::TrackInfo;
use lyricsync::lyrics_session::spawn_lyrics_session;
use lyricsync::playback::AudioEvent;
use lyricsync::teleprompter::{CurrentLine, TeleprompterView};
use crate::common::{self, MockCaptionSource};

const WAIT: Duration = Duration::from_secs(2);

fn current_text(view: &Option<TeleprompterView>) -> Option<&str> {
    match view.as_ref().map(|v| &v.current) {
        Some(CurrentLine::Lyric(text)) => Some(text.as_str()),
        _ => None,
    }
}

#[tokio::test]
async fn test_session_afterFetch_shouldPublishActiveLine() -> Result<()> {
    common::init_test_logging();
    let source = Arc::new(MockCaptionSource::new().serve("1.vtt", common::TWO_CUE_CAPTIONS, 0));
    let handle = spawn_lyrics_session(source.clone());
    let mut views = handle.subscribe();

    handle.select_track(TrackInfo::new("1", "Mystic Wanderer", 245.0).with_captions("1.vtt"))?;
    handle.time_update(5.0)?;

    timeout(WAIT, views.wait_for(|v| current_text(v) == Some("Second line"))).await??;

    let view = handle.view().expect("captions are loaded");
    assert_eq!(view.previous, "First line");
    assert_eq!(view.next, "");
    assert_eq!(source.call_count(), 1);

    handle.audio_event(AudioEvent::TimeUpdate(8.0))?;
    timeout(WAIT, views.wait_for(|v| v.as_ref().is_some_and(|v| v.current.is_idle()))).await??;

    handle.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_session_withSlowFetchForPreviousTrack_shouldKeepLatestTrack() -> Result<()> {
    common::init_test_logging();
    let source = Arc::new(
        MockCaptionSource::new()
            .serve("a.vtt", "00:00.000 --> 00:05.000\nTrack A\n", 200)
            .serve("b.vtt", "00:00.000 --> 00:05.000\nTrack B\n", 10),
    );
    let handle = spawn_lyrics_session(source.clone());
    let mut views = handle.subscribe();

    handle.select_track(TrackInfo::new("a", "A", 30.0).with_captions("a.vtt"))?;
    handle.select_track(TrackInfo::new("b", "B", 30.0).with_captions("b.vtt"))?;
    handle.time_update(1.0)?;

    timeout(WAIT, views.wait_for(|v| current_text(v) == Some("Track B"))).await??;

    // Let the slow fetch for track A land
    sleep(Duration::from_millis(400)).await;

    assert_eq!(source.call_count(), 2);
    assert_eq!(current_text(&handle.view()), Some("Track B"));

    handle.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_session_switchingToTrackWithoutCaptions_shouldClearView() -> Result<()> {
    let source = Arc::new(MockCaptionSource::new().serve("1.vtt", common::TWO_CUE_CAPTIONS, 0));
    let handle = spawn_lyrics_session(source);
    let mut views = handle.subscribe();

    handle.select_track(TrackInfo::new("1", "Mystic Wanderer", 245.0).with_captions("1.vtt"))?;
    timeout(WAIT, views.wait_for(|v| v.is_some())).await??;

    handle.select_track(TrackInfo::new("2", "The Fool's Journey", 198.0))?;
    timeout(WAIT, views.wait_for(|v| v.is_none())).await??;

    handle.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_session_withFailedFetch_shouldRenderNothing() -> Result<()> {
    let source = Arc::new(MockCaptionSource::new().fail("1.vtt", 0));
    let handle = spawn_lyrics_session(source.clone());

    handle.select_track(TrackInfo::new("1", "Mystic Wanderer", 245.0).with_captions("1.vtt"))?;
    handle.time_update(2.0)?;

    sleep(Duration::from_millis(100)).await;

    assert_eq!(source.call_count(), 1);
    assert!(handle.view().is_none());

    handle.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_session_clearTrack_shouldDropCaptions() -> Result<()> {
    let source = Arc::new(MockCaptionSource::new().serve("1.vtt", common::TWO_CUE_CAPTIONS, 0));
    let handle = spawn_lyrics_session(source);
    let mut views = handle.subscribe();

    handle.select_track(TrackInfo::new("1", "Mystic Wanderer", 245.0).with_captions("1.vtt"))?;
    timeout(WAIT, views.wait_for(|v| v.is_some())).await??;

    handle.clear_track()?;
    timeout(WAIT, views.wait_for(|v| v.is_none())).await??;

    handle.shutdown().await;
    Ok(())
}
