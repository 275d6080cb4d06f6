/*!
 * Tests for the teleprompter renderer
 */

use lyricsync::caption_processor::Cue;
use lyricsync::cue_index::CueWindow;
use lyricsync::teleprompter::{render, render_window, CurrentLine, IDLE_MARKER};

#[test]
fn test_render_withAllLines_shouldKeepTexts() {
    let view = render(Some("before"), Some("now"), Some("after"));

    assert_eq!(view.previous, "before");
    assert_eq!(view.current, CurrentLine::Lyric("now".to_string()));
    assert_eq!(view.next, "after");
}

#[test]
fn test_render_withNothingActive_shouldShowIdleMarker() {
    let view = render(None, None, None);

    assert_eq!(view.previous, "");
    assert!(view.current.is_idle());
    assert_eq!(view.next, "");
    assert_eq!(view.lines(IDLE_MARKER), ["", "♪", ""]);
}

#[test]
fn test_render_withBlankCue_shouldDifferFromIdle() {
    let blank = render(None, Some(""), None);
    let idle = render(None, None, None);

    assert_ne!(blank, idle);
    assert_eq!(blank.current.text_or(IDLE_MARKER), "");
}

#[test]
fn test_lines_withCustomMarker_shouldUseIt() {
    let view = render(Some("a"), None, None);
    assert_eq!(view.lines("..."), ["a", "...", ""]);
}

#[test]
fn test_renderWindow_shouldMapCueTexts() {
    let cues = vec![Cue::new(0.0, 2.0, "first"), Cue::new(2.0, 4.0, "second")];
    let view = render_window(&CueWindow::at(0.5, &cues));

    assert_eq!(view.previous, "");
    assert_eq!(view.current, CurrentLine::Lyric("first".to_string()));
    assert_eq!(view.next, "second");
    assert_eq!(view.to_string(), "\nfirst\nsecond\n");
}
