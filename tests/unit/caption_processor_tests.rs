/*!
 * Tests for caption parsing and serialization
 */

use std::collections::HashSet;
use std::path::PathBuf;
use lyricsync::caption_processor::{
    parse_captions, sort_cues, write_captions, CaptionCollection, Cue, CueField, CAPTION_HEADER,
};
use crate::common::{self, assert_close};

#[test]
fn test_parse_withTwoCues_shouldReadTimesAndText() {
    let cues = parse_captions(common::TWO_CUE_CAPTIONS);

    assert_eq!(cues.len(), 2);
    assert_close(cues[0].start_time, 0.0);
    assert_close(cues[0].end_time, 4.0);
    assert_eq!(cues[0].text, "First line");
    assert_close(cues[1].start_time, 4.0);
    assert_close(cues[1].end_time, 8.0);
    assert_eq!(cues[1].text, "Second line");
}

#[test]
fn test_parse_withMultiLineText_shouldJoinWithSingleSpace() {
    let content = "WEBVTT\n\n00:01.000 --> 00:03.000\n  Hello  \nthere\nfriend\n\n";
    let cues = parse_captions(content);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "Hello there friend");
}

#[test]
fn test_parse_withMalformedTimestamps_shouldDegradeToZero() {
    let cues = parse_captions("not-a-time --> also-not\nHello\n\n");

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].start_time, 0.0);
    assert_eq!(cues[0].end_time, 0.0);
    assert_eq!(cues[0].text, "Hello");
    assert!(cues[0].is_degenerate());
}

// Existing behavior: a timestamp line with no text produces no cue
#[test]
fn test_parse_withTimestampLineWithoutText_shouldDropIt() {
    let content = "WEBVTT\n\n00:00.000 --> 00:02.000\n\n00:02.000 --> 00:04.000\nKept\n";
    let cues = parse_captions(content);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "Kept");
}

#[test]
fn test_parse_withIdentifiersAndHeader_shouldIgnoreThem() {
    let content = "WEBVTT - lyrics\n\nintro\n00:00:01.000 --> 00:00:02.000\nLine\n\nstray text\n";
    let cues = parse_captions(content);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "Line");
}

#[test]
fn test_parse_withCrlfAndCueSettings_shouldParse() {
    let content = "WEBVTT\r\n\r\n00:01.000 --> 00:02.500 align:start\r\nWindows line\r\n\r\n";
    let cues = parse_captions(content);

    assert_eq!(cues.len(), 1);
    assert_close(cues[0].end_time, 2.5);
    assert_eq!(cues[0].text, "Windows line");
}

#[test]
fn test_parse_withUnsortedInput_shouldKeepInputOrder() {
    let content = "00:10.000 --> 00:12.000\nLater\n\n00:01.000 --> 00:02.000\nEarlier\n";
    let cues = parse_captions(content);

    assert_eq!(cues[0].text, "Later");
    assert_eq!(cues[1].text, "Earlier");
}

#[test]
fn test_parse_withEmptyInput_shouldReturnNoCues() {
    assert!(parse_captions("").is_empty());
    assert!(parse_captions("WEBVTT\n\n").is_empty());
}

#[test]
fn test_parse_shouldAssignDistinctIds() {
    let cues = parse_captions(common::TWO_CUE_CAPTIONS);
    let again = parse_captions(common::TWO_CUE_CAPTIONS);

    let ids: HashSet<_> = cues.iter().chain(again.iter()).map(|c| c.id).collect();
    assert_eq!(ids.len(), 4);
}

#[test]
fn test_writeCaptions_shouldSortAndUseCanonicalFormat() {
    let cues = vec![Cue::new(5.0, 7.5, "Second"), Cue::new(0.0, 2.0, "First")];
    let output = write_captions(CAPTION_HEADER, &cues);

    assert_eq!(
        output,
        "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nFirst\n\n00:00:05.000 --> 00:00:07.500\nSecond\n\n"
    );
}

#[test]
fn test_parseAfterWrite_shouldPreserveTriples() {
    let original = vec![
        Cue::new(12.345, 15.0, "Gamma"),
        Cue::new(0.5, 3.25, "Alpha"),
        Cue::new(3.25, 9.999, "Beta"),
    ];

    let reparsed = parse_captions(&write_captions(CAPTION_HEADER, &original));

    let mut expected = original.clone();
    sort_cues(&mut expected);
    assert_eq!(reparsed.len(), expected.len());
    for (got, want) in reparsed.iter().zip(expected.iter()) {
        assert_close(got.start_time, want.start_time);
        assert_close(got.end_time, want.end_time);
        assert_eq!(got.text, want.text);
    }
}

#[test]
fn test_sortCues_withEqualStarts_shouldKeepRelativeOrder() {
    let mut cues = vec![
        Cue::new(3.0, 4.0, "c"),
        Cue::new(1.0, 2.0, "a"),
        Cue::new(1.0, 3.0, "b"),
    ];
    sort_cues(&mut cues);

    let texts: Vec<&str> = cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
}

#[test]
fn test_cue_contains_shouldBeHalfOpen() {
    let cue = Cue::new(1.0, 2.0, "x");
    assert!(cue.contains(1.0));
    assert!(cue.contains(1.999));
    assert!(!cue.contains(2.0));
    assert!(!cue.contains(0.999));
}

#[test]
fn test_cueField_isTimestamp() {
    assert!(CueField::Start.is_timestamp());
    assert!(CueField::End.is_timestamp());
    assert!(!CueField::Text.is_timestamp());
}

#[test]
fn test_captionCollection_fromText_shouldSortCues() {
    let content = "00:10.000 --> 00:12.000\nLater\n\n00:01.000 --> 00:02.000\nEarlier\n";
    let collection = CaptionCollection::from_text(PathBuf::from("song.vtt"), content);

    assert_eq!(collection.cues[0].text, "Earlier");
    assert!(collection.to_string().contains("Cues: 2"));
}
