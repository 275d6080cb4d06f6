/*!
 * Tests for the caption timestamp codec
 */

use lyricsync::timestamp::{decode, encode, format_duration};
use crate::common::assert_close;

#[test]
fn test_encode_withTypicalValues_shouldZeroPad() {
    assert_eq!(encode(0.0), "00:00:00.000");
    assert_eq!(encode(4.5), "00:00:04.500");
    assert_eq!(encode(83.25), "00:01:23.250");
    assert_eq!(encode(3723.004), "01:02:03.004");
}

#[test]
fn test_decode_withBothFormats_shouldAgree() {
    assert_close(decode("00:01:23.250"), 83.25);
    assert_close(decode("01:23.250"), 83.25);
}

#[test]
fn test_decode_withFullPrecisionFraction_shouldKeepIt() {
    assert!((decode("00:00:01.123456") - 1.123456).abs() < 1e-9);
}

#[test]
fn test_decode_withSurroundingWhitespace_shouldTrim() {
    assert_close(decode("  00:00:02.000  "), 2.0);
}

#[test]
fn test_decode_withGarbage_shouldReturnZero() {
    assert_eq!(decode("not-a-time"), 0.0);
    assert_eq!(decode("also-not"), 0.0);
    assert_eq!(decode("xx:yy:zz"), 0.0);
}

#[test]
fn test_decodeEncode_acrossRange_shouldRoundTripWithinOneMillisecond() {
    let mut seconds = 0.0;
    while seconds < 7300.0 {
        assert_close(decode(&encode(seconds)), seconds);
        seconds += 12.3456789;
    }
}

#[test]
fn test_encode_fromTwoFieldInput_shouldEmitThreeFields() {
    assert_eq!(encode(decode("02:03.5")), "00:02:03.500");
}

#[test]
fn test_formatDuration_withTrackLengths_shouldMatchCatalogFormat() {
    assert_eq!(format_duration(198.0), "3:18");
    assert_eq!(format_duration(0.0), "0:00");
    assert_eq!(format_duration(f64::NAN), "0:00");
}

// Hours and minutes must be whole numbers; a fractional field is unreadable
#[test]
fn test_decode_withFractionalHoursOrMinutes_shouldReturnZero() {
    assert_eq!(decode("1.5:00:02.000"), 0.0);
    assert_eq!(decode("00:1.5:02.000"), 0.0);
    assert_eq!(decode("1.5:02.000"), 0.0);
    assert_close(decode("01:02.5"), 62.5);
}
