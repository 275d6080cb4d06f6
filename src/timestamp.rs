use log::debug;

// @module: Caption timestamp codec

/// Decode a caption timestamp token into seconds.
///
/// Accepts `HH:MM:SS.fff` and `MM:SS.fff`. Anything that cannot be read
/// decodes to `0.0`; partial or corrupt caption files still render whatever
/// can be salvaged. Trailing cue settings (`00:02.000 align:start`) are
/// ignored.
pub fn decode(token: &str) -> f64 {
    let token = token.split_whitespace().next().unwrap_or("");
    let parts: Vec<&str> = token.split(':').collect();

    let seconds = match parts.as_slice() {
        [hours, minutes, seconds] => sum_components(Some(hours), minutes, seconds),
        [minutes, seconds] => sum_components(None, minutes, seconds),
        _ => None,
    };

    match seconds {
        Some(value) if value.is_finite() => value,
        _ => {
            debug!("Unreadable timestamp '{}', using 0", token);
            0.0
        }
    }
}

// @returns: Total seconds, or None if any field fails to parse
fn sum_components(hours: Option<&str>, minutes: &str, seconds: &str) -> Option<f64> {
    let hours: i64 = match hours {
        Some(h) => h.trim().parse().ok()?,
        None => 0,
    };
    let minutes: i64 = minutes.trim().parse().ok()?;
    let seconds: f64 = seconds.trim().parse().ok()?;

    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

/// Encode seconds as a canonical `HH:MM:SS.mmm` caption timestamp.
///
/// The value is rounded to the nearest millisecond before it is split into
/// fields, so `59.9996` becomes `00:01:00.000` rather than `00:00:60.000`.
/// Negative and non-finite input encodes as zero.
pub fn encode(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

/// Format a playback duration as `M:SS` for progress display
pub fn format_duration(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    format!("{}:{:02}", whole / 60, whole % 60)
}
