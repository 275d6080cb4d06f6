/*!
 * Active-cue resolution.
 *
 * Everything here is a pure function of `(position, cues)`, so callers can
 * recompute on every playback tick. Sequences are expected to be sorted and
 * non-overlapping; if cues do overlap, the first match in sequence order wins.
 */

use crate::caption_processor::Cue;

/// Index of the cue whose half-open interval `[start, end)` contains the
/// position. A position exactly at a cue's end belongs to the next cue.
pub fn active_index(position: f64, cues: &[Cue]) -> Option<usize> {
    cues.iter().position(|cue| cue.contains(position))
}

/// The active cue together with its neighbours in sequence order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueWindow<'a> {
    /// Cue immediately before the active one
    pub previous: Option<&'a Cue>,
    /// Active cue
    pub current: Option<&'a Cue>,
    /// Cue immediately after the active one
    pub next: Option<&'a Cue>,
}

impl<'a> CueWindow<'a> {
    /// Window with nothing active
    pub fn empty() -> Self {
        CueWindow {
            previous: None,
            current: None,
            next: None,
        }
    }

    /// Resolve the window around the active cue at `position`
    pub fn at(position: f64, cues: &'a [Cue]) -> Self {
        match active_index(position, cues) {
            Some(index) => CueWindow {
                previous: index.checked_sub(1).and_then(|i| cues.get(i)),
                current: cues.get(index),
                next: cues.get(index + 1),
            },
            None => Self::empty(),
        }
    }
}
