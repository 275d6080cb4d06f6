/*!
 * Timecode validation for cue sequences.
 *
 * This module checks that cues are:
 * - Logically consistent (start < end)
 * - Carrying some text
 * - Stored in start-time order
 * - Non-overlapping, which the active-cue resolver assumes
 */

use log::debug;

use crate::caption_processor::Cue;

/// Result of timecode validation for a single cue
#[derive(Debug, Clone)]
pub struct TimecodeCueResult {
    /// Position of the cue in the validated sequence
    pub index: usize,
    /// Whether the cue passed validation
    pub passed: bool,
    /// Issues found
    pub issues: Vec<TimecodeIssue>,
}

impl TimecodeCueResult {
    fn new(index: usize, issues: Vec<TimecodeIssue>) -> Self {
        Self {
            index,
            passed: issues.iter().all(|i| !i.is_failure()),
            issues,
        }
    }

    fn push(&mut self, issue: TimecodeIssue) {
        if issue.is_failure() {
            self.passed = false;
        }
        self.issues.push(issue);
    }
}

/// Types of timecode issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimecodeIssue {
    /// End time is not after start time; the cue can never be active
    InvalidTimeRange {
        start: f64,
        end: f64,
    },
    /// Cue text is blank
    EmptyText,
    /// Starts before the cue stored ahead of it
    OutOfOrder {
        previous_index: usize,
    },
    /// Overlaps with an earlier cue
    OverlapsWithCue {
        other_index: usize,
        overlap_secs: f64,
    },
    /// Gap too large between cues
    LargeGap {
        previous_index: usize,
        gap_secs: f64,
    },
}

impl TimecodeIssue {
    /// Gaps are informational; everything else fails validation
    pub fn is_failure(&self) -> bool {
        !matches!(self, TimecodeIssue::LargeGap { .. })
    }
}

impl std::fmt::Display for TimecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimecodeIssue::InvalidTimeRange { start, end } => {
                write!(f, "Invalid time range: start {:.3}s >= end {:.3}s", start, end)
            }
            TimecodeIssue::EmptyText => write!(f, "Cue has no text"),
            TimecodeIssue::OutOfOrder { previous_index } => {
                write!(f, "Starts before cue {}", previous_index + 1)
            }
            TimecodeIssue::OverlapsWithCue { other_index, overlap_secs } => {
                write!(f, "Overlaps with cue {} by {:.3}s", other_index + 1, overlap_secs)
            }
            TimecodeIssue::LargeGap { previous_index, gap_secs } => {
                write!(f, "Large gap of {:.3}s after cue {}", gap_secs, previous_index + 1)
            }
        }
    }
}

/// Result of validating a whole cue sequence
#[derive(Debug, Clone)]
pub struct TimecodeValidationResult {
    /// Overall pass/fail status
    pub passed: bool,
    /// Results for each cue
    pub cue_results: Vec<TimecodeCueResult>,
    /// Total number of issues
    pub total_issues: usize,
    overlaps: usize,
}

impl TimecodeValidationResult {
    /// Get all cues that failed
    pub fn failed_cues(&self) -> Vec<&TimecodeCueResult> {
        self.cue_results.iter().filter(|r| !r.passed).collect()
    }

    /// Number of overlapping neighbour pairs
    pub fn overlap_count(&self) -> usize {
        self.overlaps
    }
}

/// Configuration for timecode validation
#[derive(Debug, Clone)]
pub struct TimecodeValidatorConfig {
    /// Whether to check for overlaps
    pub check_overlaps: bool,
    /// Gap in seconds before reporting (0 = disable)
    pub max_gap_warning_secs: f64,
}

impl Default for TimecodeValidatorConfig {
    fn default() -> Self {
        Self {
            check_overlaps: true,
            max_gap_warning_secs: 0.0,
        }
    }
}

/// Timecode validator for cue sequences
pub struct TimecodeValidator {
    config: TimecodeValidatorConfig,
}

impl TimecodeValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self {
            config: TimecodeValidatorConfig::default(),
        }
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: TimecodeValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a single cue in isolation
    pub fn validate_cue(&self, index: usize, cue: &Cue) -> TimecodeCueResult {
        let mut issues = Vec::new();

        if cue.is_degenerate() {
            issues.push(TimecodeIssue::InvalidTimeRange {
                start: cue.start_time,
                end: cue.end_time,
            });
        }

        if cue.text.trim().is_empty() {
            issues.push(TimecodeIssue::EmptyText);
        }

        TimecodeCueResult::new(index, issues)
    }

    /// Validate a sequence, in the order given
    pub fn validate(&self, cues: &[Cue]) -> TimecodeValidationResult {
        let mut cue_results: Vec<TimecodeCueResult> = cues
            .iter()
            .enumerate()
            .map(|(i, cue)| self.validate_cue(i, cue))
            .collect();

        for i in 1..cues.len() {
            if cues[i].start_time < cues[i - 1].start_time {
                cue_results[i].push(TimecodeIssue::OutOfOrder { previous_index: i - 1 });
            }
        }

        let mut overlaps = 0;
        if cues.len() > 1 {
            // Neighbours by start time, so unsorted input still gets checked
            let mut sorted: Vec<usize> = (0..cues.len()).collect();
            sorted.sort_by(|&a, &b| cues[a].start_time.total_cmp(&cues[b].start_time));

            for pair in sorted.windows(2) {
                let (current_idx, next_idx) = (pair[0], pair[1]);
                let current = &cues[current_idx];
                let next = &cues[next_idx];

                if self.config.check_overlaps && !current.is_degenerate() && current.end_time > next.start_time {
                    overlaps += 1;
                    cue_results[next_idx].push(TimecodeIssue::OverlapsWithCue {
                        other_index: current_idx,
                        overlap_secs: current.end_time - next.start_time,
                    });
                }

                if self.config.max_gap_warning_secs > 0.0 {
                    let gap_secs = next.start_time - current.end_time;
                    if gap_secs > self.config.max_gap_warning_secs {
                        cue_results[next_idx].push(TimecodeIssue::LargeGap {
                            previous_index: current_idx,
                            gap_secs,
                        });
                    }
                }
            }
        }

        let total_issues: usize = cue_results.iter().map(|r| r.issues.len()).sum();
        let passed = cue_results.iter().all(|r| r.passed);

        debug!(
            "Timecode validation: {} cues, {} issues, {} overlaps",
            cues.len(),
            total_issues,
            overlaps
        );

        TimecodeValidationResult {
            passed,
            cue_results,
            total_issues,
            overlaps,
        }
    }
}

impl Default for TimecodeValidator {
    fn default() -> Self {
        Self::new()
    }
}
