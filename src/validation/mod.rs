/*!
 * Validation module for caption files.
 *
 * Parsing and playback stay lenient: nothing here rejects a cue sequence.
 * The validators only report what a careful author would want to fix.
 *
 * # Architecture
 *
 * - `timecodes`: Validates timing data integrity (ranges, order, overlaps)
 */

pub mod timecodes;

// Re-export main types
pub use timecodes::{TimecodeIssue, TimecodeValidator, TimecodeValidatorConfig};
