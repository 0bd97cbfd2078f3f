use std::time::Duration;

/// Characters that make up one "word" for WPM purposes.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Floor applied to elapsed time so rates are defined before the first key.
pub const MIN_ELAPSED_SECS: f64 = 0.001;

fn elapsed_minutes(elapsed_secs: f64) -> f64 {
    elapsed_secs.max(MIN_ELAPSED_SECS) / 60.0
}

/// Round a rate, mapping NaN, infinities and negatives to zero.
fn clamp_round(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}

fn wpm(chars: usize, elapsed_secs: f64) -> u32 {
    clamp_round((chars as f64 / CHARS_PER_WORD) / elapsed_minutes(elapsed_secs))
}

/// Every attempted character counts, right or wrong.
pub fn gross_wpm(attempted: usize, elapsed_secs: f64) -> u32 {
    wpm(attempted, elapsed_secs)
}

/// Only correctly typed characters count. This is the headline figure.
pub fn net_wpm(correct: usize, elapsed_secs: f64) -> u32 {
    wpm(correct, elapsed_secs)
}

/// Whole percent of attempted characters that were correct; 100 when
/// nothing has been attempted yet.
pub fn accuracy_percent(correct: usize, attempted: usize) -> u32 {
    if attempted == 0 {
        return 100;
    }
    clamp_round(correct as f64 / attempted as f64 * 100.0)
}

/// Whole seconds left on the countdown, never negative.
pub fn time_left_secs(limit_secs: u64, elapsed: Duration) -> u64 {
    limit_secs.saturating_sub(elapsed.as_secs())
}

/// Point-in-time view of a session for the presentation layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub cursor: usize,
    pub correct_count: usize,
    pub error_count: usize,
    pub gross_wpm: u32,
    pub net_wpm: u32,
    pub accuracy_percent: u32,
    pub time_left_secs: u64,
    pub finished: bool,
}

/// Why a session stopped accepting input
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum FinishReason {
    #[strum(serialize = "Passage complete!")]
    PassageComplete,
    #[strum(serialize = "Time's up!")]
    TimeUp,
}

/// Final result of a completed session, delivered once
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub stats: StatsSnapshot,
    /// Elapsed time the stats were computed with, capped at the time limit.
    pub elapsed_secs: f64,
    pub reason: FinishReason,
}
