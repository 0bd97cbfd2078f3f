use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::normalize::chars_match;
use crate::passage::Passage;
use crate::stats::{self, FinishReason, StatsSnapshot, Summary};

pub const DEFAULT_TIME_LIMIT_SECS: u64 = 60;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;

/// Per-position classification, parallel to the passage
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CharResult {
    #[default]
    Unattempted,
    Correct,
    Incorrect,
}

/// What a wrong key does to the cursor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AdvanceMode {
    /// Every key consumes the target character, right or wrong.
    #[default]
    Advance,
    /// A wrong key is counted but the cursor waits for the right one.
    Strict,
}

/// A discrete key event as seen by the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    /// Anything non-printable: arrows, modifiers, function keys.
    Other,
}

impl KeyInput {
    /// Classify a key name the way a host reports it: a single character is
    /// printable, `"Backspace"` deletes, everything else is ignored.
    pub fn from_key_name(key: &str) -> Self {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => KeyInput::Char(c),
            _ if key == "Backspace" => KeyInput::Backspace,
            _ => KeyInput::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub passage_text: String,
    pub time_limit_secs: u64,
    pub tick_interval_ms: u64,
    pub mode: AdvanceMode,
}

impl SessionConfig {
    pub fn new(passage_text: impl Into<String>) -> Self {
        Self {
            passage_text: passage_text.into(),
            ..Self::default()
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_secs)
    }

    /// Replace zero limits with the defaults.
    fn sanitized(mut self) -> Self {
        if self.time_limit_secs == 0 {
            self.time_limit_secs = DEFAULT_TIME_LIMIT_SECS;
        }
        if self.tick_interval_ms == 0 {
            self.tick_interval_ms = DEFAULT_TICK_INTERVAL_MS;
        }
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            passage_text: crate::passage::DEFAULT_PASSAGE.to_string(),
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            mode: AdvanceMode::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub cursor: usize,
    pub correct_count: usize,
    pub error_count: usize,
    pub started_at: Option<Instant>,
    pub finished: bool,
    /// Elapsed time frozen at finish, capped at the limit.
    pub final_elapsed: Option<Duration>,
}

/// One practice run over a fixed passage.
///
/// All mutation goes through `submit_key`/`backspace`/`tick`/`finish`/`reset`;
/// invalid calls are no-ops rather than errors. Once finished, nothing but
/// `reset` changes observable state.
#[derive(Debug)]
pub struct TypingSession<C: Clock = SystemClock> {
    config: SessionConfig,
    passage: Passage,
    results: Vec<CharResult>,
    state: SessionState,
    summary: Option<Summary>,
    summary_taken: bool,
    clock: C,
}

impl TypingSession<SystemClock> {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> TypingSession<C> {
    pub fn with_clock(config: SessionConfig, clock: C) -> Self {
        let mut config = config.sanitized();
        let passage = Passage::new(config.passage_text.clone());
        config.passage_text = passage.text().to_string();
        let results = vec![CharResult::Unattempted; passage.len()];
        Self {
            config,
            passage,
            results,
            state: SessionState::default(),
            summary: None,
            summary_taken: false,
            clock,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn passage(&self) -> &Passage {
        &self.passage
    }

    pub fn results(&self) -> &[CharResult] {
        &self.results
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Start the clock. Idempotent; the first key calls this on its own.
    pub fn start(&mut self) {
        let now = self.clock.now();
        self.start_at(now);
    }

    fn start_at(&mut self, now: Instant) {
        if self.state.finished || self.state.started_at.is_some() {
            return;
        }
        self.state.started_at = Some(now);
        debug!(passage_len = self.passage.len(), "session started");
    }

    /// Dispatch a host key event.
    pub fn handle_key(&mut self, key: KeyInput) {
        match key {
            KeyInput::Char(c) => self.submit_char(c),
            KeyInput::Backspace => self.backspace(),
            KeyInput::Other => {}
        }
    }

    /// Submit a key by name: one character is scored, `"Backspace"` deletes,
    /// anything else is ignored.
    pub fn submit_key(&mut self, key: &str) {
        self.handle_key(KeyInput::from_key_name(key));
    }

    /// Score one typed character against the character under the cursor.
    pub fn submit_char(&mut self, typed: char) {
        if self.state.finished || self.state.cursor >= self.passage.len() {
            return;
        }

        let now = self.clock.now();
        if self.expired_at(now) {
            // a key that arrives after the deadline is never scored
            self.finish_at(now);
            return;
        }
        self.start_at(now);

        let idx = self.state.cursor;
        let Some(expected) = self.passage.get(idx) else {
            return;
        };
        let hit = chars_match(expected, typed);

        match (self.config.mode, hit) {
            (_, true) => {
                self.results[idx] = CharResult::Correct;
                self.state.correct_count += 1;
                self.state.cursor += 1;
            }
            (AdvanceMode::Advance, false) => {
                self.results[idx] = CharResult::Incorrect;
                self.state.error_count += 1;
                self.state.cursor += 1;
            }
            (AdvanceMode::Strict, false) => {
                self.results[idx] = CharResult::Incorrect;
                self.state.error_count += 1;
            }
        }

        if self.state.cursor == self.passage.len() {
            self.finish_at(now);
        }
    }

    /// Undo the most recent position.
    pub fn backspace(&mut self) {
        if self.state.finished {
            return;
        }

        let now = self.clock.now();
        if self.expired_at(now) {
            // deletes after the deadline must not change the final score
            self.finish_at(now);
            return;
        }

        if self.config.mode == AdvanceMode::Strict {
            // a pending wrong key's mark is cleared; the error itself stays counted
            if let Some(r) = self.results.get_mut(self.state.cursor) {
                *r = CharResult::Unattempted;
            }
        }

        if self.state.cursor == 0 {
            return;
        }

        self.state.cursor -= 1;
        let idx = self.state.cursor;
        match self.results[idx] {
            CharResult::Correct => {
                self.state.correct_count = self.state.correct_count.saturating_sub(1);
            }
            CharResult::Incorrect if self.config.mode == AdvanceMode::Advance => {
                self.state.error_count = self.state.error_count.saturating_sub(1);
            }
            _ => {}
        }
        self.results[idx] = CharResult::Unattempted;
    }

    fn expired_at(&self, now: Instant) -> bool {
        self.state
            .started_at
            .is_some_and(|s| now.saturating_duration_since(s) >= self.config.time_limit())
    }

    /// Timer callback. Only finishes the session once the countdown hits
    /// zero; scoring never happens here.
    pub fn tick(&mut self, now: Instant) {
        if self.state.finished {
            return;
        }
        let Some(started_at) = self.state.started_at else {
            return;
        };
        let left = stats::time_left_secs(
            self.config.time_limit_secs,
            now.saturating_duration_since(started_at),
        );
        if left == 0 {
            self.finish_at(now);
        }
    }

    /// End the session now. Idempotent.
    pub fn finish(&mut self) {
        let now = self.clock.now();
        self.finish_at(now);
    }

    fn finish_at(&mut self, now: Instant) {
        if self.state.finished {
            return;
        }
        let limit = self.config.time_limit();
        let measured = self
            .state
            .started_at
            .map(|s| now.saturating_duration_since(s))
            .unwrap_or(Duration::ZERO);

        self.state.finished = true;
        self.state.final_elapsed = Some(measured.min(limit));

        let reason = if self.state.cursor == self.passage.len() {
            FinishReason::PassageComplete
        } else {
            FinishReason::TimeUp
        };
        let summary = Summary {
            stats: self.snapshot(),
            elapsed_secs: self.elapsed_seconds(),
            reason,
        };
        info!(
            net_wpm = summary.stats.net_wpm,
            gross_wpm = summary.stats.gross_wpm,
            accuracy = summary.stats.accuracy_percent,
            errors = summary.stats.error_count,
            elapsed_secs = summary.elapsed_secs,
            %reason,
            "session finished"
        );
        self.summary = Some(summary);
    }

    /// Back to a fresh, unstarted session over the same passage.
    pub fn reset(&mut self) {
        self.state = SessionState::default();
        self.results = vec![CharResult::Unattempted; self.passage.len()];
        self.summary = None;
        self.summary_taken = false;
        debug!("session reset");
    }

    /// Reset and swap in a new passage.
    pub fn reset_with_passage(&mut self, text: impl Into<String>) {
        self.passage = Passage::new(text);
        self.config.passage_text = self.passage.text().to_string();
        self.reset();
    }

    pub fn has_started(&self) -> bool {
        self.state.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    /// Started and still accepting input; the host ticks only while this holds.
    pub fn is_running(&self) -> bool {
        self.has_started() && !self.is_finished()
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn correct_count(&self) -> usize {
        self.state.correct_count
    }

    pub fn error_count(&self) -> usize {
        self.state.error_count
    }

    /// Keystrokes that were scored. Equal to the cursor in advance mode.
    pub fn attempted(&self) -> usize {
        self.state.correct_count + self.state.error_count
    }

    pub fn elapsed(&self) -> Duration {
        if let Some(frozen) = self.state.final_elapsed {
            return frozen;
        }
        self.state
            .started_at
            .map(|s| self.clock.now().saturating_duration_since(s))
            .unwrap_or(Duration::ZERO)
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Seconds the WPM rates divide by. A session that finished with no
    /// measurable time is rated over a full minute instead of the epsilon.
    fn rate_seconds(&self) -> f64 {
        match self.state.final_elapsed {
            Some(frozen) if frozen.is_zero() => 60.0,
            _ => self.elapsed_seconds(),
        }
    }

    pub fn gross_wpm(&self) -> u32 {
        stats::gross_wpm(self.attempted(), self.rate_seconds())
    }

    pub fn net_wpm(&self) -> u32 {
        stats::net_wpm(self.state.correct_count, self.rate_seconds())
    }

    pub fn accuracy_percent(&self) -> u32 {
        stats::accuracy_percent(self.state.correct_count, self.attempted())
    }

    pub fn time_left_secs(&self) -> u64 {
        stats::time_left_secs(self.config.time_limit_secs, self.elapsed())
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cursor: self.state.cursor,
            correct_count: self.state.correct_count,
            error_count: self.state.error_count,
            gross_wpm: self.gross_wpm(),
            net_wpm: self.net_wpm(),
            accuracy_percent: self.accuracy_percent(),
            time_left_secs: self.time_left_secs(),
            finished: self.state.finished,
        }
    }

    /// Final summary, if the session has finished.
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Completion notification: yields the summary exactly once per
    /// finished session, no matter how many paths called `finish`.
    pub fn take_summary(&mut self) -> Option<Summary> {
        if self.summary_taken {
            return None;
        }
        let summary = self.summary?;
        self.summary_taken = true;
        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use assert_matches::assert_matches;

    fn session(text: &str) -> (TypingSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let s = TypingSession::with_clock(SessionConfig::new(text), clock.clone());
        (s, clock)
    }

    fn strict_session(text: &str) -> (TypingSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let config = SessionConfig {
            mode: AdvanceMode::Strict,
            ..SessionConfig::new(text)
        };
        (TypingSession::with_clock(config, clock.clone()), clock)
    }

    fn assert_cursor_invariant<C: Clock>(s: &TypingSession<C>) {
        assert_eq!(s.cursor(), s.correct_count() + s.error_count());
        assert!(s.cursor() <= s.passage().len());
        let attempted = s
            .results()
            .iter()
            .filter(|r| **r != CharResult::Unattempted)
            .count();
        assert_eq!(s.cursor(), attempted);
    }

    #[test]
    fn test_new_session_defaults() {
        let (s, _) = session("hello");

        assert_eq!(s.cursor(), 0);
        assert_eq!(s.error_count(), 0);
        assert_eq!(s.accuracy_percent(), 100);
        assert_eq!(s.net_wpm(), 0);
        assert_eq!(s.gross_wpm(), 0);
        assert_eq!(s.time_left_secs(), 60);
        assert!(!s.has_started());
        assert!(!s.is_finished());
        assert!(s.results().iter().all(|r| *r == CharResult::Unattempted));
    }

    #[test]
    fn test_zero_limits_fall_back_to_defaults() {
        let config = SessionConfig {
            time_limit_secs: 0,
            tick_interval_ms: 0,
            ..SessionConfig::new("abc")
        };
        let s = TypingSession::with_clock(config, ManualClock::new());
        assert_eq!(s.config().time_limit_secs, DEFAULT_TIME_LIMIT_SECS);
        assert_eq!(s.config().tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
    }

    #[test]
    fn test_start_is_idempotent() {
        let (mut s, clock) = session("abc");
        s.start();
        let first = s.state().started_at;
        clock.advance_millis(500);
        s.start();
        assert_eq!(s.state().started_at, first);
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn test_first_key_starts_clock() {
        let (mut s, _) = session("abc");
        s.submit_key("a");
        assert!(s.has_started());
        assert!(s.is_running());
    }

    #[test]
    fn test_mixed_keys_score_example() {
        let (mut s, _) = session("abc");
        s.submit_key("a");
        s.submit_key("x");
        s.submit_key("c");

        assert_eq!(s.cursor(), 3);
        assert_eq!(s.correct_count(), 2);
        assert_eq!(s.error_count(), 1);
        assert_eq!(s.accuracy_percent(), 67);
        assert_eq!(
            s.results(),
            &[
                CharResult::Correct,
                CharResult::Incorrect,
                CharResult::Correct
            ]
        );
        assert!(s.is_finished());
    }

    #[test]
    fn test_wrong_key_still_advances() {
        let (mut s, _) = session("abc");
        s.submit_key("z");
        assert_eq!(s.cursor(), 1);
        assert_eq!(s.results()[0], CharResult::Incorrect);
        assert_cursor_invariant(&s);
    }

    #[test]
    fn test_case_insensitive_and_normalized() {
        let (mut s, _) = session("It's");
        for key in ["i", "T", "\u{2019}", "S"] {
            s.submit_key(key);
        }
        assert_eq!(s.correct_count(), 4);
        assert_eq!(s.error_count(), 0);
    }

    #[test]
    fn test_non_printable_keys_ignored() {
        let (mut s, _) = session("abc");
        s.submit_key("Shift");
        s.submit_key("ArrowLeft");
        s.submit_key("");
        s.handle_key(KeyInput::Other);

        assert_eq!(s.cursor(), 0);
        assert!(!s.has_started());
    }

    #[test]
    fn test_key_name_classification() {
        assert_eq!(KeyInput::from_key_name("a"), KeyInput::Char('a'));
        assert_eq!(KeyInput::from_key_name(" "), KeyInput::Char(' '));
        assert_eq!(KeyInput::from_key_name("\u{2019}"), KeyInput::Char('\u{2019}'));
        assert_eq!(KeyInput::from_key_name("Backspace"), KeyInput::Backspace);
        assert_eq!(KeyInput::from_key_name("Enter"), KeyInput::Other);
        assert_eq!(KeyInput::from_key_name(""), KeyInput::Other);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let (mut s, _) = session("abc");
        s.backspace();
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.error_count(), 0);
    }

    #[test]
    fn test_backspace_undoes_incorrect() {
        let (mut s, _) = session("abc");
        s.submit_key("a");
        s.submit_key("x");
        s.submit_key("Backspace");

        assert_eq!(s.cursor(), 1);
        assert_eq!(s.correct_count(), 1);
        assert_eq!(s.error_count(), 0);
        assert_eq!(s.results()[1], CharResult::Unattempted);
        assert_cursor_invariant(&s);
    }

    #[test]
    fn test_backspace_then_same_key_is_exact_undo() {
        let (mut s, _) = session("hello world");
        for key in ["h", "x", "l", "l"] {
            s.submit_key(key);
        }
        let before = (s.correct_count(), s.error_count());

        s.backspace();
        s.submit_key("l");
        assert_eq!((s.correct_count(), s.error_count()), before);

        s.backspace();
        s.backspace();
        s.backspace();
        s.submit_key("x");
        s.submit_key("l");
        s.submit_key("l");
        assert_eq!((s.correct_count(), s.error_count()), before);
        assert_cursor_invariant(&s);
    }

    #[test]
    fn test_invariant_holds_through_mixed_sequence() {
        let (mut s, clock) = session("the quick brown fox");
        let keys = [
            "t", "h", "x", "Backspace", "e", " ", "q", "Backspace", "Backspace", "Backspace",
            "e", " ", "q", "u", "Tab", "i", "c", "k",
        ];
        for key in keys {
            clock.advance_millis(120);
            s.submit_key(key);
            assert_cursor_invariant(&s);
        }
    }

    #[test]
    fn test_full_correct_passage_before_limit() {
        let (mut s, clock) = session("hello world");
        for c in "hello world".chars() {
            clock.advance_millis(150);
            s.submit_char(c);
        }

        assert!(s.is_finished());
        assert_eq!(s.accuracy_percent(), 100);
        assert_eq!(s.net_wpm(), s.gross_wpm());
        assert!(s.net_wpm() > 0);
        let summary = s.take_summary().unwrap();
        assert_matches!(summary.reason, FinishReason::PassageComplete);
    }

    #[test]
    fn test_key_after_deadline_is_not_scored() {
        let (mut s, clock) = session("abcdef");
        s.submit_key("a");
        clock.advance_millis(60_000);
        s.submit_key("b");

        assert!(s.is_finished());
        assert_eq!(s.cursor(), 1);
        assert_eq!(s.correct_count(), 1);
        assert_matches!(s.summary().map(|x| x.reason), Some(FinishReason::TimeUp));
    }

    #[test]
    fn test_backspace_after_deadline_is_ignored() {
        let (mut s, clock) = session("abcdef");
        s.submit_key("a");
        s.submit_key("b");
        clock.advance_millis(60_100);
        s.backspace();

        assert!(s.is_finished());
        assert_eq!(s.cursor(), 2);
        assert_eq!(s.correct_count(), 2);

        s.tick(clock.now());
        let summary = s.take_summary().unwrap();
        assert_eq!(summary.stats.cursor, 2);
        assert_eq!(summary.stats.correct_count, 2);
        assert_matches!(summary.reason, FinishReason::TimeUp);
    }

    #[test]
    fn test_instant_finish_rates_over_a_minute() {
        let (mut s, _) = session("a");
        s.submit_key("a");

        let summary = s.take_summary().unwrap();
        assert_eq!(summary.elapsed_secs, 0.0);
        assert_eq!(summary.stats.gross_wpm, 0);
        assert_eq!(summary.stats.net_wpm, 0);

        let (mut s, _) = session("hello");
        for key in ["h", "e", "l", "l", "o"] {
            s.submit_key(key);
        }
        assert_eq!(s.take_summary().unwrap().stats.net_wpm, 1);
    }

    #[test]
    fn test_key_just_before_deadline_is_scored() {
        let (mut s, clock) = session("abcdef");
        s.submit_key("a");
        clock.advance_millis(59_999);
        s.submit_key("b");

        assert!(!s.is_finished());
        assert_eq!(s.correct_count(), 2);
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let (mut s, clock) = session("abc");
        s.tick(clock.at_millis(120_000));
        assert!(!s.is_finished());
        assert_eq!(s.time_left_secs(), 60);
    }

    #[test]
    fn test_tick_finishes_at_zero() {
        let (mut s, clock) = session("abcdef");
        s.submit_key("a");

        s.tick(clock.at_millis(59_800));
        assert!(!s.is_finished());

        s.tick(clock.at_millis(60_000));
        assert!(s.is_finished());
    }

    #[test]
    fn test_late_tick_caps_elapsed_at_limit() {
        let (mut s, clock) = session(&"a".repeat(40));
        for key in ["a", "a", "x", "a", "a", "a", "x", "a", "a", "a"] {
            s.submit_key(key);
        }
        assert_eq!(s.cursor(), 10);
        assert_eq!(s.correct_count(), 8);

        clock.advance_millis(60_400);
        s.tick(clock.now());

        let summary = s.take_summary().unwrap();
        assert!(summary.stats.finished);
        assert_eq!(summary.elapsed_secs, 60.0);
        assert_eq!(summary.stats.net_wpm, 2);
        assert_eq!(summary.stats.gross_wpm, 2);
        assert_eq!(summary.stats.accuracy_percent, 80);
        assert_eq!(summary.stats.time_left_secs, 0);
        assert_matches!(summary.reason, FinishReason::TimeUp);
    }

    #[test]
    fn test_mutations_after_finish_change_nothing() {
        let (mut s, clock) = session("abc");
        s.submit_key("a");
        s.submit_key("x");
        s.submit_key("c");
        assert!(s.is_finished());

        let snapshot = s.snapshot();
        let results = s.results().to_vec();

        clock.advance_millis(5_000);
        s.submit_key("a");
        s.backspace();
        s.tick(clock.now());
        s.finish();
        s.start();

        assert_eq!(s.snapshot(), snapshot);
        assert_eq!(s.results(), results.as_slice());
    }

    #[test]
    fn test_summary_delivered_once() {
        let (mut s, clock) = session("abcdef");
        s.submit_key("a");
        clock.advance_millis(61_000);

        // both expiry paths race to finish
        s.tick(clock.now());
        s.submit_key("b");
        s.finish();

        assert!(s.take_summary().is_some());
        assert!(s.take_summary().is_none());
        assert!(s.summary().is_some());
    }

    #[test]
    fn test_finish_without_start() {
        let (mut s, _) = session("abc");
        s.finish();
        let summary = s.take_summary().unwrap();
        assert_eq!(summary.stats.net_wpm, 0);
        assert_eq!(summary.stats.accuracy_percent, 100);
        assert_eq!(summary.elapsed_secs, 0.0);
    }

    #[test]
    fn test_stats_freeze_after_finish() {
        let (mut s, clock) = session("ab");
        clock.advance_millis(100);
        s.submit_key("a");
        clock.advance_millis(6_000);
        s.submit_key("b");
        let wpm = s.net_wpm();

        clock.advance_millis(30_000);
        assert_eq!(s.net_wpm(), wpm);
        assert_eq!(s.elapsed_seconds(), 6.0);
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let (mut s, clock) = session("abc");
        s.submit_key("a");
        s.submit_key("x");
        clock.advance_millis(2_000);
        s.submit_key("c");
        assert!(s.take_summary().is_some());

        s.reset();

        let snap = s.snapshot();
        assert_eq!(snap.cursor, 0);
        assert_eq!(snap.error_count, 0);
        assert_eq!(snap.accuracy_percent, 100);
        assert_eq!(snap.net_wpm, 0);
        assert_eq!(snap.gross_wpm, 0);
        assert_eq!(snap.time_left_secs, 60);
        assert!(!snap.finished);
        assert!(!s.has_started());
        assert!(s.summary().is_none());
        assert_eq!(s.results().len(), 3);
        assert!(s.results().iter().all(|r| *r == CharResult::Unattempted));

        // a fresh run delivers its own summary
        for key in ["a", "b", "c"] {
            s.submit_key(key);
        }
        assert!(s.take_summary().is_some());
    }

    #[test]
    fn test_reset_with_new_passage() {
        let (mut s, _) = session("abc");
        s.submit_key("a");
        s.reset_with_passage("hello");
        assert_eq!(s.passage().text(), "hello");
        assert_eq!(s.results().len(), 5);
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn test_strict_wrong_key_does_not_advance() {
        let (mut s, _) = strict_session("ab");
        s.submit_key("x");

        assert_eq!(s.cursor(), 0);
        assert_eq!(s.error_count(), 1);
        assert_eq!(s.results()[0], CharResult::Incorrect);

        s.submit_key("a");
        assert_eq!(s.cursor(), 1);
        assert_eq!(s.results()[0], CharResult::Correct);
        assert_eq!(s.accuracy_percent(), 50);

        s.submit_key("b");
        assert!(s.is_finished());
        // three keystrokes rated over a minute: 0.6 words
        assert_eq!(s.gross_wpm(), 1);
        assert_eq!(s.net_wpm(), 0);
    }

    #[test]
    fn test_strict_backspace_keeps_error_count() {
        let (mut s, _) = strict_session("abc");
        s.submit_key("a");
        s.submit_key("x");
        s.backspace();

        assert_eq!(s.cursor(), 0);
        assert_eq!(s.correct_count(), 0);
        assert_eq!(s.error_count(), 1);
        assert!(s.results().iter().all(|r| *r == CharResult::Unattempted));
    }

    #[test]
    fn test_strict_backspace_clears_pending_mark_at_start() {
        let (mut s, _) = strict_session("abc");
        s.submit_key("x");
        assert_eq!(s.results()[0], CharResult::Incorrect);

        s.backspace();

        assert_eq!(s.cursor(), 0);
        assert_eq!(s.error_count(), 1);
        assert_eq!(s.results()[0], CharResult::Unattempted);
    }

    #[test]
    fn test_advance_mode_display() {
        assert_eq!(AdvanceMode::Advance.to_string(), "advance");
        assert_eq!(AdvanceMode::Strict.to_string(), "strict");
    }
}
