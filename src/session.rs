//! Session timer and score
//!
//! Idle -> Running -> Ended, with restart going straight back to Running.
//! The countdown is derived from wall-clock time since start rather than
//! accumulated from frames, so a stalled render loop cannot slow it down.

use serde::{Deserialize, Serialize};

/// Durations offered to the player (seconds)
pub const ALLOWED_DURATIONS: [u32; 3] = [30, 45, 60];
pub const DEFAULT_DURATION_SECS: u32 = 45;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionStatus {
    /// Not started: no spawns, no countdown
    #[default]
    Idle,
    /// Spawning and counting down
    Running,
    /// Time ran out or the player stopped
    Ended,
}

/// One timed play-through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub status: SessionStatus,
    /// Never negative; every delta is floored at 0
    pub score: u32,
    /// Fixed when the session starts
    pub duration_secs: u32,
    pub remaining_secs: u32,
    /// Wall-clock start (ms)
    started_at_ms: Option<f64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}

impl Session {
    /// New idle session. Durations outside `ALLOWED_DURATIONS` fall back to the default.
    pub fn new(duration_secs: u32) -> Self {
        let duration_secs = sanitize_duration(duration_secs);
        Self {
            status: SessionStatus::Idle,
            score: 0,
            duration_secs,
            remaining_secs: duration_secs,
            started_at_ms: None,
        }
    }

    /// Begin counting down from the configured duration
    pub fn start(&mut self, wall_ms: f64) {
        self.score = 0;
        self.remaining_secs = self.duration_secs;
        self.started_at_ms = Some(wall_ms);
        self.status = SessionStatus::Running;
        log::info!("Session started ({}s)", self.duration_secs);
    }

    /// Same as `start`, from any state
    pub fn restart(&mut self, wall_ms: f64) {
        let previous = self.status;
        self.start(wall_ms);
        log::info!("Session restarted (was {:?})", previous);
    }

    /// Move to Ended. Returns true only on the transition itself.
    pub fn end(&mut self) -> bool {
        if self.status != SessionStatus::Running {
            return false;
        }
        self.status = SessionStatus::Ended;
        log::info!("Session ended with score {}", self.score);
        true
    }

    /// Recompute the remaining time from the wall clock.
    ///
    /// Called from a coarse external timer (~200ms). Has no effect unless running.
    pub fn sample_countdown(&mut self, wall_ms: f64) -> u32 {
        if self.status != SessionStatus::Running {
            return self.remaining_secs;
        }
        if let Some(started) = self.started_at_ms {
            let elapsed_secs = ((wall_ms - started) / 1000.0).floor().max(0.0);
            let elapsed_secs = elapsed_secs.min(u32::MAX as f64) as u32;
            self.remaining_secs = self.duration_secs.saturating_sub(elapsed_secs);
        }
        self.remaining_secs
    }

    /// Apply a score change, flooring at zero
    pub fn apply_delta(&mut self, delta: i32) -> u32 {
        let next = (self.score as i64 + delta as i64).clamp(0, u32::MAX as i64);
        self.score = next as u32;
        self.score
    }

    /// Clicks count and items spawn only while this holds
    pub fn is_live(&self) -> bool {
        self.status == SessionStatus::Running && self.remaining_secs > 0
    }

    /// Time ran out while still marked as running
    pub fn is_expired(&self) -> bool {
        self.status == SessionStatus::Running && self.remaining_secs == 0
    }
}

/// Clamp a requested duration to one of the offered presets
pub fn sanitize_duration(duration_secs: u32) -> u32 {
    if ALLOWED_DURATIONS.contains(&duration_secs) {
        duration_secs
    } else {
        DEFAULT_DURATION_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lifecycle() {
        let mut session = Session::new(30);
        assert_eq!(session.status, SessionStatus::Idle);
        assert!(!session.is_live());

        session.start(1_000.0);
        assert_eq!(session.status, SessionStatus::Running);
        assert_eq!(session.remaining_secs, 30);
        assert!(session.is_live());

        assert!(session.end());
        assert!(!session.end(), "second end is a no-op");
        assert_eq!(session.status, SessionStatus::Ended);

        session.apply_delta(40);
        session.restart(50_000.0);
        assert_eq!(session.status, SessionStatus::Running);
        assert_eq!(session.score, 0);
        assert_eq!(session.remaining_secs, 30);
    }

    #[test]
    fn test_end_from_idle_is_ignored() {
        let mut session = Session::default();
        assert!(!session.end());
        assert_eq!(session.status, SessionStatus::Idle);
    }

    #[test]
    fn test_countdown_from_wall_clock() {
        let mut session = Session::new(45);
        session.start(10_000.0);
        assert_eq!(session.sample_countdown(10_200.0), 45);
        assert_eq!(session.sample_countdown(10_999.0), 45);
        assert_eq!(session.sample_countdown(11_000.0), 44);
        assert_eq!(session.sample_countdown(54_999.0), 1);
        assert_eq!(session.sample_countdown(55_000.0), 0);
        assert!(session.is_expired());
        // Never negative
        assert_eq!(session.sample_countdown(500_000.0), 0);
        // Clock going backwards does not add time
        assert_eq!(session.sample_countdown(0.0), 45);
    }

    #[test]
    fn test_countdown_frozen_when_not_running() {
        let mut session = Session::new(30);
        assert_eq!(session.sample_countdown(99_000.0), 30);
        session.start(0.0);
        session.sample_countdown(5_000.0);
        session.end();
        assert_eq!(session.sample_countdown(20_000.0), 25);
    }

    #[test]
    fn test_score_floor_each_step() {
        let mut session = Session::default();
        session.start(0.0);
        session.apply_delta(10);
        session.apply_delta(-15);
        assert_eq!(session.score, 0);
        session.apply_delta(-15);
        assert_eq!(session.score, 0);
        session.apply_delta(10);
        assert_eq!(session.score, 10);
    }

    #[test]
    fn test_sanitize_duration() {
        assert_eq!(sanitize_duration(60), 60);
        assert_eq!(sanitize_duration(31), DEFAULT_DURATION_SECS);
        assert_eq!(Session::new(0).duration_secs, DEFAULT_DURATION_SECS);
    }

    proptest! {
        #[test]
        fn score_never_underflows(deltas in proptest::collection::vec(prop_oneof![Just(10), Just(-15)], 0..200)) {
            let mut session = Session::default();
            session.start(0.0);
            let mut expected: i64 = 0;
            for d in deltas {
                expected = (expected + d as i64).max(0);
                session.apply_delta(d);
                prop_assert_eq!(session.score as i64, expected);
            }
        }
    }
}
