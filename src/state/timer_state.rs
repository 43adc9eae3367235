//! Timer state structure and phase

use serde::{Deserialize, Serialize};

use crate::display::DisplayFrame;

/// Duration used at startup and when resetting from a zero duration
pub const DEFAULT_DURATION_MS: u64 = 60_000;
/// Remaining time at which the warning cue fires
pub const WARNING_THRESHOLD_MS: u64 = 60_000;
/// Duration used when starting with nothing configured
pub const MIN_START_MS: u64 = 1_000;

/// Coarse lifecycle phase, derived from the flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Ended,
}

impl TimerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Ended => "ended",
        }
    }
}

/// Countdown state owned by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    /// Full length of the current cycle
    pub configured_ms: u64,
    /// Time left; never negative
    pub remaining_ms: u64,
    /// Absolute time the countdown reaches zero, only while running
    pub deadline_ms: Option<u64>,
    pub running: bool,
    /// Warning cue already fired this cycle
    pub warned: bool,
    /// Terminal "time's up" state reached
    pub ended: bool,
    /// Started at least once since the last reset, preset or completion
    pub cycle_started: bool,
}

impl TimerState {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            configured_ms: duration_ms,
            remaining_ms: duration_ms,
            deadline_ms: None,
            running: false,
            warned: false,
            ended: false,
            cycle_started: false,
        }
    }

    /// A stopped timer with nothing left that has not ended (for example
    /// after adjusting a paused timer down to zero) reports `Idle`; the next
    /// start begins a fresh cycle.
    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Running
        } else if self.ended {
            TimerPhase::Ended
        } else if self.cycle_started && self.remaining_ms > 0 {
            TimerPhase::Paused
        } else {
            TimerPhase::Idle
        }
    }

    /// Whether the warning cue is due at the current remaining time
    pub fn warning_due(&self) -> bool {
        !self.warned
            && self.remaining_ms <= WARNING_THRESHOLD_MS
            && self.configured_ms > WARNING_THRESHOLD_MS
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MS)
    }
}

/// Serializable view of the timer for status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub configured_ms: u64,
    pub remaining_ms: u64,
    pub running: bool,
    pub warned: bool,
    pub ended: bool,
    pub display: DisplayFrame,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_derivation() {
        let mut state = TimerState::default();
        assert_eq!(state.phase(), TimerPhase::Idle);

        state.running = true;
        state.cycle_started = true;
        assert_eq!(state.phase(), TimerPhase::Running);

        state.running = false;
        assert_eq!(state.phase(), TimerPhase::Paused);

        state.ended = true;
        assert_eq!(state.phase(), TimerPhase::Ended);
    }

    #[test]
    fn test_stopped_with_nothing_left_is_idle() {
        let mut state = TimerState::new(60_000);
        state.cycle_started = true;
        state.remaining_ms = 0;
        assert_eq!(state.phase(), TimerPhase::Idle);

        state.remaining_ms = 1;
        assert_eq!(state.phase(), TimerPhase::Paused);
    }

    #[test]
    fn test_warning_due_only_for_long_timers() {
        let mut state = TimerState::new(90_000);
        state.remaining_ms = 60_001;
        assert!(!state.warning_due());
        state.remaining_ms = 60_000;
        assert!(state.warning_due());
        state.warned = true;
        assert!(!state.warning_due());

        let mut short = TimerState::new(60_000);
        short.remaining_ms = 10_000;
        assert!(!short.warning_due());
    }
}
