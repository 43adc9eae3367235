//! Countdown engine: the timer state machine and its side effects

use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

use crate::{
    display::{frame, DisplayFrame, DisplaySink, RingGeometry},
    services::SoundCues,
    tasks::ticker::{LoopId, TickHandle, Ticker},
    utils::Clock,
};
use super::timer_state::{
    TimerSnapshot, TimerState, DEFAULT_DURATION_MS, MIN_START_MS,
};

/// Period of the tick loop while running
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Drives a single countdown.
///
/// Remaining time is always recomputed from an absolute deadline, so late or
/// irregular ticks never accumulate drift. At most one tick loop is alive at
/// any time: every transition that stops the countdown cancels it and
/// `start` cancels before scheduling a new one.
pub struct TimerEngine {
    state: TimerState,
    clock: Arc<dyn Clock>,
    ticker: Box<dyn Ticker>,
    tick_loop: Option<TickHandle>,
    cues: SoundCues,
    display: Box<dyn DisplaySink>,
    ring: RingGeometry,
    last_frame: DisplayFrame,
}

impl TimerEngine {
    pub fn new(
        duration_ms: u64,
        clock: Arc<dyn Clock>,
        ticker: Box<dyn Ticker>,
        cues: SoundCues,
        display: Box<dyn DisplaySink>,
    ) -> Self {
        let mut engine = Self {
            state: TimerState::new(duration_ms),
            clock,
            ticker,
            tick_loop: None,
            cues,
            display,
            ring: RingGeometry::default(),
            last_frame: DisplayFrame::default(),
        };
        engine.render(None);
        engine
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Id of the live tick loop, if any
    pub fn active_loop(&self) -> Option<LoopId> {
        self.tick_loop.as_ref().map(TickHandle::id)
    }

    pub fn last_frame(&self) -> &DisplayFrame {
        &self.last_frame
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.state.phase(),
            configured_ms: self.state.configured_ms,
            remaining_ms: self.state.remaining_ms,
            running: self.state.running,
            warned: self.state.warned,
            ended: self.state.ended,
            display: self.last_frame.clone(),
        }
    }

    /// Start or resume the countdown
    pub fn start(&mut self) {
        if self.state.remaining_ms == 0 {
            self.state.remaining_ms = if self.state.configured_ms == 0 {
                MIN_START_MS
            } else {
                self.state.configured_ms
            };
            // A fresh cycle after completion gets its warning back
            self.state.warned = false;
        }

        let now = self.clock.now_ms();
        self.state.deadline_ms = Some(now.saturating_add(self.state.remaining_ms));
        self.state.running = true;
        self.state.ended = false;
        self.state.cycle_started = true;

        self.cancel_loop();
        self.tick_loop = Some(self.ticker.schedule(TICK_PERIOD));

        info!("Countdown started with {}ms remaining", self.state.remaining_ms);
        self.render(Some(frame::MSG_STARTED));
    }

    /// Pause the countdown, keeping the remaining time
    pub fn pause(&mut self) {
        self.halt();
        info!("Countdown paused with {}ms remaining", self.state.remaining_ms);
        self.render(Some(frame::MSG_PAUSED));
    }

    pub fn toggle(&mut self) {
        if self.state.running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Recompute remaining time from the deadline and fire due side effects
    pub fn tick(&mut self) {
        if !self.state.running {
            return;
        }
        let Some(deadline) = self.state.deadline_ms else {
            return;
        };

        self.state.remaining_ms = deadline.saturating_sub(self.clock.now_ms());

        if self.state.warning_due() {
            self.state.warned = true;
            info!("Time running low, playing warning cue");
            self.cues.warning.play();
        }

        if self.state.remaining_ms == 0 {
            self.finish();
            return;
        }

        self.render(None);
    }

    /// Tick delivered by a specific loop; ticks from cancelled loops are dropped
    pub fn tick_from(&mut self, loop_id: LoopId) {
        if self.active_loop() == Some(loop_id) {
            self.tick();
        } else {
            debug!("Ignoring tick from stale loop {}", loop_id);
        }
    }

    /// Stop and restore the configured duration
    pub fn reset(&mut self) {
        self.halt();
        if self.state.configured_ms == 0 {
            self.state.configured_ms = DEFAULT_DURATION_MS;
        }
        self.state.remaining_ms = self.state.configured_ms;
        self.clear_cycle();
        self.cues.stop_all();

        info!("Countdown reset to {}ms", self.state.configured_ms);
        self.render(Some(frame::MSG_RESET));
    }

    /// Nudge both the configured and remaining time by a signed number of seconds
    pub fn adjust(&mut self, delta_seconds: i64) {
        let delta_ms = delta_seconds.saturating_mul(1000);
        self.state.configured_ms = self.state.configured_ms.saturating_add_signed(delta_ms);
        self.state.remaining_ms = self.state.remaining_ms.saturating_add_signed(delta_ms);
        self.state.warned = false;
        self.state.ended = false;
        self.cues.warning.stop();
        self.refresh_deadline();

        info!(
            "Countdown adjusted by {}s, {}ms remaining",
            delta_seconds, self.state.remaining_ms
        );
        if self.finish_if_exhausted() {
            return;
        }
        self.render(Some(frame::MSG_ADJUSTED));
    }

    /// Replace the duration with an absolute number of seconds
    pub fn preset(&mut self, seconds: i64) {
        let duration_ms = u64::try_from(seconds).unwrap_or(0).saturating_mul(1000);
        self.state.configured_ms = duration_ms;
        self.state.remaining_ms = duration_ms;
        self.clear_cycle();
        self.cues.stop_all();
        self.refresh_deadline();

        info!("Countdown preset to {}ms", duration_ms);
        if self.finish_if_exhausted() {
            return;
        }
        self.render(Some(frame::MSG_PRESET));
    }

    /// Cancel the tick loop and silence both cues
    pub fn shutdown(&mut self) {
        self.cancel_loop();
        self.state.running = false;
        self.state.deadline_ms = None;
        self.cues.stop_all();
    }

    /// A running countdown cut down to zero ends now rather than on the
    /// next tick
    fn finish_if_exhausted(&mut self) -> bool {
        if self.state.running && self.state.remaining_ms == 0 {
            self.finish();
            true
        } else {
            false
        }
    }

    fn finish(&mut self) {
        self.halt();
        self.state.ended = true;
        self.state.remaining_ms = 0;
        self.state.cycle_started = false;
        self.render(None);
        self.cues.warning.stop();
        info!("Countdown finished, playing completion cue");
        self.cues.completion.play();
    }

    fn halt(&mut self) {
        self.state.running = false;
        self.state.deadline_ms = None;
        self.cancel_loop();
    }

    fn cancel_loop(&mut self) {
        if let Some(handle) = self.tick_loop.take() {
            handle.cancel();
        }
    }

    fn clear_cycle(&mut self) {
        self.state.warned = false;
        self.state.ended = false;
        // A running countdown keeps its cycle
        self.state.cycle_started = self.state.running;
    }

    fn refresh_deadline(&mut self) {
        if self.state.running {
            let now = self.clock.now_ms();
            self.state.deadline_ms = Some(now.saturating_add(self.state.remaining_ms));
        }
    }

    fn render(&mut self, message: Option<&str>) {
        self.last_frame = DisplayFrame::render(
            self.ring,
            self.state.remaining_ms,
            self.state.configured_ms,
            self.state.running,
            self.state.ended,
            message,
        );
        self.display.render(&self.last_frame);
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
