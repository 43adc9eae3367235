//! Display frame: a pure projection of the timer state

use std::f64::consts::PI;
use serde::{Deserialize, Serialize};

/// Status shown while counting down without a transitional message
pub const STATUS_COUNTING: &str = "靜心倒數中";
/// Status shown once the countdown has ended
pub const STATUS_ENDED: &str = "時間到了，請給自己一個深呼吸 ✨";

pub const MSG_STARTED: &str = "光圈正在收斂";
pub const MSG_PAUSED: &str = "稍作停留再繼續";
pub const MSG_RESET: &str = "回到起點，重新開始";
pub const MSG_ADJUSTED: &str = "時間已微調";
pub const MSG_PRESET: &str = "已設定新的神聖時間";

pub const LABEL_START: &str = "開始";
pub const LABEL_PAUSE: &str = "暫停";

/// Radius of the progress ring, in SVG user units
pub const RING_RADIUS: f64 = 90.0;

/// Format milliseconds as "MM:SS", rounding up to whole seconds
///
/// Minutes are not wrapped, so 100 minutes renders as "100:00".
pub fn format_time(ms: u64) -> String {
    let total_secs = ms.div_ceil(1000);
    let m = total_secs / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}", m, s)
}

/// Fraction of the ring that has been drawn down, in [0, 1]
pub fn ring_fraction(remaining_ms: u64, configured_ms: u64) -> f64 {
    if configured_ms == 0 {
        return 1.0;
    }
    let progress = 1.0 - remaining_ms as f64 / configured_ms as f64;
    progress.clamp(0.0, 1.0)
}

/// Circumference-based geometry for the progress ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    pub radius: f64,
}

impl RingGeometry {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }

    /// Stroke dash offset for a given fraction; never negative
    pub fn dash_offset(&self, fraction: f64) -> f64 {
        (self.circumference() * (1.0 - fraction)).max(0.0)
    }
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self::new(RING_RADIUS)
    }
}

/// Everything the rendering surface needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub time_text: String,
    pub status_text: String,
    pub ring_fraction: f64,
    pub dash_offset: f64,
    pub toggle_label: String,
}

impl DisplayFrame {
    /// Project timer values into a frame.
    ///
    /// An explicit `message` wins over the ended/counting status.
    pub fn render(
        geometry: RingGeometry,
        remaining_ms: u64,
        configured_ms: u64,
        running: bool,
        ended: bool,
        message: Option<&str>,
    ) -> Self {
        let status_text = match message {
            Some(message) => message,
            None if ended => STATUS_ENDED,
            None => STATUS_COUNTING,
        };
        let fraction = ring_fraction(remaining_ms, configured_ms);

        Self {
            time_text: format_time(remaining_ms),
            status_text: status_text.to_string(),
            ring_fraction: fraction,
            dash_offset: geometry.dash_offset(fraction),
            toggle_label: if running { LABEL_PAUSE } else { LABEL_START }.to_string(),
        }
    }
}

impl Default for DisplayFrame {
    fn default() -> Self {
        Self::render(RingGeometry::default(), 0, 0, false, false, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_rounds_up() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(1), "00:01");
        assert_eq!(format_time(59_001), "01:00");
        assert_eq!(format_time(60_000), "01:00");
        assert_eq!(format_time(60_001), "01:01");
        assert_eq!(format_time(1_500_000), "25:00");
        assert_eq!(format_time(6_000_000), "100:00");
    }

    #[test]
    fn test_ring_fraction_bounds() {
        assert_eq!(ring_fraction(60_000, 60_000), 0.0);
        assert_eq!(ring_fraction(30_000, 60_000), 0.5);
        assert_eq!(ring_fraction(0, 60_000), 1.0);
        assert_eq!(ring_fraction(0, 0), 1.0);
        assert_eq!(ring_fraction(5_000, 0), 1.0);
        // Remaining above the configured length clamps at empty progress
        assert_eq!(ring_fraction(90_000, 60_000), 0.0);
    }

    #[test]
    fn test_ring_fraction_monotonic() {
        let configured = 90_000;
        let mut last = -1.0;
        for remaining in (0..=configured).rev().step_by(1_000) {
            let fraction = ring_fraction(remaining, configured);
            assert!(fraction >= last);
            last = fraction;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_dash_offset() {
        let ring = RingGeometry::default();
        assert!((ring.dash_offset(0.0) - ring.circumference()).abs() < 1e-9);
        assert_eq!(ring.dash_offset(1.0), 0.0);
        assert_eq!(ring.dash_offset(1.5), 0.0);
    }

    #[test]
    fn test_status_precedence() {
        let ring = RingGeometry::default();

        let frame = DisplayFrame::render(ring, 1_000, 1_000, true, false, None);
        assert_eq!(frame.status_text, STATUS_COUNTING);
        assert_eq!(frame.toggle_label, LABEL_PAUSE);

        let frame = DisplayFrame::render(ring, 0, 1_000, false, true, None);
        assert_eq!(frame.status_text, STATUS_ENDED);
        assert_eq!(frame.toggle_label, LABEL_START);

        let frame = DisplayFrame::render(ring, 0, 1_000, false, true, Some(MSG_RESET));
        assert_eq!(frame.status_text, MSG_RESET);
    }
}
