//! The per-turn stroke log that late joiners are replayed from.

use scrawl_protocol::StrokeSegment;

/// Longest color string accepted from a drawer.
pub const MAX_COLOR_LEN: usize = 32;

/// Returns `true` if `color` is something a client could plausibly render.
///
/// The core never parses colors; this only keeps empty or oversized
/// strings out of the relay.
pub fn is_valid_color(color: &str) -> bool {
    !color.is_empty() && color.len() <= MAX_COLOR_LEN && !color.chars().any(char::is_control)
}

/// Returns `true` if every field of `segment` is usable.
///
/// Coordinates must be finite; width must be finite and positive.
pub fn is_valid_segment(segment: &StrokeSegment) -> bool {
    [segment.x0, segment.y0, segment.x1, segment.y1]
        .iter()
        .all(|v| v.is_finite())
        && segment.line_width.is_finite()
        && segment.line_width > 0.0
        && is_valid_color(&segment.color)
}

/// Ordered, append-only record of the current turn's segments.
///
/// Cleared at the start of every drawing phase and by an explicit canvas
/// clear. Replaying it in order reproduces exactly what watchers saw.
#[derive(Debug, Clone, Default)]
pub struct StrokeLog {
    segments: Vec<StrokeSegment>,
}

impl StrokeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment. Malformed segments are refused and `false` is
    /// returned.
    pub fn record(&mut self, segment: StrokeSegment) -> bool {
        if !is_valid_segment(&segment) {
            return false;
        }
        self.segments.push(segment);
        true
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Every recorded segment, oldest first.
    pub fn segments(&self) -> &[StrokeSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x: f32) -> StrokeSegment {
        StrokeSegment {
            x0: x,
            y0: 0.0,
            x1: x + 1.0,
            y1: 1.0,
            color: "#000000".into(),
            line_width: 3.0,
        }
    }

    #[test]
    fn test_record_preserves_order() {
        let mut log = StrokeLog::new();
        for i in 0..5 {
            assert!(log.record(seg(i as f32)));
        }
        let xs: Vec<f32> = log.segments().iter().map(|s| s.x0).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_record_rejects_non_finite_coordinates() {
        let mut log = StrokeLog::new();
        assert!(!log.record(seg(f32::NAN)));
        let mut s = seg(0.0);
        s.y1 = f32::INFINITY;
        assert!(!log.record(s));
        assert!(log.is_empty());
    }

    #[test]
    fn test_record_rejects_bad_width_and_color() {
        let mut log = StrokeLog::new();
        let mut s = seg(0.0);
        s.line_width = 0.0;
        assert!(!log.record(s));

        let mut s = seg(0.0);
        s.color = String::new();
        assert!(!log.record(s));

        let mut s = seg(0.0);
        s.color = "x".repeat(MAX_COLOR_LEN + 1);
        assert!(!log.record(s));
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn test_clear_empties_log() {
        let mut log = StrokeLog::new();
        log.record(seg(1.0));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_color_validation() {
        assert!(is_valid_color("#ef4444"));
        assert!(is_valid_color("rebeccapurple"));
        assert!(!is_valid_color(""));
        assert!(!is_valid_color("red\n"));
    }
}
