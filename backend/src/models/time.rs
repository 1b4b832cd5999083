use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Closed time range `[start, end]` used to select candidate intervals.
///
/// The window itself is not validated on construction; callers that need a
/// non-empty window check [`TimeWindow::is_empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// True when `start >= end`.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Full containment: `start >= self.start && end <= self.end`.
    ///
    /// Intervals that merely overlap the window are not contained.
    pub fn contains(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start >= self.start && end <= self.end
    }
}

/// Length of `[start, end)`; negative when the interval is inverted.
pub fn interval_length(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeDelta {
    end.signed_duration_since(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_contains_requires_full_containment() {
        let window = TimeWindow::new(at(10), at(20));
        assert!(window.contains(at(10), at(20)));
        assert!(window.contains(at(12), at(14)));
        assert!(!window.contains(at(9), at(12)));
        assert!(!window.contains(at(18), at(21)));
    }

    #[test]
    fn test_is_empty() {
        assert!(TimeWindow::new(at(10), at(10)).is_empty());
        assert!(TimeWindow::new(at(11), at(10)).is_empty());
        assert!(!TimeWindow::new(at(10), at(11)).is_empty());
    }

    #[test]
    fn test_interval_length() {
        assert_eq!(interval_length(at(18), at(21)).num_minutes(), 180);
        assert!(interval_length(at(21), at(18)) < TimeDelta::zero());
    }
}
