use std::sync::OnceLock;

use chrono::{NaiveTime, Timelike};
use regex::{Captures, Regex};

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(\d{1,2}):(\d{2})(?::\d{2})?\s*([ap]m)?\s*(?:-\s*(\d{1,2}):(\d{2})(?::\d{2})?\s*([ap]m)?)?\s*$",
        )
        .expect("slot label pattern is valid")
    })
}

/// A published slot label reduced to the times it covers.
///
/// `"09:00 AM"` and `"09:00"` are point slots; `"9:00 AM - 9:15 AM"` and
/// `"09:00-10:00"` cover `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    pub start: NaiveTime,
    pub end: Option<NaiveTime>,
}

impl SlotWindow {
    /// Returns `None` for labels that do not describe a time of day.
    pub fn parse(label: &str) -> Option<Self> {
        let caps = label_pattern().captures(label)?;

        // A meridiem written on only one side of a range applies to both,
        // except ranges that cross noon: "11:30 - 12:30 PM" and
        // "10:00 AM - 12:00".
        let start_meridiem = caps.get(3).map(|m| m.as_str());
        let end_meridiem = caps.get(6).map(|m| m.as_str());
        let mut start = clock_time(&caps, 1, 2, start_meridiem.or(end_meridiem))?;

        let end = match caps.get(4) {
            Some(_) => {
                let mut end = clock_time(&caps, 4, 5, end_meridiem.or(start_meridiem))?;
                if start >= end && start_meridiem.is_none() && end_meridiem.is_some() {
                    start = clock_time(&caps, 1, 2, Some("am"))?;
                }
                if start >= end && start_meridiem.is_some() && end_meridiem.is_none() {
                    end = clock_time(&caps, 4, 5, Some("pm"))?;
                }
                if end <= start {
                    return None;
                }
                Some(end)
            }
            None => None,
        };

        Some(Self { start, end })
    }

    /// Whether an appointment at `time` occupies this slot.
    pub fn covers(&self, time: NaiveTime) -> bool {
        match self.end {
            Some(end) => self.start <= time && time < end,
            None => self.start == time,
        }
    }

    pub fn is_morning(&self) -> bool {
        self.start.hour() < 12
    }
}

fn clock_time(caps: &Captures<'_>, hour_idx: usize, minute_idx: usize, meridiem: Option<&str>) -> Option<NaiveTime> {
    let hour: u32 = caps.get(hour_idx)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(minute_idx)?.as_str().parse().ok()?;

    let hour = match meridiem.map(|m| m.to_ascii_lowercase()) {
        Some(m) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (m.as_str(), hour) {
                ("am", 12) => 0,
                ("am", h) => h,
                (_, 12) => 12,
                (_, h) => h + 12,
            }
        }
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Whether some label in `labels` starts exactly at `time`. Unparseable
/// labels never match.
pub fn offers_start(labels: &[String], time: NaiveTime) -> bool {
    labels
        .iter()
        .filter_map(|label| SlotWindow::parse(label))
        .any(|window| window.start == time)
}

/// Published labels minus every slot occupied by one of `booked`, in
/// publication order. Unparseable labels are never occupied.
pub fn subtract_booked(published: &[String], booked: &[NaiveTime]) -> Vec<String> {
    published
        .iter()
        .filter(|label| match SlotWindow::parse(label) {
            Some(window) => !booked.iter().any(|t| window.covers(*t)),
            None => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_supported_label_shapes() {
        assert_eq!(SlotWindow::parse("09:00 AM"), Some(SlotWindow { start: t(9, 0), end: None }));
        assert_eq!(SlotWindow::parse("09:00"), Some(SlotWindow { start: t(9, 0), end: None }));
        assert_eq!(SlotWindow::parse("2:30 pm"), Some(SlotWindow { start: t(14, 30), end: None }));
        assert_eq!(
            SlotWindow::parse("9:00 AM - 9:15 AM"),
            Some(SlotWindow { start: t(9, 0), end: Some(t(9, 15)) })
        );
        assert_eq!(
            SlotWindow::parse("09:00-10:00"),
            Some(SlotWindow { start: t(9, 0), end: Some(t(10, 0)) })
        );
        assert_eq!(
            SlotWindow::parse("11:30 - 12:30 PM"),
            Some(SlotWindow { start: t(11, 30), end: Some(t(12, 30)) })
        );
    }

    #[test]
    fn range_with_only_start_meridiem_can_end_after_noon() {
        assert_eq!(
            SlotWindow::parse("10:00 AM - 12:00"),
            Some(SlotWindow { start: t(10, 0), end: Some(t(12, 0)) })
        );
        assert_eq!(
            SlotWindow::parse("11:00 am - 1:30"),
            Some(SlotWindow { start: t(11, 0), end: Some(t(13, 30)) })
        );
        assert_eq!(
            SlotWindow::parse("1:00 PM - 2:00"),
            Some(SlotWindow { start: t(13, 0), end: Some(t(14, 0)) })
        );
        assert!(offers_start(&labels(&["10:00 AM - 12:00"]), t(10, 0)));
    }

    #[test]
    fn twelve_oclock_edges() {
        assert_eq!(SlotWindow::parse("12:00 AM").unwrap().start, t(0, 0));
        assert_eq!(SlotWindow::parse("12:15 PM").unwrap().start, t(12, 15));
    }

    #[test]
    fn rejects_nonsense() {
        assert_eq!(SlotWindow::parse("morning"), None);
        assert_eq!(SlotWindow::parse("13:00 PM"), None);
        assert_eq!(SlotWindow::parse("25:00"), None);
        assert_eq!(SlotWindow::parse("10:00-09:00"), None);
    }

    #[test]
    fn ranged_slot_covers_half_open_interval() {
        let window = SlotWindow::parse("09:00-10:00").unwrap();
        assert!(window.covers(t(9, 0)));
        assert!(window.covers(t(9, 45)));
        assert!(!window.covers(t(10, 0)));
        assert!(!window.covers(t(8, 59)));
    }

    #[test]
    fn point_slot_is_not_a_prefix_match() {
        let window = SlotWindow::parse("10:00 AM").unwrap();
        assert!(window.covers(t(10, 0)));
        assert!(!window.covers(t(10, 30)));
        assert!(!window.covers(t(22, 0)));
    }

    #[test]
    fn subtraction_keeps_order_and_unparseable_labels() {
        let published = labels(&["11:00 AM", "09:00 AM", "by request", "10:00 AM"]);
        let free = subtract_booked(&published, &[t(9, 0)]);
        assert_eq!(free, labels(&["11:00 AM", "by request", "10:00 AM"]));
    }

    #[test]
    fn offers_start_ignores_unparseable_labels() {
        let published = labels(&["by request", "09:00-10:00"]);
        assert!(offers_start(&published, t(9, 0)));
        assert!(!offers_start(&published, t(9, 30)));
    }
}
