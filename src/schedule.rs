// schedule.rs: eligibility windows and next-item selection.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::model::PlaylistItem;

/// Whether `item` may be shown at the local wall-clock instant `now`.
///
/// Items without a schedule rule are always-on. The day check uses numeric
/// weekdays (0 = Sunday) and the time check compares zero-padded "HH:MM"
/// strings, so evaluation is locale-independent and fixed-width strings make
/// lexicographic order equal chronological order. Both bounds are inclusive.
///
/// A rule whose `start_time` sorts after its `end_time` never matches: the
/// window is not wrapped past midnight.
pub fn is_eligible_now(item: &PlaylistItem, now: NaiveDateTime) -> bool {
    let Some(rule) = &item.schedule_rule else {
        return true;
    };

    let current_day = now.weekday().num_days_from_sunday() as u8;
    if !rule.days.is_empty() && !rule.days.contains(&current_day) {
        return false;
    }

    let current_time = format!("{:02}:{:02}", now.hour(), now.minute());
    if current_time.as_str() < rule.start_time.as_str() {
        return false;
    }
    if current_time.as_str() > rule.end_time.as_str() {
        return false;
    }
    true
}

/// First eligible index scanning forward from `start`, wrapping at the end
/// of the list and probing each item at most once.
///
/// Scan order is strictly the list's sorted order starting at `start % len`;
/// no other prioritization applies. Returns `None` when nothing is eligible
/// after a full wrap, including for an empty list.
pub fn find_next_eligible(
    start: usize,
    items: &[PlaylistItem],
    now: NaiveDateTime,
) -> Option<usize> {
    if items.is_empty() {
        return None;
    }
    let len = items.len();
    let mut idx = start % len;
    for _ in 0..len {
        if is_eligible_now(&items[idx], now) {
            return Some(idx);
        }
        idx = (idx + 1) % len;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ScheduleRule, SlideContent};
    use chrono::NaiveDate;

    fn item(id: &str, order: i64, rule: Option<ScheduleRule>) -> PlaylistItem {
        PlaylistItem {
            id: id.to_string(),
            content_ref: format!("slide-{id}"),
            order,
            duration_seconds: 10,
            schedule_rule: rule,
            content: SlideContent::default(),
        }
    }

    fn rule(start: &str, end: &str, days: Vec<u8>) -> ScheduleRule {
        ScheduleRule {
            start_time: start.to_string(),
            end_time: end.to_string(),
            days,
        }
    }

    // 2024-01-01 was a Monday (weekday 1 with Sunday = 0).
    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn no_rule_is_always_eligible() {
        let it = item("a", 0, None);
        assert!(is_eligible_now(&it, at(1, 0, 0)));
        assert!(is_eligible_now(&it, at(7, 23, 59)));
    }

    #[test]
    fn day_filter_restricts_weekdays() {
        let it = item("a", 0, Some(rule("00:00", "23:59", vec![1, 3, 5])));
        assert!(is_eligible_now(&it, at(1, 12, 0))); // Monday
        assert!(is_eligible_now(&it, at(3, 12, 0))); // Wednesday
        assert!(!is_eligible_now(&it, at(2, 12, 0))); // Tuesday
        assert!(!is_eligible_now(&it, at(7, 12, 0))); // Sunday
    }

    #[test]
    fn empty_days_means_all_days() {
        let it = item("a", 0, Some(rule("00:00", "23:59", vec![])));
        for day in 1..=7 {
            assert!(is_eligible_now(&it, at(day, 12, 0)));
        }
    }

    #[test]
    fn time_bounds_are_inclusive() {
        let it = item("a", 0, Some(rule("08:00", "20:00", vec![])));
        assert!(is_eligible_now(&it, at(1, 8, 0)));
        assert!(is_eligible_now(&it, at(1, 20, 0)));
        assert!(!is_eligible_now(&it, at(1, 7, 59)));
        assert!(!is_eligible_now(&it, at(1, 20, 1)));
    }

    #[test]
    fn overnight_window_never_matches() {
        // start > end does not wrap past midnight; documented limitation.
        let it = item("a", 0, Some(rule("22:00", "06:00", vec![])));
        assert!(!is_eligible_now(&it, at(1, 23, 0)));
        assert!(!is_eligible_now(&it, at(1, 5, 0)));
        assert!(!is_eligible_now(&it, at(1, 12, 0)));
    }

    #[test]
    fn selector_wraps_to_first_eligible() {
        let sunday_only = Some(rule("00:00", "23:59", vec![0]));
        let items = vec![
            item("a", 0, sunday_only.clone()),
            item("b", 10, sunday_only),
            item("c", 20, None),
        ];
        let monday = at(1, 12, 0);
        assert_eq!(find_next_eligible(0, &items, monday), Some(2));
        // Sole eligible item wraps back to itself.
        assert_eq!(find_next_eligible(2, &items, monday), Some(2));
        // Start past the end of the list wraps into range.
        assert_eq!(find_next_eligible(3, &items, monday), Some(2));
    }

    #[test]
    fn selector_returns_none_when_nothing_eligible() {
        let sunday_only = Some(rule("00:00", "23:59", vec![0]));
        let items = vec![
            item("a", 0, sunday_only.clone()),
            item("b", 10, sunday_only.clone()),
            item("c", 20, sunday_only),
        ];
        assert_eq!(find_next_eligible(0, &items, at(1, 12, 0)), None);
        assert_eq!(find_next_eligible(2, &items, at(1, 12, 0)), None);
    }

    #[test]
    fn selector_handles_empty_list() {
        assert_eq!(find_next_eligible(0, &[], at(1, 12, 0)), None);
    }

    #[test]
    fn selector_prefers_scan_order_over_everything() {
        // Two eligible items: the one closest in scan order wins even when
        // a later one has a wider window.
        let items = vec![
            item("a", 0, Some(rule("08:00", "20:00", vec![]))),
            item("b", 10, None),
        ];
        let monday_noon = at(1, 12, 0);
        assert_eq!(find_next_eligible(0, &items, monday_noon), Some(0));
        assert_eq!(find_next_eligible(1, &items, monday_noon), Some(1));
    }
}
