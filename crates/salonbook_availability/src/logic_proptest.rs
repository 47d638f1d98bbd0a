#[cfg(test)]
mod tests {
    use crate::logic::{compute_best_match, generate_slots};
    use chrono::{NaiveDate, Weekday};
    use proptest::prelude::*;
    use salonbook_common::models::{BusyInterval, WorkingWindow};
    use salonbook_common::ClockTime;
    use salonbook_config::StraddlePolicy;
    use std::collections::HashSet;

    // Windows as (start minute, length) kept inside one day
    fn build_windows(raw: &[(u32, u32)]) -> Vec<WorkingWindow> {
        raw.iter()
            .map(|&(start, len)| {
                let end = (start + len).min(24 * 60 - 1);
                WorkingWindow::new(
                    "anna",
                    Weekday::Tue,
                    ClockTime::from_minutes(start).unwrap(),
                    ClockTime::from_minutes(end).unwrap(),
                )
                .unwrap()
            })
            .collect()
    }

    fn build_busy(raw: &[(u32, u32)]) -> Vec<BusyInterval> {
        let date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        raw.iter()
            .map(|&(start, len)| {
                BusyInterval::from_appointment(
                    "anna",
                    date,
                    ClockTime::from_minutes(start).unwrap(),
                    len,
                )
            })
            .collect()
    }

    prop_compose! {
        fn scenario()(
            windows in prop::collection::vec((0..1380u32, 1..=240u32), 0..4),
            busy in prop::collection::vec((0..1439u32, 0..=180u32), 0..8),
            duration in 1..=120u32,
        ) -> (Vec<WorkingWindow>, Vec<BusyInterval>, u32) {
            (build_windows(&windows), build_busy(&busy), duration)
        }
    }

    proptest! {
        // Every slot fits entirely inside one of the windows
        #[test]
        fn test_slots_fit_inside_a_window((windows, busy, duration) in scenario()) {
            let slots = generate_slots(&windows, &busy, duration, StraddlePolicy::Clip);
            for slot in slots.perfect.iter().chain(slots.other.iter()) {
                prop_assert!(windows.iter().any(|w| {
                    slot.start_minute >= w.start_minute()
                        && slot.start_minute + duration <= w.end_minute()
                }), "slot {} escapes every window", slot.label);
            }
        }

        // No slot overlaps a booked appointment
        #[test]
        fn test_slots_avoid_busy_intervals((windows, busy, duration) in scenario()) {
            let slots = generate_slots(&windows, &busy, duration, StraddlePolicy::Clip);
            for slot in slots.perfect.iter().chain(slots.other.iter()) {
                for interval in &busy {
                    prop_assert!(
                        !interval.overlaps(slot.start_minute, slot.start_minute + duration),
                        "slot {} overlaps busy {}-{}",
                        slot.label, interval.start_minute, interval.end_minute
                    );
                }
            }
        }

        // A start minute is reported at most once across both sets
        #[test]
        fn test_start_minutes_are_unique((windows, busy, duration) in scenario()) {
            let slots = generate_slots(&windows, &busy, duration, StraddlePolicy::Clip);
            let mut seen = HashSet::new();
            for slot in slots.perfect.iter().chain(slots.other.iter()) {
                prop_assert!(seen.insert(slot.start_minute), "duplicate {}", slot.label);
            }
        }

        // Same input, same output, under both policies
        #[test]
        fn test_generation_is_deterministic((windows, busy, duration) in scenario()) {
            for policy in [StraddlePolicy::Clip, StraddlePolicy::Ignore] {
                prop_assert_eq!(
                    generate_slots(&windows, &busy, duration, policy),
                    generate_slots(&windows, &busy, duration, policy)
                );
            }
        }

        // A requested time equal to a perfect slot always selects it
        #[test]
        fn test_exact_perfect_request_is_matched((windows, busy, duration) in scenario()) {
            let slots = generate_slots(&windows, &busy, duration, StraddlePolicy::Clip);
            for slot in &slots.perfect {
                let requested = ClockTime::from_minutes(slot.start_minute);
                let best = compute_best_match(&slots.perfect, &slots.other, requested).unwrap();
                prop_assert!(best.is_perfect_match);
                prop_assert_eq!(best.slot.start_minute, slot.start_minute);
            }
        }
    }
}
