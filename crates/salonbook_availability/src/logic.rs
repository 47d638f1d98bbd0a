// --- File: crates/salonbook_availability/src/logic.rs ---
use chrono::{Datelike, NaiveDate};
use salonbook_common::models::{
    BestMatch, BusyInterval, CustomerDetails, Slot, SlotKind, SlotSets, WorkingWindow,
};
use salonbook_common::services::{AvailabilitySource, SourceError};
use salonbook_common::time::MINUTES_PER_DAY;
use salonbook_common::{ClockTime, SalonbookError};
use salonbook_config::StraddlePolicy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// How far (in minutes) a perfect slot may sit from the requested time and
/// still be preferred over a closer non-perfect one.
pub const MATCH_TOLERANCE_MINUTES: u32 = 30;

// --- Error Handling ---
use thiserror::Error;
#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Availability source error: {0}")]
    Source(#[from] SourceError),
}

impl From<AvailabilityError> for SalonbookError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::Source(source) => source.into(),
        }
    }
}

// --- Data Structures ---
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Calendar date, `YYYY-MM-DD`.
    #[cfg_attr(feature = "openapi", schema(example = "2025-06-02"))]
    pub date: String,
    #[cfg_attr(feature = "openapi", schema(example = "haircut"))]
    pub service_id: String,
    /// Omitted, empty or `"any"` means any staff member.
    pub staff_id: Option<String>,
    /// Preferred start, `HH:MM`.
    #[cfg_attr(feature = "openapi", schema(example = "10:15"))]
    pub requested_time: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailabilityResponse {
    #[cfg_attr(feature = "openapi", schema(example = "2025-06-02"))]
    pub date: String,
    pub staff_id: Option<String>,
    pub perfect_slots: Vec<String>,
    pub other_slots: Vec<String>,
    pub best_match: Option<BestMatch>,
}

impl AvailabilityResponse {
    pub fn new(
        date: NaiveDate,
        staff_id: Option<String>,
        slots: &SlotSets,
        best_match: Option<BestMatch>,
    ) -> Self {
        let labels = |slots: &[Slot]| slots.iter().map(|slot| slot.label.clone()).collect();
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            staff_id,
            perfect_slots: labels(&slots.perfect),
            other_slots: labels(&slots.other),
            best_match,
        }
    }
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingRequest {
    #[cfg_attr(feature = "openapi", schema(example = "haircut"))]
    pub service_id: String,
    /// Omitted, empty or `"any"` lets the salon pick a free staff member.
    pub staff_id: Option<String>,
    /// `YYYY-MM-DD`; today in the salon's time zone when omitted.
    #[cfg_attr(feature = "openapi", schema(example = "2025-06-02"))]
    pub date: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "10:00"))]
    pub time: String,
    pub customer: CustomerDetails,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct HealthResponse {
    #[cfg_attr(feature = "openapi", schema(example = "ok"))]
    pub status: String,
    pub services: usize,
}

// --- Slot Generation ---

/// Busy time of `interval` that counts against the window `[start, end]`.
fn busy_within_window(
    interval: &BusyInterval,
    start: u32,
    end: u32,
    policy: StraddlePolicy,
) -> Option<(u32, u32)> {
    let fully_inside = interval.start_minute >= start && interval.end_minute <= end;
    let overlaps = interval.start_minute < end && interval.end_minute > start;
    match policy {
        StraddlePolicy::Ignore if fully_inside => Some((interval.start_minute, interval.end_minute)),
        StraddlePolicy::Clip if fully_inside || overlaps => Some((
            interval.start_minute.max(start),
            interval.end_minute.min(end),
        )),
        _ => None,
    }
}

struct SlotCollector {
    sets: SlotSets,
    seen: HashSet<u32>,
}

impl SlotCollector {
    fn push(&mut self, start_minute: u32, kind: SlotKind) {
        if !self.seen.insert(start_minute) {
            return;
        }
        let slot = Slot::new(start_minute, kind);
        match kind {
            SlotKind::Perfect => self.sets.perfect.push(slot),
            SlotKind::Other => self.sets.other.push(slot),
        }
    }
}

/// Computes the start times a new appointment of `duration` minutes could take.
///
/// Each window is split into gaps by the busy intervals that fall inside it.
/// A gap exactly as long as the service yields a perfect slot at its start;
/// every gap is then tiled in `duration` steps into other slots. Slots come
/// out in window order, then gap order. A start minute is reported once,
/// in whichever set it first appeared. A zero duration, or one of a full day
/// or more, yields nothing.
///
/// # Panics
///
/// Panics when a window does not start before it ends.
pub fn generate_slots(
    windows: &[WorkingWindow],
    busy: &[BusyInterval],
    duration: u32,
    policy: StraddlePolicy,
) -> SlotSets {
    let mut collector = SlotCollector {
        sets: SlotSets::default(),
        seen: HashSet::new(),
    };
    if !is_bookable_duration(duration) {
        return collector.sets;
    }

    for window in windows {
        let (window_start, window_end) = (window.start_minute(), window.end_minute());
        assert!(
            window_start < window_end,
            "working window {}-{} for staff {} is empty",
            window.start,
            window.end,
            window.staff_id
        );

        let mut blocks: Vec<(u32, u32)> = busy
            .iter()
            .filter_map(|interval| busy_within_window(interval, window_start, window_end, policy))
            .collect();
        blocks.sort_by_key(|&(start, _)| start);
        blocks.push((window_end, window_end));

        // Furthest busy end so far; overlapping bookings never reopen a gap.
        let mut cursor = window_start;
        for (next_start, next_end) in blocks {
            if next_start > cursor {
                let perfect = next_start - cursor == duration;
                if perfect {
                    collector.push(cursor, SlotKind::Perfect);
                }
                let mut pos = cursor;
                while pos + duration <= next_start {
                    if !(perfect && pos == cursor) {
                        collector.push(pos, SlotKind::Other);
                    }
                    pos += duration;
                }
            }
            cursor = cursor.max(next_end);
        }
    }

    collector.sets
}

// --- Best Match ---

/// Picks the slot closest to `requested`.
///
/// Perfect slots within `tolerance` minutes win. Otherwise the closest slot
/// of any kind is returned, flagged as not perfect. Ties go to the earlier
/// entry, perfect slots first.
pub fn select_best_match(
    perfect: &[Slot],
    other: &[Slot],
    requested: Option<ClockTime>,
    tolerance: u32,
) -> Option<BestMatch> {
    let requested = requested?.minutes();
    let distance = |slot: &&Slot| slot.start_minute.abs_diff(requested);

    if let Some(slot) = perfect
        .iter()
        .filter(|slot| distance(slot) <= tolerance)
        .min_by_key(distance)
    {
        return Some(BestMatch {
            slot: slot.clone(),
            is_perfect_match: true,
        });
    }

    perfect
        .iter()
        .chain(other)
        .min_by_key(distance)
        .map(|slot| BestMatch {
            slot: slot.clone(),
            is_perfect_match: false,
        })
}

pub fn compute_best_match(
    perfect: &[Slot],
    other: &[Slot],
    requested: Option<ClockTime>,
) -> Option<BestMatch> {
    select_best_match(perfect, other, requested, MATCH_TOLERANCE_MINUTES)
}

/// Closed-open overlap test of a prospective appointment against busy time.
pub fn is_slot_free(busy: &[BusyInterval], start_minute: u32, duration: u32) -> bool {
    let end_minute = start_minute.saturating_add(duration);
    !busy
        .iter()
        .any(|interval| interval.overlaps(start_minute, end_minute))
}

// --- Orchestration ---

/// Whether a service of `duration` minutes fits inside a single day.
pub(crate) fn is_bookable_duration(duration: u32) -> bool {
    duration > 0 && duration < MINUTES_PER_DAY
}

/// Bookable duration of a service; `None` when it cannot be booked online.
pub(crate) async fn bookable_duration(
    source: &dyn AvailabilitySource,
    service_id: &str,
) -> Result<Option<u32>, AvailabilityError> {
    let duration = source.get_service_duration(service_id).await?;
    Ok(duration.filter(|minutes| is_bookable_duration(*minutes)))
}

pub(crate) async fn slots_for_staff(
    source: &dyn AvailabilitySource,
    staff_id: &str,
    date: NaiveDate,
    duration: u32,
    policy: StraddlePolicy,
) -> Result<SlotSets, AvailabilityError> {
    let windows = source.get_working_windows(staff_id, date.weekday()).await?;
    if windows.is_empty() {
        debug!(staff_id, %date, "No working windows");
        return Ok(SlotSets::default());
    }
    let busy = source.get_busy_intervals(staff_id, date).await?;
    Ok(generate_slots(&windows, &busy, duration, policy))
}

/// Perfect and other slots for one staff member, service and date.
///
/// Unknown service or staff ids fail with [`SourceError::NotFound`]. A service
/// without a duration, or a day without working hours, yields empty sets.
pub async fn compute_availability(
    source: &dyn AvailabilitySource,
    staff_id: &str,
    date: NaiveDate,
    service_id: &str,
    policy: StraddlePolicy,
) -> Result<SlotSets, AvailabilityError> {
    let duration = bookable_duration(source, service_id).await?;
    source.get_staff(staff_id).await?;
    let Some(duration) = duration else {
        debug!(service_id, "Service has no bookable duration");
        return Ok(SlotSets::default());
    };
    slots_for_staff(source, staff_id, date, duration, policy).await
}

/// Union of every staff member's availability, sorted by start time.
///
/// A start is perfect when it is perfect for at least one staff member.
pub async fn compute_availability_any(
    source: &dyn AvailabilitySource,
    date: NaiveDate,
    service_id: &str,
    policy: StraddlePolicy,
) -> Result<SlotSets, AvailabilityError> {
    let Some(duration) = bookable_duration(source, service_id).await? else {
        debug!(service_id, "Service has no bookable duration");
        return Ok(SlotSets::default());
    };

    let mut kinds: BTreeMap<u32, SlotKind> = BTreeMap::new();
    for member in source.list_staff().await? {
        let sets = slots_for_staff(source, &member.id, date, duration, policy).await?;
        for slot in sets.perfect {
            kinds.insert(slot.start_minute, SlotKind::Perfect);
        }
        for slot in sets.other {
            kinds.entry(slot.start_minute).or_insert(SlotKind::Other);
        }
    }

    let mut union = SlotSets::default();
    for (start_minute, kind) in kinds {
        let slot = Slot::new(start_minute, kind);
        match kind {
            SlotKind::Perfect => union.perfect.push(slot),
            SlotKind::Other => union.other.push(slot),
        }
    }
    Ok(union)
}
