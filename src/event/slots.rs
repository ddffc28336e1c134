//! Conversion between availability slots and contiguous time ranges
//!
//! Participants submit availability as a flat list of 30-minute slots.
//! Storing every slot is wasteful, so responses persist as the minimal
//! list of inclusive `[start, end]` ranges and are expanded back to
//! slots on read. The slot granularity is passed in explicitly so tests
//! and deployments can vary it without touching global state.
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::error::EventError;

/// Default spacing between adjacent availability slots
pub const DEFAULT_SLOT_GAP_MINS: i64 = 30;

/// An inclusive run of consecutive availability slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "(NaiveDateTime, NaiveDateTime)",
    into = "(NaiveDateTime, NaiveDateTime)"
)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl From<(NaiveDateTime, NaiveDateTime)> for TimeRange {
    fn from((start, end): (NaiveDateTime, NaiveDateTime)) -> Self {
        Self { start, end }
    }
}

impl From<TimeRange> for (NaiveDateTime, NaiveDateTime) {
    fn from(range: TimeRange) -> Self {
        (range.start, range.end)
    }
}

/// Expand ranges into every slot from `start` to `end` inclusive,
/// stepping by `gap`.
///
/// Ranges are processed in input order and the slots concatenated.
/// Overlapping input ranges produce duplicate slots on purpose: stored
/// ranges are written non-overlapping by [`slots_to_ranges`], and older
/// rows that predate that guarantee must still expand without surprises.
pub fn ranges_to_slots(
    ranges: &[TimeRange],
    gap: Duration,
) -> Result<Vec<NaiveDateTime>, EventError> {
    // A non-positive step would never advance past `end` below
    if gap <= Duration::zero() {
        return Err(EventError::Invalid(
            "slot granularity must be positive".to_string(),
        ));
    }

    let mut slots = Vec::new();
    for range in ranges {
        if range.end < range.start {
            return Err(EventError::MalformedRange {
                start: range.start,
                end: range.end,
            });
        }

        let mut curr = range.start;
        while curr <= range.end {
            slots.push(curr);
            curr += gap;
        }
    }
    Ok(slots)
}

/// Compress a slot list into the minimal list of inclusive ranges.
///
/// Slots are sorted first; duplicates and unset (zero-value) entries
/// are silently dropped rather than rejected so that sloppy client
/// payloads still compress to something sensible. Returns an empty list
/// for empty input.
pub fn slots_to_ranges(slots: &[NaiveDateTime], gap: Duration) -> Vec<TimeRange> {
    let mut sorted = slots.to_vec();
    sorted.sort();
    sorted.dedup();
    sorted.retain(|slot| *slot != NaiveDateTime::default());

    let Some((&first, rest)) = sorted.split_first() else {
        return Vec::new();
    };

    let mut ranges: Vec<TimeRange> = Vec::new();
    let mut start = first;
    let mut prev = first;
    for &curr in rest {
        // A gap other than one step closes the current range
        if curr - prev != gap {
            ranges.push(TimeRange { start, end: prev });
            start = curr;
        }
        prev = curr;
    }

    // Close the trailing range; when the input was a single slot the
    // loop never ran and nothing has been appended yet
    if ranges.last().map(|r| r.end) != Some(prev) {
        ranges.push(TimeRange { start, end: prev });
    }

    ranges
}
