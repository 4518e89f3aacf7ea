use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::SlotError;
use super::types::Slot;

/// Distance between consecutive slots within a day
pub const SLOT_STRIDE_MINUTES: u32 = 30;

/// Parses a time string (HH:MM) to minutes since midnight
pub fn parse_time_to_minutes(time_str: &str) -> Option<u32> {
    let (hours, minutes) = time_str.trim().split_once(':')?;
    if hours.is_empty() || minutes.len() != 2 {
        return None;
    }
    if !hours.chars().chain(minutes.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Parses a calendar date (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
}

/// Number of ticks in one day's window, end inclusive
pub fn slots_per_day(start_minutes: u32, end_minutes: u32) -> usize {
    if end_minutes < start_minutes {
        return 0;
    }
    ((end_minutes - start_minutes) / SLOT_STRIDE_MINUTES + 1) as usize
}

/// Converts a local wall-clock tick to an absolute slot.
/// A tick inside a spring-forward gap does not exist and yields None;
/// a fall-back tick resolves to the earlier instant.
fn local_slot(tz: Tz, date: NaiveDate, minutes: u32) -> Option<Slot> {
    let time = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)?;
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| Slot::new(dt.with_timezone(&Utc)))
}

/// Emits slots for already-parsed input. Dates come out ascending because
/// they are held in a sorted set.
pub fn slots_for_window(
    dates: &BTreeSet<NaiveDate>,
    start_minutes: u32,
    end_minutes: u32,
    tz: Tz,
) -> Vec<Slot> {
    let mut slots = Vec::with_capacity(dates.len() * slots_per_day(start_minutes, end_minutes));
    for &date in dates {
        let mut current = start_minutes;
        while current <= end_minutes {
            if let Some(slot) = local_slot(tz, date, current) {
                slots.push(slot);
            }
            current += SLOT_STRIDE_MINUTES;
        }
    }
    slots
}

/// Builds the canonical slot sequence for a set of dates and a daily window.
///
/// Ticks start at `day_start` and advance every 30 minutes while they are
/// `<= day_end`, so a window that is not a multiple of 30 minutes still ends
/// on the last tick before the boundary. Duplicate dates collapse.
pub fn generate_slots<S: AsRef<str>>(
    dates: &[S],
    day_start: &str,
    day_end: &str,
    tz: Tz,
) -> Result<Vec<Slot>, SlotError> {
    if dates.is_empty() {
        return Err(SlotError::NoDates);
    }
    let start = parse_time_to_minutes(day_start)
        .ok_or_else(|| SlotError::InvalidStartTime(day_start.to_string()))?;
    let end = parse_time_to_minutes(day_end)
        .ok_or_else(|| SlotError::InvalidEndTime(day_end.to_string()))?;
    if end < start {
        return Err(SlotError::EndBeforeStart {
            start: day_start.to_string(),
            end: day_end.to_string(),
        });
    }

    let parsed = dates
        .iter()
        .map(|d| parse_date(d.as_ref()).ok_or_else(|| SlotError::InvalidDate(d.as_ref().to_string())))
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(slots_for_window(&parsed, start, end, tz))
}
