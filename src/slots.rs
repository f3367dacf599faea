//! Time-slot label ordering and the reserved break window.
//!
//! Slot labels are free text such as `"9:00 AM – 10:00 AM"` chosen by an
//! external configuration layer. Only the range *start* matters for
//! ordering; it is normalized to minutes since midnight with 12-hour
//! marker awareness.
//!
//! # Lenient Degrade
//! A label whose start cannot be parsed sorts with key 0 (first) rather
//! than failing the whole sort. Callers must tolerate imprecise ordering
//! for malformed labels; they never see an error from here.

use itertools::Itertools;

/// Canonical label of the reserved break window.
///
/// Injected into the slot set before generation when absent; never
/// assignable to any entry.
pub const BREAK_SLOT: &str = "11:30 – 01:00";

/// Accepted range separators, checked in this order.
const RANGE_SEPARATORS: [char; 3] = ['–', '—', '-'];

/// Returns the sort key (minutes since midnight) for a slot label.
///
/// Parse failures map to 0 — see the module-level lenient-degrade note.
pub fn slot_sort_key(slot: &str) -> u32 {
    parse_start_minutes(slot).unwrap_or(0)
}

/// Parses the start time of a slot label into minutes since midnight.
///
/// The start is the substring before the first recognized range
/// separator. Within it, `hour[:minute]` is read from the first
/// whitespace token and normalized:
/// - explicit PM adds 12 hours unless the hour is already 12;
/// - explicit AM maps hour 12 to 0;
/// - no marker with hour in `[1, 7)` assumes afternoon and adds 12
///   (disambiguates short institutional formats like `"2:00 - 3:00"`).
///
/// Hours above 23 or minutes above 59 are treated as malformed.
fn parse_start_minutes(slot: &str) -> Option<u32> {
    let mut start = slot.trim();
    for sep in RANGE_SEPARATORS {
        if let Some((head, _)) = slot.split_once(sep) {
            start = head.trim();
            break;
        }
    }

    let upper = start.to_uppercase();
    let pm = upper.contains("PM") || upper.contains("P.M.");
    let am = upper.contains("AM") || upper.contains("A.M.");

    let token = start.split_whitespace().next()?;
    let (hour, minute) = match token.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None => (token.parse::<u32>().ok()?, 0),
    };
    // Anything outside a clock face is malformed, not a huge key
    if hour > 23 || minute > 59 {
        return None;
    }

    let hour = if pm {
        if hour == 12 {
            hour
        } else {
            hour + 12
        }
    } else if am {
        if hour == 12 {
            0
        } else {
            hour
        }
    } else if (1..7).contains(&hour) {
        hour + 12
    } else {
        hour
    };

    Some(hour * 60 + minute)
}

/// Deduplicates slot labels (first occurrence wins) and sorts them
/// ascending by inferred start time. The sort is stable, so labels with
/// equal keys — including unparseable ones — keep their input order.
pub fn sort_time_slots<S: AsRef<str>>(slots: &[S]) -> Vec<String> {
    let mut unique: Vec<String> = slots
        .iter()
        .map(|s| s.as_ref().to_string())
        .unique()
        .collect();
    unique.sort_by_key(|s| slot_sort_key(s));
    unique
}

/// Injects the reserved break slot (when absent) and re-sorts the set.
///
/// Generation always runs over the result of this call, so the break
/// window exists even if the caller never configured it.
pub fn prepare_time_slots<S: AsRef<str>>(slots: &[S]) -> Vec<String> {
    let mut all: Vec<String> = slots.iter().map(|s| s.as_ref().to_string()).collect();
    if !all.iter().any(|s| s == BREAK_SLOT) {
        all.push(BREAK_SLOT.to_string());
    }
    sort_time_slots(&all)
}

/// Whether a slot label denotes the reserved break window.
///
/// Matched structurally (start token `11:30`, end beginning `01:00`,
/// any accepted separator) rather than by exact string equality, so
/// spacing variants of the label are still protected.
pub fn is_break_slot(slot: &str) -> bool {
    for sep in RANGE_SEPARATORS {
        if let Some((start, end)) = slot.split_once(sep) {
            if start.trim() == "11:30" && end.trim().starts_with("01:00") {
                return true;
            }
        }
    }
    false
}
