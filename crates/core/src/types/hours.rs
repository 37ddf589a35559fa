//! Weekly opening hours and the slot-overlap predicate.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// One opening-hours slot of a shop's week.
///
/// A slot spans `[open_at, close_at)` on a single day. A shop owns a list of
/// these; the invariant enforced at create/update time is that no two slots
/// of the same shop overlap on the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    /// Day of week the slot applies to.
    pub day: Weekday,
    /// Opening time, inclusive.
    pub open_at: NaiveTime,
    /// Closing time, exclusive.
    pub close_at: NaiveTime,
}

impl OpeningHours {
    /// Create a slot.
    #[must_use]
    pub const fn new(day: Weekday, open_at: NaiveTime, close_at: NaiveTime) -> Self {
        Self {
            day,
            open_at,
            close_at,
        }
    }

    /// Whether two slots collide.
    ///
    /// Slots on different days never conflict. On the same day, a conflict is
    /// either strict containment (one slot entirely inside the other) or a
    /// partial overlap (one slot's opening time strictly inside the other's
    /// span). All comparisons are strict: slots that merely touch at an
    /// endpoint do not conflict, and neither do two identical slots.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        if self.day != other.day {
            return false;
        }
        // Containment, either direction.
        if self.open_at < other.open_at && self.close_at > other.close_at {
            return true;
        }
        if other.open_at < self.open_at && other.close_at > self.close_at {
            return true;
        }
        // Partial overlap, either direction.
        if self.open_at < other.open_at && self.close_at > other.open_at {
            return true;
        }
        if other.open_at < self.open_at && other.close_at > self.open_at {
            return true;
        }
        false
    }
}

/// Whether any two distinct slots in `entries` conflict.
///
/// Compares unordered index pairs, so a slot is never tested against itself.
#[must_use]
pub fn overlapping(entries: &[OpeningHours]) -> bool {
    entries
        .iter()
        .enumerate()
        .any(|(i, a)| entries.iter().skip(i + 1).any(|b| a.conflicts_with(b)))
}
