//! Event lifecycle classification.
//!
//! One pure function derives the temporal state of an event from its
//! stored status and timestamps. Every joinability decision in the
//! engine goes through [`classify`]; no call site compares start/end
//! timestamps on its own.

use chrono::{DateTime, Duration, Utc};

use crate::events::EventStatus;

/// Classification horizon for events without an end timestamp: they are
/// considered over this long after their start.
pub const DEFAULT_EVENT_DURATION_HOURS: i64 = 6;

/// Temporal state of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventState {
    Scheduled,
    InProgress,
    Ended,
    Cancelled,
}

impl EventState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Ended => "ended",
            Self::Cancelled => "cancelled",
        }
    }

    /// Ordinary users may register only while the event is Scheduled.
    pub fn accepts_registrations(self) -> bool {
        matches!(self, Self::Scheduled)
    }

    /// Ordinary users may withdraw until the event has Ended.
    pub fn allows_unregistration(self) -> bool {
        !matches!(self, Self::Ended)
    }
}

/// Classifies an event at instant `now`.
///
/// A stored cancellation overrides any time-based state. A missing end
/// is treated as `start + DEFAULT_EVENT_DURATION_HOURS`.
pub fn classify(
    status: EventStatus,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> EventState {
    if status == EventStatus::Cancelled {
        return EventState::Cancelled;
    }
    if now < start {
        return EventState::Scheduled;
    }
    let end = end.unwrap_or(start + Duration::hours(DEFAULT_EVENT_DURATION_HOURS));
    if now >= end {
        EventState::Ended
    } else {
        EventState::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    #[test]
    fn cancelled_overrides_time() {
        let state = classify(EventStatus::Cancelled, at(10), Some(at(12)), at(11));
        assert_eq!(state, EventState::Cancelled);
    }

    #[test]
    fn before_start_is_scheduled() {
        let state = classify(EventStatus::Active, at(10), Some(at(12)), at(9));
        assert_eq!(state, EventState::Scheduled);
    }

    #[test]
    fn between_start_and_end_is_in_progress() {
        let state = classify(EventStatus::Active, at(10), Some(at(12)), at(10));
        assert_eq!(state, EventState::InProgress);
    }

    #[test]
    fn at_end_is_ended() {
        let state = classify(EventStatus::Active, at(10), Some(at(12)), at(12));
        assert_eq!(state, EventState::Ended);
    }

    #[test]
    fn missing_end_ends_after_default_duration() {
        let start = at(10);
        let state = classify(EventStatus::Active, start, None, at(13));
        assert_eq!(state, EventState::InProgress);
        let later = start + Duration::hours(DEFAULT_EVENT_DURATION_HOURS);
        let state = classify(EventStatus::Active, start, None, later);
        assert_eq!(state, EventState::Ended);
    }

    #[test]
    fn registration_windows() {
        assert!(EventState::Scheduled.accepts_registrations());
        assert!(!EventState::InProgress.accepts_registrations());
        assert!(!EventState::Cancelled.accepts_registrations());

        assert!(EventState::Scheduled.allows_unregistration());
        assert!(EventState::InProgress.allows_unregistration());
        assert!(EventState::Cancelled.allows_unregistration());
        assert!(!EventState::Ended.allows_unregistration());
    }
}
