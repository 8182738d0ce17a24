// ⏰ Urgency Classifier - how soon is a dated item due?
//
// One shared classification for deadlines and calendar events, replacing the
// per-screen reimplementations that had drifted apart. The day count is
// always recomputed from the record date and "today"; nothing here caches.
//
// Buckets, applied in this fixed precedence order:
//   days < 0        → OVERDUE
//   0 <= days <= 3  → URGENT
//   4 <= days <= 7  → UPCOMING
//   days > 7        → FUTURE

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::parse_record_date;

// ============================================================================
// BUCKET
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UrgencyBucket {
    Overdue,
    Urgent,
    Upcoming,
    Future,
}

impl UrgencyBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyBucket::Overdue => "OVERDUE",
            UrgencyBucket::Urgent => "URGENT",
            UrgencyBucket::Upcoming => "UPCOMING",
            UrgencyBucket::Future => "FUTURE",
        }
    }

    /// Italian dashboard label ("🔴 Scadute", the original screen wording)
    pub fn label(&self) -> &'static str {
        match self {
            UrgencyBucket::Overdue => "Scadute",
            UrgencyBucket::Urgent => "Urgenti (≤3gg)",
            UrgencyBucket::Upcoming => "Prossime (4-7gg)",
            UrgencyBucket::Future => "Future (>7gg)",
        }
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// A classified dated item: signed whole-day distance plus its bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Urgency {
    /// due_date - today, in whole days (negative = already past)
    pub days_remaining: i64,
    pub bucket: UrgencyBucket,
}

/// Classify a due date against today. Total - every date pair maps to
/// exactly one bucket, boundaries 0/3/4/7 included.
pub fn classify(due_date: NaiveDate, today: NaiveDate) -> Urgency {
    let days_remaining = (due_date - today).num_days();

    let bucket = if days_remaining < 0 {
        UrgencyBucket::Overdue
    } else if days_remaining <= 3 {
        UrgencyBucket::Urgent
    } else if days_remaining <= 7 {
        UrgencyBucket::Upcoming
    } else {
        UrgencyBucket::Future
    };

    Urgency {
        days_remaining,
        bucket,
    }
}

// ============================================================================
// DATED ITEMS
// ============================================================================

/// Anything carrying a due date in record format. Deadlines and calendar
/// events both qualify, which is what keeps their dashboards consistent.
pub trait Dated {
    fn due_date(&self) -> &str;
}

impl Dated for crate::entities::Deadline {
    fn due_date(&self) -> &str {
        &self.date
    }
}

impl Dated for crate::entities::CalendarEvent {
    fn due_date(&self) -> &str {
        &self.date
    }
}

/// Classify one dated item. None when its date string does not parse -
/// a recoverable per-item condition, counted by `summarize`.
pub fn classify_item<T: Dated>(item: &T, today: NaiveDate) -> Option<Urgency> {
    parse_record_date(item.due_date()).map(|due| classify(due, today))
}

// ============================================================================
// BATCH SUMMARY
// ============================================================================

/// Per-bucket tallies for a batch of dated items. Items whose date fails to
/// parse are not silently dropped: they surface in `unparsable`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencySummary {
    pub overdue: usize,
    pub urgent: usize,
    pub upcoming: usize,
    pub future: usize,
    pub unparsable: usize,
}

impl UrgencySummary {
    pub fn count(&self, bucket: UrgencyBucket) -> usize {
        match bucket {
            UrgencyBucket::Overdue => self.overdue,
            UrgencyBucket::Urgent => self.urgent,
            UrgencyBucket::Upcoming => self.upcoming,
            UrgencyBucket::Future => self.future,
        }
    }

    /// Classified items only (excludes unparsable)
    pub fn classified(&self) -> usize {
        self.overdue + self.urgent + self.upcoming + self.future
    }
}

/// Tally every item into its bucket. Never aborts the batch: a bad date on
/// one record costs that record a tally slot, nothing more.
pub fn summarize<T: Dated>(items: &[T], today: NaiveDate) -> UrgencySummary {
    let mut summary = UrgencySummary::default();

    for item in items {
        match classify_item(item, today) {
            Some(urgency) => match urgency.bucket {
                UrgencyBucket::Overdue => summary.overdue += 1,
                UrgencyBucket::Urgent => summary.urgent += 1,
                UrgencyBucket::Upcoming => summary.upcoming += 1,
                UrgencyBucket::Future => summary.future += 1,
            },
            None => summary.unparsable += 1,
        }
    }

    summary
}

/// Order items most-overdue/soonest first. Stable: equal day counts keep
/// their original relative order. Items with unparsable dates sort after
/// every classified item, also in original order.
pub fn sort_by_urgency<'a, T: Dated>(items: &'a [T], today: NaiveDate) -> Vec<&'a T> {
    let mut refs: Vec<&T> = items.iter().collect();
    refs.sort_by_key(|item| match classify_item(*item, today) {
        Some(urgency) => (false, urgency.days_remaining),
        None => (true, 0),
    });
    refs
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Deadline, Priority};

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 27).unwrap() + chrono::Duration::days(offset)
    }

    fn deadline_on(date: &str, title: &str) -> Deadline {
        let mut d = Deadline::new(title, day(0), "Preventivo", Priority::Medium);
        d.date = date.to_string();
        d
    }

    #[test]
    fn test_bucket_boundaries() {
        let today = day(0);
        let cases = [
            (-1, UrgencyBucket::Overdue),
            (0, UrgencyBucket::Urgent),
            (3, UrgencyBucket::Urgent),
            (4, UrgencyBucket::Upcoming),
            (7, UrgencyBucket::Upcoming),
            (8, UrgencyBucket::Future),
        ];

        for (offset, expected) in cases {
            let urgency = classify(day(offset), today);
            assert_eq!(urgency.days_remaining, offset);
            assert_eq!(urgency.bucket, expected, "offset {offset}");
        }
    }

    #[test]
    fn test_far_overdue_and_far_future() {
        let today = day(0);
        assert_eq!(classify(day(-90), today).bucket, UrgencyBucket::Overdue);
        assert_eq!(classify(day(-90), today).days_remaining, -90);
        assert_eq!(classify(day(365), today).bucket, UrgencyBucket::Future);
    }

    #[test]
    fn test_summarize_counts_and_surfaces_bad_dates() {
        let today = day(0);
        let items = vec![
            deadline_on("24/12/2024", "overdue"),     // -3
            deadline_on("27/12/2024", "today"),       // 0
            deadline_on("30/12/2024", "urgent edge"), // 3
            deadline_on("02/01/2025", "upcoming"),    // 6
            deadline_on("31/02/2025", "bad date"),    // does not exist
            deadline_on("15/01/2025", "future"),      // 19
        ];

        let summary = summarize(&items, today);
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.urgent, 2);
        assert_eq!(summary.upcoming, 1);
        assert_eq!(summary.future, 1);
        assert_eq!(summary.unparsable, 1);
        assert_eq!(summary.classified(), 5);

        println!("✅ Summary: {:?}", summary);
    }

    #[test]
    fn test_empty_batch_is_all_zero() {
        let summary = summarize::<Deadline>(&[], day(0));
        assert_eq!(summary, UrgencySummary::default());
    }

    #[test]
    fn test_sort_most_overdue_first() {
        let today = day(0);
        let items = vec![
            deadline_on("15/01/2025", "a"), // +19
            deadline_on("24/12/2024", "b"), // -3
            deadline_on("29/12/2024", "c"), // +2
        ];

        let sorted = sort_by_urgency(&items, today);
        let titles: Vec<&str> = sorted.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let today = day(0);
        let items = vec![
            deadline_on("30/12/2024", "first"),
            deadline_on("30/12/2024", "second"),
            deadline_on("30/12/2024", "third"),
        ];

        let sorted = sort_by_urgency(&items, today);
        let titles: Vec<&str> = sorted.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_sort_puts_unparsable_last_in_order() {
        let today = day(0);
        let items = vec![
            deadline_on("not-a-date", "bad1"),
            deadline_on("29/12/2024", "ok"),
            deadline_on("", "bad2"),
        ];

        let sorted = sort_by_urgency(&items, today);
        let titles: Vec<&str> = sorted.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["ok", "bad1", "bad2"]);
    }

    #[test]
    fn test_events_classify_like_deadlines() {
        use crate::entities::CalendarEvent;

        let today = day(0);
        let event = CalendarEvent::new(
            "Riunione Studio Legale Bianchi",
            day(2),
            "15:00",
            "16:30",
            "Riunione",
            Priority::Medium,
        );

        let urgency = classify_item(&event, today).unwrap();
        assert_eq!(urgency.days_remaining, 2);
        assert_eq!(urgency.bucket, UrgencyBucket::Urgent);
    }
}
