// Entity Models - clients, quotes, expenses, deadlines, calendar events
//
// Each entity has a stable identity (UUID) plus the human-readable key the
// other records reference it by (client name, quote number). References are
// logical, not enforced foreign keys - consumers must tolerate dangling refs.

pub mod client;
pub mod quote;
pub mod expense;
pub mod deadline;
pub mod event;

pub use client::Client;
pub use quote::{Quote, QuoteStatus};
pub use expense::Expense;
pub use deadline::{Deadline, Priority};
pub use event::CalendarEvent;

use chrono::NaiveDate;

/// Display format every record date is stored in ("25/12/2024")
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a record date string. None on malformed input - callers treat that
/// as a recoverable per-record condition, never an abort.
pub fn parse_record_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()
}

/// Format a date back into the record wire format
pub fn format_record_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// Serde default so rows deserialized without an id still get an identity
pub(crate) fn default_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}
