// 📅 Calendar Event Entity ("evento calendario")
//
// Same urgency semantics as a deadline (the classifier treats both through
// the Dated trait), with a time window and a location on top.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::deadline::Priority;
use super::format_record_date;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Stable identity (UUID)
    #[serde(default = "super::default_uuid")]
    pub id: String,

    pub title: String,

    /// Event date in record format (DD/MM/YYYY)
    pub date: String,

    /// "HH:MM"
    pub start_time: String,

    /// "HH:MM"
    pub end_time: String,

    /// Kind label ("Sopralluogo", "Riunione", "Consegna", "Formazione", ...)
    pub kind: String,

    /// Client name, None when not tied to a client. Logical reference only.
    #[serde(default)]
    pub client_ref: Option<String>,

    /// Quote number, None when not tied to a quote. Logical reference only.
    #[serde(default)]
    pub quote_ref: Option<String>,

    pub priority: Priority,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub notes: String,

    /// Lifecycle status ("Programmato" until it happens)
    #[serde(default = "default_event_status")]
    pub status: String,
}

fn default_event_status() -> String {
    "Programmato".to_string()
}

impl CalendarEvent {
    pub fn new(
        title: &str,
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
        kind: &str,
        priority: Priority,
    ) -> Self {
        CalendarEvent {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            date: format_record_date(date),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            kind: kind.to_string(),
            client_ref: None,
            quote_ref: None,
            priority,
            location: None,
            notes: String::new(),
            status: default_event_status(),
        }
    }

    pub fn for_client(mut self, client_ref: &str) -> Self {
        self.client_ref = Some(client_ref.to_string());
        self
    }

    pub fn for_quote(mut self, quote_ref: &str) -> Self {
        self.quote_ref = Some(quote_ref.to_string());
        self
    }

    pub fn at(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_defaults() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let event = CalendarEvent::new(
            "Sopralluogo Rossi Costruzioni",
            date,
            "09:00",
            "11:00",
            "Sopralluogo",
            Priority::High,
        )
        .for_client("Rossi Costruzioni SRL")
        .for_quote("PREV-001")
        .at("Via Roma 123, Milano");

        assert_eq!(event.date, "02/01/2025");
        assert_eq!(event.status, "Programmato");
        assert_eq!(event.location.as_deref(), Some("Via Roma 123, Milano"));
        assert_eq!(event.quote_ref.as_deref(), Some("PREV-001"));
    }

    #[test]
    fn test_standalone_event_has_no_refs() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
        let event = CalendarEvent::new(
            "Corso Aggiornamento CAD",
            date,
            "09:00",
            "17:00",
            "Formazione",
            Priority::Low,
        );

        assert!(event.client_ref.is_none());
        assert!(event.quote_ref.is_none());
    }
}
