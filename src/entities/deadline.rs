// ⏰ Deadline Entity ("scadenza")
//
// A dated obligation: quote expiry, payment due, certification renewal.
// Days-until-due is NEVER stored on the record - it would go stale the
// moment "today" moves - so urgency is always derived by the classifier
// from `date` at read time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::format_record_date;

// ============================================================================
// PRIORITY (shared with calendar events)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Media")]
    Medium,
    #[serde(rename = "Bassa")]
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "Alta",
            Priority::Medium => "Media",
            Priority::Low => "Bassa",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Alta" => Some(Priority::High),
            "Media" => Some(Priority::Medium),
            "Bassa" => Some(Priority::Low),
            _ => None,
        }
    }
}

// ============================================================================
// DEADLINE ENTITY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deadline {
    /// Stable identity (UUID)
    #[serde(default = "super::default_uuid")]
    pub id: String,

    pub title: String,

    /// Due date in record format (DD/MM/YYYY)
    pub date: String,

    /// Kind label ("Preventivo", "Pagamento", "Certificazione", ...)
    pub kind: String,

    /// Client name, None when not tied to a client. Logical reference only.
    #[serde(default)]
    pub client_ref: Option<String>,

    /// Quote number, None when not tied to a quote. Logical reference only.
    #[serde(default)]
    pub quote_ref: Option<String>,

    pub priority: Priority,

    #[serde(default)]
    pub description: String,

    /// Amount at stake, 0 when not applicable
    #[serde(default)]
    pub amount: f64,

    /// Lifecycle status ("Attiva" until closed out)
    #[serde(default = "default_deadline_status")]
    pub status: String,
}

fn default_deadline_status() -> String {
    "Attiva".to_string()
}

impl Deadline {
    pub fn new(title: &str, date: NaiveDate, kind: &str, priority: Priority) -> Self {
        Deadline {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            date: format_record_date(date),
            kind: kind.to_string(),
            client_ref: None,
            quote_ref: None,
            priority,
            description: String::new(),
            amount: 0.0,
            status: default_deadline_status(),
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

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_deadline_defaults() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let deadline = Deadline::new("Scadenza Preventivo PREV-001", date, "Preventivo", Priority::High)
            .for_client("Rossi Costruzioni SRL")
            .for_quote("PREV-001")
            .with_amount(1970.0);

        assert_eq!(deadline.date, "05/01/2025");
        assert_eq!(deadline.status, "Attiva");
        assert_eq!(deadline.quote_ref.as_deref(), Some("PREV-001"));
        assert_eq!(deadline.amount, 1970.0);
    }

    #[test]
    fn test_priority_wire_strings() {
        assert_eq!(Priority::High.as_str(), "Alta");
        assert_eq!(Priority::parse("Bassa"), Some(Priority::Low));
        assert_eq!(Priority::parse("Urgente"), None);
    }

    #[test]
    fn test_no_days_remaining_field_on_the_wire() {
        // A stored row carrying a stale giorni_rimanenti must deserialize
        // fine and the stale value must simply be ignored
        let json = r#"{
            "title": "Rinnovo Contratto Software",
            "date": "25/12/2024",
            "kind": "Rinnovo",
            "priority": "Bassa",
            "giorni_rimanenti": -3
        }"#;
        let deadline: Deadline = serde_json::from_str(json).unwrap();
        assert_eq!(deadline.date, "25/12/2024");
    }
}
