// 👥 Client Entity
//
// A client is identified downstream by its name: quotes, deadlines and
// calendar events all carry the client name as their reference key. The
// UUID exists for the backing store; it is never what other records point at.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::format_record_date;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Stable identity (UUID) - assigned once, never changes
    #[serde(default = "super::default_uuid")]
    pub id: String,

    /// Business name ("Rossi Costruzioni SRL") - the reference key
    pub name: String,

    /// Who brought this client in, if known
    #[serde(default)]
    pub referrer: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    /// Creation date in record format (DD/MM/YYYY)
    pub created_on: String,
}

impl Client {
    /// Create a new client from the form-submission fields
    pub fn new(name: &str, created_on: NaiveDate) -> Self {
        Client {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            referrer: None,
            email: None,
            phone: None,
            notes: None,
            created_on: format_record_date(created_on),
        }
    }

    pub fn with_contact(mut self, email: &str, phone: &str) -> Self {
        self.email = Some(email.to_string());
        self.phone = Some(phone.to_string());
        self
    }

    pub fn with_referrer(mut self, referrer: &str) -> Self {
        self.referrer = Some(referrer.to_string());
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_has_identity() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 15).unwrap();
        let client = Client::new("Rossi Costruzioni SRL", date);

        assert!(!client.id.is_empty());
        assert_eq!(client.name, "Rossi Costruzioni SRL");
        assert_eq!(client.created_on, "15/12/2024");
        assert!(client.email.is_none());
    }

    #[test]
    fn test_builder_helpers() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 15).unwrap();
        let client = Client::new("Verdi Impianti", date)
            .with_contact("m.verdi@email.com", "347-555777")
            .with_referrer("Passaparola")
            .with_notes("Azienda innovativa");

        assert_eq!(client.email.as_deref(), Some("m.verdi@email.com"));
        assert_eq!(client.referrer.as_deref(), Some("Passaparola"));
    }

    #[test]
    fn test_serde_missing_optionals() {
        // A row created before the referrer column existed must still load
        let json = r#"{"name": "Studio Legale Bianchi", "created_on": "10/12/2024"}"#;
        let client: Client = serde_json::from_str(json).unwrap();

        assert_eq!(client.name, "Studio Legale Bianchi");
        assert!(client.referrer.is_none());
        assert!(!client.id.is_empty());
    }
}
