// 📄 Quote Entity ("preventivo")
//
// A quote carries a monetary value through a lifecycle:
// BOZZA → INVIATO → ACCETTATO | RIFIUTATO | SCADUTO
//
// The human-readable key is `number` ("PREV-001"); deadlines, calendar
// events and expenses reference quotes by number, not by UUID.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::format_record_date;

// ============================================================================
// QUOTE STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteStatus {
    /// Not yet sent to the client
    #[serde(rename = "BOZZA")]
    Draft,

    /// Sent, awaiting a response
    #[serde(rename = "INVIATO")]
    Sent,

    #[serde(rename = "ACCETTATO")]
    Accepted,

    #[serde(rename = "RIFIUTATO")]
    Rejected,

    /// Validity window elapsed without a response
    #[serde(rename = "SCADUTO")]
    Expired,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "BOZZA",
            QuoteStatus::Sent => "INVIATO",
            QuoteStatus::Accepted => "ACCETTATO",
            QuoteStatus::Rejected => "RIFIUTATO",
            QuoteStatus::Expired => "SCADUTO",
        }
    }

    /// Parse a stored status string. None for anything outside the fixed set.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BOZZA" => Some(QuoteStatus::Draft),
            "INVIATO" => Some(QuoteStatus::Sent),
            "ACCETTATO" => Some(QuoteStatus::Accepted),
            "RIFIUTATO" => Some(QuoteStatus::Rejected),
            "SCADUTO" => Some(QuoteStatus::Expired),
            _ => None,
        }
    }

    /// True once the quote has left draft state (counts toward success rate)
    pub fn left_draft(&self) -> bool {
        matches!(
            self,
            QuoteStatus::Sent | QuoteStatus::Accepted | QuoteStatus::Rejected
        )
    }

    /// True while the quote is unresolved (counts toward pipeline value)
    pub fn is_open(&self) -> bool {
        matches!(self, QuoteStatus::Draft | QuoteStatus::Sent)
    }
}

// ============================================================================
// QUOTE ENTITY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Stable identity (UUID)
    #[serde(default = "super::default_uuid")]
    pub id: String,

    /// Human-readable quote number ("PREV-001") - the reference key
    pub number: String,

    /// Client name this quote belongs to. Logical reference only:
    /// a quote naming an unknown client must not break any computation.
    pub client_ref: String,

    /// Short description of the work offered
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub notes: String,

    pub status: QuoteStatus,

    /// Creation date in record format (DD/MM/YYYY)
    pub created_on: String,

    /// Offer value in euro. Missing on the wire deserializes as 0.
    #[serde(default)]
    pub total_value: f64,

    /// Days the offer stays valid after creation
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,

    /// VAT percentage applied on invoicing
    #[serde(default = "default_vat_rate")]
    pub vat_rate: f64,
}

fn default_validity_days() -> u32 {
    30
}

fn default_vat_rate() -> f64 {
    22.0
}

impl Quote {
    /// Create a new draft quote from the form-submission fields
    pub fn new(number: &str, client_ref: &str, total_value: f64, created_on: NaiveDate) -> Self {
        Quote {
            id: uuid::Uuid::new_v4().to_string(),
            number: number.to_string(),
            client_ref: client_ref.to_string(),
            title: String::new(),
            notes: String::new(),
            status: QuoteStatus::Draft,
            created_on: format_record_date(created_on),
            total_value,
            validity_days: default_validity_days(),
            vat_rate: default_vat_rate(),
        }
    }

    pub fn with_status(mut self, status: QuoteStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_terms(mut self, validity_days: u32, vat_rate: f64) -> Self {
        self.validity_days = validity_days;
        self.vat_rate = vat_rate;
        self
    }
}
