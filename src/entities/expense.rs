// 💸 Expense Entity ("spesa")
//
// An expense optionally points at a quote (`project_ref` = quote number) and
// is flagged for tax deductibility. The reference is never validated against
// the quote list - an unknown project just aggregates under its own key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::format_record_date;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Stable identity (UUID)
    #[serde(default = "super::default_uuid")]
    pub id: String,

    /// Expense date in record format (DD/MM/YYYY)
    pub date: String,

    /// Category label ("Trasporti", "Materiali", "Formazione", ...)
    pub category: String,

    pub description: String,

    /// Amount in euro. Missing on the wire deserializes as 0.
    #[serde(default)]
    pub amount: f64,

    /// Quote number this expense belongs to, None for general overhead
    #[serde(default)]
    pub project_ref: Option<String>,

    /// Tax-deductible flag, aggregated separately for reporting
    #[serde(default)]
    pub deductible: bool,

    #[serde(default)]
    pub has_receipt: bool,
}

impl Expense {
    pub fn new(date: NaiveDate, category: &str, description: &str, amount: f64) -> Self {
        Expense {
            id: uuid::Uuid::new_v4().to_string(),
            date: format_record_date(date),
            category: category.to_string(),
            description: description.to_string(),
            amount,
            project_ref: None,
            deductible: false,
            has_receipt: false,
        }
    }

    pub fn with_project(mut self, project_ref: &str) -> Self {
        self.project_ref = Some(project_ref.to_string());
        self
    }

    pub fn deductible(mut self, has_receipt: bool) -> Self {
        self.deductible = true;
        self.has_receipt = has_receipt;
        self
    }
}
