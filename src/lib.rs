// Talento Suite - Core Library
// Business-management computations: metrics, urgency, demo data, record store

pub mod entities;
pub mod metrics;
pub mod urgency;
pub mod demo;
pub mod store;
pub mod export;

// Re-export commonly used types
pub use entities::{
    CalendarEvent, Client, Deadline, Expense, Priority, Quote, QuoteStatus,
    parse_record_date, format_record_date, DATE_FORMAT,
};
pub use metrics::{
    MetricsEngine, QuoteStats, ExpenseStats, ProfitReport, ClientValue,
};
pub use urgency::{
    classify, classify_item, summarize, sort_by_urgency,
    Dated, Urgency, UrgencyBucket, UrgencySummary,
};
pub use demo::DemoDataset;
pub use store::{
    RecordStore, SqliteStore, MemoryStore, StoreError, StoreResult, AuditEvent,
};
pub use export::{format_eur, format_percent, profit_report_csv, write_profit_report_csv};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
