// 🗄️ Record Store - the keyed-table collaborator behind every screen
//
// The computation modules never talk to storage; they take snapshots. This
// module is the seam that produces those snapshots: a narrow trait with
// per-entity create/list (plus quote status update), implemented over SQLite
// and over plain vectors for tests.
//
// Failures are typed, never swallowed into a boolean: callers must be able
// to tell "the table is empty" from "the store is unreachable".
// Deletion is deliberately absent from the trait.

use std::collections::HashMap;

use chrono::Utc;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::entities::{CalendarEvent, Client, Deadline, Expense, Priority, Quote, QuoteStatus};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Transport/connection failure - the caller may retry or degrade
    Unavailable(String),
    /// The store refused the row (constraint, malformed data)
    Rejected(String),
    /// Update target does not exist
    NotFound(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            StoreError::Rejected(msg) => write!(f, "store rejected operation: {}", msg),
            StoreError::NotFound(msg) => write!(f, "not found: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

fn db_err(e: rusqlite::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

// ============================================================================
// RECORD STORE TRAIT
// ============================================================================

/// Narrow interface every backend must expose. Create returns the id of the
/// stored row; creating a record that already exists (same idempotency hash)
/// is a no-op returning the existing id, which is what lets the demo loader
/// run twice without duplicating anything.
pub trait RecordStore {
    fn add_client(&mut self, client: &Client) -> StoreResult<String>;
    fn clients(&self) -> StoreResult<Vec<Client>>;

    fn add_quote(&mut self, quote: &Quote) -> StoreResult<String>;
    fn quotes(&self) -> StoreResult<Vec<Quote>>;
    /// The only whole-record mutation any screen needs
    fn update_quote_status(&mut self, quote_id: &str, status: QuoteStatus) -> StoreResult<()>;

    fn add_expense(&mut self, expense: &Expense) -> StoreResult<String>;
    fn expenses(&self) -> StoreResult<Vec<Expense>>;

    fn add_deadline(&mut self, deadline: &Deadline) -> StoreResult<String>;
    fn deadlines(&self) -> StoreResult<Vec<Deadline>>;

    fn add_event(&mut self, event: &CalendarEvent) -> StoreResult<String>;
    fn events(&self) -> StoreResult<Vec<CalendarEvent>>;
}

// ============================================================================
// IDEMPOTENCY HASHES
// Duplicate detection, not identity: identity is the UUID
// ============================================================================

fn sha_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    format!("{:x}", hasher.finalize())
}

fn client_hash(c: &Client) -> String {
    sha_hex(&format!("client:{}:{}", c.name, c.created_on))
}

fn quote_hash(q: &Quote) -> String {
    sha_hex(&format!("quote:{}:{}:{}", q.number, q.client_ref, q.created_on))
}

fn expense_hash(e: &Expense) -> String {
    sha_hex(&format!("expense:{}:{}:{}", e.date, e.description, e.amount))
}

fn deadline_hash(d: &Deadline) -> String {
    sha_hex(&format!("deadline:{}:{}", d.title, d.date))
}

fn event_hash(ev: &CalendarEvent) -> String {
    sha_hex(&format!("event:{}:{}:{}", ev.title, ev.date, ev.start_time))
}

// ============================================================================
// AUDIT EVENTS
// ============================================================================

/// Audit-trail row: every create/update leaves one behind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
}

impl AuditEvent {
    fn new(event_type: &str, entity_type: &str, entity_id: &str, data: serde_json::Value) -> Self {
        AuditEvent {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
        }
    }
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// SQLite-backed store. Table names follow the hosted backend this replaced
/// (clienti, preventivi, spese, scadenze, eventi_calendario).
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(db_err)?;
        let store = SqliteStore { conn };
        store.setup_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        let store = SqliteStore { conn };
        store.setup_schema()?;
        Ok(store)
    }

    fn setup_schema(&self) -> StoreResult<()> {
        // WAL mode for crash recovery
        self.conn
            .pragma_update(None, "journal_mode", "WAL")
            .map_err(db_err)?;

        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS clienti (
                    id TEXT PRIMARY KEY,
                    idempotency_hash TEXT UNIQUE NOT NULL,
                    name TEXT NOT NULL,
                    referrer TEXT,
                    email TEXT,
                    phone TEXT,
                    notes TEXT,
                    created_on TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS preventivi (
                    id TEXT PRIMARY KEY,
                    idempotency_hash TEXT UNIQUE NOT NULL,
                    number TEXT NOT NULL,
                    client_ref TEXT NOT NULL,
                    title TEXT NOT NULL,
                    notes TEXT NOT NULL,
                    status TEXT NOT NULL,
                    created_on TEXT NOT NULL,
                    total_value REAL NOT NULL,
                    validity_days INTEGER NOT NULL,
                    vat_rate REAL NOT NULL
                );
                CREATE TABLE IF NOT EXISTS spese (
                    id TEXT PRIMARY KEY,
                    idempotency_hash TEXT UNIQUE NOT NULL,
                    date TEXT NOT NULL,
                    category TEXT NOT NULL,
                    description TEXT NOT NULL,
                    amount REAL NOT NULL,
                    project_ref TEXT,
                    deductible INTEGER NOT NULL,
                    has_receipt INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS scadenze (
                    id TEXT PRIMARY KEY,
                    idempotency_hash TEXT UNIQUE NOT NULL,
                    title TEXT NOT NULL,
                    date TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    client_ref TEXT,
                    quote_ref TEXT,
                    priority TEXT NOT NULL,
                    description TEXT NOT NULL,
                    amount REAL NOT NULL,
                    status TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS eventi_calendario (
                    id TEXT PRIMARY KEY,
                    idempotency_hash TEXT UNIQUE NOT NULL,
                    title TEXT NOT NULL,
                    date TEXT NOT NULL,
                    start_time TEXT NOT NULL,
                    end_time TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    client_ref TEXT,
                    quote_ref TEXT,
                    priority TEXT NOT NULL,
                    location TEXT,
                    notes TEXT NOT NULL,
                    status TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS events (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    event_id TEXT UNIQUE NOT NULL,
                    timestamp TEXT NOT NULL,
                    event_type TEXT NOT NULL,
                    entity_type TEXT NOT NULL,
                    entity_id TEXT NOT NULL,
                    data TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_preventivi_status ON preventivi(status);
                CREATE INDEX IF NOT EXISTS idx_preventivi_client ON preventivi(client_ref);
                CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_type, entity_id);",
            )
            .map_err(db_err)?;

        Ok(())
    }

    fn log_event(&self, event: AuditEvent) -> StoreResult<()> {
        let data_json = serde_json::to_string(&event.data)
            .map_err(|e| StoreError::Rejected(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO events (event_id, timestamp, event_type, entity_type, entity_id, data)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    event.event_id,
                    event.timestamp.to_rfc3339(),
                    event.event_type,
                    event.entity_type,
                    event.entity_id,
                    data_json,
                ],
            )
            .map_err(db_err)?;

        Ok(())
    }

    /// Audit trail for one entity type, oldest first
    pub fn audit_events(&self, entity_type: &str) -> StoreResult<Vec<AuditEvent>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT event_id, timestamp, event_type, entity_type, entity_id, data
                 FROM events WHERE entity_type = ?1 ORDER BY id",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![entity_type], |row| {
                let timestamp: String = row.get(1)?;
                let data: String = row.get(5)?;
                Ok(AuditEvent {
                    event_id: row.get(0)?,
                    timestamp: chrono::DateTime::parse_from_rfc3339(&timestamp)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now()),
                    event_type: row.get(2)?,
                    entity_type: row.get(3)?,
                    entity_id: row.get(4)?,
                    data: serde_json::from_str(&data).unwrap_or(serde_json::Value::Null),
                })
            })
            .map_err(db_err)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    /// Insert with duplicate detection: OR IGNORE plus a lookup of the
    /// surviving row when the hash already existed
    fn existing_id(&self, table: &str, hash: &str) -> StoreResult<String> {
        let sql = format!("SELECT id FROM {} WHERE idempotency_hash = ?1", table);
        self.conn
            .query_row(&sql, params![hash], |row| row.get(0))
            .map_err(|e| match e {
                // Insert was ignored but not because of the hash: some other
                // constraint (reused id) blocked it. That is a rejection of
                // the record, not a transport failure.
                rusqlite::Error::QueryReturnedNoRows => StoreError::Rejected(format!(
                    "insert into {} conflicted outside the idempotency hash",
                    table
                )),
                other => db_err(other),
            })
    }
}

impl RecordStore for SqliteStore {
    fn add_client(&mut self, client: &Client) -> StoreResult<String> {
        let hash = client_hash(client);
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO clienti
                 (id, idempotency_hash, name, referrer, email, phone, notes, created_on)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    client.id,
                    hash,
                    client.name,
                    client.referrer,
                    client.email,
                    client.phone,
                    client.notes,
                    client.created_on,
                ],
            )
            .map_err(db_err)?;

        if inserted == 0 {
            return self.existing_id("clienti", &hash);
        }

        self.log_event(AuditEvent::new(
            "client_added",
            "client",
            &client.id,
            serde_json::json!({ "name": client.name }),
        ))?;
        Ok(client.id.clone())
    }

    fn clients(&self) -> StoreResult<Vec<Client>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, referrer, email, phone, notes, created_on FROM clienti",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Client {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    referrer: row.get(2)?,
                    email: row.get(3)?,
                    phone: row.get(4)?,
                    notes: row.get(5)?,
                    created_on: row.get(6)?,
                })
            })
            .map_err(db_err)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    fn add_quote(&mut self, quote: &Quote) -> StoreResult<String> {
        let hash = quote_hash(quote);
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO preventivi
                 (id, idempotency_hash, number, client_ref, title, notes, status,
                  created_on, total_value, validity_days, vat_rate)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    quote.id,
                    hash,
                    quote.number,
                    quote.client_ref,
                    quote.title,
                    quote.notes,
                    quote.status.as_str(),
                    quote.created_on,
                    quote.total_value,
                    quote.validity_days,
                    quote.vat_rate,
                ],
            )
            .map_err(db_err)?;

        if inserted == 0 {
            return self.existing_id("preventivi", &hash);
        }

        self.log_event(AuditEvent::new(
            "quote_added",
            "quote",
            &quote.id,
            serde_json::json!({
                "number": quote.number,
                "client": quote.client_ref,
                "total_value": quote.total_value,
            }),
        ))?;
        Ok(quote.id.clone())
    }

    fn quotes(&self) -> StoreResult<Vec<Quote>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, number, client_ref, title, notes, status, created_on,
                        total_value, validity_days, vat_rate
                 FROM preventivi",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map([], |row| {
                let status: String = row.get(5)?;
                Ok(Quote {
                    id: row.get(0)?,
                    number: row.get(1)?,
                    client_ref: row.get(2)?,
                    title: row.get(3)?,
                    notes: row.get(4)?,
                    // Unknown status strings degrade to Draft (tolerated
                    // malformed input, counts in pipeline, never in revenue)
                    status: QuoteStatus::parse(&status).unwrap_or(QuoteStatus::Draft),
                    created_on: row.get(6)?,
                    total_value: row.get(7)?,
                    validity_days: row.get(8)?,
                    vat_rate: row.get(9)?,
                })
            })
            .map_err(db_err)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    fn update_quote_status(&mut self, quote_id: &str, status: QuoteStatus) -> StoreResult<()> {
        let updated = self
            .conn
            .execute(
                "UPDATE preventivi SET status = ?1 WHERE id = ?2",
                params![status.as_str(), quote_id],
            )
            .map_err(db_err)?;

        if updated == 0 {
            return Err(StoreError::NotFound(format!("quote {}", quote_id)));
        }

        self.log_event(AuditEvent::new(
            "quote_status_changed",
            "quote",
            quote_id,
            serde_json::json!({ "status": status.as_str() }),
        ))?;
        Ok(())
    }

    fn add_expense(&mut self, expense: &Expense) -> StoreResult<String> {
        let hash = expense_hash(expense);
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO spese
                 (id, idempotency_hash, date, category, description, amount,
                  project_ref, deductible, has_receipt)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    expense.id,
                    hash,
                    expense.date,
                    expense.category,
                    expense.description,
                    expense.amount,
                    expense.project_ref,
                    expense.deductible,
                    expense.has_receipt,
                ],
            )
            .map_err(db_err)?;

        if inserted == 0 {
            return self.existing_id("spese", &hash);
        }

        self.log_event(AuditEvent::new(
            "expense_added",
            "expense",
            &expense.id,
            serde_json::json!({ "category": expense.category, "amount": expense.amount }),
        ))?;
        Ok(expense.id.clone())
    }

    fn expenses(&self) -> StoreResult<Vec<Expense>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, date, category, description, amount, project_ref,
                        deductible, has_receipt
                 FROM spese",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Expense {
                    id: row.get(0)?,
                    date: row.get(1)?,
                    category: row.get(2)?,
                    description: row.get(3)?,
                    amount: row.get(4)?,
                    project_ref: row.get(5)?,
                    deductible: row.get(6)?,
                    has_receipt: row.get(7)?,
                })
            })
            .map_err(db_err)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    fn add_deadline(&mut self, deadline: &Deadline) -> StoreResult<String> {
        let hash = deadline_hash(deadline);
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO scadenze
                 (id, idempotency_hash, title, date, kind, client_ref, quote_ref,
                  priority, description, amount, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    deadline.id,
                    hash,
                    deadline.title,
                    deadline.date,
                    deadline.kind,
                    deadline.client_ref,
                    deadline.quote_ref,
                    deadline.priority.as_str(),
                    deadline.description,
                    deadline.amount,
                    deadline.status,
                ],
            )
            .map_err(db_err)?;

        if inserted == 0 {
            return self.existing_id("scadenze", &hash);
        }

        self.log_event(AuditEvent::new(
            "deadline_added",
            "deadline",
            &deadline.id,
            serde_json::json!({ "title": deadline.title, "date": deadline.date }),
        ))?;
        Ok(deadline.id.clone())
    }

    fn deadlines(&self) -> StoreResult<Vec<Deadline>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, title, date, kind, client_ref, quote_ref, priority,
                        description, amount, status
                 FROM scadenze",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map([], |row| {
                let priority: String = row.get(6)?;
                Ok(Deadline {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    date: row.get(2)?,
                    kind: row.get(3)?,
                    client_ref: row.get(4)?,
                    quote_ref: row.get(5)?,
                    priority: Priority::parse(&priority).unwrap_or(Priority::Medium),
                    description: row.get(7)?,
                    amount: row.get(8)?,
                    status: row.get(9)?,
                })
            })
            .map_err(db_err)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    fn add_event(&mut self, event: &CalendarEvent) -> StoreResult<String> {
        let hash = event_hash(event);
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO eventi_calendario
                 (id, idempotency_hash, title, date, start_time, end_time, kind,
                  client_ref, quote_ref, priority, location, notes, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    event.id,
                    hash,
                    event.title,
                    event.date,
                    event.start_time,
                    event.end_time,
                    event.kind,
                    event.client_ref,
                    event.quote_ref,
                    event.priority.as_str(),
                    event.location,
                    event.notes,
                    event.status,
                ],
            )
            .map_err(db_err)?;

        if inserted == 0 {
            return self.existing_id("eventi_calendario", &hash);
        }

        self.log_event(AuditEvent::new(
            "event_added",
            "calendar_event",
            &event.id,
            serde_json::json!({ "title": event.title, "date": event.date }),
        ))?;
        Ok(event.id.clone())
    }

    fn events(&self) -> StoreResult<Vec<CalendarEvent>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, title, date, start_time, end_time, kind, client_ref,
                        quote_ref, priority, location, notes, status
                 FROM eventi_calendario",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map([], |row| {
                let priority: String = row.get(8)?;
                Ok(CalendarEvent {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    date: row.get(2)?,
                    start_time: row.get(3)?,
                    end_time: row.get(4)?,
                    kind: row.get(5)?,
                    client_ref: row.get(6)?,
                    quote_ref: row.get(7)?,
                    priority: Priority::parse(&priority).unwrap_or(Priority::Medium),
                    location: row.get(9)?,
                    notes: row.get(10)?,
                    status: row.get(11)?,
                })
            })
            .map_err(db_err)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }
}

// ============================================================================
// MEMORY STORE
// ============================================================================

/// Vector-backed store for tests and demos. Honors the same idempotency
/// contract as the SQLite store, and can be flipped offline to exercise the
/// Unavailable error path.
#[derive(Default)]
pub struct MemoryStore {
    clients: Vec<Client>,
    quotes: Vec<Quote>,
    expenses: Vec<Expense>,
    deadlines: Vec<Deadline>,
    events: Vec<CalendarEvent>,
    seen: HashMap<String, String>,
    offline: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backing service being unreachable
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        } else {
            Ok(())
        }
    }

    /// Dedup bookkeeping: Some(existing id) when the hash was already seen
    fn remember(&mut self, hash: String, id: &str) -> Option<String> {
        if let Some(existing) = self.seen.get(&hash) {
            return Some(existing.clone());
        }
        self.seen.insert(hash, id.to_string());
        None
    }
}

impl RecordStore for MemoryStore {
    fn add_client(&mut self, client: &Client) -> StoreResult<String> {
        self.check_online()?;
        if let Some(existing) = self.remember(client_hash(client), &client.id) {
            return Ok(existing);
        }
        self.clients.push(client.clone());
        Ok(client.id.clone())
    }

    fn clients(&self) -> StoreResult<Vec<Client>> {
        self.check_online()?;
        Ok(self.clients.clone())
    }

    fn add_quote(&mut self, quote: &Quote) -> StoreResult<String> {
        self.check_online()?;
        if let Some(existing) = self.remember(quote_hash(quote), &quote.id) {
            return Ok(existing);
        }
        self.quotes.push(quote.clone());
        Ok(quote.id.clone())
    }

    fn quotes(&self) -> StoreResult<Vec<Quote>> {
        self.check_online()?;
        Ok(self.quotes.clone())
    }

    fn update_quote_status(&mut self, quote_id: &str, status: QuoteStatus) -> StoreResult<()> {
        self.check_online()?;
        match self.quotes.iter_mut().find(|q| q.id == quote_id) {
            Some(quote) => {
                quote.status = status;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("quote {}", quote_id))),
        }
    }

    fn add_expense(&mut self, expense: &Expense) -> StoreResult<String> {
        self.check_online()?;
        if let Some(existing) = self.remember(expense_hash(expense), &expense.id) {
            return Ok(existing);
        }
        self.expenses.push(expense.clone());
        Ok(expense.id.clone())
    }

    fn expenses(&self) -> StoreResult<Vec<Expense>> {
        self.check_online()?;
        Ok(self.expenses.clone())
    }

    fn add_deadline(&mut self, deadline: &Deadline) -> StoreResult<String> {
        self.check_online()?;
        if let Some(existing) = self.remember(deadline_hash(deadline), &deadline.id) {
            return Ok(existing);
        }
        self.deadlines.push(deadline.clone());
        Ok(deadline.id.clone())
    }

    fn deadlines(&self) -> StoreResult<Vec<Deadline>> {
        self.check_online()?;
        Ok(self.deadlines.clone())
    }

    fn add_event(&mut self, event: &CalendarEvent) -> StoreResult<String> {
        self.check_online()?;
        if let Some(existing) = self.remember(event_hash(event), &event.id) {
            return Ok(existing);
        }
        self.events.push(event.clone());
        Ok(event.id.clone())
    }

    fn events(&self) -> StoreResult<Vec<CalendarEvent>> {
        self.check_online()?;
        Ok(self.events.clone())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dec(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, day).unwrap()
    }

    #[test]
    fn test_sqlite_round_trip_client() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let client = Client::new("Rossi Costruzioni SRL", dec(15))
            .with_contact("info@rossicost.it", "0421-123456");

        let id = store.add_client(&client).unwrap();
        assert_eq!(id, client.id);

        let loaded = store.clients().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Rossi Costruzioni SRL");
        assert_eq!(loaded[0].email.as_deref(), Some("info@rossicost.it"));
    }

    #[test]
    fn test_sqlite_reused_id_with_new_content_is_rejected() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let first = Client::new("Rossi Costruzioni SRL", dec(8));
        store.add_client(&first).unwrap();

        // Different content (different hash) but same primary key: the
        // insert is blocked by the id, not deduplicated by the hash
        let mut clash = Client::new("Bianchi Impianti SPA", dec(9));
        clash.id = first.id.clone();

        let err = store.add_client(&clash).unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
        println!("✅ Reused id reported as rejection, not transport failure");
    }

    #[test]
    fn test_sqlite_duplicate_insert_returns_existing_id() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let first = Client::new("Verdi Impianti", dec(8));
        let again = Client::new("Verdi Impianti", dec(8)); // new UUID, same row

        let id1 = store.add_client(&first).unwrap();
        let id2 = store.add_client(&again).unwrap();

        assert_eq!(id1, id2);
        assert_eq!(store.clients().unwrap().len(), 1);
    }

    #[test]
    fn test_sqlite_quote_status_round_trip_and_update() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let quote = Quote::new("PREV-001", "Rossi Costruzioni SRL", 1970.0, dec(18))
            .with_status(QuoteStatus::Sent);

        let id = store.add_quote(&quote).unwrap();
        store.update_quote_status(&id, QuoteStatus::Accepted).unwrap();

        let loaded = store.quotes().unwrap();
        assert_eq!(loaded[0].status, QuoteStatus::Accepted);
        assert_eq!(loaded[0].total_value, 1970.0);
    }

    #[test]
    fn test_sqlite_update_missing_quote_is_not_found() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let err = store
            .update_quote_status("no-such-id", QuoteStatus::Accepted)
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_sqlite_deadline_and_event_round_trip() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        let deadline = Deadline::new("Scadenza Preventivo PREV-001", dec(31), "Preventivo", Priority::High)
            .for_quote("PREV-001")
            .with_amount(1970.0);
        store.add_deadline(&deadline).unwrap();

        let event = CalendarEvent::new(
            "Sopralluogo Rossi Costruzioni",
            dec(29),
            "09:00",
            "11:00",
            "Sopralluogo",
            Priority::High,
        )
        .at("Via Roma 123, Milano");
        store.add_event(&event).unwrap();

        let deadlines = store.deadlines().unwrap();
        assert_eq!(deadlines[0].priority, Priority::High);
        assert_eq!(deadlines[0].quote_ref.as_deref(), Some("PREV-001"));

        let events = store.events().unwrap();
        assert_eq!(events[0].location.as_deref(), Some("Via Roma 123, Milano"));
        assert_eq!(events[0].status, "Programmato");
    }

    #[test]
    fn test_sqlite_audit_trail() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let quote = Quote::new("OFF-002", "Studio Legale Bianchi", 1540.0, dec(20));

        let id = store.add_quote(&quote).unwrap();
        store.update_quote_status(&id, QuoteStatus::Sent).unwrap();

        let trail = store.audit_events("quote").unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].event_type, "quote_added");
        assert_eq!(trail[1].event_type, "quote_status_changed");
        assert_eq!(trail[1].data["status"], "INVIATO");
    }

    #[test]
    fn test_sqlite_empty_lists_are_ok_not_errors() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.clients().unwrap().is_empty());
        assert!(store.quotes().unwrap().is_empty());
        assert!(store.expenses().unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_matches_contract() {
        let mut store = MemoryStore::new();
        let expense = Expense::new(dec(20), "Trasporti", "Trasferta cantiere", 45.50)
            .with_project("PREV-001")
            .deductible(true);

        let id1 = store.add_expense(&expense).unwrap();
        let id2 = store.add_expense(&expense).unwrap(); // idempotent
        assert_eq!(id1, id2);
        assert_eq!(store.expenses().unwrap().len(), 1);
    }

    #[test]
    fn test_memory_store_offline_is_unavailable_not_empty() {
        let mut store = MemoryStore::new();
        store
            .add_client(&Client::new("Rossi Costruzioni SRL", dec(15)))
            .unwrap();

        store.set_offline(true);
        let err = store.clients().unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        // Back online, the data is still there - distinguishable from empty
        store.set_offline(false);
        assert_eq!(store.clients().unwrap().len(), 1);
    }
}
