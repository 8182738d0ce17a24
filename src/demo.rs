// 🎯 Demo Dataset - a consistent fixture for tests and first runs
//
// Same records every time: monetary values, categories and statuses are
// constants; only deadline/event dates float with "today", and there the
// day OFFSET is the fixed part, so urgency dashboards always show the same
// mix of overdue/urgent/upcoming/future.
//
// Unlike ad-hoc demo literals, generation fails if any record references a
// client or quote the fixture does not contain.

use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate};

use crate::entities::{CalendarEvent, Client, Deadline, Expense, Priority, Quote, QuoteStatus};
use crate::store::{RecordStore, StoreError};

/// Day offsets (relative to "today") for the five demo deadlines
const DEADLINE_OFFSETS: [i64; 5] = [8, 3, 18, 2, -3];

/// Day offsets for the six demo calendar events
const EVENT_OFFSETS: [i64; 6] = [6, 2, 19, 12, 4, 7];

#[derive(Debug, Clone)]
pub struct DemoDataset {
    pub clients: Vec<Client>,
    pub quotes: Vec<Quote>,
    pub expenses: Vec<Expense>,
    pub deadlines: Vec<Deadline>,
    pub events: Vec<CalendarEvent>,
}

impl DemoDataset {
    /// Build the fixture. `today` anchors the floating deadline/event dates;
    /// everything else is absolute constants.
    pub fn generate(today: NaiveDate) -> Result<Self> {
        let dataset = DemoDataset {
            clients: demo_clients(),
            quotes: demo_quotes(),
            expenses: demo_expenses(),
            deadlines: demo_deadlines(today),
            events: demo_events(today),
        };
        dataset.check_references()?;
        Ok(dataset)
    }

    /// Referential closure: every client_ref/quote_ref/project_ref in the
    /// fixture must resolve within the fixture itself
    fn check_references(&self) -> Result<()> {
        let client_names: Vec<&str> = self.clients.iter().map(|c| c.name.as_str()).collect();
        let quote_numbers: Vec<&str> = self.quotes.iter().map(|q| q.number.as_str()).collect();
        let mut violations: Vec<String> = Vec::new();

        for quote in &self.quotes {
            if !client_names.contains(&quote.client_ref.as_str()) {
                violations.push(format!(
                    "quote {} references unknown client '{}'",
                    quote.number, quote.client_ref
                ));
            }
        }

        for expense in &self.expenses {
            if let Some(project) = &expense.project_ref {
                if !quote_numbers.contains(&project.as_str()) {
                    violations.push(format!(
                        "expense '{}' references unknown quote '{}'",
                        expense.description, project
                    ));
                }
            }
        }

        for deadline in &self.deadlines {
            if let Some(client) = &deadline.client_ref {
                if !client_names.contains(&client.as_str()) {
                    violations.push(format!(
                        "deadline '{}' references unknown client '{}'",
                        deadline.title, client
                    ));
                }
            }
            if let Some(quote) = &deadline.quote_ref {
                if !quote_numbers.contains(&quote.as_str()) {
                    violations.push(format!(
                        "deadline '{}' references unknown quote '{}'",
                        deadline.title, quote
                    ));
                }
            }
        }

        for event in &self.events {
            if let Some(client) = &event.client_ref {
                if !client_names.contains(&client.as_str()) {
                    violations.push(format!(
                        "event '{}' references unknown client '{}'",
                        event.title, client
                    ));
                }
            }
            if let Some(quote) = &event.quote_ref {
                if !quote_numbers.contains(&quote.as_str()) {
                    violations.push(format!(
                        "event '{}' references unknown quote '{}'",
                        event.title, quote
                    ));
                }
            }
        }

        if !violations.is_empty() {
            bail!("demo dataset is inconsistent: {}", violations.join("; "));
        }
        Ok(())
    }

    /// Persist the fixture. Safe to call more than once: the stores dedup
    /// on content, so a second run adds nothing.
    pub fn load_into(&self, store: &mut impl RecordStore) -> Result<(), StoreError> {
        for client in &self.clients {
            store.add_client(client)?;
        }
        for quote in &self.quotes {
            store.add_quote(quote)?;
        }
        for expense in &self.expenses {
            store.add_expense(expense)?;
        }
        for deadline in &self.deadlines {
            store.add_deadline(deadline)?;
        }
        for event in &self.events {
            store.add_event(event)?;
        }
        Ok(())
    }

    pub fn record_count(&self) -> usize {
        self.clients.len()
            + self.quotes.len()
            + self.expenses.len()
            + self.deadlines.len()
            + self.events.len()
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    // Fixture constants only - every literal here is a valid calendar date
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn demo_clients() -> Vec<Client> {
    vec![
        Client::new("Rossi Costruzioni SRL", date(2024, 12, 15))
            .with_contact("info@rossicost.it", "0421-123456")
            .with_referrer("Passaparola")
            .with_notes("Cliente storico, sempre puntuale nei pagamenti"),
        Client::new("Studio Legale Bianchi", date(2024, 12, 10))
            .with_contact("avv.bianchi@legal.it", "339-987654")
            .with_notes("Specialisti in diritto commerciale"),
        Client::new("Verdi Impianti", date(2024, 12, 8))
            .with_contact("m.verdi@email.com", "347-555777")
            .with_referrer("LinkedIn")
            .with_notes("Azienda innovativa, interessata a nuove tecnologie"),
    ]
}

fn demo_quotes() -> Vec<Quote> {
    vec![
        Quote::new("PREV-001", "Rossi Costruzioni SRL", 1970.0, date(2024, 12, 18))
            .with_title("Ristrutturazione bagno completa")
            .with_terms(30, 22.0)
            .with_status(QuoteStatus::Accepted),
        Quote::new("OFF-002", "Studio Legale Bianchi", 1540.0, date(2024, 12, 20))
            .with_title("Consulenza privacy per studio legale")
            .with_terms(15, 22.0)
            .with_status(QuoteStatus::Sent),
        Quote::new("PROG-003", "Verdi Impianti", 6000.0, date(2024, 12, 22))
            .with_title("Consulenza digitalizzazione processi aziendali")
            .with_terms(45, 10.0),
    ]
}

fn demo_expenses() -> Vec<Expense> {
    vec![
        Expense::new(date(2024, 12, 20), "Trasporti", "Trasferta cantiere Rossi Costruzioni", 45.50)
            .with_project("PREV-001")
            .deductible(true),
        Expense::new(date(2024, 12, 21), "Materiali", "Acquisto software progettazione", 299.00)
            .with_project("PROG-003")
            .deductible(true),
        Expense::new(date(2024, 12, 22), "Formazione", "Corso aggiornamento professionale", 150.00)
            .deductible(true),
        Expense::new(date(2024, 12, 23), "Ufficio", "Cancelleria e materiale ufficio", 75.30),
    ]
}

fn demo_deadlines(today: NaiveDate) -> Vec<Deadline> {
    let day = |offset: i64| today + Duration::days(offset);

    vec![
        Deadline::new(
            "Scadenza Preventivo PREV-001",
            day(DEADLINE_OFFSETS[0]),
            "Preventivo",
            Priority::High,
        )
        .for_client("Rossi Costruzioni SRL")
        .for_quote("PREV-001")
        .with_amount(1970.0)
        .with_description("Il preventivo per la ristrutturazione bagno scade"),
        Deadline::new(
            "Pagamento Fattura Studio Legale",
            day(DEADLINE_OFFSETS[1]),
            "Pagamento",
            Priority::Medium,
        )
        .for_client("Studio Legale Bianchi")
        .with_amount(1540.0)
        .with_description("Pagamento consulenza privacy"),
        Deadline::new(
            "Rinnovo Certificazione Professionale",
            day(DEADLINE_OFFSETS[2]),
            "Certificazione",
            Priority::High,
        )
        .with_amount(250.0)
        .with_description("Rinnovo certificazione per progettazione"),
        Deadline::new(
            "Appuntamento Verdi Impianti",
            day(DEADLINE_OFFSETS[3]),
            "Appuntamento",
            Priority::Medium,
        )
        .for_client("Verdi Impianti")
        .for_quote("PROG-003")
        .with_description("Incontro per definire dettagli digitalizzazione"),
        Deadline::new(
            "Rinnovo Contratto Software",
            day(DEADLINE_OFFSETS[4]),
            "Rinnovo",
            Priority::Low,
        )
        .with_amount(299.0)
        .with_description("Rinnovo licenza software progettazione CAD"),
    ]
}

fn demo_events(today: NaiveDate) -> Vec<CalendarEvent> {
    let day = |offset: i64| today + Duration::days(offset);

    vec![
        CalendarEvent::new(
            "Sopralluogo Rossi Costruzioni",
            day(EVENT_OFFSETS[0]),
            "09:00",
            "11:00",
            "Sopralluogo",
            Priority::High,
        )
        .for_client("Rossi Costruzioni SRL")
        .for_quote("PREV-001")
        .at("Via Roma 123, Milano")
        .with_notes("Prima visita per valutare lavori bagno"),
        CalendarEvent::new(
            "Riunione Studio Legale Bianchi",
            day(EVENT_OFFSETS[1]),
            "15:00",
            "16:30",
            "Riunione",
            Priority::Medium,
        )
        .for_client("Studio Legale Bianchi")
        .for_quote("OFF-002")
        .at("Via Giustizia 45, Roma")
        .with_notes("Presentazione proposta consulenza privacy"),
        CalendarEvent::new(
            "Consegna Progetto Verdi Impianti",
            day(EVENT_OFFSETS[2]),
            "10:00",
            "12:00",
            "Consegna",
            Priority::High,
        )
        .for_client("Verdi Impianti")
        .for_quote("PROG-003")
        .at("Sede Verdi Impianti")
        .with_notes("Consegna finale piano digitalizzazione"),
        CalendarEvent::new(
            "Corso Aggiornamento CAD",
            day(EVENT_OFFSETS[3]),
            "09:00",
            "17:00",
            "Formazione",
            Priority::Low,
        )
        .at("Centro Formazione TechPro")
        .with_notes("Aggiornamento competenze software progettazione"),
        CalendarEvent::new(
            "Deadline Preventivo Studio Legale",
            day(EVENT_OFFSETS[4]),
            "23:59",
            "23:59",
            "Deadline",
            Priority::High,
        )
        .for_client("Studio Legale Bianchi")
        .for_quote("OFF-002")
        .with_notes("Scadenza risposta al preventivo consulenza"),
        CalendarEvent::new(
            "Appuntamento Nuovo Cliente",
            day(EVENT_OFFSETS[5]),
            "14:00",
            "15:00",
            "Appuntamento",
            Priority::Medium,
        )
        .at("Ufficio")
        .with_notes("Primo incontro per possibile collaborazione"),
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsEngine;
    use crate::store::MemoryStore;
    use crate::urgency::{summarize, UrgencySummary};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 27).unwrap()
    }

    #[test]
    fn test_generate_is_consistent() {
        let dataset = DemoDataset::generate(today()).unwrap();
        assert_eq!(dataset.clients.len(), 3);
        assert_eq!(dataset.quotes.len(), 3);
        assert_eq!(dataset.expenses.len(), 4);
        assert_eq!(dataset.deadlines.len(), 5);
        assert_eq!(dataset.events.len(), 6);
        assert_eq!(dataset.record_count(), 21);
    }

    #[test]
    fn test_every_reference_resolves() {
        let dataset = DemoDataset::generate(today()).unwrap();
        let names: Vec<&str> = dataset.clients.iter().map(|c| c.name.as_str()).collect();
        let numbers: Vec<&str> = dataset.quotes.iter().map(|q| q.number.as_str()).collect();

        for quote in &dataset.quotes {
            assert!(names.contains(&quote.client_ref.as_str()));
        }
        for deadline in &dataset.deadlines {
            if let Some(q) = &deadline.quote_ref {
                assert!(numbers.contains(&q.as_str()), "deadline {}", deadline.title);
            }
        }
        for event in &dataset.events {
            if let Some(q) = &event.quote_ref {
                assert!(numbers.contains(&q.as_str()), "event {}", event.title);
            }
        }
    }

    #[test]
    fn test_deterministic_fixed_fields() {
        let a = DemoDataset::generate(today()).unwrap();
        let b = DemoDataset::generate(today()).unwrap();

        let totals_a: Vec<f64> = a.quotes.iter().map(|q| q.total_value).collect();
        let totals_b: Vec<f64> = b.quotes.iter().map(|q| q.total_value).collect();
        assert_eq!(totals_a, totals_b);
        assert_eq!(totals_a, vec![1970.0, 1540.0, 6000.0]);

        let dates_a: Vec<&String> = a.deadlines.iter().map(|d| &d.date).collect();
        let dates_b: Vec<&String> = b.deadlines.iter().map(|d| &d.date).collect();
        assert_eq!(dates_a, dates_b);
    }

    #[test]
    fn test_only_offsets_follow_today() {
        let shifted = today() + Duration::days(10);
        let a = DemoDataset::generate(today()).unwrap();
        let b = DemoDataset::generate(shifted).unwrap();

        // Deadline mix is identical relative to its own "today"...
        assert_eq!(
            summarize(&a.deadlines, today()),
            summarize(&b.deadlines, shifted)
        );
        // ...while the absolute monetary snapshot never moves
        assert_eq!(a.expenses[0].amount, b.expenses[0].amount);
        assert_eq!(a.quotes[2].created_on, b.quotes[2].created_on);
    }

    #[test]
    fn test_expected_urgency_mix() {
        let dataset = DemoDataset::generate(today()).unwrap();
        let summary = summarize(&dataset.deadlines, today());

        // Offsets 8/3/18/2/-3: one overdue, two urgent, zero upcoming, two future
        assert_eq!(
            summary,
            UrgencySummary {
                overdue: 1,
                urgent: 2,
                upcoming: 0,
                future: 2,
                unparsable: 0,
            }
        );
    }

    #[test]
    fn test_expected_dashboard_metrics() {
        let dataset = DemoDataset::generate(today()).unwrap();
        let engine = MetricsEngine::new();

        let stats = engine.quote_stats(&dataset.quotes);
        assert_eq!(stats.accepted_value, 1970.0);
        assert_eq!(stats.sent_count, 2);
        assert_eq!(stats.success_rate, 50.0);

        let expenses = engine.expense_stats(&dataset.expenses);
        assert!((expenses.total - 569.80).abs() < 1e-9);
        assert!((expenses.deductible_total - 494.50).abs() < 1e-9);

        assert_eq!(engine.pipeline_value(&dataset.quotes), 7540.0);
    }

    #[test]
    fn test_load_into_store_is_idempotent() {
        let dataset = DemoDataset::generate(today()).unwrap();
        let mut store = MemoryStore::new();

        dataset.load_into(&mut store).unwrap();
        dataset.load_into(&mut store).unwrap(); // second run adds nothing

        assert_eq!(store.clients().unwrap().len(), 3);
        assert_eq!(store.quotes().unwrap().len(), 3);
        assert_eq!(store.expenses().unwrap().len(), 4);
        assert_eq!(store.deadlines().unwrap().len(), 5);
        assert_eq!(store.events().unwrap().len(), 6);
    }
}
