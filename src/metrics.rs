// 📊 Metrics Engine - dashboard aggregates from quote/expense snapshots
//
// Pure computation over already-fetched collections. Every operation is
// total: empty input yields all-zero output, a malformed record degrades to
// zero, and nothing here performs I/O or caches between calls - the caller
// hands in a fresh snapshot each time.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::{parse_record_date, Expense, Quote, QuoteStatus};

// ============================================================================
// QUOTE STATS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteStats {
    pub total_count: usize,
    /// Sum of total_value over ACCETTATO quotes
    pub accepted_value: f64,
    /// Quotes that left draft state (INVIATO, ACCETTATO, RIFIUTATO)
    pub sent_count: usize,
    pub accepted_count: usize,
    /// accepted / sent * 100; exactly 0 when nothing was sent
    pub success_rate: f64,
}

// ============================================================================
// EXPENSE STATS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseStats {
    pub total: f64,
    pub deductible_total: f64,
    pub count: usize,
    /// total / count; exactly 0 for an empty list
    pub average: f64,
}

// ============================================================================
// PROFIT REPORT
// ============================================================================

/// Period financial report. Range filtering is inclusive on both ends and
/// applies to the quote creation date / expense date; records with a date
/// that fails to parse fall outside every range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitReport {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Accepted-quote value within the period ("Entrate Totali")
    pub revenue: f64,
    /// All expenses within the period ("Uscite Totali")
    pub expenses_total: f64,
    /// revenue - expenses_total ("Utile Lordo")
    pub gross_profit: f64,
    /// gross_profit / revenue * 100; 0 when revenue is 0
    pub margin_percent: f64,
    pub deductible_total: f64,
    /// deductible_total * tax_saving_rate - a rough estimate, not a tax
    /// calculation
    pub estimated_tax_saving: f64,
    pub accepted_count: usize,
    /// Unresolved quote value within the period (BOZZA + INVIATO)
    pub pipeline_value: f64,
    /// revenue / accepted_count ("Ticket Medio"); 0 when none accepted
    pub average_ticket: f64,
}

impl ProfitReport {
    pub fn summary(&self) -> String {
        format!(
            "Report {} - {}: revenue €{:.2}, expenses €{:.2}, gross profit €{:.2} ({:.1}% margin)",
            self.period_start.format("%d/%m/%Y"),
            self.period_end.format("%d/%m/%Y"),
            self.revenue,
            self.expenses_total,
            self.gross_profit,
            self.margin_percent
        )
    }
}

// ============================================================================
// PER-CLIENT GROUPING
// ============================================================================

/// Aggregate quote value for one client, used for "top clients" ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientValue {
    /// The client name as referenced by the quotes. A dangling reference
    /// still groups here under its literal key - not an error.
    pub client_ref: String,
    pub count: usize,
    pub total_value: f64,
    pub average_value: f64,
    pub accepted_count: usize,
}

// ============================================================================
// METRICS ENGINE
// ============================================================================

pub struct MetricsEngine {
    /// Rate applied to deductible expenses for the estimated tax saving.
    /// Default 0.22, matching the standard VAT rate - a simplification.
    pub tax_saving_rate: f64,
}

impl MetricsEngine {
    pub fn new() -> Self {
        MetricsEngine {
            tax_saving_rate: 0.22,
        }
    }

    pub fn with_tax_saving_rate(tax_saving_rate: f64) -> Self {
        MetricsEngine { tax_saving_rate }
    }

    /// Headline quote metrics for the main dashboard
    pub fn quote_stats(&self, quotes: &[Quote]) -> QuoteStats {
        let accepted_value: f64 = quotes
            .iter()
            .filter(|q| q.status == QuoteStatus::Accepted)
            .map(|q| q.total_value)
            .sum();

        let sent_count = quotes.iter().filter(|q| q.status.left_draft()).count();
        let accepted_count = quotes
            .iter()
            .filter(|q| q.status == QuoteStatus::Accepted)
            .count();

        let success_rate = if sent_count > 0 {
            accepted_count as f64 / sent_count as f64 * 100.0
        } else {
            0.0
        };

        QuoteStats {
            total_count: quotes.len(),
            accepted_value,
            sent_count,
            accepted_count,
            success_rate,
        }
    }

    /// Value still on the table: drafts plus sent-but-unresolved quotes
    pub fn pipeline_value(&self, quotes: &[Quote]) -> f64 {
        quotes
            .iter()
            .filter(|q| q.status.is_open())
            .map(|q| q.total_value)
            .sum()
    }

    /// Headline expense metrics for the administration dashboard
    pub fn expense_stats(&self, expenses: &[Expense]) -> ExpenseStats {
        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        let deductible_total: f64 = expenses
            .iter()
            .filter(|e| e.deductible)
            .map(|e| e.amount)
            .sum();
        let count = expenses.len();

        let average = if count > 0 { total / count as f64 } else { 0.0 };

        ExpenseStats {
            total,
            deductible_total,
            count,
            average,
        }
    }

    /// Financial report for an inclusive date range
    pub fn profit_report(
        &self,
        quotes: &[Quote],
        expenses: &[Expense],
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> ProfitReport {
        let quotes_in_range: Vec<&Quote> = quotes
            .iter()
            .filter(|q| in_range(&q.created_on, from_date, to_date))
            .collect();
        let expenses_in_range: Vec<&Expense> = expenses
            .iter()
            .filter(|e| in_range(&e.date, from_date, to_date))
            .collect();

        let revenue: f64 = quotes_in_range
            .iter()
            .filter(|q| q.status == QuoteStatus::Accepted)
            .map(|q| q.total_value)
            .sum();
        let accepted_count = quotes_in_range
            .iter()
            .filter(|q| q.status == QuoteStatus::Accepted)
            .count();
        let pipeline_value: f64 = quotes_in_range
            .iter()
            .filter(|q| q.status.is_open())
            .map(|q| q.total_value)
            .sum();

        let expenses_total: f64 = expenses_in_range.iter().map(|e| e.amount).sum();
        let deductible_total: f64 = expenses_in_range
            .iter()
            .filter(|e| e.deductible)
            .map(|e| e.amount)
            .sum();

        let gross_profit = revenue - expenses_total;
        let margin_percent = if revenue > 0.0 {
            gross_profit / revenue * 100.0
        } else {
            0.0
        };
        let average_ticket = if accepted_count > 0 {
            revenue / accepted_count as f64
        } else {
            0.0
        };

        ProfitReport {
            period_start: from_date,
            period_end: to_date,
            revenue,
            expenses_total,
            gross_profit,
            margin_percent,
            deductible_total,
            estimated_tax_saving: deductible_total * self.tax_saving_rate,
            accepted_count,
            pipeline_value,
            average_ticket,
        }
    }

    /// Group quote value per client, ranked by total value descending.
    /// Ties keep first-appearance order; no client present in the input is
    /// ever omitted, even with zero accepted quotes.
    pub fn value_by_client(&self, quotes: &[Quote]) -> Vec<ClientValue> {
        let mut order: Vec<ClientValue> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for quote in quotes {
            let pos = *index.entry(quote.client_ref.clone()).or_insert_with(|| {
                order.push(ClientValue {
                    client_ref: quote.client_ref.clone(),
                    count: 0,
                    total_value: 0.0,
                    average_value: 0.0,
                    accepted_count: 0,
                });
                order.len() - 1
            });

            let entry = &mut order[pos];
            entry.count += 1;
            entry.total_value += quote.total_value;
            if quote.status == QuoteStatus::Accepted {
                entry.accepted_count += 1;
            }
        }

        for entry in &mut order {
            entry.average_value = entry.total_value / entry.count as f64;
        }

        // Stable sort: equal totals keep first-appearance order
        order.sort_by(|a, b| {
            b.total_value
                .partial_cmp(&a.total_value)
                .unwrap_or(Ordering::Equal)
        });
        order
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Inclusive range check on a record date string; unparsable dates are
/// outside every range
fn in_range(date: &str, from_date: NaiveDate, to_date: NaiveDate) -> bool {
    match parse_record_date(date) {
        Some(d) => d >= from_date && d <= to_date,
        None => false,
    }
}

// ============================================================================
// TESTS
// ============================================================================
