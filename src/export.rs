// 📋 Report Export - localized formatting + CSV
//
// Presentation only: columns carry the Italian labels the screens use and
// values arrive pre-formatted as currency/percentage strings. Nothing here
// feeds back into any computation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::metrics::ProfitReport;

/// Format a euro amount with thousands separators: 1970.0 → "€1,970.00"
pub fn format_eur(value: f64) -> String {
    let negative = value < 0.0;
    // Round to cents first so -0.001 does not print as "€-0.00"
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative && cents > 0 {
        format!("€-{}.{:02}", grouped, frac)
    } else {
        format!("€{}.{:02}", grouped, frac)
    }
}

/// Format a percentage with one decimal: 78.6884 → "78.7%"
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// One-row summary CSV with human-labeled columns, matching the on-screen
/// "Report Riassuntivo" table
pub fn profit_report_csv(report: &ProfitReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "Periodo",
            "Entrate Totali",
            "Uscite Totali",
            "Utile Lordo",
            "Margine %",
            "Preventivi Vinti",
            "Pipeline",
            "Spese Detraibili",
            "Risparmio Fiscale",
            "Ticket Medio",
        ])
        .context("Failed to write CSV header")?;

    writer
        .write_record([
            format!(
                "{} - {}",
                report.period_start.format("%d/%m/%Y"),
                report.period_end.format("%d/%m/%Y")
            ),
            format_eur(report.revenue),
            format_eur(report.expenses_total),
            format_eur(report.gross_profit),
            format_percent(report.margin_percent),
            report.accepted_count.to_string(),
            format_eur(report.pipeline_value),
            format_eur(report.deductible_total),
            format_eur(report.estimated_tax_saving),
            format_eur(report.average_ticket),
        ])
        .context("Failed to write CSV record")?;

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Write the report CSV to disk
pub fn write_profit_report_csv<P: AsRef<Path>>(path: P, report: &ProfitReport) -> Result<()> {
    let csv = profit_report_csv(report)?;
    fs::write(path.as_ref(), csv)
        .with_context(|| format!("Failed to write report to {:?}", path.as_ref()))?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsEngine;
    use chrono::NaiveDate;

    #[test]
    fn test_format_eur() {
        assert_eq!(format_eur(0.0), "€0.00");
        assert_eq!(format_eur(45.5), "€45.50");
        assert_eq!(format_eur(1970.0), "€1,970.00");
        assert_eq!(format_eur(1234567.891), "€1,234,567.89");
        assert_eq!(format_eur(-1550.2), "€-1,550.20");
        assert_eq!(format_eur(-0.001), "€0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(78.6884), "78.7%");
        assert_eq!(format_percent(100.0), "100.0%");
    }

    #[test]
    fn test_profit_report_csv_layout() {
        let engine = MetricsEngine::new();
        let report = engine.profit_report(
            &[],
            &[],
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        );

        let csv = profit_report_csv(&report).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Periodo,Entrate Totali,Uscite Totali"));
        assert!(lines[1].starts_with("01/01/2024 - 31/12/2025,€0.00,€0.00"));
    }

    #[test]
    fn test_profit_report_csv_values_are_localized() {
        use crate::entities::{Quote, QuoteStatus};

        let created = NaiveDate::from_ymd_opt(2024, 12, 18).unwrap();
        let quotes =
            vec![Quote::new("PREV-001", "Rossi Costruzioni SRL", 1970.0, created)
                .with_status(QuoteStatus::Accepted)];

        let engine = MetricsEngine::new();
        let report = engine.profit_report(
            &quotes,
            &[],
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        );

        let csv = profit_report_csv(&report).unwrap();
        assert!(csv.contains("€1,970.00"));
        assert!(csv.contains("100.0%")); // margin with no expenses
    }
}
