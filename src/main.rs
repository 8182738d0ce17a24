use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::env;

use talento_suite::{
    format_eur, format_percent, parse_record_date, profit_report_csv, summarize,
    write_profit_report_csv, DemoDataset, MetricsEngine, RecordStore, SqliteStore,
    UrgencyBucket, UrgencySummary,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let (db_arg, command) = split_invocation(&args[1..]);

    let db_path = match db_arg {
        Some(path) => path.to_string(),
        None => env::var("TALENTO_DB").unwrap_or_else(|_| "talento.db".to_string()),
    };

    match command.first().map(String::as_str) {
        Some("demo") => run_demo(&db_path),
        Some("report") => run_report(&db_path, &command[1..]),
        None => run_dashboard(&db_path),
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Usage: talento-suite [DB] [demo | report FROM TO [OUT.csv]]");
            std::process::exit(2);
        }
    }
}

/// Split argv (past the program name) into an optional leading database path
/// and the command words that follow. The first word is a database path
/// unless it names a command.
fn split_invocation(args: &[String]) -> (Option<&str>, &[String]) {
    match args.first() {
        Some(first) if !matches!(first.as_str(), "demo" | "report") => {
            (Some(first.as_str()), &args[1..])
        }
        _ => (None, args),
    }
}

fn open_store(db_path: &str) -> Result<SqliteStore> {
    SqliteStore::open(db_path).with_context(|| format!("Failed to open store at {}", db_path))
}

fn run_demo(db_path: &str) -> Result<()> {
    println!("🎯 Loading demo dataset into {}", db_path);

    let today = Local::now().date_naive();
    let dataset = DemoDataset::generate(today)?;
    let mut store = open_store(db_path)?;
    dataset.load_into(&mut store)?;

    println!("✓ {} clients", dataset.clients.len());
    println!("✓ {} quotes", dataset.quotes.len());
    println!("✓ {} expenses", dataset.expenses.len());
    println!("✓ {} deadlines", dataset.deadlines.len());
    println!("✓ {} calendar events", dataset.events.len());
    println!("\nDemo data loaded. Run without arguments for the dashboard.");

    Ok(())
}

fn run_dashboard(db_path: &str) -> Result<()> {
    let store = open_store(db_path)?;
    let today = Local::now().date_naive();
    let engine = MetricsEngine::new();

    let clients = store.clients()?;
    let quotes = store.quotes()?;
    let expenses = store.expenses()?;
    let deadlines = store.deadlines()?;
    let events = store.events()?;

    let stats = engine.quote_stats(&quotes);
    let expense_stats = engine.expense_stats(&expenses);

    println!("📊 Dashboard Principale");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Preventivi Totali   {}", stats.total_count);
    println!("Clienti Attivi      {}", clients.len());
    println!("Valore Accettato    {}", format_eur(stats.accepted_value));
    println!("Tasso Successo      {:.0}%", stats.success_rate);
    println!("Pipeline            {}", format_eur(engine.pipeline_value(&quotes)));
    println!("Spese Totali        {}", format_eur(expense_stats.total));

    let deadline_summary = summarize(&deadlines, today);
    let event_summary = summarize(&events, today);

    println!("\n⏰ Scadenze");
    println!("{}", urgency_line(&deadline_summary));
    if deadline_summary.unparsable > 0 {
        println!("⚠️  {} scadenze con data non valida", deadline_summary.unparsable);
    }

    println!("\n📅 Eventi Calendario");
    println!("{}", urgency_line(&event_summary));

    let ranked = engine.value_by_client(&quotes);
    if !ranked.is_empty() {
        println!("\n🏆 Top Clienti per Valore");
        for entry in ranked.iter().take(5) {
            println!(
                "  {} - {} ({} preventivi, {} accettati)",
                entry.client_ref,
                format_eur(entry.total_value),
                entry.count,
                entry.accepted_count,
            );
        }
    }

    Ok(())
}

fn run_report(db_path: &str, args: &[String]) -> Result<()> {
    let (from_str, to_str) = match (args.first(), args.get(1)) {
        (Some(f), Some(t)) => (f, t),
        _ => bail!("Usage: talento-suite report FROM TO [OUT.csv] (dates as DD/MM/YYYY)"),
    };

    let from = parse_date_arg(from_str)?;
    let to = parse_date_arg(to_str)?;
    if from > to {
        bail!("FROM date {} is after TO date {}", from_str, to_str);
    }

    let store = open_store(db_path)?;
    let quotes = store.quotes()?;
    let expenses = store.expenses()?;

    let engine = MetricsEngine::new();
    let report = engine.profit_report(&quotes, &expenses, from, to);

    println!("💰 Report Finanziario {} - {}", from_str, to_str);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Entrate Totali      {}", format_eur(report.revenue));
    println!("Uscite Totali       {}", format_eur(report.expenses_total));
    println!("Utile Lordo         {}", format_eur(report.gross_profit));
    println!("Margine             {}", format_percent(report.margin_percent));
    println!("Preventivi Vinti    {}", report.accepted_count);
    println!("Pipeline            {}", format_eur(report.pipeline_value));
    println!("Spese Detraibili    {}", format_eur(report.deductible_total));
    println!("Risparmio Fiscale   {}", format_eur(report.estimated_tax_saving));
    println!("Ticket Medio        {}", format_eur(report.average_ticket));

    match args.get(2) {
        Some(out_path) => {
            write_profit_report_csv(out_path, &report)?;
            println!("\n✓ Report esportato in {}", out_path);
        }
        None => {
            println!("\n{}", profit_report_csv(&report)?);
        }
    }

    Ok(())
}

fn parse_date_arg(arg: &str) -> Result<NaiveDate> {
    parse_record_date(arg).with_context(|| format!("Invalid date '{}' (expected DD/MM/YYYY)", arg))
}

/// One dashboard line per urgency summary: icon, bucket label, count
fn urgency_line(summary: &UrgencySummary) -> String {
    const ICONS: [(UrgencyBucket, &str); 4] = [
        (UrgencyBucket::Overdue, "🔴"),
        (UrgencyBucket::Urgent, "🟠"),
        (UrgencyBucket::Upcoming, "🟡"),
        (UrgencyBucket::Future, "🟢"),
    ];

    ICONS
        .iter()
        .map(|(bucket, icon)| format!("{} {} {}", icon, bucket.label(), summary.count(*bucket)))
        .collect::<Vec<_>>()
        .join("  ")
}
