use crate::application::monitoring::PerfReport;
use crate::domain::report::RunReport;
use colored::*;
use tabled::settings::{object::Columns, Alignment, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct PairRow {
    pair: String,
    outcome: String,
    differences: String,
    suppressed: String,
}

#[derive(Tabled)]
struct CountRow {
    metric: String,
    value: String,
}

pub fn print_summary(report: &RunReport) {
    println!();

    println!("{}", "RESPDIFF COMPARISON SUMMARY".bold().cyan());
    println!("Run: {}", report.run_id.bright_yellow());
    println!();

    if report.all_equal {
        println!(
            "{}",
            format!("✓ All {} pairs equal.", report.total_pairs)
                .bold()
                .green()
        );
        return;
    }

    let rows: Vec<PairRow> = report
        .pairs
        .iter()
        .filter(|p| !p.are_equal())
        .map(|p| {
            let identity = p.relative_path.as_deref().unwrap_or(&p.name);
            let outcome = if p.has_error() {
                p.outcome.to_string().red().to_string()
            } else {
                p.outcome.to_string().yellow().to_string()
            };
            let (differences, suppressed) = match &p.summary {
                Some(s) => (
                    s.total_differences.to_string().yellow().to_string(),
                    s.suppressed().to_string(),
                ),
                None => ("-".to_string(), "-".to_string()),
            };
            PairRow {
                pair: identity.bold().to_string(),
                outcome,
                differences,
                suppressed,
            }
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..=3)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    let count_rows: Vec<CountRow> = report
        .metadata
        .iter()
        .map(|(key, count)| CountRow {
            metric: key.clone(),
            value: count.to_string().bold().to_string(),
        })
        .collect();

    let counts_table = Table::new(count_rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..=1)).with(Alignment::right()))
        .to_string();

    println!();
    println!("{counts_table}");
    println!();
}

// ─── Performance summary ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct TimingRow {
    operation: String,
    items: String,
    duration_ms: String,
}

/// Print the per-operation timing table collected by the monitoring
/// decorators.
pub fn print_perf_summary(perf: &PerfReport) {
    if perf.timings.is_empty() {
        return;
    }

    println!("{}", "TIMINGS".bold().cyan());

    let rows: Vec<TimingRow> = perf
        .timings
        .iter()
        .map(|t| TimingRow {
            operation: t.operation.to_string(),
            items: t.items.to_string(),
            duration_ms: t.duration_ms.to_string(),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..=2)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    println!(
        "Total: {} ms across {} pairs discovered",
        perf.total_ms.to_string().bold(),
        perf.total_pairs_discovered
    );
    println!();
}
