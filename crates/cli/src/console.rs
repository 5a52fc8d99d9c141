//! Console presentation: colored transcript lines and the summary table

use colored::{ColoredString, Colorize};
use flight_probe_core::port::{Reporter, Tone};
use flight_probe_core::RunSummary;
use tabled::{Table, Tabled};

/// Reporter that prints every line to stdout
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn line(&self, tone: Tone, text: &str) {
        println!("{}", style(tone, text));
    }
}

fn style(tone: Tone, text: &str) -> ColoredString {
    match tone {
        Tone::Heading => text.cyan().bold(),
        Tone::Plain => text.normal(),
        Tone::Success => text.green(),
        Tone::Warning => text.yellow(),
        Tone::Error => text.red(),
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Probe")]
    probe: String,
    #[tabled(rename = "Request")]
    request: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

/// Render the per-probe outcomes as a table
pub fn summary_table(summary: &RunSummary) -> String {
    let rows: Vec<SummaryRow> = summary
        .records
        .iter()
        .map(|record| SummaryRow {
            probe: record.kind.name().to_string(),
            request: format!("{} {}", record.kind.method(), record.kind.path()),
            outcome: record.outcome.label().to_string(),
            detail: record.outcome.detail(),
        })
        .collect();

    Table::new(rows).to_string()
}
