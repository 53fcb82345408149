use crate::session::{Outcome, Selection};
use chrono::Duration;
use converter_core::{format_value, Category, ConversionRecord};
use std::io::{self, Write};
use uuid::Uuid;

pub const BANNER: &str = "Use the app to convert units or currencies!";

pub const HELP_TEXT: &str = "\
Commands:
  category <name>     switch to Length, Weight, Temperature or Currency
  from <unit>         set the source unit
  to <unit>           set the target unit
  convert <value>     convert with the current units (a bare number works too)
  units               list units for the current category
  history             show conversions from this session
  records             show every stored conversion
  export <format>     write spreadsheet (xlsx) or document (pdf)
  help                show this text
  exit | quit         leave the converter";

pub fn outcome_emoji(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Converted { .. } => "✅",
        Outcome::Warning(_) => "⚠️",
        Outcome::Failed(_) => "❌",
    }
}

/// Status line shown under the convert button.
pub fn format_outcome(outcome: &Outcome) -> String {
    let mut line = format!("{} {}", outcome_emoji(outcome), outcome.message());
    if let Outcome::Converted {
        persisted: false, ..
    } = outcome
    {
        line.push_str(" (not saved)");
    }
    line
}

pub fn format_selection(selection: &Selection) -> String {
    format!(
        "[{}] {} -> {}",
        selection.category, selection.from, selection.to
    )
}

pub fn format_unit_list(category: Category) -> String {
    let units = category
        .units()
        .iter()
        .map(|unit| {
            if unit.symbol() == unit.name() {
                unit.name().to_string()
            } else {
                format!("{} ({})", unit.name(), unit.symbol())
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}: {}", category, units)
}

/// Numbered table of records, oldest first.
pub fn format_history_table(records: &[ConversionRecord]) -> String {
    if records.is_empty() {
        return "No conversions yet.".to_string();
    }

    let mut out = format!(
        "{:>3}  {:<12} {:<12} {:<12} {:>14} {:>14}\n",
        "#", "Category", "From", "To", "Input", "Result"
    );
    out.push_str(&"═".repeat(72));
    for (i, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "\n{:>3}  {:<12} {:<12} {:<12} {:>14} {:>14}",
            i + 1,
            record.category().name(),
            record.from().name(),
            record.to().name(),
            format_value(record.input()),
            format_value(record.result())
        ));
    }
    out
}

/// Closing line printed when the shell exits.
pub fn format_session_end(id: Uuid, conversions: usize, elapsed: Duration) -> String {
    let noun = if conversions == 1 { "conversion" } else { "conversions" };
    format!(
        "Session {} ended: {} {} in {}s",
        id,
        conversions,
        noun,
        elapsed.num_seconds()
    )
}

pub fn display_outcome(outcome: &Outcome) {
    println!("{}", format_outcome(outcome));
    io::stdout().flush().ok();
}
