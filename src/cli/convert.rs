use super::ui;
use crate::config::AppConfig;
use crate::converter::{ConversionState, Converter};
use crate::currency::CurrencyCatalog;
use crate::notify::Notifier;
use crate::rate_provider::RateProvider;
use crate::rates::RateTable;
use anyhow::Result;
use comfy_table::Cell;
use std::sync::Arc;

/// Renders the finished conversion as a card plus the informational
/// rate line.
fn display_conversion<P: RateProvider, N: Notifier>(
    converter: &Converter<P, N>,
    state: &ConversionState,
) -> String {
    let source = converter.currency(&state.source);
    let target = converter.currency(&state.target);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Currency"),
        ui::header_cell("Amount"),
    ]);
    table.add_row(vec![
        Cell::new("From"),
        Cell::new(format!("{} {} {}", source.flag, source.code, source.name)),
        ui::value_cell(&format!("{}{}", source.symbol, state.amount_text.trim())),
    ]);
    table.add_row(vec![
        Cell::new("To"),
        Cell::new(format!("{} {} {}", target.flag, target.code, target.name)),
        ui::result_cell(&format!("{}{}", target.symbol, state.converted_text)),
    ]);

    let rate_line = format!(
        "1 {} = {} {}",
        state.source,
        converter.rate_display(&state.source, &state.target),
        state.target
    );

    format!(
        "{}\n{}",
        table,
        ui::style_text(&rate_line, ui::StyleType::Subtle)
    )
}

pub async fn run<P: RateProvider>(
    config: &AppConfig,
    catalog: Arc<CurrencyCatalog>,
    table: Arc<RateTable>,
    provider: P,
    amount: Option<String>,
    from: Option<String>,
    to: Option<String>,
) -> Result<()> {
    // Command-line arguments override the configured session defaults;
    // the session then derives its first result exactly once.
    let mut defaults = config.session_defaults();
    if let Some(from) = from {
        defaults.source = from;
    }
    if let Some(to) = to {
        defaults.target = to;
    }
    if let Some(amount) = amount {
        defaults.amount = amount;
    }

    let converter = Converter::new(
        catalog,
        table,
        provider,
        ui::ConsoleNotifier,
        config.convert_delay(),
        defaults,
    );

    let spinner = ui::new_spinner("Converting...");
    converter.recompute().await;
    spinner.finish_and_clear();

    let state = converter.state().await;
    println!("{}", display_conversion(&converter, &state));

    Ok(())
}
