use super::ui;
use crate::config::AppConfig;
use crate::currency::CurrencyCatalog;
use crate::rate_provider::RateProvider;
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;

/// Renders the rate from a base currency to every other catalog entry.
pub async fn run(
    config: &AppConfig,
    catalog: &CurrencyCatalog,
    provider: &dyn RateProvider,
    base: Option<String>,
) -> Result<()> {
    let base = base.unwrap_or_else(|| config.defaults.source.clone());
    let base_currency = catalog.get(&base).clone();

    let quotes: Vec<_> = catalog
        .iter()
        .filter(|c| c.code != base_currency.code)
        .collect();

    let pb = ui::new_progress_bar(quotes.len() as u64, true);
    pb.set_message("Resolving rates...");

    let base_code: &str = &base_currency.code;
    let rate_futures = quotes.iter().map(|quote| {
        let pb_clone = pb.clone();
        async move {
            let res = provider.get_rate(base_code, &quote.code).await;
            pb_clone.inc(1);
            (*quote, res)
        }
    });

    let resolved = join_all(rate_futures).await;
    pb.finish_and_clear();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Rate (per 1 {})", base_currency.code)),
    ]);

    for (quote, rate) in resolved {
        let rate_cell = match rate {
            Ok(rate) => ui::value_cell(&format!("{rate:.4}")),
            Err(_) => ui::na_cell(true),
        };
        table.add_row(vec![
            Cell::new(&quote.flag),
            Cell::new(&quote.code),
            Cell::new(&quote.name),
            rate_cell,
        ]);
    }

    println!(
        "Exchange rates for {}\n\n{}",
        ui::style_text(
            &format!("1 {} ({})", base_currency.code, base_currency.name),
            ui::StyleType::Title
        ),
        table
    );

    Ok(())
}
