use super::ui;
use crate::currency::CurrencyCatalog;
use anyhow::Result;
use comfy_table::Cell;

/// Renders the currency catalog.
pub fn run(catalog: &CurrencyCatalog) -> Result<()> {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Symbol"),
    ]);

    for currency in catalog.iter() {
        table.add_row(vec![
            Cell::new(&currency.flag),
            Cell::new(&currency.code),
            Cell::new(&currency.name),
            Cell::new(&currency.symbol),
        ]);
    }

    println!("{table}");
    println!(
        "{}",
        ui::style_text(
            &format!("{} currencies", catalog.len()),
            ui::StyleType::Subtle
        )
    );

    Ok(())
}
