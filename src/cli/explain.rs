use super::ui;
use crate::core::calendar::parse_day;
use crate::core::config::AppConfig;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

/// Describes which tariff tier applies to a day and why.
pub fn explain(date: NaiveDate, room_type: &str, config: &AppConfig) -> Result<String> {
    let current = config.current_resolver();
    let predicted = config.predicted_resolver();

    let kind = current.classify(date);
    let current_price = current.resolve_local_price(date, room_type)?;
    let predicted_price = predicted.resolve_local_price(date, room_type)?;

    let mut table = ui::new_styled_table();
    table.add_row(vec![
        ui::header_cell("Date"),
        Cell::new(date.format("%b %d, %Y (%A)")),
    ]);
    table.add_row(vec![ui::header_cell("Classification"), Cell::new(kind)]);
    table.add_row(vec![
        ui::header_cell(&format!("Current ({})", config.currency)),
        ui::price_cell(current_price),
    ]);
    table.add_row(vec![
        ui::header_cell(&format!("Predicted ({})", config.currency)),
        ui::price_cell(predicted_price),
    ]);

    let mut output = format!(
        "Room type: {}\n\n",
        ui::style_text(room_type, ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\n{}",
        ui::style_text(&current.resolve_reason(date, room_type), ui::StyleType::TotalLabel)
    ));
    Ok(output)
}

pub fn run(date: &str, room_type: &str, config: &AppConfig) -> Result<()> {
    let date = parse_day(date)?;
    println!("{}", explain(date, room_type, config)?);
    Ok(())
}
