use super::ui;
use crate::core::calendar::DateRange;
use crate::core::config::AppConfig;
use crate::core::pricing::{LocalTariffs, PricingRow, reconcile};
use crate::core::prediction::{FetchOutcome, PredictionProvider};
use crate::orchestrator::FetchOrchestrator;
use crate::providers::{LocalPredictionProvider, PredictionApiProvider};
use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use comfy_table::Cell;
use std::sync::Arc;
use tracing::{debug, warn};

/// Options shared by the table and chart views.
#[derive(Debug, Clone)]
pub struct RangeOptions {
    pub from: String,
    pub to: Option<String>,
    pub room_type: String,
    pub offline: bool,
    pub fill_missing: bool,
}

pub const NO_DATA_MESSAGE: &str = "No pricing data available for the selected range.";

/// Length of the range shown when no start day is given.
pub const DEFAULT_WINDOW_DAYS: u64 = 7;

/// Without `--from` the range is today through a week from today.
/// An explicit `--from` without `--to` is a single day.
pub fn default_bounds(
    from: Option<String>,
    to: Option<String>,
    today: NaiveDate,
) -> (String, Option<String>) {
    match from {
        Some(from) => (from, to),
        None => {
            let end = to.unwrap_or_else(|| {
                today
                    .checked_add_days(Days::new(DEFAULT_WINDOW_DAYS))
                    .unwrap_or(today)
                    .format("%Y-%m-%d")
                    .to_string()
            });
            (today.format("%Y-%m-%d").to_string(), Some(end))
        }
    }
}

fn count_transient(outcomes: &[FetchOutcome]) -> usize {
    outcomes
        .iter()
        .filter(|o| matches!(o, FetchOutcome::TransientError { .. }))
        .count()
}

/// Fetches predictions for the range and shapes them into rows.
pub async fn load_rows(options: &RangeOptions, config: &AppConfig) -> Result<Vec<PricingRow>> {
    let range = DateRange::parse(&options.from, options.to.as_deref())?;
    let current = config.current_resolver();
    let predicted = config.predicted_resolver();

    // Fail early on a bad room type rather than per day
    current.tariff_for(&options.room_type).with_context(|| {
        let known: Vec<&str> = current.tariffs().room_types().collect();
        format!("Cannot price the requested room type (known: {})", known.join(", "))
    })?;

    let provider: Arc<dyn PredictionProvider> = if options.offline {
        Arc::new(LocalPredictionProvider::new(
            current.clone(),
            predicted.clone(),
        ))
    } else {
        Arc::new(PredictionApiProvider::new(&config.provider.base_url)?)
    };
    let orchestrator = FetchOrchestrator::new(provider, config.provider.max_concurrency);

    let pb = ui::new_progress_bar(range.len_days()? as u64, true);
    pb.set_message("Fetching predictions...");
    let outcomes = orchestrator
        .fetch_range_with_progress(&range, &options.room_type, &|| pb.inc(1))
        .await?;
    pb.finish_and_clear();

    let fetched = outcomes.iter().filter(|o| o.is_success()).count();
    debug!(fetched, total = outcomes.len(), "Fetched predictions");

    let failed = count_transient(&outcomes);
    if failed > 0 {
        warn!(
            failed,
            total = outcomes.len(),
            "{} of {} days failed to fetch",
            failed,
            outcomes.len()
        );
    }

    let tariffs = LocalTariffs {
        current: &current,
        predicted: &predicted,
    };
    Ok(reconcile(
        &outcomes,
        &options.room_type,
        &tariffs,
        options.fill_missing,
    ))
}

pub fn display_as_table(rows: &[PricingRow], room_type: &str, currency: &str) -> String {
    if rows.is_empty() {
        return ui::style_text(NO_DATA_MESSAGE, ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Day"),
        ui::header_cell(&format!("Current ({currency})")),
        ui::header_cell(&format!("Predicted ({currency})")),
        ui::header_cell("Difference"),
        ui::header_cell("Source"),
    ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(row.date.format("%b %d, %Y")),
            Cell::new(&row.weekday),
            ui::price_cell(row.current_price),
            ui::price_cell(row.predicted_price),
            ui::difference_cell(row.difference),
            Cell::new(row.source),
        ]);
    }

    let total_difference: f64 = rows.iter().map(|r| r.difference).sum();

    let mut output = format!(
        "Room type: {}\n\n",
        ui::style_text(room_type, ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\nNet difference ({}): {}",
        ui::style_text(currency, ui::StyleType::TotalLabel),
        ui::style_text(&format!("{total_difference:+.2}"), ui::StyleType::TotalValue)
    ));

    output
}

pub async fn run(options: &RangeOptions, config: &AppConfig) -> Result<()> {
    let rows = load_rows(options, config).await?;
    println!(
        "{}",
        display_as_table(&rows, &options.room_type, &config.currency)
    );
    Ok(())
}
