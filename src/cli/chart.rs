use super::table::{NO_DATA_MESSAGE, RangeOptions, load_rows};
use super::ui;
use crate::core::config::AppConfig;
use crate::core::pricing::{ChartPoint, chart_points};
use anyhow::Result;
use console::style;

const BAR_WIDTH: usize = 40;

/// Renders current and predicted prices as paired horizontal bars.
pub fn display_as_chart(points: &[ChartPoint], currency: &str) -> String {
    if points.is_empty() {
        return ui::style_text(NO_DATA_MESSAGE, ui::StyleType::Subtle);
    }

    let max = points
        .iter()
        .flat_map(|p| [p.current_price, p.predicted_price])
        .fold(0.0_f64, f64::max);

    let mut output = format!(
        "{}  {}   {}\n\n",
        ui::style_text(&format!("Prices ({currency})"), ui::StyleType::Title),
        style("█ current").blue(),
        style("█ predicted").yellow()
    );
    for point in points {
        output.push_str(&format!(
            "{:<7} {} {:.2}\n{:<7} {} {:.2}\n",
            point.label,
            style(ui::bar(point.current_price, max, BAR_WIDTH)).blue(),
            point.current_price,
            "",
            style(ui::bar(point.predicted_price, max, BAR_WIDTH)).yellow(),
            point.predicted_price,
        ));
    }
    output
}

pub async fn run(options: &RangeOptions, config: &AppConfig) -> Result<()> {
    let rows = load_rows(options, config).await?;
    println!("{}", display_as_chart(&chart_points(&rows), &config.currency));
    Ok(())
}
