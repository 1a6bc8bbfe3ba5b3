use super::ui;
use crate::core::config::AppConfig;
use crate::core::dashboard::{DashboardData, load_or_default};
use crate::providers::DashboardApiProvider;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

impl DashboardData {
    pub fn display_as_tables(&self, currency: &str) -> String {
        let mut revenue = ui::new_styled_table();
        revenue.set_header(vec![
            ui::header_cell("Month"),
            ui::header_cell(&format!("Actual ({currency})")),
            ui::header_cell(&format!("Predicted ({currency})")),
        ]);
        for point in &self.revenue_comparison {
            revenue.add_row(vec![
                Cell::new(&point.month),
                ui::price_cell(point.actual_revenue),
                ui::price_cell(point.predicted_revenue),
            ]);
        }

        let mut occupancy = ui::new_styled_table();
        occupancy.set_header(vec![ui::header_cell("Month"), ui::header_cell("Occupancy (%)")]);
        for point in &self.occupancy_trends {
            occupancy.add_row(vec![
                Cell::new(&point.month),
                Cell::new(format!("{:.1}%", point.occupancy_rate))
                    .set_alignment(CellAlignment::Right),
            ]);
        }

        let mut demand = ui::new_styled_table();
        demand.set_header(vec![ui::header_cell("Season"), ui::header_cell("Demand")]);
        for point in &self.seasonal_demand {
            demand.add_row(vec![
                Cell::new(&point.season),
                Cell::new(format!("{:.0}", point.demand)).set_alignment(CellAlignment::Right),
            ]);
        }

        let mut output = String::new();
        for (title, table) in [
            ("Revenue Comparison", revenue),
            ("Occupancy Trends", occupancy),
            ("Seasonal Demand", demand),
        ] {
            output.push_str(&format!(
                "{}\n\n{}\n\n",
                ui::style_text(title, ui::StyleType::Title),
                table
            ));
        }

        let uplift = self
            .revenue_uplift_pct()
            .map_or("N/A".to_string(), |u| format!("{u:+.2}%"));
        let occupancy_avg = self
            .average_occupancy()
            .map_or("N/A".to_string(), |o| format!("{o:.1}%"));
        let peak = self
            .peak_season()
            .map_or("N/A".to_string(), |p| p.season.clone());

        output.push_str(&format!(
            "{} {}   {} {}   {} {}",
            ui::style_text("Revenue uplift:", ui::StyleType::TotalLabel),
            ui::style_text(&uplift, ui::StyleType::TotalValue),
            ui::style_text("Avg occupancy:", ui::StyleType::TotalLabel),
            ui::style_text(&occupancy_avg, ui::StyleType::TotalValue),
            ui::style_text("Peak season:", ui::StyleType::TotalLabel),
            ui::style_text(&peak, ui::StyleType::TotalValue),
        ));
        output
    }
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let provider = DashboardApiProvider::new(&config.provider.base_url)?;
    let data = load_or_default(&provider).await;
    println!("{}", data.display_as_tables(&config.currency));
    Ok(())
}
