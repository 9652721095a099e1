use super::ui;
use crate::core::snapshot::DashboardSnapshot;
use comfy_table::{Cell, Table};

impl DashboardSnapshot {
    pub fn summary_table(&self) -> Table {
        let base_code = &self.base.code;
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("1 {base_code} =")),
            ui::header_cell(&format!("{base_code} per 1")),
            ui::header_cell("Buying power"),
            ui::header_cell("Favorability"),
            ui::header_cell("As of"),
        ]);

        for row in &self.rows {
            let name = format!("{} - {}", row.code(), row.location.currency_name());
            match &row.outcome {
                Ok(classified) => {
                    let metric = &classified.metric;
                    table.add_row(vec![
                        Cell::new(name),
                        ui::number_cell(format!("{:.2} {}", metric.rate, row.code())),
                        ui::number_cell(format!("{:.4}", metric.inverse_rate())),
                        ui::percentage_cell(
                            metric.percentage,
                            row.label_decimals,
                            classified.favorability,
                        ),
                        ui::favorability_cell(classified.favorability),
                        Cell::new(classified.observation.as_of.format("%Y-%m-%d")),
                    ]);
                }
                Err(_) => {
                    let mut cells = vec![Cell::new(name)];
                    cells.extend((0..5).map(|_| ui::na_cell()));
                    table.add_row(cells);
                }
            }
        }

        table
    }

    pub fn display_as_table(&self) -> String {
        let base_code = &self.base.code;
        let mut output = format!(
            "{}\n\n",
            ui::style_text(
                &format!("{base_code} buying power abroad"),
                ui::StyleType::Title
            )
        );
        output.push_str(&self.summary_table().to_string());

        for (row, error) in self.failures() {
            output.push_str(&format!(
                "\n{} {}",
                ui::style_text(&format!("{}:", row.code()), ui::StyleType::Error),
                ui::style_text(&error.to_string(), ui::StyleType::Subtle)
            ));
        }

        output
    }
}

pub fn run(snapshot: &DashboardSnapshot) {
    println!("{}", snapshot.display_as_table());
}

#[cfg(test)]
mod tests {
    use crate::core::classify::ClassificationTable;
    use crate::core::config::LocationMeta;
    use crate::core::error::FxError;
    use crate::core::rate::CurrencyObservation;
    use crate::core::snapshot::{ClassifiedMetric, CurrencyRow, DashboardSnapshot};
    use chrono::NaiveDate;

    fn location(code: &str, full_name: &str) -> LocationMeta {
        LocationMeta {
            code: code.to_string(),
            name: code.to_string(),
            full_name: Some(full_name.to_string()),
            lat: 0.0,
            lon: 0.0,
        }
    }

    #[test]
    fn test_display_as_table() {
        console::set_colors_enabled(false);
        let observation = CurrencyObservation {
            code: "BRL".to_string(),
            rate: 5.0,
            as_of: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        };
        let snapshot = DashboardSnapshot {
            base: location("USD", "US Dollar"),
            rows: vec![
                CurrencyRow {
                    location: location("BRL", "Brazilian Real"),
                    label_decimals: 1,
                    outcome: ClassifiedMetric::classify(
                        observation,
                        &ClassificationTable::builtin(),
                    ),
                },
                CurrencyRow {
                    location: location("ZAR", "South African Rand"),
                    label_decimals: 1,
                    outcome: Err(FxError::data_format("ZAR.csv", "no data rows")),
                },
            ],
        };

        let mut table = snapshot.summary_table();
        table.set_width(200);
        let output = table.to_string();
        assert!(output.contains("BRL - Brazilian Real"));
        assert!(output.contains("5.00 BRL"));
        assert!(output.contains("0.2000"));
        assert!(output.contains("20.0%"));
        assert!(output.contains("green"));
        assert!(output.contains("2025-03-14"));
        assert!(output.contains("N/A"));

        let output = snapshot.display_as_table();
        assert!(output.contains("USD buying power abroad"));
        assert!(output.contains("ZAR: Malformed data in ZAR.csv: no data rows"));
    }
}
