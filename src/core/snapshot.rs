//! Builds the immutable view of every configured currency that the page and
//! the terminal summary are rendered from.
use crate::core::classify::{ClassificationTable, Favorability};
use crate::core::config::{AppConfig, CurrencyConfig, LocationMeta};
use crate::core::error::FxError;
use crate::core::rate::{CurrencyMetric, CurrencyObservation, ObservationProvider};
use anyhow::Result;
use tracing::{debug, warn};

/// A metric with its favorability and marker size resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedMetric {
    pub observation: CurrencyObservation,
    pub metric: CurrencyMetric,
    pub favorability: Favorability,
    pub radius: f64,
}

impl ClassifiedMetric {
    pub fn classify(
        observation: CurrencyObservation,
        table: &ClassificationTable,
    ) -> Result<Self, FxError> {
        let metric = CurrencyMetric::from_observation(&observation)?;
        let favorability = table.favorability(&metric.code, metric.percentage);
        let radius = table.marker_radius(&metric.code, metric.percentage);
        Ok(ClassifiedMetric {
            observation,
            metric,
            favorability,
            radius,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyRow {
    pub location: LocationMeta,
    pub label_decimals: usize,
    pub outcome: Result<ClassifiedMetric, FxError>,
}

impl CurrencyRow {
    pub fn code(&self) -> &str {
        &self.location.code
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub base: LocationMeta,
    pub rows: Vec<CurrencyRow>,
}

impl DashboardSnapshot {
    pub fn failures(&self) -> impl Iterator<Item = (&CurrencyRow, &FxError)> {
        self.rows
            .iter()
            .filter_map(|row| row.outcome.as_ref().err().map(|e| (row, e)))
    }
}

fn load_row(
    config: &AppConfig,
    currency: &CurrencyConfig,
    provider: &dyn ObservationProvider,
    table: &ClassificationTable,
) -> CurrencyRow {
    let code = &currency.location.code;
    let path = config.csv_path(currency);
    debug!(code = %code, path = %path.display(), "Loading currency");

    let outcome = provider.latest(code, &path).and_then(|observation| {
        let observation = CurrencyObservation {
            code: code.clone(),
            ..observation
        };
        ClassifiedMetric::classify(observation, table)
    });

    CurrencyRow {
        location: currency.location.clone(),
        label_decimals: currency.label_decimals(),
        outcome,
    }
}

/// Loads, derives and classifies every configured currency.
///
/// A failing currency is kept as an error row so the rest of the dashboard
/// still renders. With `strict` set, the first failure aborts the build
/// instead.
pub fn build_snapshot(
    config: &AppConfig,
    provider: &dyn ObservationProvider,
    strict: bool,
    update_callback: &dyn Fn(),
) -> Result<DashboardSnapshot> {
    let table = config.classification_table();
    let mut rows = Vec::with_capacity(config.currencies.len());

    for currency in &config.currencies {
        let row = load_row(config, currency, provider, &table);
        update_callback();

        if let Err(e) = &row.outcome {
            if strict {
                return Err(anyhow::Error::new(e.clone())
                    .context(format!("Failed to load currency {}", row.code())));
            }
            warn!(code = %row.code(), error = %e, "Currency unavailable, rendering error panel");
        }
        rows.push(row);
    }

    Ok(DashboardSnapshot {
        base: config.base.clone(),
        rows,
    })
}
