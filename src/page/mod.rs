//! Single page HTML dashboard: intro text, world map and a donut per currency.

pub mod donut;
pub mod html;
pub mod map;

use crate::core::config::MapConfig;
use crate::core::error::FxError;
use crate::core::snapshot::{ClassifiedMetric, CurrencyRow, DashboardSnapshot};
use anyhow::{Context, Result};
use donut::DonutChart;
use html::escape;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const PAGE_TITLE: &str = "US Dollar compared to international currency";
const SUBHEADER: &str = "How your dollar will transfer for your next vacation abroad";
const DONUT_SIZE: u32 = 240;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; margin: 2rem; color: #262730; }
h1 { margin-bottom: 0.25rem; }
.band { display: grid; grid-template-columns: 1fr 2fr; gap: 2rem; }
.donuts { display: grid; grid-template-columns: repeat(var(--columns), 1fr); gap: 1.5rem; }
.donut-card { text-align: center; }
.caption { color: #808495; font-size: 0.875rem; }
.error-panel { border: 1px solid #ff4b4b; background: #fff0f0; border-radius: 0.5rem; padding: 1rem; color: #7d1a1a; }
.map { width: 100%; }
"#;

fn currency_title(row: &CurrencyRow) -> String {
    format!(
        "{} - {}",
        escape(&row.location.code),
        escape(row.location.currency_name())
    )
}

fn donut_card(row: &CurrencyRow, classified: &ClassifiedMetric) -> Result<String> {
    let chart = DonutChart::for_metric(
        &classified.metric,
        classified.favorability,
        row.label_decimals,
    )
    .with_context(|| format!("Failed to build donut for {}", row.code()))?;

    Ok(format!(
        r#"<div class="donut-card">{svg}<p><strong>{title}</strong></p><p class="caption">1 USD = {rate:.2} {code}</p></div>"#,
        svg = chart.to_svg(DONUT_SIZE),
        title = currency_title(row),
        rate = classified.metric.rate,
        code = escape(row.code()),
    ))
}

fn error_card(row: &CurrencyRow, error: &FxError) -> String {
    format!(
        r#"<div class="donut-card"><div class="error-panel"><p><strong>{title}</strong></p><p>Rate data unavailable</p><p class="caption">{error}</p></div></div>"#,
        title = currency_title(row),
        error = escape(&error.to_string()),
    )
}

fn currency_card(row: &CurrencyRow) -> Result<String> {
    match &row.outcome {
        Ok(classified) => donut_card(row, classified),
        Err(e) => Ok(error_card(row, e)),
    }
}

/// Renders the complete HTML document for a snapshot.
pub fn render_page(snapshot: &DashboardSnapshot, map_config: &MapConfig) -> Result<String> {
    let map = map::render_map(snapshot, map_config)?;
    let cards = snapshot
        .rows
        .iter()
        .map(currency_card)
        .collect::<Result<Vec<_>>>()?
        .join("\n");
    debug!(currencies = snapshot.rows.len(), "Composed dashboard");

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Currency Comparison</title>
<link rel="stylesheet" href="{LEAFLET_CSS}">
<script src="{LEAFLET_JS}"></script>
<style>{STYLE}</style>
</head>
<body>
<h1>{PAGE_TITLE}</h1>
<h2>{SUBHEADER}</h2>
<section class="band">
<div>
<h3>This info will tell you best conversion rate to the US dollar</h3>
<p><strong>Green is good; red is bad</strong> (from a US traveler&#39;s perspective)</p>
</div>
<div>
<h3>World view</h3>
<p class="caption">Green &asymp; better USD buying power &middot; Red &asymp; stronger local currency vs USD</p>
{map}
</div>
</section>
<hr>
<h3>Currency Exchange Rates</h3>
<section class="donuts" style="--columns: {columns};">
{cards}
</section>
<hr>
<p class="caption">Tip: Update the CSV files to refresh rates; the dashboard reads the latest row.</p>
</body>
</html>
"#,
        columns = snapshot.rows.len().max(1),
    ))
}

pub fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, html)
        .with_context(|| format!("Failed to write dashboard to {}", path.display()))?;
    info!("Wrote dashboard to {}", path.display());
    Ok(())
}
