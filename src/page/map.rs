//! Leaflet world map with one circle marker per currency.
use super::html::{escape, script_safe_json};
use crate::core::classify::{BASE_MARKER_RADIUS, Favorability};
use crate::core::config::{LocationMeta, MapConfig};
use crate::core::error::FxError;
use crate::core::snapshot::{ClassifiedMetric, CurrencyRow, DashboardSnapshot};
use anyhow::{Context, Result};
use serde::Serialize;

pub const MAP_ELEMENT_ID: &str = "fx-map";
pub const LAYER_NAME: &str = "Currencies";

const BASE_FILL_OPACITY: f64 = 0.9;
const CURRENCY_FILL_OPACITY: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
    pub color: &'static str,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    /// Popup body; HTML, with all data-derived text escaped.
    pub popup: String,
}

#[derive(Serialize)]
struct MapSettings<'a> {
    element: &'a str,
    center: [f64; 2],
    zoom: u8,
    tiles: &'a str,
    attribution: &'a str,
    layer: &'a str,
}

pub fn base_marker(base: &LocationMeta) -> MapMarker {
    let gray = Favorability::Gray.marker_color();
    MapMarker {
        lat: base.lat,
        lon: base.lon,
        radius: BASE_MARKER_RADIUS,
        color: gray,
        fill_color: gray,
        fill_opacity: BASE_FILL_OPACITY,
        popup: format!(
            "{} (base currency: {})",
            escape(&base.name),
            escape(&base.code)
        ),
    }
}

/// `rate` to 2 decimals, the inverse rate to 4.
pub fn currency_popup(location: &LocationMeta, classified: &ClassifiedMetric) -> String {
    let code = escape(&location.code);
    format!(
        "<b>{}</b><br>1 USD = {:.2} {code}<br>USD per 1 {code}: {:.4}<br>Date: {}",
        escape(&location.name),
        classified.metric.rate,
        classified.metric.inverse_rate(),
        classified.observation.as_of.format("%Y-%m-%d"),
    )
}

fn unavailable_popup(location: &LocationMeta, error: &FxError) -> String {
    format!(
        "<b>{}</b><br>{} data unavailable<br>{}",
        escape(&location.name),
        escape(&location.code),
        escape(&error.to_string())
    )
}

pub fn currency_marker(row: &CurrencyRow) -> MapMarker {
    let location = &row.location;
    match &row.outcome {
        Ok(classified) => {
            let color = classified.favorability.marker_color();
            MapMarker {
                lat: location.lat,
                lon: location.lon,
                radius: classified.radius,
                color,
                fill_color: color,
                fill_opacity: CURRENCY_FILL_OPACITY,
                popup: currency_popup(location, classified),
            }
        }
        Err(e) => {
            let gray = Favorability::Gray.marker_color();
            MapMarker {
                lat: location.lat,
                lon: location.lon,
                radius: BASE_MARKER_RADIUS,
                color: gray,
                fill_color: gray,
                fill_opacity: CURRENCY_FILL_OPACITY,
                popup: unavailable_popup(location, e),
            }
        }
    }
}

/// Base currency first, then the configured currencies in order.
pub fn markers(snapshot: &DashboardSnapshot) -> Vec<MapMarker> {
    std::iter::once(base_marker(&snapshot.base))
        .chain(snapshot.rows.iter().map(currency_marker))
        .collect()
}

/// Map container plus the script that populates it.
pub fn render_map(snapshot: &DashboardSnapshot, config: &MapConfig) -> Result<String> {
    let settings = MapSettings {
        element: MAP_ELEMENT_ID,
        center: config.center,
        zoom: config.zoom,
        tiles: &config.tiles,
        attribution: &config.attribution,
        layer: LAYER_NAME,
    };
    let settings_json =
        serde_json::to_string(&settings).context("Failed to serialize map settings")?;
    let markers_json =
        serde_json::to_string(&markers(snapshot)).context("Failed to serialize map markers")?;

    Ok(format!(
        r#"<div id="{MAP_ELEMENT_ID}" class="map" style="height: {height}px;"></div>
<script>
(function () {{
  var settings = {settings};
  var markers = {markers};
  var map = L.map(settings.element).setView(settings.center, settings.zoom);
  L.tileLayer(settings.tiles, {{ attribution: settings.attribution, subdomains: "abcd", maxZoom: 20 }}).addTo(map);
  var group = L.featureGroup().addTo(map);
  markers.forEach(function (m) {{
    L.circleMarker([m.lat, m.lon], {{
      radius: m.radius,
      color: m.color,
      fill: true,
      fillColor: m.fill_color,
      fillOpacity: m.fill_opacity
    }}).bindPopup(m.popup).addTo(group);
  }});
  var overlays = {{}};
  overlays[settings.layer] = group;
  L.control.layers(null, overlays, {{ collapsed: false }}).addTo(map);
}})();
</script>"#,
        height = config.height,
        settings = script_safe_json(&settings_json),
        markers = script_safe_json(&markers_json),
    ))
}
