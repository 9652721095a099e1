//! Ring charts summarizing a currency's buying power.
//!
//! A chart is a full pie of the given slices with a white hole covering 70%
//! of the radius and a bold label in the middle. Slices are normalized by
//! their sum, so the wedges always cover the whole ring.
use super::html::escape;
use crate::core::classify::Favorability;
use crate::core::rate::CurrencyMetric;
use anyhow::{Result, ensure};

pub const NEUTRAL_COLOR: &str = "#E8E8E8";
pub const OVERFLOW_COLOR: &str = "#CC0000";
const HOLE_RATIO: f64 = 0.70;
const FULL_TURN: f64 = 360.0;
const LABEL_FONT_SIZE: u32 = 22;

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub value: f64,
    pub color: String,
}

/// A slice's position on the ring, in degrees clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub start: f64,
    pub sweep: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonutChart {
    slices: Vec<Slice>,
    label: String,
}

impl DonutChart {
    /// All-zero input is replaced by a single neutral slice.
    pub fn new(values: &[f64], colors: &[&str], label: impl Into<String>) -> Result<Self> {
        ensure!(
            values.len() == colors.len(),
            "Donut needs one color per slice: {} values, {} colors",
            values.len(),
            colors.len()
        );
        ensure!(
            values.iter().all(|v| v.is_finite() && *v >= 0.0),
            "Donut slice values must be finite and non-negative: {values:?}"
        );

        let slices = if values.iter().sum::<f64>() == 0.0 {
            vec![Slice {
                value: 1.0,
                color: NEUTRAL_COLOR.to_string(),
            }]
        } else {
            values
                .iter()
                .zip(colors)
                .map(|(value, color)| Slice {
                    value: *value,
                    color: color.to_string(),
                })
                .collect()
        };

        Ok(DonutChart {
            slices,
            label: label.into(),
        })
    }

    /// Builds the chart for one currency.
    ///
    /// Up to 100% the ring fills proportionally. Above that it shows a full
    /// base slice plus the excess, clamped to another 100, so the ring
    /// saturates while the label keeps the real value.
    pub fn for_metric(
        metric: &CurrencyMetric,
        favorability: Favorability,
        label_decimals: usize,
    ) -> Result<Self> {
        let pct = metric.percentage;
        let label = format!("{pct:.label_decimals$}%");
        let fill = favorability.donut_fill();

        if metric.is_overflow() {
            let overflow = pct - 100.0;
            DonutChart::new(
                &[100.0, overflow.min(100.0), 0.0],
                &[fill, OVERFLOW_COLOR, NEUTRAL_COLOR],
                label,
            )
        } else {
            DonutChart::new(
                &[pct.min(100.0), (100.0 - pct).max(0.0)],
                &[fill, NEUTRAL_COLOR],
                label,
            )
        }
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn wedges(&self) -> Vec<Wedge> {
        let total: f64 = self.slices.iter().map(|s| s.value).sum();
        let mut start = 0.0;
        let mut wedges = Vec::new();
        for slice in &self.slices {
            let sweep = slice.value / total * FULL_TURN;
            if sweep > 0.0 {
                wedges.push(Wedge {
                    start,
                    sweep,
                    color: slice.color.clone(),
                });
            }
            start += sweep;
        }
        wedges
    }

    /// Renders an inline SVG of `size` x `size` pixels.
    pub fn to_svg(&self, size: u32) -> String {
        let center = f64::from(size) / 2.0;
        let radius = center * 0.95;
        let mut svg = format!(
            r#"<svg class="donut" xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}" role="img" aria-label="{}">"#,
            escape(&self.label)
        );

        for wedge in self.wedges() {
            let color = escape(&wedge.color);
            if wedge.sweep >= FULL_TURN - 1e-9 {
                svg.push_str(&format!(
                    r#"<circle cx="{center:.3}" cy="{center:.3}" r="{radius:.3}" fill="{color}"/>"#
                ));
                continue;
            }
            let (x0, y0) = point_on_circle(center, radius, wedge.start);
            let (x1, y1) = point_on_circle(center, radius, wedge.start + wedge.sweep);
            let large_arc = u8::from(wedge.sweep > 180.0);
            svg.push_str(&format!(
                r#"<path d="M {center:.3} {center:.3} L {x0:.3} {y0:.3} A {radius:.3} {radius:.3} 0 {large_arc} 1 {x1:.3} {y1:.3} Z" fill="{color}"/>"#
            ));
        }

        svg.push_str(&format!(
            r#"<circle cx="{center:.3}" cy="{center:.3}" r="{:.3}" fill="white"/>"#,
            radius * HOLE_RATIO
        ));
        svg.push_str(&format!(
            r#"<text x="{center:.3}" y="{center:.3}" text-anchor="middle" dominant-baseline="central" font-size="{LABEL_FONT_SIZE}" font-weight="bold">{}</text>"#,
            escape(&self.label)
        ));
        svg.push_str("</svg>");
        svg
    }
}

fn point_on_circle(center: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    (
        center + radius * radians.sin(),
        center - radius * radians.cos(),
    )
}
