//! Favorability and marker sizing for currencies seen from a USD holder.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

pub const MIN_MARKER_RADIUS: f64 = 6.0;
pub const MAX_MARKER_RADIUS: f64 = 14.0;
pub const BASE_MARKER_RADIUS: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Favorability {
    Green,
    Red,
    Gray,
}

impl Favorability {
    /// Marker stroke and fill color name.
    pub fn marker_color(&self) -> &'static str {
        match self {
            Favorability::Green => "green",
            Favorability::Red => "red",
            Favorability::Gray => "gray",
        }
    }

    /// Fill used for the leading donut slice.
    pub fn donut_fill(&self) -> &'static str {
        match self {
            Favorability::Green => "#90EE90",
            Favorability::Red => "#FFB6C6",
            Favorability::Gray => "#A9A9A9",
        }
    }
}

impl Display for Favorability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.marker_color())
    }
}

fn default_below() -> Favorability {
    Favorability::Green
}

fn default_at_or_above() -> Favorability {
    Favorability::Red
}

/// Percentage cut-off for one currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub threshold: f64,
    #[serde(default = "default_below")]
    pub below: Favorability,
    #[serde(default = "default_at_or_above")]
    pub at_or_above: Favorability,
}

impl ThresholdRule {
    pub fn new(threshold: f64) -> Self {
        ThresholdRule {
            threshold,
            below: Favorability::Green,
            at_or_above: Favorability::Red,
        }
    }

    pub fn classify(&self, percentage: f64) -> Favorability {
        if percentage < self.threshold {
            self.below
        } else {
            self.at_or_above
        }
    }
}

/// Squeezes large percentages before they are subtracted from the max radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusRule {
    pub cap: f64,
    pub divisor: f64,
}

impl RadiusRule {
    fn adjust(&self, percentage: f64) -> f64 {
        percentage.min(self.cap) / self.divisor
    }
}

/// Lookup table from currency code to its threshold and radius rules.
#[derive(Debug, Clone, Default)]
pub struct ClassificationTable {
    thresholds: HashMap<String, ThresholdRule>,
    radii: HashMap<String, RadiusRule>,
}

impl ClassificationTable {
    /// An empty table; every code classifies as gray.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules tuned for the four currencies the dashboard ships with.
    pub fn builtin() -> Self {
        Self::new()
            .with_threshold("BRL", ThresholdRule::new(25.0))
            .with_threshold("EUR", ThresholdRule::new(100.0))
            .with_threshold("JPY", ThresholdRule::new(1.0))
            .with_threshold("ZAR", ThresholdRule::new(10.0))
            .with_radius(
                "EUR",
                RadiusRule {
                    cap: 160.0,
                    divisor: 4.0,
                },
            )
    }

    pub fn with_threshold(mut self, code: &str, rule: ThresholdRule) -> Self {
        self.thresholds.insert(code.to_uppercase(), rule);
        self
    }

    pub fn with_radius(mut self, code: &str, rule: RadiusRule) -> Self {
        self.radii.insert(code.to_uppercase(), rule);
        self
    }

    pub fn threshold_rule(&self, code: &str) -> Option<ThresholdRule> {
        self.thresholds.get(&code.to_uppercase()).copied()
    }

    /// Unknown codes are neutral rather than an error.
    pub fn favorability(&self, code: &str, percentage: f64) -> Favorability {
        self.thresholds
            .get(&code.to_uppercase())
            .map_or(Favorability::Gray, |rule| rule.classify(percentage))
    }

    /// Marker radius in `[6, 14]`, shrinking as buying power grows.
    pub fn marker_radius(&self, code: &str, percentage: f64) -> f64 {
        let adjustment = self
            .radii
            .get(&code.to_uppercase())
            .map_or(percentage, |rule| rule.adjust(percentage));
        let radius = MAX_MARKER_RADIUS - adjustment;
        if radius.is_nan() {
            return MIN_MARKER_RADIUS;
        }
        radius.clamp(MIN_MARKER_RADIUS, MAX_MARKER_RADIUS)
    }
}
