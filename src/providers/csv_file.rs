use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::core::cache::Cache;
use crate::core::error::FxError;
use crate::core::rate::{CurrencyObservation, ObservationProvider};

/// Lines before the data block: price/ticker/date banners.
const METADATA_LINES: usize = 3;
/// Date, Close, High, Low, Open, Volume
const EXPECTED_COLUMNS: usize = 6;
const DATE_COLUMN: usize = 0;
const CLOSE_COLUMN: usize = 1;

#[derive(Debug, Clone, PartialEq)]
struct PriceRow {
    date: NaiveDate,
    close: f64,
}

/// Accepts plain dates and the timestamped forms price exports commonly use.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

fn parse_rows(path: &Path, content: &str) -> Result<Vec<PriceRow>, FxError> {
    let data: String = content
        .split_inclusive('\n')
        .skip(METADATA_LINES)
        .collect();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| FxError::data_format(path, e.to_string()))?;
        let line = record
            .position()
            .map_or(0, |p| p.line() as usize + METADATA_LINES);

        if record.len() != EXPECTED_COLUMNS {
            return Err(FxError::data_format(
                path,
                format!(
                    "line {line}: expected {EXPECTED_COLUMNS} columns, found {}",
                    record.len()
                ),
            ));
        }

        let raw_date = &record[DATE_COLUMN];
        let date = parse_date(raw_date).ok_or_else(|| {
            FxError::data_format(path, format!("line {line}: unparseable date '{raw_date}'"))
        })?;
        let raw_close = &record[CLOSE_COLUMN];
        let close = raw_close.parse::<f64>().map_err(|_| {
            FxError::data_format(
                path,
                format!("line {line}: unparseable close value '{raw_close}'"),
            )
        })?;

        rows.push(PriceRow { date, close });
    }
    debug!(rows = rows.len(), "Parsed price rows");
    Ok(rows)
}

/// Reads a currency time series and returns its most recent close.
pub fn load_latest_observation(code: &str, path: &Path) -> Result<CurrencyObservation, FxError> {
    let content = fs::read_to_string(path)
        .map_err(|e| FxError::data_format(path, format!("cannot read file: {e}")))?;

    let mut rows = parse_rows(path, &content)?;
    // Stable sort keeps the earliest line first among equal dates.
    rows.sort_by(|a, b| b.date.cmp(&a.date));

    let most_recent = rows.first().ok_or_else(|| {
        FxError::data_format(path, "no data rows after the metadata header")
    })?;

    Ok(CurrencyObservation {
        code: code.to_string(),
        rate: most_recent.close,
        as_of: most_recent.date,
    })
}

/// Loads observations from CSV files, remembering each successful parse by path.
pub struct CsvObservationProvider {
    cache: Arc<Cache<PathBuf, CurrencyObservation>>,
}

impl CsvObservationProvider {
    pub fn new(cache: Arc<Cache<PathBuf, CurrencyObservation>>) -> Self {
        CsvObservationProvider { cache }
    }
}

impl Default for CsvObservationProvider {
    fn default() -> Self {
        Self::new(Arc::new(Cache::new()))
    }
}

impl ObservationProvider for CsvObservationProvider {
    #[instrument(name = "CsvObservationLoad", skip(self, path), fields(path = %path.display()))]
    fn latest(&self, code: &str, path: &Path) -> Result<CurrencyObservation, FxError> {
        let key = path.to_path_buf();
        // Entries may share a file, so the cached code is not trusted
        if let Some(cached) = self.cache.get(&key) {
            return Ok(CurrencyObservation {
                code: code.to_string(),
                ..cached
            });
        }

        let observation = load_latest_observation(code, path)?;
        debug!(rate = observation.rate, as_of = %observation.as_of, "Loaded observation");
        self.cache.put(key, observation.clone());
        Ok(observation)
    }
}
