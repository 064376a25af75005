use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// CellValue – a single raw spreadsheet cell
// ---------------------------------------------------------------------------

/// Text cells whose trimmed content means "no value", as spreadsheet exports
/// commonly write them.
const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "#N/A", "#N/A N/A", "#NA", "NaN", "nan", "-NaN", "-nan", "null",
    "NULL", "None", "<NA>", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

/// A dynamically-typed cell as read from a workbook or CSV file.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Dates, durations and anything else with no numeric meaning here.
    Other(String),
    Missing,
}

impl CellValue {
    /// Whether this cell counts as a missing marker for the whole-row drop.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Number(v) => v.is_nan(),
            CellValue::Text(s) => NA_TOKENS.contains(&s.trim()),
            _ => false,
        }
    }

    /// Lenient numeric coercion: anything that is not a number becomes `None`.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) if !v.is_nan() => Some(*v),
            CellValue::Text(s) if !self.is_missing() => {
                s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
            }
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) | CellValue::Other(s) => write!(f, "{s}"),
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Missing => write!(f, "<missing>"),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – parsed sheet before validation
// ---------------------------------------------------------------------------

/// Header row plus data rows, exactly as parsed. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Cell at (`row`, `col`); cells past the end of a short row are missing.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static MISSING: CellValue = CellValue::Missing;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&MISSING)
    }
}

// ---------------------------------------------------------------------------
// Record – one validated state row
// ---------------------------------------------------------------------------

/// A single state's statistics with the derived ratios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Number in Poverty")]
    pub number_in_poverty: f64,
    #[serde(rename = "Number of Millionaires")]
    pub number_of_millionaires: f64,
    #[serde(rename = "State Population")]
    pub state_population: f64,
    #[serde(rename = "Millionaire Density")]
    pub millionaire_density: f64,
    #[serde(rename = "Poverty Rate")]
    pub poverty_rate: f64,
}

impl Record {
    /// Build a record and compute its derived ratios. A zero population yields
    /// non-finite ratios; callers decide how to present those.
    pub fn new(
        state: impl Into<String>,
        number_in_poverty: f64,
        number_of_millionaires: f64,
        state_population: f64,
    ) -> Self {
        Record {
            state: state.into(),
            number_in_poverty,
            number_of_millionaires,
            state_population,
            millionaire_density: number_of_millionaires / state_population,
            poverty_rate: number_in_poverty / state_population,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the validated table
// ---------------------------------------------------------------------------

/// All records from one upload, in spreadsheet order. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// File name the dataset was loaded from.
    pub source: String,
    pub records: Vec<Record>,
    /// Rows removed because some cell was missing or not numeric.
    pub dropped_rows: usize,
}

impl Dataset {
    pub fn new(source: impl Into<String>, records: Vec<Record>, dropped_rows: usize) -> Self {
        Dataset {
            source: source.into(),
            records,
            dropped_rows,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct state names in load order.
    pub fn state_names(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .map(|r| r.state.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.records.iter().any(|r| r.state == state)
    }

    /// States whose population is zero, i.e. whose ratios are undefined.
    pub fn zero_population_states(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.state_population == 0.0)
            .map(|r| r.state.as_str())
            .collect()
    }
}
