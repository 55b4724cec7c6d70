//! Result rows produced by the analyzers.
//!
//! Every row is `Serialize` for JSON/CSV export and `Tabled` for terminal tables.

use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;

fn display_f64(value: &f64) -> String {
    format!("{value:.2}")
}

/// A row that carries a mean boarding/alighting pair, i.e. one group of a
/// grouped bar chart.
pub trait MeanPair {
    fn label(&self) -> &str;
    fn mean_boarding(&self) -> f64;
    fn mean_alighting(&self) -> f64;
}

/// Per-line totals and means over every record of the line.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct LineSummary {
    #[tabled(rename = "line")]
    pub line: String,
    #[tabled(rename = "total boarding")]
    pub total_boarding: u64,
    #[tabled(rename = "total alighting")]
    pub total_alighting: u64,
    #[tabled(rename = "mean boarding", display_with = "display_f64")]
    pub mean_boarding: f64,
    #[tabled(rename = "mean alighting", display_with = "display_f64")]
    pub mean_alighting: f64,
}

impl MeanPair for LineSummary {
    fn label(&self) -> &str {
        &self.line
    }
    fn mean_boarding(&self) -> f64 {
        self.mean_boarding
    }
    fn mean_alighting(&self) -> f64 {
        self.mean_alighting
    }
}

/// Row of the line search table.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct LineSearchRow {
    #[tabled(rename = "line")]
    pub line: String,
    #[tabled(rename = "total boarding")]
    pub total_boarding: u64,
    #[tabled(rename = "total alighting")]
    pub total_alighting: u64,
    #[tabled(rename = "mean boarding", display_with = "display_f64")]
    pub mean_boarding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct StationMean {
    #[tabled(rename = "station")]
    pub station: String,
    #[tabled(rename = "mean boarding", display_with = "display_f64")]
    pub mean_boarding: f64,
    #[tabled(rename = "mean alighting", display_with = "display_f64")]
    pub mean_alighting: f64,
}

impl MeanPair for StationMean {
    fn label(&self) -> &str {
        &self.station
    }
    fn mean_boarding(&self) -> f64 {
        self.mean_boarding
    }
    fn mean_alighting(&self) -> f64 {
        self.mean_alighting
    }
}

/// Row of the station search table, including the busiest boarding day.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct StationSearchRow {
    #[tabled(rename = "station")]
    pub station: String,
    #[tabled(rename = "total boarding")]
    pub total_boarding: u64,
    #[tabled(rename = "total alighting")]
    pub total_alighting: u64,
    #[tabled(rename = "mean boarding", display_with = "display_f64")]
    pub mean_boarding: f64,
    #[tabled(rename = "peak boarding date")]
    pub peak_date: NaiveDate,
    #[tabled(rename = "peak boarding")]
    pub peak_boarding: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DailyTotal {
    #[tabled(rename = "date")]
    pub date: NaiveDate,
    #[tabled(rename = "total boarding")]
    pub total_boarding: u64,
    #[tabled(rename = "total alighting")]
    pub total_alighting: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct WeekdayMean {
    #[tabled(rename = "weekday")]
    pub weekday: String,
    #[tabled(rename = "mean boarding", display_with = "display_f64")]
    pub mean_boarding: f64,
    #[tabled(rename = "mean alighting", display_with = "display_f64")]
    pub mean_alighting: f64,
}

impl MeanPair for WeekdayMean {
    fn label(&self) -> &str {
        &self.weekday
    }
    fn mean_boarding(&self) -> f64 {
        self.mean_boarding
    }
    fn mean_alighting(&self) -> f64 {
        self.mean_alighting
    }
}

/// One (label, metric) cell of a wide mean table reshaped to long form.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct LongRow {
    #[tabled(rename = "label")]
    pub label: String,
    #[tabled(rename = "metric")]
    pub metric: String,
    #[tabled(rename = "value", display_with = "display_f64")]
    pub value: f64,
}

/// Rows matched by a search box, together with the text that was searched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<T> {
    pub query: String,
    pub rows: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineAnalysis {
    pub summaries: Vec<LineSummary>,
    pub top: Vec<LineSummary>,
    pub top_long: Vec<LongRow>,
    pub search: Option<SearchResult<LineSearchRow>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationAnalysis {
    pub top: Vec<StationMean>,
    pub top_long: Vec<LongRow>,
    pub search: Option<SearchResult<StationSearchRow>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub daily: Vec<DailyTotal>,
    pub weekday: Vec<WeekdayMean>,
    pub weekday_long: Vec<LongRow>,
    pub line_names: Vec<String>,
    /// `None` only when the dataset has no lines to pick from.
    pub selected_line: Option<String>,
    pub line_daily: Vec<DailyTotal>,
}
