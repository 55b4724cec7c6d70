//! Mode dispatch: turns the current view state into a computed [`Report`].

use anyhow::bail;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::analyzers::lines::analyze_lines;
use crate::analyzers::stations::analyze_stations;
use crate::analyzers::trend::analyze_trend;
use crate::analyzers::types::{LineAnalysis, StationAnalysis, TrendAnalysis};
use crate::record::Dataset;

/// The three mutually exclusive analysis views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Lines,
    Stations,
    Trend,
}

impl Mode {
    pub fn title(self) -> &'static str {
        match self {
            Mode::Lines => "Line analysis",
            Mode::Stations => "Station analysis",
            Mode::Trend => "Date trend analysis",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Lines => "lines",
            Mode::Stations => "stations",
            Mode::Trend => "trend",
        };
        f.write_str(name)
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lines" | "line" => Ok(Mode::Lines),
            "stations" | "station" => Ok(Mode::Stations),
            "trend" | "date" | "dates" => Ok(Mode::Trend),
            other => bail!("unknown mode '{other}' (expected lines, stations or trend)"),
        }
    }
}

/// Widget state: the selected mode plus the inputs each mode reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub mode: Mode,
    /// Search box text for the line and station views.
    pub search: Option<String>,
    /// Dropdown selection for the trend view.
    pub selected_line: Option<String>,
}

impl ViewState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    pub fn with_selected_line(mut self, line: Option<String>) -> Self {
        self.selected_line = line;
        self
    }
}

/// Computed content of one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Report {
    Lines(LineAnalysis),
    Stations(StationAnalysis),
    Trend(TrendAnalysis),
}

impl Report {
    pub fn mode(&self) -> Mode {
        match self {
            Report::Lines(_) => Mode::Lines,
            Report::Stations(_) => Mode::Stations,
            Report::Trend(_) => Mode::Trend,
        }
    }
}

/// Recomputes the whole view for `state` from scratch.
#[tracing::instrument(skip(dataset, state), fields(mode = %state.mode))]
pub fn run(dataset: &Dataset, state: &ViewState) -> Report {
    match state.mode {
        Mode::Lines => Report::Lines(analyze_lines(dataset, state.search.as_deref())),
        Mode::Stations => Report::Stations(analyze_stations(dataset, state.search.as_deref())),
        Mode::Trend => Report::Trend(analyze_trend(dataset, state.selected_line.as_deref())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RidershipRecord;
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        Dataset::new(vec![
            RidershipRecord::new(date, "2호선", "강남", 100, 90),
            RidershipRecord::new(date, "1호선", "서울역", 80, 70),
        ])
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("lines".parse::<Mode>().unwrap(), Mode::Lines);
        assert_eq!(" Stations ".parse::<Mode>().unwrap(), Mode::Stations);
        assert_eq!("trend".parse::<Mode>().unwrap(), Mode::Trend);
        assert!("weather".parse::<Mode>().is_err());
    }

    #[test]
    fn test_mode_display_round_trips() {
        for mode in [Mode::Lines, Mode::Stations, Mode::Trend] {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_run_dispatches_on_mode() {
        let ds = dataset();
        for mode in [Mode::Lines, Mode::Stations, Mode::Trend] {
            assert_eq!(run(&ds, &ViewState::new(mode)).mode(), mode);
        }
    }

    #[test]
    fn test_run_passes_search_to_view() {
        let state = ViewState::new(Mode::Stations).with_search(Some("강".to_string()));
        match run(&dataset(), &state) {
            Report::Stations(analysis) => {
                assert_eq!(analysis.search.unwrap().rows[0].station, "강남");
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_run_passes_selected_line_to_trend() {
        let state = ViewState::new(Mode::Trend).with_selected_line(Some("2호선".to_string()));
        match run(&dataset(), &state) {
            Report::Trend(trend) => {
                assert_eq!(trend.selected_line.as_deref(), Some("2호선"));
                assert_eq!(trend.line_daily[0].total_boarding, 100);
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_report_json_is_tagged_with_mode() {
        let report = run(&dataset(), &ViewState::new(Mode::Lines));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "lines");
        assert_eq!(json["top"].as_array().unwrap().len(), 2);
    }
}
