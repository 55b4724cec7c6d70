//! Output formatting and persistence for computed reports.
//!
//! Supports terminal tables, JSON serialization, and CSV export.

use anyhow::{Context, Result};
use clap::ValueEnum;
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{debug, info};

use crate::dashboard::Report;
use crate::record::Dataset;

/// Rows shown by the dataset preview above every view.
pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

fn write_section<W: Write, T: Tabled>(out: &mut W, title: &str, rows: &[T]) -> Result<()> {
    writeln!(out, "\n{title}")?;
    if rows.is_empty() {
        writeln!(out, "(no rows)")?;
    } else {
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        writeln!(out, "{table}")?;
    }
    Ok(())
}

/// Writes the first `rows` records of the dataset as a table.
pub fn write_preview<W: Write>(out: &mut W, dataset: &Dataset, rows: usize) -> Result<()> {
    write_section(
        out,
        &format!("Preview ({} of {} records)", rows.min(dataset.len()), dataset.len()),
        dataset.head(rows),
    )
}

/// Writes every table of `report` under a heading for its view.
pub fn write_report_table<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    writeln!(out, "\n== {} ==", report.mode().title())?;

    match report {
        Report::Lines(a) => {
            write_section(out, "Boarding/alighting per line", &a.summaries)?;
            write_section(
                out,
                &format!("Top {} lines by mean boarding", a.top.len()),
                &a.top,
            )?;
            if let Some(search) = &a.search {
                write_section(out, &format!("Lines matching '{}'", search.query), &search.rows)?;
            }
        }
        Report::Stations(a) => {
            write_section(
                out,
                &format!("Top {} stations by mean boarding", a.top.len()),
                &a.top,
            )?;
            if let Some(search) = &a.search {
                write_section(
                    out,
                    &format!("Stations matching '{}'", search.query),
                    &search.rows,
                )?;
            }
        }
        Report::Trend(a) => {
            write_section(out, "Daily totals", &a.daily)?;
            write_section(out, "Mean boarding/alighting per weekday", &a.weekday)?;
            match &a.selected_line {
                Some(line) => write_section(out, &format!("Daily totals for {line}"), &a.line_daily)?,
                None => writeln!(out, "\nNo lines to choose from")?,
            }
        }
    }

    Ok(())
}

/// Writes `report` as pretty-printed JSON.
pub fn write_report_json<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Writes `rows` to a fresh CSV file at `path`, header first.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

fn export_table<T: Serialize>(
    dir: &Path,
    name: &str,
    rows: &[T],
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let path = dir.join(name);
    write_csv(&path, rows)?;
    written.push(path);
    Ok(())
}

/// Exports every table of `report` as its own CSV file inside `dir`.
///
/// Returns the paths written.
pub fn export_csv(dir: &Path, report: &Report) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let mut written = Vec::new();

    match report {
        Report::Lines(a) => {
            export_table(dir, "line_summaries.csv", &a.summaries, &mut written)?;
            export_table(dir, "top_lines.csv", &a.top, &mut written)?;
            export_table(dir, "top_lines_long.csv", &a.top_long, &mut written)?;
            if let Some(search) = &a.search {
                export_table(dir, "line_search.csv", &search.rows, &mut written)?;
            }
        }
        Report::Stations(a) => {
            export_table(dir, "top_stations.csv", &a.top, &mut written)?;
            export_table(dir, "top_stations_long.csv", &a.top_long, &mut written)?;
            if let Some(search) = &a.search {
                export_table(dir, "station_search.csv", &search.rows, &mut written)?;
            }
        }
        Report::Trend(a) => {
            export_table(dir, "daily_totals.csv", &a.daily, &mut written)?;
            export_table(dir, "weekday_means.csv", &a.weekday, &mut written)?;
            export_table(dir, "weekday_means_long.csv", &a.weekday_long, &mut written)?;
            export_table(dir, "line_trend.csv", &a.line_daily, &mut written)?;
        }
    }

    info!(dir = %dir.display(), files = written.len(), "CSV export complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{Mode, ViewState, run};
    use crate::record::RidershipRecord;
    use chrono::NaiveDate;
    use std::env;
    use std::fs;

    fn dataset() -> Dataset {
        let d1 = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 9, 2).unwrap();
        Dataset::new(vec![
            RidershipRecord::new(d1, "2호선", "강남", 100, 90),
            RidershipRecord::new(d2, "2호선", "강남", 150, 80),
            RidershipRecord::new(d1, "1호선", "서울역", 80, 70),
        ])
    }

    fn temp_dir(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn render(report: &Report) -> String {
        let mut out = Vec::new();
        write_report_table(&mut out, report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_preview_shows_head() {
        let mut out = Vec::new();
        write_preview(&mut out, &dataset(), 2).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Preview (2 of 3 records)"));
        assert!(text.contains("강남"));
        assert!(!text.contains("서울역"));
    }

    #[test]
    fn test_station_table_includes_peak_day() {
        let state = ViewState::new(Mode::Stations).with_search(Some("강남".to_string()));
        let text = render(&run(&dataset(), &state));
        assert!(text.contains("== Station analysis =="));
        assert!(text.contains("Stations matching '강남'"));
        assert!(text.contains("2025-09-02"));
        assert!(text.contains("125.00"));
    }

    #[test]
    fn test_empty_search_table_renders_no_rows() {
        let state = ViewState::new(Mode::Lines).with_search(Some("9호선".to_string()));
        let text = render(&run(&dataset(), &state));
        assert!(text.contains("Lines matching '9호선'\n(no rows)"));
    }

    #[test]
    fn test_json_output_parses_back() {
        let report = run(&dataset(), &ViewState::new(Mode::Trend));
        let mut out = Vec::new();
        write_report_json(&mut out, &report).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["mode"], "trend");
        assert_eq!(value["selected_line"], "1호선");
        assert_eq!(value["daily"][0]["total_boarding"], 180);
    }

    #[test]
    fn test_write_csv_writes_header_and_rows() {
        let dir = temp_dir("ridership_explorer_test_write_csv");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("daily.csv");

        let report = run(&dataset(), &ViewState::new(Mode::Trend));
        let Report::Trend(trend) = report else {
            panic!("expected trend report");
        };
        write_csv(&path, &trend.daily).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "date,total_boarding,total_alighting");
        assert_eq!(lines[1], "2025-09-01,180,160");
        assert_eq!(lines.len(), 3);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_csv_lines_with_search() {
        let dir = temp_dir("ridership_explorer_test_export_lines");
        let _ = fs::remove_dir_all(&dir);

        let state = ViewState::new(Mode::Lines).with_search(Some("2".to_string()));
        let written = export_csv(&dir, &run(&dataset(), &state)).unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "line_summaries.csv",
                "top_lines.csv",
                "top_lines_long.csv",
                "line_search.csv"
            ]
        );
        assert!(written.iter().all(|p| p.exists()));

        fs::remove_dir_all(&dir).unwrap();
    }
}
