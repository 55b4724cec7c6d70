//! SVG chart rendering.
//!
//! Grouped bar charts for mean boarding/alighting pairs and dual line charts
//! for daily totals. Files are plain SVG and open in any browser.

use anyhow::Result;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::types::{DailyTotal, MeanPair};
use crate::dashboard::Report;

const SIZE: (u32, u32) = (960, 540);
const BOARDING_COLOR: RGBColor = RGBColor(31, 119, 180);
const ALIGHTING_COLOR: RGBColor = RGBColor(255, 127, 14);
const BAR_WIDTH: f64 = 0.38;

/// Upper bound for the y axis: 10% headroom above `max`, never zero.
fn y_ceiling(max: f64) -> f64 {
    if max > 0.0 { max * 1.1 } else { 1.0 }
}

/// Label for an axis position, if it falls exactly on a category index.
fn label_at<T: AsRef<str>>(labels: &[T], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels
        .get(idx as usize)
        .map(|l| l.as_ref().to_string())
        .unwrap_or_default()
}

/// Side-by-side boarding/alighting bars per row, one group per label.
pub fn grouped_bar_chart<T: MeanPair>(path: &Path, title: &str, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), groups = rows.len(), "Drawing bar chart");

    let labels: Vec<&str> = rows.iter().map(MeanPair::label).collect();
    let max = rows
        .iter()
        .map(|r| r.mean_boarding().max(r.mean_alighting()))
        .fold(0.0, f64::max);
    let groups = rows.len().max(1);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5f64..(groups as f64 - 0.5), 0f64..y_ceiling(max))?;

    let formatter = |x: &f64| label_at(&labels, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(groups)
        .x_label_formatter(&formatter)
        .y_desc("mean passengers")
        .draw()?;

    chart
        .draw_series(rows.iter().enumerate().map(|(i, r)| {
            let x = i as f64;
            Rectangle::new([(x - BAR_WIDTH, 0.0), (x, r.mean_boarding())], BOARDING_COLOR.filled())
        }))?
        .label("boarding")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], BOARDING_COLOR.filled()));

    chart
        .draw_series(rows.iter().enumerate().map(|(i, r)| {
            let x = i as f64;
            Rectangle::new([(x, 0.0), (x + BAR_WIDTH, r.mean_alighting())], ALIGHTING_COLOR.filled())
        }))?
        .label("alighting")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], ALIGHTING_COLOR.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Total boarding and total alighting per day as two lines.
pub fn daily_line_chart(path: &Path, title: &str, series: &[DailyTotal]) -> Result<()> {
    debug!(path = %path.display(), points = series.len(), "Drawing line chart");

    let labels: Vec<String> = series.iter().map(|d| d.date.format("%m-%d").to_string()).collect();
    let max = series
        .iter()
        .map(|d| d.total_boarding.max(d.total_alighting))
        .max()
        .unwrap_or(0) as f64;
    let last = series.len().saturating_sub(1).max(1) as f64;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(0f64..last, 0f64..y_ceiling(max))?;

    let formatter = |x: &f64| label_at(&labels, *x);
    chart
        .configure_mesh()
        .x_labels(series.len().clamp(1, 15))
        .x_label_formatter(&formatter)
        .y_desc("passengers")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            series
                .iter()
                .enumerate()
                .map(|(i, d)| (i as f64, d.total_boarding as f64)),
            BOARDING_COLOR.stroke_width(2),
        ))?
        .label("boarding")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BOARDING_COLOR));

    chart
        .draw_series(LineSeries::new(
            series
                .iter()
                .enumerate()
                .map(|(i, d)| (i as f64, d.total_alighting as f64)),
            ALIGHTING_COLOR.stroke_width(2),
        ))?
        .label("alighting")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ALIGHTING_COLOR));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Draws every chart of `report` into `dir`. Returns the files written.
#[tracing::instrument(skip_all, fields(dir = %dir.display(), mode = %report.mode()))]
pub fn render_charts(dir: &Path, report: &Report) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    match report {
        Report::Lines(a) => {
            let path = dir.join("top_lines.svg");
            let title = format!("Mean boarding/alighting of top {} lines", a.top.len());
            grouped_bar_chart(&path, &title, &a.top)?;
            written.push(path);
        }
        Report::Stations(a) => {
            let path = dir.join("top_stations.svg");
            let title = format!("Mean boarding/alighting of top {} stations", a.top.len());
            grouped_bar_chart(&path, &title, &a.top)?;
            written.push(path);
        }
        Report::Trend(a) => {
            let path = dir.join("daily_totals.svg");
            daily_line_chart(&path, "Total boarding/alighting per day", &a.daily)?;
            written.push(path);

            let path = dir.join("weekday_means.svg");
            grouped_bar_chart(&path, "Mean boarding/alighting per weekday", &a.weekday)?;
            written.push(path);

            if let Some(line) = &a.selected_line {
                let path = dir.join("line_trend.svg");
                let title = format!("{line} boarding/alighting per day");
                daily_line_chart(&path, &title, &a.line_daily)?;
                written.push(path);
            }
        }
    }

    info!(charts = written.len(), "Charts written");
    Ok(written)
}
