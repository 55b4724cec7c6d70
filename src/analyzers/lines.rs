//! Line analysis: per-line totals and means, the busiest lines, and line search.

use crate::analyzers::aggregate::{group_by, melt, top_by_mean_boarding};
use crate::analyzers::types::{LineAnalysis, LineSearchRow, LineSummary, SearchResult};
use crate::analyzers::utility::{matches_search, normalize_search};
use crate::record::{Dataset, RidershipRecord};
use tracing::debug;

/// Number of lines shown in the mean boarding bar chart.
pub const TOP_LINES: usize = 7;

/// Sum and mean of boarding/alighting per line, in line name order.
pub fn line_summaries(records: &[RidershipRecord]) -> Vec<LineSummary> {
    group_by(records, |r| r.line.as_str())
        .into_iter()
        .map(|(line, totals)| LineSummary {
            line: line.to_string(),
            total_boarding: totals.boarding,
            total_alighting: totals.alighting,
            mean_boarding: totals.mean_boarding(),
            mean_alighting: totals.mean_alighting(),
        })
        .collect()
}

/// Lines whose name contains `query`, summarized over their own records.
pub fn search_lines(records: &[RidershipRecord], query: &str) -> Vec<LineSearchRow> {
    let matching = records.iter().filter(|r| matches_search(&r.line, query));

    group_by(matching, |r| r.line.as_str())
        .into_iter()
        .map(|(line, totals)| LineSearchRow {
            line: line.to_string(),
            total_boarding: totals.boarding,
            total_alighting: totals.alighting,
            mean_boarding: totals.mean_boarding(),
        })
        .collect()
}

/// Everything the line view shows.
#[tracing::instrument(skip(dataset), fields(records = dataset.len()))]
pub fn analyze_lines(dataset: &Dataset, search: Option<&str>) -> LineAnalysis {
    let summaries = line_summaries(dataset.records());
    let top = top_by_mean_boarding(&summaries, TOP_LINES);
    let top_long = melt(&top);

    let search = normalize_search(search).map(|query| {
        let rows = search_lines(dataset.records(), query);
        debug!(query, matches = rows.len(), "Line search");
        SearchResult {
            query: query.to_string(),
            rows,
        }
    });

    LineAnalysis {
        summaries,
        top,
        top_long,
        search,
    }
}
