//! Station analysis: busiest stations by mean boarding and station search with
//! each station's peak boarding day.

use crate::analyzers::aggregate::{GroupTotals, group_by, melt, top_by_mean_boarding};
use crate::analyzers::types::{SearchResult, StationAnalysis, StationMean, StationSearchRow};
use crate::analyzers::utility::{matches_search, normalize_search};
use crate::record::{Dataset, RidershipRecord};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Number of stations shown in the mean boarding bar chart.
pub const TOP_STATIONS: usize = 5;

pub fn station_means(records: &[RidershipRecord]) -> Vec<StationMean> {
    group_by(records, |r| r.station.as_str())
        .into_iter()
        .map(|(station, totals)| StationMean {
            station: station.to_string(),
            mean_boarding: totals.mean_boarding(),
            mean_alighting: totals.mean_alighting(),
        })
        .collect()
}

/// Stations whose name contains `query`, with totals and the day each had its
/// highest boarding count.
///
/// When several records share the maximum, the first one in file order wins.
pub fn search_stations(records: &[RidershipRecord], query: &str) -> Vec<StationSearchRow> {
    let mut groups: BTreeMap<&str, (GroupTotals, NaiveDate, u64)> = BTreeMap::new();

    for record in records.iter().filter(|r| matches_search(&r.station, query)) {
        let entry = groups
            .entry(record.station.as_str())
            .or_insert((GroupTotals::default(), record.date, record.boarding));
        entry.0.add(record);
        if record.boarding > entry.2 {
            entry.1 = record.date;
            entry.2 = record.boarding;
        }
    }

    groups
        .into_iter()
        .map(|(station, (totals, peak_date, peak_boarding))| StationSearchRow {
            station: station.to_string(),
            total_boarding: totals.boarding,
            total_alighting: totals.alighting,
            mean_boarding: totals.mean_boarding(),
            peak_date,
            peak_boarding,
        })
        .collect()
}

/// Everything the station view shows.
#[tracing::instrument(skip(dataset), fields(records = dataset.len()))]
pub fn analyze_stations(dataset: &Dataset, search: Option<&str>) -> StationAnalysis {
    let means = station_means(dataset.records());
    let top = top_by_mean_boarding(&means, TOP_STATIONS);
    let top_long = melt(&top);

    let search = normalize_search(search).map(|query| {
        let rows = search_stations(dataset.records(), query);
        debug!(query, matches = rows.len(), "Station search");
        SearchResult {
            query: query.to_string(),
            rows,
        }
    });

    StationAnalysis {
        top,
        top_long,
        search,
    }
}
