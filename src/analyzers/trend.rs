//! Date trend analysis: daily totals, weekday means and a single line's daily totals.

use crate::analyzers::aggregate::{group_by, melt};
use crate::analyzers::types::{DailyTotal, TrendAnalysis, WeekdayMean};
use crate::record::{Dataset, RidershipRecord};
use tracing::{debug, warn};

/// Boarding/alighting sums per date, oldest first.
pub fn daily_totals<'a, I>(records: I) -> Vec<DailyTotal>
where
    I: IntoIterator<Item = &'a RidershipRecord>,
{
    group_by(records, |r| r.date)
        .into_iter()
        .map(|(date, totals)| DailyTotal {
            date,
            total_boarding: totals.boarding,
            total_alighting: totals.alighting,
        })
        .collect()
}

/// Boarding/alighting means per weekday name.
///
/// Weekdays come out in label order (Friday, Monday, Saturday, ...), not
/// calendar order.
pub fn weekday_means(records: &[RidershipRecord]) -> Vec<WeekdayMean> {
    group_by(records, RidershipRecord::weekday_name)
        .into_iter()
        .map(|(weekday, totals)| WeekdayMean {
            weekday: weekday.to_string(),
            mean_boarding: totals.mean_boarding(),
            mean_alighting: totals.mean_alighting(),
        })
        .collect()
}

/// Daily totals restricted to records of exactly `line`.
pub fn line_daily_totals(records: &[RidershipRecord], line: &str) -> Vec<DailyTotal> {
    daily_totals(records.iter().filter(|r| r.line == line))
}

/// Everything the trend view shows. Without a selection the first line name
/// (in sorted order) is used.
#[tracing::instrument(skip(dataset), fields(records = dataset.len()))]
pub fn analyze_trend(dataset: &Dataset, selected_line: Option<&str>) -> TrendAnalysis {
    let records = dataset.records();
    let daily = daily_totals(records);
    let weekday = weekday_means(records);
    let weekday_long = melt(&weekday);
    let line_names = dataset.line_names();

    let selected_line = selected_line
        .map(str::to_string)
        .or_else(|| line_names.first().cloned());

    let line_daily = match &selected_line {
        Some(line) => {
            if !line_names.contains(line) {
                warn!(line = %line, "Selected line not present in data");
            }
            line_daily_totals(records, line)
        }
        None => Vec::new(),
    };
    debug!(days = daily.len(), line_days = line_daily.len(), "Trend computed");

    TrendAnalysis {
        daily,
        weekday,
        weekday_long,
        line_names,
        selected_line,
        line_daily,
    }
}
