use crate::analyzers::types::{LongRow, MeanPair};
use crate::analyzers::utility::mean;
use crate::record::RidershipRecord;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Metric names used when a mean table is reshaped to long form.
pub const MEAN_BOARDING: &str = "mean_boarding";
pub const MEAN_ALIGHTING: &str = "mean_alighting";

/// Running sums for one group of records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GroupTotals {
    pub count: usize,
    pub boarding: u64,
    pub alighting: u64,
}

impl GroupTotals {
    pub fn add(&mut self, record: &RidershipRecord) {
        self.count += 1;
        self.boarding += record.boarding;
        self.alighting += record.alighting;
    }

    pub fn mean_boarding(&self) -> f64 {
        mean(self.boarding, self.count)
    }

    pub fn mean_alighting(&self) -> f64 {
        mean(self.alighting, self.count)
    }
}

/// Groups records by `key`, accumulating [`GroupTotals`] per group.
///
/// Groups come back in ascending key order.
pub fn group_by<'a, K, I, F>(records: I, key: F) -> BTreeMap<K, GroupTotals>
where
    K: Ord,
    I: IntoIterator<Item = &'a RidershipRecord>,
    F: Fn(&'a RidershipRecord) -> K,
{
    let mut groups: BTreeMap<K, GroupTotals> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().add(record);
    }
    groups
}

/// Keeps the `n` rows with the highest mean boarding, highest first.
///
/// The sort is stable, so ties keep their incoming order.
pub fn top_by_mean_boarding<T: MeanPair + Clone>(rows: &[T], n: usize) -> Vec<T> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        b.mean_boarding()
            .partial_cmp(&a.mean_boarding())
            .unwrap_or(Ordering::Equal)
    });
    sorted.truncate(n);
    sorted
}

/// Reshapes wide mean rows into long form: every row's mean boarding first,
/// then every row's mean alighting.
pub fn melt<T: MeanPair>(rows: &[T]) -> Vec<LongRow> {
    let boarding = rows.iter().map(|r| LongRow {
        label: r.label().to_string(),
        metric: MEAN_BOARDING.to_string(),
        value: r.mean_boarding(),
    });
    let alighting = rows.iter().map(|r| LongRow {
        label: r.label().to_string(),
        metric: MEAN_ALIGHTING.to_string(),
        value: r.mean_alighting(),
    });
    boarding.chain(alighting).collect()
}
