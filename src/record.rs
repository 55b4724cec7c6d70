//! Ridership records and the in-memory dataset they are held in.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use tabled::Tabled;

/// One row of the source table: passenger counts for a station on a line on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct RidershipRecord {
    #[serde(
        rename = "사용일자",
        alias = "date",
        deserialize_with = "deserialize_yyyymmdd",
        serialize_with = "serialize_yyyymmdd"
    )]
    #[tabled(rename = "date")]
    pub date: NaiveDate,
    #[serde(rename = "노선명", alias = "line")]
    #[tabled(rename = "line")]
    pub line: String,
    #[serde(rename = "역명", alias = "station")]
    #[tabled(rename = "station")]
    pub station: String,
    #[serde(rename = "승차총승객수", alias = "boarding")]
    #[tabled(rename = "boarding")]
    pub boarding: u64,
    #[serde(rename = "하차총승객수", alias = "alighting")]
    #[tabled(rename = "alighting")]
    pub alighting: u64,
}

impl RidershipRecord {
    pub fn new(date: NaiveDate, line: &str, station: &str, boarding: u64, alighting: u64) -> Self {
        Self {
            date,
            line: line.to_string(),
            station: station.to_string(),
            boarding,
            alighting,
        }
    }

    /// English weekday name of the record's date, e.g. `"Monday"`.
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.date.weekday())
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parses a `YYYYMMDD` date such as `20250901`.
pub fn parse_yyyymmdd(raw: &str) -> anyhow::Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map_err(|e| anyhow::anyhow!("invalid YYYYMMDD date '{raw}': {e}"))
}

fn deserialize_yyyymmdd<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_yyyymmdd(&raw).map_err(serde::de::Error::custom)
}

fn serialize_yyyymmdd<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format("%Y%m%d").to_string())
}

/// All records of a loaded file, in file order.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    records: Vec<RidershipRecord>,
}

impl Dataset {
    pub fn new(records: Vec<RidershipRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[RidershipRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `n` records in file order.
    pub fn head(&self, n: usize) -> &[RidershipRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Distinct line names, ascending.
    pub fn line_names(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.line.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn total_boarding(&self) -> u64 {
        self.records.iter().map(|r| r.boarding).sum()
    }

    pub fn total_alighting(&self) -> u64 {
        self.records.iter().map(|r| r.alighting).sum()
    }
}

impl From<Vec<RidershipRecord>> for Dataset {
    fn from(records: Vec<RidershipRecord>) -> Self {
        Self::new(records)
    }
}
