//! CSV loader for ridership tables.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::record::{Dataset, RidershipRecord};

/// Loads a ridership CSV from disk. Paths ending in `.gz` are decompressed on the fly.
///
/// # Errors
///
/// Fails on a missing file, a missing column, a non-numeric count, or a date
/// that is not `YYYYMMDD`. The first bad row aborts the load.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");
    debug!(gzipped, "Reading ridership file");

    let records = if gzipped {
        parse_records(GzDecoder::new(BufReader::new(file)))
    } else {
        parse_records(BufReader::new(file))
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;

    info!(records = records.len(), "Ridership data loaded");
    Ok(Dataset::new(records))
}

/// Decodes every row of a headered CSV stream into [`RidershipRecord`]s.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<RidershipRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: RidershipRecord = result?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::env;
    use std::fs;
    use std::io::Write;

    const KOREAN_CSV: &str = "사용일자,노선명,역명,승차총승객수,하차총승객수,등록일자\n\
        20250901,2호선,강남,100,80,20250904\n\
        20250902,2호선,강남,150,90,20250905\n";

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_parse_korean_headers_ignores_extra_columns() {
        let records = parse_records(KOREAN_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, "2호선");
        assert_eq!(records[0].station, "강남");
        assert_eq!(records[1].boarding, 150);
        assert_eq!(
            records[1].date,
            NaiveDate::from_ymd_opt(2025, 9, 2).unwrap()
        );
    }

    #[test]
    fn test_parse_english_aliases() {
        let csv = "date,line,station,boarding,alighting\n20250901,Line 1,Seoul, 10 ,5\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].boarding, 10);
        assert_eq!(records[0].alighting, 5);
    }

    #[test]
    fn test_parse_bad_date_fails() {
        let csv = "date,line,station,boarding,alighting\n2025-09-01,Line 1,Seoul,10,5\n";
        assert!(parse_records(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_negative_count_fails() {
        let csv = "date,line,station,boarding,alighting\n20250901,Line 1,Seoul,-10,5\n";
        assert!(parse_records(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_missing_column_fails() {
        let csv = "date,line,boarding,alighting\n20250901,Line 1,10,5\n";
        assert!(parse_records(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = load_dataset(Path::new(&temp_path("ridership_explorer_does_not_exist.csv")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_plain_file() {
        let path = temp_path("ridership_explorer_test_plain.csv");
        fs::write(&path, KOREAN_CSV).unwrap();

        let dataset = load_dataset(Path::new(&path)).unwrap();
        assert_eq!(dataset.len(), 2);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_gzipped_file() {
        let path = temp_path("ridership_explorer_test_gz.csv.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(KOREAN_CSV.as_bytes()).unwrap();
        fs::write(&path, encoder.finish().unwrap()).unwrap();

        let dataset = load_dataset(Path::new(&path)).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.total_boarding(), 250);

        fs::remove_file(&path).unwrap();
    }
}
