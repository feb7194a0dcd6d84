//! CSV Import
//!
//! Reads one tag's readings from a CSV file into ordered points.
//! Rows that cannot be parsed are counted and reported, not fatal.

use super::{IoError, IoResult, TimeKind};
use crate::compression::Point;
use crate::config::InputConfig;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::Path;

/// Most row errors kept in an `ImportResult`
const MAX_REPORTED_ERRORS: usize = 100;

/// CSV point reader with configurable column mapping
#[derive(Debug, Clone)]
pub struct CsvPointReader {
    /// Column index for timestamps (0-indexed)
    time_column: usize,
    /// Column index for values (0-indexed)
    value_column: usize,
    /// Format string for parsing datetime timestamps
    time_format: String,
    /// Whether the CSV has a header row
    has_header: bool,
}

/// Result of a CSV import operation
#[derive(Debug)]
pub struct ImportResult {
    /// Parsed points, in file order
    pub points: Vec<Point>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
    /// Timestamp style of the first parsed row
    pub time_kind: TimeKind,
}

impl Default for CsvPointReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvPointReader {
    /// Create a reader for `time,value` files with a header row
    pub fn new() -> Self {
        Self {
            time_column: 0,
            value_column: 1,
            time_format: "%Y-%m-%d %H:%M:%S".to_string(),
            has_header: true,
        }
    }

    /// Create a reader from the `[input]` config section
    pub fn from_config(config: &InputConfig) -> Self {
        Self::new()
            .with_time_column(config.time_column)
            .with_value_column(config.value_column)
            .with_time_format(&config.time_format)
            .with_header(config.has_header)
    }

    pub fn with_time_column(mut self, column: usize) -> Self {
        self.time_column = column;
        self
    }

    pub fn with_value_column(mut self, column: usize) -> Self {
        self.value_column = column;
        self
    }

    pub fn with_time_format(mut self, format: &str) -> Self {
        self.time_format = format.to_string();
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Parse a timestamp cell into seconds
    ///
    /// Numbers are taken as-is. Datetimes are tried with the configured
    /// format, then common formats, then RFC 3339, and become Unix seconds.
    fn parse_time(&self, cell: &str) -> IoResult<(f64, TimeKind)> {
        if let Ok(number) = cell.parse::<f64>() {
            return Ok((number, TimeKind::Numeric));
        }

        let formats = [
            self.time_format.as_str(),
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S%.fZ",
            "%Y-%m-%d %H:%M",
            "%d/%m/%Y %H:%M:%S",
            "%Y-%m-%d",
        ];

        for fmt in formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(cell, fmt) {
                return Ok((millis_to_secs(dt.and_utc().timestamp_millis()), TimeKind::DateTime));
            }
            if let Ok(date) = NaiveDate::parse_from_str(cell, fmt) {
                if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                    return Ok((millis_to_secs(dt.and_utc().timestamp_millis()), TimeKind::DateTime));
                }
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
            return Ok((millis_to_secs(dt.timestamp_millis()), TimeKind::DateTime));
        }

        Err(IoError::Parse(format!("Could not parse timestamp: {}", cell)))
    }

    /// Import points from a CSV file
    pub fn read(&self, path: &Path) -> IoResult<ImportResult> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(self.has_header)
            .flexible(true)
            .from_path(path)?;
        self.read_records(reader)
    }

    /// Import points from a CSV string (useful for testing)
    pub fn read_str(&self, csv_data: &str) -> IoResult<ImportResult> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(self.has_header)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        self.read_records(reader)
    }

    fn read_records<R: Read>(&self, mut reader: csv::Reader<R>) -> IoResult<ImportResult> {
        let mut points = Vec::new();
        let mut rows_processed = 0;
        let mut rows_failed = 0;
        let mut errors = Vec::new();
        let mut time_kind = None;

        for (line_num, result) in reader.records().enumerate() {
            let actual_line = if self.has_header {
                line_num + 2
            } else {
                line_num + 1
            };

            let parsed = result
                .map_err(IoError::from)
                .and_then(|record| self.parse_record(&record));

            match parsed {
                Ok((point, kind)) => {
                    time_kind.get_or_insert(kind);
                    points.push(point);
                    rows_processed += 1;
                }
                Err(e) => {
                    errors.push(format!("Line {}: {}", actual_line, e));
                    rows_failed += 1;
                }
            }
        }

        if errors.len() > MAX_REPORTED_ERRORS {
            let total = errors.len();
            errors.truncate(MAX_REPORTED_ERRORS);
            errors.push(format!("... and {} more errors", total - MAX_REPORTED_ERRORS));
        }

        tracing::debug!(
            rows_processed,
            rows_failed,
            "CSV import complete"
        );

        Ok(ImportResult {
            points,
            rows_processed,
            rows_failed,
            errors,
            time_kind: time_kind.unwrap_or_default(),
        })
    }

    fn parse_record(&self, record: &csv::StringRecord) -> IoResult<(Point, TimeKind)> {
        let time_cell = record
            .get(self.time_column)
            .map(str::trim)
            .ok_or_else(|| IoError::Parse("missing time column".to_string()))?;
        let value_cell = record
            .get(self.value_column)
            .map(str::trim)
            .ok_or_else(|| IoError::Parse("missing value column".to_string()))?;

        let (time, kind) = self.parse_time(time_cell)?;
        let value = value_cell
            .parse::<f64>()
            .map_err(|_| IoError::Parse(format!("Could not parse value: {}", value_cell)))?;

        let point = Point::new(time, value);
        if !point.is_finite() {
            return Err(IoError::Parse(format!(
                "Non-finite reading: time={}, value={}",
                time_cell, value_cell
            )));
        }

        Ok((point, kind))
    }
}

fn millis_to_secs(millis: i64) -> f64 {
    millis as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_numeric_csv_import() {
        let csv_data = "time,value
0,5.0
1,5.2
2,5.05";

        let result = CsvPointReader::new().read_str(csv_data).unwrap();

        assert_eq!(result.rows_processed, 3);
        assert_eq!(result.rows_failed, 0);
        assert_eq!(result.time_kind, TimeKind::Numeric);
        assert_eq!(
            result.points,
            vec![
                Point::new(0.0, 5.0),
                Point::new(1.0, 5.2),
                Point::new(2.0, 5.05)
            ]
        );
    }

    #[test]
    fn test_datetime_csv_import() {
        let csv_data = "timestamp,tag,temperature
2024-01-15 00:00:00,TI-101,21.5
2024-01-15 00:01:00,TI-101,21.7
2024-01-15T00:02:00Z,TI-101,21.6";

        let reader = CsvPointReader::new().with_value_column(2);
        let result = reader.read_str(csv_data).unwrap();

        assert_eq!(result.rows_processed, 3);
        assert_eq!(result.time_kind, TimeKind::DateTime);
        assert_eq!(result.points[0].time, 1_705_276_800.0);
        assert_eq!(result.points[1].time - result.points[0].time, 60.0);
        assert_eq!(result.points[2].time - result.points[1].time, 60.0);
        assert_eq!(result.points[2].value, 21.6);
    }

    #[test]
    fn test_bad_rows_are_reported() {
        let csv_data = "time,value
0,1.0
1,not-a-number
yesterday,2.0
3
4,4.0";

        let result = CsvPointReader::new().read_str(csv_data).unwrap();

        assert_eq!(result.rows_processed, 2);
        assert_eq!(result.rows_failed, 3);
        assert_eq!(result.errors.len(), 3);
        assert!(result.errors[0].starts_with("Line 3:"));
        assert_eq!(result.points, vec![Point::new(0.0, 1.0), Point::new(4.0, 4.0)]);
    }

    #[test]
    fn test_non_finite_rows_are_reported() {
        let csv_data = "time,value
0,1.0
1,NaN
2,inf
inf,2.5
3,-inf
4,3.0";

        let result = CsvPointReader::new().read_str(csv_data).unwrap();

        assert_eq!(result.rows_processed, 2);
        assert_eq!(result.rows_failed, 4);
        assert!(result.errors[0].starts_with("Line 3:"));
        assert!(result.errors[0].contains("Non-finite"));
        assert_eq!(result.points, vec![Point::new(0.0, 1.0), Point::new(4.0, 3.0)]);

        // The remaining points compress without tripping the session
        let archived = crate::compress(
            crate::Algorithm::SwingingDoor,
            crate::CompressionConfig::new(0.5),
            result.points,
        )
        .unwrap();
        assert_eq!(archived.len(), 2);
    }

    #[test]
    fn test_headerless_custom_columns() {
        let csv_data = "7.5;;100\n8.0;;101";
        // Semicolons are not the delimiter, so this is one column per row
        let result = CsvPointReader::new()
            .with_header(false)
            .read_str(csv_data)
            .unwrap();
        assert_eq!(result.rows_failed, 2);
        assert!(result.errors[0].starts_with("Line 1:"));

        let csv_data = "7.5,x,100\n8.0,y,101";
        let result = CsvPointReader::new()
            .with_header(false)
            .with_time_column(2)
            .with_value_column(0)
            .read_str(csv_data)
            .unwrap();
        assert_eq!(result.points, vec![Point::new(100.0, 7.5), Point::new(101.0, 8.0)]);
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "time,value\n10,1.5\n20,2.5").unwrap();

        let result = CsvPointReader::new().read(file.path()).unwrap();
        assert_eq!(result.points.len(), 2);
        assert_eq!(result.points[1], Point::new(20.0, 2.5));
    }

    #[test]
    fn test_from_config() {
        let config = InputConfig {
            time_column: 1,
            value_column: 0,
            time_format: "%d.%m.%Y %H:%M".to_string(),
            has_header: false,
        };

        let result = CsvPointReader::from_config(&config)
            .read_str("3.5,15.01.2024 00:00")
            .unwrap();
        assert_eq!(result.points, vec![Point::new(1_705_276_800.0, 3.5)]);
    }
}
