//! CSV and JSON export of archived points

use super::{IoResult, TimeKind};
use crate::compression::Point;
use chrono::{DateTime, SecondsFormat};
use std::io::Write;

/// Render a timestamp the way the source wrote it
fn format_time(time: f64, kind: TimeKind) -> String {
    match kind {
        TimeKind::Numeric => time.to_string(),
        TimeKind::DateTime => DateTime::from_timestamp_millis((time * 1000.0).round() as i64)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            .unwrap_or_else(|| time.to_string()),
    }
}

/// Write points as `time,value` CSV with a header row
pub fn write_csv<'a, W, I>(points: I, kind: TimeKind, writer: W) -> IoResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Point>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["time", "value"])?;

    for point in points {
        csv_writer.write_record([format_time(point.time, kind), point.value.to_string()])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write points as a pretty-printed JSON array of `{time, value}` objects
pub fn write_json<W: Write>(points: &[Point], mut writer: W) -> IoResult<()> {
    serde_json::to_writer_pretty(&mut writer, points)?;
    writeln!(writer)?;
    Ok(())
}
