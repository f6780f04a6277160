//! # History Codec
//!
//! Converts between history records and CSV text.
//!
//! ## Format
//!
//! ```text
//! operation,operand1,operand2,result,timestamp
//! add,2,3,5,2024-03-01T12:00:00.000000000Z
//! divide,1,3,0.3333333333,2024-03-01T12:00:05.250000000Z
//! ```
//!
//! - `operation` is the command name (`add`, `root`, ...); display names
//!   such as `Addition` are accepted when reading.
//! - Numbers are written in plain decimal form with trailing zeros removed.
//! - Timestamps are RFC 3339 in UTC with fixed nanosecond width, so rows
//!   sort lexically by time. Naive ISO-8601 timestamps (no offset) are
//!   accepted when reading and taken as UTC.
//!
//! `deserialize(serialize(records)) == records` for any sequence of records.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

use crate::config::parse_decimal;
use crate::errors::{CalcError, CalcResult};
use crate::operations::OperationKind;
use crate::record::HistoryRecord;

/// Column names, in order. The header row must match exactly.
pub const HEADER: [&str; 5] = ["operation", "operand1", "operand2", "result", "timestamp"];

/// Placeholder path used for errors raised on in-memory text.
const IN_MEMORY: &str = "<history>";

/// Render records as CSV text, header first, one row per record.
pub fn serialize(records: &[HistoryRecord]) -> CalcResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(HEADER)
        .map_err(|e| encode_error(e.to_string()))?;

    for record in records {
        writer
            .write_record([
                record.operation().as_str().to_string(),
                record.operand1().normalize().to_string(),
                record.operand2().normalize().to_string(),
                record.result().normalize().to_string(),
                format_timestamp(record.timestamp()),
            ])
            .map_err(|e| encode_error(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| encode_error(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| encode_error(e.to_string()))
}

/// Parse CSV text produced by [`serialize`].
///
/// # Errors
///
/// `CalcError::Persistence` if the header differs from [`HEADER`], a row has
/// the wrong number of fields, or any field is malformed. The reason names
/// the offending line.
pub fn deserialize(text: &str) -> CalcResult<Vec<HistoryRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(|e| decode_error(e.to_string()))?;
    if headers.iter().ne(HEADER.iter().copied()) {
        return Err(decode_error(format!(
            "expected header '{}', found '{}'",
            HEADER.join(","),
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| decode_error(e.to_string()))?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let field = |index: usize| row.get(index).unwrap_or_default();

        let operation = OperationKind::from_str(field(0))
            .map_err(|_| decode_error(format!("line {}: unknown operation '{}'", line, field(0))))?;
        let operand1 = parse_number(field(1), "operand1", line)?;
        let operand2 = parse_number(field(2), "operand2", line)?;
        let result = parse_number(field(3), "result", line)?;
        let timestamp = parse_timestamp(field(4)).ok_or_else(|| {
            decode_error(format!("line {}: malformed timestamp '{}'", line, field(4)))
        })?;

        records.push(HistoryRecord::with_timestamp(
            operation, operand1, operand2, result, timestamp,
        ));
    }
    Ok(records)
}

/// Sortable textual form used for the `timestamp` column.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn parse_number(text: &str, column: &str, line: u64) -> CalcResult<Decimal> {
    parse_decimal(text.trim()).ok_or_else(|| {
        decode_error(format!("line {}: {} '{}' is not a number", line, column, text))
    })
}

fn encode_error(reason: String) -> CalcError {
    CalcError::persistence("serialize", IN_MEMORY, reason)
}

fn decode_error(reason: String) -> CalcError {
    CalcError::persistence("deserialize", IN_MEMORY, reason)
}
