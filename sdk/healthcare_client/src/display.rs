//! Text rendering of records for the view layer.

use chrono::{DateTime, Utc};

use crate::interface::{PatientRecord, Uint256};

/// Formats unix seconds as `YYYY-MM-DD HH:MM:SS UTC`. Values outside the
/// calendar range fall back to the raw number.
pub fn format_timestamp(seconds: u64) -> String {
    i64::try_from(seconds)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| seconds.to_string())
}

/// Like [`format_timestamp`], for a full-width contract value. Values past
/// `u64` are printed raw.
pub fn format_wire_timestamp(value: &Uint256) -> String {
    value
        .to_u64()
        .map(format_timestamp)
        .unwrap_or_else(|| value.to_string())
}

pub fn render_record(record: &PatientRecord) -> String {
    format!(
        "Record ID: {}\nName: {}\nDiagnosis: {}\nTreatment: {}\nTimestamp: {}",
        record.record_id,
        record.patient_name,
        record.diagnosis,
        record.treatment,
        format_wire_timestamp(&record.timestamp),
    )
}

pub fn render_records(records: &[PatientRecord]) -> String {
    records
        .iter()
        .map(render_record)
        .collect::<Vec<_>>()
        .join("\n---\n")
}
