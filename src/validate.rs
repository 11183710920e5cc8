//! Validation of raw warehouse rows against the known record shapes.
//!
//! Each row is coerced through an ordered chain of typed constructions,
//! canonical XDM shapes first, looser fallback shapes after. The first
//! success wins; rows that fit nothing are dropped with a diagnostic.

use serde_json::Value;
use tracing::warn;

use crate::adapters::{row_to_event, row_to_profile};
use crate::records::{CustomerEvent, CustomerProfile, RawRecord};

/// Attempts the canonical XDM shape for a row. Rows carrying an
/// `event_type` key are treated as facts, everything else as dimensions.
fn try_canonical(row: &RawRecord) -> Result<Value, String> {
    if row.contains_key("event_type") {
        let event = row_to_event(row);
        event.validate().map_err(|e| e.to_string())?;
        serde_json::to_value(&event).map_err(|e| e.to_string())
    } else {
        serde_json::to_value(row_to_profile(row)).map_err(|e| e.to_string())
    }
}

fn try_fallback_event(row: &RawRecord) -> Result<Value, String> {
    let event: CustomerEvent =
        serde_json::from_value(Value::Object(row.clone())).map_err(|e| e.to_string())?;
    serde_json::to_value(&event).map_err(|e| e.to_string())
}

fn try_fallback_profile(row: &RawRecord) -> Result<Value, String> {
    let profile: CustomerProfile =
        serde_json::from_value(Value::Object(row.clone())).map_err(|e| e.to_string())?;
    serde_json::to_value(&profile).map_err(|e| e.to_string())
}

/// Runs one row through the construction chain, returning the serialized
/// record from the first shape that accepts it. The error carries the
/// failure cause of the last attempt.
fn coerce_record(row: &RawRecord) -> Result<Value, String> {
    try_canonical(row)
        .or_else(|_| try_fallback_event(row))
        .or_else(|_| try_fallback_profile(row))
}

/// Validates incoming records, preferring XDM shapes with graceful
/// fallbacks. Rows that fit no shape are skipped with a warning; input
/// order is preserved for the survivors. Pure apart from the diagnostics.
pub fn validate_records(rows: &[RawRecord]) -> Vec<Value> {
    let mut validated = Vec::with_capacity(rows.len());
    for row in rows {
        match coerce_record(row) {
            Ok(record) => validated.push(record),
            Err(cause) => {
                let row_json = Value::Object(row.clone());
                warn!(row = %row_json, %cause, "skipping invalid record");
            }
        }
    }
    validated
}
