//! JSON encoding of the ferment collection.
//!
//! The same array format is used for the persisted collection and for
//! export files. Decoding is all-or-nothing: a payload with any bad
//! entry is rejected as a whole.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use crate::models::FermentEntry;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Expected a JSON array of ferments, found {0}")]
    NotAnArray(&'static str),

    #[error("Invalid ferment at index {index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate ferment id '{0}'")]
    DuplicateId(String),

    #[error("Failed to encode ferments: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Parses a collection, validating its shape and id uniqueness.
pub fn decode_entries(json: &str) -> Result<Vec<FermentEntry>, CodecError> {
    let value: Value = serde_json::from_str(json).map_err(CodecError::InvalidJson)?;
    let items = match value {
        Value::Array(items) => items,
        other => return Err(CodecError::NotAnArray(kind(&other))),
    };

    let mut ids = HashSet::with_capacity(items.len());
    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let entry: FermentEntry = serde_json::from_value(item)
            .map_err(|source| CodecError::InvalidEntry { index, source })?;
        if !ids.insert(entry.id.clone()) {
            return Err(CodecError::DuplicateId(entry.id));
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// Compact form used for persistence.
pub fn encode_entries(entries: &[FermentEntry]) -> Result<String, CodecError> {
    serde_json::to_string(entries).map_err(CodecError::Encode)
}

/// Pretty form (2-space indent) used for export files.
pub fn export_entries(entries: &[FermentEntry]) -> Result<String, CodecError> {
    serde_json::to_string_pretty(entries).map_err(CodecError::Encode)
}

/// `LFT_EXPORT_2024-01-01T12:00:00.000Z.json`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!(
        "LFT_EXPORT_{}.json",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
