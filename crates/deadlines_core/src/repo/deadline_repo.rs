//! Deadline collection codec over a key-value store.
//!
//! # Responsibility
//! - Serialize the whole collection as one JSON array under `DEADLINES_KEY`.
//! - Salvage every readable record when decoding a saved collection.
//!
//! # Invariants
//! - Decoded collections never contain nil or duplicate ids.
//! - One unreadable record is dropped on its own; it never costs the rest of
//!   the collection.
//! - Blank names written by older builds are kept as-is.

use super::kv_store::KeyValueStore;
use super::RepoResult;
use crate::model::deadline::Deadline;
use log::warn;
use std::collections::HashSet;

/// Fixed namespace key holding the serialized collection.
pub const DEADLINES_KEY: &str = "SavedDeadlines";

/// Reads the persisted collection.
///
/// Returns `Ok(None)` when nothing has been saved yet.
///
/// # Errors
/// - `Serialization` when the blob is not a JSON array.
pub fn load_deadlines(kv: &impl KeyValueStore) -> RepoResult<Option<Vec<Deadline>>> {
    let Some(blob) = kv.get(DEADLINES_KEY)? else {
        return Ok(None);
    };
    decode_deadlines(&blob).map(Some)
}

/// Replaces the persisted collection with `deadlines`.
pub fn save_deadlines(kv: &impl KeyValueStore, deadlines: &[Deadline]) -> RepoResult<()> {
    let blob = encode_deadlines(deadlines)?;
    kv.put(DEADLINES_KEY, &blob)
}

pub fn encode_deadlines(deadlines: &[Deadline]) -> RepoResult<Vec<u8>> {
    Ok(serde_json::to_vec(deadlines)?)
}

/// Decodes a saved array, skipping records that are malformed, carry the
/// nil id, or repeat an earlier id.
pub fn decode_deadlines(blob: &[u8]) -> RepoResult<Vec<Deadline>> {
    let entries: Vec<serde_json::Value> = serde_json::from_slice(blob)?;
    let mut seen = HashSet::with_capacity(entries.len());
    let mut deadlines = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let deadline = match serde_json::from_value::<Deadline>(entry) {
            Ok(deadline) => deadline,
            Err(err) => {
                warn!("event=store_decode module=repo status=skipped index={index} reason=malformed error={err}");
                continue;
            }
        };
        if deadline.id.is_nil() {
            warn!("event=store_decode module=repo status=skipped index={index} reason=nil_id");
            continue;
        }
        if !seen.insert(deadline.id) {
            warn!(
                "event=store_decode module=repo status=skipped index={index} reason=duplicate_id id={}",
                deadline.id
            );
            continue;
        }
        deadlines.push(deadline);
    }

    Ok(deadlines)
}

#[cfg(test)]
mod tests {
    use super::{decode_deadlines, encode_deadlines};
    use crate::model::deadline::Deadline;
    use crate::repo::RepoError;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn encoded_records_use_date_only_wire_format() {
        let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        let blob = encode_deadlines(&[Deadline::with_id(id, "Ship", date).unwrap()]).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&blob).unwrap();
        assert_eq!(json[0]["id"], id.to_string());
        assert_eq!(json[0]["name"], "Ship");
        assert_eq!(json[0]["date"], "2025-11-03");
    }

    #[test]
    fn decode_keeps_first_of_duplicate_ids() {
        let blob = br#"[
            {"id":"11111111-2222-4333-8444-555555555555","name":"a","date":"2025-01-01"},
            {"id":"11111111-2222-4333-8444-555555555555","name":"b","date":"2025-01-02"}
        ]"#;
        let deadlines = decode_deadlines(blob).unwrap();
        assert_eq!(deadlines.len(), 1);
        assert_eq!(deadlines[0].name, "a");
    }

    #[test]
    fn decode_keeps_blank_names_and_skips_unreadable_records() {
        let blob = br#"[
            {"id":"11111111-2222-4333-8444-555555555555","name":"","date":"2025-01-01"},
            {"id":"00000000-0000-0000-0000-000000000000","name":"nil","date":"2025-01-01"},
            {"id":"22222222-2222-4333-8444-555555555555","name":"bad date","date":"soon"},
            {"id":"33333333-2222-4333-8444-555555555555","name":"ok","date":"2025-01-03"}
        ]"#;
        let names = decode_deadlines(blob)
            .unwrap()
            .into_iter()
            .map(|deadline| deadline.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["", "ok"]);
    }

    #[test]
    fn decode_rejects_blob_that_is_not_an_array() {
        assert!(matches!(
            decode_deadlines(b"{\"not\": \"an array\"}").unwrap_err(),
            RepoError::Serialization(_)
        ));
        assert!(decode_deadlines(b"not json").is_err());
    }
}
