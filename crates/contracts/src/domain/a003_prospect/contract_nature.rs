//! Storage codec for the multi-select "natureza do contrato" field.
//!
//! The ids are kept as a JSON array in a single text column. A column that
//! fails to decode reads as an empty selection, never as an error.

use crate::domain::a001_category::aggregate::CategoryId;

/// Encode an ordered id set; duplicates keep their first position.
/// An empty selection is stored as `NULL`.
pub fn encode(ids: &[CategoryId]) -> Option<String> {
    let unique = dedup_ordered(ids);
    if unique.is_empty() {
        return None;
    }
    let raw: Vec<i32> = unique.iter().map(|id| id.0).collect();
    serde_json::to_string(&raw).ok()
}

pub fn decode(raw: Option<&str>) -> Vec<CategoryId> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<i32>>(raw) {
        Ok(ids) => ids.into_iter().map(CategoryId).collect(),
        Err(e) => {
            tracing::warn!("Malformed natureza_contrato_ids {:?}: {}", raw, e);
            Vec::new()
        }
    }
}

pub fn dedup_ordered(ids: &[CategoryId]) -> Vec<CategoryId> {
    let mut out: Vec<CategoryId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i32]) -> Vec<CategoryId> {
        raw.iter().copied().map(CategoryId).collect()
    }

    #[test]
    fn test_round_trip_keeps_order() {
        let original = ids(&[7, 2, 9]);
        let encoded = encode(&original);
        assert_eq!(encoded.as_deref(), Some("[7,2,9]"));
        assert_eq!(decode(encoded.as_deref()), original);
    }

    #[test]
    fn test_duplicates_are_dropped() {
        assert_eq!(encode(&ids(&[3, 1, 3, 1])).as_deref(), Some("[3,1]"));
    }

    #[test]
    fn test_empty_selection_is_null() {
        assert_eq!(encode(&[]), None);
        assert!(decode(None).is_empty());
        assert!(decode(Some("")).is_empty());
    }

    #[test]
    fn test_corrupted_payload_decodes_to_empty() {
        assert!(decode(Some("[1, 2")).is_empty());
        assert!(decode(Some("not json")).is_empty());
        assert!(decode(Some("{\"a\": 1}")).is_empty());
        assert!(decode(Some("[\"x\"]")).is_empty());
    }
}
