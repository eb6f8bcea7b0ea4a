use serde::{Deserialize, Deserializer};

/// Keeps "field present with null" apart from "field absent" in patch DTOs.
///
/// Use on an `Option<Option<T>>` together with `#[serde(default)]`: an absent
/// key stays `None`, `null` becomes `Some(None)`, a value `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        value: Option<Option<i32>>,
    }

    #[test]
    fn test_double_option() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.value, None);
        let null: Patch = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(null.value, Some(None));
        let set: Patch = serde_json::from_str(r#"{"value": 3}"#).unwrap();
        assert_eq!(set.value, Some(Some(3)));
    }
}
