//! Query string and urlencoded form decoding.

use crate::error::ExtractError;
use serde_json::{Map, Value};

/// Decodes an `application/x-www-form-urlencoded` string into an object.
///
/// Every value stays a string; coercion is left to validation. A key that
/// repeats collects its values into an array, in order.
///
/// ```rust
/// use tenet_extract::decode_query;
/// use serde_json::json;
///
/// let query = decode_query("tag=a&tag=b&q=rust%20lang").unwrap();
/// assert_eq!(query["tag"], json!(["a", "b"]));
/// assert_eq!(query["q"], json!("rust lang"));
/// ```
pub fn decode_query(query: &str) -> Result<Map<String, Value>, ExtractError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
        .map_err(|e| ExtractError::InvalidQuery(e.to_string()))?;
    Ok(collect_pairs(pairs))
}

pub(crate) fn collect_pairs<I>(pairs: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut map = Map::new();
    for (key, value) in pairs {
        push_value(&mut map, key, Value::String(value));
    }
    map
}

pub(crate) fn push_value(map: &mut Map<String, Value>, key: String, value: Value) {
    match map.get_mut(&key) {
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_query() {
        assert!(decode_query("").unwrap().is_empty());
    }

    #[test]
    fn test_values_stay_strings() {
        let query = decode_query("limit=10&active=true").unwrap();
        assert_eq!(query["limit"], json!("10"));
        assert_eq!(query["active"], json!("true"));
    }

    #[test]
    fn test_three_repeats() {
        let query = decode_query("id=1&id=2&id=3").unwrap();
        assert_eq!(query["id"], json!(["1", "2", "3"]));
    }
}
