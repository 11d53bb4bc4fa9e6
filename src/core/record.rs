//! Record trait: the only thing the engine needs to know about a row

use crate::core::field::FieldValue;
use serde_json::Value;

/// A row the table engine can search, sort, page and select.
///
/// Records are opaque to the engine beyond two capabilities:
/// - a stable key, used for selection so that membership survives the host
///   handing in a freshly copied collection
/// - reading a value at a dotted path such as `"address.city"`
///
/// ```rust,ignore
/// impl Record for Patient {
///     fn key(&self) -> String {
///         self.id.clone()
///     }
///
///     fn field(&self, path: &str) -> Option<FieldValue> {
///         match path {
///             "firstName" => Some(self.first_name.as_str().into()),
///             "address.city" => Some(self.address.city.as_str().into()),
///             "lastVisit" => Some(self.last_visit.into()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record: Clone + Send + Sync + 'static {
    /// Stable identity of this record
    fn key(&self) -> String;

    /// Resolve the value at a dotted path, `None` if any segment is missing
    fn field(&self, path: &str) -> Option<FieldValue>;
}

/// Walk a dotted path through nested JSON objects
///
/// Numeric segments index into arrays. Returns `None` as soon as a segment
/// cannot be followed.
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// JSON records are keyed by their `id` member.
///
/// Records without an `id` fall back to their compact JSON text, so two
/// id-less records with identical content share one key. They select and
/// deselect together, and only the first is reachable through key lookup.
/// Give such records an `id`, or implement [`Record`] on a typed struct.
impl Record for Value {
    /// The `id` member, or the compact JSON text when there is none
    fn key(&self) -> String {
        match self.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(id) if !id.is_null() => id.to_string(),
            _ => self.to_string(),
        }
    }

    fn field(&self, path: &str) -> Option<FieldValue> {
        resolve_path(self, path).map(FieldValue::from_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_nested_path() {
        let patient = json!({
            "id": "P001",
            "address": { "city": "Springfield", "zip": "12345" }
        });
        assert_eq!(
            resolve_path(&patient, "address.city"),
            Some(&json!("Springfield"))
        );
    }

    #[test]
    fn test_resolve_missing_segment() {
        let patient = json!({ "id": "P001", "address": { "city": "Springfield" } });
        assert_eq!(resolve_path(&patient, "address.country"), None);
        assert_eq!(resolve_path(&patient, "insurance.provider"), None);
        assert_eq!(resolve_path(&patient, "id.length"), None);
        assert_eq!(resolve_path(&patient, ""), None);
    }

    #[test]
    fn test_resolve_array_index() {
        let doctor = json!({ "education": [{ "degree": "MD" }, { "degree": "PhD" }] });
        assert_eq!(
            resolve_path(&doctor, "education.1.degree"),
            Some(&json!("PhD"))
        );
        assert_eq!(resolve_path(&doctor, "education.9.degree"), None);
    }

    #[test]
    fn test_json_record_key() {
        assert_eq!(json!({ "id": "A1" }).key(), "A1");
        assert_eq!(json!({ "id": 42 }).key(), "42");
        assert_eq!(json!({ "name": "x" }).key(), r#"{"name":"x"}"#);
    }

    #[test]
    fn test_identical_records_without_id_share_key() {
        let a = json!({ "name": "Twin" });
        let b = json!({ "name": "Twin" });
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), json!({ "name": "Other" }).key());
    }

    #[test]
    fn test_json_record_field() {
        let row = json!({ "name": "Beta", "id": 2 });
        assert_eq!(row.field("name"), Some(FieldValue::from("Beta")));
        assert_eq!(row.field("id"), Some(FieldValue::Integer(2)));
        assert_eq!(row.field("missing"), None);
    }
}
