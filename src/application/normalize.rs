use serde_json::Value;

/// Reset every named property found in the object graph to `null`,
/// recursively.
///
/// Used to neutralize fields the structural engine cannot be told to ignore:
/// resetting both sides to the same value before the diff guarantees the
/// engine itself reports no difference for the path, so suppressed-count
/// metrics stay at zero instead of "found but hidden".
///
/// The sentinel is `null` regardless of the member's current type. A
/// type-aware zero would break the guarantee for optional fields — a string
/// on one side and `null` on the other must still normalize identically.
///
/// Names not present anywhere are silently skipped — a shared property list
/// can be applied against heterogeneous object shapes.
pub fn normalize_property_values(value: &mut Value, properties: &[String]) {
    if properties.is_empty() {
        return;
    }
    match value {
        Value::Object(map) => {
            for (key, member) in map.iter_mut() {
                if properties.iter().any(|p| p == key) {
                    *member = Value::Null;
                } else {
                    normalize_property_values(member, properties);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                normalize_property_values(item, properties);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resets_every_type_to_the_null_sentinel() {
        let mut value = json!({
            "text": "hello",
            "count": 42,
            "flag": true,
            "items": [1, 2, 3],
            "nested": {"keep": 1},
        });
        normalize_property_values(
            &mut value,
            &props(&["text", "count", "flag", "items", "nested"]),
        );
        assert_eq!(
            value,
            json!({"text": null, "count": null, "flag": null, "items": null, "nested": null})
        );
    }

    #[test]
    fn optional_property_normalizes_identically_across_types() {
        let mut source = json!({"note": "set on this side", "id": 1});
        let mut target = json!({"note": null, "id": 1});
        let names = props(&["note"]);
        normalize_property_values(&mut source, &names);
        normalize_property_values(&mut target, &names);
        assert_eq!(source, target);
    }

    #[test]
    fn applies_at_any_depth_including_array_elements() {
        let mut value = json!({
            "orders": [
                {"id": 1, "timestamp": "2024-01-01T00:00:00Z"},
                {"id": 2, "timestamp": "2024-01-02T00:00:00Z"},
            ]
        });
        normalize_property_values(&mut value, &props(&["timestamp"]));
        assert_eq!(value["orders"][0]["timestamp"], json!(null));
        assert_eq!(value["orders"][1]["timestamp"], json!(null));
        assert_eq!(value["orders"][0]["id"], json!(1));
    }

    #[test]
    fn missing_properties_are_skipped() {
        let mut value = json!({"a": 1});
        let original = value.clone();
        normalize_property_values(&mut value, &props(&["not_here"]));
        assert_eq!(value, original);
    }

    #[test]
    fn normalized_sides_diff_to_nothing() {
        let mut source = json!({"id": 7, "updated_at": "2024-05-01"});
        let mut target = json!({"id": 7, "updated_at": "2024-06-01"});
        let names = props(&["updated_at"]);
        normalize_property_values(&mut source, &names);
        normalize_property_values(&mut target, &names);
        assert_eq!(source, target);
    }

    #[test]
    fn empty_property_list_is_identity() {
        let mut value = json!({"a": {"b": 1}});
        let original = value.clone();
        normalize_property_values(&mut value, &[]);
        assert_eq!(value, original);
    }
}
