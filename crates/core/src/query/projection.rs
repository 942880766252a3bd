//! Field projection (`select=name,description`).

use serde_json::{Map, Value};

use super::schema::ID_FIELD;

/// Restrict `record` to the selected fields plus the identifier.
///
/// Dotted names select nested fields (`location.city`). Names that do not
/// exist on the record are ignored. `None` leaves the record untouched.
pub fn project(record: Value, select: Option<&[String]>) -> Value {
    let Some(select) = select else {
        return record;
    };
    let source = match record {
        Value::Object(map) => map,
        other => return other,
    };

    let mut out = Map::new();
    if let Some(id) = source.get(ID_FIELD) {
        out.insert(ID_FIELD.to_string(), id.clone());
    }
    for path in select {
        copy_path(&source, &mut out, path);
    }
    Value::Object(out)
}

fn copy_path(source: &Map<String, Value>, out: &mut Map<String, Value>, path: &str) {
    match path.split_once('.') {
        None => {
            if let Some(value) = source.get(path) {
                out.insert(path.to_string(), value.clone());
            }
        }
        Some((head, rest)) => {
            let Some(Value::Object(nested_source)) = source.get(head) else {
                return;
            };
            let entry = out
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(nested_out) = entry {
                copy_path(nested_source, nested_out, rest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn select(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn keeps_selected_fields_and_id() {
        let record = json!({"id": 4, "name": "Devworks", "description": "d", "averageCost": 10.0});
        let fields = select(&["name", "description"]);
        assert_eq!(
            project(record, Some(&fields)),
            json!({"id": 4, "name": "Devworks", "description": "d"})
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let record = json!({"id": 1, "name": "x"});
        let fields = select(&["colour"]);
        assert_eq!(project(record, Some(&fields)), json!({"id": 1}));
    }

    #[test]
    fn nested_paths() {
        let record = json!({"id": 1, "location": {"city": "Boston", "state": "MA"}});
        let fields = select(&["location.city"]);
        assert_eq!(
            project(record, Some(&fields)),
            json!({"id": 1, "location": {"city": "Boston"}})
        );
    }

    #[test]
    fn no_selection_returns_record_unchanged() {
        let record = json!({"id": 1, "name": "x"});
        assert_eq!(project(record.clone(), None), record);
    }
}
