use serde_json::Value;

/// Some providers serialize JSON-array tool-call fields as a JSON-encoded
/// string rather than an array. Before dispatch, any top-level string
/// argument that looks like a JSON array of strings is decoded in place
/// (spec.md §4.4 "Reliability: response-shape repair"). Every other
/// argument passes through unchanged.
pub fn repair_tool_arguments(args: &mut Value, tool_name: &str) {
    let Value::Object(map) = args else { return };
    for (key, value) in map.iter_mut() {
        let Value::String(raw) = value else { continue };
        if !raw.trim_start().starts_with('[') {
            continue;
        }
        let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) else {
            continue;
        };
        if !items.iter().all(|item| item.is_string()) {
            continue;
        }
        tracing::info!(tool = tool_name, field = key, "repaired JSON-array-as-string tool argument");
        *value = Value::Array(items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_string_encoded_array_field() {
        let mut args = json!({ "ids": "[\"a.Foo\", \"a.Bar\"]", "other": "plain" });
        repair_tool_arguments(&mut args, "read_code_components");
        assert_eq!(args["ids"], json!(["a.Foo", "a.Bar"]));
        assert_eq!(args["other"], json!("plain"));
    }

    #[test]
    fn leaves_non_array_strings_untouched() {
        let mut args = json!({ "file_path": "[weird-but-not-json.md]" });
        repair_tool_arguments(&mut args, "str_replace_editor");
        assert_eq!(args["file_path"], json!("[weird-but-not-json.md]"));
    }

    #[test]
    fn leaves_already_typed_arrays_untouched() {
        let mut args = json!({ "ids": ["a.Foo"] });
        repair_tool_arguments(&mut args, "read_code_components");
        assert_eq!(args["ids"], json!(["a.Foo"]));
    }
}
