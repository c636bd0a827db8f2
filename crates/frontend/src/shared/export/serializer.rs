use super::ExportError;
use contracts::dashboards::d404_campus_pulse::Dataset;
use serde_json::Value;

/// Serialize records to CSV text.
///
/// Header row is the keys of the first record in their stored order. Every
/// cell is the JSON text of its value, so strings come out quoted (`"x"`) and
/// numbers, booleans and null do not. Whole-number floats are written without
/// a fraction (`4.0` gives `4`), as a browser prints them. Fields missing from a
/// later record give an empty cell. Rows are joined with `\n` without a
/// trailing newline.
///
/// Cells are not CSV-escaped: a comma inside a string, or a nested
/// array/object, ends up verbatim in the line.
pub fn to_csv(data: &Dataset) -> Result<String, ExportError> {
    let first = data.first().ok_or(ExportError::EmptyDataset)?;
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut lines = Vec::with_capacity(data.len() + 1);
    lines.push(headers.join(","));

    for record in data {
        let row: Vec<String> = headers
            .iter()
            .map(|header| encode_cell(record.get(*header)))
            .collect();
        lines.push(row.join(","));
    }

    Ok(lines.join("\n"))
}

/// Largest integer a JS number holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn encode_cell(value: Option<&Value>) -> String {
    match value {
        Some(value) => js_value(value).to_string(),
        None => String::new(),
    }
}

fn js_value(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => Value::from(f as i64),
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(js_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), js_value(item)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// Pretty JSON, 2-space indent, field order and value types preserved
pub fn to_json(data: &Dataset) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset(value: Value) -> Dataset {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_csv_quotes_strings_only() {
        let data = dataset(json!([{"a": 1, "b": "x"}]));
        let csv = to_csv(&data).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["a,b", "1,\"x\""]);
    }

    #[test]
    fn test_csv_line_and_column_counts() {
        let data = dataset(json!([
            {"student_id": "STU10000", "major": "Civil", "satisfaction_score": 4, "active": true},
            {"student_id": "STU10001", "major": "Business", "satisfaction_score": 2, "active": false},
            {"student_id": "STU10002", "major": null, "satisfaction_score": 5, "active": true},
        ]));
        let csv = to_csv(&data).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines.len(), data.len() + 1);
        assert_eq!(lines[0].split(',').count(), data[0].len());
        assert_eq!(lines[3], "\"STU10002\",null,5,true");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_csv_header_follows_first_record() {
        let data = dataset(json!([
            {"b": 1, "a": 2},
            {"a": 3, "c": 4},
        ]));
        let csv = to_csv(&data).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        // "c" is not in the header; missing "b" gives an empty cell
        assert_eq!(lines, vec!["b,a", "1,2", ",3"]);
    }

    #[test]
    fn test_csv_empty_dataset_is_refused() {
        assert!(matches!(to_csv(&Vec::new()), Err(ExportError::EmptyDataset)));
    }

    // Current behaviour: embedded delimiters and quotes are not CSV-escaped.
    // Pinned here until the expected output is settled.
    #[test]
    fn test_csv_does_not_escape_embedded_delimiters() {
        let data = dataset(json!([{"name": "Smith, J", "note": "say \"hi\""}]));
        let csv = to_csv(&data).unwrap();
        let row = csv.lines().nth(1).unwrap();

        assert_eq!(row, r#""Smith, J","say \"hi\"""#);
        assert_eq!(row.split(',').count(), 3);
    }

    #[test]
    fn test_csv_nested_values_are_inlined() {
        let data = dataset(json!([{"tags": ["a", "b"], "id": 7}]));
        let csv = to_csv(&data).unwrap();
        assert_eq!(csv.lines().nth(1), Some(r#"["a","b"],7"#));
    }

    #[test]
    fn test_csv_whole_floats_lose_fraction() {
        let data = dataset(json!([
            {"average": 4.0, "median": 3.5, "scores": [1.0, 2.5], "zero": -0.0, "count": 7}
        ]));
        let csv = to_csv(&data).unwrap();
        assert_eq!(csv.lines().nth(1), Some("4,3.5,[1,2.5],0,7"));
    }

    // JSON export keeps the decoded number types
    #[test]
    fn test_json_keeps_whole_floats() {
        let data = dataset(json!([{"average": 4.0}]));
        let text = to_json(&data).unwrap();
        assert!(text.contains("\"average\": 4.0"));
    }

    #[test]
    fn test_json_uses_two_space_indent() {
        let data = dataset(json!([{"a": 1, "b": "x"}]));
        let text = to_json(&data).unwrap();
        assert_eq!(text, "[\n  {\n    \"a\": 1,\n    \"b\": \"x\"\n  }\n]");
    }

    #[test]
    fn test_json_round_trip_preserves_order_and_types() {
        let data = dataset(json!([
            {"zeta": "last-first", "score": 4.5, "flag": false, "missing": null},
            {"zeta": "second", "score": 3, "flag": true, "missing": null},
        ]));
        let text = to_json(&data).unwrap();
        let parsed: Dataset = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed, data);
        let keys: Vec<&str> = parsed[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "score", "flag", "missing"]);
        assert!(parsed[1]["score"].is_i64());
    }

    #[test]
    fn test_json_empty_dataset() {
        assert_eq!(to_json(&Vec::new()).unwrap(), "[]");
    }
}
