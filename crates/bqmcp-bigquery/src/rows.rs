//! Decoding of the `{f: [{v: ...}]}` row format into JSON objects.
//!
//! BigQuery sends every scalar as a string. Integers, floats and booleans
//! become JSON numbers and bools, timestamps a readable UTC string, and
//! everything else (NUMERIC, DATE, BYTES, ...) stays a string.

use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};

use crate::api::{TableFieldSchema, TableRow};

/// Decodes one row against the result schema.
pub(crate) fn decode_row(fields: &[TableFieldSchema], row: &TableRow) -> Map<String, Value> {
    fields
        .iter()
        .zip(row.f.iter())
        .map(|(field, cell)| (field.name.clone(), decode_cell(field, &cell.v)))
        .collect()
}

fn decode_cell(field: &TableFieldSchema, v: &Value) -> Value {
    if !field.is_repeated() {
        return decode_value(field, v);
    }
    match v {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| decode_value(field, item.get("v").unwrap_or(&Value::Null)))
                .collect(),
        ),
        Value::Null => Value::Array(Vec::new()),
        other => decode_value(field, other),
    }
}

fn decode_value(field: &TableFieldSchema, v: &Value) -> Value {
    match v {
        Value::Null => Value::Null,
        Value::Object(obj) if field.is_record() => {
            let cells = obj.get("f").and_then(Value::as_array);
            let mut record = Map::new();
            for (i, sub) in field.fields.iter().enumerate() {
                let cell = cells
                    .and_then(|c| c.get(i))
                    .and_then(|c| c.get("v"))
                    .unwrap_or(&Value::Null);
                record.insert(sub.name.clone(), decode_cell(sub, cell));
            }
            Value::Object(record)
        }
        Value::String(s) => decode_scalar(&field.field_type, s),
        other => other.clone(),
    }
}

fn decode_scalar(field_type: &str, s: &str) -> Value {
    let text = || Value::String(s.to_string());
    match field_type.to_ascii_uppercase().as_str() {
        "INTEGER" | "INT64" => s.parse::<i64>().map(Value::from).unwrap_or_else(|_| text()),
        "FLOAT" | "FLOAT64" => s
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(text),
        "BOOLEAN" | "BOOL" => match s {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => text(),
        },
        "TIMESTAMP" => parse_epoch_seconds(s)
            .map(|ts| Value::String(ts.to_string()))
            .unwrap_or_else(text),
        _ => text(),
    }
}

/// Timestamps arrive as (possibly scientific) floating-point seconds.
fn parse_epoch_seconds(s: &str) -> Option<DateTime<Utc>> {
    let secs = s.parse::<f64>().ok()?;
    if !secs.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_micros((secs * 1_000_000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(v: Value) -> Vec<TableFieldSchema> {
        serde_json::from_value(v).expect("schema")
    }

    fn row(v: Value) -> TableRow {
        serde_json::from_value(v).expect("row")
    }

    #[test]
    fn scalars_are_typed() {
        let fields = schema(json!([
            {"name": "id", "type": "INTEGER"},
            {"name": "score", "type": "FLOAT"},
            {"name": "active", "type": "BOOLEAN"},
            {"name": "name", "type": "STRING"},
            {"name": "amount", "type": "NUMERIC"}
        ]));
        let r = row(json!({"f": [
            {"v": "42"}, {"v": "1.5"}, {"v": "true"}, {"v": "Mario"}, {"v": "10.25"}
        ]}));
        let decoded = decode_row(&fields, &r);
        assert_eq!(decoded["id"], json!(42));
        assert_eq!(decoded["score"], json!(1.5));
        assert_eq!(decoded["active"], json!(true));
        assert_eq!(decoded["name"], json!("Mario"));
        assert_eq!(decoded["amount"], json!("10.25"));
    }

    #[test]
    fn nulls_stay_null() {
        let fields = schema(json!([{"name": "id", "type": "INT64"}]));
        let decoded = decode_row(&fields, &row(json!({"f": [{"v": null}]})));
        assert_eq!(decoded["id"], Value::Null);
    }

    #[test]
    fn timestamp_in_scientific_notation() {
        let fields = schema(json!([{"name": "ts", "type": "TIMESTAMP"}]));
        let decoded = decode_row(&fields, &row(json!({"f": [{"v": "1.7E9"}]})));
        assert_eq!(decoded["ts"], json!("2023-11-14 22:13:20 UTC"));
    }

    #[test]
    fn unparseable_integer_falls_back_to_text() {
        let fields = schema(json!([{"name": "id", "type": "INTEGER"}]));
        let decoded = decode_row(&fields, &row(json!({"f": [{"v": "n/a"}]})));
        assert_eq!(decoded["id"], json!("n/a"));
    }

    #[test]
    fn repeated_scalars_become_array() {
        let fields = schema(json!([{"name": "tags", "type": "STRING", "mode": "REPEATED"}]));
        let decoded = decode_row(
            &fields,
            &row(json!({"f": [{"v": [{"v": "a"}, {"v": "b"}]}]})),
        );
        assert_eq!(decoded["tags"], json!(["a", "b"]));
    }

    #[test]
    fn nested_records_decode_recursively() {
        let fields = schema(json!([{
            "name": "address",
            "type": "RECORD",
            "fields": [
                {"name": "city", "type": "STRING"},
                {"name": "zip", "type": "INTEGER"}
            ]
        }]));
        let decoded = decode_row(
            &fields,
            &row(json!({"f": [{"v": {"f": [{"v": "Milano"}, {"v": "20121"}]}}]})),
        );
        assert_eq!(decoded["address"], json!({"city": "Milano", "zip": 20121}));
    }

    #[test]
    fn repeated_records() {
        let fields = schema(json!([{
            "name": "items",
            "type": "RECORD",
            "mode": "REPEATED",
            "fields": [{"name": "sku", "type": "STRING"}]
        }]));
        let decoded = decode_row(
            &fields,
            &row(json!({"f": [{"v": [
                {"v": {"f": [{"v": "A1"}]}},
                {"v": {"f": [{"v": "B2"}]}}
            ]}]})),
        );
        assert_eq!(decoded["items"], json!([{"sku": "A1"}, {"sku": "B2"}]));
    }
}
