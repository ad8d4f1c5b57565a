//! `query_bigquery`: runs SQL with a default row cap.

use serde_json::Value;
use tracing::debug;

use bqmcp_warehouse::Warehouse;

use super::limit::apply_row_limit;
use super::{text_arg, FaultCause};

pub(super) async fn run(
    warehouse: &dyn Warehouse,
    args: &Value,
    default_limit: u64,
) -> Result<String, FaultCause> {
    let sql = text_arg(args, "query")?;
    let limit = limit_arg(args, default_limit)?;
    let sql = apply_row_limit(&sql, limit);
    debug!(%sql, "running query");

    let rows = warehouse.run_query(&sql).await?;
    let rendered = serde_json::to_string_pretty(&rows)?;
    Ok(format!(
        "Query eseguita con successo. Righe restituite: {}\n\nRisultati:\n{rendered}",
        rows.len()
    ))
}

/// Reads `limit` as a non-negative integer. Integral floats and numeric
/// strings are accepted; absence or `null` selects the default.
fn limit_arg(args: &Value, default_limit: u64) -> Result<u64, FaultCause> {
    let invalid = |reason: String| FaultCause::InvalidArgument {
        name: "limit".to_string(),
        reason,
    };
    match args.get("limit") {
        None | Some(Value::Null) => Ok(default_limit),
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                return Ok(v);
            }
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
                _ => Err(invalid(format!("atteso intero non negativo, ricevuto {n}"))),
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid(format!("atteso intero non negativo, ricevuto \"{s}\""))),
        Some(other) => Err(invalid(format!("atteso intero non negativo, ricevuto {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn limit_defaults_when_absent_or_null() {
        assert_eq!(limit_arg(&json!({}), 100).expect("absent"), 100);
        assert_eq!(limit_arg(&json!({"limit": null}), 7).expect("null"), 7);
    }

    #[test]
    fn limit_accepts_numbers_and_numeric_strings() {
        assert_eq!(limit_arg(&json!({"limit": 5}), 100).expect("int"), 5);
        assert_eq!(limit_arg(&json!({"limit": 10.0}), 100).expect("float"), 10);
        assert_eq!(limit_arg(&json!({"limit": " 25 "}), 100).expect("str"), 25);
        assert_eq!(limit_arg(&json!({"limit": 0}), 100).expect("zero"), 0);
    }

    #[test]
    fn limit_rejects_negative_fractional_and_garbage() {
        for bad in [json!(-1), json!(2.5), json!("dieci"), json!(true)] {
            let err = limit_arg(&json!({ "limit": bad }), 100).expect_err("invalid");
            assert!(matches!(err, FaultCause::InvalidArgument { ref name, .. } if name == "limit"));
        }
    }
}
