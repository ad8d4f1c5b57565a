//! Property-based tests for JSON-RPC deserialization.

use bqmcp_protocol::jsonrpc::{JsonRpcRequest, RequestId};
use proptest::prelude::*;

proptest! {
    /// Arbitrary strings never cause a panic.
    #[test]
    fn no_panic_on_arbitrary_json(input in "\\PC{0,256}") {
        let _ = serde_json::from_str::<JsonRpcRequest>(&input);
    }

    /// Well-formed requests round-trip through serde with their id intact.
    #[test]
    fn valid_request_roundtrips(
        method in "[a-z/]{1,32}",
        id in any::<i64>(),
    ) {
        let json = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
        });
        let parsed: Result<JsonRpcRequest, _> = serde_json::from_value(json);
        prop_assert!(parsed.is_ok(), "rejected valid request");

        let req = parsed.expect("test: already checked");
        prop_assert_eq!(req.id.clone(), Some(RequestId::from(id)));

        let serialized = serde_json::to_string(&req).expect("test: serialize");
        let reparsed: JsonRpcRequest =
            serde_json::from_str(&serialized).expect("test: reparse");
        prop_assert_eq!(reparsed.method, req.method);
    }

    /// The version field is optional and defaults to "2.0".
    #[test]
    fn missing_jsonrpc_field_defaults(method in "[a-z]{2,16}", id in 1i64..1000) {
        let json = format!(r#"{{"id":{id},"method":"{method}"}}"#);
        let req = serde_json::from_str::<JsonRpcRequest>(&json);
        prop_assert!(req.is_ok());
        prop_assert_eq!(req.expect("test: already checked").jsonrpc, "2.0");
    }

    /// A missing "method" field parses as `None` and keeps the id.
    #[test]
    fn missing_method_field_is_none(id in 1i64..1000) {
        let json = format!(r#"{{"jsonrpc":"2.0","id":{id}}}"#);
        let req = serde_json::from_str::<JsonRpcRequest>(&json);
        prop_assert!(req.is_ok());
        let req = req.expect("test: already checked");
        prop_assert!(req.method.is_none());
        prop_assert_eq!(req.id, Some(RequestId::from(id)));
    }

    /// Any finite JSON number is accepted as an id and echoed unchanged.
    #[test]
    fn float_ids_survive_roundtrip(id in -1.0e9f64..1.0e9) {
        let json = serde_json::json!({"id": id, "method": "initialize"});
        let req: JsonRpcRequest = serde_json::from_value(json).expect("test: parse");
        let back = serde_json::to_value(&req).expect("test: serialize");
        prop_assert_eq!(back["id"].as_f64(), Some(id));
    }
}
