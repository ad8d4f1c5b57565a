//! Static descriptors of the four BigQuery tools.

use serde_json::{json, Value};

use bqmcp_protocol::mcp::tools::McpToolDefinition;

use super::Tool;

impl Tool {
    /// Human-readable description shown to MCP clients.
    pub fn description(self) -> &'static str {
        match self {
            Self::QueryBigquery => "Esegue una query SQL su BigQuery",
            Self::ListDatasets => "Lista tutti i dataset disponibili nel progetto",
            Self::ListTables => "Lista le tabelle in un dataset",
            Self::DescribeTable => "Descrive la struttura di una tabella",
        }
    }

    /// JSON Schema of the tool arguments.
    pub fn input_schema(self) -> Value {
        match self {
            Self::QueryBigquery => json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Query SQL da eseguire"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Limite di righe da restituire (default: 100)",
                        "default": 100
                    }
                },
                "required": ["query"]
            }),
            Self::ListDatasets => json!({
                "type": "object",
                "properties": {}
            }),
            Self::ListTables => json!({
                "type": "object",
                "properties": {
                    "dataset_id": {
                        "type": "string",
                        "description": "ID del dataset"
                    }
                },
                "required": ["dataset_id"]
            }),
            Self::DescribeTable => json!({
                "type": "object",
                "properties": {
                    "dataset_id": {
                        "type": "string",
                        "description": "ID del dataset"
                    },
                    "table_id": {
                        "type": "string",
                        "description": "ID della tabella"
                    }
                },
                "required": ["dataset_id", "table_id"]
            }),
        }
    }

    /// The `tools/list` entry for this tool.
    pub fn definition(self) -> McpToolDefinition {
        McpToolDefinition {
            name: self.name().to_string(),
            description: Some(self.description().to_string()),
            input_schema: self.input_schema(),
        }
    }
}

/// All tool descriptors, in their fixed order.
pub fn tool_definitions() -> Vec<McpToolDefinition> {
    Tool::ALL.iter().map(|t| t.definition()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(tool: Tool) -> Vec<String> {
        tool.input_schema()
            .get("required")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn four_tools_in_fixed_order() {
        let names: Vec<_> = tool_definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            ["query_bigquery", "list_datasets", "list_tables", "describe_table"]
        );
    }

    #[test]
    fn required_fields_per_tool() {
        assert_eq!(required(Tool::QueryBigquery), ["query"]);
        assert!(required(Tool::ListDatasets).is_empty());
        assert_eq!(required(Tool::ListTables), ["dataset_id"]);
        assert_eq!(required(Tool::DescribeTable), ["dataset_id", "table_id"]);
    }

    #[test]
    fn query_limit_defaults_to_100() {
        let schema = Tool::QueryBigquery.input_schema();
        assert_eq!(schema["properties"]["limit"]["default"], 100);
    }

    #[test]
    fn every_schema_is_an_object_schema() {
        for tool in Tool::ALL {
            assert_eq!(tool.input_schema()["type"], "object", "{tool}");
        }
    }
}
