//! Static tool metadata served from `list_tools`.

use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::catalog::Catalog;

/// Name of the documentation lookup tool
pub const GET_DOC: &str = "get_doc";

/// Arguments accepted by `get_doc`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GetDocArgs {
    /// The search query to find relevant documentation.
    pub query: String,

    /// The library or documentation site to search in.
    pub library: String,
}

/// Metadata for a single tool.
#[derive(Debug, Clone)]
pub struct ToolMetadata {
    pub name: &'static str,
    pub description: String,
    pub schema: Value,
}

/// Helper to build schema from Args type.
pub fn build_schema<T: JsonSchema>() -> Value {
    serde_json::to_value(schema_for!(T)).unwrap_or(Value::Null)
}

/// All tools exposed by the server. Library choices come from `catalog`.
pub fn all_tool_metadata(catalog: &Catalog) -> Vec<ToolMetadata> {
    let libraries: Vec<&str> = catalog.libraries().collect();

    let mut schema = build_schema::<GetDocArgs>();
    if let Some(library) = schema
        .pointer_mut("/properties/library")
        .and_then(Value::as_object_mut)
    {
        library.insert("enum".to_string(), json!(libraries));
    }

    let sites = catalog
        .iter()
        .map(|(library, domain)| format!("{library} ({domain})"))
        .collect::<Vec<_>>()
        .join(", ");

    vec![ToolMetadata {
        name: GET_DOC,
        description: format!(
            "Search the documentation site of a supported library for a query and return \
             the combined plain text of the top result pages.\n\n\
             Supported libraries: {sites}\n\n\
             Example: get_doc({{\"query\": \"gesture detector\", \"library\": \"flutter\"}})"
        ),
        schema,
    }]
}
