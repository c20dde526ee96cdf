use crate::errors::ToolError;
use crate::managers::ToolName;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).expect("tool_catalog.json must be valid JSON")
});

static TOOL_MAP: Lazy<HashMap<String, ToolDef>> = Lazy::new(|| {
    TOOL_CATALOG
        .iter()
        .cloned()
        .map(|tool| (tool.name.clone(), tool))
        .collect()
});

/// Descriptors in the order they are advertised by `tools/list`.
pub fn tool_catalog() -> &'static Vec<ToolDef> {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_MAP.get(name)
}

/// Checks that the advertised catalogue and the dispatch table name exactly
/// the same tools.
pub fn validate_catalog(catalog: &[ToolDef]) -> Result<(), ToolError> {
    let advertised: BTreeSet<&str> = catalog.iter().map(|tool| tool.name.as_str()).collect();
    let dispatchable: BTreeSet<&str> = ToolName::ALL.iter().map(|tool| tool.as_str()).collect();

    let unhandled: Vec<&str> = advertised.difference(&dispatchable).copied().collect();
    let unadvertised: Vec<&str> = dispatchable.difference(&advertised).copied().collect();
    let duplicates = catalog.len() != advertised.len();

    if unhandled.is_empty() && unadvertised.is_empty() && !duplicates {
        return Ok(());
    }
    Err(ToolError::internal("Tool wiring is incomplete")
        .with_hint("Every tool in tool_catalog.json must map to exactly one operation.")
        .with_details(serde_json::json!({
            "unhandled_tools": unhandled,
            "unadvertised_tools": unadvertised,
            "duplicate_names": duplicates,
        })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_matches_dispatch_table() {
        validate_catalog(tool_catalog()).expect("catalog and dispatch must agree");
        assert_eq!(tool_catalog().len(), ToolName::ALL.len());
    }

    #[test]
    fn schemas_declare_every_required_property() {
        for tool in tool_catalog() {
            let schema = &tool.input_schema;
            assert_eq!(schema["type"], "object", "{} schema type", tool.name);
            let props = schema["properties"]
                .as_object()
                .unwrap_or_else(|| panic!("{} has no properties", tool.name));
            if let Some(required) = schema.get("required").and_then(|v| v.as_array()) {
                for field in required {
                    let field = field.as_str().expect("required entries are strings");
                    assert!(props.contains_key(field), "{} requires undeclared {}", tool.name, field);
                }
            }
        }
    }

    #[test]
    fn defaults_are_advertised() {
        let create = tool_by_name("create_user").expect("create_user");
        assert_eq!(create.input_schema["properties"]["account_enabled"]["default"], true);
        let users = tool_by_name("list_users").expect("list_users");
        assert_eq!(users.input_schema["properties"]["top"]["default"], 100);
        let grant = tool_by_name("grant_site_permission").expect("grant_site_permission");
        assert_eq!(
            grant.input_schema["properties"]["role"]["enum"],
            serde_json::json!(["read", "write", "manage", "fullcontrol"])
        );
    }

    #[test]
    fn validate_catalog_reports_drift() {
        let mut catalog = tool_catalog().clone();
        catalog.retain(|tool| tool.name != "get_root_site");
        catalog.push(ToolDef {
            name: "delete_tenant".to_string(),
            description: String::new(),
            input_schema: serde_json::json!({"type": "object", "properties": {}}),
        });
        let err = validate_catalog(&catalog).expect_err("must fail");
        let details = err.details.expect("details");
        assert_eq!(details["unhandled_tools"], serde_json::json!(["delete_tenant"]));
        assert_eq!(details["unadvertised_tools"], serde_json::json!(["get_root_site"]));
    }
}
