#![allow(dead_code)]

use msgraph_mcp::config::GraphConfig;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub const TENANT: &str = "tenant-1";

/// Config pointing both the authority and Graph at one mock server.
pub fn mock_config(base_url: &str) -> GraphConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("MICROSOFT_TENANT_ID", TENANT.to_string()),
        ("MICROSOFT_CLIENT_ID", "client-1".to_string()),
        ("MICROSOFT_CLIENT_SECRET", "s3cret".to_string()),
        ("MICROSOFT_AUTHORITY_HOST", base_url.to_string()),
        ("MICROSOFT_GRAPH_ENDPOINT", format!("{}/v1.0", base_url)),
        ("GRAPH_REQUEST_TIMEOUT_MS", "5000".to_string()),
    ]);
    GraphConfig::from_lookup(|key| vars.get(key).cloned()).expect("mock config")
}

pub fn restore_env(key: &str, previous: Option<String>) {
    match previous {
        Some(value) => std::env::set_var(key, value),
        None => std::env::remove_var(key),
    }
}
