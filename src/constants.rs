pub mod network {
    pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
    pub const DEFAULT_GRAPH_ENDPOINT: &str = "https://graph.microsoft.com/v1.0";
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
    pub const USER_AGENT: &str = concat!("msgraph-mcp/", env!("CARGO_PKG_VERSION"));
}

pub mod auth {
    pub const GRANT_TYPE: &str = "client_credentials";
    pub const SCOPE_SUFFIX: &str = ".default";
    pub const EXPIRY_BUFFER_MS: u64 = 300_000;
}

pub mod env {
    pub const TENANT_ID: &str = "MICROSOFT_TENANT_ID";
    pub const CLIENT_ID: &str = "MICROSOFT_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "MICROSOFT_CLIENT_SECRET";
    pub const AUTHORITY_HOST: &str = "MICROSOFT_AUTHORITY_HOST";
    pub const GRAPH_ENDPOINT: &str = "MICROSOFT_GRAPH_ENDPOINT";
    pub const REQUEST_TIMEOUT_MS: &str = "GRAPH_REQUEST_TIMEOUT_MS";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

pub mod pagination {
    pub const DEFAULT_TOP: u32 = 100;
}

pub mod limits {
    pub const ERROR_BODY_BYTES: usize = 4 * 1024;
    pub const LOG_VALUE_BYTES: usize = 2048;
}
