use crate::constants::{auth, env, network};
use crate::errors::ToolError;
use std::fmt;
use url::Url;

/// Process-wide settings, read once at startup.
#[derive(Clone)]
pub struct GraphConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub authority_host: String,
    pub graph_endpoint: String,
    pub request_timeout_ms: u64,
}

impl GraphConfig {
    pub fn from_env() -> Result<Self, ToolError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ToolError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let tenant_id = read(env::TENANT_ID);
        let client_id = read(env::CLIENT_ID);
        let client_secret = read(env::CLIENT_SECRET);

        let missing: Vec<&str> = [
            (env::TENANT_ID, tenant_id.is_none()),
            (env::CLIENT_ID, client_id.is_none()),
            (env::CLIENT_SECRET, client_secret.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(key, _)| key)
        .collect();

        let (Some(tenant_id), Some(client_id), Some(client_secret)) =
            (tenant_id, client_id, client_secret)
        else {
            return Err(ToolError::config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ))
            .with_hint(format!(
                "Set {}, {} and {} for the app registration.",
                env::TENANT_ID,
                env::CLIENT_ID,
                env::CLIENT_SECRET
            )));
        };

        let authority_host = normalize_base_url(
            read(env::AUTHORITY_HOST).as_deref(),
            network::DEFAULT_AUTHORITY_HOST,
            env::AUTHORITY_HOST,
        )?;
        let graph_endpoint = normalize_base_url(
            read(env::GRAPH_ENDPOINT).as_deref(),
            network::DEFAULT_GRAPH_ENDPOINT,
            env::GRAPH_ENDPOINT,
        )?;

        let request_timeout_ms = match read(env::REQUEST_TIMEOUT_MS) {
            None => network::TIMEOUT_API_REQUEST_MS,
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| {
                    ToolError::config(format!(
                        "{} must be a positive integer (got '{}')",
                        env::REQUEST_TIMEOUT_MS,
                        raw
                    ))
                })?,
        };

        Ok(Self {
            tenant_id,
            client_id,
            client_secret,
            authority_host,
            graph_endpoint,
            request_timeout_ms,
        })
    }

    pub fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority_host, self.tenant_id)
    }

    /// `https://graph.microsoft.com/.default` for the public cloud.
    pub fn scope(&self) -> String {
        let origin = Url::parse(&self.graph_endpoint)
            .map(|url| url.origin().ascii_serialization())
            .unwrap_or_else(|_| self.graph_endpoint.clone());
        format!("{}/{}", origin, auth::SCOPE_SUFFIX)
    }
}

impl fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("authority_host", &self.authority_host)
            .field("graph_endpoint", &self.graph_endpoint)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

fn normalize_base_url(raw: Option<&str>, fallback: &str, label: &str) -> Result<String, ToolError> {
    let raw = raw.unwrap_or(fallback);
    let mut url = Url::parse(raw).map_err(|_| {
        ToolError::config(format!("{} is not a valid URL", label))
            .with_hint("Expected an absolute URL, e.g. \"https://graph.microsoft.com/v1.0\".")
            .with_details(serde_json::json!({ "value": raw }))
    })?;
    url.set_fragment(None);
    url.set_query(None);
    let normalized = format!("{}{}", url.origin().ascii_serialization(), url.path());
    Ok(normalized.trim_end_matches('/').to_string())
}
