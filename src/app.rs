use crate::config::GraphConfig;
use crate::errors::ToolError;
use crate::mcp::catalog::{tool_catalog, validate_catalog};
use crate::services::credentials::{ClientCredentialProvider, TokenSource};
use crate::services::graph_client::{GraphClient, RequestExecutor};
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolExecutor;
use std::sync::Arc;

/// Explicitly owned wiring for one server process.
pub struct App {
    pub logger: Logger,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    pub fn validate_tool_wiring() -> Result<(), ToolError> {
        validate_catalog(tool_catalog())
    }

    pub fn from_env() -> Result<Self, ToolError> {
        let config = GraphConfig::from_env()?;
        Self::initialize(&config)
    }

    pub fn initialize(config: &GraphConfig) -> Result<Self, ToolError> {
        let logger = Logger::new("msgraph");
        let credentials: Arc<dyn TokenSource> =
            Arc::new(ClientCredentialProvider::new(logger.clone(), config)?);
        let graph_client: Arc<dyn RequestExecutor> =
            Arc::new(GraphClient::new(logger.clone(), config, credentials)?);
        Self::with_executor(logger, graph_client)
    }

    /// Wires the dispatcher around any request executor.
    pub fn with_executor(
        logger: Logger,
        executor: Arc<dyn RequestExecutor>,
    ) -> Result<Self, ToolError> {
        Self::validate_tool_wiring()?;
        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), executor));
        logger.info(
            "initialized",
            Some(&serde_json::json!({
                "tools": tool_executor.list_tools().len(),
                "graph_endpoint": tool_executor.base_url(),
            })),
        );
        Ok(Self {
            logger,
            tool_executor,
        })
    }
}
