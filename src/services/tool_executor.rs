use crate::errors::ToolError;
use crate::managers::{Operation, ToolName};
use crate::mcp::catalog::{tool_catalog, ToolDef};
use crate::mcp::protocol::TextContent;
use crate::services::graph_client::RequestExecutor;
use crate::services::logger::Logger;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Routes tool calls to operations and turns every outcome into text.
#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    executor: Arc<dyn RequestExecutor>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, executor: Arc<dyn RequestExecutor>) -> Self {
        Self {
            logger: logger.child("executor"),
            executor,
        }
    }

    pub fn base_url(&self) -> &str {
        self.executor.base_url()
    }

    pub fn list_tools(&self) -> &'static [ToolDef] {
        tool_catalog()
    }

    /// Binds, sends and renders one call. Failures stay typed here.
    pub async fn execute(&self, tool: ToolName, args: Value) -> Result<String, ToolError> {
        let operation = Operation::from_call(tool, args)?;
        let request = operation.request(self.executor.base_url());
        let result = self
            .executor
            .execute(request.method, &request.path, request.body.as_ref())
            .await?;
        Ok(operation.render(&result))
    }

    /// Outer boundary of a call: always returns at least one block and never
    /// propagates an error.
    pub async fn call_tool(&self, name: &str, args: Value) -> Vec<TextContent> {
        let Some(tool) = ToolName::parse(name) else {
            self.logger
                .warn("unknown tool", Some(&serde_json::json!({ "tool": name })));
            return vec![TextContent::text(format!("Unknown tool: {}", name))];
        };

        let call_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        self.logger.debug(
            "tool call",
            Some(&serde_json::json!({ "call_id": call_id, "tool": name, "args": args })),
        );

        let text = match self.execute(tool, args).await {
            Ok(text) => {
                self.logger.info(
                    "tool ok",
                    Some(&serde_json::json!({
                        "call_id": call_id,
                        "tool": name,
                        "duration_ms": started.elapsed().as_millis() as u64,
                    })),
                );
                text
            }
            Err(err) => {
                self.logger.error(
                    "tool failed",
                    Some(&serde_json::json!({
                        "call_id": call_id,
                        "tool": name,
                        "kind": err.kind,
                        "status": err.status(),
                        "message": err.message,
                        "duration_ms": started.elapsed().as_millis() as u64,
                    })),
                );
                format!("Error: {}", err)
            }
        };
        vec![TextContent::text(text)]
    }
}
