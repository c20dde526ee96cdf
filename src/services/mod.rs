pub mod credentials;
pub mod graph_client;
pub mod logger;
pub mod tool_executor;

#[cfg(test)]
pub(crate) mod raw_http;
