#[tokio::main]
async fn main() {
    if let Err(err) = msgraph_mcp::mcp::server::run_stdio().await {
        eprintln!("msgraph-mcp: {}", err);
        std::process::exit(1);
    }
}
