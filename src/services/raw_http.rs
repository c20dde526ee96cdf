//! One-shot HTTP endpoint that writes a canned response byte for byte.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub struct RawReply {
    pub bytes: &'static [u8],
    /// Keep the connection open after writing instead of closing it.
    pub hold_open: bool,
}

/// Serves `reply` to the first connection and returns the base URL.
pub async fn serve_once(reply: RawReply) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut buf = [0u8; 8192];
        let _ = socket.read(&mut buf).await;
        let _ = socket.write_all(reply.bytes).await;
        let _ = socket.flush().await;
        if reply.hold_open {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    });
    format!("http://{}", addr)
}

/// Headers promise 200 bytes; the body stops after ten.
pub const TRUNCATED_JSON: &[u8] =
    b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 200\r\n\r\n{\"value\":[";
