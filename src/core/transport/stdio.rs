//! Exclusive-channel transport over stdin/stdout.
//!
//! Newline-delimited JSON-RPC: read one message to completion, dispatch,
//! write the response, then read the next. There is exactly one client, so
//! invocations never interleave on the stream. An I/O failure on either side
//! of the channel is fatal - the loop returns the error and the process
//! exits rather than keep serving a channel in an unknown state.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use super::rpc::{self, JsonRpcRequest, JsonRpcResponse};
use super::TransportResult;
use crate::core::McpServer;

/// Stdio transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the stdio message loop until stdin closes.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(stdin).lines();

        info!("Ready - communicating via stdin/stdout");

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(line) {
                Ok(request) => rpc::dispatch(&server, request).await,
                Err(e) => {
                    warn!("Malformed message on stdin: {}", e);
                    Some(JsonRpcResponse::parse_error(format!("Parse error: {e}")))
                }
            };

            if let Some(response) = response {
                let mut payload = serde_json::to_vec(&response)?;
                payload.push(b'\n');
                stdout.write_all(&payload).await?;
                stdout.flush().await?;
            }
        }

        info!("stdin closed, stdio transport finished");
        Ok(())
    }
}
