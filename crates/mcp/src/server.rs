// MCP server: JSON-RPC 2.0, one message per line over stdio

use crate::dispatcher::Dispatcher;
use crate::error::ToolError;
use crate::protocol::{
    CallToolParams, InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo, ToolsCapability,
    DEFAULT_PROTOCOL_VERSION, JSONRPC_VERSION,
};
use anyhow::{Context, Result};
use bytes::BytesMut;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{Decoder, FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

pub const SERVER_NAME: &str = "coralogix-mcp";

/// Longest accepted request line in bytes, excluding the newline.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8 * 1024 * 1024;

#[derive(Clone)]
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
    max_line_length: usize,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Serve on the process's stdin and stdout until stdin closes.
    pub async fn serve_stdio(self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Read requests from `reader` and write responses to `writer`.
    ///
    /// Each request runs on its own task. Responses funnel through a single
    /// writer so lines never interleave. A line longer than the configured
    /// maximum is answered with an Invalid Request error and skipped. On EOF,
    /// in-flight requests finish and their responses are flushed before
    /// returning.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut lines = FramedRead::new(reader, RequestLines::new(self.max_line_length));
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let writer_task = tokio::spawn(async move {
            let mut sink = FramedWrite::new(writer, LinesCodec::new());
            while let Some(response) = rx.recv().await {
                let line = match serde_json::to_string(&response) {
                    Ok(line) => line,
                    Err(e) => {
                        error!(error = %e, "Failed to serialize response");
                        continue;
                    }
                };
                if let Err(e) = sink.send(line).await {
                    error!(error = %e, "Failed to write response");
                    break;
                }
            }
        });

        let tracker = TaskTracker::new();
        let mut read_result: Result<()> = Ok(());

        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(RequestLine::Complete(line)) => line,
                Ok(RequestLine::TooLong) => {
                    warn!(max_bytes = self.max_line_length, "Request line too long, discarded");
                    let _ = tx.send(JsonRpcResponse::error(
                        Value::Null,
                        JsonRpcError::invalid_request(format!(
                            "Invalid Request: line exceeds {} bytes",
                            self.max_line_length
                        )),
                    ));
                    continue;
                }
                Err(e) => {
                    read_result = Err(e).context("Failed to read request");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let server = self.clone();
            let tx = tx.clone();
            tracker.spawn(async move {
                if let Some(response) = server.handle_line(&line).await {
                    // Receiver only closes if the writer failed; already logged there.
                    let _ = tx.send(response);
                }
            });
        }

        info!("Input closed, shutting down");
        tracker.close();
        tracker.wait().await;
        drop(tx);
        writer_task.await.context("Response writer task failed")?;

        read_result
    }

    /// Handle one raw line. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(e),
                ))
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_request(format!("Invalid Request: {}", e)),
                ))
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request("Invalid Request: jsonrpc must be \"2.0\""),
            ));
        }

        if request.is_notification() {
            debug!(method = %request.method, "Ignoring notification");
            return None;
        }

        Some(match self.handle_request(request).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Result<Value, JsonRpcError> {
        debug!(method = %request.method, "Handling request");

        match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(json!({})),
            "tools/list" => to_result(&ListToolsResult {
                tools: self.dispatcher.list_tools(),
            }),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        }
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = match params {
            Some(Value::Null) | None => InitializeParams::default(),
            Some(params) => serde_json::from_value(params)
                .map_err(|e| JsonRpcError::invalid_params(format!("Invalid initialize params: {}", e)))?,
        };

        if let Some(client) = &params.client_info {
            info!(client = %client.name, version = %client.version, "Client connected");
        }

        to_result(&InitializeResult {
            protocol_version: params
                .protocol_version
                .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string()),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params for tools/call"))?;
        let params: CallToolParams = serde_json::from_value(params)
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)))?;

        match self.dispatcher.call(&params.name, params.arguments).await {
            Ok(result) => to_result(&result),
            Err(e) => Err(tool_error(&e)),
        }
    }
}

/// One framed unit of input.
#[derive(Debug, PartialEq, Eq)]
enum RequestLine {
    Complete(String),
    /// The line exceeded the limit; its bytes were dropped up to the next newline.
    TooLong,
}

/// Newline-delimited framing with a length cap.
///
/// An oversized line surfaces as a frame rather than a decode error, since
/// `FramedRead` ends the stream after an error and the session must go on.
struct RequestLines {
    inner: LinesCodec,
}

impl RequestLines {
    fn new(max_length: usize) -> Self {
        Self {
            inner: LinesCodec::new_with_max_length(max_length),
        }
    }

    fn frame(
        result: Result<Option<String>, LinesCodecError>,
    ) -> Result<Option<RequestLine>, LinesCodecError> {
        match result {
            Ok(line) => Ok(line.map(RequestLine::Complete)),
            Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(RequestLine::TooLong)),
            Err(e) => Err(e),
        }
    }
}

impl Decoder for RequestLines {
    type Item = RequestLine;
    type Error = LinesCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<RequestLine>, LinesCodecError> {
        Self::frame(self.inner.decode(buf))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<RequestLine>, LinesCodecError> {
        Self::frame(self.inner.decode_eof(buf))
    }
}

fn to_result<T: Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

fn tool_error(err: &ToolError) -> JsonRpcError {
    let code = match err {
        ToolError::Validation(_) | ToolError::UnknownTool(_) => JsonRpcError::INVALID_PARAMS,
        ToolError::DataUnavailable(_) | ToolError::Upstream(_) | ToolError::Configuration(_) => {
            JsonRpcError::INTERNAL_ERROR
        }
    };
    JsonRpcError::custom(code, err.to_string()).with_data(json!({ "kind": err.kind() }))
}
