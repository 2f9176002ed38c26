//! HTTP client utilities
//!
//! Client construction and the small wire-level helpers shared by the
//! non-streaming and streaming request paths.

use std::time::Duration;

use reqwest::{header::HeaderMap, Client, Response};
use serde_json::Value;

use crate::error::{PipeError, PipeResult};
use crate::logger;

/// Total timeout for non-streaming requests, in seconds.
///
/// Streaming requests carry no total timeout: the response lives as long as
/// the remote holds the connection open.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Create the HTTP client shared by all requests.
///
/// Only the connect timeout lives on the client; the total timeout is
/// applied per request so streamed responses can outlive it.
pub fn create_client() -> PipeResult<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| PipeError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Determine whether the caller asked for a streamed response.
///
/// Accepts the boolean, numeric, and string spellings of a truthy `stream`
/// flag; anything else means non-streaming.
pub fn is_streaming_request(payload: &Value) -> bool {
    match payload.get("stream") {
        Some(Value::Bool(stream)) => *stream,
        Some(Value::Number(value)) => value.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Some(Value::String(value)) => {
            let normalized = value.trim().to_ascii_lowercase();
            matches!(normalized.as_str(), "true" | "1" | "yes" | "on")
        }
        _ => false,
    }
}

/// Make a single POST request
pub async fn make_request(
    client: &Client,
    url: &str,
    headers: HeaderMap,
    body: &Value,
    streaming: bool,
) -> PipeResult<Response> {
    logger::debug("client", &format!("Sending request to: {}", url));

    let mut request = client.post(url).headers(headers).json(body);
    if !streaming {
        request = request.timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS));
    }

    let response = request.send().await.map_err(|e| {
        logger::error("client", &format!("Request failed: {}", e));
        if e.is_timeout() {
            PipeError::request(format!("Request timed out: {}", e), None)
        } else if e.is_connect() {
            PipeError::request(format!("Connection failed: {}", e), None)
        } else {
            PipeError::request(format!("Request error: {}", e), None)
        }
    })?;

    logger::debug("client", &format!("Response status: {}", response.status()));

    Ok(response)
}

/// Drain complete lines from a byte buffer.
///
/// Handles chunked responses where line breaks may split across reads.
pub fn drain_lines(buffer: &mut Vec<u8>, chunk: &[u8]) -> Vec<String> {
    if !chunk.is_empty() {
        buffer.extend_from_slice(chunk);
    }

    let mut lines = Vec::new();
    loop {
        let Some(pos) = buffer.iter().position(|&b| b == b'\n') else {
            break;
        };

        let mut line = buffer.drain(..=pos).collect::<Vec<u8>>();
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        lines.push(String::from_utf8_lossy(&line).to_string());
    }

    lines
}
