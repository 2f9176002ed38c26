//! The pipe adapter
//!
//! Accepts a generic chat completion body from the hosting framework,
//! filters it down to the fields the upstream accepts, and relays one HTTP
//! call to the configured endpoint. The result is the decoded response
//! body, a lazy stream of raw lines, or an error string; nothing here
//! panics the host and nothing is retried.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde_json::{Map, Value};

use crate::client::{self, is_streaming_request};
use crate::config::PipeConfig;
use crate::error::{PipeError, PipeResult};
use crate::logger;
use crate::stream::LineStream;

/// Display name reported to the hosting framework.
pub const PIPE_NAME: &str = "Azure DeepSeek Pipe";

/// Fields forwarded to the upstream Chat Completions API.
///
/// Standard OpenAI parameters; the Azure-hosted DeepSeek deployments accept
/// the same set. `model` is absent on purpose: the deployment behind the
/// endpoint fixes the model.
const ALLOWED_FIELDS: &[&str] = &[
    "messages",
    "temperature",
    "top_p",
    "n",
    "stream",
    "stop",
    "max_tokens",
    "presence_penalty",
    "frequency_penalty",
    "logit_bias",
    "user",
    "function_call", // deprecated upstream, still forwarded for older callers
    "functions",     // deprecated upstream, still forwarded for older callers
    "tools",
    "tool_choice",
    "response_format",
    "seed",
];

/// Result of one pipe invocation.
pub enum PipeOutput {
    /// Decoded JSON body of a non-streaming completion.
    Completion(Value),
    /// Raw response lines of a streaming completion.
    Stream(LineStream),
    /// Human-readable failure description.
    Error(String),
}

/// Adapter forwarding chat completion requests to one Azure endpoint
pub struct Pipe {
    config: PipeConfig,
    client: Client,
}

impl Pipe {
    /// Create a pipe over an explicit configuration.
    pub fn new(config: PipeConfig) -> PipeResult<Self> {
        config.validate()?;
        let client = client::create_client()?;
        Ok(Self { config, client })
    }

    /// Create a pipe configured from the environment.
    pub fn from_env() -> PipeResult<Self> {
        Self::new(PipeConfig::from_env()?)
    }

    pub fn name(&self) -> &'static str {
        PIPE_NAME
    }

    /// Startup hook; logs only.
    pub async fn on_startup(&self) {
        logger::info("pipe", &format!("on_startup: {}", self.name()));
    }

    /// Shutdown hook; logs only.
    pub async fn on_shutdown(&self) {
        logger::info("pipe", &format!("on_shutdown: {}", self.name()));
    }

    /// Forward one chat completion request.
    ///
    /// Every failure comes back as the `Error` variant, formatted as
    /// `Error: {description} ({detail})`; none of them propagate.
    pub async fn pipe(&self, body: Value) -> PipeOutput {
        logger::info("pipe", &format!("pipe: {}", self.name()));

        match self.forward(body).await {
            Ok(output) => output,
            Err(e) => {
                logger::error("pipe", &format!("Request error: {}", e));
                PipeOutput::Error(format!("Error: {}", e))
            }
        }
    }

    async fn forward(&self, mut body: Value) -> PipeResult<PipeOutput> {
        normalize_user_field(&mut body);

        let streaming = is_streaming_request(&body);
        let (filtered, dropped) = filter_payload(&body);
        if !dropped.is_empty() {
            logger::debug("pipe", &format!("Dropped params: {}", dropped.join(", ")));
        }

        let url = self.build_url();
        let headers = self.build_headers()?;
        let response =
            client::make_request(&self.client, &url, headers, &filtered, streaming).await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            logger::warn(
                "pipe",
                &format!("Request failed: status={}, response={}", status, text),
            );
            return Err(PipeError::status(status, text));
        }

        if streaming {
            return Ok(PipeOutput::Stream(LineStream::new(response)));
        }

        let text = response.text().await.map_err(|e| {
            PipeError::request(format!("Failed to read response: {}", e), None)
        })?;
        let decoded: Value = serde_json::from_str(&text).map_err(|e| {
            PipeError::request(format!("Failed to parse response JSON: {}", e), Some(text))
        })?;

        Ok(PipeOutput::Completion(decoded))
    }

    fn build_url(&self) -> String {
        format!(
            "{}/v1/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.api_version
        )
    }

    fn build_headers(&self) -> PipeResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let value = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key))
            .map_err(|_| PipeError::Internal("API key is not a valid header value".to_string()))?;
        headers.insert("authorization", value);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        Ok(headers)
    }
}

/// Filter the body down to allowed fields, reporting what was dropped.
fn filter_payload(payload: &Value) -> (Value, Vec<String>) {
    let Some(obj) = payload.as_object() else {
        return (payload.clone(), Vec::new());
    };

    let filtered: Map<String, Value> = obj
        .iter()
        .filter(|(key, _)| ALLOWED_FIELDS.contains(&key.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let dropped: Vec<String> = obj
        .keys()
        .filter(|key| !ALLOWED_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();

    (Value::Object(filtered), dropped)
}

/// Normalize a non-string `user` value to a plain string.
///
/// An object keeps its `id` sub-field; anything else is serialized whole.
/// After this the `user` field is always a string or absent.
fn normalize_user_field(payload: &mut Value) {
    let Some(obj) = payload.as_object_mut() else {
        return;
    };
    let Some(user) = obj.get("user") else {
        return;
    };
    if user.is_string() {
        return;
    }

    let normalized = match user.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(id) => id.to_string(),
        None => user.to_string(),
    };
    obj.insert("user".to_string(), Value::String(normalized));
}
