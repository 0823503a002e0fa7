use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::ExchangeError;
use crate::mode::Mode;

const CHAT_MODEL: &str = "gpt-3.5-turbo";
const CHAT_TEMPERATURE: f64 = 0.7;
const IMAGE_COUNT: u32 = 1;
const IMAGE_SIZE: &str = "256x256";
const IMAGE_RESPONSE_FORMAT: &str = "url";

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

#[derive(Debug, Serialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub n: u32,
    pub size: String,
    pub response_format: String,
}

// Reply envelopes are supersets of the success and error shapes, so a
// single decode handles both. The API sends `error` instead of
// `choices`/`data` when it rejects a request.

#[derive(Debug, Deserialize)]
pub struct ChatEnvelope {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatReplyMessage {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageEnvelope {
    #[serde(default)]
    pub data: Vec<ImageData>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ImageData {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: String,
}

/// Result of one exchange, tagged by the capability that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeReply {
    Text(String),
    ImageUrl(String),
}

/// Status and body of one HTTP round trip, before decoding.
#[derive(Debug)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// The raw HTTP leg of an exchange. Kept behind a trait so tests can
/// substitute a scripted reply and count outbound calls.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, bearer: &str, body: Value)
        -> Result<HttpReply, ExchangeError>;

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ExchangeError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        // No timeout override; the transport default applies.
        Self { client: Client::new() }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: Value,
    ) -> Result<HttpReply, ExchangeError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .bearer_auth(bearer)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ExchangeError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ExchangeError::Transport(format!(
                "image download failed with status {}",
                response.status()
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[derive(Clone)]
pub struct OpenAiClient {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
}

impl OpenAiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// One request/response cycle with the remote API: resolve the
    /// credential, POST the mode's fixed-shape body, decode the reply.
    /// No retries; every failure is terminal for this call.
    pub async fn exchange(&self, prompt: &str, mode: Mode) -> Result<ExchangeReply, ExchangeError> {
        let bearer = self.config.credential.bearer()?;
        let url = self.config.endpoint(mode);
        let body = build_request_body(prompt, mode)?;

        debug!(%url, ?mode, "sending prompt");
        let reply = self.transport.post_json(url, &bearer, body).await?;
        debug!(status = reply.status, "received reply");

        decode_reply(mode, &reply)
    }

    /// Download the picture behind a generated-image URL.
    pub async fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>, ExchangeError> {
        debug!(%url, "downloading generated image");
        self.transport.fetch_bytes(url).await
    }
}

fn build_request_body(prompt: &str, mode: Mode) -> Result<Value, ExchangeError> {
    let body = match mode {
        Mode::Chat => serde_json::to_value(ChatRequest {
            model: CHAT_MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: CHAT_TEMPERATURE,
        }),
        Mode::ImageGeneration => serde_json::to_value(ImageRequest {
            prompt: prompt.to_string(),
            n: IMAGE_COUNT,
            size: IMAGE_SIZE.to_string(),
            response_format: IMAGE_RESPONSE_FORMAT.to_string(),
        }),
    };
    body.map_err(|e| ExchangeError::RequestConstruction(e.to_string()))
}

fn decode_reply(mode: Mode, reply: &HttpReply) -> Result<ExchangeReply, ExchangeError> {
    match mode {
        Mode::Chat => {
            let envelope: ChatEnvelope =
                serde_json::from_str(&reply.body).map_err(|e| undecodable(reply, &e))?;
            if let Some(error) = envelope.error {
                return Err(ExchangeError::Remote(error.message));
            }
            let choice = envelope
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ExchangeError::Malformed("chat reply contained no choices".to_string()))?;
            Ok(ExchangeReply::Text(choice.message.content))
        }
        Mode::ImageGeneration => {
            let envelope: ImageEnvelope =
                serde_json::from_str(&reply.body).map_err(|e| undecodable(reply, &e))?;
            if let Some(error) = envelope.error {
                return Err(ExchangeError::Remote(error.message));
            }
            let first = envelope
                .data
                .into_iter()
                .next()
                .ok_or_else(|| ExchangeError::Malformed("image reply contained no data".to_string()))?;
            Ok(ExchangeReply::ImageUrl(first.url))
        }
    }
}

fn undecodable(reply: &HttpReply, err: &serde_json::Error) -> ExchangeError {
    if reply.status >= 400 {
        ExchangeError::Remote(format!("HTTP {}: {}", reply.status, reply.body.trim()))
    } else {
        ExchangeError::Malformed(format!("could not decode reply: {}", err))
    }
}
