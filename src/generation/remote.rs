//! Hosted chat-completion generator (streaming SSE).

use futures::StreamExt;
use serde::Deserialize;
use tracing::debug;

use super::http::{
    bearer_headers, parse_sse_data, shared_client, status_to_error, trim_trailing_slash,
};
use crate::config::BearerToken;
use crate::error::{KigoError, Result};
use crate::types::{ChatMessage, ChunkStream, DecodingParams, GenerationChunk};

/// Warning yielded instead of model output when no credential is present.
pub const MISSING_CREDENTIAL_WARNING: &str =
    "⚠️ Please sign in and provide an access token before using the hosted model.";

/// Streams haiku completions from an OpenAI-compatible chat endpoint.
pub struct RemoteGenerator {
    credential: Option<BearerToken>,
    base_url: String,
    model: String,
}

impl RemoteGenerator {
    pub fn new(
        credential: Option<BearerToken>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            credential,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn build_request_body(
        &self,
        messages: &[ChatMessage],
        params: &DecodingParams,
    ) -> serde_json::Value {
        let wire_messages = messages
            .iter()
            .map(|m| serde_json::json!({ "role": m.role.as_str(), "content": m.content }))
            .collect::<Vec<_>>();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": wire_messages,
            "stream": true,
        });

        let obj = body.as_object_mut().unwrap();
        if let Some(max) = params.max_tokens {
            obj.insert("max_tokens".into(), max.into());
        }
        if let Some(temp) = params.temperature {
            obj.insert("temperature".into(), temp.into());
        }
        if let Some(top_p) = params.top_p {
            obj.insert("top_p".into(), top_p.into());
        }

        body
    }

    /// Open a streaming completion for `messages`.
    ///
    /// With no usable credential this deliberately short-circuits: the
    /// returned stream yields exactly one warning chunk and no request is
    /// issued. Otherwise each incoming delta is re-emitted as a chunk whose
    /// payload is the cumulative text observed so far. Transport failures
    /// mid-stream surface as one `Err` item and end the stream.
    pub async fn generate_stream(
        &self,
        messages: &[ChatMessage],
        params: &DecodingParams,
    ) -> Result<ChunkStream> {
        let token = match &self.credential {
            Some(token) if !token.is_blank() => token.clone(),
            _ => {
                debug!("No credential; yielding login warning");
                return Ok(Box::pin(tokio_stream::once(Ok(GenerationChunk::warning(
                    MISSING_CREDENTIAL_WARNING,
                )))));
            }
        };

        let body = self.build_request_body(messages, params);
        let url = format!("{}/chat/completions", trim_trailing_slash(&self.base_url));

        debug!(model = %self.model, "Opening hosted completion stream");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(token.as_str()))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let byte_stream = resp.bytes_stream();

        let stream = async_stream::stream! {
            let mut response = String::new();
            let mut buffer = String::new();
            futures::pin_mut!(byte_stream);

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        // Fail-fast: surface the transport error and stop.
                        yield Err(KigoError::Network(e));
                        break;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim().to_string();
                    buffer = buffer[line_end + 1..].to_string();

                    if line.is_empty() || line.starts_with(':') {
                        continue;
                    }

                    if let Some(data) = parse_sse_data(&line) {
                        match serde_json::from_str::<StreamChunk>(data) {
                            Ok(parsed) => {
                                if let Some(choice) = parsed.choices.into_iter().next() {
                                    let delta = choice.delta.content.unwrap_or_default();
                                    response.push_str(&delta);
                                    yield Ok(GenerationChunk::text(response.clone()));
                                }
                            }
                            Err(_) => {} // skip unparseable chunks
                        }
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

impl std::fmt::Debug for RemoteGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteGenerator")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("credential", &self.credential)
            .finish()
    }
}

// Wire types for the streaming response (internal).

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize)]
struct StreamDelta {
    content: Option<String>,
}
