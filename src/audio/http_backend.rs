//! HTTP speech backend (OpenAI-compatible `/audio/transcriptions`).

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use uuid::Uuid;

use super::transcriber::SpeechBackend;
use crate::config::BearerToken;
use crate::error::{KigoError, Result};
use crate::generation::http::{
    bearer_headers, shared_client, status_to_error, trim_trailing_slash,
};

/// Speech backend that posts the canonical WAV to a hosted transcription
/// endpoint.
#[derive(Debug, Clone)]
pub struct HttpSpeechBackend {
    token: BearerToken,
    base_url: String,
    model: String,
}

impl HttpSpeechBackend {
    pub fn new(token: BearerToken, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            token,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn validate(&self, wav: &[u8]) -> Result<()> {
        if self.token.is_blank() {
            return Err(KigoError::MissingCredential);
        }
        if wav.is_empty() {
            return Err(KigoError::InvalidAudio(
                "Audio payload cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn build_multipart(&self, boundary: &str, wav: &[u8]) -> Vec<u8> {
        let mut body = Vec::with_capacity(wav.len() + 512);

        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"model\"\r\n\r\n");
        body.extend_from_slice(self.model.as_bytes());
        body.extend_from_slice(b"\r\n");

        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"audio.wav\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: audio/wav\r\n\r\n");
        body.extend_from_slice(wav);
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        body
    }
}

#[async_trait]
impl SpeechBackend for HttpSpeechBackend {
    async fn infer(&self, wav: &[u8]) -> Result<String> {
        self.validate(wav)?;

        let boundary = format!("kigo-{}", Uuid::new_v4().simple());
        let body = self.build_multipart(&boundary, wav);

        let mut headers = bearer_headers(self.token.as_str());
        headers.insert(
            CONTENT_TYPE,
            reqwest::header::HeaderValue::from_str(&format!(
                "multipart/form-data; boundary={boundary}"
            ))
            .map_err(|e| KigoError::Configuration(format!("Bad multipart content-type: {e}")))?,
        );

        let url = format!(
            "{}/audio/transcriptions",
            trim_trailing_slash(&self.base_url)
        );

        let response = shared_client()
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }

        let parsed: TranscriptionResponse = serde_json::from_str(&response.text().await?)?;
        Ok(parsed.text)
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    // Absent text means silence; treat it as an empty transcript.
    #[serde(default)]
    text: String,
}
