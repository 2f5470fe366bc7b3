//! Configuration (env-layered, `.env` aware).

pub mod credential;

pub use credential::BearerToken;

/// Default hosted chat-completion endpoint (OpenAI-compatible router).
pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/v1";
/// Default hosted model id.
pub const DEFAULT_REMOTE_MODEL: &str = "openai/gpt-oss-20b";
/// Default speech-to-text model id for the HTTP backend.
pub const DEFAULT_SPEECH_MODEL: &str = "whisper-1";

/// Configuration for the pipeline's hosted collaborators.
///
/// Resolution order: explicit setters > environment. `from_env` loads a
/// `.env` file first if one is present.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_token: Option<BearerToken>,
    pub base_url: String,
    pub remote_model: String,
    pub speech_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            remote_model: DEFAULT_REMOTE_MODEL.to_string(),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Load from environment variables, reading `.env` if present.
    ///
    /// Recognized variables: `KIGO_API_TOKEN` (falling back to `HF_TOKEN`),
    /// `KIGO_BASE_URL`, `KIGO_REMOTE_MODEL`, `KIGO_SPEECH_MODEL`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();

        if let Ok(token) = std::env::var("KIGO_API_TOKEN").or_else(|_| std::env::var("HF_TOKEN")) {
            config.api_token = Some(BearerToken::new(token));
        }
        if let Ok(url) = std::env::var("KIGO_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(model) = std::env::var("KIGO_REMOTE_MODEL") {
            config.remote_model = model;
        }
        if let Ok(model) = std::env::var("KIGO_SPEECH_MODEL") {
            config.speech_model = model;
        }

        config
    }

    pub fn with_api_token(mut self, token: impl Into<BearerToken>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_remote_model(mut self, model: impl Into<String>) -> Self {
        self.remote_model = model.into();
        self
    }

    pub fn with_speech_model(mut self, model: impl Into<String>) -> Self {
        self.speech_model = model.into();
        self
    }
}
