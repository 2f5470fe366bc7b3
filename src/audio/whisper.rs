//! In-process whisper speech backend.
//!
//! Requires the `whisper` cargo feature (and cmake at build time). The
//! model file is loaded when the backend is constructed, which is why the
//! [`crate::audio::Transcriber`] defers construction to first use.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::transcriber::SpeechBackend;
use crate::error::{KigoError, Result};

/// Configuration for the whisper backend.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to a ggml model file.
    pub model_path: PathBuf,
    /// Language code ("en", "es", ...); `None` autodetects.
    pub language: Option<String>,
    /// Inference threads (`None` = whisper default).
    pub threads: Option<usize>,
}

/// Whisper-based speech backend.
pub struct WhisperSpeechBackend {
    context: Arc<Mutex<WhisperContext>>,
    config: WhisperConfig,
}

impl WhisperSpeechBackend {
    /// Load the model from disk. This is the expensive cold-start step.
    pub fn load(config: WhisperConfig) -> Result<Self> {
        if !config.model_path.exists() {
            return Err(KigoError::Configuration(format!(
                "Whisper model not found: {}",
                config.model_path.display()
            )));
        }

        let path = config.model_path.to_str().ok_or_else(|| {
            KigoError::Configuration("Invalid UTF-8 in model path".to_string())
        })?;
        let context = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| KigoError::Backend(format!("Failed to load whisper model: {e}")))?;

        Ok(Self {
            context: Arc::new(Mutex::new(context)),
            config,
        })
    }

    /// Pull 16-bit samples out of a canonical WAV buffer, normalized to
    /// [-1.0, 1.0] as whisper expects.
    fn wav_to_samples(wav: &[u8]) -> Result<Vec<f32>> {
        let reader = hound::WavReader::new(std::io::Cursor::new(wav))
            .map_err(|e| KigoError::InvalidAudio(format!("WAV parse failed: {e}")))?;
        reader
            .into_samples::<i16>()
            .map(|s| {
                s.map(|v| v as f32 / 32768.0)
                    .map_err(|e| KigoError::InvalidAudio(format!("WAV sample error: {e}")))
            })
            .collect()
    }

    fn run_inference(
        context: &Mutex<WhisperContext>,
        config: &WhisperConfig,
        samples: &[f32],
    ) -> Result<String> {
        let context = context
            .lock()
            .map_err(|e| KigoError::Backend(format!("Whisper context poisoned: {e}")))?;
        let mut state = context
            .create_state()
            .map_err(|e| KigoError::Backend(format!("Failed to create whisper state: {e}")))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(config.language.as_deref());
        if let Some(threads) = config.threads {
            params.set_n_threads(threads as i32);
        }
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| KigoError::Backend(format!("Whisper inference failed: {e}")))?;

        let mut text = String::new();
        for segment in state.as_iter() {
            text.push_str(&segment.to_string());
        }
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl SpeechBackend for WhisperSpeechBackend {
    async fn infer(&self, wav: &[u8]) -> Result<String> {
        let samples = Self::wav_to_samples(wav)?;
        let context = self.context.clone();
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || Self::run_inference(&context, &config, &samples))
            .await
            .map_err(|e| KigoError::Backend(format!("Whisper task failed: {e}")))?
    }
}

impl std::fmt::Debug for WhisperSpeechBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperSpeechBackend")
            .field("config", &self.config)
            .field("context", &"<WhisperContext>")
            .finish()
    }
}
