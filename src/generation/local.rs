//! Local continuation-model generator.
//!
//! The local backend is a plain continuation model, not a chat-structured
//! one: the prompt is flattened to role-prefixed text, generation runs once
//! (no streaming in this mode), and the backend echoes the prompt at the
//! start of its output, which is stripped before the single chunk is
//! yielded.

use std::sync::Arc;

use tracing::debug;

use crate::error::{KigoError, Result};
use crate::prompt::flatten_prompt;
use crate::types::{ChatMessage, ChunkStream, DecodingParams, GenerationChunk};
use crate::util::{HandleLoader, LazyHandle};

/// An in-process generative backend. The returned text starts with the
/// prompt it was given, followed by the continuation.
pub trait TextGenBackend: Send + Sync {
    fn generate(&self, prompt_text: &str, params: &DecodingParams) -> Result<String>;
}

/// Generates haiku with a locally resident model, loaded lazily on first
/// use and cached for the process lifetime (same policy as the
/// transcription backend).
pub struct LocalGenerator {
    backend: LazyHandle<dyn TextGenBackend>,
}

impl LocalGenerator {
    /// Build the backend on first use via `loader`.
    pub fn new(loader: HandleLoader<dyn TextGenBackend>) -> Self {
        Self {
            backend: LazyHandle::new(loader),
        }
    }

    /// Use an already-constructed backend.
    pub fn with_backend(backend: Arc<dyn TextGenBackend>) -> Self {
        Self {
            backend: LazyHandle::preloaded(backend),
        }
    }

    /// Whether the backend has been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.backend.is_loaded()
    }

    /// Run one generation and yield exactly one chunk: the continuation
    /// after the prompt prefix, trimmed of surrounding whitespace.
    pub async fn generate_stream(
        &self,
        messages: &[ChatMessage],
        params: &DecodingParams,
    ) -> Result<ChunkStream> {
        let backend = self.backend.get_or_load()?;
        let prompt_text = flatten_prompt(messages);
        let params = params.clone();

        debug!(prompt_chars = prompt_text.len(), "Running local generation");

        let completion = tokio::task::spawn_blocking(move || {
            let output = backend.generate(&prompt_text, &params)?;
            // The backend echoes the prompt; keep only the continuation.
            let continuation = output
                .strip_prefix(prompt_text.as_str())
                .unwrap_or(output.as_str());
            Ok::<_, KigoError>(continuation.trim().to_string())
        })
        .await
        .map_err(|e| KigoError::Backend(format!("Local generation task failed: {e}")))??;

        Ok(Box::pin(tokio_stream::once(Ok(GenerationChunk::text(
            completion,
        )))))
    }
}

impl std::fmt::Debug for LocalGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalGenerator")
            .field("backend", &self.backend)
            .finish()
    }
}
