//! Transcription: canonical-WAV normalization plus a lazily loaded speech
//! backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::audio::decode;
use crate::error::Result;
use crate::types::AudioClip;
use crate::util::{HandleLoader, LazyHandle};

/// A speech-to-text backend. Input is canonical 16 kHz mono 16-bit PCM WAV.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Transcribe a canonical WAV buffer. An empty transcript is a valid
    /// result (silence).
    async fn infer(&self, wav: &[u8]) -> Result<String>;
}

/// Converts an audio clip into plain text.
///
/// The backend is constructed lazily on first use and cached for the rest
/// of the process lifetime; see [`LazyHandle`] for the racing-cold-start
/// policy. Transcription failures surface as-is — there is no retry and no
/// fallback model.
pub struct Transcriber {
    backend: LazyHandle<dyn SpeechBackend>,
}

impl Transcriber {
    /// Build the backend on first use via `loader`.
    pub fn new(loader: HandleLoader<dyn SpeechBackend>) -> Self {
        Self {
            backend: LazyHandle::new(loader),
        }
    }

    /// Use an already-constructed backend.
    pub fn with_backend(backend: Arc<dyn SpeechBackend>) -> Self {
        Self {
            backend: LazyHandle::preloaded(backend),
        }
    }

    /// Whether the backend has been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.backend.is_loaded()
    }

    /// Decode, normalize, and transcribe one clip.
    ///
    /// Undecodable input fails with [`crate::error::KigoError::InvalidAudio`]
    /// before the backend is touched.
    pub async fn transcribe(&self, clip: &AudioClip) -> Result<String> {
        let wav = decode::canonical_wav(clip)?;
        debug!(
            format = clip.format.extension(),
            wav_bytes = wav.len(),
            "Transcribing clip"
        );
        let backend = self.backend.get_or_load()?;
        backend.infer(&wav).await
    }
}

impl std::fmt::Debug for Transcriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transcriber")
            .field("backend", &self.backend)
            .finish()
    }
}
