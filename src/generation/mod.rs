//! Haiku generation: remote streaming and local single-shot modes.

pub mod http;
pub mod local;
pub mod remote;

pub use local::{LocalGenerator, TextGenBackend};
pub use remote::{RemoteGenerator, MISSING_CREDENTIAL_WARNING};

use futures::StreamExt;

use crate::error::Result;
use crate::types::{ChatMessage, ChunkStream, DecodingParams, GenerationMode};

/// Dispatches a prompt to the hosted endpoint or the in-process model.
///
/// Both paths are constructed up front; which one runs is chosen per call,
/// mirroring a host UI's mode toggle. Each call produces one finite,
/// non-restartable traversal.
#[derive(Debug)]
pub struct HaikuGenerator {
    remote: RemoteGenerator,
    local: LocalGenerator,
}

impl HaikuGenerator {
    pub fn new(remote: RemoteGenerator, local: LocalGenerator) -> Self {
        Self { remote, local }
    }

    pub fn remote(&self) -> &RemoteGenerator {
        &self.remote
    }

    pub fn local(&self) -> &LocalGenerator {
        &self.local
    }

    /// Stream a completion for `messages` in the given mode.
    pub async fn generate_stream(
        &self,
        messages: &[ChatMessage],
        mode: GenerationMode,
        params: &DecodingParams,
    ) -> Result<ChunkStream> {
        match mode {
            GenerationMode::Remote => self.remote.generate_stream(messages, params).await,
            GenerationMode::Local => self.local.generate_stream(messages, params).await,
        }
    }
}

/// Drain a chunk stream and return the final answer text.
///
/// Chunk payloads are cumulative snapshots, so the final answer is the last
/// chunk's text, not a concatenation.
pub async fn collect(mut stream: ChunkStream) -> Result<String> {
    let mut last = String::new();
    while let Some(chunk) = stream.next().await {
        last = chunk?.text;
    }
    Ok(last)
}
