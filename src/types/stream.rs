//! Streaming types.

use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::KigoError;

/// A unit of incrementally produced output.
///
/// `text` carries the *cumulative* answer so far, not the latest delta: a
/// consumer that only keeps the most recent chunk always holds the full
/// answer-so-far. Chunks are never retracted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationChunk {
    /// Full answer observed so far.
    pub text: String,
    /// What this chunk represents.
    pub kind: ChunkKind,
}

impl GenerationChunk {
    /// A model-text snapshot.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ChunkKind::Text,
        }
    }

    /// A user-facing warning substituted for model output.
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ChunkKind::Warning,
        }
    }
}

/// Kind of chunk.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// Model output (cumulative).
    Text,
    /// A warning message shown instead of model output.
    Warning,
}

/// A finite, single-traversal sequence of chunks. Dropping the stream is
/// the cancellation point; there is no other way to stop a generation.
pub type ChunkStream = BoxStream<'static, Result<GenerationChunk, KigoError>>;
