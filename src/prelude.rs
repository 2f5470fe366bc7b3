//! Convenience re-exports for common use.

pub use crate::config::{BearerToken, Config};
pub use crate::error::{KigoError, Result};
pub use crate::types::{
    AudioClip, AudioFormat, ChatMessage, ChunkKind, ChunkStream, DecodingParams, GenerationChunk,
    GenerationMode, Role,
};
