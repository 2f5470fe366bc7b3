//! Core types shared across the pipeline.

pub mod audio;
pub mod generation;
pub mod message;
pub mod stream;

pub use audio::{AudioClip, AudioFormat};
pub use generation::{DecodingParams, GenerationMode};
pub use message::{ChatMessage, Role};
pub use stream::{ChunkKind, ChunkStream, GenerationChunk};
