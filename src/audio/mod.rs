//! Audio handling: decoding, normalization, and transcription.

pub mod decode;
pub mod http_backend;
pub mod transcriber;

#[cfg(feature = "whisper")]
pub mod whisper;

pub use decode::{canonical_wav, PcmAudio, CANONICAL_SAMPLE_RATE};
pub use http_backend::HttpSpeechBackend;
pub use transcriber::{SpeechBackend, Transcriber};

#[cfg(feature = "whisper")]
pub use whisper::{WhisperConfig, WhisperSpeechBackend};
