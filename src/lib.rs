//! Kigo — voice-to-haiku pipeline.
//!
//! Transcribes an audio clip with a speech backend and streams back a
//! haiku from a hosted chat-completion endpoint or a locally resident
//! generative model.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use futures::StreamExt;
//! use kigo::audio::{HttpSpeechBackend, Transcriber};
//! use kigo::generation::{HaikuGenerator, LocalGenerator, RemoteGenerator};
//! use kigo::pipeline::HaikuPipeline;
//! use kigo::prelude::*;
//!
//! # async fn example(local_backend: Arc<dyn kigo::generation::TextGenBackend>) -> kigo::error::Result<()> {
//! let config = Config::from_env();
//!
//! let transcriber = Transcriber::with_backend(Arc::new(HttpSpeechBackend::new(
//!     config.api_token.clone().unwrap_or_else(|| "".into()),
//!     config.base_url.clone(),
//!     config.speech_model.clone(),
//! )));
//! let generator = HaikuGenerator::new(
//!     RemoteGenerator::new(config.api_token.clone(), config.base_url.clone(), config.remote_model.clone()),
//!     LocalGenerator::with_backend(local_backend),
//! );
//! let pipeline = HaikuPipeline::new(transcriber, generator);
//!
//! let clip = AudioClip::from_path("clip.wav")?;
//! let mut stream = pipeline
//!     .respond(&clip, &[], GenerationMode::Remote, &DecodingParams::default())
//!     .await?;
//! while let Some(chunk) = stream.next().await {
//!     println!("{}", chunk?.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod prelude;
pub mod prompt;
pub mod types;
pub mod util;
