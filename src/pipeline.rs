//! The transcribe-then-generate pipeline.

use tracing::debug;

use crate::audio::Transcriber;
use crate::error::Result;
use crate::generation::HaikuGenerator;
use crate::prompt::build_prompt;
use crate::types::{AudioClip, ChatMessage, ChunkStream, DecodingParams, GenerationMode};

/// Composition root: audio in, streamed haiku out.
///
/// One call processes one request synchronously up to the generation
/// stage, which is returned as a lazy stream so the host can render
/// partial output. Concurrent requests share only the lazily cached
/// backend handles inside the two stages.
#[derive(Debug)]
pub struct HaikuPipeline {
    transcriber: Transcriber,
    generator: HaikuGenerator,
}

impl HaikuPipeline {
    pub fn new(transcriber: Transcriber, generator: HaikuGenerator) -> Self {
        Self {
            transcriber,
            generator,
        }
    }

    pub fn transcriber(&self) -> &Transcriber {
        &self.transcriber
    }

    pub fn generator(&self) -> &HaikuGenerator {
        &self.generator
    }

    /// Transcribe `clip`, assemble the prompt on top of `history`, and
    /// stream back a haiku.
    ///
    /// An undecodable clip fails here with
    /// [`crate::error::KigoError::InvalidAudio`]; an empty transcript (a
    /// silent clip) proceeds through generation normally.
    pub async fn respond(
        &self,
        clip: &AudioClip,
        history: &[ChatMessage],
        mode: GenerationMode,
        params: &DecodingParams,
    ) -> Result<ChunkStream> {
        let transcript = self.transcriber.transcribe(clip).await?;
        debug!(mode = %mode, transcript_chars = transcript.len(), "Transcript ready");

        let messages = build_prompt(&transcript, history);
        self.generator.generate_stream(&messages, mode, params).await
    }
}
