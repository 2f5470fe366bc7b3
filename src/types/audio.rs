//! Audio-related types.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KigoError, Result};

/// Container format of an uploaded or recorded clip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
    Mp4,
    M4a,
}

impl AudioFormat {
    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" | "wave" => Some(Self::Wav),
            "mp3" | "mpga" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            "mp4" => Some(Self::Mp4),
            "m4a" => Some(Self::M4a),
            _ => None,
        }
    }

    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Mp4 => "mp4",
            Self::M4a => "m4a",
        }
    }

    /// MIME type sent to HTTP collaborators.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Flac => "audio/flac",
            Self::Mp4 => "audio/mp4",
            Self::M4a => "audio/x-m4a",
        }
    }
}

/// Raw audio bytes plus their declared container format.
///
/// Created per request and discarded after transcription. The bytes are not
/// validated here; decoding happens in [`crate::audio::decode`], and a clip
/// that cannot be decoded fails that request with
/// [`KigoError::InvalidAudio`].
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioClip {
    /// Wrap an in-memory buffer with a declared format.
    pub fn from_bytes(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Read a clip from disk, inferring the format from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(AudioFormat::from_extension)
            .ok_or_else(|| {
                KigoError::InvalidAudio(format!(
                    "Unsupported or missing audio extension: {}",
                    path.display()
                ))
            })?;
        let data = std::fs::read(path)?;
        Ok(Self { data, format })
    }
}
