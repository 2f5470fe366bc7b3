//! Audio decoding and canonical PCM WAV normalization.
//!
//! Uploaded clips arrive in whatever container the host accepted
//! (wav/mp3/flac/mp4/m4a). The speech backends only guarantee correct
//! results on one encoding, so everything is decoded here and re-rendered
//! as 16 kHz mono 16-bit PCM WAV before transcription.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::error::{KigoError, Result};
use crate::types::AudioClip;

/// Sample rate of the canonical WAV handed to speech backends.
pub const CANONICAL_SAMPLE_RATE: u32 = 16_000;

/// Decoded linear PCM, interleaved f32 in [-1.0, 1.0].
#[derive(Debug, Clone)]
pub struct PcmAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl PcmAudio {
    /// Duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000) / (self.sample_rate as u64 * self.channels as u64)
    }

    /// Average interleaved channels down to one.
    pub fn downmix_mono(self) -> Self {
        if self.channels <= 1 {
            return self;
        }
        let channels = self.channels as usize;
        let mono = self
            .samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();
        Self {
            samples: mono,
            sample_rate: self.sample_rate,
            channels: 1,
        }
    }

    /// Linear-interpolation resample to `target_rate`. Mono input only;
    /// callers downmix first.
    pub fn resample(self, target_rate: u32) -> Self {
        debug_assert_eq!(self.channels, 1);
        if self.sample_rate == target_rate || self.samples.is_empty() {
            return Self {
                sample_rate: target_rate,
                ..self
            };
        }

        let ratio = target_rate as f64 / self.sample_rate as f64;
        let frame_count = self.samples.len();
        let new_frame_count = (frame_count as f64 * ratio) as usize;
        let mut resampled = Vec::with_capacity(new_frame_count);

        for i in 0..new_frame_count {
            let src_pos = i as f64 / ratio;
            let src_idx = src_pos as usize;
            let frac = (src_pos - src_idx as f64) as f32;

            let s0 = self.samples.get(src_idx).copied().unwrap_or(0.0);
            let s1 = self
                .samples
                .get((src_idx + 1).min(frame_count - 1))
                .copied()
                .unwrap_or(s0);
            resampled.push(s0 + (s1 - s0) * frac);
        }

        Self {
            samples: resampled,
            sample_rate: target_rate,
            channels: 1,
        }
    }
}

/// Decode a clip into interleaved f32 PCM.
///
/// Any probe or decoder failure is an [`KigoError::InvalidAudio`]: the clip
/// is terminally rejected and never reaches a speech backend.
pub fn decode(clip: &AudioClip) -> Result<PcmAudio> {
    let cursor = Cursor::new(clip.data.clone());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(clip.format.extension());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| KigoError::InvalidAudio(format!("Probe failed: {e}")))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| KigoError::InvalidAudio("No audio track found".to_string()))?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| KigoError::InvalidAudio("Unknown sample rate".to_string()))?;
    let channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .ok_or_else(|| KigoError::InvalidAudio("Unknown channel count".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| KigoError::InvalidAudio(format!("Decoder creation failed: {e}")))?;

    let mut samples: Vec<f32> = Vec::new();
    let track_id = track.id;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(KigoError::InvalidAudio(format!("Packet read error: {e}")));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(e) => {
                warn!("Decode error (skipping packet): {e}");
                continue;
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();
        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        // Only take the actual samples, not the entire buffer capacity.
        let actual_samples = num_frames * spec.channels.count();
        samples.extend(&sample_buf.samples()[..actual_samples]);
    }

    let pcm = PcmAudio {
        samples,
        sample_rate,
        channels,
    };
    debug!(
        format = clip.format.extension(),
        sample_rate,
        channels,
        duration_ms = pcm.duration_ms(),
        "Decoded clip"
    );
    Ok(pcm)
}

/// Render PCM as a 16-bit WAV byte buffer.
pub fn encode_wav(pcm: &PcmAudio) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: pcm.channels,
        sample_rate: pcm.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| KigoError::InvalidAudio(format!("WAV writer failed: {e}")))?;
        for &sample in &pcm.samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(value)
                .map_err(|e| KigoError::InvalidAudio(format!("WAV write failed: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| KigoError::InvalidAudio(format!("WAV finalize failed: {e}")))?;
    }
    Ok(cursor.into_inner())
}

/// Decode a clip and normalize it to the canonical encoding: 16 kHz mono
/// 16-bit PCM WAV.
pub fn canonical_wav(clip: &AudioClip) -> Result<Vec<u8>> {
    let pcm = decode(clip)?
        .downmix_mono()
        .resample(CANONICAL_SAMPLE_RATE);
    encode_wav(&pcm)
}
