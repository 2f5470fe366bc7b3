//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::io::Cursor;

/// Render a silent 16-bit PCM WAV entirely in memory.
pub fn silent_wav(sample_rate: u32, channels: u16, seconds: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
    let frames = (sample_rate as f32 * seconds) as u32;
    for _ in 0..frames {
        for _ in 0..channels {
            writer.write_sample(0i16).unwrap();
        }
    }
    writer.finalize().unwrap();
    cursor.into_inner()
}

/// An SSE body in the shape the hosted chat endpoint streams back.
pub fn sse_body(deltas: &[&str]) -> String {
    let mut body = String::new();
    for delta in deltas {
        let event = serde_json::json!({
            "choices": [{"delta": {"content": delta}}]
        });
        body.push_str(&format!("data: {event}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}
