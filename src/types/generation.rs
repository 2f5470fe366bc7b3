//! Decoding settings and mode selection.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Sampling settings passed through to the generation backend.
///
/// All fields are optional and forwarded unvalidated; absent fields are
/// omitted from the request body, letting the backend apply its own
/// defaults. No clamping is performed here.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct DecodingParams {
    /// Upper bound on generated tokens.
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
}

/// Dispatch choice between a hosted inference service and an in-process
/// model.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GenerationMode {
    /// Hosted chat-completion endpoint, streamed over SSE.
    Remote,
    /// Locally resident continuation model, single-shot.
    Local,
}
