//! Synthesis output.

use serde::{Deserialize, Serialize};

use super::alignment::WordAlignment;

/// Result of a one-shot synthesis call.
///
/// `pcm` holds raw single-channel 16-bit samples at the engine's sample
/// rate; no framing or header. The caller owns the result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SynthesisOutput {
    /// Raw PCM samples.
    pub pcm: Vec<i16>,
    /// Word-level timing metadata for the synthesized audio.
    pub words: Vec<WordAlignment>,
}

impl SynthesisOutput {
    /// Duration of the audio in seconds at the given sample rate.
    pub fn duration_secs(&self, sample_rate: u32) -> f64 {
        self.pcm.len() as f64 / sample_rate as f64
    }
}
