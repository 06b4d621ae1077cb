//! Word and phoneme timing metadata.

use serde::{Deserialize, Serialize};

/// Timing of one phoneme within a synthesized word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhonemeAlignment {
    /// Phoneme symbol.
    pub phoneme: String,
    /// Start offset in the audio, seconds.
    pub start_sec: f32,
    /// End offset in the audio, seconds.
    pub end_sec: f32,
}

/// Timing of one synthesized word, with its phoneme breakdown.
///
/// Within a result, consecutive words do not overlap and appear in reading
/// order; the same holds for the phonemes inside each word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordAlignment {
    /// The word as synthesized.
    pub word: String,
    /// Start offset in the audio, seconds.
    pub start_sec: f32,
    /// End offset in the audio, seconds.
    pub end_sec: f32,
    /// Phonemes making up the word, in order.
    pub phonemes: Vec<PhonemeAlignment>,
}
