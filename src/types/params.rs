//! Synthesis parameters.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Lowest speech rate the backend accepts.
pub const MIN_SPEECH_RATE: f32 = 0.7;
/// Highest speech rate the backend accepts.
pub const MAX_SPEECH_RATE: f32 = 1.3;

/// Settings controlling a synthesis call or stream.
///
/// Immutable once constructed. `None` means "use the backend default".
/// Out-of-range values are rejected by the backend at the point of use with
/// an invalid-argument error, not eagerly by the client.
///
/// Example:
/// ```
/// use orca_tts::types::SynthesisParams;
///
/// let params = SynthesisParams::builder()
///     .speech_rate(0.9)
///     .random_state(42)
///     .build();
/// assert_eq!(params.speech_rate, Some(0.9));
/// ```
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct SynthesisParams {
    /// Speech rate in `[0.7, 1.3]`; lower is slower.
    pub speech_rate: Option<f32>,
    /// Seed for the backend's sampling; fixes output across calls.
    pub random_state: Option<i64>,
}
