//! Convenience re-exports for common use.

pub use crate::backend::{BackendResult, Status, SynthesisBackend};
pub use crate::engine::Orca;
pub use crate::error::{ErrorKind, OrcaError, Result};
pub use crate::stream::SynthesisStream;
pub use crate::types::{PhonemeAlignment, SynthesisOutput, SynthesisParams, WordAlignment};
