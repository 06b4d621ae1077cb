//! Orca TTS — streaming text-to-speech client
//!
//! A synchronous client for the Orca synthesis engine. The engine itself is
//! opaque, reached through the [`backend::SynthesisBackend`] seam; this
//! crate owns handle lifetime, per-instance call serialization, the
//! streaming session state machine, and translation of backend status codes
//! into a structured error taxonomy.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use orca_tts::prelude::*;
//!
//! # fn example(backend: Arc<dyn orca_tts::backend::SynthesisBackend>) -> orca_tts::error::Result<()> {
//! let orca = Orca::new(backend, "${ACCESS_KEY}", "orca_params.pv")?;
//! let params = SynthesisParams::default();
//!
//! let output = orca.synthesize("Hello!", &params)?;
//! assert!(!output.pcm.is_empty());
//!
//! let stream = orca.stream_open(&params)?;
//! let mut audio: Vec<i16> = Vec::new();
//! audio.extend(stream.synthesize("Incremental text ")?.unwrap_or_default());
//! audio.extend(stream.flush()?.unwrap_or_default());
//! stream.close();
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod engine;
pub mod error;
pub mod prelude;
pub mod stream;
pub mod types;
pub mod wav;

pub use engine::Orca;
pub use error::{ErrorKind, OrcaError};
pub use stream::SynthesisStream;
