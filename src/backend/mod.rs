//! Backend seam: the trait boundary between this client and the opaque
//! synthesis engine.
//!
//! Everything behind [`SynthesisBackend`] is an external collaborator: the
//! acoustic model, the streaming buffering heuristic, and alignment
//! computation all live on the far side of this seam. The client owns
//! handle lifetime, call serialization, and status translation.

use std::path::Path;

use strum::{Display, EnumString};

use crate::types::{SynthesisParams, WordAlignment};

/// Opaque reference to an initialized engine instance.
///
/// Issued by [`SynthesisBackend::init`] and valid until passed to
/// [`SynthesisBackend::delete`]. The backend does not protect against
/// use-after-delete; the wrapper does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendHandle(pub u64);

/// Opaque reference to a backend-side synthesis stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle(pub u64);

/// Status codes returned by every backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    OutOfMemory,
    IoError,
    InvalidArgument,
    StopIteration,
    KeyError,
    InvalidState,
    RuntimeError,
    ActivationError,
    ActivationLimitReached,
    ActivationThrottled,
    ActivationRefused,
}

/// Result of a backend call: value or failing status.
pub type BackendResult<T> = std::result::Result<T, Status>;

/// The raw synthesis engine surface.
///
/// Implementations wrap the native library (or a WASM module, or a test
/// double). All methods are synchronous; the backend performs no internal
/// locking, so callers must serialize access per handle and per stream.
/// [`crate::Orca`] and [`crate::SynthesisStream`] do exactly that.
pub trait SynthesisBackend: Send + Sync {
    /// Initialize an engine instance from an access key and model resource.
    fn init(&self, access_key: &str, model_path: &Path) -> BackendResult<BackendHandle>;

    /// Tear down an engine instance. The handle is invalid afterwards.
    fn delete(&self, handle: BackendHandle);

    /// Backend version string.
    fn version(&self) -> String;

    /// Output sample rate for this engine instance, in Hz.
    fn sample_rate(&self, handle: BackendHandle) -> BackendResult<u32>;

    /// Maximum number of characters accepted by a single synthesis call.
    fn max_character_limit(&self, handle: BackendHandle) -> BackendResult<usize>;

    /// Characters the engine accepts, order-preserving. Characters outside
    /// this set are silently ignored during synthesis.
    fn valid_characters(&self, handle: BackendHandle) -> BackendResult<Vec<char>>;

    /// Synthesize a complete text into PCM samples plus word alignments.
    fn synthesize(
        &self,
        handle: BackendHandle,
        text: &str,
        params: &SynthesisParams,
    ) -> BackendResult<(Vec<i16>, Vec<WordAlignment>)>;

    /// Open a backend-side stream tied to `handle`.
    fn stream_open(
        &self,
        handle: BackendHandle,
        params: &SynthesisParams,
    ) -> BackendResult<StreamHandle>;

    /// Feed a text chunk to a stream. An empty return buffer means the text
    /// was accepted and buffered but nothing was synthesized yet.
    fn stream_synthesize(&self, stream: StreamHandle, text: &str) -> BackendResult<Vec<i16>>;

    /// Force synthesis of all buffered stream text.
    fn stream_flush(&self, stream: StreamHandle) -> BackendResult<Vec<i16>>;

    /// Tear down a backend-side stream.
    fn stream_close(&self, stream: StreamHandle);

    /// Drain the diagnostic message stack describing the most recent
    /// failure. Bounded (at most 8 entries) and consumed on read.
    fn error_stack(&self) -> Vec<String>;
}
