//! Engine wrapper: handle lifecycle and one-shot synthesis.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::backend::{BackendHandle, Status, SynthesisBackend};
use crate::error::{ErrorKind, OrcaError, Result};
use crate::stream::SynthesisStream;
use crate::types::{SynthesisOutput, SynthesisParams, WordAlignment};
use crate::wav;

/// Shared engine state: the backend handle plus metadata cached at creation.
///
/// One instance per engine; streams hold an `Arc` back-reference for
/// validity checks. The handle lives inside a mutex so that all calls
/// against it are serialized, and is taken out exactly once on release.
pub(crate) struct EngineInner {
    pub(crate) backend: Arc<dyn SynthesisBackend>,
    pub(crate) handle: Mutex<Option<BackendHandle>>,
    version: String,
    sample_rate: u32,
    max_character_limit: usize,
    valid_characters: Vec<char>,
}

impl EngineInner {
    /// Translate a failing backend status, draining the diagnostic stack.
    pub(crate) fn translate(&self, status: Status, message: &str) -> OrcaError {
        let stack = self.backend.error_stack();
        warn!(status = %status, stack_len = stack.len(), "backend call failed");
        OrcaError::with_stack(kind_for(status), message, stack)
    }

    pub(crate) fn handle(&self) -> Result<BackendHandle> {
        require(&lock(&self.handle))
    }
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.handle).take() {
            self.backend.delete(handle);
        }
    }
}

/// A synthesis engine instance.
///
/// Wraps an exclusively-owned backend handle together with the metadata the
/// backend reports at creation (`version`, `sample_rate`,
/// `max_character_limit`, `valid_characters`), cached per instance for the
/// handle's lifetime. All operations serialize against an internal lock;
/// separate `Orca` instances may be used concurrently.
///
/// The handle is released exactly once, either by [`Orca::release`] or on
/// drop. After an explicit release, every synthesis operation on the engine
/// or on any stream opened from it fails with [`ErrorKind::InvalidState`].
pub struct Orca {
    inner: Arc<EngineInner>,
}

impl Orca {
    /// Initialize an engine from an access key and a model resource path.
    ///
    /// Fails with `InvalidArgument` for an empty access key, `IoError` when
    /// the model path does not resolve to a readable model, one of the
    /// `Activation*` kinds when licensing checks fail, and `RuntimeError`
    /// for unclassified backend failures.
    pub fn new(
        backend: Arc<dyn SynthesisBackend>,
        access_key: &str,
        model_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();
        let handle = backend.init(access_key, model_path).map_err(|status| {
            let stack = backend.error_stack();
            warn!(status = %status, "engine initialization failed");
            OrcaError::with_stack(kind_for(status), "failed to initialize engine", stack)
        })?;

        let version = backend.version();
        let sample_rate = fetch(&backend, handle, "sample rate", |b, h| b.sample_rate(h))?;
        let max_character_limit =
            fetch(&backend, handle, "character limit", |b, h| {
                b.max_character_limit(h)
            })?;
        let valid_characters =
            fetch(&backend, handle, "valid characters", |b, h| {
                b.valid_characters(h)
            })?;

        debug!(%version, sample_rate, max_character_limit, "engine initialized");

        Ok(Self {
            inner: Arc::new(EngineInner {
                backend,
                handle: Mutex::new(Some(handle)),
                version,
                sample_rate,
                max_character_limit,
                valid_characters,
            }),
        })
    }

    /// Backend version string.
    pub fn version(&self) -> &str {
        &self.inner.version
    }

    /// Output sample rate in Hz; constant for this instance's lifetime.
    pub fn sample_rate(&self) -> u32 {
        self.inner.sample_rate
    }

    /// Maximum number of characters accepted by a single synthesis call.
    pub fn max_character_limit(&self) -> usize {
        self.inner.max_character_limit
    }

    /// Characters the engine accepts, in the backend's reported order.
    ///
    /// Characters outside this set are silently ignored by synthesis rather
    /// than rejected.
    pub fn valid_characters(&self) -> &[char] {
        &self.inner.valid_characters
    }

    /// Synthesize a complete text into PCM samples plus word alignments.
    ///
    /// Text may embed custom pronunciations of the form
    /// `{word|ARPABET PHONEMES}`; each annotation must be complete within
    /// the call. Text longer than [`Orca::max_character_limit`] is rejected
    /// with `InvalidArgument` before reaching the backend.
    pub fn synthesize(&self, text: &str, params: &SynthesisParams) -> Result<SynthesisOutput> {
        self.check_length(text)?;
        let guard = lock(&self.inner.handle);
        let handle = require(&guard)?;
        let (pcm, words) = self
            .inner
            .backend
            .synthesize(handle, text, params)
            .map_err(|status| self.inner.translate(status, "synthesis failed"))?;
        debug!(samples = pcm.len(), words = words.len(), "synthesized text");
        Ok(SynthesisOutput { pcm, words })
    }

    /// Synthesize a complete text directly to a WAV file.
    ///
    /// Writes single-channel 16-bit PCM at [`Orca::sample_rate`] and
    /// returns only the word alignments. Same input contract as
    /// [`Orca::synthesize`]; an unwritable output path fails with
    /// `IoError`.
    pub fn synthesize_to_file(
        &self,
        text: &str,
        output_path: impl AsRef<Path>,
        params: &SynthesisParams,
    ) -> Result<Vec<WordAlignment>> {
        let output = self.synthesize(text, params)?;
        wav::write_pcm(output_path.as_ref(), self.inner.sample_rate, &output.pcm)?;
        debug!(path = %output_path.as_ref().display(), samples = output.pcm.len(), "wrote WAV output");
        Ok(output.words)
    }

    /// Open a streaming synthesis session tied to this engine.
    ///
    /// Fails with `InvalidState` if the engine has been released.
    pub fn stream_open(&self, params: &SynthesisParams) -> Result<SynthesisStream> {
        let guard = lock(&self.inner.handle);
        let handle = require(&guard)?;
        let stream = self
            .inner
            .backend
            .stream_open(handle, params)
            .map_err(|status| self.inner.translate(status, "failed to open stream"))?;
        debug!("stream opened");
        Ok(SynthesisStream::new(Arc::clone(&self.inner), stream))
    }

    /// Release the backend handle.
    ///
    /// Idempotent from the caller's perspective: a second call is a no-op.
    /// Afterwards every synthesis operation on this engine, and on any
    /// stream opened from it, fails with `InvalidState`. Called
    /// automatically on drop if not called explicitly.
    pub fn release(&self) {
        if let Some(handle) = lock(&self.inner.handle).take() {
            self.inner.backend.delete(handle);
            debug!("engine released");
        }
    }

    fn check_length(&self, text: &str) -> Result<()> {
        let len = text.chars().count();
        if len > self.inner.max_character_limit {
            return Err(OrcaError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "text length {len} exceeds the character limit of {}",
                    self.inner.max_character_limit
                ),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Orca {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orca")
            .field("version", &self.inner.version)
            .field("sample_rate", &self.inner.sample_rate)
            .field("max_character_limit", &self.inner.max_character_limit)
            .field("released", &lock(&self.inner.handle).is_none())
            .finish_non_exhaustive()
    }
}

fn fetch<T>(
    backend: &Arc<dyn SynthesisBackend>,
    handle: BackendHandle,
    what: &str,
    op: impl FnOnce(&dyn SynthesisBackend, BackendHandle) -> std::result::Result<T, Status>,
) -> Result<T> {
    op(backend.as_ref(), handle).map_err(|status| {
        let stack = backend.error_stack();
        backend.delete(handle);
        OrcaError::with_stack(kind_for(status), format!("failed to read {what}"), stack)
    })
}

fn require(guard: &Option<BackendHandle>) -> Result<BackendHandle> {
    guard.ok_or_else(|| OrcaError::new(ErrorKind::InvalidState, "engine has been released"))
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Map a failing backend status onto the client error taxonomy.
pub(crate) fn kind_for(status: Status) -> ErrorKind {
    match status {
        Status::OutOfMemory => ErrorKind::OutOfMemory,
        Status::IoError => ErrorKind::IoError,
        Status::InvalidArgument => ErrorKind::InvalidArgument,
        Status::StopIteration => ErrorKind::StopIteration,
        Status::KeyError => ErrorKind::KeyError,
        Status::InvalidState => ErrorKind::InvalidState,
        Status::ActivationError => ErrorKind::ActivationError,
        Status::ActivationLimitReached => ErrorKind::ActivationLimitReached,
        Status::ActivationThrottled => ErrorKind::ActivationThrottled,
        Status::ActivationRefused => ErrorKind::ActivationRefused,
        Status::Success | Status::RuntimeError => ErrorKind::RuntimeError,
    }
}
