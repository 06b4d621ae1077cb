//! Streaming synthesis session.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::backend::StreamHandle;
use crate::engine::{lock, EngineInner};
use crate::error::{ErrorKind, OrcaError, Result};

/// An incremental text-to-audio session.
///
/// Opened with [`crate::Orca::stream_open`]. The caller supplies
/// consecutive chunks of a longer text in reading order; the backend
/// buffers internally and synthesizes a prefix once it judges there is
/// enough trailing context, so any given [`SynthesisStream::synthesize`]
/// call may return no audio. Concatenating the returned buffers in call
/// order, including the final [`SynthesisStream::flush`], reconstructs the
/// utterance in input order.
///
/// A custom pronunciation annotation (`{word|PRON}`) must be contained
/// within a single `synthesize` call; splitting one across calls is
/// undefined behavior.
///
/// Operations serialize against an internal lock. If a call fails with a
/// backend error, the session should be considered unusable: close it and
/// open a new one.
pub struct SynthesisStream {
    engine: Arc<EngineInner>,
    stream: Mutex<Option<StreamHandle>>,
}

impl SynthesisStream {
    pub(crate) fn new(engine: Arc<EngineInner>, stream: StreamHandle) -> Self {
        Self {
            engine,
            stream: Mutex::new(Some(stream)),
        }
    }

    /// Feed the next text chunk.
    ///
    /// Returns `Ok(None)` when the chunk was accepted but the backend is
    /// still buffering, or `Ok(Some(pcm))` with a non-empty buffer when a
    /// prefix of the accumulated text was synthesized. Fails with
    /// `InvalidState` after [`SynthesisStream::close`] or after the parent
    /// engine has been released.
    pub fn synthesize(&self, text: &str) -> Result<Option<Vec<i16>>> {
        let guard = lock(&self.stream);
        let stream = require(&guard)?;
        self.engine.handle()?;
        let pcm = self
            .engine
            .backend
            .stream_synthesize(stream, text)
            .map_err(|status| self.engine.translate(status, "stream synthesis failed"))?;
        debug!(chunk_chars = text.chars().count(), samples = pcm.len(), "stream chunk");
        Ok(non_empty(pcm))
    }

    /// Force synthesis of all remaining buffered text.
    ///
    /// Safe to call on an empty buffer (returns `Ok(None)`). The buffer is
    /// logically empty afterwards, but the session stays open until
    /// [`SynthesisStream::close`].
    pub fn flush(&self) -> Result<Option<Vec<i16>>> {
        let guard = lock(&self.stream);
        let stream = require(&guard)?;
        self.engine.handle()?;
        let pcm = self
            .engine
            .backend
            .stream_flush(stream)
            .map_err(|status| self.engine.translate(status, "stream flush failed"))?;
        debug!(samples = pcm.len(), "stream flushed");
        Ok(non_empty(pcm))
    }

    /// Release the backend-side stream.
    ///
    /// Idempotent; safe after [`SynthesisStream::flush`]. Subsequent
    /// `synthesize`/`flush` calls fail with `InvalidState`. Called
    /// automatically on drop if not called explicitly.
    pub fn close(&self) {
        if let Some(stream) = lock(&self.stream).take() {
            self.engine.backend.stream_close(stream);
            debug!("stream closed");
        }
    }
}

impl fmt::Debug for SynthesisStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesisStream")
            .field("closed", &lock(&self.stream).is_none())
            .finish_non_exhaustive()
    }
}

impl Drop for SynthesisStream {
    fn drop(&mut self) {
        self.close();
    }
}

fn require(guard: &Option<StreamHandle>) -> Result<StreamHandle> {
    guard.ok_or_else(|| OrcaError::new(ErrorKind::InvalidState, "stream has been closed"))
}

fn non_empty(pcm: Vec<i16>) -> Option<Vec<i16>> {
    if pcm.is_empty() {
        None
    } else {
        Some(pcm)
    }
}
