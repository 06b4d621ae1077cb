//! WAV persistence for synthesized audio.

use std::path::Path;

use crate::error::{ErrorKind, OrcaError, Result};

/// Write single-channel 16-bit PCM samples to a WAV file.
///
/// Produces a conventional RIFF/WAVE file with a 44-byte header at the
/// given sample rate.
pub fn write_pcm(path: &Path, sample_rate: u32, pcm: &[i16]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).map_err(io_error)?;
    for &sample in pcm {
        writer.write_sample(sample).map_err(io_error)?;
    }
    writer.finalize().map_err(io_error)?;
    Ok(())
}

fn io_error(e: hound::Error) -> OrcaError {
    OrcaError::new(
        ErrorKind::IoError,
        format!("failed to write WAV output: {e}"),
    )
}
