//! Audio file I/O for the Riffbox amp engine.
//!
//! The engine is stereo throughout, so this crate reads and writes WAV
//! files as deinterleaved stereo buffers: [`read_wav_stereo`] expands mono
//! input by duplication, [`write_wav_stereo`] interleaves on the way out.
//!
//! ```rust,ignore
//! use riffbox_io::{read_wav_stereo, write_wav_stereo};
//!
//! let (mut samples, spec) = read_wav_stereo("input.wav")?;
//! // ... process samples.left / samples.right in blocks ...
//! write_wav_stereo("output.wav", &samples, spec)?;
//! ```

mod wav;

pub use wav::{
    StereoSamples, WavFormat, WavInfo, WavSpec, read_wav_info, read_wav_stereo, write_wav_stereo,
};

/// Error types for audio file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio file operations.
pub type Result<T> = std::result::Result<T, Error>;
