//! WAV file reading and writing.

use crate::Result;
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = reader.len() as u64; // total across all channels
    let num_frames = total_samples / spec.channels as u64;
    let duration_secs = num_frames as f64 / spec.sample_rate as f64;

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (e.g., 16, 24, 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// A pair of equal-length deinterleaved channel buffers.
#[derive(Debug, Clone, Default)]
pub struct StereoSamples {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Creates a stereo buffer from two channel vectors.
    ///
    /// # Panics
    /// Panics if the channels differ in length.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        assert_eq!(left.len(), right.len(), "channel length mismatch");
        Self { left, right }
    }

    /// Duplicates a mono buffer to both channels.
    pub fn from_mono(samples: Vec<f32>) -> Self {
        Self {
            left: samples.clone(),
            right: samples,
        }
    }

    /// Deinterleaves an `LRLR...` buffer.
    pub fn from_interleaved(samples: &[f32]) -> Self {
        let frames = samples.len() / 2;
        let mut left = Vec::with_capacity(frames);
        let mut right = Vec::with_capacity(frames);
        for pair in samples.chunks_exact(2) {
            left.push(pair[0]);
            right.push(pair[1]);
        }
        Self { left, right }
    }

    /// Number of sample frames.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Read a WAV file and return stereo samples along with the spec.
///
/// Mono files are expanded to stereo by duplicating to both channels.
/// Files with more than 2 channels use only the first two channels.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels as usize;

    let all_samples: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            // i64 so the shift stays in range for 32-bit PCM
            let max_val = (1i64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let stereo = match channels {
        1 => StereoSamples::from_mono(all_samples),
        2 => StereoSamples::from_interleaved(&all_samples),
        _ => {
            let samples_per_channel = all_samples.len() / channels;
            let mut left = Vec::with_capacity(samples_per_channel);
            let mut right = Vec::with_capacity(samples_per_channel);

            for chunk in all_samples.chunks(channels) {
                left.push(chunk[0]);
                right.push(chunk.get(1).copied().unwrap_or(chunk[0]));
            }

            StereoSamples::new(left, right)
        }
    };

    tracing::debug!(
        frames = stereo.len(),
        sample_rate = spec.sample_rate,
        channels,
        "loaded WAV file"
    );

    Ok((stereo, spec))
}

/// Write stereo samples to a WAV file, interleaved.
///
/// The channel count in `spec` is ignored; the output is always 2-channel.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoSamples,
    spec: WavSpec,
) -> Result<()> {
    let mut stereo_spec = spec;
    stereo_spec.channels = 2;

    let hound_spec = hound::WavSpec::from(stereo_spec);
    let mut writer = WavWriter::create(path, hound_spec)?;

    if spec.bits_per_sample == 32 {
        for (l, r) in samples.left.iter().zip(samples.right.iter()) {
            writer.write_sample(*l)?;
            writer.write_sample(*r)?;
        }
    } else {
        let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
        for (l, r) in samples.left.iter().zip(samples.right.iter()) {
            let int_l = (*l * max_val).clamp(-max_val, max_val - 1.0) as i32;
            let int_r = (*r * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_l)?;
            writer.write_sample(int_r)?;
        }
    }

    writer.finalize()?;
    Ok(())
}
