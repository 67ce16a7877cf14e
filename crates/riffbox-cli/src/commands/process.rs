//! File-based amp processing command.

use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use riffbox_amp::{AmpEngine, VoicingMode};
use riffbox_io::{WavSpec, read_wav_stereo, write_wav_stereo};
use std::path::PathBuf;

/// Voicing selection as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// High-gain distortion voicing
    Dist,
    /// Edge-of-breakup voicing
    Edge,
    /// First clean voicing
    Cln1,
    /// Second clean voicing
    Cln2,
}

impl From<ModeArg> for VoicingMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Dist => VoicingMode::Distortion,
            ModeArg::Edge => VoicingMode::Edge,
            ModeArg::Cln1 => VoicingMode::Clean1,
            ModeArg::Cln2 => VoicingMode::Clean2,
        }
    }
}

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Voicing mode
    #[arg(short, long, value_enum, default_value_t = ModeArg::Dist)]
    mode: ModeArg,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!("Unsupported bit depth {} (expected 16, 24, or 32)", args.bit_depth);
    }

    println!("Reading {}...", args.input.display());
    let (mut samples, spec) = read_wav_stereo(&args.input)?;
    let sample_rate = spec.sample_rate as f32;

    println!(
        "  {} frames, {} Hz, {:.2}s",
        samples.len(),
        spec.sample_rate,
        samples.len() as f32 / sample_rate
    );

    let mode = VoicingMode::from(args.mode);
    let mut engine = AmpEngine::new();
    engine.prepare(f64::from(spec.sample_rate), args.block_size)?;
    engine.set_mode(mode);

    println!("Processing in {} mode...", mode.label());

    let pb = ProgressBar::new(samples.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let total = samples.len();
    for (left, right) in samples
        .left
        .chunks_mut(args.block_size)
        .zip(samples.right.chunks_mut(args.block_size))
    {
        engine.process_block(left, right);
        pb.inc(left.len() as u64);
    }
    pb.finish_with_message("done");

    let out_spec = WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    write_wav_stereo(&args.output, &samples, out_spec)?;
    println!("Wrote {} ({} frames)", args.output.display(), total);

    Ok(())
}
