//! List the voicing modes and which stages each one engages.

use clap::Args;
use riffbox_amp::{StagePosition, Topology, VoicingMode};

#[derive(Args)]
pub struct ModesArgs {
    /// Show the full stage table for each mode
    #[arg(short, long)]
    verbose: bool,
}

fn stage_name(position: StagePosition) -> &'static str {
    match position {
        StagePosition::HighPass => "high-pass",
        StagePosition::Compressor => "compressor",
        StagePosition::HighShelf => "high-shelf EQ",
        StagePosition::MidBandPass => "mid band-pass",
        StagePosition::PreGain => "drive pre-gain",
        StagePosition::Waveshaper => "waveshaper",
        StagePosition::PostGain => "drive post-gain",
        StagePosition::LowShelf => "low-shelf EQ",
        StagePosition::ComplexFilter => "complex filter",
        StagePosition::Delay => "echo",
    }
}

fn describe(mode: VoicingMode) -> &'static str {
    match mode {
        VoicingMode::Distortion => "high-gain distortion",
        VoicingMode::Edge => "edge-of-breakup drive with shelf EQ",
        VoicingMode::Clean1 => "clean with complex filter voicing",
        VoicingMode::Clean2 => "clean with low-shelf voicing",
    }
}

pub fn run(args: ModesArgs) -> anyhow::Result<()> {
    for mode in VoicingMode::ALL {
        println!("{}  ({})", mode.label(), describe(mode));
        if args.verbose {
            let topology = Topology::for_mode(mode);
            for position in StagePosition::ALL {
                let state = if topology.is_active(position) {
                    "on"
                } else {
                    "bypass"
                };
                println!("    {:16} {}", stage_name(position), state);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_has_a_description() {
        for mode in VoicingMode::ALL {
            assert!(!describe(mode).is_empty());
        }
    }

    #[test]
    fn every_stage_has_a_name() {
        for position in StagePosition::ALL {
            assert!(!stage_name(position).is_empty());
        }
    }
}
