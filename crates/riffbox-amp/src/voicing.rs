//! Voicing modes and the per-block coefficient resolver.
//!
//! [`resolve`] is the heart of the engine: a pure function of
//! `(mode, sample_rate)` that produces every stage's coefficients and a
//! *complete* bypass assignment. It runs once per audio block. Coefficients
//! for stages that are bypassed in the current mode are still computed, so
//! a mode switch mid-stream is correct on the very next block with filter
//! history as the only transient.
//!
//! # Voicing table
//!
//! | Stage | Dist | Edge | Cln1 | Cln2 |
//! |---|---|---|---|---|
//! | High-pass pre | 10 kHz | 10 kHz | 5 kHz | 5 kHz |
//! | Compressor | on | on | on | on |
//! | High-shelf EQ | bypass | on | on | on |
//! | Mid band-pass | on | on | bypass | bypass |
//! | Low-shelf EQ | bypass | bypass | bypass | on |
//! | Drive (gain → shaper → gain) | on | on | bypass | bypass |
//! | Complex filter | on | on | on | bypass |
//! | Delay | on | on | on | on |

use riffbox_core::{FilterCoefficients, db_to_linear};

/// Amp voicing, the only externally selectable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoicingMode {
    /// High-gain distortion voicing.
    #[default]
    Distortion = 0,
    /// Edge-of-breakup voicing: distortion chain with the shelf EQ engaged.
    Edge = 1,
    /// First clean voicing: no drive, complex filter engaged.
    Clean1 = 2,
    /// Second clean voicing: no drive, low-shelf instead of complex filter.
    Clean2 = 3,
}

impl VoicingMode {
    /// All modes, in index order.
    pub const ALL: [Self; 4] = [Self::Distortion, Self::Edge, Self::Clean1, Self::Clean2];

    /// Converts a raw index to a mode.
    ///
    /// Out-of-range values fall back to `Distortion` — an unknown index
    /// coming from a control surface must never abort real-time processing.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Self::Edge,
            2 => Self::Clean1,
            3 => Self::Clean2,
            _ => Self::Distortion,
        }
    }

    /// The mode's stable index.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Short display label, as printed on the modeled hardware.
    pub fn label(self) -> &'static str {
        match self {
            Self::Distortion => "Dist",
            Self::Edge => "Edge",
            Self::Clean1 => "Cln1",
            Self::Clean2 => "Cln2",
        }
    }
}

/// Logical stage positions of the chain, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePosition {
    /// First-order high-pass pre-filter.
    HighPass = 0,
    /// Feedback compressor.
    Compressor = 1,
    /// High-shelf EQ.
    HighShelf = 2,
    /// Mid band-pass sub-chain.
    MidBandPass = 3,
    /// Drive pre-gain.
    PreGain = 4,
    /// Hard-clipping waveshaper.
    Waveshaper = 5,
    /// Drive post-gain.
    PostGain = 6,
    /// Low-shelf EQ.
    LowShelf = 7,
    /// Complex filter sub-chain.
    ComplexFilter = 8,
    /// Fixed short echo.
    Delay = 9,
}

impl StagePosition {
    /// Number of stage positions.
    pub const COUNT: usize = 10;

    /// All positions, in processing order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::HighPass,
        Self::Compressor,
        Self::HighShelf,
        Self::MidBandPass,
        Self::PreGain,
        Self::Waveshaper,
        Self::PostGain,
        Self::LowShelf,
        Self::ComplexFilter,
        Self::Delay,
    ];
}

/// Complete bypass assignment for one block: one flag per stage position.
///
/// A pure function of the mode; carries no state between blocks. Every
/// position is written every block, so no stage is ever left with a flag
/// from a previous mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    active: [bool; StagePosition::COUNT],
}

impl Topology {
    /// Builds the bypass assignment for `mode` from the voicing table.
    pub fn for_mode(mode: VoicingMode) -> Self {
        use VoicingMode::{Clean2, Distortion, Edge};

        let drive = matches!(mode, Distortion | Edge);
        let mut active = [true; StagePosition::COUNT];
        active[StagePosition::HighShelf as usize] = mode != Distortion;
        active[StagePosition::MidBandPass as usize] = drive;
        active[StagePosition::PreGain as usize] = drive;
        active[StagePosition::Waveshaper as usize] = drive;
        active[StagePosition::PostGain as usize] = drive;
        active[StagePosition::LowShelf as usize] = mode == Clean2;
        active[StagePosition::ComplexFilter as usize] = mode != Clean2;
        // HighPass, Compressor, Delay stay active in every voicing
        Self { active }
    }

    /// Whether the stage at `position` is active (not bypassed).
    #[inline]
    pub fn is_active(self, position: StagePosition) -> bool {
        self.active[position as usize]
    }
}

// Fixed design constants, derived from the modeled hardware. Frequencies in
// Hz, gains in dB.
const BRIGHT_HIGHPASS_HZ: f32 = 10_000.0;
const DARK_HIGHPASS_HZ: f32 = 5_000.0;

const HIGH_SHELF_HZ: f32 = 2_000.0;
const HIGH_SHELF_Q: f32 = 1.0;
const HIGH_SHELF_GAIN_DB: f32 = 3.5; // ~1.5x linear

const MID_HIGHPASS_HZ: f32 = 800.0;
const MID_LOWPASS_HZ: f32 = 5_000.0;
const MID_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;

const LOW_SHELF_HZ: f32 = 250.0;
const LOW_SHELF_Q: f32 = 1.0;
const LOW_SHELF_GAIN_DB: f32 = 4.0;

/// Drive stage gain: applied positive before the waveshaper, negated after.
const DRIVE_DB: f32 = 43.0;

const CF_LOW_SHELF_HZ: f32 = 500.0;
const CF_LOW_SHELF_Q: f32 = 1.0;
const CF_LOW_SHELF_GAIN_DB: f32 = 3.0;
const CF_PEAK_HZ: f32 = 1_200.0;
const CF_PEAK_Q: f32 = 0.7;
const CF_PEAK_GAIN_DB: f32 = 4.0;
const CF_LOWPASS_HZ: f32 = 6_000.0;
// Butterworth Q pair for a 4th-order low-pass from two cascaded biquads
const CF_LOWPASS_Q: [f32; 2] = [0.5412, 1.3066];

/// Delay stage length in seconds.
pub const DELAY_SECONDS: f32 = 0.04;
/// Delay stage wet-tap level.
pub const DELAY_WET: f32 = 0.5;

/// Everything both channel chains need for one block: coefficients for each
/// filter position plus the bypass topology.
///
/// A plain `Copy` value built on the stack each block — producing and
/// applying it allocates nothing.
#[derive(Debug, Clone, Copy)]
pub struct ChainConfig {
    /// First-order high-pass coefficients (cutoff depends on mode).
    pub highpass: FilterCoefficients,
    /// High-shelf EQ coefficients.
    pub high_shelf: FilterCoefficients,
    /// Mid band-pass: high-pass half.
    pub mid_highpass: FilterCoefficients,
    /// Mid band-pass: low-pass half.
    pub mid_lowpass: FilterCoefficients,
    /// Low-shelf EQ coefficients.
    pub low_shelf: FilterCoefficients,
    /// Complex filter: low-shelf member.
    pub cf_low_shelf: FilterCoefficients,
    /// Complex filter: peaking member.
    pub cf_peak: FilterCoefficients,
    /// Complex filter: cascaded low-pass members.
    pub cf_lowpass: [FilterCoefficients; 2],
    /// Drive pre-gain (linear).
    pub pre_gain: f32,
    /// Drive post-gain (linear).
    pub post_gain: f32,
    /// Complete bypass assignment.
    pub topology: Topology,
}

/// Resolves the full chain configuration for `mode` at `sample_rate`.
///
/// Pure and deterministic: equal inputs produce equal outputs. Coefficients
/// for bypassed stages are computed too, so they are valid the instant a
/// later block re-activates them.
pub fn resolve(mode: VoicingMode, sample_rate: f32) -> ChainConfig {
    let highpass_hz = match mode {
        VoicingMode::Distortion | VoicingMode::Edge => BRIGHT_HIGHPASS_HZ,
        VoicingMode::Clean1 | VoicingMode::Clean2 => DARK_HIGHPASS_HZ,
    };

    ChainConfig {
        highpass: FilterCoefficients::first_order_highpass(sample_rate, highpass_hz),
        high_shelf: FilterCoefficients::high_shelf(
            sample_rate,
            HIGH_SHELF_HZ,
            HIGH_SHELF_Q,
            HIGH_SHELF_GAIN_DB,
        ),
        mid_highpass: FilterCoefficients::highpass(sample_rate, MID_HIGHPASS_HZ, MID_Q),
        mid_lowpass: FilterCoefficients::lowpass(sample_rate, MID_LOWPASS_HZ, MID_Q),
        low_shelf: FilterCoefficients::low_shelf(
            sample_rate,
            LOW_SHELF_HZ,
            LOW_SHELF_Q,
            LOW_SHELF_GAIN_DB,
        ),
        cf_low_shelf: FilterCoefficients::low_shelf(
            sample_rate,
            CF_LOW_SHELF_HZ,
            CF_LOW_SHELF_Q,
            CF_LOW_SHELF_GAIN_DB,
        ),
        cf_peak: FilterCoefficients::peaking(sample_rate, CF_PEAK_HZ, CF_PEAK_Q, CF_PEAK_GAIN_DB),
        cf_lowpass: [
            FilterCoefficients::lowpass(sample_rate, CF_LOWPASS_HZ, CF_LOWPASS_Q[0]),
            FilterCoefficients::lowpass(sample_rate, CF_LOWPASS_HZ, CF_LOWPASS_Q[1]),
        ],
        pre_gain: db_to_linear(DRIVE_DB),
        post_gain: db_to_linear(-DRIVE_DB),
        topology: Topology::for_mode(mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_index_roundtrip() {
        for mode in VoicingMode::ALL {
            assert_eq!(VoicingMode::from_index(mode.index()), mode);
        }
    }

    #[test]
    fn out_of_range_index_defaults_to_distortion() {
        assert_eq!(VoicingMode::from_index(4), VoicingMode::Distortion);
        assert_eq!(VoicingMode::from_index(255), VoicingMode::Distortion);
    }

    #[test]
    fn topology_matches_voicing_table() {
        use StagePosition as P;
        use VoicingMode as M;

        let dist = Topology::for_mode(M::Distortion);
        assert!(dist.is_active(P::HighPass));
        assert!(dist.is_active(P::Compressor));
        assert!(!dist.is_active(P::HighShelf));
        assert!(dist.is_active(P::MidBandPass));
        assert!(dist.is_active(P::PreGain));
        assert!(dist.is_active(P::Waveshaper));
        assert!(dist.is_active(P::PostGain));
        assert!(!dist.is_active(P::LowShelf));
        assert!(dist.is_active(P::ComplexFilter));
        assert!(dist.is_active(P::Delay));

        let edge = Topology::for_mode(M::Edge);
        assert!(edge.is_active(P::HighShelf));
        assert!(edge.is_active(P::Waveshaper));

        let cln1 = Topology::for_mode(M::Clean1);
        assert!(cln1.is_active(P::HighShelf));
        assert!(!cln1.is_active(P::MidBandPass));
        assert!(!cln1.is_active(P::Waveshaper));
        assert!(!cln1.is_active(P::LowShelf));
        assert!(cln1.is_active(P::ComplexFilter));

        let cln2 = Topology::for_mode(M::Clean2);
        assert!(cln2.is_active(P::LowShelf));
        assert!(!cln2.is_active(P::ComplexFilter));
        assert!(!cln2.is_active(P::Waveshaper));
        assert!(cln2.is_active(P::Delay));
    }

    #[test]
    fn drive_trio_toggles_together() {
        use StagePosition as P;
        for mode in VoicingMode::ALL {
            let t = Topology::for_mode(mode);
            assert_eq!(t.is_active(P::PreGain), t.is_active(P::Waveshaper));
            assert_eq!(t.is_active(P::PostGain), t.is_active(P::Waveshaper));
        }
    }

    #[test]
    fn resolver_is_deterministic() {
        let a = resolve(VoicingMode::Edge, 48000.0);
        let b = resolve(VoicingMode::Edge, 48000.0);
        assert_eq!(a.highpass, b.highpass);
        assert_eq!(a.cf_peak, b.cf_peak);
        assert_eq!(a.topology, b.topology);
    }

    #[test]
    fn highpass_cutoff_follows_mode() {
        // Bright modes share one design, clean modes another
        let dist = resolve(VoicingMode::Distortion, 44100.0);
        let edge = resolve(VoicingMode::Edge, 44100.0);
        let cln1 = resolve(VoicingMode::Clean1, 44100.0);
        let cln2 = resolve(VoicingMode::Clean2, 44100.0);
        assert_eq!(dist.highpass, edge.highpass);
        assert_eq!(cln1.highpass, cln2.highpass);
        assert_ne!(dist.highpass, cln1.highpass);
    }

    #[test]
    fn drive_gains_are_inverse() {
        let cfg = resolve(VoicingMode::Distortion, 48000.0);
        assert!((cfg.pre_gain * cfg.post_gain - 1.0).abs() < 1e-3);
        assert!(cfg.pre_gain > 100.0); // +43 dB ≈ 141x
    }

    #[test]
    fn all_rates_produce_finite_coefficients() {
        for rate in [22050.0, 44100.0, 48000.0, 96000.0, 192000.0] {
            for mode in VoicingMode::ALL {
                let cfg = resolve(mode, rate);
                for c in [
                    cfg.highpass,
                    cfg.high_shelf,
                    cfg.mid_highpass,
                    cfg.mid_lowpass,
                    cfg.low_shelf,
                    cfg.cf_low_shelf,
                    cfg.cf_peak,
                    cfg.cf_lowpass[0],
                    cfg.cf_lowpass[1],
                ] {
                    assert!(c.b0.is_finite() && c.b1.is_finite() && c.b2.is_finite());
                    assert!(c.a1.is_finite() && c.a2.is_finite());
                }
            }
        }
    }
}
