//! Processing stages of the amp chain.
//!
//! Every stage carries its own bypass flag. Bypass is *identity
//! pass-through*: a bypassed stage returns its input unchanged and leaves
//! its internal state untouched, so re-engaging it resumes from the history
//! it had when it was switched out. Stages are never structurally removed
//! from the chain — the bypass flag is the only on/off mechanism, and the
//! resolver reassigns every flag every block.
//!
//! Filter history deliberately survives coefficient swaps and bypass
//! toggles; it is cleared only by `reset` (called on engine prepare).

use riffbox_core::{Biquad, EnvelopeFollower, FilterCoefficients, FixedDelay, db_to_linear, hard_clip, linear_to_db};

/// A single IIR filter position in the chain.
#[derive(Debug, Clone)]
pub struct FilterStage {
    filter: Biquad,
    bypassed: bool,
}

impl FilterStage {
    /// Creates a filter stage with passthrough coefficients, active.
    pub fn new() -> Self {
        Self {
            filter: Biquad::new(),
            bypassed: false,
        }
    }

    /// Replaces the active coefficient set wholesale. History is preserved.
    #[inline]
    pub fn set_coefficients(&mut self, coeffs: FilterCoefficients) {
        self.filter.set_coefficients(coeffs);
    }

    /// Sets the bypass flag.
    #[inline]
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    /// Whether the stage is currently bypassed.
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Processes one sample; identity when bypassed.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if self.bypassed {
            return input;
        }
        self.filter.process(input)
    }

    /// Clears filter history.
    pub fn reset(&mut self) {
        self.filter.clear();
    }
}

impl Default for FilterStage {
    fn default() -> Self {
        Self::new()
    }
}

/// Feedback compressor with fixed program-dependent settings.
///
/// The envelope detector reads the compressor's own *output* (feedback
/// topology), which gives the smooth, self-correcting response of early
/// hardware levelers. Parameters are fixed by design: 20:1 ratio, 20 ms
/// attack, 50 ms release, −35 dB threshold. Modes may only bypass it.
#[derive(Debug, Clone)]
pub struct CompressorStage {
    follower: EnvelopeFollower,
    last_output: f32,
    bypassed: bool,
}

impl CompressorStage {
    /// Compression ratio (fixed).
    pub const RATIO: f32 = 20.0;
    /// Attack time in ms (fixed).
    pub const ATTACK_MS: f32 = 20.0;
    /// Release time in ms (fixed).
    pub const RELEASE_MS: f32 = 50.0;
    /// Threshold in dB (fixed).
    pub const THRESHOLD_DB: f32 = -35.0;

    /// Creates the compressor at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            follower: EnvelopeFollower::with_times(sample_rate, Self::ATTACK_MS, Self::RELEASE_MS),
            last_output: 0.0,
            bypassed: false,
        }
    }

    /// Sets the bypass flag.
    #[inline]
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    /// Processes one sample; identity when bypassed.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if self.bypassed {
            return input;
        }
        let envelope = self.follower.process(self.last_output);
        let envelope_db = linear_to_db(envelope);
        let overshoot = envelope_db - Self::THRESHOLD_DB;
        let reduction_db = if overshoot > 0.0 {
            overshoot * (1.0 - 1.0 / Self::RATIO)
        } else {
            0.0
        };
        let output = input * db_to_linear(-reduction_db);
        self.last_output = output;
        output
    }

    /// Clears the envelope and feedback state.
    pub fn reset(&mut self) {
        self.follower.reset();
        self.last_output = 0.0;
    }
}

/// Stateless scalar gain.
#[derive(Debug, Clone)]
pub struct GainStage {
    gain: f32,
    bypassed: bool,
}

impl GainStage {
    /// Creates a unity gain stage.
    pub fn new() -> Self {
        Self {
            gain: 1.0,
            bypassed: false,
        }
    }

    /// Sets the linear gain factor.
    #[inline]
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    /// Sets the bypass flag.
    #[inline]
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    /// Processes one sample; identity when bypassed.
    #[inline]
    pub fn process(&self, input: f32) -> f32 {
        if self.bypassed { input } else { input * self.gain }
    }
}

impl Default for GainStage {
    fn default() -> Self {
        Self::new()
    }
}

/// Hard-limiting waveshaper modeling an overdriven transistor gain stage.
///
/// The transfer function applies a fixed ×35 drive and clips the result to
/// ±1.4. Flanked by a +43 dB pre-gain and a −43 dB post-gain in the chain,
/// this produces dense odd-harmonic distortion at roughly unity level.
#[derive(Debug, Clone, Default)]
pub struct WaveshaperStage {
    bypassed: bool,
}

impl WaveshaperStage {
    /// Multiplicative drive applied before the clip.
    pub const DRIVE: f32 = 35.0;
    /// Clip ceiling (absolute value).
    pub const LIMIT: f32 = 1.4;

    /// Creates the waveshaper, active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bypass flag.
    #[inline]
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    /// Processes one sample; identity when bypassed.
    #[inline]
    pub fn process(&self, input: f32) -> f32 {
        if self.bypassed {
            return input;
        }
        hard_clip(input * Self::DRIVE, Self::LIMIT)
    }
}

/// Fixed short echo at the tail of the chain.
///
/// A single non-feedback tap: `y = x + wet * x[n - D]`. With no feedback
/// path, silence at the input flushes to silence at the output after `D`
/// samples.
#[derive(Debug, Clone)]
pub struct DelayStage {
    line: FixedDelay,
    wet: f32,
    bypassed: bool,
}

impl DelayStage {
    /// Creates a delay stage of `seconds` at `sample_rate`, with the given
    /// wet-tap level.
    pub fn new(sample_rate: f32, seconds: f32, wet: f32) -> Self {
        Self {
            line: FixedDelay::from_time(sample_rate, seconds),
            wet,
            bypassed: false,
        }
    }

    /// Delay length in samples.
    pub fn delay_samples(&self) -> usize {
        self.line.len()
    }

    /// Sets the bypass flag.
    #[inline]
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    /// Processes one sample; identity when bypassed.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if self.bypassed {
            return input;
        }
        let delayed = self.line.tick(input);
        input + self.wet * delayed
    }

    /// Flushes the delay buffer.
    pub fn reset(&mut self) {
        self.line.clear();
    }
}

/// Mid band-pass sub-chain: second-order high-pass into second-order
/// low-pass, bypass-toggled as a unit.
#[derive(Debug, Clone)]
pub struct MidBandPass {
    highpass: Biquad,
    lowpass: Biquad,
    bypassed: bool,
}

impl MidBandPass {
    /// Creates the sub-chain with passthrough coefficients, active.
    pub fn new() -> Self {
        Self {
            highpass: Biquad::new(),
            lowpass: Biquad::new(),
            bypassed: false,
        }
    }

    /// Replaces both member filters' coefficients wholesale.
    #[inline]
    pub fn set_coefficients(&mut self, highpass: FilterCoefficients, lowpass: FilterCoefficients) {
        self.highpass.set_coefficients(highpass);
        self.lowpass.set_coefficients(lowpass);
    }

    /// Sets the bypass flag for the whole sub-chain.
    #[inline]
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    /// Processes one sample; identity when bypassed.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if self.bypassed {
            return input;
        }
        let mid = self.highpass.process(input);
        self.lowpass.process(mid)
    }

    /// Clears both member filters' history.
    pub fn reset(&mut self) {
        self.highpass.clear();
        self.lowpass.clear();
    }
}

impl Default for MidBandPass {
    fn default() -> Self {
        Self::new()
    }
}

/// Complex filter sub-chain: low-shelf → peak → 4th-order low-pass (two
/// cascaded Butterworth biquads), bypass-toggled as a unit.
#[derive(Debug, Clone)]
pub struct ComplexFilter {
    low_shelf: Biquad,
    peak: Biquad,
    lowpass: [Biquad; 2],
    bypassed: bool,
}

impl ComplexFilter {
    /// Creates the sub-chain with passthrough coefficients, active.
    pub fn new() -> Self {
        Self {
            low_shelf: Biquad::new(),
            peak: Biquad::new(),
            lowpass: [Biquad::new(), Biquad::new()],
            bypassed: false,
        }
    }

    /// Replaces all four member filters' coefficients wholesale.
    pub fn set_coefficients(
        &mut self,
        low_shelf: FilterCoefficients,
        peak: FilterCoefficients,
        lowpass: [FilterCoefficients; 2],
    ) {
        self.low_shelf.set_coefficients(low_shelf);
        self.peak.set_coefficients(peak);
        self.lowpass[0].set_coefficients(lowpass[0]);
        self.lowpass[1].set_coefficients(lowpass[1]);
    }

    /// Sets the bypass flag for the whole sub-chain.
    #[inline]
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    /// Processes one sample; identity when bypassed.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if self.bypassed {
            return input;
        }
        let mut x = self.low_shelf.process(input);
        x = self.peak.process(x);
        x = self.lowpass[0].process(x);
        self.lowpass[1].process(x)
    }

    /// Clears all member filters' history.
    pub fn reset(&mut self) {
        self.low_shelf.clear();
        self.peak.clear();
        self.lowpass[0].clear();
        self.lowpass[1].clear();
    }
}

impl Default for ComplexFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riffbox_core::FilterCoefficients;

    #[test]
    fn bypassed_filter_is_identity() {
        let mut stage = FilterStage::new();
        stage.set_coefficients(FilterCoefficients::lowpass(48000.0, 1000.0, 0.707));
        stage.set_bypassed(true);
        for i in 0..32 {
            let x = (i as f32 * 0.37).sin();
            assert_eq!(stage.process(x), x);
        }
    }

    #[test]
    fn bypassed_filter_freezes_state() {
        let mut active = FilterStage::new();
        let coeffs = FilterCoefficients::lowpass(48000.0, 1000.0, 0.707);
        active.set_coefficients(coeffs);

        let mut toggled = active.clone();
        // Run the active one; leave the toggled one bypassed for a while
        toggled.set_bypassed(true);
        for _ in 0..100 {
            active.process(1.0);
            toggled.process(1.0);
        }
        toggled.set_bypassed(false);
        // The toggled stage resumes from zero history, not the active one's
        let a = active.process(1.0);
        let t = toggled.process(1.0);
        assert!((a - t).abs() > 1e-6, "bypassed stage should not have advanced");
    }

    #[test]
    fn compressor_reduces_loud_signal() {
        let mut comp = CompressorStage::new(44100.0);
        let mut output = 0.0;
        for _ in 0..44100 {
            output = comp.process(0.5);
        }
        // 0.5 is ~ -6 dBFS, 29 dB over threshold; 20:1 slams it down
        assert!(output < 0.12, "expected heavy reduction, got {output}");
        assert!(output > 0.0);
    }

    #[test]
    fn compressor_passes_quiet_signal() {
        let mut comp = CompressorStage::new(44100.0);
        // -60 dBFS, far below threshold
        let mut output = 0.0;
        for _ in 0..4410 {
            output = comp.process(0.001);
        }
        assert!((output - 0.001).abs() < 1e-4, "below threshold should pass, got {output}");
    }

    #[test]
    fn waveshaper_bounds_output() {
        let shaper = WaveshaperStage::new();
        for x in [-100.0, -1.0, -0.01, 0.0, 0.01, 1.0, 100.0] {
            let y = shaper.process(x);
            assert!(y.abs() <= WaveshaperStage::LIMIT);
        }
        // Small input passes with drive applied, unclipped
        assert!((shaper.process(0.01) - 0.35).abs() < 1e-6);
    }

    #[test]
    fn gain_scales() {
        let mut gain = GainStage::new();
        gain.set_gain(2.0);
        assert_eq!(gain.process(0.25), 0.5);
        gain.set_bypassed(true);
        assert_eq!(gain.process(0.25), 0.25);
    }

    #[test]
    fn delay_mixes_dry_and_tap() {
        let mut delay = DelayStage::new(1000.0, 0.004, 0.5);
        assert_eq!(delay.delay_samples(), 4);
        assert_eq!(delay.process(1.0), 1.0); // dry only, tap still empty
        for _ in 0..3 {
            assert_eq!(delay.process(0.0), 0.0);
        }
        assert_eq!(delay.process(0.0), 0.5); // tap arrives
        assert_eq!(delay.process(0.0), 0.0); // flushed
    }

    #[test]
    fn mid_band_pass_attenuates_extremes() {
        let sr = 48000.0;
        let mut mbp = MidBandPass::new();
        mbp.set_coefficients(
            FilterCoefficients::highpass(sr, 800.0, 0.707),
            FilterCoefficients::lowpass(sr, 5000.0, 0.707),
        );
        // DC should be blocked by the high-pass half
        let mut out = 1.0;
        for _ in 0..48000 {
            out = mbp.process(1.0);
        }
        assert!(out.abs() < 0.01, "DC should be blocked, got {out}");
    }

    #[test]
    fn complex_filter_finite_on_impulse() {
        let sr = 44100.0;
        let mut cf = ComplexFilter::new();
        cf.set_coefficients(
            FilterCoefficients::low_shelf(sr, 500.0, 1.0, 3.0),
            FilterCoefficients::peaking(sr, 1200.0, 0.7, 4.0),
            [
                FilterCoefficients::lowpass(sr, 6000.0, 0.5412),
                FilterCoefficients::lowpass(sr, 6000.0, 1.3066),
            ],
        );
        let mut energy = 0.0;
        let mut x = 1.0;
        for _ in 0..4096 {
            let y = cf.process(x);
            assert!(y.is_finite());
            energy += y * y;
            x = 0.0;
        }
        assert!(energy > 0.0);
    }
}
