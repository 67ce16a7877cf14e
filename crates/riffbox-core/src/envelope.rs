//! Envelope follower for tracking signal amplitude.
//!
//! Used by the compressor stage for gain-reduction detection.

use libm::expf;

/// Envelope follower with separate attack and release times.
///
/// Peak detection with exponential smoothing:
/// `y[n] = coeff * y[n-1] + (1 - coeff) * |x[n]|`
/// where `coeff` switches between the attack and release constants
/// depending on whether the signal is rising or falling.
///
/// # Example
///
/// ```rust
/// use riffbox_core::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::with_times(48000.0, 20.0, 50.0);
/// let level = env.process(0.5);
/// assert!(level > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
    sample_rate: f32,
    attack_ms: f32,
    release_ms: f32,
}

impl EnvelopeFollower {
    /// Create a follower with default times (attack 10 ms, release 100 ms).
    pub fn new(sample_rate: f32) -> Self {
        Self::with_times(sample_rate, 10.0, 100.0)
    }

    /// Create a follower with explicit attack and release times.
    pub fn with_times(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut follower = Self {
            envelope: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate,
            attack_ms: attack_ms.max(0.1),
            release_ms: release_ms.max(1.0),
        };
        follower.recalculate_coefficients();
        follower
    }

    /// Update sample rate and recalculate the time constants.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Process a sample and return the current envelope level (always positive).
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let input_abs = input.abs();
        let coeff = if input_abs > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = coeff * self.envelope + (1.0 - coeff) * input_abs;
        self.envelope
    }

    /// Current envelope level without consuming new input.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Reset the envelope to zero.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }

    fn recalculate_coefficients(&mut self) {
        // coeff = exp(-1 / (time_ms * sample_rate / 1000))
        self.attack_coeff = expf(-1.0 / (self.attack_ms * self.sample_rate / 1000.0));
        self.release_coeff = expf(-1.0 / (self.release_ms * self.sample_rate / 1000.0));
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new(48000.0)
    }
}
