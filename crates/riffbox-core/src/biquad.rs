//! Biquad (bi-quadratic) filter structure.
//!
//! Provides a generic second-order IIR filter driven by immutable
//! [`FilterCoefficients`] value objects. First-order designs are expressed
//! in the same structure with the second-order taps zeroed.
//!
//! Second-order coefficient calculation uses the RBJ Audio EQ Cookbook
//! formulas; first-order designs use the bilinear transform.

use core::f32::consts::PI;
use libm::{cosf, sinf, sqrtf, tanf};

use crate::math::db_to_linear;

/// Immutable coefficient set for a [`Biquad`].
///
/// Stored pre-normalized by `a0`, so the filter's inner loop never divides.
/// A `FilterCoefficients` is a plain `Copy` value: installing a new design
/// into a filter replaces the whole set at once, never field-by-field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCoefficients {
    /// Feedforward taps.
    pub b0: f32,
    /// Feedforward tap z^-1.
    pub b1: f32,
    /// Feedforward tap z^-2.
    pub b2: f32,
    /// Feedback tap z^-1 (normalized).
    pub a1: f32,
    /// Feedback tap z^-2 (normalized).
    pub a2: f32,
}

impl FilterCoefficients {
    /// Passthrough coefficients: `y[n] = x[n]`.
    pub fn identity() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    /// Build from raw taps, normalizing by `a0`.
    fn normalized(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }

    /// First-order high-pass via the bilinear transform.
    ///
    /// 6 dB/octave rolloff below `frequency`. Used for the bright pre-filter
    /// at the front of an amp chain.
    pub fn first_order_highpass(sample_rate: f32, frequency: f32) -> Self {
        let k = tanf(PI * frequency / sample_rate);
        let norm = 1.0 / (1.0 + k);
        Self {
            b0: norm,
            b1: -norm,
            b2: 0.0,
            a1: (k - 1.0) * norm,
            a2: 0.0,
        }
    }

    /// Second-order high-pass (RBJ cookbook).
    ///
    /// `q` of 0.707 gives a Butterworth response.
    pub fn highpass(sample_rate: f32, frequency: f32, q: f32) -> Self {
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = cosf(omega);
        let sin_omega = sinf(omega);
        let alpha = sin_omega / (2.0 * q);

        Self::normalized(
            (1.0 + cos_omega) / 2.0,
            -(1.0 + cos_omega),
            (1.0 + cos_omega) / 2.0,
            1.0 + alpha,
            -2.0 * cos_omega,
            1.0 - alpha,
        )
    }

    /// Second-order low-pass (RBJ cookbook).
    pub fn lowpass(sample_rate: f32, frequency: f32, q: f32) -> Self {
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = cosf(omega);
        let sin_omega = sinf(omega);
        let alpha = sin_omega / (2.0 * q);

        Self::normalized(
            (1.0 - cos_omega) / 2.0,
            1.0 - cos_omega,
            (1.0 - cos_omega) / 2.0,
            1.0 + alpha,
            -2.0 * cos_omega,
            1.0 - alpha,
        )
    }

    /// Low-shelf EQ (RBJ cookbook).
    ///
    /// Boosts or cuts everything below `frequency` by `gain_db`.
    pub fn low_shelf(sample_rate: f32, frequency: f32, q: f32, gain_db: f32) -> Self {
        let a = sqrtf(db_to_linear(gain_db));
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = cosf(omega);
        let sin_omega = sinf(omega);
        let alpha = sin_omega / (2.0 * q);
        let two_sqrt_a_alpha = 2.0 * sqrtf(a) * alpha;

        Self::normalized(
            a * ((a + 1.0) - (a - 1.0) * cos_omega + two_sqrt_a_alpha),
            2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega),
            a * ((a + 1.0) - (a - 1.0) * cos_omega - two_sqrt_a_alpha),
            (a + 1.0) + (a - 1.0) * cos_omega + two_sqrt_a_alpha,
            -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega),
            (a + 1.0) + (a - 1.0) * cos_omega - two_sqrt_a_alpha,
        )
    }

    /// High-shelf EQ (RBJ cookbook).
    ///
    /// Boosts or cuts everything above `frequency` by `gain_db`.
    pub fn high_shelf(sample_rate: f32, frequency: f32, q: f32, gain_db: f32) -> Self {
        let a = sqrtf(db_to_linear(gain_db));
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = cosf(omega);
        let sin_omega = sinf(omega);
        let alpha = sin_omega / (2.0 * q);
        let two_sqrt_a_alpha = 2.0 * sqrtf(a) * alpha;

        Self::normalized(
            a * ((a + 1.0) + (a - 1.0) * cos_omega + two_sqrt_a_alpha),
            -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega),
            a * ((a + 1.0) + (a - 1.0) * cos_omega - two_sqrt_a_alpha),
            (a + 1.0) - (a - 1.0) * cos_omega + two_sqrt_a_alpha,
            2.0 * ((a - 1.0) - (a + 1.0) * cos_omega),
            (a + 1.0) - (a - 1.0) * cos_omega - two_sqrt_a_alpha,
        )
    }

    /// Peaking EQ (RBJ cookbook).
    ///
    /// Boosts or cuts around `frequency` with bandwidth `frequency / q`.
    pub fn peaking(sample_rate: f32, frequency: f32, q: f32, gain_db: f32) -> Self {
        let a = sqrtf(db_to_linear(gain_db));
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = cosf(omega);
        let sin_omega = sinf(omega);
        let alpha = sin_omega / (2.0 * q);

        Self::normalized(
            1.0 + alpha * a,
            -2.0 * cos_omega,
            1.0 - alpha * a,
            1.0 + alpha / a,
            -2.0 * cos_omega,
            1.0 - alpha / a,
        )
    }
}

impl Default for FilterCoefficients {
    fn default() -> Self {
        Self::identity()
    }
}

/// Generic biquad filter: coefficients plus delay-line state.
///
/// Implements the Direct Form I difference equation:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// The filter exclusively owns its active [`FilterCoefficients`];
/// [`set_coefficients`](Biquad::set_coefficients) replaces the whole value.
/// Swapping coefficients does NOT reset the delay-line history — continuity
/// across a swap is intentional (the transient of re-filtering old history
/// with new taps is preferable to a click from zeroed state).
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: FilterCoefficients,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients and zero state.
    pub fn new() -> Self {
        Self {
            coeffs: FilterCoefficients::identity(),
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Replaces the active coefficient set wholesale.
    ///
    /// Delay-line history is preserved.
    #[inline]
    pub fn set_coefficients(&mut self, coeffs: FilterCoefficients) {
        self.coeffs = coeffs;
    }

    /// Returns the active coefficient set.
    pub fn coefficients(&self) -> FilterCoefficients {
        self.coeffs
    }

    /// Processes a single sample through the filter, advancing its state.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2;
        let output = crate::math::flush_denormal(output);

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clears the delay-line state without changing coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finite(c: FilterCoefficients) -> bool {
        c.b0.is_finite()
            && c.b1.is_finite()
            && c.b2.is_finite()
            && c.a1.is_finite()
            && c.a2.is_finite()
    }

    #[test]
    fn passthrough_by_default() {
        let mut biquad = Biquad::new();
        for i in 0..10 {
            let input = i as f32 * 0.1;
            let output = biquad.process(input);
            assert!((output - input).abs() < 0.0001);
        }
    }

    #[test]
    fn clear_zeroes_state() {
        let mut biquad = Biquad::new();
        biquad.set_coefficients(FilterCoefficients::lowpass(44100.0, 1000.0, 0.707));
        for _ in 0..10 {
            biquad.process(1.0);
        }
        biquad.clear();
        assert_eq!(biquad.x1, 0.0);
        assert_eq!(biquad.x2, 0.0);
        assert_eq!(biquad.y1, 0.0);
        assert_eq!(biquad.y2, 0.0);
    }

    #[test]
    fn swap_preserves_history() {
        let mut biquad = Biquad::new();
        biquad.set_coefficients(FilterCoefficients::lowpass(44100.0, 1000.0, 0.707));
        for _ in 0..10 {
            biquad.process(1.0);
        }
        let y1_before = biquad.y1;
        biquad.set_coefficients(FilterCoefficients::highpass(44100.0, 1000.0, 0.707));
        assert_eq!(biquad.y1, y1_before);
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut biquad = Biquad::new();
        biquad.set_coefficients(FilterCoefficients::lowpass(44100.0, 1000.0, 0.707));

        let mut output = 0.0;
        for _ in 0..1000 {
            output = biquad.process(1.0);
        }
        assert!((output - 1.0).abs() < 0.05);
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut biquad = Biquad::new();
        biquad.set_coefficients(FilterCoefficients::highpass(44100.0, 1000.0, 0.707));

        let mut output = 1.0;
        for _ in 0..4000 {
            output = biquad.process(1.0);
        }
        assert!(output.abs() < 0.01, "DC should be blocked, got {output}");
    }

    #[test]
    fn first_order_highpass_blocks_dc() {
        let mut biquad = Biquad::new();
        biquad.set_coefficients(FilterCoefficients::first_order_highpass(44100.0, 10000.0));

        let mut output = 1.0;
        for _ in 0..4000 {
            output = biquad.process(1.0);
        }
        assert!(output.abs() < 0.01, "DC should be blocked, got {output}");
    }

    #[test]
    fn shelf_designs_finite() {
        for gain_db in [-12.0, -3.5, 0.0, 3.5, 12.0] {
            assert!(finite(FilterCoefficients::low_shelf(44100.0, 250.0, 1.0, gain_db)));
            assert!(finite(FilterCoefficients::high_shelf(44100.0, 2000.0, 1.0, gain_db)));
            assert!(finite(FilterCoefficients::peaking(44100.0, 1200.0, 0.7, gain_db)));
        }
    }

    #[test]
    fn shelf_unity_at_zero_gain() {
        let mut biquad = Biquad::new();
        biquad.set_coefficients(FilterCoefficients::high_shelf(44100.0, 2000.0, 1.0, 0.0));

        let mut output = 0.0;
        for _ in 0..1000 {
            output = biquad.process(1.0);
        }
        assert!((output - 1.0).abs() < 0.05, "DC should pass at 0 dB, got {output}");
    }

    #[test]
    fn low_shelf_boosts_dc() {
        let mut biquad = Biquad::new();
        biquad.set_coefficients(FilterCoefficients::low_shelf(44100.0, 250.0, 1.0, 6.0));

        let mut output = 0.0;
        for _ in 0..4000 {
            output = biquad.process(1.0);
        }
        // +6 dB shelf should push DC toward ~2x
        assert!((output - 2.0).abs() < 0.1, "expected ~2.0, got {output}");
    }
}
