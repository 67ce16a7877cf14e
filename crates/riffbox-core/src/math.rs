//! Mathematical utility functions for DSP.
//!
//! Allocation-free helpers suitable for `no_std`, shared by the filter,
//! dynamics, and waveshaping code.

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use riffbox_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below zero are floored to avoid `-inf`.
///
/// # Example
/// ```rust
/// use riffbox_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Hard clip to ±threshold range.
///
/// Abrupt limiting that creates flat tops on waveforms, producing harsh
/// odd harmonics. The character of an overdriven transistor gain stage.
#[inline]
pub fn hard_clip(x: f32, threshold: f32) -> f32 {
    x.clamp(-threshold, threshold)
}

/// Flush denormal floats to zero.
///
/// Denormals cause orders-of-magnitude slowdowns on most CPUs. IIR filter
/// feedback paths decay into the denormal range when fed silence, so
/// recursive state should pass through this.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Convert milliseconds to samples at the given sample rate.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}
