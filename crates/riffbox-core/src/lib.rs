//! Riffbox Core - DSP primitives for the amp voicing engine
//!
//! Foundational building blocks for real-time audio processing with zero
//! allocation in the audio path.
//!
//! # Contents
//!
//! - [`Biquad`] - Second-order IIR filter consuming [`FilterCoefficients`]
//!   value objects (RBJ cookbook + bilinear first-order designs)
//! - [`EnvelopeFollower`] - Amplitude envelope detection for dynamics
//! - [`FixedDelay`] - Fixed-length circular delay line
//! - Math helpers: [`db_to_linear`], [`linear_to_db`], [`hard_clip`], etc.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! riffbox-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: no allocations in processing paths; the delay
//!   line allocates once at construction
//! - **Value-type coefficients**: a [`Biquad`] exclusively owns its active
//!   [`FilterCoefficients`]; updates replace the whole value, so the
//!   process step never observes a half-written coefficient set

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod delay;
pub mod envelope;
pub mod math;

pub use biquad::{Biquad, FilterCoefficients};
pub use delay::FixedDelay;
pub use envelope::EnvelopeFollower;
pub use math::{db_to_linear, flush_denormal, hard_clip, linear_to_db, ms_to_samples};
