//! Riffbox Amp - mode-switched guitar amp voicing engine
//!
//! Emulates a four-voicing headphone-amp gain architecture: a stereo signal
//! runs through a fixed cascade of filters, a feedback compressor, a hard
//! clipping drive stage, and a short echo. Which stages are audible — and
//! with what coefficients — depends on the selected [`VoicingMode`].
//!
//! # Architecture
//!
//! ```text
//!            ┌────────────── per block ──────────────┐
//! ModeSelector ──▶ resolve(mode, rate) ──▶ ChainConfig
//!                                             │
//!               ┌─────────────────────────────┴────┐
//!               ▼                                  ▼
//!        ChannelChain (L)                   ChannelChain (R)
//!  HPF → Comp → HiShelf → MidBP → Drive → LoShelf → Complex → Delay
//! ```
//!
//! - [`resolve`](voicing::resolve) is a pure function of `(mode, sample_rate)`
//!   producing every stage's coefficients plus a complete bypass assignment.
//! - Both [`ChannelChain`]s receive the same configuration each block and
//!   process their channel independently, so identical input produces
//!   bit-identical output on both sides.
//! - [`AmpEngine`] owns the chains and enforces the prepare/process protocol:
//!   no allocation, locking, or I/O happens inside
//!   [`process_block`](AmpEngine::process_block).
//!
//! # Mode selection
//!
//! [`ModeSelector`] is a cheaply clonable atomic handle. A UI or control
//! thread may call [`set`](ModeSelector::set) at any time; the engine loads
//! the value exactly once per block, so a change becomes audible on a block
//! boundary and no block ever straddles two modes.
//!
//! # Example
//!
//! ```rust
//! use riffbox_amp::{AmpEngine, VoicingMode};
//!
//! let mut engine = AmpEngine::new();
//! engine.prepare(48000.0, 512).unwrap();
//! engine.selector().set(VoicingMode::Edge);
//!
//! let mut left = vec![0.0f32; 512];
//! let mut right = vec![0.0f32; 512];
//! engine.process_block(&mut left, &mut right);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chain;
pub mod engine;
pub mod selector;
pub mod stage;
pub mod voicing;

pub use chain::ChannelChain;
pub use engine::{AmpEngine, PrepareError};
pub use selector::ModeSelector;
pub use voicing::{ChainConfig, StagePosition, Topology, VoicingMode, resolve};
