//! Stereo block-processing engine.

use core::fmt;

use crate::chain::ChannelChain;
use crate::selector::ModeSelector;
use crate::voicing::{VoicingMode, resolve};

/// Errors from [`AmpEngine::prepare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareError {
    /// Sample rate was zero, negative, or non-finite.
    InvalidSampleRate,
    /// Maximum block size was zero.
    InvalidBlockSize,
}

impl fmt::Display for PrepareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSampleRate => write!(f, "sample rate must be finite and positive"),
            Self::InvalidBlockSize => write!(f, "maximum block size must be non-zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PrepareError {}

/// Per-session state built by [`AmpEngine::prepare`].
#[derive(Debug, Clone)]
struct Prepared {
    sample_rate: f32,
    max_block_size: usize,
    left: ChannelChain,
    right: ChannelChain,
}

/// Stereo amp engine enforcing the prepare/process protocol.
///
/// Call [`prepare`](Self::prepare) before the first block and again after
/// any sample rate or block size change; it may allocate, clears all
/// history, and is never real-time safe. [`process_block`](Self::process_block) is
/// the hot path: it allocates nothing, takes no locks, and performs no I/O.
///
/// The current voicing is read through a [`ModeSelector`] exactly once at
/// the top of each block, so each block runs under a single mode and
/// changes land on block boundaries.
#[derive(Debug, Clone, Default)]
pub struct AmpEngine {
    selector: ModeSelector,
    state: Option<Prepared>,
}

impl AmpEngine {
    /// Creates an unprepared engine in [`VoicingMode::Distortion`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A clonable handle for selecting the voicing from any thread.
    pub fn selector(&self) -> ModeSelector {
        self.selector.clone()
    }

    /// Sets the voicing directly. Equivalent to `self.selector().set(mode)`.
    pub fn set_mode(&self, mode: VoicingMode) {
        self.selector.set(mode);
    }

    /// The currently requested voicing.
    pub fn mode(&self) -> VoicingMode {
        self.selector.get()
    }

    /// Whether [`prepare`](Self::prepare) has been called.
    pub fn is_prepared(&self) -> bool {
        self.state.is_some()
    }

    /// Prepares for processing at `sample_rate` with blocks of at most
    /// `max_block_size` samples.
    ///
    /// All filter history, compressor state, and delay contents start
    /// cleared. Safe to call repeatedly; a rate change rebuilds both
    /// channel chains, a same-rate call clears them in place.
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> Result<(), PrepareError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(PrepareError::InvalidSampleRate);
        }
        if max_block_size == 0 {
            return Err(PrepareError::InvalidBlockSize);
        }
        let rate = sample_rate as f32;

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, max_block_size, "preparing amp engine");

        match self.state.as_mut() {
            Some(state) if state.sample_rate == rate => {
                state.max_block_size = max_block_size;
                state.left.reset();
                state.right.reset();
            }
            _ => {
                self.state = Some(Prepared {
                    sample_rate: rate,
                    max_block_size,
                    left: ChannelChain::new(rate),
                    right: ChannelChain::new(rate),
                });
            }
        }
        Ok(())
    }

    /// The prepared sample rate, if any.
    pub fn sample_rate(&self) -> Option<f32> {
        self.state.as_ref().map(|s| s.sample_rate)
    }

    /// The prepared maximum block size, if any.
    pub fn max_block_size(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.max_block_size)
    }

    /// Processes one stereo block in place.
    ///
    /// Both slices must be the same length, at most the prepared maximum
    /// block size. The engine must be prepared. These are caller contract
    /// violations checked by `debug_assert`; release builds process
    /// whatever they are given (an unprepared engine leaves the buffers
    /// untouched).
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len(), "channel length mismatch");

        let Some(state) = self.state.as_mut() else {
            debug_assert!(false, "process_block called before prepare");
            return;
        };
        debug_assert!(
            left.len() <= state.max_block_size,
            "block exceeds prepared maximum"
        );

        // One atomic load per block; the whole block runs under this mode.
        let mode = self.selector.get();
        let config = resolve(mode, state.sample_rate);
        state.left.apply(&config);
        state.right.apply(&config);
        state.left.process_block(left);
        state.right.process_block(right);
    }
}
