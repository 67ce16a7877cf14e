//! Lock-free voicing selection shared between a control thread and the
//! audio thread.

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
use core::sync::atomic::{AtomicU8, Ordering};
#[cfg(feature = "std")]
use std::sync::Arc;

use crate::voicing::VoicingMode;

/// Clonable handle to the engine's current voicing mode.
///
/// Internally a single atomic byte: [`set`](Self::set) never blocks and is
/// safe to call from any thread, including while the audio thread is inside
/// a block. The engine reads the value exactly once per block, so every
/// sample of a block is processed under one mode.
///
/// Relaxed ordering is sufficient here. The mode is a standalone value with
/// no other data published alongside it, and "takes effect within one block"
/// is the only delivery guarantee offered.
#[derive(Debug, Clone, Default)]
pub struct ModeSelector {
    mode: Arc<AtomicU8>,
}

impl ModeSelector {
    /// Creates a selector starting in [`VoicingMode::Distortion`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a voicing change. Takes effect at the next block boundary.
    pub fn set(&self, mode: VoicingMode) {
        self.mode.store(mode.index(), Ordering::Relaxed);
    }

    /// Reads the currently requested voicing.
    pub fn get(&self) -> VoicingMode {
        VoicingMode::from_index(self.mode.load(Ordering::Relaxed))
    }
}
