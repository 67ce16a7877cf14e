//! Fixed-length delay line.
//!
//! A circular buffer with an integer delay, the building block for the amp
//! chain's short echo stage. Unlike a modulated delay there is no
//! interpolation: the delay length is fixed at construction and the read
//! head trails the write head by exactly that many samples.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Fixed-length circular delay line.
///
/// # Memory
///
/// The buffer is heap-allocated once at construction and never reallocates;
/// no allocation occurs during processing.
///
/// # Example
///
/// ```rust
/// use riffbox_core::FixedDelay;
///
/// let mut delay = FixedDelay::new(3);
/// assert_eq!(delay.tick(1.0), 0.0);
/// assert_eq!(delay.tick(0.0), 0.0);
/// assert_eq!(delay.tick(0.0), 0.0);
/// assert_eq!(delay.tick(0.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct FixedDelay {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl FixedDelay {
    /// Creates a delay line of exactly `delay_samples` samples.
    ///
    /// # Panics
    ///
    /// Panics if `delay_samples` is 0.
    pub fn new(delay_samples: usize) -> Self {
        assert!(delay_samples > 0, "delay length must be > 0");
        Self {
            buffer: vec![0.0; delay_samples],
            write_pos: 0,
        }
    }

    /// Creates a delay line from a sample rate and delay time in seconds.
    pub fn from_time(sample_rate: f32, seconds: f32) -> Self {
        let samples = (sample_rate * seconds) as usize;
        Self::new(samples.max(1))
    }

    /// Delay length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; the buffer length is fixed and nonzero.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Writes `input` and returns the sample written `len()` ticks ago.
    #[inline]
    pub fn tick(&mut self, input: f32) -> f32 {
        // Write head and read head coincide in a full-length circular buffer:
        // the slot about to be overwritten is the oldest sample.
        let delayed = self.buffer[self.write_pos];
        self.buffer[self.write_pos] = input;
        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
        delayed
    }

    /// Zeroes the buffer contents.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
