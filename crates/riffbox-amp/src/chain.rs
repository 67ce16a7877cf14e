//! One channel's full stage cascade.

use crate::stage::{
    ComplexFilter, CompressorStage, DelayStage, FilterStage, GainStage, MidBandPass,
    WaveshaperStage,
};
use crate::voicing::{ChainConfig, DELAY_SECONDS, DELAY_WET, StagePosition};

/// The fixed mono cascade applied to one channel.
///
/// Stage order never changes; voicing is expressed purely through bypass
/// flags and coefficients delivered in a [`ChainConfig`]. Two instances
/// given the same input and configuration produce bit-identical output, so
/// the stereo engine simply runs one per channel.
#[derive(Debug, Clone)]
pub struct ChannelChain {
    highpass: FilterStage,
    compressor: CompressorStage,
    high_shelf: FilterStage,
    mid_bandpass: MidBandPass,
    pre_gain: GainStage,
    waveshaper: WaveshaperStage,
    post_gain: GainStage,
    low_shelf: FilterStage,
    complex_filter: ComplexFilter,
    delay: DelayStage,
}

impl ChannelChain {
    /// Builds a chain for `sample_rate`. Allocates the delay buffer; call
    /// only from a prepare path, never mid-stream.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            highpass: FilterStage::new(),
            compressor: CompressorStage::new(sample_rate),
            high_shelf: FilterStage::new(),
            mid_bandpass: MidBandPass::new(),
            pre_gain: GainStage::new(),
            waveshaper: WaveshaperStage::new(),
            post_gain: GainStage::new(),
            low_shelf: FilterStage::new(),
            complex_filter: ComplexFilter::new(),
            delay: DelayStage::new(sample_rate, DELAY_SECONDS, DELAY_WET),
        }
    }

    /// Applies a resolved configuration: every coefficient set and every
    /// bypass flag, unconditionally. No allocation.
    pub fn apply(&mut self, config: &ChainConfig) {
        use StagePosition as P;

        self.highpass.set_coefficients(config.highpass);
        self.high_shelf.set_coefficients(config.high_shelf);
        self.mid_bandpass
            .set_coefficients(config.mid_highpass, config.mid_lowpass);
        self.pre_gain.set_gain(config.pre_gain);
        self.post_gain.set_gain(config.post_gain);
        self.low_shelf.set_coefficients(config.low_shelf);
        self.complex_filter
            .set_coefficients(config.cf_low_shelf, config.cf_peak, config.cf_lowpass);

        let t = config.topology;
        self.highpass.set_bypassed(!t.is_active(P::HighPass));
        self.compressor.set_bypassed(!t.is_active(P::Compressor));
        self.high_shelf.set_bypassed(!t.is_active(P::HighShelf));
        self.mid_bandpass.set_bypassed(!t.is_active(P::MidBandPass));
        self.pre_gain.set_bypassed(!t.is_active(P::PreGain));
        self.waveshaper.set_bypassed(!t.is_active(P::Waveshaper));
        self.post_gain.set_bypassed(!t.is_active(P::PostGain));
        self.low_shelf.set_bypassed(!t.is_active(P::LowShelf));
        self.complex_filter
            .set_bypassed(!t.is_active(P::ComplexFilter));
        self.delay.set_bypassed(!t.is_active(P::Delay));
    }

    /// Processes a single sample through the cascade.
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let mut x = self.highpass.process(input);
        x = self.compressor.process(x);
        x = self.high_shelf.process(x);
        x = self.mid_bandpass.process(x);
        x = self.pre_gain.process(x);
        x = self.waveshaper.process(x);
        x = self.post_gain.process(x);
        x = self.low_shelf.process(x);
        x = self.complex_filter.process(x);
        self.delay.process(x)
    }

    /// Processes a buffer in place.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer {
            *sample = self.process_sample(*sample);
        }
    }

    /// Clears all stage history: filter memories, compressor envelope and
    /// feedback sample, delay buffer.
    pub fn reset(&mut self) {
        self.highpass.reset();
        self.compressor.reset();
        self.high_shelf.reset();
        self.mid_bandpass.reset();
        self.low_shelf.reset();
        self.complex_filter.reset();
        self.delay.reset();
    }
}
