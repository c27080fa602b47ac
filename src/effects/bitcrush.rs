// Bit-depth and sample-rate reduction.

use crate::audio_buffer::AudioBuffer;
use crate::effect::{Effect, ProcessContext};

use super::{blend, params};

#[derive(Debug, Clone, Copy, Default)]
struct HoldState {
    value: f32,
    counter: usize,
}

/// Quantizes amplitude to `bits` and holds each sample for `downsample`
/// frames.
pub struct BitCrushEffect {
    bits: f32,
    downsample: usize,
    mix: f32,

    holds: Vec<HoldState>,
}

impl BitCrushEffect {
    pub fn new() -> Self {
        Self {
            bits: 8.0,
            downsample: 1,
            mix: 1.0,
            holds: Vec::new(),
        }
    }

    /// Number of quantization steps per polarity.
    #[inline]
    fn levels(&self) -> f32 {
        2.0_f32.powf(self.bits - 1.0).max(1.0)
    }

    #[inline]
    fn quantize(&self, x: f32) -> f32 {
        let levels = self.levels();
        ((x * levels).round() / levels).clamp(-1.0, 1.0)
    }
}

impl Default for BitCrushEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for BitCrushEffect {
    fn prepare(&mut self, _sample_rate: f64, channels: usize) {
        self.holds = vec![HoldState::default(); channels];
    }

    fn process(&mut self, ctx: &ProcessContext, input: &AudioBuffer, output: &mut AudioBuffer) {
        let downsample = self.downsample.max(1);

        for ch in 0..output.channels.min(input.channels) {
            let src = input.channel(ch);
            let mut hold = self.holds.get(ch).copied().unwrap_or_default();

            let out = output.channel_mut(ch);
            for i in 0..ctx.frames.min(out.len()) {
                let dry = src.get(i).copied().unwrap_or(0.0);
                if hold.counter == 0 {
                    hold.value = self.quantize(dry);
                }
                hold.counter = (hold.counter + 1) % downsample;
                out[i] = blend(dry, hold.value, self.mix);
            }

            if let Some(slot) = self.holds.get_mut(ch) {
                *slot = hold;
            }
        }
    }

    fn set_param(&mut self, param_id: u32, value: f32) {
        match param_id {
            params::BITS => self.bits = value.round(),
            params::DOWNSAMPLE => {
                self.downsample = value.round().max(1.0) as usize;
                for hold in &mut self.holds {
                    hold.counter = 0;
                }
            }
            params::MIX => self.mix = value,
            _ => {}
        }
    }

    fn reset(&mut self) {
        self.holds.fill(HoldState::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(effect: &mut BitCrushEffect, input: &[f32]) -> Vec<f32> {
        let mut in_data = input.to_vec();
        let mut out_data = vec![0.0; input.len()];
        let ctx = ProcessContext::new(input.len(), 48_000.0);
        let inb = AudioBuffer::new(&mut in_data, 1);
        let mut outb = AudioBuffer::new(&mut out_data, 1);
        effect.process(&ctx, &inb, &mut outb);
        out_data
    }

    #[test]
    fn test_two_bits_snaps_to_half_steps() {
        let mut effect = BitCrushEffect::new();
        effect.prepare(48_000.0, 1);
        effect.set_param(params::BITS, 2.0);

        let out = run(&mut effect, &[0.1, 0.3, 0.8, -0.7]);
        assert_eq!(out, vec![0.0, 0.5, 1.0, -0.5]);
    }

    #[test]
    fn test_downsample_holds_samples() {
        let mut effect = BitCrushEffect::new();
        effect.prepare(48_000.0, 1);
        effect.set_param(params::BITS, 16.0);
        effect.set_param(params::DOWNSAMPLE, 3.0);

        let out = run(&mut effect, &[0.5, 0.1, 0.2, -0.25, 0.9, 0.9]);
        assert_eq!(out, vec![0.5, 0.5, 0.5, -0.25, -0.25, -0.25]);
    }

    #[test]
    fn test_zero_mix_is_dry() {
        let mut effect = BitCrushEffect::new();
        effect.prepare(48_000.0, 1);
        effect.set_param(params::BITS, 1.0);
        effect.set_param(params::MIX, 0.0);

        let out = run(&mut effect, &[0.123, -0.456]);
        assert_eq!(out, vec![0.123, -0.456]);
    }
}
