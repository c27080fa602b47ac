// Waveshaping distortion.

use crate::audio_buffer::AudioBuffer;
use crate::effect::{Effect, ProcessContext};

use super::{blend, db_to_linear, params};

/// Soft-clipping waveshaper.
///
/// `y = ((1 + k) * x) / (1 + k * |x|)`. With `k = 0` the curve is the
/// identity; higher `k` pushes it towards a hard clip at ±1.
pub struct DistortionEffect {
    amount: f32,
    mix: f32,
    level_db: f32,
    level_linear: f32,
}

impl DistortionEffect {
    pub fn new() -> Self {
        Self {
            amount: 20.0,
            mix: 1.0,
            level_db: 0.0,
            level_linear: 1.0,
        }
    }

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        let k = self.amount;
        ((1.0 + k) * x) / (1.0 + k * x.abs())
    }
}

impl Default for DistortionEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for DistortionEffect {
    fn prepare(&mut self, _sample_rate: f64, _channels: usize) {}

    fn process(&mut self, ctx: &ProcessContext, input: &AudioBuffer, output: &mut AudioBuffer) {
        for ch in 0..output.channels.min(input.channels) {
            let src = input.channel(ch);
            let out = output.channel_mut(ch);
            for i in 0..ctx.frames.min(out.len()) {
                let dry = src.get(i).copied().unwrap_or(0.0);
                let wet = self.shape(dry);
                out[i] = blend(dry, wet, self.mix) * self.level_linear;
            }
        }
    }

    fn set_param(&mut self, param_id: u32, value: f32) {
        match param_id {
            params::AMOUNT => self.amount = value,
            params::MIX => self.mix = value,
            params::LEVEL => {
                self.level_db = value;
                self.level_linear = db_to_linear(value);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(effect: &mut DistortionEffect, input: &[f32]) -> Vec<f32> {
        let mut in_data = input.to_vec();
        let mut out_data = vec![0.0; input.len()];
        let ctx = ProcessContext::new(input.len(), 48_000.0);
        let inb = AudioBuffer::new(&mut in_data, 1);
        let mut outb = AudioBuffer::new(&mut out_data, 1);
        effect.process(&ctx, &inb, &mut outb);
        out_data
    }

    #[test]
    fn test_zero_amount_is_transparent() {
        let mut effect = DistortionEffect::new();
        effect.set_param(params::AMOUNT, 0.0);
        let out = run(&mut effect, &[0.1, -0.5, 0.9]);
        assert_eq!(out, vec![0.1, -0.5, 0.9]);
    }

    #[test]
    fn test_output_stays_bounded_and_keeps_sign() {
        let mut effect = DistortionEffect::new();
        effect.set_param(params::AMOUNT, 100.0);
        let out = run(&mut effect, &[1.0, -1.0, 0.05, -0.05]);
        for s in &out {
            assert!(s.abs() <= 1.0 + 1e-6);
        }
        assert!(out[2] > 0.05, "small signals are boosted");
        assert!(out[3] < -0.05);
    }

    #[test]
    fn test_level_scales_output() {
        let mut effect = DistortionEffect::new();
        effect.set_param(params::AMOUNT, 0.0);
        effect.set_param(params::LEVEL, -6.0);
        let out = run(&mut effect, &[1.0]);
        assert!((out[0] - 0.501).abs() < 0.01);
    }
}
