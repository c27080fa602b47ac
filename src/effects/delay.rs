// Feedback delay.

use crate::audio_buffer::AudioBuffer;
use crate::effect::{Effect, ProcessContext};

use super::{blend, params};

pub const MAX_DELAY_SECONDS: f32 = 2.0;

/// One circular buffer per channel.
struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len.max(1)],
            write_pos: 0,
        }
    }

    #[inline]
    fn tick(&mut self, input: f32, delay_samples: usize, feedback: f32) -> f32 {
        let len = self.buffer.len();
        let read_pos = (self.write_pos + len - delay_samples) % len;
        let delayed = self.buffer[read_pos];
        self.buffer[self.write_pos] = input + delayed * feedback;
        self.write_pos = (self.write_pos + 1) % len;
        delayed
    }
}

/// Feedback delay with independent lines per channel.
pub struct DelayEffect {
    delay_time: f32, // In seconds
    feedback: f32,
    mix: f32,

    lines: Vec<DelayLine>,
    sample_rate: f64,
}

impl DelayEffect {
    pub fn new() -> Self {
        Self {
            delay_time: 0.25,
            feedback: 0.4,
            mix: 0.5,
            lines: Vec::new(),
            sample_rate: 48_000.0,
        }
    }

    fn line_len(sample_rate: f64) -> usize {
        (MAX_DELAY_SECONDS as f64 * sample_rate.max(0.0)) as usize + 2
    }

    fn delay_samples(&self) -> usize {
        let samples = (self.delay_time as f64 * self.sample_rate).round() as usize;
        samples.clamp(1, Self::line_len(self.sample_rate) - 1)
    }
}

impl Default for DelayEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for DelayEffect {
    fn prepare(&mut self, sample_rate: f64, channels: usize) {
        self.sample_rate = sample_rate;
        let len = Self::line_len(sample_rate);
        self.lines = (0..channels).map(|_| DelayLine::new(len)).collect();
    }

    fn process(&mut self, ctx: &ProcessContext, input: &AudioBuffer, output: &mut AudioBuffer) {
        let delay_samples = self.delay_samples();
        let (feedback, mix) = (self.feedback, self.mix);
        let live = self.sample_rate > 0.0;

        for ch in 0..output.channels.min(input.channels) {
            let src = input.channel(ch);
            let out = output.channel_mut(ch);

            // Channels that were never prepared, or a zero rate, pass through dry.
            let line = match self.lines.get_mut(ch) {
                Some(line) if live => line,
                _ => {
                    let n = out.len().min(src.len());
                    out[..n].copy_from_slice(&src[..n]);
                    continue;
                }
            };

            for i in 0..ctx.frames.min(out.len()) {
                let dry = src.get(i).copied().unwrap_or(0.0);
                let delayed = line.tick(dry, delay_samples, feedback);
                out[i] = blend(dry, delayed, mix);
            }
        }
    }

    fn set_param(&mut self, param_id: u32, value: f32) {
        match param_id {
            params::TIME => self.delay_time = value,
            params::FEEDBACK => self.feedback = value,
            params::MIX => self.mix = value,
            _ => {}
        }
    }

    fn reset(&mut self) {
        for line in &mut self.lines {
            line.buffer.fill(0.0);
            line.write_pos = 0;
        }
    }
}
