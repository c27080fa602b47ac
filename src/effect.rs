// src/effect.rs

use crate::audio_buffer::AudioBuffer;

/// Context passed to effects during processing.
#[derive(Debug, Clone, Copy)]
pub struct ProcessContext {
    /// Number of frames to process
    pub frames: usize,

    /// Sample rate
    pub sample_rate: f64,
}

impl ProcessContext {
    pub fn new(frames: usize, sample_rate: f64) -> Self {
        Self {
            frames,
            sample_rate,
        }
    }
}

/// Uniform processing interface shared by every effect in a stack.
///
/// Effects:
/// - do NOT know where they sit in the stack
/// - do NOT allocate in `process`
/// - ONLY transform `input` into `output` for the given context
pub trait Effect: Send {
    /// Called before processing and whenever the sample rate or channel
    /// count changes. This is the only place an effect may allocate.
    fn prepare(&mut self, sample_rate: f64, channels: usize);

    /// Process one block.
    ///
    /// `input` and `output` have the same channel count and at least
    /// `ctx.frames` frames.
    fn process(&mut self, ctx: &ProcessContext, input: &AudioBuffer, output: &mut AudioBuffer);

    /// Set a parameter value. Unknown ids are ignored.
    fn set_param(&mut self, param_id: u32, value: f32);

    /// Clear any internal state (delay lines, hold registers).
    fn reset(&mut self) {}
}
