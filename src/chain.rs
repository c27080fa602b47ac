// src/chain.rs
//
// Live effect instances, processed in stack order.

use std::collections::HashMap;

use log::{debug, trace};

use crate::audio_buffer::AudioBuffer;
use crate::effect::{Effect, ProcessContext};
use crate::effects::{EffectKind, EffectModule};
use crate::state::{AudioClip, ModuleId, ParamValues};

/// One effect instance per module on the stack.
///
/// The chain does not own ordering. Callers pass the stack order on every
/// call, so a reorder takes effect on the next block.
#[derive(Default)]
pub struct EffectChain {
    effects: HashMap<ModuleId, EffectModule>,

    /// (sample rate, channels) the instances were last prepared for.
    prepared: Option<(f64, usize)>,

    scratch: Vec<f32>,
}

impl EffectChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an instance for a newly registered module.
    pub fn insert(&mut self, id: ModuleId, kind: EffectKind, params: &ParamValues) {
        let mut effect = EffectModule::with_params(kind, params);
        if let Some((sample_rate, channels)) = self.prepared {
            effect.prepare(sample_rate, channels);
        }
        self.effects.insert(id, effect);
        debug!("Chain: added {} ({})", kind, id);
    }

    pub fn remove(&mut self, id: ModuleId) -> Option<EffectModule> {
        let removed = self.effects.remove(&id);
        if removed.is_some() {
            debug!("Chain: removed {}", id);
        }
        removed
    }

    pub fn set_param(&mut self, id: ModuleId, param_id: u32, value: f32) {
        if let Some(effect) = self.effects.get_mut(&id) {
            effect.set_param(param_id, value);
        }
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Prepare every instance if the format changed.
    pub fn prepare(&mut self, sample_rate: f64, channels: usize) {
        if self.prepared == Some((sample_rate, channels)) {
            return;
        }
        for effect in self.effects.values_mut() {
            effect.prepare(sample_rate, channels);
        }
        self.prepared = Some((sample_rate, channels));
        debug!("Chain prepared: {} Hz, {} ch", sample_rate, channels);
    }

    pub fn reset(&mut self) {
        for effect in self.effects.values_mut() {
            effect.reset();
        }
    }

    /// Run `buffer` through the effects named by `order`, in place.
    ///
    /// Ids without an instance are skipped. An empty order leaves the
    /// buffer untouched.
    pub fn process<I>(&mut self, order: I, ctx: &ProcessContext, buffer: &mut AudioBuffer)
    where
        I: IntoIterator<Item = ModuleId>,
    {
        self.prepare(ctx.sample_rate, buffer.channels);

        let len = buffer.data.len();
        if self.scratch.len() < len {
            self.scratch.resize(len, 0.0);
        }

        for id in order {
            let Some(effect) = self.effects.get_mut(&id) else {
                trace!("Chain: no instance for {}", id);
                continue;
            };

            let mut wet = AudioBuffer::new(&mut self.scratch[..len], buffer.channels);
            wet.copy_from(buffer);
            effect.process(ctx, buffer, &mut wet);
            buffer.data.copy_from_slice(wet.samples());
        }
    }

    /// Process a whole clip, block by block, and return the result.
    ///
    /// Instances are reset first so a previous render's tail does not leak in.
    pub fn render(&mut self, order: &[ModuleId], clip: &AudioClip, max_block: usize) -> AudioClip {
        let channels = clip.channels.max(1);
        let block = max_block.max(1);
        let sample_rate = clip.sample_rate as f64;

        self.prepare(sample_rate, channels);
        self.reset();

        let mut out = clip.clone();
        let mut block_data = vec![0.0_f32; channels * block];

        let mut start = 0;
        while start < clip.frames {
            let frames = (clip.frames - start).min(block);
            let data = &mut block_data[..channels * frames];

            for ch in 0..channels {
                let src = &clip.samples[ch * clip.frames + start..ch * clip.frames + start + frames];
                data[ch * frames..(ch + 1) * frames].copy_from_slice(src);
            }

            let mut buffer = AudioBuffer::new(data, channels);
            let ctx = ProcessContext::new(frames, sample_rate);
            self.process(order.iter().copied(), &ctx, &mut buffer);

            for ch in 0..channels {
                let dst = &mut out.samples[ch * clip.frames + start..ch * clip.frames + start + frames];
                dst.copy_from_slice(buffer.channel(ch));
            }

            start += frames;
        }

        out
    }
}
