// src/audio_buffer.rs

/// A borrowed block of planar audio: `[ch0 frames..., ch1 frames..., ...]`.
#[derive(Debug)]
pub struct AudioBuffer<'a> {
    pub channels: usize,
    pub frames: usize,
    pub data: &'a mut [f32],
}

impl<'a> AudioBuffer<'a> {
    /// Wrap existing planar data. `data.len()` must be a multiple of `channels`.
    #[inline]
    pub fn new(data: &'a mut [f32], channels: usize) -> Self {
        let channels = channels.max(1);
        let frames = data.len() / channels;
        Self {
            channels,
            frames,
            data,
        }
    }

    #[inline]
    pub fn channel(&self, ch: usize) -> &[f32] {
        let start = ch * self.frames;
        &self.data[start..start + self.frames]
    }

    #[inline]
    pub fn channel_mut(&mut self, ch: usize) -> &mut [f32] {
        let start = ch * self.frames;
        &mut self.data[start..start + self.frames]
    }

    /// Copy another buffer of the same shape into this one.
    ///
    /// Channels or frames missing from `other` are left silent.
    pub fn copy_from(&mut self, other: &AudioBuffer) {
        for ch in 0..self.channels {
            let out = self.channel_mut(ch);
            if ch < other.channels {
                let src = other.channel(ch);
                let n = out.len().min(src.len());
                out[..n].copy_from_slice(&src[..n]);
                out[n..].fill(0.0);
            } else {
                out.fill(0.0);
            }
        }
    }

    /// Absolute peak across all channels.
    pub fn peak(&self) -> f32 {
        self.data.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        self.data
    }
}
