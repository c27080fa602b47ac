// src/state/audio_file.rs
//
// The file currently loaded into the pedalboard, and decoded audio clips.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info};

use crate::error::{PedalboardError, Result};

/// Decoded audio, planar: `[ch0 frames..., ch1 frames..., ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub channels: usize,
    pub frames: usize,
    pub samples: Vec<f32>,
}

impl AudioClip {
    /// Build from per-channel sample vectors. Shorter channels are padded
    /// with silence to the longest one.
    pub fn from_channels(sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
        let count = channels.len().max(1);
        let mut samples = Vec::with_capacity(count * frames);
        for mut ch in channels {
            ch.resize(frames, 0.0);
            samples.extend(ch);
        }
        samples.resize(count * frames, 0.0);
        Self {
            sample_rate,
            channels: count,
            frames,
            samples,
        }
    }

    pub fn channel(&self, ch: usize) -> &[f32] {
        let start = ch * self.frames;
        &self.samples[start..start + self.frames]
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames as f64 / self.sample_rate as f64
    }

    /// Decode a WAV file. Integer formats are normalized to [-1, 1].
    pub fn read_wav(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = WavReader::open(path)?;
        let clip = Self::decode(reader)?;
        info!(
            "Loaded {} ({} ch, {} Hz, {:.2}s)",
            path.display(),
            clip.channels,
            clip.sample_rate,
            clip.duration_secs()
        );
        Ok(clip)
    }

    fn decode(reader: WavReader<BufReader<File>>) -> Result<Self> {
        let spec = reader.spec();
        if spec.sample_rate == 0 {
            return Err(PedalboardError::Config("WAV header has a sample rate of 0".into()));
        }
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader.into_samples::<f32>().collect::<std::result::Result<Vec<f32>, _>>()?,
            SampleFormat::Int => {
                let scale = 1.0 / (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<Vec<f32>, _>>()?
            }
        };

        let frames = interleaved.len() / channels;
        let mut samples = vec![0.0; channels * frames];
        for (i, frame) in interleaved.chunks_exact(channels).enumerate() {
            for (ch, &s) in frame.iter().enumerate() {
                samples[ch * frames + i] = s;
            }
        }

        debug!("Decoded {} frames, {:?}", frames, spec);

        Ok(Self {
            sample_rate: spec.sample_rate,
            channels,
            frames,
            samples,
        })
    }

    /// Encode as 32-bit float WAV.
    pub fn write_wav(&self, path: impl AsRef<Path>) -> Result<()> {
        let channels = u16::try_from(self.channels)
            .map_err(|_| PedalboardError::Config(format!("too many channels: {}", self.channels)))?;
        let spec = WavSpec {
            channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let mut writer = WavWriter::create(path.as_ref(), spec)?;
        for i in 0..self.frames {
            for ch in 0..self.channels {
                writer.write_sample(self.samples[ch * self.frames + i])?;
            }
        }
        writer.finalize()?;

        info!("Wrote {}", path.as_ref().display());
        Ok(())
    }
}

/// A file handed over by the audio input or the recorder.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFile {
    pub name: String,
    pub mime_type: String,
    /// Decoded audio, if the host has decoded it.
    pub clip: Option<AudioClip>,
}

impl AudioFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            clip: None,
        }
    }

    pub fn with_clip(mut self, clip: AudioClip) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn looks_like_audio(&self) -> bool {
        self.mime_type.trim().to_ascii_lowercase().starts_with("audio/")
    }
}

/// The current file and whether it is playable audio.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFileRef {
    pub current_file: Option<AudioFile>,
    pub file_is_audio: bool,
}

impl Default for AudioFileRef {
    fn default() -> Self {
        Self {
            current_file: None,
            file_is_audio: true,
        }
    }
}

impl AudioFileRef {
    pub fn set_current_file(&mut self, file: Option<AudioFile>) {
        self.current_file = file;
    }

    pub fn set_file_is_audio(&mut self, is_audio: bool) {
        self.file_is_audio = is_audio;
    }

    /// Publish a file through both setters, deriving `file_is_audio` from
    /// its MIME type.
    pub fn load(&mut self, file: AudioFile) {
        let is_audio = file.looks_like_audio();
        self.set_current_file(Some(file));
        self.set_file_is_audio(is_audio);
    }

    pub fn clip(&self) -> Option<&AudioClip> {
        self.current_file.as_ref().and_then(|f| f.clip.as_ref())
    }
}
