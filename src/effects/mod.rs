// src/effects/mod.rs
//
// The closed set of effect kinds a stack can hold, their parameter
// metadata, and the tagged variant that dispatches processing.

mod bitcrush;
mod delay;
mod distortion;

pub use bitcrush::*;
pub use delay::*;
pub use distortion::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::audio_buffer::AudioBuffer;
use crate::effect::{Effect, ProcessContext};
use crate::error::PedalboardError;
use crate::state::{DisplayCurve, ParamInfo, ParamUnit, ParamValues};

// ═══════════════════════════════════════════════════════════════════
// Parameter IDs (per-effect-kind)
// ═══════════════════════════════════════════════════════════════════

pub mod params {
    // Shared
    pub const MIX: u32 = 0;

    // Distortion
    pub const AMOUNT: u32 = 1;
    pub const LEVEL: u32 = 2;

    // Delay
    pub const TIME: u32 = 1;
    pub const FEEDBACK: u32 = 2;

    // Bit crush
    pub const BITS: u32 = 1;
    pub const DOWNSAMPLE: u32 = 2;
}

// ═══════════════════════════════════════════════════════════════════
// Effect Kind
// ═══════════════════════════════════════════════════════════════════

/// Every kind of module the Add-Module chooser can put on a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Distortion,
    Delay,
    BitCrush,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::Distortion, EffectKind::Delay, EffectKind::BitCrush];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Distortion => "Distortion",
            EffectKind::Delay => "Delay",
            EffectKind::BitCrush => "Bit Crush",
        }
    }

    /// Parameter metadata for this kind.
    pub fn info(self) -> EffectInfo {
        match self {
            EffectKind::Distortion => EffectInfo::new(self)
                .with_param(
                    ParamInfo::new(params::MIX, "Mix")
                        .range(0.0, 1.0)
                        .default(1.0)
                        .unit(ParamUnit::Percent),
                )
                .with_param(
                    ParamInfo::new(params::AMOUNT, "Amount")
                        .range(0.0, 100.0)
                        .default(20.0)
                        .curve(DisplayCurve::Exponential),
                )
                .with_param(
                    ParamInfo::new(params::LEVEL, "Level")
                        .range(-24.0, 12.0)
                        .default(0.0)
                        .unit(ParamUnit::Db),
                ),
            EffectKind::Delay => EffectInfo::new(self)
                .with_param(
                    ParamInfo::new(params::MIX, "Mix")
                        .range(0.0, 1.0)
                        .default(0.5)
                        .unit(ParamUnit::Percent),
                )
                .with_param(
                    ParamInfo::new(params::TIME, "Time")
                        .range(0.001, MAX_DELAY_SECONDS)
                        .default(0.25)
                        .unit(ParamUnit::Seconds)
                        .curve(DisplayCurve::Logarithmic),
                )
                .with_param(
                    ParamInfo::new(params::FEEDBACK, "Feedback")
                        .range(0.0, 0.95)
                        .default(0.4)
                        .unit(ParamUnit::Percent),
                ),
            EffectKind::BitCrush => EffectInfo::new(self)
                .with_param(
                    ParamInfo::new(params::MIX, "Mix")
                        .range(0.0, 1.0)
                        .default(1.0)
                        .unit(ParamUnit::Percent),
                )
                .with_param(
                    ParamInfo::new(params::BITS, "Bits")
                        .range(1.0, 16.0)
                        .default(8.0)
                        .unit(ParamUnit::Bits)
                        .step(1.0),
                )
                .with_param(
                    ParamInfo::new(params::DOWNSAMPLE, "Downsample")
                        .range(1.0, 64.0)
                        .default(1.0)
                        .unit(ParamUnit::Factor)
                        .step(1.0),
                ),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = PedalboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distortion" => Ok(EffectKind::Distortion),
            "delay" => Ok(EffectKind::Delay),
            "bitcrush" | "bit-crush" | "bit_crush" | "bit crush" => Ok(EffectKind::BitCrush),
            _ => Err(PedalboardError::UnknownEffect(s.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════════════

/// Metadata describing an effect kind.
///
/// Used by the UI to:
/// - Populate the Add-Module chooser
/// - Display parameter controls
#[derive(Debug, Clone, Serialize)]
pub struct EffectInfo {
    pub kind: EffectKind,
    pub name: String,
    pub parameters: Vec<ParamInfo>,
}

impl EffectInfo {
    fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            name: kind.name().to_string(),
            parameters: Vec::new(),
        }
    }

    fn with_param(mut self, param: ParamInfo) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn find_param(&self, id: u32) -> Option<&ParamInfo> {
        self.parameters.iter().find(|p| p.id == id)
    }
}

/// All effect kinds, in chooser order.
pub fn effect_catalog() -> Vec<EffectInfo> {
    EffectKind::ALL.iter().map(|k| k.info()).collect()
}

// ═══════════════════════════════════════════════════════════════════
// Effect Module (tagged variant)
// ═══════════════════════════════════════════════════════════════════

/// A live effect instance. One exists per module on the stack.
pub enum EffectModule {
    Distortion(DistortionEffect),
    Delay(DelayEffect),
    BitCrush(BitCrushEffect),
}

impl EffectModule {
    /// Create an instance of `kind` with its default parameters.
    pub fn new(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Distortion => EffectModule::Distortion(DistortionEffect::new()),
            EffectKind::Delay => EffectModule::Delay(DelayEffect::new()),
            EffectKind::BitCrush => EffectModule::BitCrush(BitCrushEffect::new()),
        }
    }

    /// Create an instance and apply stored parameter values.
    pub fn with_params(kind: EffectKind, values: &ParamValues) -> Self {
        let mut module = Self::new(kind);
        for (&id, &value) in values.iter() {
            module.set_param(id, value);
        }
        module
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            EffectModule::Distortion(_) => EffectKind::Distortion,
            EffectModule::Delay(_) => EffectKind::Delay,
            EffectModule::BitCrush(_) => EffectKind::BitCrush,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Effect {
        match self {
            EffectModule::Distortion(e) => e,
            EffectModule::Delay(e) => e,
            EffectModule::BitCrush(e) => e,
        }
    }
}

impl Effect for EffectModule {
    fn prepare(&mut self, sample_rate: f64, channels: usize) {
        self.inner_mut().prepare(sample_rate, channels);
    }

    fn process(&mut self, ctx: &ProcessContext, input: &AudioBuffer, output: &mut AudioBuffer) {
        self.inner_mut().process(ctx, input, output);
    }

    fn set_param(&mut self, param_id: u32, value: f32) {
        let value = match self.kind().info().find_param(param_id) {
            Some(info) => info.clamp(value),
            None => return,
        };
        self.inner_mut().set_param(param_id, value);
    }

    fn reset(&mut self) {
        self.inner_mut().reset();
    }
}

/// Linear blend of dry and wet signal.
#[inline]
pub(crate) fn blend(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

#[inline]
pub(crate) fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing_accepts_aliases() {
        assert_eq!("Distortion".parse::<EffectKind>().unwrap(), EffectKind::Distortion);
        assert_eq!("bit-crush".parse::<EffectKind>().unwrap(), EffectKind::BitCrush);
        assert_eq!(" BITCRUSH ".parse::<EffectKind>().unwrap(), EffectKind::BitCrush);
        assert!(matches!(
            "chorus".parse::<EffectKind>(),
            Err(PedalboardError::UnknownEffect(_))
        ));
    }

    #[test]
    fn test_catalog_lists_every_kind_with_params() {
        let catalog = effect_catalog();
        assert_eq!(catalog.len(), 3);
        for info in &catalog {
            assert!(info.find_param(params::MIX).is_some(), "{} has no mix", info.name);
            assert_eq!(info.parameters.len(), 3);
        }
    }

    #[test]
    fn test_module_kind_round_trips() {
        for kind in EffectKind::ALL {
            assert_eq!(EffectModule::new(kind).kind(), kind);
        }
    }

    #[test]
    fn test_unknown_param_is_ignored() {
        let mut module = EffectModule::new(EffectKind::Delay);
        module.set_param(99, 1.0);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&EffectKind::BitCrush).unwrap();
        assert_eq!(json, "\"bitcrush\"");
    }
}
