// src/state/param_info.rs
//
// Parameter metadata for UI display and validation.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Unique identifier for a parameter within an effect kind.
pub type ParamId = u32;

/// Sparse parameter values (only those the user has touched).
pub type ParamValues = BTreeMap<ParamId, f32>;

/// Display curve for parameter UI.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayCurve {
    #[default]
    Linear,
    /// Logarithmic (good for time, frequency)
    Logarithmic,
    /// Exponential (good for drive amounts)
    Exponential,
}

/// Unit type for parameter display.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamUnit {
    #[default]
    None,
    /// Decibels (gain)
    Db,
    /// Percentage (stored 0-1)
    Percent,
    /// Seconds
    Seconds,
    /// Bit depth
    Bits,
    /// Integer divisor
    Factor,
}

impl fmt::Display for ParamUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamUnit::None => Ok(()),
            ParamUnit::Db => write!(f, "dB"),
            ParamUnit::Percent => write!(f, "%"),
            ParamUnit::Seconds => write!(f, "s"),
            ParamUnit::Bits => write!(f, "bit"),
            ParamUnit::Factor => write!(f, "x"),
        }
    }
}

/// Metadata describing a parameter.
#[derive(Debug, Clone, Serialize)]
pub struct ParamInfo {
    /// Unique ID within the effect kind
    pub id: ParamId,

    /// Human-readable name
    pub name: String,

    pub min: f32,
    pub max: f32,
    pub default: f32,

    pub unit: ParamUnit,
    pub curve: DisplayCurve,

    /// Step size for discrete parameters (0 = continuous)
    pub step: f32,
}

impl ParamInfo {
    pub fn new(id: ParamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            min: 0.0,
            max: 1.0,
            default: 0.0,
            unit: ParamUnit::None,
            curve: DisplayCurve::Linear,
            step: 0.0,
        }
    }

    pub fn range(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn default(mut self, value: f32) -> Self {
        self.default = value;
        self
    }

    pub fn unit(mut self, unit: ParamUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn curve(mut self, curve: DisplayCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Clamp a value to the valid range. NaN falls back to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }

    /// Format a value for display.
    pub fn format(&self, value: f32) -> String {
        let (value, precision) = match (self.unit, self.step > 0.0) {
            (ParamUnit::Percent, _) => (value * 100.0, 0),
            (_, true) => (value, 0),
            _ => (value, 2),
        };
        if self.unit == ParamUnit::None {
            format!("{:.prec$}", value, prec = precision)
        } else {
            format!("{:.prec$} {}", value, self.unit, prec = precision)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_and_nan() {
        let info = ParamInfo::new(0, "Mix").range(0.0, 1.0).default(0.5);
        assert_eq!(info.clamp(2.0), 1.0);
        assert_eq!(info.clamp(-1.0), 0.0);
        assert_eq!(info.clamp(f32::NAN), 0.5);
    }

    #[test]
    fn test_format_units() {
        let pct = ParamInfo::new(0, "Mix").unit(ParamUnit::Percent);
        assert_eq!(pct.format(0.5), "50 %");

        let bits = ParamInfo::new(1, "Bits").unit(ParamUnit::Bits).step(1.0);
        assert_eq!(bits.format(8.0), "8 bit");

        let plain = ParamInfo::new(2, "Amount");
        assert_eq!(plain.format(1.5), "1.50");
    }
}
