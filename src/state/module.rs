// src/state/module.rs
//
// Module records: one effect on the stack.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::effects::EffectKind;

use super::ParamValues;

/// Opaque, randomly generated identifier for a module on the stack.
///
/// Assigned once at registration and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(Uuid);

impl ModuleId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier coming from an event payload.
    ///
    /// Payloads that do not parse are treated as "no identifier".
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ModuleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// One module on the stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Stable identity
    pub id: ModuleId,

    /// Which effect this module renders and processes
    pub kind: EffectKind,

    /// Current parameter values (sparse - only non-default values)
    #[serde(default)]
    pub params: ParamValues,
}

impl ModuleRecord {
    pub fn new(id: ModuleId, kind: EffectKind) -> Self {
        Self {
            id,
            kind,
            params: ParamValues::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_differ() {
        assert_ne!(ModuleId::random(), ModuleId::random());
    }

    #[test]
    fn test_display_parses_back() {
        let id = ModuleId::random();
        assert_eq!(ModuleId::parse(&id.to_string()), Some(id));
        assert_eq!(ModuleId::parse("not-an-id"), None);
    }

    #[test]
    fn test_record_serializes_id_as_string() {
        let record = ModuleRecord::new(ModuleId::random(), EffectKind::Delay);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], record.id.to_string());
        assert_eq!(json["kind"], "delay");
    }
}
