// src/lib.rs
//
// Library entry point for the pedalboard engine.

mod audio_buffer;
mod chain;
mod config;
mod controller;
mod dnd;
mod effect;
mod effects;
mod error;
mod state;
mod view;

#[cfg(feature = "web")]
pub mod wasm;

// Re-export key types for Rust consumers
pub use audio_buffer::AudioBuffer;
pub use chain::EffectChain;
pub use config::EngineConfig;
pub use controller::StackController;
pub use dnd::{ClosestCenter, DropTargetResolver, Droppable, Modifier, Rect, Translate};
pub use effect::{Effect, ProcessContext};
pub use effects::{EffectInfo, EffectKind, EffectModule, effect_catalog, params};
pub use error::{PedalboardError, Result};
pub use state::{
    AudioClip, AudioFile, AudioFileRef, Command, CommandResult, DragSession, ModuleId,
    ModuleRecord, ModuleStack, ParamInfo, ParamUnit, array_move,
};
pub use view::{DragHandleView, DragOverlayView, SortableItemView, StackView};
