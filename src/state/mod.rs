// src/state/mod.rs
//
// Declarative state for the pedalboard UI.
//
// These structures are what the UI renders from. The controller is the
// only owner; everything else gets snapshots.
//
// Key principles:
// - Mutations happen through Commands
// - Invalid events degrade to no-ops, never to errors
// - Identity lives in `ModuleId`, order lives in `ModuleStack`

mod audio_file;
mod command;
mod drag;
mod module;
mod param_info;
mod stack;

pub use audio_file::*;
pub use command::*;
pub use drag::*;
pub use module::*;
pub use param_info::*;
pub use stack::*;
