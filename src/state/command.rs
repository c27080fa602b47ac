// Commands from the UI to the stack controller.
//
// Commands are the ONLY way a host can mutate the stack.

use crate::dnd::Translate;
use crate::effects::EffectKind;

use super::{AudioFile, ModuleId};

/// A UI event, translated into stack terms.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ═══════════════════════════════════════════
    // Stack mutations
    // ═══════════════════════════════════════════
    /// Append a module chosen in the Add-Module chooser.
    RegisterModule { kind: EffectKind },

    /// A module asked to remove itself.
    UnregisterModule { position: usize },

    /// Keyboard reorder by a relative offset.
    NudgeModule { id: ModuleId, offset: isize },

    // ═══════════════════════════════════════════
    // Drag session
    // ═══════════════════════════════════════════
    DragStart { active: Option<ModuleId> },

    DragMove { delta: Translate },

    /// `over` is whatever the host's collision detection resolved.
    DragEnd {
        active: Option<ModuleId>,
        over: Option<ModuleId>,
    },

    /// Pointer cancel. Same as a drag-end with no target.
    DragCancel,

    // ═══════════════════════════════════════════
    // Parameters
    // ═══════════════════════════════════════════
    SetParam {
        id: ModuleId,
        param_id: u32,
        value: f32,
    },

    // ═══════════════════════════════════════════
    // Audio input / recorder
    // ═══════════════════════════════════════════
    SetCurrentFile { file: Option<AudioFile> },

    SetFileIsAudio { is_audio: bool },
}

/// What happened to a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Command applied.
    Ok,

    /// A module was appended.
    ModuleRegistered { id: ModuleId },

    /// The command referenced something stale or invalid and changed nothing.
    Ignored,
}
