// src/state/drag.rs
//
// Transient state for one drag interaction.

use crate::dnd::{Modifier, Translate, apply_modifiers};

use super::{ModuleId, ModuleRecord, ModuleStack};

/// Drag session state.
///
/// Idle when `dragging` is false and both active fields are empty. A session
/// only carries data between a drag-start and the following drag-end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragSession {
    /// Identifier reported by the drag-start event.
    pub active_id: Option<ModuleId>,

    /// Snapshot of the record being dragged, for the overlay.
    pub active_module: Option<ModuleRecord>,

    pub dragging: bool,

    /// Current translation of the dragged item, after modifiers.
    pub offset: Translate,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        !self.dragging && self.active_id.is_none() && self.active_module.is_none()
    }

    /// Begin a drag. A start event without an active id is ignored.
    ///
    /// An id that is not on the stack still starts the drag; there is just
    /// nothing to show in the overlay.
    pub fn start(&mut self, active: Option<ModuleId>, stack: &ModuleStack) -> bool {
        let Some(id) = active else {
            return false;
        };
        self.active_id = Some(id);
        self.active_module = stack.get(id).cloned();
        self.dragging = true;
        self.offset = Translate::ZERO;
        true
    }

    /// Track the pointer. Ignored unless a drag is in progress.
    pub fn move_to(&mut self, delta: Translate, modifiers: &[Modifier]) {
        if self.dragging {
            self.offset = apply_modifiers(modifiers, delta);
        }
    }

    /// Return to idle.
    pub fn end(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self, id: ModuleId) -> bool {
        self.active_id == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKind;

    #[test]
    fn test_start_snapshots_record() {
        let mut stack = ModuleStack::new();
        let id = stack.append(EffectKind::Distortion);

        let mut session = DragSession::new();
        assert!(session.start(Some(id), &stack));
        assert!(session.dragging);
        assert_eq!(session.active_module.as_ref().map(|m| m.id), Some(id));
    }

    #[test]
    fn test_start_with_unknown_id_still_drags() {
        let stack = ModuleStack::new();
        let stranger = ModuleId::random();

        let mut session = DragSession::new();
        assert!(session.start(Some(stranger), &stack));
        assert!(session.dragging);
        assert_eq!(session.active_id, Some(stranger));
        assert!(session.active_module.is_none());
    }

    #[test]
    fn test_start_without_id_stays_idle() {
        let mut session = DragSession::new();
        assert!(!session.start(None, &ModuleStack::new()));
        assert!(session.is_idle());
    }

    #[test]
    fn test_move_only_while_dragging() {
        let mut session = DragSession::new();
        let mods = [Modifier::RestrictToVerticalAxis];
        session.move_to(Translate::new(5.0, 5.0), &mods);
        assert_eq!(session.offset, Translate::ZERO);

        session.start(Some(ModuleId::random()), &ModuleStack::new());
        session.move_to(Translate::new(5.0, 7.0), &mods);
        assert_eq!(session.offset, Translate::new(0.0, 7.0));

        session.end();
        assert!(session.is_idle());
        assert_eq!(session.offset, Translate::ZERO);
    }
}
