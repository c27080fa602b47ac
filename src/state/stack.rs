// src/state/stack.rs
//
// The ordered module sequence.
//
// Position in the sequence is both the visual stacking order and the
// signal-chain order. Identifiers are unique at all times.

use crate::effects::EffectKind;

use super::{ModuleId, ModuleRecord};

/// Move the item at `from` so that it ends up at `to`, shifting the items in
/// between by one. Out-of-range indices leave `items` untouched.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// The authoritative ordered list of modules.
#[derive(Debug, Clone, Default)]
pub struct ModuleStack {
    modules: Vec<ModuleRecord>,
}

impl ModuleStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new module with a freshly generated identifier.
    pub fn append(&mut self, kind: EffectKind) -> ModuleId {
        let mut id = ModuleId::random();
        while self.position_of(id).is_some() {
            id = ModuleId::random();
        }
        self.modules.push(ModuleRecord::new(id, kind));
        id
    }

    /// Remove the module at `position`. Out of range is a no-op.
    pub fn remove_at(&mut self, position: usize) -> Option<ModuleRecord> {
        if position < self.modules.len() {
            Some(self.modules.remove(position))
        } else {
            None
        }
    }

    /// Move `active` to where `over` currently sits.
    ///
    /// Returns `false` (and changes nothing) when the ids are equal or
    /// either one is not on the stack.
    pub fn move_by_id(&mut self, active: ModuleId, over: ModuleId) -> bool {
        if active == over {
            return false;
        }
        match (self.position_of(active), self.position_of(over)) {
            (Some(from), Some(to)) => {
                array_move(&mut self.modules, from, to);
                true
            }
            _ => false,
        }
    }

    /// Move `id` by `offset` positions, clamped to the ends of the stack.
    pub fn nudge(&mut self, id: ModuleId, offset: isize) -> bool {
        let Some(from) = self.position_of(id) else {
            return false;
        };
        let last = self.modules.len() as isize - 1;
        let to = (from as isize + offset).clamp(0, last) as usize;
        if to == from {
            return false;
        }
        array_move(&mut self.modules, from, to);
        true
    }

    pub fn position_of(&self, id: ModuleId) -> Option<usize> {
        self.modules.iter().position(|m| m.id == id)
    }

    pub fn get(&self, id: ModuleId) -> Option<&ModuleRecord> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// Mutable access for parameter edits. Identity must not change.
    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut ModuleRecord> {
        self.modules.iter_mut().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.iter()
    }

    /// Identifiers in stack order.
    pub fn ids(&self) -> Vec<ModuleId> {
        self.modules.iter().map(|m| m.id).collect()
    }
}
