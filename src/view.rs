// src/view.rs
//
// Presentational snapshots of the stack.
//
// Everything here is derived from controller state on demand. The host
// renders these; it never mutates them.

use serde::Serialize;

use crate::effects::EffectKind;
use crate::state::{DragSession, ModuleId, ModuleStack};

/// Opacity of the floating overlay copy.
pub const OVERLAY_OPACITY: f32 = 0.5;

/// One sortable item in the stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortableItemView {
    pub id: ModuleId,

    /// Current position; removal callbacks take this value.
    pub index: usize,

    pub kind: EffectKind,

    /// CSS transform for the item, present only while it is being dragged.
    pub transform: Option<String>,

    /// 0 for the original while its clone is in the overlay, 1 otherwise.
    pub opacity: f32,

    pub handle: DragHandleView,
}

/// Accessibility attributes for the region that starts a drag.
///
/// Pointer and keyboard activation both land on this element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragHandleView {
    pub role: &'static str,
    pub role_description: &'static str,
    pub tab_index: i32,
    pub pressed: bool,
}

impl DragHandleView {
    fn new(active: bool) -> Self {
        Self {
            role: "button",
            role_description: "sortable",
            tab_index: 0,
            pressed: active,
        }
    }
}

/// Floating copy of the dragged module.
///
/// The overlay copy has no position on the stack and cannot remove itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragOverlayView {
    pub id: ModuleId,
    pub kind: EffectKind,
    pub opacity: f32,
    pub transform: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackView {
    pub items: Vec<SortableItemView>,
    pub overlay: Option<DragOverlayView>,

    /// Highlights the drop area while a drag is in progress.
    pub dragging: bool,

    pub has_file: bool,
    pub file_is_audio: bool,
}

impl StackView {
    pub fn build(stack: &ModuleStack, drag: &DragSession, has_file: bool, file_is_audio: bool) -> Self {
        let items = stack
            .iter()
            .enumerate()
            .map(|(index, module)| item_view(module.id, index, module.kind, drag))
            .collect();

        let overlay = drag.active_module.as_ref().map(|m| DragOverlayView {
            id: m.id,
            kind: m.kind,
            opacity: OVERLAY_OPACITY,
            transform: drag.offset.to_string(),
        });

        Self {
            items,
            overlay,
            dragging: drag.dragging,
            has_file,
            file_is_audio,
        }
    }

    pub fn index_of(&self, id: ModuleId) -> Option<usize> {
        self.items.iter().find(|i| i.id == id).map(|i| i.index)
    }
}

fn item_view(id: ModuleId, index: usize, kind: EffectKind, drag: &DragSession) -> SortableItemView {
    let active = drag.dragging && drag.is_active(id);
    SortableItemView {
        id,
        index,
        kind,
        transform: active.then(|| drag.offset.to_string()),
        opacity: if active { 0.0 } else { 1.0 },
        handle: DragHandleView::new(active),
    }
}
