// src/dnd.rs
//
// Geometry handed to us by the host's drag-and-drop layer.
//
// Pointer tracking and hit-testing belong to the host. This module only
// describes the shapes that cross the boundary, the transform modifiers the
// stack applies, and the collision-detection seam.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::ModuleId;

/// A drag translation in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translate {
    pub x: f32,
    pub y: f32,
}

impl Translate {
    pub const ZERO: Translate = Translate { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// CSS transform string, e.g. `translate3d(0px, 42px, 0)`.
impl fmt::Display for Translate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate3d({}px, {}px, 0)", self.x.round(), self.y.round())
    }
}

/// An axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    pub fn translated(&self, t: Translate) -> Rect {
        Rect {
            left: self.left + t.x,
            top: self.top + t.y,
            ..*self
        }
    }
}

/// Constraints applied to the raw pointer delta while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modifier {
    /// Zero out horizontal movement.
    RestrictToVerticalAxis,

    /// Keep the dragged item's rect inside `bounds`.
    RestrictToWindowEdges { bounds: Rect, item: Rect },
}

impl Modifier {
    pub fn apply(&self, t: Translate) -> Translate {
        match *self {
            Modifier::RestrictToVerticalAxis => Translate { x: 0.0, ..t },
            Modifier::RestrictToWindowEdges { bounds, item } => {
                let mut out = t;
                let moved = item.translated(t);
                if moved.left < bounds.left {
                    out.x += bounds.left - moved.left;
                } else if moved.right() > bounds.right() {
                    out.x -= moved.right() - bounds.right();
                }
                if moved.top < bounds.top {
                    out.y += bounds.top - moved.top;
                } else if moved.bottom() > bounds.bottom() {
                    out.y -= moved.bottom() - bounds.bottom();
                }
                out
            }
        }
    }
}

/// Apply modifiers in order.
pub fn apply_modifiers(modifiers: &[Modifier], delta: Translate) -> Translate {
    modifiers.iter().fold(delta, |t, m| m.apply(t))
}

/// A droppable region on screen, keyed by the module it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Droppable {
    pub id: ModuleId,
    pub rect: Rect,
}

/// Resolves which droppable the active item is over.
///
/// This is the host's collision-detection capability. The stack only ever
/// receives the result, as the `over` argument of a drag-end.
pub trait DropTargetResolver {
    fn resolve(&self, active: Rect, droppables: &[Droppable]) -> Option<ModuleId>;
}

/// Pick the droppable whose centre is nearest the active rect's centre.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosestCenter;

impl DropTargetResolver for ClosestCenter {
    fn resolve(&self, active: Rect, droppables: &[Droppable]) -> Option<ModuleId> {
        let (ax, ay) = active.center();
        droppables
            .iter()
            .map(|d| {
                let (dx, dy) = d.rect.center();
                (d.id, (dx - ax).powi(2) + (dy - ay).powi(2))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_css() {
        assert_eq!(Translate::new(0.0, 42.4).to_string(), "translate3d(0px, 42px, 0)");
        assert_eq!(Translate::new(-3.0, 0.0).to_string(), "translate3d(-3px, 0px, 0)");
    }

    #[test]
    fn test_vertical_axis_drops_x() {
        let t = Modifier::RestrictToVerticalAxis.apply(Translate::new(15.0, -8.0));
        assert_eq!(t, Translate::new(0.0, -8.0));
    }

    #[test]
    fn test_window_edges_clamp() {
        let m = Modifier::RestrictToWindowEdges {
            bounds: Rect::new(0.0, 0.0, 100.0, 200.0),
            item: Rect::new(10.0, 20.0, 50.0, 40.0),
        };
        assert_eq!(m.apply(Translate::new(-30.0, -50.0)), Translate::new(-10.0, -20.0));
        assert_eq!(m.apply(Translate::new(80.0, 500.0)), Translate::new(40.0, 140.0));
        assert_eq!(m.apply(Translate::new(5.0, 5.0)), Translate::new(5.0, 5.0));
    }

    #[test]
    fn test_closest_center_picks_nearest() {
        let a = ModuleId::random();
        let b = ModuleId::random();
        let droppables = [
            Droppable { id: a, rect: Rect::new(0.0, 0.0, 100.0, 50.0) },
            Droppable { id: b, rect: Rect::new(0.0, 60.0, 100.0, 50.0) },
        ];
        let active = Rect::new(0.0, 70.0, 100.0, 50.0);
        assert_eq!(ClosestCenter.resolve(active, &droppables), Some(b));
        assert_eq!(ClosestCenter.resolve(active, &[]), None);
    }
}
