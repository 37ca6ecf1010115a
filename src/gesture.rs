//! The drag gesture state machine.
//!
//! Interprets raw pointer movement while a drag is active, routing the deltas
//! either to node positions (scaled into canvas space) or to the viewport pan
//! offset (raw screen pixels). Exists only between pointer-down and
//! pointer-up; never persisted.

use egui::{Pos2, Vec2};

use crate::types::{Mindmap, NodeId};
use crate::viewport::Viewport;

/// The active drag, if any. At most one gesture runs at a time; starting a
/// new one replaces whatever state was left behind.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragGesture {
    /// No drag in progress
    #[default]
    Idle,
    /// Moving one or more nodes
    NodeDrag {
        /// Pointer position of the last processed move, in screen space
        last_screen: Pos2,
        /// The nodes captured at drag start
        moving: Vec<NodeId>,
    },
    /// Panning the canvas
    CanvasPan {
        /// Pointer position of the last processed move, in screen space
        last_screen: Pos2,
    },
}

impl DragGesture {
    /// Returns `true` while any drag is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self, DragGesture::Idle)
    }

    /// Returns `true` while nodes are being dragged.
    pub fn is_node_drag(&self) -> bool {
        matches!(self, DragGesture::NodeDrag { .. })
    }

    /// Returns `true` while the canvas is being panned.
    pub fn is_pan(&self) -> bool {
        matches!(self, DragGesture::CanvasPan { .. })
    }

    /// Starts dragging the given nodes from a screen-space anchor.
    ///
    /// The moving set is captured once, here; pointer moves never re-hit-test.
    pub fn begin_node_drag(&mut self, moving: Vec<NodeId>, screen: Pos2) {
        *self = DragGesture::NodeDrag {
            last_screen: screen,
            moving,
        };
    }

    /// Starts panning the canvas from a screen-space anchor.
    pub fn begin_canvas_pan(&mut self, screen: Pos2) {
        *self = DragGesture::CanvasPan {
            last_screen: screen,
        };
    }

    /// Feeds one pointer-move sample into the active gesture.
    ///
    /// The delta since the last processed sample is applied incrementally and
    /// the anchor is re-set to the new position, so intermediate frames never
    /// compound. Node drags divide the delta by the current zoom scale (node
    /// positions live in unscaled canvas space); pans apply it raw.
    ///
    /// # Returns
    ///
    /// `true` if the document changed (some node moved).
    pub fn pointer_moved(&mut self, screen: Pos2, map: &mut Mindmap, view: &mut Viewport) -> bool {
        match self {
            DragGesture::Idle => false,
            DragGesture::NodeDrag {
                last_screen,
                moving,
            } => {
                let delta = screen - *last_screen;
                *last_screen = screen;
                if delta == Vec2::ZERO {
                    return false;
                }
                map.translate_nodes(moving, delta / view.scale)
            }
            DragGesture::CanvasPan { last_screen } => {
                let delta = screen - *last_screen;
                *last_screen = screen;
                if delta != Vec2::ZERO {
                    view.pan(delta);
                }
                false
            }
        }
    }

    /// Ends the gesture, returning to idle. Also used to abandon a drag when
    /// the document is replaced underneath it (import).
    pub fn end(&mut self) {
        *self = DragGesture::Idle;
    }
}
