//! Canvas-space geometry: connection curves, node rectangles, hit-testing
//! and the drawable content bounds.
//!
//! Everything here works purely in canvas coordinates; the rendering layer
//! transforms the results to screen space.

use egui::{Pos2, Rect, Vec2};

use crate::constants::{
    CANVAS_BOUNDS_MARGIN, CURVE_OFFSET_FACTOR, CURVE_OFFSET_MAX, EMPTY_CANVAS_HALF_EXTENT,
    NODE_HEIGHT, NODE_WIDTH,
};
use crate::types::{Connection, Mindmap, MindmapNode, NodeId};

/// A cubic Bezier curve between two node anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionCurve {
    /// Start anchor (source node position)
    pub from: Pos2,
    /// First control point
    pub control1: Pos2,
    /// Second control point
    pub control2: Pos2,
    /// End anchor (destination node position)
    pub to: Pos2,
}

impl ConnectionCurve {
    /// The four control points in order, ready for a cubic Bezier shape.
    pub fn points(&self) -> [Pos2; 4] {
        [self.from, self.control1, self.control2, self.to]
    }
}

/// Builds the curve between two anchor points.
///
/// The control points are pushed away from each endpoint by a fraction of
/// the per-axis distance, saturating at a cap so long edges do not bulge
/// without bound: `offset = min(|d|, cap) * factor` per axis, added to the
/// start anchor and subtracted from the end anchor.
pub fn curve_between(from: Pos2, to: Pos2) -> ConnectionCurve {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let offset = Vec2::new(
        dx.abs().min(CURVE_OFFSET_MAX) * CURVE_OFFSET_FACTOR,
        dy.abs().min(CURVE_OFFSET_MAX) * CURVE_OFFSET_FACTOR,
    );
    ConnectionCurve {
        from,
        control1: from + offset,
        control2: to - offset,
        to,
    }
}

/// Builds the curve for a committed connection.
///
/// # Returns
///
/// `None` if either endpoint does not resolve to a live node; a connection
/// that lost an endpoint draws nothing rather than drawing to the origin.
pub fn connection_curve(map: &Mindmap, connection: &Connection) -> Option<ConnectionCurve> {
    let from = map.node(&connection.from)?.position();
    let to = map.node(&connection.to)?.position();
    Some(curve_between(from, to))
}

/// The canvas-space rectangle a node occupies, centered on its position.
pub fn node_rect(node: &MindmapNode) -> Rect {
    Rect::from_center_size(node.position(), Vec2::new(NODE_WIDTH, NODE_HEIGHT))
}

/// Finds the topmost node containing a canvas-space point.
///
/// Later nodes draw over earlier ones, so the node list is scanned back to
/// front.
pub fn node_at_position(map: &Mindmap, canvas_pos: Pos2) -> Option<NodeId> {
    map.nodes
        .iter()
        .rev()
        .find(|node| node_rect(node).contains(canvas_pos))
        .map(|node| node.id.clone())
}

/// The drawable region of the canvas, in canvas coordinates.
///
/// An empty document gets a fixed extent centered on the origin; otherwise
/// the bounding box of all node positions expanded by a fixed margin, so the
/// background grows as nodes spread out.
pub fn content_bounds(map: &Mindmap) -> Rect {
    if map.nodes.is_empty() {
        return Rect::from_center_size(Pos2::ZERO, Vec2::splat(2.0 * EMPTY_CANVAS_HALF_EXTENT));
    }
    let mut bounds = Rect::NOTHING;
    for node in &map.nodes {
        bounds.extend_with(node.position());
    }
    bounds.expand(CANVAS_BOUNDS_MARGIN)
}
