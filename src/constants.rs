//! Shared application-wide constants.
//! Centralizes tweakable values used across the canvas core and UI.

// Viewport
/// Multiplicative zoom factor applied per discrete zoom step.
pub const ZOOM_STEP: f32 = 1.1;
/// Lower bound for the viewport zoom scale.
pub const MIN_ZOOM: f32 = 0.2;
/// Upper bound for the viewport zoom scale.
pub const MAX_ZOOM: f32 = 3.0;

// Node dimensions
/// Node width in canvas units.
pub const NODE_WIDTH: f32 = 160.0;
/// Node height in canvas units.
pub const NODE_HEIGHT: f32 = 64.0;
/// Corner radius for node rectangles (in screen pixels after transform).
pub const NODE_CORNER_RADIUS: f32 = 10.0;

// Connection curves
/// Fraction of the endpoint distance used to offset Bezier control points.
pub const CURVE_OFFSET_FACTOR: f32 = 0.6;
/// Cap (in canvas units) on the per-axis distance fed into the control-point offset.
pub const CURVE_OFFSET_MAX: f32 = 200.0;

// Canvas bounds
/// Margin (in canvas units) added around the node bounding box for the drawable region.
pub const CANVAS_BOUNDS_MARGIN: f32 = 500.0;
/// Half-extent (in canvas units) of the drawable region when the document is empty.
pub const EMPTY_CANVAS_HALF_EXTENT: f32 = 1000.0;

// Grid/drawing
/// Grid cell size in canvas units.
pub const GRID_SIZE: f32 = 40.0;

// Node creation
/// Offset (in canvas units) from a parent node at which a child node is placed.
pub const CHILD_NODE_OFFSET: (f32, f32) = (150.0, 100.0);
/// Label given to a node whose text was committed empty.
pub const DEFAULT_NODE_LABEL: &str = "New Node";
/// Label given to a node created by double-clicking empty canvas.
pub const NEW_IDEA_LABEL: &str = "New Idea";
/// Label given to a child node created from a selected parent.
pub const NEW_CHILD_LABEL: &str = "New Branch";
