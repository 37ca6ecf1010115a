//! # Mindcanvas
//!
//! A visual mind-mapping canvas for sketching ideas as colored nodes joined
//! by curved connections. Nodes come in three types:
//! - **Root**: The central idea of a map
//! - **Main**: Primary branches off the root
//! - **Sub**: Leaf-level ideas
//!
//! ## Features
//! - Double-click node creation and in-place label editing
//! - Node dragging with multi-selection, canvas panning and cursor-anchored zoom
//! - Click-to-connect gesture with a live dashed preview
//! - JSON import/export, plus SVG and PNG image export
//! - Workspace persistence between sessions

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod examples;
pub mod geometry;
pub mod gesture;
pub mod selection;
pub mod types;
pub mod viewport;

mod ui;

pub use gesture::DragGesture;
pub use selection::{ClickOutcome, SelectionState};
pub use types::{Connection, Mindmap, MindmapNode, NodeId, NodeType};
pub use ui::MindmapApp;
pub use viewport::{Viewport, ZoomDirection};

/// Runs the mind-map application with default settings.
///
/// This function initializes the egui application window and starts the main
/// event loop. Any state saved by a previous session is restored from the
/// eframe storage layer; otherwise a starter map is seeded.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an
/// `eframe::Error` if initialization fails.
///
/// # Example
///
/// ```no_run
/// use mindcanvas::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Mindcanvas",
        options,
        Box::new(|cc| Ok(Box::new(MindmapApp::restore(cc.storage)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mindmap_default() {
        let map = Mindmap::default();
        assert!(map.nodes.is_empty());
        assert!(map.connections.is_empty());
    }

    #[test]
    fn test_app_default_seeds_starter_map() {
        let app = MindmapApp::default();
        assert_eq!(app.mindmap.nodes.len(), 3);
        assert_eq!(app.mindmap.connections.len(), 2);
        assert!(app.session.selection.is_empty());
    }
}
