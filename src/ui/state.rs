//! Application state management structures.
//!
//! This module contains the main application struct that owns the mind-map
//! document and the session state around it, plus the bookkeeping for async
//! file operations.

use crate::examples::starter_map;
use crate::gesture::DragGesture;
use crate::selection::SelectionState;
use crate::types::{Mindmap, NodeId};
use crate::viewport::Viewport;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// An in-canvas label edit in progress on one node.
///
/// The text is buffered here until the edit is committed, so an edit canceled
/// with Escape leaves the node untouched.
#[derive(Debug, Clone)]
pub struct LabelEdit {
    /// The node whose label is being edited
    pub node: NodeId,
    /// The working copy of the label text
    pub text: String,
    /// Whether the editor widget has requested focus yet
    pub focus_requested: bool,
}

/// Session-only interaction state: everything that exists for the duration of
/// one run of the app and is never persisted.
#[derive(Default)]
pub struct SessionState {
    /// Current pan offset and zoom scale of the canvas
    pub viewport: Viewport,
    /// Selected nodes plus the armed connection source, if any
    pub selection: SelectionState,
    /// The active drag gesture, if any
    pub gesture: DragGesture,
    /// In-canvas label edit in progress, if any
    pub label_edit: Option<LabelEdit>,
    /// The canvas widget's on-screen rectangle from the last frame; used by
    /// toolbar zoom buttons, which zoom around the canvas center
    pub canvas_rect: Option<egui::Rect>,
}

/// State related to file operations.
///
/// Import and export run asynchronously (file dialogs, browser downloads);
/// their results come back to the UI thread over a channel and are drained at
/// the start of each frame.
pub struct FileState {
    /// Pending import operation, picked up at the start of the next frame
    pub pending_import: Option<PendingImportOperation>,
    /// Pending export operation, picked up at the start of the next frame
    pub pending_export: Option<PendingExportOperation>,
    /// Sending half handed to async file operations
    pub sender: Option<Sender<FileOperationResult>>,
    /// Receiving half drained on the UI thread each frame
    pub receiver: Option<Receiver<FileOperationResult>>,
    /// Most recent user-visible error (failed import, I/O failure)
    pub last_error: Option<String>,
    /// Most recent user-visible status message (completed import/export)
    pub status: Option<String>,
}

impl Default for FileState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            pending_import: None,
            pending_export: None,
            sender: Some(sender),
            receiver: Some(receiver),
            last_error: None,
            status: None,
        }
    }
}

/// Represents a pending import operation type.
#[derive(Debug)]
pub enum PendingImportOperation {
    /// Show a file picker and load the chosen JSON document
    PickJson,
}

/// Represents a pending export operation type.
#[derive(Debug)]
pub enum PendingExportOperation {
    /// Serialize the document and offer it as `mindmap.json`
    SaveJson,
}

/// Messages sent from async file operations back to the main app.
#[derive(Debug)]
pub enum FileOperationResult {
    /// An import file was read successfully: (file name, raw content)
    ImportLoaded(String, String),
    /// An export completed successfully with the given path or file name
    ExportCompleted(String),
    /// Operation failed with an error message
    OperationFailed(String),
}

/// The main application structure owning the mind-map document and UI state.
///
/// This struct implements the `eframe::App` trait. The document and a few
/// display preferences persist across sessions through the eframe storage
/// layer; viewport, selection and gesture state are session-only.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct MindmapApp {
    /// The mind-map document being edited
    pub mindmap: Mindmap,
    /// Whether the background grid is drawn
    pub show_grid: bool,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Remembered width of the properties panel across sessions
    pub properties_panel_width: f32,
    /// Session-only viewport/selection/gesture state
    #[serde(skip)]
    pub session: SessionState,
    /// File operations state
    #[serde(skip)]
    pub file: FileState,
}

impl Default for MindmapApp {
    fn default() -> Self {
        Self {
            mindmap: starter_map(),
            show_grid: true,
            dark_mode: true,
            properties_panel_width: 300.0,
            session: SessionState::default(),
            file: FileState::default(),
        }
    }
}

impl MindmapApp {
    /// Serializes the application state to JSON for the persistence layer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes application state from JSON.
    ///
    /// The embedded document is sanitized on the way in, so a hand-edited
    /// storage blob cannot violate the graph invariants.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut app: MindmapApp = serde_json::from_str(json)?;
        app.mindmap.sanitize();
        Ok(app)
    }

    /// Restores the app from eframe storage, falling back to the defaults
    /// (a fresh workspace seeded with the starter map).
    pub fn restore(storage: Option<&dyn eframe::Storage>) -> Self {
        let Some(json) = storage.and_then(|s| s.get_string("app_state")) else {
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(app) => app,
            Err(err) => {
                log::warn!("Discarding unreadable stored app state: {err}");
                Self::default()
            }
        }
    }
}
