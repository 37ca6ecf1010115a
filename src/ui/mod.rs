//! User interface components and rendering logic for the mind-map canvas.
//!
//! This module contains all the UI-related code including the main
//! application struct, canvas rendering, the properties panel, and user
//! interaction handling.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main MindmapApp
//! - `canvas` - Canvas zooming, panning, dragging and label editing
//! - `rendering` - Drawing nodes, connections, grid, and overlays
//! - `file_ops` - Import/export operations for native and WASM
//! - `export` - SVG and PNG image export

mod canvas;
mod export;
mod file_ops;
mod rendering;
mod state;


pub use state::MindmapApp;

use crate::examples;
use crate::types::{NodeId, NodeType};
use crate::viewport::ZoomDirection;
use eframe::egui;

impl eframe::App for MindmapApp {
    /// Persist entire app state between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => {
                storage.set_string("app_state", json);
            }
            Err(err) => {
                log::error!("Failed to serialize app state: {err}");
            }
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// Completed file operations are applied first, so an import replaces the
    /// document before any of this frame's input is interpreted against it.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context
    /// * `frame` - The eframe frame
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_pending_operations(ctx);
        self.handle_keyboard_shortcuts(ctx);

        // Top toolbar occupies full width and is independent of the properties panel
        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.draw_status_bar(ui);
        });

        // Use the remembered panel width when available, clamped to the viewport
        let viewport_width = ctx.input(|i| i.content_rect().width());
        let clamped_width = self
            .properties_panel_width
            .clamp(180.0, (viewport_width * 0.9).max(180.0));

        egui::SidePanel::right("properties_panel")
            .resizable(true)
            .default_width(clamped_width)
            .show(ctx, |ui| {
                // Capture the current width each frame so we can remember it
                let current_width = ui.available_width();
                let max_allowed = (viewport_width * 0.9).max(180.0);
                self.properties_panel_width = current_width.clamp(180.0, max_allowed);
                self.draw_properties_panel(ui);
            });

        // Central canvas area takes the remaining space
        egui::CentralPanel::default().show(ctx, |ui| {
            let changed = self.draw_canvas(ui);
            if changed {
                // A stale "Imported ..." message stops being useful once the
                // document moves on.
                self.file.status = None;
            }
        });
    }
}

impl MindmapApp {
    /// Handles the global keyboard shortcuts.
    ///
    /// All of them are suppressed while a text field has focus, so typing a
    /// label never deletes nodes.
    ///
    /// - Delete/Backspace removes the selected nodes
    /// - Escape clears the selection and any pending connection
    /// - C arms/disarms the single selected node as connection source
    /// - Tab adds a child to the single selected node
    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (delete, escape, connect, tab) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::C),
                i.key_pressed(egui::Key::Tab),
            )
        });

        if delete {
            self.delete_selected();
        }
        if escape {
            self.session.selection.clear();
        }
        if connect {
            if let Some(id) = self.session.selection.single().cloned() {
                self.session.selection.toggle_connect_source(&id);
            }
        }
        if tab {
            self.add_child_to_selection();
        }
    }

    /// Removes every selected node (and its connections) from the document.
    ///
    /// Returns `true` if the document changed.
    pub fn delete_selected(&mut self) -> bool {
        let ids: Vec<NodeId> = self.session.selection.selected().to_vec();
        if ids.is_empty() {
            return false;
        }
        if self
            .session
            .label_edit
            .as_ref()
            .is_some_and(|edit| ids.contains(&edit.node))
        {
            self.session.label_edit = None;
        }
        let changed = self.mindmap.remove_nodes(&ids);
        self.session.selection.clear();
        changed
    }

    /// Adds a child branch to the single selected node and selects it.
    ///
    /// Does nothing unless exactly one node is selected.
    pub fn add_child_to_selection(&mut self) -> Option<NodeId> {
        let parent = self.session.selection.single().cloned()?;
        let child = self.mindmap.add_child(&parent)?;
        self.session.selection.select_only(&child);
        Some(child)
    }

    /// Draws the top toolbar.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("New").on_hover_text("Start an empty map").clicked() {
                self.new_document();
            }
            ui.menu_button("Examples", |ui| {
                for info in examples::all_examples() {
                    if ui.button(info.name).clicked() {
                        self.load_example(info.kind);
                        ui.close();
                    }
                }
            });

            ui.separator();

            if ui.button("+").on_hover_text("Zoom in").clicked() {
                self.zoom_view(ZoomDirection::In);
            }
            if ui.button("Reset").on_hover_text("Reset view").clicked() {
                self.session.viewport.reset();
            }
            if ui.button("\u{2212}").on_hover_text("Zoom out").clicked() {
                self.zoom_view(ZoomDirection::Out);
            }

            ui.separator();

            if ui.button("Import").on_hover_text("Load a JSON file").clicked() {
                self.import_mindmap();
            }
            if ui.button("Export").on_hover_text("Save as JSON").clicked() {
                self.export_json();
            }
            if ui.button("SVG").on_hover_text("Export as SVG image").clicked() {
                let ctx = ui.ctx().clone();
                self.export_svg(&ctx);
            }
            #[cfg(not(target_arch = "wasm32"))]
            if ui.button("PNG").on_hover_text("Export as PNG image").clicked() {
                let ctx = ui.ctx().clone();
                self.export_png(&ctx);
            }

            ui.separator();

            ui.checkbox(&mut self.show_grid, "Grid");
            ui.checkbox(&mut self.dark_mode, "Dark");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{} nodes", self.mindmap.nodes.len()));
                ui.separator();
                ui.label(format!("{}%", self.session.viewport.zoom_percent()));
                if let Some(error) = &self.file.last_error {
                    ui.colored_label(egui::Color32::RED, error);
                } else if let Some(status) = &self.file.status {
                    ui.weak(status);
                }
            });
        });
    }

    /// Draws the bottom status bar with interaction hints.
    fn draw_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.weak("Double-click to add \u{2022} Drag to move \u{2022} Tab for child \u{2022} C to connect");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak(format!("Zoom: {}%", self.session.viewport.zoom_percent()));
            });
        });
    }

    /// Draws the right-side properties panel for the current selection.
    fn draw_properties_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Properties");
        ui.separator();

        match self.session.selection.len() {
            0 => self.draw_no_selection_info(ui),
            1 => {
                if let Some(id) = self.session.selection.single().cloned() {
                    self.draw_node_properties(ui, &id);
                }
            }
            n => self.draw_multi_selection_info(ui, n),
        }
    }

    /// Properties for a single selected node: label editor, type selector,
    /// position readout and the gesture buttons.
    fn draw_node_properties(&mut self, ui: &mut egui::Ui, id: &NodeId) {
        let Some((node_type, position)) = self
            .mindmap
            .node(id)
            .map(|node| (node.node_type, node.position()))
        else {
            return;
        };

        ui.label("Text:");
        let mut committed = None;
        if let Some(node) = self.mindmap.node_mut(id) {
            let response = ui.add(
                egui::TextEdit::multiline(&mut node.text)
                    .desired_rows(2)
                    .desired_width(f32::INFINITY),
            );
            if response.lost_focus() {
                committed = Some(node.text.clone());
            }
        }
        if let Some(text) = committed {
            // Re-applies through the document so trimming and the empty-label
            // fallback hold.
            self.mindmap.edit_text(id, &text);
        }

        ui.add_space(6.0);
        ui.label("Type:");
        let mut selected_type = node_type;
        egui::ComboBox::from_id_source("node_type_selector")
            .selected_text(selected_type.label())
            .show_ui(ui, |ui| {
                for t in NodeType::ALL {
                    ui.selectable_value(&mut selected_type, t, t.label());
                }
            });
        if selected_type != node_type {
            self.mindmap.set_node_type(id, selected_type);
        }

        ui.add_space(6.0);
        ui.label(format!("Position: ({:.0}, {:.0})", position.x, position.y));

        ui.add_space(10.0);
        let armed = self.session.selection.connecting_from() == Some(id);
        let connect_label = if armed { "Cancel Connect" } else { "Connect (C)" };
        if ui.button(connect_label).clicked() {
            self.session.selection.toggle_connect_source(id);
        }
        if ui.button("Add Child (Tab)").clicked() {
            self.add_child_to_selection();
        }
        if ui.button("Delete (Del)").clicked() {
            self.delete_selected();
        }
    }

    /// Summary shown while several nodes are selected.
    fn draw_multi_selection_info(&mut self, ui: &mut egui::Ui, count: usize) {
        ui.label(format!("{count} nodes selected"));
        ui.add_space(10.0);
        if ui.button("Delete Selected").clicked() {
            self.delete_selected();
        }
    }

    /// Document stats and hints shown when nothing is selected.
    fn draw_no_selection_info(&self, ui: &mut egui::Ui) {
        ui.label("No node selected");
        ui.add_space(10.0);
        ui.label(format!("Nodes: {}", self.mindmap.nodes.len()));
        ui.label(format!("Connections: {}", self.mindmap.connections.len()));
        ui.add_space(10.0);
        ui.colored_label(egui::Color32::GRAY, "Click a node to select it");
        ui.colored_label(egui::Color32::GRAY, "Shift+click for multi-select");
        ui.colored_label(egui::Color32::GRAY, "Double-click a node to rename it");
    }
}
