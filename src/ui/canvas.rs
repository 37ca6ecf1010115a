//! Canvas interaction handling.
//!
//! Pointer input over the canvas widget drives four things: discrete zoom
//! steps from the scroll wheel, the drag gesture (node moves and canvas
//! pans), selection clicks including connection completion, and double-click
//! node creation / in-place label editing.

use eframe::egui::{self, Pos2, Rect, Vec2};

use crate::constants::{NEW_IDEA_LABEL, NODE_HEIGHT, NODE_WIDTH};
use crate::geometry;
use crate::selection::ClickOutcome;
use crate::types::{NodeId, NodeType};
use crate::ui::state::{LabelEdit, MindmapApp};
use crate::viewport::ZoomDirection;

impl MindmapApp {
    /// Draws the canvas and handles all interaction with it.
    ///
    /// Returns `true` if the document changed this frame.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) -> bool {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;
        self.session.canvas_rect = Some(rect);

        let mut changed = false;
        self.handle_canvas_zoom(ui, rect);
        changed |= self.handle_canvas_pointer(ui, &response, rect);

        let pointer = ui.input(|i| i.pointer.latest_pos());
        self.render_map(&painter, rect, pointer);

        changed |= self.draw_label_editor(ui, rect);
        changed
    }

    /// Applies one discrete zoom step per frame of scroll-wheel input,
    /// anchored on the cursor so the point under it stays put.
    fn handle_canvas_zoom(&mut self, ui: &egui::Ui, rect: Rect) {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll == 0.0 {
            return;
        }
        let Some(pos) = ui.input(|i| i.pointer.hover_pos()) else {
            return;
        };
        if !rect.contains(pos) {
            return;
        }
        let direction = if scroll > 0.0 {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        };
        self.session.viewport.zoom(direction, pos, rect);
    }

    /// Routes presses, drags, clicks and double-clicks on the canvas.
    fn handle_canvas_pointer(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        rect: Rect,
    ) -> bool {
        let mut changed = false;

        if ui.input(|i| i.pointer.primary_pressed()) {
            if let Some(pos) = ui.input(|i| i.pointer.interact_pos()) {
                if rect.contains(pos) {
                    changed |= self.handle_press(pos, rect);
                }
            }
        }

        if self.session.gesture.is_active() {
            if let Some(pos) = ui.input(|i| i.pointer.latest_pos()) {
                changed |= self.session.gesture.pointer_moved(
                    pos,
                    &mut self.mindmap,
                    &mut self.session.viewport,
                );
            }
            if ui.input(|i| i.pointer.any_released()) {
                self.session.gesture.end();
            }
        }

        let multi = ui.input(|i| i.modifiers.shift);
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                changed |= self.handle_click(pos, rect, multi);
            }
        }
        if response.double_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                changed |= self.handle_double_click(pos, rect);
            }
        }

        changed
    }

    /// A primary-button press either starts a node drag (pressing a node) or
    /// clears the selection and starts a canvas pan (pressing empty space).
    ///
    /// A press outside an open label editor commits the edit first, the same
    /// way a text field commits on focus loss.
    fn handle_press(&mut self, screen: Pos2, rect: Rect) -> bool {
        let mut changed = false;
        if self.session.label_edit.is_some() {
            if let Some(editor) = self.label_editor_rect(rect) {
                if editor.contains(screen) {
                    return false;
                }
            }
            changed |= self.finish_label_edit(true);
        }

        let canvas_pos = self.session.viewport.screen_to_canvas(screen, rect);
        match geometry::node_at_position(&self.mindmap, canvas_pos) {
            Some(id) => {
                // The moving set is captured once at press time.
                let moving = self.session.selection.drag_targets(&id);
                self.session.gesture.begin_node_drag(moving, screen);
            }
            None => {
                self.session.selection.clear();
                self.session.gesture.begin_canvas_pan(screen);
            }
        }
        changed
    }

    /// A completed click on a node either finishes a pending connection
    /// gesture or updates the selection. Clicks on empty space do nothing
    /// here; the press already cleared the selection.
    fn handle_click(&mut self, screen: Pos2, rect: Rect, multi: bool) -> bool {
        let canvas_pos = self.session.viewport.screen_to_canvas(screen, rect);
        let Some(id) = geometry::node_at_position(&self.mindmap, canvas_pos) else {
            return false;
        };
        match self.session.selection.click(&id, multi) {
            ClickOutcome::Connect { from, to } => self.mindmap.connect(&from, &to),
            ClickOutcome::Selected => false,
        }
    }

    /// Double-clicking a node opens the label editor; double-clicking empty
    /// space creates a new node there and selects it.
    fn handle_double_click(&mut self, screen: Pos2, rect: Rect) -> bool {
        self.session.gesture.end();
        let canvas_pos = self.session.viewport.screen_to_canvas(screen, rect);
        match geometry::node_at_position(&self.mindmap, canvas_pos) {
            Some(id) => {
                self.start_label_edit(&id);
                false
            }
            None => {
                self.create_node_at(canvas_pos);
                true
            }
        }
    }

    /// Creates a new idea node at a canvas position and selects it.
    pub fn create_node_at(&mut self, canvas_pos: Pos2) -> NodeId {
        let id = self
            .mindmap
            .add_node(canvas_pos, NodeType::Sub, NEW_IDEA_LABEL);
        self.session.selection.select_only(&id);
        id
    }

    /// Opens the in-canvas label editor on a node. No-op if the node is gone.
    pub fn start_label_edit(&mut self, id: &NodeId) {
        if let Some(node) = self.mindmap.node(id) {
            self.session.label_edit = Some(LabelEdit {
                node: id.clone(),
                text: node.text.clone(),
                focus_requested: false,
            });
        }
    }

    /// Closes the label editor. On commit the buffered text is applied to the
    /// node (trimmed, with the empty-label fallback); on cancel the node is
    /// left untouched.
    ///
    /// Returns `true` if the document changed.
    pub fn finish_label_edit(&mut self, commit: bool) -> bool {
        let Some(edit) = self.session.label_edit.take() else {
            return false;
        };
        if !commit {
            return false;
        }
        self.mindmap.edit_text(&edit.node, &edit.text)
    }

    /// Zooms one step around the canvas center, for the toolbar buttons.
    pub fn zoom_view(&mut self, direction: ZoomDirection) {
        if let Some(rect) = self.session.canvas_rect {
            self.session.viewport.zoom(direction, rect.center(), rect);
        }
    }

    /// The screen rectangle the label editor overlays: the edited node's
    /// rectangle at the current zoom. `None` if no edit is open or the node
    /// no longer exists.
    fn label_editor_rect(&self, rect: Rect) -> Option<Rect> {
        let edit = self.session.label_edit.as_ref()?;
        let node = self.mindmap.node(&edit.node)?;
        let center = self.session.viewport.canvas_to_screen(node.position(), rect);
        let size = Vec2::new(NODE_WIDTH, NODE_HEIGHT) * self.session.viewport.scale;
        Some(Rect::from_center_size(center, size))
    }

    /// Draws the floating label editor, if one is open.
    ///
    /// Enter commits, Shift+Enter inserts a newline, Escape cancels, and
    /// losing focus commits.
    fn draw_label_editor(&mut self, ui: &mut egui::Ui, rect: Rect) -> bool {
        if self.session.label_edit.is_none() {
            return false;
        }
        let Some(editor_rect) = self.label_editor_rect(rect) else {
            // The edited node disappeared underneath the editor.
            self.session.label_edit = None;
            return false;
        };

        let (commit, cancel) = ui.input(|i| {
            (
                i.key_pressed(egui::Key::Enter) && !i.modifiers.shift,
                i.key_pressed(egui::Key::Escape),
            )
        });

        let font_size = (13.0 * self.session.viewport.scale).clamp(8.0, 48.0);
        let font = egui::FontId::proportional(font_size);
        let mut lost_focus = false;

        egui::Area::new(egui::Id::new("node_label_editor"))
            .fixed_pos(editor_rect.min)
            .show(ui.ctx(), |ui| {
                if let Some(edit) = self.session.label_edit.as_mut() {
                    let widget = egui::TextEdit::multiline(&mut edit.text)
                        .font(font)
                        .desired_width(editor_rect.width());
                    let response = ui.add_sized(editor_rect.size(), widget);
                    if !edit.focus_requested {
                        response.request_focus();
                        edit.focus_requested = true;
                    }
                    lost_focus = response.lost_focus();
                }
            });

        if cancel {
            self.finish_label_edit(false);
            false
        } else if commit || lost_focus {
            self.finish_label_edit(true)
        } else {
            false
        }
    }
}
