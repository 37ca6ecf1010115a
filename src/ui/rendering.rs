//! Canvas rendering functionality for nodes, connections, and grid.
//!
//! This module handles all drawing operations: the background grid over the
//! drawable bounds, curved connections, the dashed connection preview, the
//! nodes themselves and the canvas overlays (empty-state hint, connect
//! banner).

use super::state::MindmapApp;
use crate::constants::GRID_SIZE;
use crate::geometry;
use crate::types::{Connection, MindmapNode, NodeType};
use eframe::egui;
use eframe::epaint::{CubicBezierShape, StrokeKind};

/// Fill color for a node of the given type.
fn node_fill(node_type: NodeType) -> egui::Color32 {
    match node_type {
        NodeType::Root => egui::Color32::from_rgb(99, 102, 241),
        NodeType::Main => egui::Color32::from_rgb(16, 185, 129),
        NodeType::Sub => egui::Color32::from_rgb(245, 158, 66),
    }
}

impl MindmapApp {
    /// Renders all mind-map elements on the canvas.
    ///
    /// Elements are drawn in layers: grid first (background), then committed
    /// connections, then the connection preview, then nodes, then overlays,
    /// ensuring proper visual hierarchy.
    ///
    /// # Arguments
    ///
    /// * `painter` - The egui painter for drawing operations
    /// * `canvas_rect` - The screen-space rectangle of the canvas area
    /// * `pointer` - Current pointer position, if any (drives the preview)
    pub fn render_map(
        &self,
        painter: &egui::Painter,
        canvas_rect: egui::Rect,
        pointer: Option<egui::Pos2>,
    ) {
        if self.show_grid {
            self.draw_grid(painter, canvas_rect);
        }

        for connection in &self.mindmap.connections {
            self.draw_connection(painter, canvas_rect, connection);
        }

        if let Some(source) = self.session.selection.connecting_from() {
            if let (Some(node), Some(pointer)) = (self.mindmap.node(source), pointer) {
                self.draw_connection_preview(painter, canvas_rect, node, pointer);
            }
        }

        for node in &self.mindmap.nodes {
            self.draw_node(painter, canvas_rect, node);
        }

        if self.mindmap.nodes.is_empty() {
            self.draw_empty_hint(painter, canvas_rect);
        }
        if self.session.selection.connecting_from().is_some() {
            self.draw_connect_banner(painter, canvas_rect);
        }
    }

    /// Draws a zoom-aware grid over the drawable content bounds.
    ///
    /// Only the part of the bounds currently on screen is iterated, and the
    /// grid is skipped entirely when zoomed out far enough that the lines
    /// would smear together.
    fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let screen_grid_size = GRID_SIZE * self.session.viewport.scale;
        if screen_grid_size < 2.0 {
            return;
        }

        let grid_color = egui::Color32::from_rgba_unmultiplied(128, 128, 128, 32);
        let stroke = egui::Stroke::new(1.0, grid_color);

        // Visible canvas region, clipped to the drawable bounds.
        let top_left = self
            .session
            .viewport
            .screen_to_canvas(canvas_rect.min, canvas_rect);
        let bottom_right = self
            .session
            .viewport
            .screen_to_canvas(canvas_rect.max, canvas_rect);
        let visible = egui::Rect::from_min_max(top_left, bottom_right)
            .intersect(geometry::content_bounds(&self.mindmap));
        if visible.width() <= 0.0 || visible.height() <= 0.0 {
            return;
        }

        let min_screen = self.session.viewport.canvas_to_screen(visible.min, canvas_rect);
        let max_screen = self.session.viewport.canvas_to_screen(visible.max, canvas_rect);

        let start_x = (visible.min.x / GRID_SIZE).floor() * GRID_SIZE;
        let end_x = (visible.max.x / GRID_SIZE).ceil() * GRID_SIZE;
        let mut x = start_x;
        while x <= end_x {
            let screen_x = self
                .session
                .viewport
                .canvas_to_screen(egui::pos2(x, 0.0), canvas_rect)
                .x;
            if screen_x >= canvas_rect.min.x && screen_x <= canvas_rect.max.x {
                painter.line_segment(
                    [
                        egui::pos2(screen_x, min_screen.y.max(canvas_rect.min.y)),
                        egui::pos2(screen_x, max_screen.y.min(canvas_rect.max.y)),
                    ],
                    stroke,
                );
            }
            x += GRID_SIZE;
        }

        let start_y = (visible.min.y / GRID_SIZE).floor() * GRID_SIZE;
        let end_y = (visible.max.y / GRID_SIZE).ceil() * GRID_SIZE;
        let mut y = start_y;
        while y <= end_y {
            let screen_y = self
                .session
                .viewport
                .canvas_to_screen(egui::pos2(0.0, y), canvas_rect)
                .y;
            if screen_y >= canvas_rect.min.y && screen_y <= canvas_rect.max.y {
                painter.line_segment(
                    [
                        egui::pos2(min_screen.x.max(canvas_rect.min.x), screen_y),
                        egui::pos2(max_screen.x.min(canvas_rect.max.x), screen_y),
                    ],
                    stroke,
                );
            }
            y += GRID_SIZE;
        }
    }

    /// Renders a committed connection as a cubic Bezier curve.
    ///
    /// A connection with either endpoint selected is drawn highlighted.
    /// Connections whose endpoints no longer resolve draw nothing.
    fn draw_connection(
        &self,
        painter: &egui::Painter,
        canvas_rect: egui::Rect,
        connection: &Connection,
    ) {
        let Some(curve) = geometry::connection_curve(&self.mindmap, connection) else {
            return;
        };
        let points = curve
            .points()
            .map(|p| self.session.viewport.canvas_to_screen(p, canvas_rect));

        let highlighted = self.session.selection.is_selected(&connection.from)
            || self.session.selection.is_selected(&connection.to);
        let (color, width) = if highlighted {
            (egui::Color32::from_rgb(100, 150, 255), 3.0)
        } else {
            (egui::Color32::from_gray(140), 2.0)
        };

        painter.add(CubicBezierShape::from_points_stroke(
            points,
            false,
            egui::Color32::TRANSPARENT,
            egui::Stroke::new(width * self.session.viewport.scale.min(1.5), color),
        ));
    }

    /// Renders the dashed preview curve from the armed source node to the
    /// pointer while a connection gesture is pending.
    fn draw_connection_preview(
        &self,
        painter: &egui::Painter,
        canvas_rect: egui::Rect,
        source: &MindmapNode,
        pointer: egui::Pos2,
    ) {
        let target = self.session.viewport.screen_to_canvas(pointer, canvas_rect);
        let curve = geometry::curve_between(source.position(), target);
        let points = curve
            .points()
            .map(|p| self.session.viewport.canvas_to_screen(p, canvas_rect));

        let color = egui::Color32::from_rgb(100, 150, 255);
        let shape = CubicBezierShape::from_points_stroke(
            points,
            false,
            egui::Color32::TRANSPARENT,
            egui::Stroke::new(2.0, color),
        );
        let flattened = shape.flatten(Some(0.5));
        painter.extend(egui::Shape::dashed_line(
            &flattened,
            egui::Stroke::new(2.0, color),
            5.0,
            5.0,
        ));
        painter.circle_filled(points[3], 4.0, color);
    }

    /// Renders a single node with appropriate styling and text.
    ///
    /// Nodes are color-coded by type. Selected nodes get a blue border and
    /// the armed connection source gets a yellow one.
    fn draw_node(&self, painter: &egui::Painter, canvas_rect: egui::Rect, node: &MindmapNode) {
        let scale = self.session.viewport.scale;
        let world_rect = geometry::node_rect(node);
        let screen_pos = self
            .session
            .viewport
            .canvas_to_screen(node.position(), canvas_rect);
        let scaled_size = world_rect.size() * scale;
        let rect = egui::Rect::from_center_size(screen_pos, scaled_size);
        if !rect.intersects(canvas_rect) {
            return;
        }

        let corner = crate::constants::NODE_CORNER_RADIUS * scale;
        painter.rect_filled(rect, corner, node_fill(node.node_type));

        let armed = self.session.selection.connecting_from() == Some(&node.id);
        let (stroke_color, stroke_width) = if armed {
            (egui::Color32::YELLOW, 3.0)
        } else if self.session.selection.is_selected(&node.id) {
            (egui::Color32::from_rgb(100, 150, 255), 3.0)
        } else {
            (egui::Color32::from_black_alpha(64), 1.5)
        };
        painter.rect_stroke(
            rect,
            corner,
            egui::Stroke::new(stroke_width, stroke_color),
            StrokeKind::Outside,
        );

        // The editor overlay replaces the label while this node is edited.
        let editing = self
            .session
            .label_edit
            .as_ref()
            .is_some_and(|edit| edit.node == node.id);
        if !editing {
            self.draw_node_text(painter, node, screen_pos, scaled_size);
        }
    }

    /// Renders the node's label with wrapping and vertical centering.
    /// Font size scales with zoom level for readability.
    fn draw_node_text(
        &self,
        painter: &egui::Painter,
        node: &MindmapNode,
        pos: egui::Pos2,
        size: egui::Vec2,
    ) {
        let scale = self.session.viewport.scale;
        let text_rect = egui::Rect::from_center_size(
            pos,
            egui::vec2(size.x - 12.0 * scale, size.y - 8.0 * scale),
        );

        let scaled_font_size = (13.0 * scale).clamp(8.0, 48.0);
        let font_id = egui::FontId::proportional(scaled_font_size);

        let lines = wrap_text(&node.text, text_rect.width(), &font_id, painter);

        let line_height = painter.fonts_mut(|f| f.row_height(&font_id));
        let total_height = line_height * lines.len() as f32;
        let start_y = text_rect.center().y - total_height / 2.0 + line_height / 2.0;

        for (i, line) in lines.iter().enumerate() {
            let line_pos = egui::pos2(text_rect.center().x, start_y + i as f32 * line_height);
            painter.text(
                line_pos,
                egui::Align2::CENTER_CENTER,
                line,
                font_id.clone(),
                egui::Color32::WHITE,
            );
        }
    }

    /// Renders the centered hint shown when the document has no nodes.
    fn draw_empty_hint(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let color = egui::Color32::from_gray(if self.dark_mode { 180 } else { 90 });
        painter.text(
            canvas_rect.center() - egui::vec2(0.0, 14.0),
            egui::Align2::CENTER_CENTER,
            "Start Your Mindmap",
            egui::FontId::proportional(22.0),
            color,
        );
        painter.text(
            canvas_rect.center() + egui::vec2(0.0, 14.0),
            egui::Align2::CENTER_CENTER,
            "Double-click anywhere to add your first idea",
            egui::FontId::proportional(14.0),
            color.gamma_multiply(0.8),
        );
    }

    /// Renders the banner shown while a connection gesture is pending.
    fn draw_connect_banner(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let text = "Click another node to connect";
        let font_id = egui::FontId::proportional(14.0);
        let galley = painter.fonts_mut(|f| {
            f.layout_no_wrap(text.to_string(), font_id.clone(), egui::Color32::WHITE)
        });
        let center = egui::pos2(canvas_rect.center().x, canvas_rect.min.y + 24.0);
        let banner_rect =
            egui::Rect::from_center_size(center, galley.size() + egui::vec2(24.0, 12.0));
        painter.rect_filled(
            banner_rect,
            banner_rect.height() / 2.0,
            egui::Color32::from_rgb(100, 150, 255),
        );
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            text,
            font_id,
            egui::Color32::WHITE,
        );
    }
}

/// Wraps text to fit within the specified width, returning a vector of lines.
///
/// Explicit newlines in the label are respected; within each paragraph the
/// text breaks at word boundaries. If a single word is too long it goes on
/// its own line anyway.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    font_id: &egui::FontId,
    painter: &egui::Painter,
) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in words {
            let test_line = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };

            let text_width = painter.fonts_mut(|f| {
                f.layout_no_wrap(test_line.clone(), font_id.clone(), egui::Color32::BLACK)
                    .size()
                    .x
            });

            if text_width <= max_width {
                current_line = test_line;
            } else if !current_line.is_empty() {
                lines.push(current_line);
                current_line = word.to_string();
            } else {
                // Single word too long, add it anyway
                lines.push(word.to_string());
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(text.to_string());
    }

    lines
}
