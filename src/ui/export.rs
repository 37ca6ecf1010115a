//! Export utilities: render the current mind map to SVG and PNG.
//!
//! Notes:
//! - SVG export is supported on all targets (native + wasm).
//! - PNG export is supported on native targets only (wasm skipped).

use crate::constants;
use crate::geometry;
use crate::types::NodeType;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

use super::state::MindmapApp;
#[cfg(not(target_arch = "wasm32"))]
use super::state::FileOperationResult;

/// Margin around the content in exported images, in canvas units.
const EXPORT_MARGIN: f32 = 40.0;

/// Hex fill for a node of the given type, matching the canvas colors.
fn node_fill_hex(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Root => "#6366f1",
        NodeType::Main => "#10b981",
        NodeType::Sub => "#f59e42",
    }
}

impl MindmapApp {
    /// Exports the document to SVG: a save dialog on native, a download on
    /// wasm.
    pub fn export_svg(&mut self, ctx: &eframe::egui::Context) {
        let (svg, _w, _h) = self.build_svg(ctx);
        self.deliver_export(ctx, "mindmap.svg", svg);
    }

    /// Exports the document to PNG (native builds only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn export_png(&mut self, ctx: &eframe::egui::Context) {
        let (svg, width, height) = self.build_svg(ctx);
        let sender = self.file.sender.clone();

        use tiny_skia::Pixmap;

        let mut opt = usvg::Options::default();
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        opt.fontdb = Arc::new(db);

        let tree = match usvg::Tree::from_data(svg.as_bytes(), &opt) {
            Ok(t) => t,
            Err(e) => {
                self.file.last_error = Some(format!("PNG export failed: {e}"));
                log::error!("Failed to parse SVG for PNG export: {e}");
                return;
            }
        };

        // Rasterize at 2x for crisp text.
        let scale = 2.0_f32;
        let out_w = ((width as f32) * scale).round().max(1.0) as u32;
        let out_h = ((height as f32) * scale).round().max(1.0) as u32;

        let mut pixmap = match Pixmap::new(out_w, out_h) {
            Some(p) => p,
            None => {
                self.file.last_error = Some(format!("PNG export failed: pixmap {out_w}x{out_h}"));
                log::error!("Failed to create pixmap {out_w}x{out_h}");
                return;
            }
        };
        pixmap.fill(tiny_skia::Color::WHITE);

        let mut pmut = pixmap.as_mut();
        let transform = tiny_skia::Transform::from_scale(scale, scale);
        resvg::render(&tree, transform, &mut pmut);

        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter("PNG", &["png"])
                .set_file_name("mindmap.png")
                .save_file()
                .await
            {
                let path = handle.path();
                let result = match pixmap.save_png(path) {
                    Ok(()) => FileOperationResult::ExportCompleted(path.display().to_string()),
                    Err(e) => {
                        FileOperationResult::OperationFailed(format!("Failed to save PNG: {e}"))
                    }
                };
                if let Some(tx) = sender {
                    let _ = tx.send(result);
                }
            }
            ctx.request_repaint();
        });
    }

    /// Builds an SVG rendition of the document. Returns (svg, width, height).
    ///
    /// The image covers the bounding box of all node rectangles plus a fixed
    /// margin. The grid is included when it is enabled on the canvas.
    pub(crate) fn build_svg(&self, ctx: &eframe::egui::Context) -> (String, u32, u32) {
        let node_w = constants::NODE_WIDTH;
        let node_h = constants::NODE_HEIGHT;

        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for node in &self.mindmap.nodes {
            let rect = geometry::node_rect(node);
            min_x = min_x.min(rect.min.x);
            max_x = max_x.max(rect.max.x);
            min_y = min_y.min(rect.min.y);
            max_y = max_y.max(rect.max.y);
        }
        // Empty document: export a small blank canvas.
        if !min_x.is_finite() || !min_y.is_finite() {
            min_x = 0.0;
            min_y = 0.0;
            max_x = node_w;
            max_y = node_h;
        }

        let width = ((max_x - min_x) + 2.0 * EXPORT_MARGIN).ceil().max(1.0) as u32;
        let height = ((max_y - min_y) + 2.0 * EXPORT_MARGIN).ceil().max(1.0) as u32;

        let map_x = |x: f32| x - min_x + EXPORT_MARGIN;
        let map_y = |y: f32| y - min_y + EXPORT_MARGIN;

        let mut out = String::new();
        use std::fmt::Write as _;

        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
            width, height, width, height
        );

        if self.show_grid {
            let grid = constants::GRID_SIZE.max(4.0);
            let _ = writeln!(
                out,
                "<g stroke=\"#cccccc\" stroke-opacity=\"0.25\" stroke-width=\"1\">"
            );
            let start_x = (min_x / grid).floor() * grid;
            let end_x = (max_x / grid).ceil() * grid;
            let mut x = start_x;
            while x <= end_x {
                let sx = map_x(x);
                let _ = writeln!(out, "  <line x1=\"{sx}\" y1=\"0\" x2=\"{sx}\" y2=\"{height}\" />");
                x += grid;
            }
            let start_y = (min_y / grid).floor() * grid;
            let end_y = (max_y / grid).ceil() * grid;
            let mut y = start_y;
            while y <= end_y {
                let sy = map_y(y);
                let _ = writeln!(out, "  <line x1=\"0\" y1=\"{sy}\" x2=\"{width}\" y2=\"{sy}\" />");
                y += grid;
            }
            let _ = writeln!(out, "</g>");
        }

        // Connections as cubic Bezier paths, using the same control-point
        // construction as the canvas.
        let _ = writeln!(out, "<g stroke=\"#8c8c8c\" stroke-width=\"2\" fill=\"none\">");
        for conn in &self.mindmap.connections {
            if let Some(curve) = geometry::connection_curve(&self.mindmap, conn) {
                let _ = writeln!(
                    out,
                    "  <path d=\"M{:.1},{:.1} C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}\" />",
                    map_x(curve.from.x),
                    map_y(curve.from.y),
                    map_x(curve.control1.x),
                    map_y(curve.control1.y),
                    map_x(curve.control2.x),
                    map_y(curve.control2.y),
                    map_x(curve.to.x),
                    map_y(curve.to.y),
                );
            }
        }
        let _ = writeln!(out, "</g>");

        // Nodes
        for node in &self.mindmap.nodes {
            let cx = map_x(node.x);
            let cy = map_y(node.y);
            let x = cx - node_w / 2.0;
            let y = cy - node_h / 2.0;
            let radius = constants::NODE_CORNER_RADIUS;
            let _ = writeln!(
                out,
                "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" stroke=\"#00000040\" stroke-width=\"1.5\" />",
                x,
                y,
                node_w,
                node_h,
                node_fill_hex(node.node_type),
                r = radius
            );

            // Label: wrapped with egui metrics so the SVG matches the canvas.
            let base_font_size = 13.0;
            let font_id = eframe::egui::FontId::proportional(base_font_size);
            let line_height = ctx.fonts_mut(|f| f.row_height(&font_id));
            let max_w = (node_w - 12.0).max(10.0);
            let lines = wrap_label(ctx, &node.text, max_w, &font_id);
            let total_h = line_height * lines.len() as f32;
            let start_y = cy - total_h / 2.0 + line_height * 0.75;
            let _ = writeln!(
                out,
                "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"{}\" fill=\"#ffffff\" text-anchor=\"middle\">",
                cx, start_y, base_font_size
            );
            for (i, line) in lines.iter().enumerate() {
                let escaped = escape_xml(line);
                if i == 0 {
                    let _ = writeln!(out, "  <tspan x=\"{cx:.1}\" dy=\"0\">{escaped}</tspan>");
                } else {
                    let _ = writeln!(
                        out,
                        "  <tspan x=\"{cx:.1}\" dy=\"{line_height:.1}\">{escaped}</tspan>"
                    );
                }
            }
            let _ = writeln!(out, "</text>");
        }

        let _ = writeln!(out, "</svg>");

        (out, width, height)
    }
}

/// Escapes the five XML special characters in text content.
pub(crate) fn escape_xml(input: &str) -> String {
    let mut s = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            _ => s.push(ch),
        }
    }
    s
}

/// Word-wraps a label using egui font metrics, respecting explicit newlines.
fn wrap_label(
    ctx: &eframe::egui::Context,
    text: &str,
    max_width: f32,
    font_id: &eframe::egui::FontId,
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
            let width = ctx.fonts_mut(|f| {
                f.layout_no_wrap(
                    test_line.clone(),
                    font_id.clone(),
                    eframe::egui::Color32::BLACK,
                )
                .size()
                .x
            });
            if width <= max_width {
                current_line = test_line;
            } else if !current_line.is_empty() {
                lines.push(current_line);
                current_line = word.to_string();
            } else {
                // A single word longer than max width goes on its own line
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
