//! Viewport pan/zoom state and coordinate transformations.
//!
//! The viewport maps between screen space (pointer positions in pixels) and
//! canvas space (the logical coordinates node positions are stored in). It is
//! session-only state: it is never serialized into the mind-map document.

use egui::{Pos2, Rect, Vec2};

use crate::constants::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};

/// Direction of a discrete zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Magnify (scale up)
    In,
    /// Shrink (scale down)
    Out,
}

/// Pan offset and zoom scale of the mind-map canvas.
///
/// The transform is computed relative to the canvas widget's live on-screen
/// rectangle, which is passed into every conversion rather than cached: the
/// canvas can move and resize between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Pan offset in screen pixels, applied after scaling
    pub offset: Vec2,
    /// Zoom scale, clamped to `[MIN_ZOOM, MAX_ZOOM]`
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Creates a viewport at the origin with no zoom.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts a screen position to canvas coordinates.
    ///
    /// # Arguments
    ///
    /// * `screen_pos` - Position in screen space (pixels)
    /// * `canvas_rect` - The canvas widget's current on-screen rectangle
    ///
    /// # Returns
    ///
    /// The corresponding position in canvas space, or the canvas origin if
    /// the rectangle is degenerate (zero-sized or non-finite), so that a not
    /// yet laid-out canvas can never produce NaN coordinates.
    pub fn screen_to_canvas(&self, screen_pos: Pos2, canvas_rect: Rect) -> Pos2 {
        if !rect_is_usable(canvas_rect) {
            return Pos2::ZERO;
        }
        let local = screen_pos - canvas_rect.min;
        ((local - self.offset) / self.scale).to_pos2()
    }

    /// Converts a canvas position to screen coordinates.
    ///
    /// # Arguments
    ///
    /// * `canvas_pos` - Position in canvas space
    /// * `canvas_rect` - The canvas widget's current on-screen rectangle
    ///
    /// # Returns
    ///
    /// The corresponding position in screen space (pixels), or the rectangle
    /// origin if the rectangle is degenerate.
    pub fn canvas_to_screen(&self, canvas_pos: Pos2, canvas_rect: Rect) -> Pos2 {
        if !rect_is_usable(canvas_rect) {
            return canvas_rect.min;
        }
        canvas_rect.min + self.offset + canvas_pos.to_vec2() * self.scale
    }

    /// Applies one discrete zoom step around a screen-space anchor point.
    ///
    /// The scale is multiplied (or divided) by the zoom step factor and
    /// clamped; the pan offset is then adjusted so the canvas point that was
    /// under `screen_center` before the zoom stays under it afterwards.
    ///
    /// # Arguments
    ///
    /// * `direction` - Whether to zoom in or out
    /// * `screen_center` - The screen point to keep visually fixed
    /// * `canvas_rect` - The canvas widget's current on-screen rectangle
    pub fn zoom(&mut self, direction: ZoomDirection, screen_center: Pos2, canvas_rect: Rect) {
        let factor = match direction {
            ZoomDirection::In => ZOOM_STEP,
            ZoomDirection::Out => 1.0 / ZOOM_STEP,
        };
        let old_scale = self.scale;
        let new_scale = (old_scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_scale - old_scale).abs() <= f32::EPSILON {
            return;
        }

        // Anchor before the scale changes; a degenerate rect anchors at the
        // origin, which leaves the offset untouched.
        let anchor = self.screen_to_canvas(screen_center, canvas_rect);
        self.scale = new_scale;
        self.offset -= anchor.to_vec2() * (new_scale - old_scale);
    }

    /// Translates the view by a screen-space delta.
    ///
    /// Panning is deliberately not scaled by zoom: a fixed pointer travel
    /// always pans the view by the same number of pixels at any zoom level.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Restores the origin view: no pan, no zoom.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The current zoom as a percentage, for status displays.
    pub fn zoom_percent(&self) -> i32 {
        (self.scale * 100.0).round() as i32
    }
}

fn rect_is_usable(rect: Rect) -> bool {
    rect.is_finite() && rect.width() > 0.0 && rect.height() > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas_rect() -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_default_viewport_is_identity() {
        let view = Viewport::new();
        let rect = canvas_rect();

        let canvas = view.screen_to_canvas(Pos2::new(150.0, 80.0), rect);

        assert_eq!(canvas, Pos2::new(50.0, 30.0));
    }

    #[test]
    fn test_screen_canvas_roundtrip() {
        let view = Viewport {
            offset: Vec2::new(40.0, -25.0),
            scale: 1.5,
        };
        let rect = canvas_rect();
        let screen = Pos2::new(400.0, 300.0);

        let canvas = view.screen_to_canvas(screen, rect);
        let back = view.canvas_to_screen(canvas, rect);

        assert!((back - screen).length() < 1e-3);
    }

    #[test]
    fn test_degenerate_rect_yields_safe_origin() {
        let view = Viewport::new();
        let empty = Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::ZERO);

        let canvas = view.screen_to_canvas(Pos2::new(500.0, 500.0), empty);

        assert_eq!(canvas, Pos2::ZERO);
        assert!(canvas.x.is_finite() && canvas.y.is_finite());
    }

    #[test]
    fn test_zoom_in_multiplies_scale_by_step() {
        let mut view = Viewport::new();
        let rect = canvas_rect();

        view.zoom(ZoomDirection::In, rect.center(), rect);

        assert!((view.scale - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_clamps_at_bounds() {
        let rect = canvas_rect();

        let mut view = Viewport::new();
        for _ in 0..50 {
            view.zoom(ZoomDirection::In, rect.center(), rect);
        }
        assert!((view.scale - 3.0).abs() < 1e-6);

        let mut view = Viewport::new();
        for _ in 0..50 {
            view.zoom(ZoomDirection::Out, rect.center(), rect);
        }
        assert!((view.scale - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_at_clamp_leaves_offset_unchanged() {
        let rect = canvas_rect();
        let mut view = Viewport {
            offset: Vec2::new(12.0, 34.0),
            scale: 3.0,
        };

        view.zoom(ZoomDirection::In, Pos2::new(250.0, 250.0), rect);

        assert_eq!(view.offset, Vec2::new(12.0, 34.0));
        assert!((view.scale - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_keeps_anchor_point_fixed() {
        let rect = canvas_rect();
        let mut view = Viewport {
            offset: Vec2::new(-120.0, 60.0),
            scale: 0.8,
        };
        let cursor = Pos2::new(400.0, 320.0);

        let before = view.screen_to_canvas(cursor, rect);
        view.zoom(ZoomDirection::In, cursor, rect);
        let after = view.screen_to_canvas(cursor, rect);

        assert!((after - before).length() < 1e-3);
    }

    #[test]
    fn test_pan_is_unscaled() {
        let mut view = Viewport {
            offset: Vec2::ZERO,
            scale: 2.0,
        };

        view.pan(Vec2::new(10.0, -4.0));

        assert_eq!(view.offset, Vec2::new(10.0, -4.0));
    }

    #[test]
    fn test_reset_restores_identity() {
        let mut view = Viewport {
            offset: Vec2::new(99.0, 99.0),
            scale: 2.5,
        };

        view.reset();

        assert_eq!(view, Viewport::default());
    }

    #[test]
    fn test_zoom_percent() {
        let view = Viewport {
            offset: Vec2::ZERO,
            scale: 1.21,
        };

        assert_eq!(view.zoom_percent(), 121);
    }
}
