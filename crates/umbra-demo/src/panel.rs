//! Top-right debug panel holding the custom-depth toggle.
//!
//! No text rendering: the label lives in the window title.

use glam::Vec2;
use umbra_engine::coords::Rect;
use umbra_engine::paint::Color;
use umbra_engine::render::SolidRect;

/// A checkbox toggle drawn from solid rects.
#[derive(Debug, Clone)]
pub struct Checkbox {
    checked: bool,
    box_size: f32,
    bg: Color,
    checked_color: Color,
    border_color: Color,
    hover_border_color: Color,
    border_width: f32,
}

impl Checkbox {
    pub fn new() -> Self {
        Self {
            checked: false,
            box_size: 16.0,
            bg: Color::linear(0.1, 0.12, 0.18),
            checked_color: Color::linear(0.2, 0.65, 1.0),
            border_color: Color::linear(0.35, 0.45, 0.6),
            hover_border_color: Color::linear(0.6, 0.7, 0.9),
            border_width: 1.5,
        }
    }

    pub fn checked(mut self, v: bool) -> Self { self.checked = v; self }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, v: bool) {
        self.checked = v;
    }

    pub fn size(&self) -> f32 {
        self.box_size
    }

    /// Flips the state when `pos` is inside `rect`; returns the new state.
    pub fn on_click(&mut self, pos: Vec2, rect: Rect) -> Option<bool> {
        if !rect.contains(pos) {
            return None;
        }
        self.checked = !self.checked;
        Some(self.checked)
    }

    /// Rects back to front: border, fill, then the mark when checked.
    pub fn paint(&self, rect: Rect, hovered: bool) -> Vec<SolidRect> {
        let border = if hovered && !self.checked { self.hover_border_color } else { self.border_color };
        let fill = match (self.checked, hovered) {
            (true, true) => brighten(self.checked_color, 0.1),
            (true, false) => self.checked_color,
            (false, _) => self.bg,
        };

        let mut out = vec![
            SolidRect::new(rect, border),
            SolidRect::new(rect.inset(self.border_width), fill),
        ];
        if self.checked {
            out.push(SolidRect::new(rect.inset(self.box_size * 0.22), Color::WHITE.with_alpha(0.9)));
        }
        out
    }
}

impl Default for Checkbox { fn default() -> Self { Self::new() } }

fn brighten(c: Color, d: f32) -> Color {
    Color { r: (c.r + d).min(1.0), g: (c.g + d).min(1.0), b: (c.b + d).min(1.0), a: c.a }
}

/// Where the panel and its checkbox sit for a given window size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PanelLayout {
    pub panel: Rect,
    pub checkbox: Rect,
}

/// Panel anchored to the top-right corner, in logical pixels.
#[derive(Debug, Clone)]
pub struct DebugPanel {
    pub checkbox: Checkbox,
    margin: f32,
    padding: f32,
    bg: Color,
}

impl DebugPanel {
    pub fn new(checkbox: Checkbox) -> Self {
        Self {
            checkbox,
            margin: 12.0,
            padding: 8.0,
            bg: Color::linear(0.02, 0.02, 0.03).with_alpha(0.75),
        }
    }

    pub fn layout(&self, viewport: Vec2) -> PanelLayout {
        let side = self.checkbox.size() + self.padding * 2.0;
        let panel = Rect::new(viewport.x - self.margin - side, self.margin, side, side);
        PanelLayout { panel, checkbox: panel.inset(self.padding) }
    }

    pub fn paint(&self, viewport: Vec2, pointer: Option<Vec2>) -> Vec<SolidRect> {
        let layout = self.layout(viewport);
        let hovered = pointer.is_some_and(|p| layout.checkbox.contains(p));

        let mut out = vec![SolidRect::new(layout.panel, self.bg)];
        out.extend(self.checkbox.paint(layout.checkbox, hovered));
        out
    }

    /// Routes a click; `Some(state)` when it toggled the checkbox.
    pub fn click(&mut self, pos: Vec2, viewport: Vec2) -> Option<bool> {
        let layout = self.layout(viewport);
        self.checkbox.on_click(pos, layout.checkbox)
    }
}
