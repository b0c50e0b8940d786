// src/ui.rs - Theme, video widget and frame overlays
use eframe::egui::{self, Color32, Pos2, Rect, Stroke, Vec2};
use image::DynamicImage;

use crate::gesture::Zone;
use crate::landmarks::{landmark, LandmarkSet};

#[derive(Debug, Clone)]
pub struct Theme {
    pub zone_active: Color32,
    pub zone_idle: Color32,
    pub bone: Color32,
    pub joint: Color32,
    pub surface: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub success: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            zone_active: Color32::from_rgb(76, 175, 80),
            zone_idle: Color32::from_rgb(244, 67, 54),
            bone: Color32::from_rgb(70, 130, 240),
            joint: Color32::from_rgb(255, 152, 0),
            surface: Color32::from_rgb(30, 30, 35),
            text_primary: Color32::WHITE,
            text_secondary: Color32::from_rgb(200, 200, 200),
            success: Color32::from_rgb(76, 175, 80),
        }
    }
}

/// Bone segments of the hand skeleton, as landmark index pairs.
#[rustfmt::skip]
const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (landmark::WRIST, landmark::THUMB_CMC),
    (landmark::THUMB_CMC, landmark::THUMB_MCP),
    (landmark::THUMB_MCP, landmark::THUMB_IP),
    (landmark::THUMB_IP, landmark::THUMB_TIP),
    (landmark::WRIST, landmark::INDEX_FINGER_MCP),
    (landmark::INDEX_FINGER_MCP, landmark::INDEX_FINGER_PIP),
    (landmark::INDEX_FINGER_PIP, landmark::INDEX_FINGER_DIP),
    (landmark::INDEX_FINGER_DIP, landmark::INDEX_FINGER_TIP),
    (landmark::INDEX_FINGER_MCP, landmark::MIDDLE_FINGER_MCP),
    (landmark::MIDDLE_FINGER_MCP, landmark::MIDDLE_FINGER_PIP),
    (landmark::MIDDLE_FINGER_PIP, landmark::MIDDLE_FINGER_DIP),
    (landmark::MIDDLE_FINGER_DIP, landmark::MIDDLE_FINGER_TIP),
    (landmark::MIDDLE_FINGER_MCP, landmark::RING_FINGER_MCP),
    (landmark::RING_FINGER_MCP, landmark::RING_FINGER_PIP),
    (landmark::RING_FINGER_PIP, landmark::RING_FINGER_DIP),
    (landmark::RING_FINGER_DIP, landmark::RING_FINGER_TIP),
    (landmark::RING_FINGER_MCP, landmark::PINKY_MCP),
    (landmark::WRIST, landmark::PINKY_MCP),
    (landmark::PINKY_MCP, landmark::PINKY_PIP),
    (landmark::PINKY_PIP, landmark::PINKY_DIP),
    (landmark::PINKY_DIP, landmark::PINKY_TIP),
];

/// Map a point in frame pixel coordinates onto the widget rect the frame
/// is displayed in.
pub fn map_point(frame_size: (u32, u32), rect: Rect, x: f32, y: f32) -> Pos2 {
    let (fw, fh) = frame_size;
    Pos2::new(
        rect.left() + x / fw as f32 * rect.width(),
        rect.top() + y / fh as f32 * rect.height(),
    )
}

/// Draw the active-zone rectangle with its caption. The stroke color
/// signals whether the hand currently sits inside the zone.
pub fn draw_zone(
    painter: &egui::Painter,
    rect: Rect,
    frame_size: (u32, u32),
    zone: Zone,
    hand_in_zone: bool,
    theme: &Theme,
) {
    let top_left = map_point(frame_size, rect, zone.left, zone.top);
    let bottom_right = map_point(frame_size, rect, zone.right, zone.bottom);
    let zone_rect = Rect::from_min_max(top_left, bottom_right);

    let color = if hand_in_zone {
        theme.zone_active
    } else {
        theme.zone_idle
    };

    painter.rect_stroke(zone_rect, egui::Rounding::ZERO, Stroke::new(3.0, color));
    painter.text(
        Pos2::new(zone_rect.left(), zone_rect.top() - 8.0),
        egui::Align2::LEFT_BOTTOM,
        "Active Zone",
        egui::FontId::proportional(16.0),
        color,
    );
}

/// Draw the detected hand skeleton over the displayed frame.
pub fn draw_landmarks(
    painter: &egui::Painter,
    rect: Rect,
    frame_size: (u32, u32),
    landmarks: &LandmarkSet,
    theme: &Theme,
) {
    for (from, to) in HAND_CONNECTIONS {
        if let (Some(a), Some(b)) = (landmarks.get(from), landmarks.get(to)) {
            painter.line_segment(
                [
                    map_point(frame_size, rect, a.x, a.y),
                    map_point(frame_size, rect, b.x, b.y),
                ],
                Stroke::new(2.0, theme.bone),
            );
        }
    }

    for lm in landmarks.iter() {
        painter.circle_filled(map_point(frame_size, rect, lm.x, lm.y), 3.0, theme.joint);
    }
}

// Custom widget for video display
pub struct VideoWidget {
    texture: Option<egui::TextureHandle>,
    aspect_ratio: f32,
}

impl VideoWidget {
    pub fn new() -> Self {
        Self {
            texture: None,
            aspect_ratio: 16.0 / 9.0,
        }
    }

    pub fn update_frame(&mut self, ctx: &egui::Context, frame: &DynamicImage) {
        let size = [frame.width() as _, frame.height() as _];
        let rgba = frame.to_rgba8();
        let pixels = rgba.as_flat_samples();

        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
        self.aspect_ratio = frame.width() as f32 / frame.height().max(1) as f32;
        self.texture = Some(ctx.load_texture("video_frame", color_image, Default::default()));
    }

    /// Show the current frame and return the rect it was painted into, so
    /// the caller can paint overlays in the same coordinate space.
    pub fn show(&self, ui: &mut egui::Ui, theme: &Theme) -> Rect {
        let available_size = ui.available_size();
        let widget_width = available_size.x;
        let widget_height = widget_width / self.aspect_ratio;

        let size = Vec2::new(widget_width, widget_height);
        let (rect, _response) = ui.allocate_exact_size(size, egui::Sense::hover());

        if let Some(texture) = &self.texture {
            ui.painter().image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        } else {
            ui.painter()
                .rect_filled(rect, egui::Rounding::same(4.0), theme.surface);
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No Video Signal",
                egui::FontId::proportional(16.0),
                theme.text_secondary,
            );
        }

        rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_point_scales_into_widget_rect() {
        let rect = Rect::from_min_max(Pos2::new(10.0, 20.0), Pos2::new(650.0, 380.0));
        let mapped = map_point((1280, 720), rect, 640.0, 360.0);
        assert_eq!(mapped, rect.center());

        let origin = map_point((1280, 720), rect, 0.0, 0.0);
        assert_eq!(origin, rect.min);
    }
}
