use crate::playback_state::PlaybackState;
use crate::services::{ClipPlayer, PlayerStatus};
use crate::utils::progress_fraction;
use eframe::egui;
use egui::{Color32, Mesh, Pos2, Rect, TextureHandle};

/// Full-window clip surface with the readability gradient on top.
#[derive(Default)]
pub struct Stage {
    /// Poster texture keyed by the player's reload generation
    texture: Option<(u64, Option<TextureHandle>)>,
}

impl Stage {
    pub fn draw(
        &mut self,
        ui: &mut egui::Ui,
        player: &ClipPlayer,
        state: PlaybackState,
        zoom: f32,
    ) {
        let rect = ui.max_rect();
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::BLACK);

        match self.texture_for(ui.ctx(), player) {
            Some(texture) => {
                let dest = cover_rect(texture.size_vec2(), rect, zoom);
                painter.image(
                    texture.id(),
                    dest,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    state.status_message(),
                    egui::FontId::proportional(20.0),
                    Color32::from_white_alpha(40),
                );
            }
        }

        painter.add(vertical_gradient(
            rect,
            Color32::from_black_alpha(100),
            Color32::TRANSPARENT,
            Color32::from_black_alpha(230),
        ));

        if state.is_intro() && player.status() == PlayerStatus::Playing {
            let fraction = progress_fraction(player.position(), player.duration());
            let bar = Rect::from_min_size(
                Pos2::new(rect.min.x, rect.max.y - 3.0),
                egui::vec2(rect.width() * fraction, 3.0),
            );
            painter.rect_filled(bar, 0.0, Color32::from_white_alpha(120));
        }
    }

    fn texture_for(&mut self, ctx: &egui::Context, player: &ClipPlayer) -> Option<&TextureHandle> {
        let generation = player.generation();
        let stale = !matches!(&self.texture, Some((g, _)) if *g == generation);
        if stale {
            let handle = player.poster().map(|poster| {
                ctx.load_texture("stage_poster", (**poster).clone(), egui::TextureOptions::LINEAR)
            });
            self.texture = Some((generation, handle));
        }
        self.texture.as_ref().and_then(|(_, handle)| handle.as_ref())
    }
}

/// Destination rect that covers `frame` with an image of `image_size`,
/// keeping aspect ratio and scaling by `zoom` about the center.
pub fn cover_rect(image_size: egui::Vec2, frame: Rect, zoom: f32) -> Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return frame;
    }
    let scale = (frame.width() / image_size.x).max(frame.height() / image_size.y) * zoom;
    Rect::from_center_size(frame.center(), image_size * scale)
}

/// Three-stop gradient from the top edge through the middle to the bottom
fn vertical_gradient(rect: Rect, top: Color32, middle: Color32, bottom: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    let mid_y = rect.center().y;
    let rows = [(rect.min.y, top), (mid_y, middle), (rect.max.y, bottom)];

    for (y, color) in rows {
        mesh.colored_vertex(Pos2::new(rect.min.x, y), color);
        mesh.colored_vertex(Pos2::new(rect.max.x, y), color);
    }
    for band in 0..2u32 {
        let i = band * 2;
        mesh.add_triangle(i, i + 1, i + 2);
        mesh.add_triangle(i + 1, i + 3, i + 2);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_rect_fills_frame() {
        let frame = Rect::from_min_size(Pos2::ZERO, egui::vec2(1600.0, 900.0));
        let dest = cover_rect(egui::vec2(1000.0, 1000.0), frame, 1.0);
        assert_eq!(dest.width(), 1600.0);
        assert_eq!(dest.center(), frame.center());
        assert!(dest.height() >= frame.height());
    }

    #[test]
    fn test_cover_rect_zoom() {
        let frame = Rect::from_min_size(Pos2::ZERO, egui::vec2(100.0, 100.0));
        let dest = cover_rect(egui::vec2(100.0, 100.0), frame, 1.05);
        assert!((dest.width() - 105.0).abs() < 1e-3);
    }

    #[test]
    fn test_gradient_mesh_shape() {
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(10.0, 10.0));
        let mesh = vertical_gradient(rect, Color32::BLACK, Color32::TRANSPARENT, Color32::BLACK);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices.len(), 12);
    }
}
