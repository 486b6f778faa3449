pub mod language;
pub mod projects;
pub mod stage;

use crate::config::parse_hex_color;
use egui::Color32;

/// Accent color from config, white when unparsable
pub fn accent_color(hex: &str) -> Color32 {
    parse_hex_color(hex)
        .map(|[r, g, b]| Color32::from_rgb(r, g, b))
        .unwrap_or(Color32::WHITE)
}
