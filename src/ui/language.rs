use crate::config::LanguageLabel;
use crate::playback_state::{Language, PlaybackState};
use eframe::egui;

pub struct LanguageBar;

impl LanguageBar {
    /// Draw both language buttons; returns the language clicked this frame.
    pub fn draw(
        ui: &mut egui::Ui,
        state: PlaybackState,
        primary: &LanguageLabel,
        secondary: &LanguageLabel,
    ) -> Option<Language> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 16.0;
            for (language, label) in [(Language::Primary, primary), (Language::Secondary, secondary)] {
                let active = state.language() == Some(language);
                if Self::button(ui, label, active).clicked() {
                    action = Some(language);
                }
            }
        });

        action
    }

    fn button(ui: &mut egui::Ui, label: &LanguageLabel, active: bool) -> egui::Response {
        let accent = super::accent_color(&label.accent);
        let (fill, stroke) = if active {
            (accent.gamma_multiply(0.8), egui::Stroke::new(1.5, accent))
        } else {
            (
                egui::Color32::from_white_alpha(25),
                egui::Stroke::new(1.0, egui::Color32::from_white_alpha(50)),
            )
        };

        let text = egui::RichText::new(format!("{}  {}", label.flag, label.greeting))
            .size(16.0)
            .color(egui::Color32::WHITE);

        ui.add(
            egui::Button::new(text)
                .fill(fill)
                .stroke(stroke)
                .corner_radius(24.0)
                .min_size(egui::vec2(180.0, 44.0)),
        )
    }
}
