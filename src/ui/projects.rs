//! Project button grid and per-button hover tracking.
//!
//! egui reports hover as a per-frame flag, so the tracker turns it into
//! enter/leave edges. Leaves are reported before enters, which is the order a
//! browser fires them when the pointer moves straight from one button to the
//! next.

use crate::config::ProjectLink;
use eframe::egui;

/// Pointer crossing a button boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEdge {
    Enter(usize),
    Leave(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectAction {
    PointerEnter,
    PointerLeave,
    Open(String),
}

#[derive(Debug, Default)]
pub struct HoverTracker {
    hovered: Vec<bool>,
}

impl HoverTracker {
    /// Hover flags seen on the previous frame
    pub fn is_hovered(&self, index: usize) -> bool {
        self.hovered.get(index).copied().unwrap_or(false)
    }

    /// Compare this frame's hover flags with the last frame's.
    pub fn observe(&mut self, hovered: &[bool]) -> Vec<HoverEdge> {
        let mut leaves = Vec::new();
        let mut enters = Vec::new();

        for index in 0..self.hovered.len().max(hovered.len()) {
            let before = self.is_hovered(index);
            let now = hovered.get(index).copied().unwrap_or(false);
            match (before, now) {
                (false, true) => enters.push(HoverEdge::Enter(index)),
                (true, false) => leaves.push(HoverEdge::Leave(index)),
                _ => {}
            }
        }

        self.hovered = hovered.to_vec();
        leaves.extend(enters);
        leaves
    }
}

pub struct ProjectGrid;

impl ProjectGrid {
    pub fn draw(
        ui: &mut egui::Ui,
        tagline: &str,
        projects: &[ProjectLink],
        tracker: &mut HoverTracker,
    ) -> Vec<ProjectAction> {
        let mut actions = Vec::new();
        let mut hovered = Vec::with_capacity(projects.len());

        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(tagline.to_uppercase())
                    .size(13.0)
                    .color(egui::Color32::from_white_alpha(150)),
            );
            ui.add_space(16.0);

            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing = egui::vec2(16.0, 16.0);
                for (index, project) in projects.iter().enumerate() {
                    let response = project_button(ui, project, tracker.is_hovered(index));
                    hovered.push(response.hovered());
                    if response.clicked() {
                        if let Some(url) = &project.url {
                            actions.push(ProjectAction::Open(url.clone()));
                        }
                    }
                }
            });
        });

        // Hover edges before clicks.
        let edges = tracker.observe(&hovered);
        let mut ordered: Vec<ProjectAction> = edges
            .into_iter()
            .map(|edge| match edge {
                HoverEdge::Enter(_) => ProjectAction::PointerEnter,
                HoverEdge::Leave(_) => ProjectAction::PointerLeave,
            })
            .collect();
        ordered.extend(actions);
        ordered
    }
}

/// Stateless project button
fn project_button(ui: &mut egui::Ui, project: &ProjectLink, hovered: bool) -> egui::Response {
    let accent = super::accent_color(&project.accent);
    let (fill, stroke) = if hovered {
        (accent.gamma_multiply(0.8), egui::Stroke::new(1.5, accent))
    } else {
        (
            egui::Color32::from_black_alpha(100),
            egui::Stroke::new(1.0, egui::Color32::from_white_alpha(25)),
        )
    };

    let mut text = egui::text::LayoutJob::default();
    text.append(
        &project.label,
        0.0,
        egui::TextFormat {
            font_id: egui::FontId::proportional(14.0),
            color: egui::Color32::WHITE,
            ..Default::default()
        },
    );
    text.append(
        &format!("\n{}", project.subtitle),
        0.0,
        egui::TextFormat {
            font_id: egui::FontId::proportional(10.0),
            color: egui::Color32::from_white_alpha(150),
            ..Default::default()
        },
    );
    text.halign = egui::Align::Center;

    let response = ui.add_sized(
        [124.0, 124.0],
        egui::Button::new(text)
            .fill(fill)
            .stroke(stroke)
            .corner_radius(16.0),
    );

    if project.url.is_some() {
        response.on_hover_cursor(egui::CursorIcon::PointingHand)
    } else {
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_then_leave() {
        let mut tracker = HoverTracker::default();
        assert_eq!(tracker.observe(&[false, true]), vec![HoverEdge::Enter(1)]);
        assert!(tracker.observe(&[false, true]).is_empty());
        assert_eq!(tracker.observe(&[false, false]), vec![HoverEdge::Leave(1)]);
    }

    #[test]
    fn test_moving_between_buttons_leaves_first() {
        let mut tracker = HoverTracker::default();
        tracker.observe(&[true, false, false]);

        let edges = tracker.observe(&[false, false, true]);
        assert_eq!(edges, vec![HoverEdge::Leave(0), HoverEdge::Enter(2)]);
    }

    #[test]
    fn test_shrinking_list_releases_hover() {
        let mut tracker = HoverTracker::default();
        tracker.observe(&[false, false, true]);

        assert_eq!(tracker.observe(&[false]), vec![HoverEdge::Leave(2)]);
        assert!(!tracker.is_hovered(2));
    }
}
