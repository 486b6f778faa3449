use crate::assets::ClipLibrary;
use crate::config::AppConfig;
use crate::controller::PlaybackController;
use crate::metrics::PlaybackMetrics;
use crate::services::{ClipPlayer, PlayerStatus};
use crate::ui::language::LanguageBar;
use crate::ui::projects::{HoverTracker, ProjectAction, ProjectGrid};
use crate::ui::stage::Stage;
use crate::utils::format_clock;
use eframe::egui;
use std::time::Duration;

/// Frame interval while a clip is running
const PLAYBACK_REPAINT: Duration = Duration::from_millis(33);

pub struct PortfolioApp {
    config: AppConfig,
    controller: PlaybackController<ClipPlayer>,
    stage: Stage,
    hover: HoverTracker,
}

impl PortfolioApp {
    pub fn new(config: AppConfig) -> Self {
        let library = ClipLibrary::from_config(&config.clips);
        let player = ClipPlayer::new(&config.playback);
        let metrics = PlaybackMetrics::new(&config.metrics);

        Self {
            controller: PlaybackController::mount(player, library, metrics),
            stage: Stage::default(),
            hover: HoverTracker::default(),
            config,
        }
    }

    fn handle_project_actions(&mut self, ctx: &egui::Context, actions: Vec<ProjectAction>) {
        for action in actions {
            match action {
                ProjectAction::PointerEnter => self.controller.on_pointer_enter(),
                ProjectAction::PointerLeave => self.controller.on_pointer_leave(),
                ProjectAction::Open(url) => {
                    tracing::info!(%url, "Opening project link");
                    ctx.open_url(egui::OpenUrl::new_tab(url));
                }
            }
        }
    }

    fn debug_window(&self, ctx: &egui::Context) {
        let player = self.controller.surface();
        egui::Window::new("Debug")
            .default_open(false)
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
            .show(ctx, |ui| {
                ui.monospace(format!("State: {}", self.controller.state()));
                ui.monospace(format!("Player: {:?}", player.status()));
                ui.monospace(format!(
                    "Clip: {} / {}",
                    format_clock(player.position()),
                    format_clock(player.duration())
                ));
                ui.monospace(format!(
                    "muted={} loop={}",
                    player.is_muted(),
                    player.is_looping()
                ));
                ui.separator();
                self.controller.metrics().summary().ui_panel(ui);
            });
    }
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.pump();

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                self.stage.draw(
                    ui,
                    self.controller.surface(),
                    self.controller.state(),
                    self.config.ui.stage_zoom,
                );
            });

        let clicked = egui::Area::new(egui::Id::new("language_bar"))
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 32.0))
            .show(ctx, |ui| {
                LanguageBar::draw(
                    ui,
                    self.controller.state(),
                    &self.config.ui.primary,
                    &self.config.ui.secondary,
                )
            })
            .inner;
        if let Some(language) = clicked {
            self.controller.request_intro(language);
        }

        let actions = egui::Area::new(egui::Id::new("project_grid"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -48.0))
            .show(ctx, |ui| {
                ui.set_max_width(ctx.screen_rect().width().min(900.0));
                ProjectGrid::draw(
                    ui,
                    &self.config.ui.tagline,
                    &self.config.projects,
                    &mut self.hover,
                )
            })
            .inner;
        self.handle_project_actions(ctx, actions);

        if self.config.ui.show_debug_panel {
            self.debug_window(ctx);
        }

        if matches!(
            self.controller.surface().status(),
            PlayerStatus::Playing | PlayerStatus::Starting
        ) {
            ctx.request_repaint_after(PLAYBACK_REPAINT);
        }
    }
}
