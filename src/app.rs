//! Huvudapplikation för Legacy Flow

use eframe::egui;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

use crate::models::AppSettings;
use crate::services::{AudioOutput, ContentService, GeminiClient, RecitationEvent, Reciter, SpeakerOutput};
use crate::ui::{
    modals::AlertDialog,
    state::AppState,
    theme::{configure_style, Colors, Icons},
    views::{FamilyTreeView, GuideView, HomeView, SettingsView, SilsilaView},
    StatusType, View,
};
use crate::utils::AppResult;

/// Huvudapplikation
pub struct LegacyFlowApp {
    state: AppState,
    app_settings: AppSettings,
    gemini: Arc<GeminiClient>,
    reciter: Reciter,

    // Vyer
    home: HomeView,
    family_tree: FamilyTreeView,
    silsila: SilsilaView,
    guide: GuideView,
    settings: SettingsView,

    // Intern
    applied_dark_mode: Option<bool>,
}

impl LegacyFlowApp {
    /// Skapa ny applikation
    pub fn new(cc: &eframe::CreationContext<'_>, app_settings: AppSettings, runtime: Handle) -> AppResult<Self> {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let gemini = Arc::new(GeminiClient::new(&app_settings)?);
        if !gemini.has_api_key() {
            tracing::info!("Ingen API-nyckel konfigurerad");
        }

        let content: Arc<dyn ContentService> = gemini.clone();
        let audio: Arc<dyn AudioOutput> = Arc::new(SpeakerOutput::new());
        let reciter = Reciter::new(Arc::clone(&content), audio, runtime.clone());

        let mut state = AppState::new();
        state.dark_mode = app_settings.dark_mode;

        Ok(Self {
            state,
            app_settings,
            gemini,
            reciter,
            home: HomeView::new(),
            family_tree: FamilyTreeView::new(content, runtime),
            silsila: SilsilaView::new(),
            guide: GuideView::new(),
            settings: SettingsView::new(),
            applied_dark_mode: None,
        })
    }

    /// Hantera navigation och uppdatera relevanta vyer
    fn handle_view_change(&mut self, new_view: View) {
        match new_view {
            View::FamilyTree => self.family_tree.mark_needs_refresh(),
            View::Settings => self.settings.mark_needs_refresh(),
            View::Home | View::Silsila | View::Guide => {}
        }
    }

    fn navigate_to(&mut self, view: View) {
        let old = self.state.current_view;
        self.state.current_view = view;
        if old != view {
            self.handle_view_change(view);
        }
    }

    /// Bygg om klienten efter ändrade inställningar
    fn apply_settings(&mut self) {
        self.state.settings_changed = false;

        match GeminiClient::new(&self.app_settings) {
            Ok(client) => {
                self.gemini = Arc::new(client);
                let content: Arc<dyn ContentService> = self.gemini.clone();
                self.reciter.set_content(Arc::clone(&content));
                self.family_tree.set_content(content);
                tracing::info!("Inställningar tillämpade");
            }
            Err(e) => {
                tracing::error!("Kunde inte skapa klient: {}", e);
                self.state.show_error(&format!("Kunde inte tillämpa inställningar: {}", e));
            }
        }
    }

    fn handle_recitation_events(&mut self, ctx: &egui::Context) {
        for event in self.reciter.poll_events() {
            match event {
                RecitationEvent::Finished { id } => {
                    tracing::debug!("Uppläsning {} klar", id);
                }
                RecitationEvent::Failed { message, .. } => {
                    self.state.show_alert(&format!("Uppläsningen misslyckades: {}", message));
                }
            }
        }

        if self.reciter.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Legacy Flow");
                ui.separator();

                let nav_items = [
                    (View::Home, Icons::HOME),
                    (View::FamilyTree, Icons::TREE),
                    (View::Silsila, Icons::CHAIN),
                    (View::Guide, Icons::BOOK),
                ];

                for (view, icon) in nav_items {
                    let label = format!("{} {}", icon, view.label());
                    if ui.selectable_label(self.state.current_view == view, label).clicked() {
                        self.navigate_to(view);
                    }
                }

                // Höger sida
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mode_icon = if self.state.dark_mode { "🌙" } else { "☀" };
                    if ui.button(mode_icon).on_hover_text("Växla tema").clicked() {
                        self.state.dark_mode = !self.state.dark_mode;
                        self.app_settings.dark_mode = self.state.dark_mode;
                        if let Err(e) = self.app_settings.save() {
                            tracing::warn!("Kunde inte spara tema: {}", e);
                        }
                    }

                    if ui
                        .selectable_label(self.state.current_view == View::Settings, Icons::SETTINGS)
                        .on_hover_text(View::Settings.label())
                        .clicked()
                    {
                        self.navigate_to(View::Settings);
                    }

                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                            .small()
                            .weak(),
                    );
                });
            });
        });
    }
}

impl eframe::App for LegacyFlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Stil vid start och vid temabyte
        if self.applied_dark_mode != Some(self.state.dark_mode) {
            configure_style(ctx, self.state.dark_mode);
            self.applied_dark_mode = Some(self.state.dark_mode);
        }

        self.state.clear_old_status();
        self.handle_recitation_events(ctx);

        if self.state.settings_changed {
            self.apply_settings();
        }

        self.show_top_bar(ctx);

        // Statusbar
        if let Some(ref status) = self.state.status_message {
            egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                let color = match status.status_type {
                    StatusType::Success => Colors::SUCCESS,
                    StatusType::Error => Colors::ERROR,
                    StatusType::Info => Colors::INFO,
                };
                ui.colored_label(color, &status.text);
            });
        }

        // Huvudinnehåll
        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.gemini.has_api_key() && self.state.current_view != View::Settings {
                self.settings.show_key_gate(ui, &mut self.state, &mut self.app_settings);
                return;
            }

            match self.state.current_view {
                View::Home => {
                    let before = self.state.current_view;
                    self.home.show(ui, &mut self.state);
                    if self.state.current_view != before {
                        self.handle_view_change(self.state.current_view);
                    }
                }
                View::FamilyTree => {
                    self.family_tree.show(ui, &mut self.state, &self.reciter);
                }
                View::Silsila => {
                    self.silsila.show(ui, &mut self.state, &self.reciter);
                }
                View::Guide => {
                    self.guide.show(ui, &mut self.state, &self.reciter);
                }
                View::Settings => {
                    self.settings.show(ui, &mut self.state, &mut self.app_settings);
                }
            }
        });

        // Modals
        AlertDialog::show(ctx, &mut self.state);
    }
}
