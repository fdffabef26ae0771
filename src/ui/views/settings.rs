use egui::{self, RichText};

use crate::models::AppSettings;
use crate::ui::{
    state::AppState,
    theme::{Colors, Icons},
};

pub struct SettingsView {
    api_key: String,
    voice_name: String,
    bio_model: String,
    tts_model: String,
    request_timeout_secs: u64,
    max_attempts: u32,
    needs_refresh: bool,
    status_message: Option<String>,
}

impl SettingsView {
    pub fn new() -> Self {
        Self {
            api_key: String::new(),
            voice_name: String::new(),
            bio_model: String::new(),
            tts_model: String::new(),
            request_timeout_secs: 30,
            max_attempts: 3,
            needs_refresh: true,
            status_message: None,
        }
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }

    fn refresh(&mut self, settings: &AppSettings) {
        self.api_key = settings.api_key.clone().unwrap_or_default();
        self.voice_name = settings.voice_name.clone();
        self.bio_model = settings.bio_model.clone();
        self.tts_model = settings.tts_model.clone();
        self.request_timeout_secs = settings.request_timeout_secs;
        self.max_attempts = settings.retry.max_attempts;
        self.needs_refresh = false;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, settings: &mut AppSettings) {
        if self.needs_refresh {
            self.refresh(settings);
        }

        let available_width = ui.available_width();
        let section_width = available_width * 0.8;
        let margin = (available_width - section_width) / 2.0;

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading(format!("{} Inställningar", Icons::SETTINGS));
            ui.add_space(16.0);

            ui.horizontal(|ui| {
                ui.add_space(margin);
                ui.vertical(|ui| {
                    ui.set_width(section_width);

                    // Utseende
                    section(ui, "Utseende", |ui| {
                        ui.horizontal(|ui| {
                            ui.label("Mörkt läge:");
                            ui.checkbox(&mut state.dark_mode, "");
                        });
                    });

                    ui.add_space(16.0);

                    // Tjänst
                    section(ui, "Gemini", |ui| {
                        ui.label("API-nyckel:");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.api_key)
                                .password(true)
                                .desired_width(ui.available_width()),
                        );
                        ui.label(
                            RichText::new("Lämna tomt för att använda GEMINI_API_KEY eller API_KEY.")
                                .small()
                                .color(Colors::TEXT_MUTED),
                        );

                        ui.add_space(8.0);
                        egui::Grid::new("service_grid").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
                            ui.label("Röst:");
                            ui.text_edit_singleline(&mut self.voice_name);
                            ui.end_row();

                            ui.label("Biografimodell:");
                            ui.text_edit_singleline(&mut self.bio_model);
                            ui.end_row();

                            ui.label("Talmodell:");
                            ui.text_edit_singleline(&mut self.tts_model);
                            ui.end_row();

                            ui.label("Tidsgräns (s):");
                            ui.add(egui::DragValue::new(&mut self.request_timeout_secs).range(1..=300));
                            ui.end_row();

                            ui.label("Antal försök:");
                            ui.add(egui::DragValue::new(&mut self.max_attempts).range(1..=10));
                            ui.end_row();
                        });

                        ui.add_space(8.0);
                        if ui.button(format!("{} Spara ändringar", Icons::SAVE)).clicked() {
                            self.apply(settings);
                            self.save(state, settings);
                        }

                        if let Some(ref msg) = self.status_message {
                            ui.add_space(8.0);
                            ui.label(RichText::new(msg).color(Colors::SUCCESS));
                        }
                    });

                    ui.add_space(16.0);

                    // Om applikationen
                    section(ui, "Om Legacy Flow", |ui| {
                        ui.label(format!("Version: {}", env!("CARGO_PKG_VERSION")));
                        ui.label("Ett digitalt arkiv över biologiskt och andligt arv");
                    });
                });
            });
        });
    }

    /// Skärm som visas när ingen API-nyckel finns
    pub fn show_key_gate(&mut self, ui: &mut egui::Ui, state: &mut AppState, settings: &mut AppSettings) {
        if self.needs_refresh {
            self.refresh(settings);
        }

        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.label(RichText::new(Icons::KEY).size(48.0).color(Colors::PRIMARY_LIGHT));
            ui.label(RichText::new("Legacy Flow").size(40.0).strong());
            ui.add_space(8.0);
            ui.label(
                RichText::new("Anslut din API-nyckel för att öppna släktarkivet och de andliga guiderna.")
                    .color(Colors::TEXT_SECONDARY),
            );
            ui.add_space(16.0);

            ui.add(
                egui::TextEdit::singleline(&mut self.api_key)
                    .password(true)
                    .hint_text("API-nyckel")
                    .desired_width(360.0),
            );
            ui.add_space(8.0);

            let ready = !self.api_key.trim().is_empty();
            if ui.add_enabled(ready, egui::Button::new("Anslut")).clicked() {
                self.apply(settings);
                self.save(state, settings);
            }

            ui.add_space(8.0);
            ui.label(
                RichText::new("Nyckeln kan också anges med miljövariabeln GEMINI_API_KEY.")
                    .small()
                    .color(Colors::TEXT_MUTED),
            );
        });
    }

    fn apply(&self, settings: &mut AppSettings) {
        let key = self.api_key.trim();
        settings.api_key = (!key.is_empty()).then(|| key.to_string());
        settings.voice_name = non_empty_or(&self.voice_name, &settings.voice_name);
        settings.bio_model = non_empty_or(&self.bio_model, &settings.bio_model);
        settings.tts_model = non_empty_or(&self.tts_model, &settings.tts_model);
        settings.request_timeout_secs = self.request_timeout_secs;
        settings.retry.max_attempts = self.max_attempts;
    }

    fn save(&mut self, state: &mut AppState, settings: &mut AppSettings) {
        settings.dark_mode = state.dark_mode;
        match settings.save() {
            Ok(()) => {
                self.status_message = Some("Inställningar sparade!".to_string());
            }
            Err(e) => {
                tracing::error!("Kunde inte spara inställningar: {}", e);
                self.status_message = Some(format!("Fel: {}", e));
            }
        }
        state.settings_changed = true;
        self.needs_refresh = true;
    }
}

fn section(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ui.visuals().extreme_bg_color)
        .rounding(8.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(title).strong());
            ui.add_space(8.0);
            add_contents(ui);
        });
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
