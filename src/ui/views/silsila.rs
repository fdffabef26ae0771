use egui::{self, RichText};

use crate::models::{load_shajra, ShajraItem};
use crate::services::{ReciteOutcome, Reciter};
use crate::ui::{
    state::AppState,
    theme::{Colors, Icons},
    widgets::ReciteButton,
};

/// Den andliga kedjan rad för rad
pub struct SilsilaView {
    items: Vec<ShajraItem>,
    load_error: Option<String>,
}

impl SilsilaView {
    pub fn new() -> Self {
        match load_shajra() {
            Ok(items) => Self {
                items,
                load_error: None,
            },
            Err(e) => {
                tracing::error!("Kunde inte läsa silsilan: {}", e);
                Self {
                    items: Vec::new(),
                    load_error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, reciter: &Reciter) {
        ui.heading(format!("{} Andlig silsila", Icons::CHAIN));
        ui.label(
            RichText::new("Den heliga arvskedjan (tawassul)")
                .small()
                .color(Colors::SUCCESS),
        );
        ui.add_space(12.0);

        if let Some(ref err) = self.load_error {
            ui.label(RichText::new(format!("Innehållet kunde inte läsas: {}", err)).color(Colors::ERROR));
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (i, item) in self.items.iter().enumerate() {
                if let Some(ref title) = item.title {
                    ui.label(RichText::new(title).strong().color(Colors::TEXT_SECONDARY));
                    ui.add_space(8.0);
                }

                for (li, line) in item.lines.iter().enumerate() {
                    let line_id = format!("{}-{}", i, li);

                    egui::Frame::none()
                        .fill(ui.visuals().extreme_bg_color)
                        .rounding(12.0)
                        .inner_margin(16.0)
                        .show(ui, |ui| {
                            ui.set_min_width(ui.available_width());

                            ui.horizontal(|ui| {
                                ui.label(RichText::new(format!("{}", li + 1)).strong().color(Colors::SUCCESS));
                                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                    ui.label(RichText::new(&line.arabic).size(24.0));
                                });
                            });

                            ui.separator();
                            ui.label(RichText::new(&line.roman).small().color(Colors::SUCCESS));
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                                ui.label(RichText::new(&line.urdu).size(18.0).color(Colors::TEXT_SECONDARY));
                            });

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                let outcome = ReciteButton::new(&line_id, &line.arabic)
                                    .label("Läs upp")
                                    .show(ui, reciter);
                                if let Some(ReciteOutcome::Rejected { .. }) = outcome {
                                    state.show_status("En uppläsning pågår redan", crate::ui::StatusType::Info);
                                }
                            });
                        });

                    ui.add_space(8.0);
                }
            }
        });
    }
}
