use egui::{self, RichText};

use crate::ui::{
    state::AppState,
    theme::{Colors, Icons},
};

pub struct AlertDialog;

impl AlertDialog {
    /// Visar meddelandet tills användaren stänger det. Returnerar true när det stängs.
    pub fn show(ctx: &egui::Context, state: &mut AppState) -> bool {
        let Some(message) = state.alert_message.clone() else {
            return false;
        };

        let mut closed = false;

        egui::Window::new("Meddelande")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(320.0);

                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(Icons::WARNING).size(32.0).color(Colors::WARNING));
                    ui.add_space(8.0);
                    ui.label(&message);
                });

                ui.add_space(16.0);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("OK").clicked() {
                        closed = true;
                    }
                });
            });

        if closed {
            state.close_alert();
        }

        closed
    }
}
