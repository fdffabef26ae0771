use egui::{self, Color32, RichText};

use crate::ui::{
    state::AppState,
    theme::{Colors, Icons},
    View,
};

pub struct HomeView;

impl HomeView {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        ui.vertical_centered(|ui| {
            ui.add_space(32.0);
            ui.label(RichText::new("Legacy Flow").size(48.0).strong());
            ui.label(
                RichText::new("Ett digitalt arkiv över biologiskt och andligt arv.")
                    .color(Colors::TEXT_SECONDARY),
            );
        });

        ui.add_space(32.0);

        let tiles = [
            (
                View::FamilyTree,
                Icons::TREE,
                "Släktled",
                "Biologiska rötter på fädernet och mödernet.",
                Colors::TREE_ACCENT,
            ),
            (
                View::Silsila,
                Icons::CHAIN,
                "Andlig silsila",
                "Kedjan av andligt arv.",
                Colors::SUCCESS,
            ),
            (
                View::Guide,
                Icons::BOOK,
                "Guide",
                "Salah, wazu och suror.",
                Colors::PRIMARY_LIGHT,
            ),
        ];

        ui.horizontal_wrapped(|ui| {
            for (view, icon, title, desc, color) in tiles {
                if self.tile(ui, icon, title, desc, color) {
                    state.navigate(view);
                }
                ui.add_space(8.0);
            }
        });
    }

    /// Klickbar ruta, returnerar true vid klick
    fn tile(&self, ui: &mut egui::Ui, icon: &str, title: &str, desc: &str, color: Color32) -> bool {
        let response = egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(12.0)
            .inner_margin(20.0)
            .show(ui, |ui| {
                ui.set_width(240.0);
                ui.set_min_height(140.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(icon).size(32.0).color(color));
                    ui.add_space(8.0);
                    ui.label(RichText::new(title).size(22.0).strong());
                    ui.label(RichText::new(desc).color(Colors::TEXT_SECONDARY));
                });
            })
            .response
            .interact(egui::Sense::click());

        response.on_hover_cursor(egui::CursorIcon::PointingHand).clicked()
    }
}
