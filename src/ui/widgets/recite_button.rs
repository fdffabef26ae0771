//! Knapp som läser upp en text via talsyntes

use egui::{self, RichText};

use crate::services::{ReciteOutcome, Reciter};
use crate::ui::theme::{Colors, Icons};

/// Uppläsningsknapp för ett stycke. Visar en spinner medan just detta id läses upp.
pub struct ReciteButton<'a> {
    id: &'a str,
    text: &'a str,
    label: Option<&'a str>,
}

impl<'a> ReciteButton<'a> {
    pub fn new(id: &'a str, text: &'a str) -> Self {
        Self {
            id,
            text,
            label: None,
        }
    }

    /// Knapptext, annars bara en högtalarikon
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Rita knappen. Returnerar utfallet om den klickades.
    pub fn show(self, ui: &mut egui::Ui, reciter: &Reciter) -> Option<ReciteOutcome> {
        let loading = reciter.loading_id().as_deref() == Some(self.id);

        if loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Läser upp...").small().color(Colors::PRIMARY_LIGHT));
            });
            return None;
        }

        let text = match self.label {
            Some(label) if !label.is_empty() => format!("{} {}", Icons::SPEAKER, label),
            _ => Icons::SPEAKER.to_string(),
        };

        let response = ui.button(text).on_hover_text("Läs upp");
        if !response.clicked() {
            return None;
        }

        let outcome = reciter.recite(self.id, self.text);
        ui.ctx().request_repaint();
        Some(outcome)
    }
}
