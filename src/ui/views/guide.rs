//! Böneguide: wazu, dagliga böner och suror

use egui::{self, RichText};

use crate::models::{GuideContent, PrayerStep};
use crate::services::{ReciteOutcome, Reciter};
use crate::ui::{
    state::{AppState, StatusType},
    theme::{Colors, Icons},
    widgets::ReciteButton,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuideTab {
    #[default]
    Wazu,
    Prayers,
    Surahs,
}

impl GuideTab {
    fn label(&self) -> &'static str {
        match self {
            Self::Wazu => "Wazu",
            Self::Prayers => "Böner",
            Self::Surahs => "Suror",
        }
    }
}

pub struct GuideView {
    content: Option<GuideContent>,
    active_tab: GuideTab,
    selected_prayer: usize,
}

impl GuideView {
    pub fn new() -> Self {
        let content = match GuideContent::load() {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::error!("Kunde inte läsa böneguiden: {}", e);
                None
            }
        };

        Self {
            content,
            active_tab: GuideTab::default(),
            selected_prayer: 0,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, reciter: &Reciter) {
        ui.vertical_centered(|ui| {
            ui.heading(format!("{} Andlig guide", Icons::BOOK));
            ui.label(RichText::new("Kunskap • Praktik • Hängivenhet").small().color(Colors::TEXT_MUTED));
        });
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            for tab in [GuideTab::Wazu, GuideTab::Prayers, GuideTab::Surahs] {
                if ui.selectable_label(self.active_tab == tab, tab.label()).clicked() {
                    self.active_tab = tab;
                }
            }
        });
        ui.separator();

        let Some(content) = self.content.as_ref() else {
            ui.label(RichText::new("Guiden kunde inte läsas in").color(Colors::ERROR));
            return;
        };

        let mut rejected = false;
        egui::ScrollArea::vertical().show(ui, |ui| match self.active_tab {
            GuideTab::Wazu => rejected = show_wazu(ui, content, reciter),
            GuideTab::Prayers => {
                rejected = show_prayers(ui, content, &mut self.selected_prayer, reciter)
            }
            GuideTab::Surahs => rejected = show_surahs(ui, content, reciter),
        });

        if rejected {
            state.show_status("En uppläsning pågår redan", StatusType::Info);
        }
    }
}

fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::none()
        .fill(ui.visuals().extreme_bg_color)
        .rounding(12.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

fn arabic(ui: &mut egui::Ui, text: &str, size: f32) {
    ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
        ui.label(RichText::new(text).size(size));
    });
}

/// Ritar knappen och returnerar true om klicket avvisades
fn recite(ui: &mut egui::Ui, reciter: &Reciter, id: &str, text: &str, label: &str) -> bool {
    matches!(
        ReciteButton::new(id, text).label(label).show(ui, reciter),
        Some(ReciteOutcome::Rejected { .. })
    )
}

fn show_wazu(ui: &mut egui::Ui, content: &GuideContent, reciter: &Reciter) -> bool {
    let mut rejected = false;
    let niyyah = &content.wazu_niyyah;

    card(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("Niyyah").small().strong().color(Colors::PRIMARY_LIGHT));
            if let Some(ref bismillah) = niyyah.bismillah {
                ui.label(RichText::new(bismillah).size(22.0));
            }
            if let Some(ref trans) = niyyah.bismillah_trans {
                ui.label(RichText::new(trans).italics().color(Colors::TEXT_SECONDARY));
            }
            ui.label(RichText::new(&niyyah.arabic).size(30.0));
            ui.label(RichText::new(format!("\"{}\"", niyyah.english)).italics().color(Colors::TEXT_SECONDARY));
            rejected |= recite(ui, reciter, "wazu-niyyah", &niyyah.arabic, "Läs upp niyyah");
        });
    });
    ui.add_space(12.0);

    for (i, step) in content.wazu_steps.iter().enumerate() {
        card(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("{}", i + 1)).strong().color(Colors::PRIMARY_LIGHT));
                ui.label(RichText::new(&step.name).size(18.0).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    rejected |= recite(ui, reciter, &format!("wazu-step-{}", i), &step.arabic, "");
                });
            });
            if let Some(ref img) = step.img {
                ui.add(egui::Image::from_uri(img.as_str()).max_height(180.0));
            }
            ui.label(RichText::new(&step.detail).color(Colors::TEXT_SECONDARY));
            ui.separator();
            arabic(ui, &step.arabic, 20.0);
            ui.label(RichText::new(&step.roman).small().color(Colors::PRIMARY_LIGHT));
        });
        ui.add_space(8.0);
    }

    let dua = &content.wazu_dua_finish;
    card(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("Dua efter wazu").small().strong().color(Colors::SUCCESS));
            ui.label(RichText::new(&dua.arabic).size(26.0));
            ui.label(RichText::new(&dua.roman).small().color(Colors::SUCCESS));
            ui.label(RichText::new(format!("\"{}\"", dua.english)).italics().color(Colors::TEXT_SECONDARY));
            rejected |= recite(ui, reciter, "wazu-dua-end", &dua.arabic, "Läs upp hela duan");
        });
    });

    rejected
}

fn show_prayers(
    ui: &mut egui::Ui,
    content: &GuideContent,
    selected: &mut usize,
    reciter: &Reciter,
) -> bool {
    let mut rejected = false;
    if content.daily_prayers.is_empty() {
        return false;
    }
    if *selected >= content.daily_prayers.len() {
        *selected = 0;
    }

    ui.horizontal_wrapped(|ui| {
        for (i, prayer) in content.daily_prayers.iter().enumerate() {
            let text = format!("{}\n{} • {}", prayer.name, prayer.time, prayer.rakats);
            if ui.selectable_label(*selected == i, text).clicked() {
                *selected = i;
            }
        }
    });
    ui.add_space(12.0);

    let prayer = &content.daily_prayers[*selected];

    card(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(format!("Avsikt för {}", prayer.name))
                    .small()
                    .strong()
                    .color(Colors::PRIMARY_LIGHT),
            );
            ui.label(RichText::new(&prayer.niyyah.arabic).size(26.0));
            ui.label(
                RichText::new(format!("\"{}\"", prayer.niyyah.english))
                    .italics()
                    .color(Colors::TEXT_SECONDARY),
            );
        });
    });
    ui.add_space(12.0);

    ui.label(RichText::new(format!("Tariqa för {}", prayer.name)).strong());
    for (i, step) in prayer.tariqa.iter().enumerate() {
        let id = format!("{}-step-{}", prayer.name, i);
        rejected |= prayer_step(ui, reciter, i, step, &id, "Läs upp");
        ui.add_space(6.0);
    }

    if !prayer.sajda_dua.is_empty() {
        ui.add_space(12.0);
        ui.label(RichText::new("Sajda-e-dua efter bönen").strong().color(Colors::SUCCESS));
        for (i, step) in prayer.sajda_dua.iter().enumerate() {
            let id = format!("sajda-{}", i);
            rejected |= prayer_step(ui, reciter, i, step, &id, "Läs upp hela duan");
            ui.add_space(6.0);
        }
    }

    rejected
}

fn prayer_step(
    ui: &mut egui::Ui,
    reciter: &Reciter,
    index: usize,
    step: &PrayerStep,
    id: &str,
    label: &str,
) -> bool {
    card(ui, |ui| {
        let mut rejected = false;
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{}", index + 1)).strong().color(Colors::PRIMARY_LIGHT));
            ui.label(RichText::new(&step.step).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                rejected = recite(ui, reciter, id, &step.recitation, label);
            });
        });
        ui.label(RichText::new(&step.detail).color(Colors::TEXT_SECONDARY));

        if step.roman.is_some() || step.meaning.is_some() {
            ui.separator();
            arabic(ui, &step.recitation, 20.0);
        }
        if let Some(ref roman) = step.roman {
            ui.label(RichText::new("Translitterering").small().color(Colors::TEXT_MUTED));
            ui.label(RichText::new(roman).italics());
        }
        if let Some(ref meaning) = step.meaning {
            ui.label(RichText::new("Betydelse").small().color(Colors::TEXT_MUTED));
            ui.label(meaning);
        }
        rejected
    })
}

fn show_surahs(ui: &mut egui::Ui, content: &GuideContent, reciter: &Reciter) -> bool {
    let mut rejected = false;

    for (i, surah) in content.surahs.iter().enumerate() {
        card(ui, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(&surah.name).size(18.0).strong());
                    ui.label(RichText::new(&surah.meaning).small().color(Colors::TEXT_MUTED));
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    rejected |= recite(ui, reciter, &format!("surah-{}", i), &surah.arabic, "Läs upp");
                });
            });
            ui.separator();
            arabic(ui, &surah.arabic, 22.0);
            ui.label(RichText::new(&surah.roman).italics().color(Colors::TEXT_SECONDARY));
        });
        ui.add_space(8.0);
    }

    rejected
}
