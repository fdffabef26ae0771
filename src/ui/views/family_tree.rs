//! Släktträdsvy: interaktivt träd med sidopanel för vald person

use std::sync::Arc;
use std::time::Instant;

use egui::epaint::CubicBezierShape;
use egui::{self, Color32, Pos2, Rect, RichText, Stroke, Vec2};
use tokio::runtime::Handle;

use crate::models::{Lineage, Person, PersonSide};
use crate::services::tree_layout::{LayoutNode, LayoutSpacing};
use crate::services::{ContentService, ReciteOutcome, Reciter, TreeController, ViewTransform, ViewportSize};
use crate::ui::{
    state::{AppState, StatusType},
    theme::{Colors, Icons},
    widgets::ReciteButton,
};

/// Avstånd från cirkeln till rolletiketten (smalt, brett)
const ROLE_OFFSET: (f32, f32) = (50.0, 65.0);
/// Avstånd från rolletiketten till namnet
const NAME_OFFSET: (f32, f32) = (22.0, 28.0);

/// Vy för att visa släktträdet
pub struct FamilyTreeView {
    lineage: Lineage,
    controller: Option<TreeController>,
    content: Arc<dyn ContentService>,
    runtime: Handle,
    load_error: Option<String>,
    needs_refresh: bool,
}

impl FamilyTreeView {
    pub fn new(content: Arc<dyn ContentService>, runtime: Handle) -> Self {
        Self {
            lineage: Lineage::default(),
            controller: None,
            content,
            runtime,
            load_error: None,
            needs_refresh: true,
        }
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }

    pub fn set_content(&mut self, content: Arc<dyn ContentService>) {
        if let Some(controller) = self.controller.as_mut() {
            controller.set_content(Arc::clone(&content));
        }
        self.content = content;
    }

    /// Läs in aktuell släktlinje och bygg om trädet vid behov
    fn refresh(&mut self) {
        self.needs_refresh = false;

        let root = match self.lineage.load() {
            Ok(root) => root,
            Err(e) => {
                tracing::error!("Kunde inte läsa {}: {}", self.lineage.label(), e);
                self.load_error = Some(e.to_string());
                self.controller = None;
                return;
            }
        };
        self.load_error = None;

        match self.controller.as_mut() {
            Some(controller) => {
                controller.set_dataset(&root);
            }
            None => {
                self.controller = Some(TreeController::new(
                    &root,
                    Arc::clone(&self.content),
                    self.runtime.clone(),
                ));
            }
        }
    }

    fn select_lineage(&mut self, lineage: Lineage) {
        if self.lineage != lineage {
            self.lineage = lineage;
            self.needs_refresh = true;
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, reciter: &Reciter) {
        if self.needs_refresh {
            self.refresh();
        }

        let now = Instant::now();
        self.show_header(ui, now);
        ui.separator();

        if let Some(ref err) = self.load_error {
            ui.vertical_centered(|ui| {
                ui.add_space(50.0);
                ui.label(RichText::new(format!("Släktlinjen kunde inte läsas: {}", err)).color(Colors::TEXT_MUTED));
            });
            return;
        }

        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        if controller.poll() {
            ui.ctx().request_repaint();
        }
        if controller.tick(now) || controller.is_bio_loading() {
            ui.ctx().request_repaint();
        }

        if controller.selection().is_some() {
            egui::SidePanel::right("person_panel")
                .resizable(true)
                .default_width(340.0)
                .show_inside(ui, |ui| {
                    show_person_panel(ui, state, controller, reciter);
                });
        }

        show_tree_canvas(ui, controller, now);
    }

    fn show_header(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.horizontal(|ui| {
            ui.heading(format!("{} Släktled", Icons::TREE));
            ui.separator();

            for &lineage in Lineage::all() {
                if ui.selectable_label(self.lineage == lineage, lineage.label()).clicked() {
                    self.select_lineage(lineage);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let Some(controller) = self.controller.as_mut() else {
                    return;
                };

                if ui.button(format!("{} Botten", Icons::ARROW_DOWN)).on_hover_text("Gå till yngsta generationen").clicked() {
                    controller.jump_to_bottom(now);
                }
                if ui.button(format!("{} Toppen", Icons::ARROW_UP)).on_hover_text("Gå till stamfadern").clicked() {
                    controller.jump_to_top(now);
                }
                ui.label(format!("{:.0}%", controller.transform().k * 100.0));
            });
        });
    }
}

fn show_person_panel(
    ui: &mut egui::Ui,
    state: &mut AppState,
    controller: &mut TreeController,
    reciter: &Reciter,
) {
    let mut close = false;

    egui::ScrollArea::vertical().show(ui, |ui| {
        let Some((person, side)) = controller.selected_person() else {
            return;
        };

        ui.horizontal(|ui| {
            ui.label(RichText::new(person.role_label_for(side)).small().strong().color(Colors::TREE_ROLE));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(Icons::CROSS).on_hover_text("Stäng").clicked() {
                    close = true;
                }
            });
        });

        match person.image_for(side) {
            Some(url) => {
                ui.add(
                    egui::Image::from_uri(url)
                        .max_width(ui.available_width())
                        .max_height(260.0)
                        .rounding(12.0),
                );
            }
            None => {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(Icons::PERSON).size(64.0).color(Colors::TEXT_MUTED));
                });
            }
        }

        ui.add_space(8.0);
        ui.label(RichText::new(person.name_for(side).unwrap_or("Okänd")).size(22.0).strong());
        if side == PersonSide::Main {
            if let Some(ref urdu) = person.urdu_name {
                ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                    ui.label(RichText::new(urdu).size(18.0).color(Colors::TEXT_SECONDARY));
                });
            }
        }
        if let Some(spouse_line) = partner_line(person, side) {
            ui.label(RichText::new(spouse_line).small().color(Colors::TEXT_MUTED));
        }

        ui.add_space(12.0);
        ui.label(RichText::new("Historik").small().strong().color(Colors::TEXT_SECONDARY));

        if controller.is_bio_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Hämtar historik...").italics().color(Colors::TEXT_MUTED));
            });
            return;
        }

        let bio = controller
            .bio_text()
            .map(str::to_string)
            .or_else(|| person.bio.clone());

        match bio {
            Some(bio) => {
                ui.label(&bio);
                ui.add_space(8.0);
                let id = format!("bio-{}-{:?}", person.id, side);
                let outcome = ReciteButton::new(&id, &bio).label("Läs upp").show(ui, reciter);
                if let Some(ReciteOutcome::Rejected { .. }) = outcome {
                    state.show_status("En uppläsning pågår redan", StatusType::Info);
                }
            }
            None => {
                ui.label(RichText::new("Klicka på en person i trädet för att läsa mer.").color(Colors::TEXT_MUTED));
            }
        }
    });

    if close {
        controller.clear_selection();
    }
}

fn partner_line(person: &Person, side: PersonSide) -> Option<String> {
    match side {
        PersonSide::Main => person.spouse.as_ref().map(|s| format!("Gift med {}", s)),
        PersonSide::Spouse => Some(format!("Gift med {}", person.name)),
    }
}

/// Cirkelns mittpunkt i trädkoordinater för en sida av noden
fn circle_center(node: &LayoutNode, side: PersonSide, spacing: &LayoutSpacing) -> Pos2 {
    let offset = if node.person.spouse.is_some() {
        spacing.spouse_offset
    } else {
        0.0
    };
    match side {
        PersonSide::Main => Pos2::new(node.x - offset, node.y),
        PersonSide::Spouse => Pos2::new(node.x + offset, node.y),
    }
}

fn sides(node: &LayoutNode) -> &'static [PersonSide] {
    if node.person.spouse.is_some() {
        &[PersonSide::Main, PersonSide::Spouse]
    } else {
        &[PersonSide::Main]
    }
}

fn show_tree_canvas(ui: &mut egui::Ui, controller: &mut TreeController, now: Instant) {
    let available_size = ui.available_size();
    let (response, painter) = ui.allocate_painter(available_size, egui::Sense::click_and_drag());
    let rect = response.rect;

    controller.set_viewport(ViewportSize::new(rect.width(), rect.height()));

    // Panorera
    if response.dragged() {
        let delta = response.drag_delta();
        controller.pan(delta.x, delta.y);
    }

    // Zooma kring pekaren
    if response.hovered() {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta != 0.0 {
            if let Some(pointer) = response.hover_pos() {
                let local = pointer - rect.min;
                controller.zoom_at(local.x, local.y, 1.0 + scroll_delta * 0.001);
            }
        }
    }

    painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

    let Some(layout) = controller.layout() else {
        return;
    };
    let spacing = layout.spacing;
    let narrow = spacing == LayoutSpacing::NARROW;
    let t = controller.transform();
    let to_screen = |p: Pos2| -> Pos2 {
        let (x, y) = t.apply(p.x, p.y);
        rect.min + Vec2::new(x, y)
    };

    // Kanter under noderna
    let edge_width = if narrow { 4.0 } else { 6.0 } * t.k;
    let edge_stroke = Stroke::new(edge_width, Colors::TREE_ACCENT.gamma_multiply(0.3));
    for edge in &layout.edges {
        let (from, to) = (&layout.nodes[edge.parent], &layout.nodes[edge.child]);
        let mid_y = (from.y + to.y) / 2.0;
        let points = [
            to_screen(Pos2::new(from.x, from.y)),
            to_screen(Pos2::new(from.x, mid_y)),
            to_screen(Pos2::new(to.x, mid_y)),
            to_screen(Pos2::new(to.x, to.y)),
        ];
        painter.add(CubicBezierShape::from_points_stroke(
            points,
            false,
            Color32::TRANSPARENT,
            edge_stroke,
        ));
    }

    let selection = controller.selection().cloned();
    let radius = spacing.node_radius * t.k;
    let mut clicked: Option<(String, PersonSide)> = None;
    let click_pos = if response.clicked() {
        response.interact_pointer_pos()
    } else {
        None
    };

    for node in &layout.nodes {
        let center = to_screen(Pos2::new(node.x, node.y));
        let reach = (spacing.spouse_offset + spacing.node_radius) * t.k;
        let extent = Rect::from_center_size(center, Vec2::new(reach * 2.0, reach * 2.0 + 200.0 * t.k));
        if !rect.intersects(extent) {
            continue;
        }

        if node.person.spouse.is_some() {
            let offset = spacing.spouse_offset * t.k;
            painter.line_segment(
                [center - Vec2::new(offset, 0.0), center + Vec2::new(offset, 0.0)],
                Stroke::new(4.0 * t.k, Colors::TREE_ACCENT.gamma_multiply(0.4)),
            );
        }

        for &side in sides(node) {
            let pos = to_screen(circle_center(node, side, &spacing));
            let is_selected = selection
                .as_ref()
                .is_some_and(|s| s.node_id == node.id && s.side == side);
            draw_circle(&painter, node, side, pos, radius, t, narrow, is_selected);

            if let Some(p) = click_pos {
                if p.distance(pos) <= radius {
                    clicked = Some((node.id.clone(), side));
                }
            }
        }

        if node.revealed {
            draw_labels(&painter, node, center, radius, t, narrow, ui.visuals().text_color());
        }
    }

    if let Some((id, side)) = clicked {
        controller.click(&id, side, now);
        ui.ctx().request_repaint();
    }

    painter.text(
        Pos2::new(rect.center().x, rect.bottom() - 20.0),
        egui::Align2::CENTER_CENTER,
        "Dra för att panorera • Scrolla för att zooma • Klicka på en person för att fälla ut",
        egui::FontId::proportional(11.0),
        Colors::TEXT_MUTED,
    );
}

#[allow(clippy::too_many_arguments)]
fn draw_circle(
    painter: &egui::Painter,
    node: &LayoutNode,
    side: PersonSide,
    pos: Pos2,
    radius: f32,
    t: ViewTransform,
    narrow: bool,
    selected: bool,
) {
    let (fill, stroke) = match (node.revealed, node.has_children) {
        (true, true) => (Colors::TREE_BRANCH_FILL, Colors::TREE_ACCENT),
        (true, false) => (Colors::TREE_LEAF_FILL, Colors::TREE_ACCENT),
        (false, _) => (Colors::TREE_HIDDEN_FILL, Colors::TREE_HIDDEN_STROKE),
    };
    let stroke_color = if selected { Colors::TREE_SELECTED } else { stroke };
    painter.circle(pos, radius, fill, Stroke::new(4.0 * t.k, stroke_color));

    let tag = if node.revealed {
        node.person.tag_for(side)
    } else {
        "?".to_string()
    };
    let font = if narrow { 28.0 } else { 36.0 } * t.k;
    if font >= 4.0 {
        painter.text(
            pos,
            egui::Align2::CENTER_CENTER,
            tag,
            egui::FontId::proportional(font),
            Color32::WHITE,
        );
    }

    if node.has_children && side == PersonSide::Main {
        let dot = if node.expanded {
            Colors::TREE_ACCENT
        } else {
            Colors::TREE_COLLAPSED_DOT
        };
        painter.circle_filled(pos + Vec2::new(0.0, radius + 15.0 * t.k), 8.0 * t.k, dot);
    }
}

fn draw_labels(
    painter: &egui::Painter,
    node: &LayoutNode,
    center: Pos2,
    radius: f32,
    t: ViewTransform,
    narrow: bool,
    text_color: Color32,
) {
    let pick = |(n, w): (f32, f32)| if narrow { n } else { w };
    let role_y = radius + pick(ROLE_OFFSET) * t.k;
    let name_y = role_y + pick(NAME_OFFSET) * t.k;
    let role_size = pick((14.0, 16.0)) * t.k;
    let name_size = pick((18.0, 22.0)) * t.k;

    if role_size >= 4.0 {
        painter.text(
            center + Vec2::new(0.0, role_y),
            egui::Align2::CENTER_CENTER,
            node.person.role_label_for(PersonSide::Main).to_uppercase(),
            egui::FontId::proportional(role_size),
            Colors::TREE_ROLE,
        );
    }
    if name_size >= 4.0 {
        painter.text(
            center + Vec2::new(0.0, name_y),
            egui::Align2::CENTER_CENTER,
            node.person.couple_label(),
            egui::FontId::proportional(name_size),
            text_color,
        );
    }
}
