use egui::{Color32, FontFamily, FontId, TextStyle, Visuals};

/// Konfigurera applikationens utseende
pub fn configure_style(ctx: &egui::Context, dark_mode: bool) {
    let mut style = (*ctx.style()).clone();

    // Typsnitt
    style.text_styles = [
        (TextStyle::Heading, FontId::new(24.0, FontFamily::Proportional)),
        (TextStyle::Name("heading2".into()), FontId::new(20.0, FontFamily::Proportional)),
        (TextStyle::Name("script".into()), FontId::new(26.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
    ]
    .into();

    // Spacing
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12.0);

    if dark_mode {
        style.visuals = dark_visuals();
    } else {
        style.visuals = light_visuals();
    }

    ctx.set_style(style);
}

fn dark_visuals() -> Visuals {
    let mut visuals = Visuals::dark();

    // Bakgrundsfärger (skiffer)
    visuals.panel_fill = Color32::from_rgb(2, 6, 23);
    visuals.window_fill = Color32::from_rgb(15, 23, 42);
    visuals.extreme_bg_color = Color32::from_rgb(8, 14, 32);

    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(30, 41, 59);
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(30, 41, 59);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(51, 65, 85);
    visuals.widgets.active.bg_fill = Color32::from_rgb(67, 56, 202);

    // Accentfärg (indigo)
    visuals.selection.bg_fill = Color32::from_rgb(79, 70, 229);
    visuals.hyperlink_color = Color32::from_rgb(129, 140, 248);

    visuals
}

fn light_visuals() -> Visuals {
    let mut visuals = Visuals::light();

    visuals.panel_fill = Color32::from_rgb(248, 250, 252);
    visuals.window_fill = Color32::from_rgb(255, 255, 255);
    visuals.extreme_bg_color = Color32::from_rgb(241, 245, 249);

    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(226, 232, 240);
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(226, 232, 240);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(203, 213, 225);
    visuals.widgets.active.bg_fill = Color32::from_rgb(199, 210, 254);

    visuals.selection.bg_fill = Color32::from_rgb(199, 210, 254);
    visuals.hyperlink_color = Color32::from_rgb(67, 56, 202);

    visuals
}

/// Färgpalett för applikationen
pub struct Colors;

impl Colors {
    // Primär
    pub const PRIMARY: Color32 = Color32::from_rgb(79, 70, 229);
    pub const PRIMARY_LIGHT: Color32 = Color32::from_rgb(129, 140, 248);

    pub const SUCCESS: Color32 = Color32::from_rgb(16, 185, 129);
    pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
    pub const INFO: Color32 = Color32::from_rgb(59, 130, 246);
    pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);

    // Text
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(148, 163, 184);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(100, 116, 139);

    // Släktträdet
    pub const TREE_ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    pub const TREE_BRANCH_FILL: Color32 = Color32::from_rgb(29, 78, 216);
    pub const TREE_LEAF_FILL: Color32 = Color32::from_rgb(30, 41, 59);
    pub const TREE_HIDDEN_FILL: Color32 = Color32::from_rgb(15, 23, 42);
    pub const TREE_HIDDEN_STROKE: Color32 = Color32::from_rgb(71, 85, 105);
    pub const TREE_COLLAPSED_DOT: Color32 = Color32::from_rgb(100, 116, 139);
    pub const TREE_ROLE: Color32 = Color32::from_rgb(96, 165, 250);
    pub const TREE_SELECTED: Color32 = Color32::from_rgb(250, 204, 21);
}

/// Ikoner (Unicode)
pub struct Icons;

impl Icons {
    pub const HOME: &'static str = "🏠";
    pub const TREE: &'static str = "🌳";
    pub const CHAIN: &'static str = "📿";
    pub const BOOK: &'static str = "📖";
    pub const SETTINGS: &'static str = "⚙";
    pub const SPEAKER: &'static str = "🔊";
    pub const KEY: &'static str = "🔑";
    pub const WARNING: &'static str = "⚠";
    pub const CROSS: &'static str = "✗";
    pub const ARROW_UP: &'static str = "⬆";
    pub const ARROW_DOWN: &'static str = "⬇";
    pub const PERSON: &'static str = "👤";
    pub const SAVE: &'static str = "💾";
}
