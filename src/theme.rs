//! Centralized theme constants for City Taxi Desk
//! All colors, sizes, and styling should reference these constants

use egui::Color32;

// =============================================================================
// COLORS - Backgrounds
// =============================================================================
pub const BG_BASE: Color32 = Color32::from_rgb(0x09, 0x09, 0x0b); // zinc-950
pub const BG_ELEVATED: Color32 = Color32::from_rgb(0x18, 0x18, 0x1b); // zinc-900
pub const BG_INPUT: Color32 = Color32::from_rgb(0x14, 0x14, 0x18);
pub const BG_SURFACE: Color32 = Color32::from_rgb(0x27, 0x27, 0x2a); // zinc-800
pub const BG_HOVER: Color32 = Color32::from_rgb(0x1f, 0x1a, 0x0c); // amber-tinted hover

// =============================================================================
// COLORS - Accent (Amber for the public site, red for admin)
// =============================================================================
pub const ACCENT: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24); // amber-400
pub const ACCENT_DARK: Color32 = Color32::from_rgb(0x45, 0x1a, 0x03); // amber-950, text on accent
pub const GOLD: Color32 = Color32::from_rgb(0xf5, 0x9e, 0x0b); // amber-500, driver screens
pub const ADMIN: Color32 = Color32::from_rgb(0xef, 0x44, 0x44); // red-500

// =============================================================================
// COLORS - Text
// =============================================================================
pub const TEXT_PRIMARY: Color32 = Color32::WHITE;
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0xe4, 0xe4, 0xe7); // zinc-200
pub const TEXT_MUTED: Color32 = Color32::from_rgb(0xa1, 0xa1, 0xaa); // zinc-400
pub const TEXT_DIM: Color32 = Color32::from_rgb(0x71, 0x71, 0x7a); // zinc-500

// =============================================================================
// COLORS - Borders
// =============================================================================
pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(0x27, 0x27, 0x2a); // zinc-800
pub const BORDER_DEFAULT: Color32 = Color32::from_rgb(0x3f, 0x3f, 0x46); // zinc-700

// =============================================================================
// COLORS - Status
// =============================================================================
pub const STATUS_SUCCESS: Color32 = Color32::from_rgb(0x34, 0xd3, 0x99); // emerald-400
pub const STATUS_WARNING: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24); // amber-400
pub const STATUS_ERROR: Color32 = Color32::from_rgb(0xf8, 0x71, 0x71); // red-400

// =============================================================================
// COLORS - Buttons
// =============================================================================
pub const BTN_DEFAULT: Color32 = Color32::from_rgb(0x3f, 0x3f, 0x46); // zinc-700
pub const BTN_ACCENT: Color32 = ACCENT;
pub const BTN_SUCCESS: Color32 = Color32::from_rgb(0x16, 0xa3, 0x4a); // green-600
pub const BTN_DANGER: Color32 = Color32::from_rgb(0xdc, 0x26, 0x26); // red-600

// =============================================================================
// TYPOGRAPHY - Font Sizes
// =============================================================================
pub const FONT_HERO: f32 = 40.0;
pub const FONT_DISPLAY: f32 = 28.0;
pub const FONT_TITLE: f32 = 20.0;
pub const FONT_HEADING: f32 = 16.0;
pub const FONT_BODY: f32 = 14.0;
pub const FONT_SMALL: f32 = 12.0;

// =============================================================================
// DIMENSIONS
// =============================================================================
pub const HEADER_HEIGHT: f32 = 64.0;
pub const CONTENT_WIDTH: f32 = 640.0;
pub const WIDE_CONTENT_WIDTH: f32 = 900.0;
pub const LOGIN_CARD_WIDTH: f32 = 380.0;
pub const LOGO_SIZE: f32 = 40.0;
pub const BUTTON_HEIGHT: f32 = 32.0;
pub const BUTTON_HEIGHT_LARGE: f32 = 44.0;
pub const TAB_HEIGHT: f32 = 32.0;

// =============================================================================
// CORNER RADIUS / STROKE / SPACING
// =============================================================================
pub const RADIUS_DEFAULT: f32 = 4.0;
pub const RADIUS_LARGE: f32 = 10.0;
pub const STROKE_DEFAULT: f32 = 1.0;
pub const SPACING_SM: f32 = 4.0;
pub const SPACING_MD: f32 = 8.0;
pub const SPACING_LG: f32 = 12.0;
pub const SPACING_XL: f32 = 16.0;

// =============================================================================
// HELPER - Apply global visuals
// =============================================================================
pub fn apply_visuals(ctx: &egui::Context) {
    ctx.set_visuals(egui::Visuals {
        dark_mode: true,
        panel_fill: BG_BASE,
        window_fill: Color32::from_rgb(0x1a, 0x1a, 0x1e),
        extreme_bg_color: BG_INPUT,
        faint_bg_color: BG_ELEVATED,
        hyperlink_color: ACCENT,
        selection: egui::style::Selection {
            bg_fill: Color32::from_rgb(0x3a, 0x3a, 0x3f),
            stroke: egui::Stroke::new(STROKE_DEFAULT, ACCENT),
        },
        widgets: egui::style::Widgets {
            noninteractive: egui::style::WidgetVisuals {
                bg_fill: BG_ELEVATED,
                weak_bg_fill: BG_SURFACE,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, TEXT_PRIMARY),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
            inactive: egui::style::WidgetVisuals {
                bg_fill: BG_SURFACE,
                weak_bg_fill: BG_ELEVATED,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, TEXT_SECONDARY),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
            hovered: egui::style::WidgetVisuals {
                bg_fill: BG_HOVER,
                weak_bg_fill: Color32::from_rgb(0x30, 0x30, 0x35),
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_DEFAULT),
                fg_stroke: egui::Stroke::new(1.5, TEXT_PRIMARY),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
            active: egui::style::WidgetVisuals {
                bg_fill: Color32::from_rgb(0x2e, 0x2e, 0x33),
                weak_bg_fill: Color32::from_rgb(0x2e, 0x2e, 0x33),
                bg_stroke: egui::Stroke::NONE,
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, TEXT_PRIMARY),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: -1.0,
            },
            open: egui::style::WidgetVisuals {
                bg_fill: BG_SURFACE,
                weak_bg_fill: BG_ELEVATED,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, TEXT_PRIMARY),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
        },
        interact_cursor: Some(egui::CursorIcon::PointingHand),
        window_corner_radius: egui::CornerRadius::same(10),
        ..egui::Visuals::dark()
    });

    ctx.style_mut(|style| {
        style.interaction.selectable_labels = false;
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
    });
}

// =============================================================================
// HELPER - Frames
// =============================================================================
pub fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(Color32::from_rgba_unmultiplied(0x18, 0x18, 0x1b, 200))
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE))
        .corner_radius(RADIUS_LARGE)
        .inner_margin(egui::Margin::same(SPACING_XL as i8))
}

/// Card with a tinted border, e.g. the fare breakdown or danger zone
pub fn highlight_frame(tint: Color32) -> egui::Frame {
    egui::Frame::new()
        .fill(tint.gamma_multiply(0.08))
        .stroke(egui::Stroke::new(STROKE_DEFAULT, tint.gamma_multiply(0.5)))
        .corner_radius(RADIUS_LARGE)
        .inner_margin(egui::Margin::same(SPACING_LG as i8))
}

pub fn header_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_ELEVATED)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE))
        .inner_margin(egui::Margin::symmetric(24, 12))
}

pub fn modal_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(Color32::from_rgb(0x12, 0x12, 0x14))
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE))
        .corner_radius(RADIUS_LARGE)
        .inner_margin(SPACING_XL)
}

// =============================================================================
// HELPER - Button styles
// =============================================================================

/// Default gray button
pub fn button(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(text.into())
        .fill(BTN_DEFAULT)
        .corner_radius(RADIUS_DEFAULT)
}

/// Filled button in an arbitrary color with dark text
pub fn button_filled(text: impl Into<String>, fill: Color32) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(ACCENT_DARK).strong())
        .fill(fill)
        .corner_radius(RADIUS_DEFAULT)
}

/// Amber button for primary actions (sign in, order)
pub fn button_accent(text: impl Into<String>) -> egui::Button<'static> {
    button_filled(text, BTN_ACCENT)
}

pub fn button_success(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(TEXT_PRIMARY))
        .fill(BTN_SUCCESS)
        .corner_radius(RADIUS_DEFAULT)
}

/// Red button for destructive actions (reject, clear, SOS)
pub fn button_danger(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(TEXT_PRIMARY))
        .fill(BTN_DANGER)
        .corner_radius(RADIUS_DEFAULT)
}

/// Borderless button for secondary links
pub fn button_ghost(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(TEXT_MUTED))
        .fill(Color32::TRANSPARENT)
        .stroke(egui::Stroke::NONE)
}

// =============================================================================
// HELPER - Tab bar (pill-style)
// =============================================================================

/// Equal-width segmented tabs filling the available width. Returns true if
/// the selection changed.
pub fn tab_bar(ui: &mut egui::Ui, labels: &[&str], selected: &mut usize) -> bool {
    let mut changed = false;
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, TAB_HEIGHT), egui::Sense::hover());
    ui.painter().rect_filled(rect, RADIUS_DEFAULT, BG_SURFACE);

    let count = labels.len().max(1) as f32;
    let tab_w = (rect.width() - 4.0) / count;
    for (i, label) in labels.iter().enumerate() {
        let tab_rect = egui::Rect::from_min_size(
            egui::pos2(rect.min.x + 2.0 + tab_w * i as f32, rect.min.y + 2.0),
            egui::vec2(tab_w, TAB_HEIGHT - 4.0),
        );
        let resp = ui.interact(tab_rect, ui.id().with(("tab", i)), egui::Sense::click());
        let active = *selected == i;
        if active {
            ui.painter().rect_filled(tab_rect, RADIUS_DEFAULT, BG_BASE);
        } else if resp.hovered() {
            ui.painter().rect_filled(tab_rect, RADIUS_DEFAULT, BG_HOVER);
        }
        ui.painter().text(
            tab_rect.center(),
            egui::Align2::CENTER_CENTER,
            *label,
            egui::FontId::proportional(FONT_BODY),
            if active { TEXT_PRIMARY } else { TEXT_MUTED },
        );
        if resp.clicked() && !active {
            *selected = i;
            changed = true;
        }
    }
    changed
}
