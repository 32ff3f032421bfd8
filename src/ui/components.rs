//! Reusable UI components
//!
//! Small widgets shared by the passenger, driver and admin screens.

use crate::theme;
use eframe::egui;

/// Small rounded label, e.g. a role or status badge
pub fn badge(ui: &mut egui::Ui, text: &str, color: egui::Color32) -> egui::Response {
    egui::Frame::new()
        .fill(color.gamma_multiply(0.18))
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(text)
                    .size(theme::FONT_SMALL)
                    .color(color),
            )
        })
        .inner
}

/// Muted caption above an input
pub fn field_label(ui: &mut egui::Ui, text: &str) {
    ui.label(
        egui::RichText::new(text)
            .size(theme::FONT_SMALL)
            .color(theme::TEXT_MUTED),
    );
}

/// Full-width single line input with a hint
pub fn text_field(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str) -> egui::Response {
    field_label(ui, label);
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .margin(egui::Margin::symmetric(8, 8))
            .desired_width(f32::INFINITY),
    )
}

/// Right-aligned caption/value pair used in the screen headers
pub fn header_figure(ui: &mut egui::Ui, caption: &str, value: &str) {
    ui.vertical(|ui| {
        ui.label(
            egui::RichText::new(caption)
                .size(theme::FONT_SMALL)
                .color(theme::TEXT_MUTED),
        );
        ui.label(
            egui::RichText::new(value)
                .size(theme::FONT_HEADING)
                .strong()
                .color(theme::TEXT_PRIMARY),
        );
    });
}

/// Dashboard tile: icon, big figure and caption, with an optional badge
pub fn stat_card(
    ui: &mut egui::Ui,
    icon: &str,
    color: egui::Color32,
    value: &str,
    caption: &str,
    tag: Option<&str>,
) {
    theme::card_frame().show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(icon).size(24.0).color(color));
            if let Some(tag) = tag {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    badge(ui, tag, color);
                });
            }
        });
        ui.add_space(theme::SPACING_SM);
        ui.label(
            egui::RichText::new(value)
                .size(theme::FONT_DISPLAY)
                .strong()
                .color(theme::TEXT_PRIMARY),
        );
        ui.label(
            egui::RichText::new(caption)
                .size(theme::FONT_SMALL)
                .color(theme::TEXT_MUTED),
        );
    });
}

/// Two-column row of a label and a value, value right-aligned
pub fn value_row(ui: &mut egui::Ui, label: &str, value: egui::RichText) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(label).color(theme::TEXT_SECONDARY));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(value);
        });
    });
}
