//! Toast notifications (bottom-right, fade out, pause on hover)

use super::App;
use crate::constants::TOAST_SECONDS;
use crate::theme;
use eframe::egui;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ToastKind {
    Success,
    Info,
    Error,
}

impl ToastKind {
    fn icon_and_color(self) -> (&'static str, egui::Color32) {
        match self {
            ToastKind::Success => (egui_phosphor::regular::CHECK_CIRCLE, theme::STATUS_SUCCESS),
            ToastKind::Info => (egui_phosphor::regular::INFO, theme::ACCENT),
            ToastKind::Error => (egui_phosphor::regular::WARNING_CIRCLE, theme::STATUS_ERROR),
        }
    }
}

pub(crate) struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub start: Instant,
}

impl App {
    fn show_toast(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            kind,
            start: Instant::now(),
        });
    }

    pub(crate) fn show_success(&mut self, message: impl Into<String>) {
        self.show_toast(ToastKind::Success, message);
    }

    pub(crate) fn show_info(&mut self, message: impl Into<String>) {
        self.show_toast(ToastKind::Info, message);
    }

    pub(crate) fn show_error(&mut self, message: impl Into<String>) {
        self.show_toast(ToastKind::Error, message);
    }

    pub(crate) fn render_toast(&mut self, ctx: &egui::Context) {
        let Some(toast) = &self.toast else {
            return;
        };
        let elapsed = toast.start.elapsed().as_secs_f32();
        if elapsed > TOAST_SECONDS {
            self.toast = None;
            return;
        }
        // Fade over the last half second
        let alpha = ((TOAST_SECONDS - elapsed) / 0.5).clamp(0.0, 1.0);
        let (icon, color) = toast.kind.icon_and_color();
        let message = toast.message.clone();

        let screen = ctx.screen_rect();
        let margin = 20.0;
        let response = egui::Area::new(egui::Id::new("toast"))
            .pivot(egui::Align2::RIGHT_BOTTOM)
            .fixed_pos(egui::pos2(screen.right() - margin, screen.bottom() - margin))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.set_opacity(alpha);
                theme::modal_frame()
                    .inner_margin(egui::Margin::symmetric(14, 10))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(icon).size(18.0).color(color));
                            ui.label(
                                egui::RichText::new(message)
                                    .size(theme::FONT_BODY)
                                    .color(theme::TEXT_PRIMARY),
                            );
                        });
                    });
            })
            .response;

        if response.hovered() {
            // Restart the clock while the pointer rests on it
            if let Some(toast) = &mut self.toast {
                toast.start = Instant::now();
            }
        }
        ctx.request_repaint();
    }
}
