//! Driver screen: shift payment, daily figures, car details and withdrawals

use super::{centered_column, App};
use crate::constants::{CURRENCY_SIGN, SHIFT_HOURS};
use crate::theme;
use crate::ui::components::{badge, stat_card, text_field};
use crate::utils::format_money;
use chrono::Local;
use eframe::egui;
use egui_phosphor::regular as icons;

impl App {
    pub(crate) fn render_driver(&mut self, ctx: &egui::Context) {
        let figures = [(
            "Balance",
            format!("{} {}", format_money(self.session.driver.balance), CURRENCY_SIGN),
        )];
        if self.render_header(ctx, "Driver cabinet", None, &figures) {
            self.logout();
            return;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                centered_column(ui, theme::WIDE_CONTENT_WIDTH, |ui| {
                    ui.add_space(theme::SPACING_XL * 2.0);
                    self.render_shift_card(ui);
                    ui.add_space(theme::SPACING_XL);

                    ui.columns(3, |cols| {
                        stat_card(&mut cols[0], icons::TREND_UP, theme::ACCENT, "24", "Trips today", None);
                        stat_card(
                            &mut cols[1],
                            icons::CURRENCY_CIRCLE_DOLLAR,
                            theme::GOLD,
                            &format!("{} {}", format_money(6840), CURRENCY_SIGN),
                            "Earned today",
                            None,
                        );
                        stat_card(&mut cols[2], icons::STAR, theme::STATUS_WARNING, "4.8", "Your rating", None);
                    });
                    ui.add_space(theme::SPACING_XL);

                    self.render_car_form(ui);
                    ui.add_space(theme::SPACING_XL);
                    self.render_withdraw_row(ui);
                    ui.add_space(theme::SPACING_XL * 2.0);
                });
            });
        });
    }

    fn render_shift_card(&mut self, ui: &mut egui::Ui) {
        let price = self.settings.shift_price;
        let now = Local::now();
        let active = self.session.driver.shift_active(now);

        theme::highlight_frame(theme::GOLD).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Open a shift").size(theme::FONT_DISPLAY - 4.0).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    badge(ui, &format!("{} {}/day", format_money(price), CURRENCY_SIGN), theme::GOLD);
                });
            });
            ui.add_space(theme::SPACING_SM);

            match self.session.driver.shift_ends_at.filter(|_| active) {
                Some(ends_at) => {
                    ui.label(
                        egui::RichText::new(format!(
                            "{}  Shift is open until {}",
                            icons::CHECK_CIRCLE,
                            ends_at.format("%d.%m.%Y %H:%M")
                        ))
                        .color(theme::STATUS_SUCCESS),
                    );
                }
                None => {
                    ui.label(
                        egui::RichText::new(format!(
                            "Once the shift is paid you can take orders for {} hours",
                            SHIFT_HOURS
                        ))
                        .color(theme::TEXT_MUTED),
                    );
                }
            }
            ui.add_space(theme::SPACING_MD);

            let btn = theme::button_filled(
                format!("{}  Pay for shift ({} {})", icons::PLAY_CIRCLE, format_money(price), CURRENCY_SIGN),
                theme::GOLD,
            )
            .min_size(egui::vec2(ui.available_width(), theme::BUTTON_HEIGHT_LARGE + 8.0));
            if ui.add_enabled(!active, btn).clicked() {
                self.pay_shift();
            }
        });
    }

    fn render_car_form(&mut self, ui: &mut egui::Ui) {
        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(egui::RichText::new("Driver details").size(theme::FONT_TITLE).strong());
            ui.add_space(theme::SPACING_MD);

            ui.columns(2, |cols| {
                text_field(&mut cols[0], "Car make", &mut self.car_draft.make, "Toyota");
                text_field(&mut cols[1], "Color", &mut self.car_draft.color, "White");
            });
            text_field(ui, "License plate", &mut self.car_draft.plate, "A123BC 777");
            text_field(ui, "Driver's license", &mut self.car_draft.license, "1234 567890");
            ui.add_space(theme::SPACING_MD);

            let changed = self.car_draft != self.session.driver.car;
            let btn = theme::button_accent("Save changes")
                .min_size(egui::vec2(ui.available_width(), theme::BUTTON_HEIGHT + 4.0));
            if ui.add_enabled(changed, btn).clicked() {
                self.save_car();
            }
        });
    }

    fn render_withdraw_row(&mut self, ui: &mut egui::Ui) {
        ui.columns(2, |cols| {
            let ui = &mut cols[0];
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.withdraw_amount)
                        .hint_text(format!("Amount, {}", CURRENCY_SIGN))
                        .margin(egui::Margin::symmetric(8, 12))
                        .desired_width(120.0),
                );
                let size = egui::vec2(ui.available_width(), 44.0);
                if ui
                    .add(theme::button(format!("{}  Withdraw funds", icons::ARROW_LINE_DOWN)).min_size(size))
                    .clicked()
                {
                    self.request_withdrawal();
                }
            });
            let pending = self.session.pending_withdrawals();
            if pending > 0 {
                ui.label(
                    egui::RichText::new(format!(
                        "{} {} awaiting review",
                        format_money(pending),
                        CURRENCY_SIGN
                    ))
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_MUTED),
                );
            }

            let ui = &mut cols[1];
            let size = egui::vec2(ui.available_width(), 44.0);
            if ui
                .add(theme::button_danger(format!("{}  SOS", icons::SIREN)).min_size(size))
                .clicked()
            {
                tracing::warn!(phone = %self.session.driver_phone, "Driver SOS pressed");
                self.show_error("SOS sent. Dispatch will call you back right away");
            }
        });
    }
}
