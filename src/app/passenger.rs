//! Passenger screen: quick order form with fare breakdown and trip history

use super::{centered_column, App};
use crate::constants::{APP_NAME, BONUS_SIGN, CURRENCY_SIGN};
use crate::fare::{parse_trip_amount, PaymentMethod};
use crate::theme;
use crate::types::{unit_sign, BalanceType, OrderStatus};
use crate::ui::components::{badge, text_field, value_row};
use crate::utils::format_money;
use eframe::egui;
use egui_phosphor::regular as icons;

fn method_icon(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Currency => icons::WALLET,
        PaymentMethod::Bonus => icons::GIFT,
        PaymentMethod::Cash => icons::MONEY,
    }
}

impl App {
    pub(crate) fn render_passenger(&mut self, ctx: &egui::Context) {
        let figures = [
            ("Bonus", format!("{} {}", format_money(self.session.wallet.bonus), BONUS_SIGN)),
            ("Balance", format!("{} {}", format_money(self.session.wallet.currency), CURRENCY_SIGN)),
        ];
        if self.render_header(ctx, APP_NAME, None, &figures) {
            self.logout();
            return;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                centered_column(ui, theme::CONTENT_WIDTH, |ui| {
                    ui.add_space(theme::SPACING_XL * 2.0);
                    self.render_order_form(ui);
                    ui.add_space(theme::SPACING_XL);
                    self.render_top_up(ui);
                    ui.add_space(theme::SPACING_XL);

                    ui.columns(2, |cols| {
                        let size = egui::vec2(cols[0].available_width(), 56.0);
                        let label = if self.show_history { "Hide trip history" } else { "Trip history" };
                        if cols[0]
                            .add(theme::button(format!("{}  {}", icons::CLOCK_COUNTER_CLOCKWISE, label)).min_size(size))
                            .clicked()
                        {
                            self.show_history = !self.show_history;
                        }
                        if cols[1]
                            .add(theme::button_danger(format!("{}  SOS", icons::SIREN)).min_size(size))
                            .clicked()
                        {
                            tracing::warn!(phone = %self.session.passenger_phone, "Passenger SOS pressed");
                            self.show_error("SOS sent. Dispatch will call you back right away");
                        }
                    });

                    if self.show_history {
                        ui.add_space(theme::SPACING_XL);
                        self.render_trip_history(ui);
                    }
                    ui.add_space(theme::SPACING_XL * 2.0);
                });
            });
        });
    }

    fn render_order_form(&mut self, ui: &mut egui::Ui) {
        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(egui::RichText::new("Quick taxi order").size(theme::FONT_DISPLAY - 4.0).strong());
            ui.add_space(theme::SPACING_LG);

            text_field(ui, "From", &mut self.order_from, "Pickup address");
            text_field(ui, "To", &mut self.order_to, "Destination address");

            crate::ui::components::field_label(ui, &format!("Trip price ({})", CURRENCY_SIGN));
            ui.add(
                egui::TextEdit::singleline(&mut self.order_amount)
                    .font(egui::FontId::proportional(theme::FONT_TITLE))
                    .margin(egui::Margin::symmetric(8, 8))
                    .desired_width(f32::INFINITY),
            );

            crate::ui::components::field_label(ui, "Payment method");
            ui.columns(PaymentMethod::ALL.len(), |cols| {
                for (col, method) in cols.iter_mut().zip(PaymentMethod::ALL) {
                    let text = format!("{}  {}", method_icon(method), method.label());
                    let size = egui::vec2(col.available_width(), theme::BUTTON_HEIGHT + 4.0);
                    let btn = if self.payment_method == method {
                        theme::button_accent(text)
                    } else {
                        theme::button(text)
                    };
                    if col.add(btn.min_size(size)).clicked() {
                        self.payment_method = method;
                    }
                }
            });

            if self.payment_method.is_discounted() {
                let amount = parse_trip_amount(&self.order_amount);
                let fare = self.fare_policy.apply(amount, self.payment_method);
                ui.add_space(theme::SPACING_SM);
                theme::highlight_frame(theme::ACCENT).show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    value_row(
                        ui,
                        "Trip price:",
                        egui::RichText::new(format!("{} {}", format_money(amount), CURRENCY_SIGN)).strong(),
                    );
                    value_row(
                        ui,
                        &format!("{}% discount:", self.fare_policy.discount_percent()),
                        egui::RichText::new(format!("-{} {}", format_money(fare.discount), CURRENCY_SIGN))
                            .strong()
                            .color(theme::STATUS_SUCCESS),
                    );
                    ui.separator();
                    value_row(
                        ui,
                        "To pay:",
                        egui::RichText::new(format!(
                            "{} {}",
                            format_money(fare.final_amount),
                            unit_sign(self.payment_method)
                        ))
                        .size(theme::FONT_TITLE)
                        .strong()
                        .color(theme::TEXT_PRIMARY),
                    );
                });
            }

            text_field(ui, "Comment", &mut self.order_comment, "Anything the driver should know");
            ui.add_space(theme::SPACING_MD);

            let order_btn = theme::button_accent(format!("{}  Order taxi", icons::NAVIGATION_ARROW))
                .min_size(egui::vec2(ui.available_width(), theme::BUTTON_HEIGHT_LARGE + 8.0));
            if ui.add(order_btn).clicked() {
                self.submit_order();
            }
        });
    }

    fn render_top_up(&mut self, ui: &mut egui::Ui) {
        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(egui::RichText::new("Top up balance").size(theme::FONT_TITLE).strong());
            ui.label(
                egui::RichText::new("Requests are credited once an administrator approves them")
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_MUTED),
            );
            ui.add_space(theme::SPACING_MD);
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.deposit_amount)
                        .hint_text("Amount")
                        .margin(egui::Margin::symmetric(8, 8))
                        .desired_width(140.0),
                );
                for (balance, icon, caption) in [
                    (BalanceType::Currency, icons::WALLET, "Balance"),
                    (BalanceType::Bonus, icons::GIFT, "Bonus"),
                ] {
                    let text = format!("{}  {} ({})", icon, caption, balance.sign());
                    if ui
                        .add(theme::button(text).min_size(egui::vec2(0.0, theme::BUTTON_HEIGHT + 4.0)))
                        .clicked()
                    {
                        self.request_deposit(balance);
                    }
                }
            });
        });
    }

    fn render_trip_history(&mut self, ui: &mut egui::Ui) {
        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(egui::RichText::new("Trip history").size(theme::FONT_TITLE).strong());
            ui.add_space(theme::SPACING_MD);

            let orders = self.session.passenger_orders();
            if orders.is_empty() {
                ui.label(egui::RichText::new("No trips yet").color(theme::TEXT_MUTED));
                return;
            }
            for order in orders {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(format!("#{}", order.id)).color(theme::TEXT_DIM));
                    let route = if order.from.is_empty() {
                        "Route not recorded".to_string()
                    } else {
                        format!("{} → {}", order.from, order.to)
                    };
                    ui.label(route);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let color = match order.status {
                            OrderStatus::Completed => theme::STATUS_SUCCESS,
                            OrderStatus::Created => theme::ACCENT,
                        };
                        badge(ui, order.status.label(), color);
                        ui.label(
                            egui::RichText::new(format!(
                                "{} {}",
                                format_money(order.final_price),
                                unit_sign(order.method)
                            ))
                            .strong(),
                        );
                        ui.label(
                            egui::RichText::new(order.created_at.format("%d.%m.%Y %H:%M").to_string())
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        );
                    });
                });
                ui.separator();
            }
        });
    }
}
