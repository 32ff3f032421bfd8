//! Administrator console: sign-in card, dashboard, users, transactions,
//! orders and system settings

use super::{centered_column, AdminTab, App};
use crate::constants::{APP_NAME, BONUS_SIGN, CURRENCY_SIGN};
use crate::session::Session;
use crate::theme;
use crate::types::*;
use crate::ui::components::{badge, field_label, stat_card, text_field};
use crate::utils::format_money;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use egui_phosphor::regular as icons;

const ROW_HEIGHT: f32 = 32.0;
const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Balance column text for a user row
fn balance_label(session: &Session, user: &UserRecord) -> String {
    match user.role {
        Role::Passenger if user.phone == session.passenger_phone => format!(
            "{}{} / {}{}",
            format_money(session.wallet.currency),
            CURRENCY_SIGN,
            format_money(session.wallet.bonus),
            BONUS_SIGN
        ),
        Role::Driver if user.phone == session.driver_phone => {
            format!("{}{}", format_money(session.driver.balance), CURRENCY_SIGN)
        }
        _ => format!("0{}", CURRENCY_SIGN),
    }
}

fn header_cells(mut header: egui_extras::TableRow<'_, '_>, names: &[&str]) {
    for name in names {
        header.col(|ui| {
            ui.label(
                egui::RichText::new(*name)
                    .size(theme::FONT_SMALL)
                    .strong()
                    .color(theme::TEXT_MUTED),
            );
        });
    }
}

impl App {
    // ------------------------------------------------------------------------
    // Sign-in
    // ------------------------------------------------------------------------

    pub(crate) fn render_admin_login(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space((ui.available_height() / 2.0 - 220.0).max(24.0));
            centered_column(ui, theme::LOGIN_CARD_WIDTH, |ui| {
                theme::card_frame().show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(icons::SHIELD).size(40.0).color(theme::ADMIN));
                        ui.label(egui::RichText::new("Admin console").size(theme::FONT_DISPLAY).strong());
                        ui.label(egui::RichText::new(APP_NAME).color(theme::TEXT_MUTED));
                    });
                    ui.add_space(theme::SPACING_LG);

                    text_field(ui, "Username", &mut self.admin_username, "admin");
                    field_label(ui, "Password");
                    let pw = ui.add(
                        egui::TextEdit::singleline(&mut self.admin_password)
                            .password(true)
                            .hint_text("Enter password")
                            .margin(egui::Margin::symmetric(8, 8))
                            .desired_width(f32::INFINITY),
                    );
                    ui.add_space(theme::SPACING_LG);

                    let submit_by_enter = pw.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    let btn = egui::Button::new(
                        egui::RichText::new(format!("{}  Sign in to the console", icons::SIGN_IN))
                            .color(theme::TEXT_PRIMARY),
                    )
                    .fill(theme::ADMIN)
                    .min_size(egui::vec2(ui.available_width(), theme::BUTTON_HEIGHT_LARGE));
                    if ui.add(btn).clicked() || submit_by_enter {
                        self.admin_login();
                    }
                    ui.vertical_centered(|ui| {
                        if ui
                            .add(theme::button_ghost(format!("{}  Back to site", icons::ARROW_LEFT)))
                            .clicked()
                        {
                            self.screen = Screen::Landing;
                        }
                    });
                });
            });
        });
    }

    // ------------------------------------------------------------------------
    // Console
    // ------------------------------------------------------------------------

    pub(crate) fn render_admin(&mut self, ctx: &egui::Context) {
        let figures = [(
            "Admin balance",
            format!("{} {}", format_money(self.session.admin_balance), CURRENCY_SIGN),
        )];
        if self.render_header(ctx, "Admin console", Some(APP_NAME), &figures) {
            self.logout();
            return;
        }

        self.render_clear_confirm(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                centered_column(ui, theme::WIDE_CONTENT_WIDTH + 200.0, |ui| {
                    ui.add_space(theme::SPACING_XL * 2.0);
                    let labels: Vec<&str> = AdminTab::ALL.iter().map(|t| t.label()).collect();
                    let mut idx = AdminTab::ALL
                        .iter()
                        .position(|t| *t == self.admin_tab)
                        .unwrap_or(0);
                    if theme::tab_bar(ui, &labels, &mut idx) {
                        self.admin_tab = AdminTab::ALL[idx];
                    }
                    ui.add_space(theme::SPACING_XL);

                    match self.admin_tab {
                        AdminTab::Dashboard => self.render_dashboard(ui),
                        AdminTab::Users => self.render_users(ui),
                        AdminTab::Transactions => self.render_transactions(ui),
                        AdminTab::Orders => self.render_orders(ui),
                        AdminTab::Settings => self.render_system_settings(ui),
                    }
                    ui.add_space(theme::SPACING_XL * 2.0);
                });
            });
        });
    }

    fn render_dashboard(&mut self, ui: &mut egui::Ui) {
        let stats = self.session.stats;
        ui.columns(4, |cols| {
            stat_card(
                &mut cols[0],
                icons::USERS,
                theme::ACCENT,
                &stats.total_users.to_string(),
                "Users",
                Some("Total"),
            );
            stat_card(
                &mut cols[1],
                icons::CAR,
                theme::STATUS_SUCCESS,
                &stats.drivers_on_shift.to_string(),
                "Drivers on shift",
                Some("Online"),
            );
            stat_card(
                &mut cols[2],
                icons::TREND_UP,
                theme::TEXT_SECONDARY,
                &stats.orders_today.to_string(),
                "Orders",
                Some("Today"),
            );
            stat_card(
                &mut cols[3],
                icons::CURRENCY_CIRCLE_DOLLAR,
                theme::GOLD,
                &format!("{}{}", format_money(stats.shift_income), CURRENCY_SIGN),
                "Shift payments",
                Some("Income"),
            );
        });
        ui.add_space(theme::SPACING_XL);

        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Admin balance").size(theme::FONT_TITLE).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add(theme::button_filled(format!("{}  Top up", icons::PLUS), theme::GOLD))
                        .clicked()
                    {
                        self.top_up_admin();
                    }
                    ui.add(
                        egui::TextEdit::singleline(&mut self.top_up_amount)
                            .hint_text(format!("Amount, {}", CURRENCY_SIGN))
                            .desired_width(140.0),
                    );
                });
            });
            ui.vertical_centered(|ui| {
                ui.add_space(theme::SPACING_XL);
                ui.label(
                    egui::RichText::new(format!(
                        "{} {}",
                        format_money(self.session.admin_balance),
                        CURRENCY_SIGN
                    ))
                    .size(theme::FONT_HERO)
                    .strong()
                    .color(theme::GOLD),
                );
                ui.label(
                    egui::RichText::new("Covers driver top-ups for discounted rides")
                        .color(theme::TEXT_MUTED),
                );
                ui.add_space(theme::SPACING_XL);
            });
        });
    }

    fn render_users(&mut self, ui: &mut egui::Ui) {
        let mut toggled: Option<u32> = None;

        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("User management").size(theme::FONT_TITLE).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.user_search)
                            .hint_text(format!("{}  Search by phone...", icons::MAGNIFYING_GLASS))
                            .desired_width(220.0),
                    );
                });
            });
            ui.add_space(theme::SPACING_MD);

            let session = &self.session;
            let users = session.search_users(&self.user_search);
            if users.is_empty() {
                ui.label(egui::RichText::new("No users match the search").color(theme::TEXT_MUTED));
                return;
            }
            TableBuilder::new(ui)
                .id_salt("users_table")
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::exact(48.0))
                .column(Column::remainder())
                .column(Column::exact(110.0))
                .column(Column::exact(170.0))
                .column(Column::exact(100.0))
                .column(Column::exact(90.0))
                .column(Column::exact(120.0))
                .header(ROW_HEIGHT, |header| {
                    header_cells(
                        header,
                        &["ID", "PHONE", "ROLE", "BALANCE", "STATUS", "SHIFT", "ACTIONS"],
                    );
                })
                .body(|mut body| {
                    for user in users {
                        body.row(ROW_HEIGHT, |mut row| {
                            row.col(|ui| {
                                ui.label(user.id.to_string());
                            });
                            row.col(|ui| {
                                ui.label(egui::RichText::new(&user.phone).strong());
                            });
                            row.col(|ui| {
                                let color = match user.role {
                                    Role::Driver => theme::GOLD,
                                    Role::Passenger => theme::ACCENT,
                                };
                                badge(ui, user.role.label(), color);
                            });
                            row.col(|ui| {
                                ui.label(balance_label(session, user));
                            });
                            row.col(|ui| {
                                match user.status {
                                    UserStatus::Active => badge(ui, "Active", theme::STATUS_SUCCESS),
                                    UserStatus::Blocked => badge(ui, "Blocked", theme::STATUS_ERROR),
                                };
                            });
                            row.col(|ui| {
                                if user.role == Role::Driver {
                                    let (text, color) = if user.on_shift {
                                        ("On shift", theme::STATUS_SUCCESS)
                                    } else {
                                        ("Off", theme::TEXT_DIM)
                                    };
                                    ui.label(egui::RichText::new(text).color(color));
                                }
                            });
                            row.col(|ui| {
                                let btn = match user.status {
                                    UserStatus::Active => {
                                        theme::button_danger(format!("{}  Block", icons::PROHIBIT))
                                    }
                                    UserStatus::Blocked => {
                                        theme::button(format!("{}  Unblock", icons::LOCK_OPEN))
                                    }
                                };
                                if ui.add(btn).clicked() {
                                    toggled = Some(user.id);
                                }
                            });
                        });
                    }
                });
        });

        if let Some(id) = toggled {
            self.toggle_user_status(id);
        }
    }

    fn render_transactions(&mut self, ui: &mut egui::Ui) {
        let mut decision: Option<(u32, Decision)> = None;

        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(egui::RichText::new("Awaiting review").size(theme::FONT_TITLE).strong());
            ui.add_space(theme::SPACING_MD);

            let transactions = self.session.transactions();
            if transactions.is_empty() {
                ui.label(egui::RichText::new("Nothing to review").color(theme::TEXT_MUTED));
                return;
            }
            TableBuilder::new(ui)
                .id_salt("transactions_table")
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::exact(48.0))
                .column(Column::remainder())
                .column(Column::exact(120.0))
                .column(Column::exact(100.0))
                .column(Column::exact(130.0))
                .column(Column::exact(220.0))
                .header(ROW_HEIGHT, |header| {
                    header_cells(header, &["ID", "USER", "TYPE", "AMOUNT", "DATE", "ACTIONS"]);
                })
                .body(|mut body| {
                    for tx in transactions {
                        body.row(ROW_HEIGHT + 4.0, |mut row| {
                            row.col(|ui| {
                                ui.label(tx.id.to_string());
                            });
                            row.col(|ui| {
                                ui.label(egui::RichText::new(&tx.user).strong());
                            });
                            row.col(|ui| {
                                let color = if tx.kind.is_deposit() {
                                    theme::ACCENT
                                } else {
                                    theme::TEXT_SECONDARY
                                };
                                badge(ui, tx.kind.label(), color);
                            });
                            row.col(|ui| {
                                ui.label(
                                    egui::RichText::new(format!("{}{}", format_money(tx.amount), CURRENCY_SIGN))
                                        .strong(),
                                );
                            });
                            row.col(|ui| {
                                ui.label(
                                    egui::RichText::new(tx.created_at.format(DATE_FORMAT).to_string())
                                        .size(theme::FONT_SMALL)
                                        .color(theme::TEXT_MUTED),
                                );
                            });
                            row.col(|ui| {
                                if ui
                                    .add(theme::button_success(format!("{}  Approve", icons::CHECK)))
                                    .clicked()
                                {
                                    decision = Some((tx.id, Decision::Approve));
                                }
                                if ui
                                    .add(theme::button_danger(format!("{}  Reject", icons::X)))
                                    .clicked()
                                {
                                    decision = Some((tx.id, Decision::Reject));
                                }
                            });
                        });
                    }
                });
        });

        if let Some((id, decision)) = decision {
            self.decide_transaction(id, decision);
        }
    }

    fn render_orders(&mut self, ui: &mut egui::Ui) {
        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(egui::RichText::new("All orders").size(theme::FONT_TITLE).strong());
            ui.add_space(theme::SPACING_MD);

            let orders = self.session.orders();
            if orders.is_empty() {
                ui.label(egui::RichText::new("No orders").color(theme::TEXT_MUTED));
                return;
            }
            TableBuilder::new(ui)
                .id_salt("orders_table")
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::exact(48.0))
                .column(Column::remainder())
                .column(Column::remainder())
                .column(Column::exact(90.0))
                .column(Column::exact(90.0))
                .column(Column::exact(100.0))
                .column(Column::exact(130.0))
                .header(ROW_HEIGHT, |header| {
                    header_cells(
                        header,
                        &["ID", "PASSENGER", "DRIVER", "AMOUNT", "DISCOUNT", "STATUS", "DATE"],
                    );
                })
                .body(|mut body| {
                    for order in orders.iter().rev() {
                        body.row(ROW_HEIGHT, |mut row| {
                            row.col(|ui| {
                                ui.label(order.id.to_string());
                            });
                            row.col(|ui| {
                                ui.label(egui::RichText::new(&order.passenger).strong());
                            });
                            row.col(|ui| match &order.driver {
                                Some(driver) => {
                                    ui.label(egui::RichText::new(driver).strong());
                                }
                                None => {
                                    ui.label(egui::RichText::new("Searching…").color(theme::TEXT_DIM));
                                }
                            });
                            row.col(|ui| {
                                ui.label(format!("{}{}", format_money(order.amount), CURRENCY_SIGN));
                            });
                            row.col(|ui| {
                                ui.label(
                                    egui::RichText::new(format!(
                                        "{}{}",
                                        format_money(order.discount),
                                        CURRENCY_SIGN
                                    ))
                                    .color(theme::STATUS_SUCCESS),
                                );
                            });
                            row.col(|ui| {
                                let color = match order.status {
                                    OrderStatus::Completed => theme::STATUS_SUCCESS,
                                    OrderStatus::Created => theme::ACCENT,
                                };
                                badge(ui, order.status.label(), color);
                            });
                            row.col(|ui| {
                                ui.label(
                                    egui::RichText::new(order.created_at.format(DATE_FORMAT).to_string())
                                        .size(theme::FONT_SMALL)
                                        .color(theme::TEXT_MUTED),
                                );
                            });
                        });
                    }
                });
        });
    }

    fn render_system_settings(&mut self, ui: &mut egui::Ui) {
        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(egui::RichText::new("System settings").size(theme::FONT_TITLE).strong());
            ui.add_space(theme::SPACING_MD);

            ui.scope(|ui| {
                ui.set_max_width(420.0);
                text_field(ui, "City name", &mut self.settings_draft.city_name, "");
                text_field(
                    ui,
                    &format!("Driver shift price ({})", CURRENCY_SIGN),
                    &mut self.settings_draft.shift_price,
                    "350",
                );
                text_field(
                    ui,
                    "Discount for paying through the site (%)",
                    &mut self.settings_draft.discount_percent,
                    "30",
                );
            });
            ui.add_space(theme::SPACING_MD);

            theme::highlight_frame(theme::BORDER_DEFAULT).show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new("Maintenance mode").strong());
                        ui.label(
                            egui::RichText::new("Disable sign-in for passengers and drivers")
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_MUTED),
                        );
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.checkbox(&mut self.settings_draft.maintenance_mode, "");
                    });
                });
            });
            ui.add_space(theme::SPACING_MD);

            if ui
                .add(theme::button_accent(format!("{}  Save settings", icons::FLOPPY_DISK)))
                .clicked()
            {
                self.save_admin_settings();
            }
        });
        ui.add_space(theme::SPACING_XL);

        theme::highlight_frame(theme::STATUS_ERROR).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(
                egui::RichText::new("Danger zone")
                    .size(theme::FONT_TITLE)
                    .strong()
                    .color(theme::STATUS_ERROR),
            );
            ui.add_space(theme::SPACING_MD);

            let danger_row = |ui: &mut egui::Ui, title: &str, desc: &str, btn: egui::Button<'static>| {
                let mut clicked = false;
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(title).strong());
                        ui.label(
                            egui::RichText::new(desc)
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_MUTED),
                        );
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        clicked = ui.add(btn).clicked();
                    });
                });
                clicked
            };

            if danger_row(
                ui,
                "Export database",
                "Download a full copy of the data",
                theme::button(format!("{}  Export", icons::DOWNLOAD_SIMPLE)),
            ) {
                self.show_info("Export is not available in the demo");
            }
            ui.separator();
            if danger_row(
                ui,
                "Clear order history",
                "Delete all completed orders",
                theme::button_danger(format!("{}  Clear", icons::TRASH)),
            ) {
                self.show_clear_confirm = true;
            }
        });
    }

    fn render_clear_confirm(&mut self, ctx: &egui::Context) {
        if !self.show_clear_confirm {
            return;
        }
        let modal = egui::Modal::new(egui::Id::new("clear_history_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(180))
            .frame(theme::modal_frame());
        let response = modal.show(ctx, |ui| {
            ui.set_width(340.0);
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(icons::WARNING).size(36.0).color(theme::STATUS_ERROR));
                ui.label(egui::RichText::new("Clear order history?").size(theme::FONT_HEADING).strong());
                ui.label(
                    egui::RichText::new("Completed orders are removed for the rest of the session.")
                        .color(theme::TEXT_MUTED),
                );
                ui.add_space(theme::SPACING_LG);
                ui.horizontal(|ui| {
                    if ui.add(theme::button("Cancel")).clicked() {
                        self.show_clear_confirm = false;
                    }
                    if ui.add(theme::button_danger(format!("{}  Clear", icons::TRASH))).clicked() {
                        self.show_clear_confirm = false;
                        self.clear_order_history();
                    }
                });
            });
        });
        if response.should_close() {
            self.show_clear_confirm = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn balance_labels_follow_the_session() {
        let mut session = Session::demo(Local::now());
        let users = session.users().to_vec();
        assert_eq!(balance_label(&session, &users[0]), "3,500₽ / 1,250B");
        assert_eq!(balance_label(&session, &users[1]), "8,450₽");

        session.driver.balance = 100;
        assert_eq!(balance_label(&session, &users[1]), "100₽");

        let stranger = UserRecord {
            id: 9,
            phone: "+70000000000".into(),
            role: Role::Passenger,
            status: UserStatus::Active,
            on_shift: false,
        };
        assert_eq!(balance_label(&session, &stranger), "0₽");
    }
}
