//! Public landing page and the passenger/driver sign-in card

use super::{centered_column, App};
use crate::constants::APP_NAME;
use crate::theme;
use crate::types::{Role, Screen};
use crate::ui::components::text_field;
use eframe::egui;
use egui_phosphor::regular as icons;

const ADVANTAGES: [(&str, &str, &str); 3] = [
    (icons::PERCENT, "discount", "When paying from your site balance"),
    (icons::SHIELD_CHECK, "Safety", "Verified drivers and an SOS button"),
    (icons::LIGHTNING, "Fast", "Average pickup in just 3 minutes"),
];

impl App {
    pub(crate) fn render_landing(&mut self, ctx: &egui::Context) {
        let logo = self.logo(ctx);
        let city = self.settings.city_name.clone();
        let percent = self.fare_policy.discount_percent();
        let maintenance = self.settings.maintenance_mode;

        egui::TopBottomPanel::top("landing_header")
            .exact_height(theme::HEADER_HEIGHT + 8.0)
            .frame(egui::Frame::new().fill(theme::BG_BASE).inner_margin(egui::Margin::symmetric(32, 12)))
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    if let Some(logo) = logo {
                        ui.image(logo);
                    }
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new(APP_NAME)
                                .size(theme::FONT_TITLE + 4.0)
                                .strong()
                                .color(theme::TEXT_PRIMARY),
                        );
                        ui.label(egui::RichText::new(&city).color(theme::TEXT_MUTED));
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .add(theme::button_ghost(format!("{}  Admin console", icons::SHIELD)))
                            .clicked()
                        {
                            self.screen = Screen::AdminLogin;
                        }
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                centered_column(ui, theme::WIDE_CONTENT_WIDTH, |ui| {
                    if maintenance {
                        ui.add_space(theme::SPACING_LG);
                        theme::highlight_frame(theme::STATUS_WARNING).show(ui, |ui| {
                            ui.set_min_width(ui.available_width());
                            ui.label(
                                egui::RichText::new(format!(
                                    "{}  Technical maintenance: sign-in is temporarily unavailable",
                                    icons::WRENCH
                                ))
                                .color(theme::STATUS_WARNING),
                            );
                        });
                    }

                    ui.add_space(48.0);
                    ui.columns(2, |cols| {
                        self.render_hero(&mut cols[0], percent);
                        self.render_login_card(&mut cols[1], maintenance);
                    });

                    ui.add_space(64.0);
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new("Why ride with us")
                                .size(theme::FONT_DISPLAY)
                                .strong(),
                        );
                    });
                    ui.add_space(theme::SPACING_XL);
                    ui.columns(ADVANTAGES.len(), |cols| {
                        for (col, (icon, title, desc)) in cols.iter_mut().zip(ADVANTAGES) {
                            let title = if title == "discount" {
                                format!("{}% off", percent)
                            } else {
                                title.to_string()
                            };
                            theme::card_frame().show(col, |ui| {
                                ui.set_min_width(ui.available_width());
                                ui.label(egui::RichText::new(icon).size(28.0).color(theme::ACCENT));
                                ui.add_space(theme::SPACING_SM);
                                ui.label(egui::RichText::new(title).size(theme::FONT_HEADING).strong());
                                ui.label(egui::RichText::new(desc).color(theme::TEXT_MUTED));
                            });
                        }
                    });
                    ui.add_space(48.0);
                });
            });
        });
    }

    fn render_hero(&mut self, ui: &mut egui::Ui, percent: u8) {
        ui.add(egui::Label::new(
            egui::RichText::new("Premium service")
                .size(theme::FONT_SMALL)
                .color(theme::ACCENT),
        ));
        ui.add_space(theme::SPACING_SM);
        ui.label(
            egui::RichText::new("Fast taxi")
                .size(theme::FONT_HERO)
                .strong()
                .color(theme::TEXT_PRIMARY),
        );
        ui.label(
            egui::RichText::new("in your city")
                .size(theme::FONT_HERO)
                .strong()
                .color(theme::ACCENT),
        );
        ui.add_space(theme::SPACING_LG);
        ui.label(
            egui::RichText::new(format!(
                "{}% off when you pay from your balance. Quick pickup. Reliable drivers.",
                percent
            ))
            .size(theme::FONT_HEADING)
            .color(theme::TEXT_MUTED),
        );
        ui.add_space(theme::SPACING_XL);
        ui.horizontal(|ui| {
            for (icon, value, caption) in [
                (icons::CLOCK, "3 min", "Average pickup"),
                (icons::STAR, "4.9", "Service rating"),
            ] {
                ui.label(egui::RichText::new(icon).size(24.0).color(theme::ACCENT));
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(value).strong());
                    ui.label(
                        egui::RichText::new(caption)
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_MUTED),
                    );
                });
                ui.add_space(theme::SPACING_XL);
            }
        });
    }

    fn render_login_card(&mut self, ui: &mut egui::Ui, maintenance: bool) {
        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            let mut tab = match self.login_role {
                Role::Passenger => 0,
                Role::Driver => 1,
            };
            if theme::tab_bar(ui, &[Role::Passenger.label(), Role::Driver.label()], &mut tab) {
                self.login_role = if tab == 0 { Role::Passenger } else { Role::Driver };
            }
            ui.add_space(theme::SPACING_LG);

            text_field(ui, "Phone number", &mut self.login_phone, "+7 (999) 123-45-67");
            ui.add_space(theme::SPACING_SM);
            crate::ui::components::field_label(ui, "Password");
            ui.add(
                egui::TextEdit::singleline(&mut self.login_password)
                    .password(true)
                    .hint_text("Enter password")
                    .margin(egui::Margin::symmetric(8, 8))
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(theme::SPACING_LG);

            let role = self.login_role;
            let (fill, register_label) = match role {
                Role::Passenger => (theme::ACCENT, "Register"),
                Role::Driver => (theme::GOLD, "Register as a driver"),
            };
            let sign_in = theme::button_filled(
                format!("Sign in as {}", role.label().to_lowercase()),
                fill,
            )
            .min_size(egui::vec2(ui.available_width(), theme::BUTTON_HEIGHT_LARGE));
            if ui.add_enabled(!maintenance, sign_in).clicked() {
                self.login(role);
            }
            ui.vertical_centered(|ui| {
                if ui.add(theme::button_ghost(register_label)).clicked() {
                    self.show_info("Registration opens soon. Use the demo sign-in for now");
                }
            });
        });
    }
}
