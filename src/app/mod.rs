//! App module - contains the main application state and logic

mod admin;
mod driver;
mod landing;
mod passenger;
mod toast;

use crate::constants::*;
use crate::fare::{parse_trip_amount, FarePolicy, PaymentMethod};
use crate::session::{OrderRequest, Session, SessionError};
use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use crate::utils::{format_money, parse_strict_amount, rasterize_logo};
use chrono::Local;
use eframe::egui;
use std::path::PathBuf;
use toast::Toast;
use tracing::{info, warn};

/// Editable copy of the tariff settings on the admin settings tab
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SettingsDraft {
    pub city_name: String,
    pub shift_price: String,
    pub discount_percent: String,
    pub maintenance_mode: bool,
}

impl SettingsDraft {
    fn from_settings(settings: &Settings) -> Self {
        Self {
            city_name: settings.city_name.clone(),
            shift_price: settings.shift_price.to_string(),
            discount_percent: settings.discount_percent.to_string(),
            maintenance_mode: settings.maintenance_mode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AdminTab {
    Dashboard,
    Users,
    Transactions,
    Orders,
    Settings,
}

impl AdminTab {
    pub const ALL: [AdminTab; 5] = [
        AdminTab::Dashboard,
        AdminTab::Users,
        AdminTab::Transactions,
        AdminTab::Orders,
        AdminTab::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AdminTab::Dashboard => "Dashboard",
            AdminTab::Users => "Users",
            AdminTab::Transactions => "Transactions",
            AdminTab::Orders => "Orders",
            AdminTab::Settings => "Settings",
        }
    }
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) session: Session,
    pub(crate) settings: Settings,
    pub(crate) fare_policy: FarePolicy,
    pub(crate) data_dir: PathBuf,
    pub(crate) screen: Screen,
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    // Landing / login
    pub(crate) login_role: Role,
    pub(crate) login_phone: String,
    pub(crate) login_password: String,
    // Passenger order form
    pub(crate) order_from: String,
    pub(crate) order_to: String,
    pub(crate) order_amount: String,
    pub(crate) order_comment: String,
    pub(crate) payment_method: PaymentMethod,
    pub(crate) show_history: bool,
    // Driver
    pub(crate) car_draft: CarProfile,
    pub(crate) withdraw_amount: String,
    pub(crate) deposit_amount: String,
    // Admin console
    pub(crate) admin_username: String,
    pub(crate) admin_password: String,
    pub(crate) admin_tab: AdminTab,
    pub(crate) user_search: String,
    pub(crate) top_up_amount: String,
    pub(crate) settings_draft: SettingsDraft,
    pub(crate) show_clear_confirm: bool,
    // Toast notification
    pub(crate) toast: Option<Toast>,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        Self::with_state(settings, data_dir)
    }

    /// State without any egui context attached
    pub(crate) fn with_state(settings: Settings, data_dir: PathBuf) -> Self {
        let settings_draft = SettingsDraft::from_settings(&settings);
        Self {
            session: Session::demo(Local::now()),
            fare_policy: settings.fare_policy(),
            settings,
            data_dir,
            screen: Screen::Landing,
            logo_texture: None,
            login_role: Role::Passenger,
            login_phone: String::new(),
            login_password: String::new(),
            order_from: String::new(),
            order_to: String::new(),
            order_amount: DEFAULT_TRIP_AMOUNT.to_string(),
            order_comment: String::new(),
            payment_method: PaymentMethod::Currency,
            show_history: false,
            car_draft: CarProfile::default(),
            withdraw_amount: String::new(),
            deposit_amount: String::new(),
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            admin_tab: AdminTab::Dashboard,
            user_search: String::new(),
            top_up_amount: String::new(),
            settings_draft,
            show_clear_confirm: false,
            toast: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
        }
    }

    pub fn save_settings(&mut self) {
        self.settings.window_x = self.window_pos.map(|p| p.x);
        self.settings.window_y = self.window_pos.map(|p| p.y);
        self.settings.window_w = self.window_size.map(|s| s.x);
        self.settings.window_h = self.window_size.map(|s| s.y);
        self.settings.save(&self.data_dir);
    }

    // ------------------------------------------------------------------------
    // Screen switching
    // ------------------------------------------------------------------------

    pub(crate) fn login(&mut self, role: Role) {
        if self.settings.maintenance_mode {
            self.show_error("The service is under maintenance");
            return;
        }
        let phone = match role {
            Role::Passenger => &self.session.passenger_phone,
            Role::Driver => &self.session.driver_phone,
        };
        if self.session.is_blocked(phone) {
            warn!(role = role.label(), "Blocked account tried to sign in");
            self.show_error("This account is blocked");
            return;
        }
        info!(role = role.label(), "User signed in");
        self.screen = role.screen();
        self.login_password.clear();
        self.show_success(format!("Welcome, {}!", role.label().to_lowercase()));
    }

    pub(crate) fn logout(&mut self) {
        info!(screen = ?self.screen, "Signed out");
        self.screen = match self.screen {
            Screen::Admin => Screen::AdminLogin,
            _ => Screen::Landing,
        };
        self.show_history = false;
    }

    pub(crate) fn admin_login(&mut self) {
        info!(username = %self.admin_username, "Admin signed in");
        self.screen = Screen::Admin;
        self.admin_tab = AdminTab::Dashboard;
        self.show_success("Welcome to the admin console!");
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    fn report(&mut self, action: &str, err: SessionError) {
        warn!(action, error = %err, "Action rejected");
        self.show_error(err.to_string());
    }

    pub(crate) fn submit_order(&mut self) {
        let request = OrderRequest {
            from: self.order_from.clone(),
            to: self.order_to.clone(),
            amount: parse_trip_amount(&self.order_amount),
            method: self.payment_method,
            comment: self.order_comment.clone(),
        };
        let policy = self.fare_policy;
        match self.session.place_order(request, &policy, Local::now()) {
            Ok(order) => {
                let msg = format!(
                    "Order #{} placed: {} {}",
                    order.id,
                    format_money(order.final_price),
                    unit_sign(order.method)
                );
                self.order_from.clear();
                self.order_to.clear();
                self.order_comment.clear();
                self.show_success(msg);
            }
            Err(e) => self.report("order", e),
        }
    }

    pub(crate) fn pay_shift(&mut self) {
        match self
            .session
            .pay_shift(self.settings.shift_price, SHIFT_HOURS, Local::now())
        {
            Ok(ends_at) => {
                self.show_success(format!("Shift open until {}", ends_at.format("%d.%m %H:%M")))
            }
            Err(e) => self.report("shift", e),
        }
    }

    pub(crate) fn request_withdrawal(&mut self) {
        let amount = parse_trip_amount(&self.withdraw_amount);
        match self.session.request_withdrawal(amount, Local::now()) {
            Ok(id) => {
                self.withdraw_amount.clear();
                self.show_success(format!("Withdrawal request #{} sent for review", id));
            }
            Err(e) => self.report("withdraw", e),
        }
    }

    pub(crate) fn request_deposit(&mut self, balance: BalanceType) {
        let amount = parse_trip_amount(&self.deposit_amount);
        match self.session.request_deposit(amount, balance, Local::now()) {
            Ok(id) => {
                self.deposit_amount.clear();
                self.show_success(format!(
                    "Top-up request #{} for {} {} sent for review",
                    id,
                    format_money(amount),
                    balance.sign()
                ));
            }
            Err(e) => self.report("deposit", e),
        }
    }

    pub(crate) fn save_car(&mut self) {
        self.session.save_car(self.car_draft.clone());
        self.show_success("Driver details saved");
    }

    pub(crate) fn decide_transaction(&mut self, id: u32, decision: Decision) {
        match self.session.process_transaction(id, decision) {
            Ok(_) => self.show_success(match decision {
                Decision::Approve => "Transaction approved",
                Decision::Reject => "Transaction rejected",
            }),
            Err(e) => self.report("transaction", e),
        }
    }

    pub(crate) fn toggle_user_status(&mut self, id: u32) {
        match self.session.toggle_user_status(id) {
            Ok(UserStatus::Blocked) => self.show_info(format!("User #{} blocked", id)),
            Ok(UserStatus::Active) => self.show_success(format!("User #{} unblocked", id)),
            Err(e) => self.report("user status", e),
        }
    }

    pub(crate) fn top_up_admin(&mut self) {
        let Some(amount) = parse_strict_amount(&self.top_up_amount) else {
            self.show_error("Enter a whole number");
            return;
        };
        match self.session.top_up_admin(amount) {
            Ok(_) => {
                self.top_up_amount.clear();
                self.show_success(format!("Balance topped up by {} {}", amount, CURRENCY_SIGN));
            }
            Err(e) => self.report("top up", e),
        }
    }

    /// Apply the settings draft. Unparseable numbers keep their old value.
    pub(crate) fn save_admin_settings(&mut self) {
        let draft = self.settings_draft.clone();
        if !draft.city_name.trim().is_empty() {
            self.settings.city_name = draft.city_name.trim().to_string();
        }
        match parse_strict_amount(&draft.shift_price) {
            Some(price) if price >= 0 => self.settings.shift_price = price,
            _ => warn!(value = %draft.shift_price, "Ignoring invalid shift price"),
        }
        match draft.discount_percent.trim().parse::<u8>() {
            Ok(pct) if pct <= 100 => self.settings.discount_percent = pct,
            _ => warn!(value = %draft.discount_percent, "Ignoring invalid discount percent"),
        }
        self.settings.maintenance_mode = draft.maintenance_mode;

        self.fare_policy = self.settings.fare_policy();
        self.settings_draft = SettingsDraft::from_settings(&self.settings);
        self.save_settings();
        info!(
            city = %self.settings.city_name,
            shift_price = self.settings.shift_price,
            discount_percent = self.settings.discount_percent,
            maintenance = self.settings.maintenance_mode,
            "Settings updated"
        );
        self.show_success("Settings saved");
    }

    pub(crate) fn clear_order_history(&mut self) {
        let removed = self.session.clear_completed_orders();
        self.show_success(format!("Removed {} completed orders", removed));
    }

    // ------------------------------------------------------------------------
    // Shared rendering
    // ------------------------------------------------------------------------

    pub(crate) fn logo(&mut self, ctx: &egui::Context) -> Option<egui::load::SizedTexture> {
        if self.logo_texture.is_none() {
            let (pixels, w, h) = rasterize_logo(theme::LOGO_SIZE as u32 * 2)?;
            self.logo_texture = Some(ctx.load_texture(
                "logo",
                egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
                egui::TextureOptions::LINEAR,
            ));
        }
        self.logo_texture.as_ref().map(|t| {
            egui::load::SizedTexture::new(t.id(), egui::vec2(theme::LOGO_SIZE, theme::LOGO_SIZE))
        })
    }

    /// Top bar with logo, title and header figures. Returns true when the
    /// logout button was clicked.
    pub(crate) fn render_header(
        &mut self,
        ctx: &egui::Context,
        title: &str,
        subtitle: Option<&str>,
        figures: &[(&str, String)],
    ) -> bool {
        let logo = self.logo(ctx);
        let mut logout = false;
        egui::TopBottomPanel::top("screen_header")
            .exact_height(theme::HEADER_HEIGHT)
            .frame(theme::header_frame())
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    if let Some(logo) = logo {
                        ui.image(logo);
                    }
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new(title)
                                .size(theme::FONT_TITLE)
                                .strong()
                                .color(theme::TEXT_PRIMARY),
                        );
                        if let Some(sub) = subtitle {
                            ui.label(
                                egui::RichText::new(sub)
                                    .size(theme::FONT_SMALL)
                                    .color(theme::TEXT_MUTED),
                            );
                        }
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .add(theme::button_ghost(egui_phosphor::regular::SIGN_OUT))
                            .on_hover_text("Sign out")
                            .clicked()
                        {
                            logout = true;
                        }
                        for (caption, value) in figures.iter().rev() {
                            crate::ui::components::header_figure(ui, caption, value);
                            ui.add_space(theme::SPACING_MD);
                        }
                    });
                });
            });
        logout
    }
}

/// Centered column of at most `width` for screen content
pub(crate) fn centered_column<R>(
    ui: &mut egui::Ui,
    width: f32,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    let width = width.min(ui.available_width());
    let margin = ((ui.available_width() - width) / 2.0).max(0.0);
    ui.horizontal(|ui| {
        ui.add_space(margin);
        ui.vertical(|ui| {
            ui.set_width(width);
            add_contents(ui)
        })
        .inner
    })
    .inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::toast::ToastKind;

    fn app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = App::with_state(Settings::default(), dir.path().to_path_buf());
        (app, dir)
    }

    #[test]
    fn starts_on_landing_with_default_form() {
        let (app, _dir) = app();
        assert_eq!(app.screen, Screen::Landing);
        assert_eq!(app.order_amount, "500");
        assert_eq!(app.payment_method, PaymentMethod::Currency);
        assert!(app.toast.is_none());
    }

    #[test]
    fn login_and_logout_per_role() {
        let (mut app, _dir) = app();
        app.login(Role::Driver);
        assert_eq!(app.screen, Screen::Driver);
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Success));
        app.logout();
        assert_eq!(app.screen, Screen::Landing);

        app.login(Role::Passenger);
        assert_eq!(app.screen, Screen::Passenger);
    }

    #[test]
    fn admin_logout_returns_to_admin_login() {
        let (mut app, _dir) = app();
        app.screen = Screen::AdminLogin;
        app.admin_login();
        assert_eq!(app.screen, Screen::Admin);
        app.logout();
        assert_eq!(app.screen, Screen::AdminLogin);
    }

    #[test]
    fn maintenance_blocks_public_login() {
        let (mut app, _dir) = app();
        app.settings.maintenance_mode = true;
        app.login(Role::Passenger);
        assert_eq!(app.screen, Screen::Landing);
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));
    }

    #[test]
    fn submitting_order_clears_addresses() {
        let (mut app, _dir) = app();
        app.login(Role::Passenger);
        app.order_from = "Lenina 1".into();
        app.order_to = "Station".into();
        app.submit_order();
        assert!(app.order_from.is_empty());
        assert_eq!(app.order_amount, "500");
        assert_eq!(app.session.wallet.currency, 3500 - 350);
        assert_eq!(app.session.passenger_orders()[0].final_price, 350);
    }

    #[test]
    fn garbage_amount_is_rejected_as_zero() {
        let (mut app, _dir) = app();
        app.order_from = "A".into();
        app.order_to = "B".into();
        app.order_amount = "abc".into();
        app.submit_order();
        assert_eq!(app.order_from, "A");
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));
        assert_eq!(app.session.orders().len(), 1);
    }

    #[test]
    fn settings_save_updates_policy_and_file() {
        let (mut app, dir) = app();
        app.settings_draft.discount_percent = "10".into();
        app.settings_draft.shift_price = "400".into();
        app.settings_draft.city_name = "Vyksa".into();
        app.save_admin_settings();
        assert_eq!(app.fare_policy.discount_percent(), 10);
        assert_eq!(app.settings.shift_price, 400);

        let on_disk = Settings::load(dir.path());
        assert_eq!(on_disk.discount_percent, 10);
        assert_eq!(on_disk.city_name, "Vyksa");

        app.pay_shift();
        assert_eq!(app.session.driver.balance, 8450 - 400);
    }

    #[test]
    fn invalid_settings_keep_previous_values() {
        let (mut app, _dir) = app();
        app.settings_draft.discount_percent = "150".into();
        app.settings_draft.shift_price = "lots".into();
        app.save_admin_settings();
        assert_eq!(app.settings.discount_percent, 30);
        assert_eq!(app.settings.shift_price, 350);
        assert_eq!(app.settings_draft.shift_price, "350");
    }

    #[test]
    fn admin_top_up_parses_strictly() {
        let (mut app, _dir) = app();
        app.top_up_amount = "12x".into();
        app.top_up_admin();
        assert_eq!(app.session.admin_balance, 125_400);
        app.top_up_amount = "600".into();
        app.top_up_admin();
        assert_eq!(app.session.admin_balance, 126_000);
        assert!(app.top_up_amount.is_empty());
    }

    #[test]
    fn blocked_account_cannot_sign_in() {
        let (mut app, _dir) = app();
        app.toggle_user_status(2);
        app.login(Role::Driver);
        assert_eq!(app.screen, Screen::Landing);
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));

        app.login(Role::Passenger);
        assert_eq!(app.screen, Screen::Passenger);
    }

    #[test]
    fn passenger_deposit_reaches_wallet_after_approval() {
        let (mut app, _dir) = app();
        app.deposit_amount = "250".into();
        app.request_deposit(BalanceType::Bonus);
        assert!(app.deposit_amount.is_empty());
        let tx = app.session.transactions().last().unwrap();
        assert_eq!(tx.kind, TransactionKind::DepositBonus);
        let id = tx.id;
        app.decide_transaction(id, Decision::Approve);
        assert_eq!(app.session.wallet.bonus, 1500);

        app.deposit_amount = "nope".into();
        app.request_deposit(BalanceType::Currency);
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));
        assert_eq!(app.deposit_amount, "nope");
    }

    #[test]
    fn huge_admin_top_up_is_refused() {
        let (mut app, _dir) = app();
        app.top_up_amount = i64::MAX.to_string();
        app.top_up_admin();
        assert_eq!(app.session.admin_balance, 125_400);
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));
    }

    #[test]
    fn withdrawal_shows_up_for_admin() {
        let (mut app, _dir) = app();
        app.withdraw_amount = "1000".into();
        app.request_withdrawal();
        let tx = app.session.transactions().last().unwrap();
        assert_eq!(tx.kind, TransactionKind::Withdrawal);
        assert_eq!(tx.amount, 1000);
        let id = tx.id;
        app.decide_transaction(id, Decision::Reject);
        assert!(app.session.transactions().iter().all(|t| t.id != id));
    }
}
