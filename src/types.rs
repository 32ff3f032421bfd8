//! Common types and data structures

use crate::constants::{BONUS_SIGN, CURRENCY_SIGN};
use crate::fare::PaymentMethod;
use chrono::{DateTime, Local};

/// Which screen the window is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Passenger,
    Driver,
    AdminLogin,
    Admin,
}

/// Account role on the public site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Passenger,
    Driver,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Passenger => "Passenger",
            Role::Driver => "Driver",
        }
    }

    pub fn screen(self) -> Screen {
        match self {
            Role::Passenger => Screen::Passenger,
            Role::Driver => Screen::Driver,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Blocked,
}

impl UserStatus {
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Blocked,
            UserStatus::Blocked => UserStatus::Active,
        }
    }
}

/// Row in the admin users table
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: u32,
    pub phone: String,
    pub role: Role,
    pub status: UserStatus,
    pub on_shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    DepositCurrency,
    DepositBonus,
    Withdrawal,
}

impl TransactionKind {
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::DepositCurrency => "Top-up ₽",
            TransactionKind::DepositBonus => "Top-up B",
            TransactionKind::Withdrawal => "Withdrawal",
        }
    }

    pub fn is_deposit(self) -> bool {
        !matches!(self, TransactionKind::Withdrawal)
    }
}

/// Passenger balance a deposit request tops up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceType {
    Currency,
    Bonus,
}

impl BalanceType {
    pub fn deposit_kind(self) -> TransactionKind {
        match self {
            BalanceType::Currency => TransactionKind::DepositCurrency,
            BalanceType::Bonus => TransactionKind::DepositBonus,
        }
    }

    pub fn sign(self) -> &'static str {
        match self {
            BalanceType::Currency => CURRENCY_SIGN,
            BalanceType::Bonus => BONUS_SIGN,
        }
    }
}

/// Balance request waiting for an admin decision
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    pub id: u32,
    pub user: String,
    pub kind: TransactionKind,
    pub amount: i64,
    pub created_at: DateTime<Local>,
}

/// What the admin does with a pending transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Created,
    Completed,
}

impl OrderStatus {
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Created => "Created",
            OrderStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub id: u32,
    pub passenger: String,
    pub driver: Option<String>,
    pub from: String,
    pub to: String,
    pub amount: i64,
    pub discount: i64,
    pub final_price: i64,
    pub method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Local>,
}

/// Passenger-side balances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassengerWallet {
    pub bonus: i64,
    pub currency: i64,
}

impl PassengerWallet {
    /// Balance a payment method draws from, `None` for cash
    pub fn balance_for(&self, method: PaymentMethod) -> Option<i64> {
        match method {
            PaymentMethod::Bonus => Some(self.bonus),
            PaymentMethod::Currency => Some(self.currency),
            PaymentMethod::Cash => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarProfile {
    pub make: String,
    pub color: String,
    pub plate: String,
    pub license: String,
}

#[derive(Debug, Clone)]
pub struct DriverAccount {
    pub balance: i64,
    pub shift_ends_at: Option<DateTime<Local>>,
    pub car: CarProfile,
}

impl DriverAccount {
    pub fn shift_active(&self, now: DateTime<Local>) -> bool {
        self.shift_ends_at.is_some_and(|end| end > now)
    }
}

/// Figures on the admin dashboard tiles
#[derive(Debug, Clone, Copy)]
pub struct DashboardStats {
    pub total_users: u32,
    pub drivers_on_shift: u32,
    pub orders_today: u32,
    pub shift_income: i64,
}

/// Unit suffix for an amount paid with `method`
pub fn unit_sign(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Bonus => BONUS_SIGN,
        PaymentMethod::Currency | PaymentMethod::Cash => CURRENCY_SIGN,
    }
}
