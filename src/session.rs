//! In-memory session store
//! Holds the demo accounts, pending transactions and orders for the lifetime
//! of the window. Nothing here touches disk.

use crate::fare::{FarePolicy, PaymentMethod};
use crate::types::*;
use chrono::{DateTime, Duration, Local, NaiveDate};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Enter both pickup and destination addresses")]
    MissingAddress,

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("Insufficient funds: need {needed}, available {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("Shift is already open")]
    ShiftAlreadyActive,

    #[error("Amount is too large")]
    AmountTooLarge,

    #[error("Transaction #{0} not found")]
    TransactionNotFound(u32),

    #[error("User #{0} not found")]
    UserNotFound(u32),
}

/// Order form contents after amount coercion
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub from: String,
    pub to: String,
    pub amount: i64,
    pub method: PaymentMethod,
    pub comment: String,
}

pub struct Session {
    pub passenger_phone: String,
    pub driver_phone: String,
    pub wallet: PassengerWallet,
    pub driver: DriverAccount,
    pub admin_balance: i64,
    pub stats: DashboardStats,
    users: Vec<UserRecord>,
    transactions: Vec<PendingTransaction>,
    orders: Vec<OrderRecord>,
    next_order_id: u32,
    next_tx_id: u32,
}

fn credit(balance: i64, amount: i64) -> Result<i64, SessionError> {
    balance.checked_add(amount).ok_or(SessionError::AmountTooLarge)
}

/// Fixed demo timestamp on 2024-12-30, falling back to `now` if the local
/// zone cannot represent it.
fn seed_time(now: DateTime<Local>, hour: u32, min: u32) -> DateTime<Local> {
    NaiveDate::from_ymd_opt(2024, 12, 30)
        .and_then(|d| d.and_hms_opt(hour, min, 0))
        .and_then(|n| n.and_local_timezone(Local).single())
        .unwrap_or(now)
}

impl Session {
    /// Session seeded with the demo passenger, driver and admin data
    pub fn demo(now: DateTime<Local>) -> Self {
        let passenger_phone = "+79991234567".to_string();
        let driver_phone = "+79997654321".to_string();

        let users = vec![
            UserRecord {
                id: 1,
                phone: passenger_phone.clone(),
                role: Role::Passenger,
                status: UserStatus::Active,
                on_shift: false,
            },
            UserRecord {
                id: 2,
                phone: driver_phone.clone(),
                role: Role::Driver,
                status: UserStatus::Active,
                on_shift: false,
            },
        ];

        let transactions = vec![
            PendingTransaction {
                id: 1,
                user: passenger_phone.clone(),
                kind: TransactionKind::DepositCurrency,
                amount: 1000,
                created_at: seed_time(now, 14, 30),
            },
            PendingTransaction {
                id: 2,
                user: driver_phone.clone(),
                kind: TransactionKind::Withdrawal,
                amount: 5000,
                created_at: seed_time(now, 13, 15),
            },
        ];

        let orders = vec![OrderRecord {
            id: 1,
            passenger: passenger_phone.clone(),
            driver: Some(driver_phone.clone()),
            from: String::new(),
            to: String::new(),
            amount: 500,
            discount: 150,
            final_price: 350,
            method: PaymentMethod::Currency,
            status: OrderStatus::Completed,
            created_at: seed_time(now, 12, 0),
        }];

        Self {
            passenger_phone,
            driver_phone,
            wallet: PassengerWallet {
                bonus: 1250,
                currency: 3500,
            },
            driver: DriverAccount {
                balance: 8450,
                shift_ends_at: None,
                car: CarProfile::default(),
            },
            admin_balance: 125_400,
            stats: DashboardStats {
                total_users: 127,
                drivers_on_shift: 23,
                orders_today: 342,
                shift_income: 8050,
            },
            users,
            transactions,
            orders,
            next_order_id: 2,
            next_tx_id: 3,
        }
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn transactions(&self) -> &[PendingTransaction] {
        &self.transactions
    }

    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    /// Users whose phone contains `query` (all users for an empty query)
    pub fn search_users(&self, query: &str) -> Vec<&UserRecord> {
        let query = query.trim();
        self.users()
            .iter()
            .filter(|u| query.is_empty() || u.phone.contains(query))
            .collect()
    }

    /// Whether the account behind `phone` has been blocked by the admin
    pub fn is_blocked(&self, phone: &str) -> bool {
        self.users
            .iter()
            .any(|u| u.phone == phone && u.status == UserStatus::Blocked)
    }

    /// Flip a user between active and blocked, returning the new status
    pub fn toggle_user_status(&mut self, id: u32) -> Result<UserStatus, SessionError> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(SessionError::UserNotFound(id))?;
        user.status = user.status.toggled();
        info!(user_id = id, status = ?user.status, "User status changed");
        Ok(user.status)
    }

    /// Sum of the driver's withdrawals still waiting for review
    pub fn pending_withdrawals(&self) -> i64 {
        self.transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Withdrawal && t.user == self.driver_phone)
            .map(|t| t.amount)
            .sum()
    }

    /// The demo passenger's orders, newest first
    pub fn passenger_orders(&self) -> Vec<&OrderRecord> {
        self.orders
            .iter()
            .rev()
            .filter(|o| o.passenger == self.passenger_phone)
            .collect()
    }

    /// Place an order for the demo passenger. Balance payments are charged
    /// the discounted price up front.
    pub fn place_order(
        &mut self,
        request: OrderRequest,
        policy: &FarePolicy,
        now: DateTime<Local>,
    ) -> Result<&OrderRecord, SessionError> {
        let from = request.from.trim();
        let to = request.to.trim();
        if from.is_empty() || to.is_empty() {
            return Err(SessionError::MissingAddress);
        }
        if request.amount <= 0 {
            return Err(SessionError::NonPositiveAmount);
        }

        let fare = policy.apply(request.amount, request.method);
        if let Some(available) = self.wallet.balance_for(request.method) {
            if available < fare.final_amount {
                return Err(SessionError::InsufficientFunds {
                    needed: fare.final_amount,
                    available,
                });
            }
        }
        match request.method {
            PaymentMethod::Bonus => self.wallet.bonus -= fare.final_amount,
            PaymentMethod::Currency => self.wallet.currency -= fare.final_amount,
            PaymentMethod::Cash => {}
        }

        let id = self.next_order_id;
        self.next_order_id += 1;
        self.stats.orders_today += 1;

        info!(
            order_id = id,
            amount = request.amount,
            discount = fare.discount,
            final_price = fare.final_amount,
            method = ?request.method,
            "Order placed"
        );
        if !request.comment.trim().is_empty() {
            debug!(order_id = id, comment = %request.comment.trim(), "Order comment");
        }

        self.orders.push(OrderRecord {
            id,
            passenger: self.passenger_phone.clone(),
            driver: None,
            from: from.to_string(),
            to: to.to_string(),
            amount: request.amount,
            discount: fare.discount,
            final_price: fare.final_amount,
            method: request.method,
            status: OrderStatus::Created,
            created_at: now,
        });
        Ok(&self.orders[self.orders.len() - 1])
    }

    /// Pay for a driver shift. Returns when the shift ends.
    pub fn pay_shift(
        &mut self,
        price: i64,
        shift_hours: i64,
        now: DateTime<Local>,
    ) -> Result<DateTime<Local>, SessionError> {
        if self.driver.shift_active(now) {
            return Err(SessionError::ShiftAlreadyActive);
        }
        if self.driver.balance < price {
            return Err(SessionError::InsufficientFunds {
                needed: price,
                available: self.driver.balance,
            });
        }

        self.driver.balance -= price;
        self.stats.shift_income += price;
        self.stats.drivers_on_shift += 1;

        let ends_at = now + Duration::hours(shift_hours);
        self.driver.shift_ends_at = Some(ends_at);
        let phone = self.driver_phone.clone();
        if let Some(user) = self.users.iter_mut().find(|u| u.phone == phone) {
            user.on_shift = true;
        }

        info!(price, ends_at = %ends_at.format("%d.%m.%Y %H:%M"), "Driver shift paid");
        Ok(ends_at)
    }

    /// Queue a withdrawal request from the driver balance for admin review.
    /// Withdrawals already in the queue are reserved against the balance.
    pub fn request_withdrawal(
        &mut self,
        amount: i64,
        now: DateTime<Local>,
    ) -> Result<u32, SessionError> {
        if amount <= 0 {
            return Err(SessionError::NonPositiveAmount);
        }
        let available = self.driver.balance - self.pending_withdrawals();
        if available < amount {
            return Err(SessionError::InsufficientFunds {
                needed: amount,
                available: available.max(0),
            });
        }

        let id = self.next_tx_id;
        self.next_tx_id += 1;
        self.transactions.push(PendingTransaction {
            id,
            user: self.driver_phone.clone(),
            kind: TransactionKind::Withdrawal,
            amount,
            created_at: now,
        });
        info!(transaction_id = id, amount, "Withdrawal requested");
        Ok(id)
    }

    /// Queue a passenger deposit to the currency or bonus balance
    pub fn request_deposit(
        &mut self,
        amount: i64,
        balance: BalanceType,
        now: DateTime<Local>,
    ) -> Result<u32, SessionError> {
        if amount <= 0 {
            return Err(SessionError::NonPositiveAmount);
        }

        let id = self.next_tx_id;
        self.next_tx_id += 1;
        self.transactions.push(PendingTransaction {
            id,
            user: self.passenger_phone.clone(),
            kind: balance.deposit_kind(),
            amount,
            created_at: now,
        });
        info!(transaction_id = id, amount, balance = ?balance, "Deposit requested");
        Ok(id)
    }

    /// Approve or reject a pending transaction, removing it from the queue.
    /// Approval applies the balance change to the matching demo account; if
    /// that change cannot be applied the transaction stays queued.
    pub fn process_transaction(
        &mut self,
        id: u32,
        decision: Decision,
    ) -> Result<PendingTransaction, SessionError> {
        let pos = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(SessionError::TransactionNotFound(id))?;

        if decision == Decision::Approve {
            let tx = &self.transactions[pos];
            match tx.kind {
                TransactionKind::DepositCurrency if tx.user == self.passenger_phone => {
                    self.wallet.currency = credit(self.wallet.currency, tx.amount)?;
                }
                TransactionKind::DepositBonus if tx.user == self.passenger_phone => {
                    self.wallet.bonus = credit(self.wallet.bonus, tx.amount)?;
                }
                TransactionKind::Withdrawal if tx.user == self.driver_phone => {
                    if self.driver.balance < tx.amount {
                        return Err(SessionError::InsufficientFunds {
                            needed: tx.amount,
                            available: self.driver.balance,
                        });
                    }
                    self.driver.balance -= tx.amount;
                }
                _ => {}
            }
        }
        let tx = self.transactions.remove(pos);

        info!(transaction_id = id, kind = ?tx.kind, decision = ?decision, "Transaction processed");
        Ok(tx)
    }

    /// Add funds to the admin balance, returning the new total
    pub fn top_up_admin(&mut self, amount: i64) -> Result<i64, SessionError> {
        if amount <= 0 {
            return Err(SessionError::NonPositiveAmount);
        }
        self.admin_balance = credit(self.admin_balance, amount)?;
        info!(amount, balance = self.admin_balance, "Admin balance topped up");
        Ok(self.admin_balance)
    }

    /// Drop completed orders, returning how many were removed
    pub fn clear_completed_orders(&mut self) -> usize {
        let before = self.orders.len();
        self.orders.retain(|o| o.status != OrderStatus::Completed);
        let removed = before - self.orders.len();
        info!(removed, "Completed orders cleared");
        removed
    }

    pub fn save_car(&mut self, car: CarProfile) {
        debug!(make = %car.make, plate = %car.plate, "Car profile saved");
        self.driver.car = car;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Local> {
        Local::now()
    }

    fn request(amount: i64, method: PaymentMethod) -> OrderRequest {
        OrderRequest {
            from: "Lenina 1".into(),
            to: "Station".into(),
            amount,
            method,
            comment: String::new(),
        }
    }

    #[test]
    fn demo_seed_matches_the_mock_figures() {
        let s = Session::demo(now());
        assert_eq!(s.wallet, PassengerWallet { bonus: 1250, currency: 3500 });
        assert_eq!(s.driver.balance, 8450);
        assert_eq!(s.admin_balance, 125_400);
        assert_eq!(s.users().len(), 2);
        assert_eq!(s.transactions().len(), 2);
        assert_eq!(s.orders().len(), 1);
        assert_eq!(s.orders()[0].discount, 150);
    }

    #[test]
    fn currency_order_charges_discounted_price() {
        let mut s = Session::demo(now());
        let order = s
            .place_order(request(500, PaymentMethod::Currency), &FarePolicy::default(), now())
            .unwrap();
        assert_eq!(order.final_price, 350);
        assert_eq!(order.discount, 150);
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(s.wallet.currency, 3500 - 350);
        assert_eq!(s.wallet.bonus, 1250);
    }

    #[test]
    fn bonus_order_draws_from_bonus() {
        let mut s = Session::demo(now());
        s.place_order(request(350, PaymentMethod::Bonus), &FarePolicy::default(), now())
            .unwrap();
        assert_eq!(s.wallet.bonus, 1250 - 245);
    }

    #[test]
    fn cash_order_leaves_wallet_alone() {
        let mut s = Session::demo(now());
        let order = s
            .place_order(request(10_000, PaymentMethod::Cash), &FarePolicy::default(), now())
            .unwrap();
        assert_eq!(order.final_price, 10_000);
        assert_eq!(s.wallet, PassengerWallet { bonus: 1250, currency: 3500 });
    }

    #[test]
    fn order_rejected_when_balance_short() {
        let mut s = Session::demo(now());
        let err = s
            .place_order(request(5000, PaymentMethod::Bonus), &FarePolicy::default(), now())
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::InsufficientFunds { needed: 3500, available: 1250 }
        );
        assert_eq!(s.orders().len(), 1);
        assert_eq!(s.wallet.bonus, 1250);
    }

    #[test]
    fn order_needs_addresses_and_amount() {
        let mut s = Session::demo(now());
        let mut req = request(500, PaymentMethod::Cash);
        req.to = "   ".into();
        assert_eq!(
            s.place_order(req, &FarePolicy::default(), now()).unwrap_err(),
            SessionError::MissingAddress
        );
        assert_eq!(
            s.place_order(request(0, PaymentMethod::Cash), &FarePolicy::default(), now())
                .unwrap_err(),
            SessionError::NonPositiveAmount
        );
    }

    #[test]
    fn passenger_history_is_newest_first() {
        let mut s = Session::demo(now());
        s.place_order(request(100, PaymentMethod::Cash), &FarePolicy::default(), now())
            .unwrap();
        s.place_order(request(200, PaymentMethod::Cash), &FarePolicy::default(), now())
            .unwrap();
        let ids: Vec<u32> = s.passenger_orders().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn shift_payment_opens_shift_once() {
        let mut s = Session::demo(now());
        let t = now();
        let ends = s.pay_shift(350, 24, t).unwrap();
        assert_eq!(ends, t + Duration::hours(24));
        assert_eq!(s.driver.balance, 8450 - 350);
        assert!(s.driver.shift_active(t));
        assert!(s.users()[1].on_shift);
        assert_eq!(s.stats.shift_income, 8050 + 350);
        assert_eq!(s.pay_shift(350, 24, t).unwrap_err(), SessionError::ShiftAlreadyActive);
        // shift lapses after its end time
        assert!(!s.driver.shift_active(t + Duration::hours(25)));
    }

    #[test]
    fn shift_needs_funds() {
        let mut s = Session::demo(now());
        s.driver.balance = 100;
        assert_eq!(
            s.pay_shift(350, 24, now()).unwrap_err(),
            SessionError::InsufficientFunds { needed: 350, available: 100 }
        );
        assert_eq!(s.driver.shift_ends_at, None);
    }

    #[test]
    fn withdrawal_request_then_approval() {
        let mut s = Session::demo(now());
        let id = s.request_withdrawal(1000, now()).unwrap();
        assert_eq!(id, 3);
        assert_eq!(s.transactions().len(), 3);
        // balance only moves once the admin approves
        assert_eq!(s.driver.balance, 8450);
        let tx = s.process_transaction(id, Decision::Approve).unwrap();
        assert_eq!(tx.kind, TransactionKind::Withdrawal);
        assert_eq!(s.driver.balance, 7450);
        assert_eq!(s.transactions().len(), 2);
    }

    #[test]
    fn withdrawal_limits() {
        let mut s = Session::demo(now());
        assert_eq!(
            s.request_withdrawal(0, now()).unwrap_err(),
            SessionError::NonPositiveAmount
        );
        assert_eq!(
            s.request_withdrawal(9000, now()).unwrap_err(),
            SessionError::InsufficientFunds { needed: 9000, available: 3450 }
        );
    }

    #[test]
    fn approving_deposit_credits_wallet() {
        let mut s = Session::demo(now());
        s.process_transaction(1, Decision::Approve).unwrap();
        assert_eq!(s.wallet.currency, 4500);
    }

    #[test]
    fn rejecting_removes_without_side_effects() {
        let mut s = Session::demo(now());
        s.process_transaction(2, Decision::Reject).unwrap();
        assert_eq!(s.driver.balance, 8450);
        assert!(s.transactions().iter().all(|t| t.id != 2));
        assert_eq!(
            s.process_transaction(2, Decision::Reject).unwrap_err(),
            SessionError::TransactionNotFound(2)
        );
    }

    #[test]
    fn admin_top_up() {
        let mut s = Session::demo(now());
        assert_eq!(s.top_up_admin(600).unwrap(), 126_000);
        assert_eq!(s.top_up_admin(-5).unwrap_err(), SessionError::NonPositiveAmount);
        assert_eq!(s.admin_balance, 126_000);
    }

    #[test]
    fn clear_history_keeps_open_orders() {
        let mut s = Session::demo(now());
        s.place_order(request(100, PaymentMethod::Cash), &FarePolicy::default(), now())
            .unwrap();
        assert_eq!(s.clear_completed_orders(), 1);
        assert_eq!(s.orders().len(), 1);
        assert_eq!(s.orders()[0].status, OrderStatus::Created);
    }

    #[test]
    fn admin_top_up_rejects_overflow() {
        let mut s = Session::demo(now());
        let huge = crate::utils::parse_strict_amount("9223372036854775807").unwrap();
        assert_eq!(s.top_up_admin(huge).unwrap_err(), SessionError::AmountTooLarge);
        assert_eq!(s.admin_balance, 125_400);
    }

    #[test]
    fn queued_withdrawals_are_reserved() {
        let mut s = Session::demo(now());
        // seed already holds 5000 of the 8450 for review
        assert_eq!(s.pending_withdrawals(), 5000);
        assert_eq!(
            s.request_withdrawal(5000, now()).unwrap_err(),
            SessionError::InsufficientFunds { needed: 5000, available: 3450 }
        );
        let id = s.request_withdrawal(3450, now()).unwrap();
        s.process_transaction(2, Decision::Approve).unwrap();
        s.process_transaction(id, Decision::Approve).unwrap();
        assert_eq!(s.driver.balance, 0);
    }

    #[test]
    fn withdrawal_approval_rechecks_balance() {
        let mut s = Session::demo(now());
        s.driver.balance = 4000;
        assert_eq!(
            s.process_transaction(2, Decision::Approve).unwrap_err(),
            SessionError::InsufficientFunds { needed: 5000, available: 4000 }
        );
        assert_eq!(s.driver.balance, 4000);
        assert!(s.transactions().iter().any(|t| t.id == 2));
        // rejecting is always possible
        s.process_transaction(2, Decision::Reject).unwrap();
        assert_eq!(s.pending_withdrawals(), 0);
    }

    #[test]
    fn deposits_credit_the_chosen_balance() {
        let mut s = Session::demo(now());
        let bonus = s.request_deposit(300, BalanceType::Bonus, now()).unwrap();
        let currency = s.request_deposit(700, BalanceType::Currency, now()).unwrap();
        assert_eq!((bonus, currency), (3, 4));
        // nothing moves until review
        assert_eq!(s.wallet, PassengerWallet { bonus: 1250, currency: 3500 });

        let tx = s.process_transaction(bonus, Decision::Approve).unwrap();
        assert_eq!(tx.kind, TransactionKind::DepositBonus);
        assert_eq!(s.wallet.bonus, 1550);

        let tx = s.process_transaction(currency, Decision::Approve).unwrap();
        assert_eq!(tx.kind, TransactionKind::DepositCurrency);
        assert_eq!(s.wallet.currency, 4200);

        assert_eq!(
            s.request_deposit(0, BalanceType::Bonus, now()).unwrap_err(),
            SessionError::NonPositiveAmount
        );
    }

    #[test]
    fn deposit_overflow_stays_queued() {
        let mut s = Session::demo(now());
        let id = s.request_deposit(i64::MAX, BalanceType::Currency, now()).unwrap();
        assert_eq!(
            s.process_transaction(id, Decision::Approve).unwrap_err(),
            SessionError::AmountTooLarge
        );
        assert_eq!(s.wallet.currency, 3500);
        assert!(s.transactions().iter().any(|t| t.id == id));
    }

    #[test]
    fn blocking_and_unblocking_users() {
        let mut s = Session::demo(now());
        assert!(!s.is_blocked("+79991234567"));
        assert_eq!(s.toggle_user_status(1).unwrap(), UserStatus::Blocked);
        assert!(s.is_blocked("+79991234567"));
        assert!(!s.is_blocked("+79997654321"));
        assert_eq!(s.toggle_user_status(1).unwrap(), UserStatus::Active);
        assert_eq!(s.toggle_user_status(42).unwrap_err(), SessionError::UserNotFound(42));
    }

    #[test]
    fn user_search_by_phone() {
        let s = Session::demo(now());
        assert_eq!(s.search_users("").len(), 2);
        let hits = s.search_users("7654");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].role, Role::Driver);
        assert!(s.search_users("000000").is_empty());
    }
}
