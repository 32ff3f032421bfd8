//! Fare calculation: discount for paying through the in-app balances

use crate::constants::DEFAULT_DISCOUNT_PERCENT;

/// Settlement channel chosen on the order form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Bonus,
    Currency,
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Currency,
        PaymentMethod::Bonus,
        PaymentMethod::Cash,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Bonus => "Bonus",
            PaymentMethod::Currency => "Balance",
            PaymentMethod::Cash => "Cash",
        }
    }

    /// Balance-backed methods get the discount; cash does not
    pub fn is_discounted(self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

/// Amount payable and the discount taken off it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountResult {
    pub final_amount: i64,
    pub discount: i64,
}

/// Discount rule with a configurable percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FarePolicy {
    discount_percent: u8,
}

impl Default for FarePolicy {
    fn default() -> Self {
        Self {
            discount_percent: DEFAULT_DISCOUNT_PERCENT,
        }
    }
}

impl FarePolicy {
    /// Percent is clamped to 0..=100
    pub fn new(discount_percent: u8) -> Self {
        Self {
            discount_percent: discount_percent.min(100),
        }
    }

    pub fn discount_percent(&self) -> u8 {
        self.discount_percent
    }

    pub fn apply(&self, amount: i64, method: PaymentMethod) -> DiscountResult {
        if !method.is_discounted() {
            return DiscountResult {
                final_amount: amount,
                discount: 0,
            };
        }
        let discount = round_percent(amount, self.discount_percent);
        DiscountResult {
            final_amount: amount - discount,
            discount,
        }
    }
}

/// `amount * percent / 100` rounded to the nearest whole unit, halves up.
fn round_percent(amount: i64, percent: u8) -> i64 {
    let scaled = amount as i128 * percent as i128 + 50;
    scaled.div_euclid(100) as i64
}

/// Discount at the default 30% rate.
#[cfg_attr(not(test), allow(dead_code))]
pub fn compute_discount(amount: i64, method: PaymentMethod) -> DiscountResult {
    FarePolicy::default().apply(amount, method)
}

/// Coerce free-form amount input to a number: the leading integer of the
/// trimmed text, or 0 when there is none. Digit runs too long for an
/// `i64` saturate.
pub fn parse_trip_amount(input: &str) -> i64 {
    let s = input.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return 0;
    }
    match (digits.parse::<i64>(), negative) {
        (Ok(n), true) => -n,
        (Ok(n), false) => n,
        (Err(_), true) => i64::MIN,
        (Err(_), false) => i64::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_scenario() {
        let r = compute_discount(500, PaymentMethod::Currency);
        assert_eq!(r.discount, 150);
        assert_eq!(r.final_amount, 350);
    }

    #[test]
    fn bonus_scenario() {
        let r = compute_discount(350, PaymentMethod::Bonus);
        assert_eq!(r.discount, 105);
        assert_eq!(r.final_amount, 245);
    }

    #[test]
    fn cash_is_never_discounted() {
        for amount in [0, 1, 7, 500, 12_345] {
            let r = compute_discount(amount, PaymentMethod::Cash);
            assert_eq!(r.final_amount, amount);
            assert_eq!(r.discount, 0);
        }
    }

    #[test]
    fn zero_amount_for_every_method() {
        for method in PaymentMethod::ALL {
            let r = compute_discount(0, method);
            assert_eq!(r, DiscountResult { final_amount: 0, discount: 0 });
        }
    }

    #[test]
    fn discount_and_final_add_up() {
        for amount in 0..2_000 {
            for method in [PaymentMethod::Bonus, PaymentMethod::Currency] {
                let r = compute_discount(amount, method);
                let expected = (amount as f64 * 30.0 / 100.0).round() as i64;
                assert_eq!(r.discount, expected, "amount {amount}");
                assert_eq!(r.final_amount + r.discount, amount);
            }
        }
    }

    #[test]
    fn halves_round_up() {
        // 5 * 0.3 = 1.5
        assert_eq!(compute_discount(5, PaymentMethod::Bonus).discount, 2);
        // 15 * 0.3 = 4.5
        assert_eq!(compute_discount(15, PaymentMethod::Currency).discount, 5);
        // -5 * 0.3 = -1.5 rounds toward +inf
        assert_eq!(compute_discount(-5, PaymentMethod::Currency).discount, -1);
    }

    #[test]
    fn repeated_calls_agree() {
        let a = compute_discount(777, PaymentMethod::Bonus);
        let b = compute_discount(777, PaymentMethod::Bonus);
        assert_eq!(a, b);
    }

    #[test]
    fn custom_percent() {
        let policy = FarePolicy::new(10);
        let r = policy.apply(500, PaymentMethod::Currency);
        assert_eq!(r, DiscountResult { final_amount: 450, discount: 50 });
        assert_eq!(policy.apply(500, PaymentMethod::Cash).discount, 0);
    }

    #[test]
    fn percent_is_clamped() {
        let policy = FarePolicy::new(250);
        assert_eq!(policy.discount_percent(), 100);
        assert_eq!(policy.apply(80, PaymentMethod::Bonus).final_amount, 0);
    }

    #[test]
    fn parse_amount_like_the_form_does() {
        assert_eq!(parse_trip_amount("500"), 500);
        assert_eq!(parse_trip_amount("  42 "), 42);
        assert_eq!(parse_trip_amount("12abc"), 12);
        assert_eq!(parse_trip_amount("-30"), -30);
        assert_eq!(parse_trip_amount("+7"), 7);
        assert_eq!(parse_trip_amount("abc"), 0);
        assert_eq!(parse_trip_amount(""), 0);
        assert_eq!(parse_trip_amount("-"), 0);
        assert_eq!(parse_trip_amount("99999999999999999999999"), i64::MAX);
        assert_eq!(parse_trip_amount("-99999999999999999999999"), i64::MIN);
        assert_eq!(parse_trip_amount("9223372036854775807"), i64::MAX);
        assert_eq!(parse_trip_amount("3.9"), 3);
    }
}
