//! Application constants and tariff defaults

pub const APP_NAME: &str = "City Taxi Desk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Data directory name under the platform's local data dir
pub const DATA_DIR_NAME: &str = "City Taxi Desk";
pub const LOG_FILE_NAME: &str = "city-taxi-desk.log";

// Tariff defaults (overridable from the admin settings tab)
pub const DEFAULT_DISCOUNT_PERCENT: u8 = 30;
pub const DEFAULT_SHIFT_PRICE: i64 = 350;
pub const DEFAULT_CITY_NAME: &str = "Pavlovo";

/// Pre-filled trip amount on the passenger order form
pub const DEFAULT_TRIP_AMOUNT: &str = "500";

/// How long a paid driver shift stays open
pub const SHIFT_HOURS: i64 = 24;

/// Toast visible time in seconds (fades out over the last half second)
pub const TOAST_SECONDS: f32 = 3.0;

pub const CURRENCY_SIGN: &str = "₽";
pub const BONUS_SIGN: &str = "B";
