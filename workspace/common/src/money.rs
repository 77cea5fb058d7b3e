//! Currency constants and display formatting for the ledger.

use rust_decimal::Decimal;
use rusty_money::{iso, Money};

/// The ledger is single-currency; every money field is whole-unit IDR.
pub const LEDGER_CURRENCY: &str = "IDR";

/// Formats an IDR amount for display, e.g. `Rp2.077.500`.
pub fn format_idr(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::IDR).to_string()
}
