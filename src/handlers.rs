pub mod health;
pub mod rent_ledger;
pub mod reports;
