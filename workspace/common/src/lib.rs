//! Common transport-layer types shared between the backend handlers and
//! any API client. These structs mirror the wire payloads of the
//! rent-ledger endpoints so consumers can deserialize responses without
//! duplicating shapes.

mod money;

pub use money::{format_idr, LEDGER_CURRENCY};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One bucket of a trend series: a period label and the value summed
/// into it. The label granularity depends on the requested grouping
/// (`2024-03`, `2024-Q1`, `2024-S1` or `2024`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrendPoint {
    /// Period label for this bucket
    pub period: String,
    /// Summed value (IDR for cost views, kWh/m³ for usage views)
    pub total: Decimal,
}

/// A full trend series response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrendSeries {
    /// Granularity the series was grouped by
    pub granularity: String,
    /// View the values were summed under (cost or usage)
    pub view: String,
    /// Buckets, newest period first
    pub trends: Vec<TrendPoint>,
}

/// Per-category total over a set of ledger entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BreakdownItem {
    /// Category name (electricity, water, service_charge, sinking_fund, fitout)
    pub category: String,
    /// Summed IDR total for the category
    pub total: Decimal,
    /// Number of ledger entries that contributed
    pub count: u64,
}

/// Category breakdown response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LedgerBreakdown {
    /// Period filter the breakdown was computed over, if any
    pub period: Option<String>,
    /// Non-zero categories, largest total first
    pub breakdown: Vec<BreakdownItem>,
}

/// Request body for upserting the rent-ledger entry of one period.
///
/// Usage-cost fields carry the resolved value (derived or overridden);
/// the server rounds every money field to whole IDR and recomputes all
/// stored totals from the components, so totals are never part of the
/// request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpsertRentLedgerRequest {
    /// Billing period (YYYY-MM), must match the path
    pub period: String,
    /// Currency code; the ledger is IDR-only
    pub currency: String,
    pub sinking_fund_idr: Decimal,
    pub service_charge_idr: Decimal,
    pub ppn_service_charge_idr: Decimal,
    /// Electricity usage cost (kWh × tariff, or the manual override)
    pub electric_usage_idr: Decimal,
    pub electric_ppn_idr: Decimal,
    pub electric_area_bersama_idr: Decimal,
    pub electric_pju_idr: Decimal,
    /// Metered electricity usage in kWh
    pub electric_kwh: Option<Decimal>,
    /// Tariff per kWh
    pub electric_tarif_per_kwh: Option<Decimal>,
    /// Potable water usage cost (m³ × tariff, or the manual override)
    pub water_usage_potable_idr: Decimal,
    pub water_non_potable_idr: Decimal,
    pub water_air_limbah_idr: Decimal,
    pub water_ppn_air_limbah_idr: Decimal,
    pub water_pemeliharaan_idr: Decimal,
    pub water_area_bersama_idr: Decimal,
    /// Metered water usage in m³
    pub water_m3: Option<Decimal>,
    /// Tariff per m³
    pub water_tarif_per_m3: Option<Decimal>,
    pub fitout_idr: Decimal,
}
