use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveModelBehavior;

/// One rent-ledger record per billing period. The period (`YYYY-MM`) is
/// the natural key; writes are idempotent upserts keyed by it.
///
/// Money columns hold whole-IDR amounts, rounded before they are stored.
/// The usage pairs (kWh/m³ plus tariff) are optional meter data; the
/// corresponding usage-cost column is authoritative either way. Stored
/// totals are recomputed from the components on every write, never
/// carried over from a previous state.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rent_ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Billing period in `YYYY-MM` form, immutable after creation.
    #[sea_orm(unique)]
    pub period: String,
    /// ISO 4217 currency code; the ledger is IDR-only.
    pub currency: String,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub sinking_fund_idr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub service_charge_idr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub ppn_service_charge_idr: Decimal,
    /// Electricity usage cost: kWh × tariff, or a manual override.
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub electric_usage_idr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub electric_ppn_idr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub electric_area_bersama_idr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub electric_pju_idr: Decimal,
    /// Metered electricity usage in kWh.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub electric_kwh: Option<Decimal>,
    /// Tariff per kWh.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub electric_tarif_per_kwh: Option<Decimal>,
    /// Potable water usage cost: m³ × tariff, or a manual override.
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub water_usage_potable_idr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub water_non_potable_idr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub water_air_limbah_idr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub water_ppn_air_limbah_idr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub water_pemeliharaan_idr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub water_area_bersama_idr: Decimal,
    /// Metered water usage in m³.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub water_m3: Option<Decimal>,
    /// Tariff per m³.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub water_tarif_per_m3: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub fitout_idr: Decimal,
    /// service_charge + ppn_service_charge, stored.
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub service_charge_total_idr: Decimal,
    /// Electricity subtotal, stored.
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub electric_total_idr: Decimal,
    /// Water subtotal, stored.
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub water_total_idr: Decimal,
    /// Grand total, stored.
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total_idr: Decimal,
    /// Where the record came from; the API always writes "manual".
    pub source: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
