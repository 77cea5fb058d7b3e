use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create rent_ledger_entries table; one row per billing period,
        // period is the natural key.
        manager
            .create_table(
                Table::create()
                    .table(RentLedgerEntries::Table)
                    .if_not_exists()
                    .col(pk_auto(RentLedgerEntries::Id))
                    .col(string(RentLedgerEntries::Period).unique_key())
                    .col(string(RentLedgerEntries::Currency))
                    .col(decimal(RentLedgerEntries::SinkingFundIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::ServiceChargeIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::PpnServiceChargeIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::ElectricUsageIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::ElectricPpnIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::ElectricAreaBersamaIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::ElectricPjuIdr).decimal_len(19, 2))
                    .col(decimal_null(RentLedgerEntries::ElectricKwh).decimal_len(19, 4))
                    .col(decimal_null(RentLedgerEntries::ElectricTarifPerKwh).decimal_len(19, 4))
                    .col(decimal(RentLedgerEntries::WaterUsagePotableIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::WaterNonPotableIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::WaterAirLimbahIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::WaterPpnAirLimbahIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::WaterPemeliharaanIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::WaterAreaBersamaIdr).decimal_len(19, 2))
                    .col(decimal_null(RentLedgerEntries::WaterM3).decimal_len(19, 4))
                    .col(decimal_null(RentLedgerEntries::WaterTarifPerM3).decimal_len(19, 4))
                    .col(decimal(RentLedgerEntries::FitoutIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::ServiceChargeTotalIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::ElectricTotalIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::WaterTotalIdr).decimal_len(19, 2))
                    .col(decimal(RentLedgerEntries::TotalIdr).decimal_len(19, 2))
                    .col(string(RentLedgerEntries::Source).default("manual"))
                    .col(date_time(RentLedgerEntries::CreatedAt))
                    .col(date_time(RentLedgerEntries::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RentLedgerEntries::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum RentLedgerEntries {
    Table,
    Id,
    Period,
    Currency,
    SinkingFundIdr,
    ServiceChargeIdr,
    PpnServiceChargeIdr,
    ElectricUsageIdr,
    ElectricPpnIdr,
    ElectricAreaBersamaIdr,
    ElectricPjuIdr,
    ElectricKwh,
    ElectricTarifPerKwh,
    WaterUsagePotableIdr,
    WaterNonPotableIdr,
    WaterAirLimbahIdr,
    WaterPpnAirLimbahIdr,
    WaterPemeliharaanIdr,
    WaterAreaBersamaIdr,
    WaterM3,
    WaterTarifPerM3,
    FitoutIdr,
    ServiceChargeTotalIdr,
    ElectricTotalIdr,
    WaterTotalIdr,
    TotalIdr,
    Source,
    CreatedAt,
    UpdatedAt,
}
