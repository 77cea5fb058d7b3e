pub mod rent_ledger_entry;

pub mod prelude {
    pub use super::rent_ledger_entry::Entity as RentLedgerEntry;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, DbErr, EntityTrait,
        QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn entry_for(period: &str) -> rent_ledger_entry::ActiveModel {
        let midnight = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        rent_ledger_entry::ActiveModel {
            period: Set(period.to_string()),
            currency: Set("IDR".to_string()),
            sinking_fund_idr: Set(Decimal::new(500_000, 0)),
            service_charge_idr: Set(Decimal::new(1_000_000, 0)),
            ppn_service_charge_idr: Set(Decimal::new(110_000, 0)),
            electric_usage_idr: Set(Decimal::new(225_000, 0)),
            electric_ppn_idr: Set(Decimal::new(22_500, 0)),
            electric_area_bersama_idr: Set(Decimal::new(50_000, 0)),
            electric_pju_idr: Set(Decimal::new(10_000, 0)),
            electric_kwh: Set(Some(Decimal::new(150, 0))),
            electric_tarif_per_kwh: Set(Some(Decimal::new(1_500, 0))),
            water_usage_potable_idr: Set(Decimal::new(160_000, 0)),
            water_non_potable_idr: Set(Decimal::ZERO),
            water_air_limbah_idr: Set(Decimal::ZERO),
            water_ppn_air_limbah_idr: Set(Decimal::ZERO),
            water_pemeliharaan_idr: Set(Decimal::ZERO),
            water_area_bersama_idr: Set(Decimal::ZERO),
            water_m3: Set(Some(Decimal::new(20, 0))),
            water_tarif_per_m3: Set(Some(Decimal::new(8_000, 0))),
            fitout_idr: Set(Decimal::ZERO),
            service_charge_total_idr: Set(Decimal::new(1_110_000, 0)),
            electric_total_idr: Set(Decimal::new(307_500, 0)),
            water_total_idr: Set(Decimal::new(160_000, 0)),
            total_idr: Set(Decimal::new(2_077_500, 0)),
            source: Set("manual".to_string()),
            created_at: Set(midnight),
            updated_at: Set(midnight),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_entry_round_trip() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let inserted = entry_for("2024-03").insert(&db).await?;
        assert!(inserted.id > 0);

        let fetched = RentLedgerEntry::find()
            .filter(rent_ledger_entry::Column::Period.eq("2024-03"))
            .one(&db)
            .await?
            .expect("inserted entry should be found by period");

        assert_eq!(fetched.currency, "IDR");
        assert_eq!(fetched.electric_kwh, Some(Decimal::new(150, 0)));
        assert_eq!(fetched.total_idr, Decimal::new(2_077_500, 0));

        Ok(())
    }

    #[tokio::test]
    async fn test_period_is_unique() -> Result<(), DbErr> {
        let db = setup_db().await?;

        entry_for("2024-03").insert(&db).await?;
        let duplicate = entry_for("2024-03").insert(&db).await;
        assert!(duplicate.is_err(), "second insert for the same period must fail");

        Ok(())
    }
}
