//! Trend and breakdown aggregation over persisted ledger entries.
//!
//! Entries are bucketed by [`group_key`](crate::period::group_key) at the
//! requested granularity and summed under the requested view; the result
//! is ordered newest-first by the period sort key.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use common::{BreakdownItem, TrendPoint};
use model::entities::rent_ledger_entry;

use crate::period::{group_key, sort_points_desc, Granularity};

/// What a trend series sums: IDR cost, or raw meter usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendView {
    #[default]
    Cost,
    ElectricityUsage,
    WaterUsage,
}

impl FromStr for TrendView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cost" => Ok(TrendView::Cost),
            "electricity_usage" => Ok(TrendView::ElectricityUsage),
            "water_usage" => Ok(TrendView::WaterUsage),
            _ => Err(format!("Invalid trend view: {}", s)),
        }
    }
}

impl fmt::Display for TrendView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrendView::Cost => "cost",
            TrendView::ElectricityUsage => "electricity_usage",
            TrendView::WaterUsage => "water_usage",
        };
        write!(f, "{}", name)
    }
}

/// Cost categories a ledger entry breaks down into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerCategory {
    Electricity,
    Water,
    ServiceCharge,
    SinkingFund,
    Fitout,
}

impl LedgerCategory {
    pub const ALL: [LedgerCategory; 5] = [
        LedgerCategory::Electricity,
        LedgerCategory::Water,
        LedgerCategory::ServiceCharge,
        LedgerCategory::SinkingFund,
        LedgerCategory::Fitout,
    ];

    /// The stored IDR total this category contributes for one entry.
    /// The service-charge subtotal already includes its PPN.
    fn amount(&self, entry: &rent_ledger_entry::Model) -> Decimal {
        match self {
            LedgerCategory::Electricity => entry.electric_total_idr,
            LedgerCategory::Water => entry.water_total_idr,
            LedgerCategory::ServiceCharge => entry.service_charge_total_idr,
            LedgerCategory::SinkingFund => entry.sinking_fund_idr,
            LedgerCategory::Fitout => entry.fitout_idr,
        }
    }
}

impl FromStr for LedgerCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electricity" => Ok(LedgerCategory::Electricity),
            "water" => Ok(LedgerCategory::Water),
            "service_charge" => Ok(LedgerCategory::ServiceCharge),
            "sinking_fund" => Ok(LedgerCategory::SinkingFund),
            "fitout" => Ok(LedgerCategory::Fitout),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

impl fmt::Display for LedgerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LedgerCategory::Electricity => "electricity",
            LedgerCategory::Water => "water",
            LedgerCategory::ServiceCharge => "service_charge",
            LedgerCategory::SinkingFund => "sinking_fund",
            LedgerCategory::Fitout => "fitout",
        };
        write!(f, "{}", name)
    }
}

fn cost_value(entry: &rent_ledger_entry::Model, categories: &[LedgerCategory]) -> Decimal {
    if categories.is_empty() {
        return entry.total_idr;
    }
    categories
        .iter()
        .map(|category| category.amount(entry))
        .sum()
}

/// Sums entries into trend buckets at the requested granularity.
///
/// Cost view sums the selected categories' stored totals (the grand
/// total when no category filter is given); usage views sum the raw
/// meter readings and skip entries without meter data. Buckets come
/// back newest-first.
#[instrument(skip(entries), fields(num_entries = entries.len()))]
pub fn trend_series(
    entries: &[rent_ledger_entry::Model],
    granularity: Granularity,
    view: TrendView,
    categories: &[LedgerCategory],
) -> Vec<TrendPoint> {
    let mut buckets: HashMap<String, Decimal> = HashMap::new();

    for entry in entries {
        let value = match view {
            TrendView::ElectricityUsage => match entry.electric_kwh {
                Some(kwh) => kwh,
                None => continue,
            },
            TrendView::WaterUsage => match entry.water_m3 {
                Some(m3) => m3,
                None => continue,
            },
            TrendView::Cost => cost_value(entry, categories),
        };

        *buckets
            .entry(group_key(&entry.period, granularity))
            .or_insert(Decimal::ZERO) += value;
    }

    debug!("grouped {} entries into {} buckets", entries.len(), buckets.len());

    let mut points: Vec<TrendPoint> = buckets
        .into_iter()
        .map(|(period, total)| TrendPoint { period, total })
        .collect();
    // Bucket iteration order is arbitrary; normalize before the stable
    // newest-first sort so equal keys come out deterministically.
    points.sort_by(|a, b| a.period.cmp(&b.period));
    sort_points_desc(&mut points);
    points
}

/// Per-category totals over the given entries. Zero-total categories are
/// omitted and the rest are ordered largest first; each item reports how
/// many entries contributed.
#[instrument(skip(entries), fields(num_entries = entries.len()))]
pub fn breakdown(entries: &[rent_ledger_entry::Model]) -> Vec<BreakdownItem> {
    let count = entries.len() as u64;
    let mut items: Vec<BreakdownItem> = LedgerCategory::ALL
        .iter()
        .map(|category| BreakdownItem {
            category: category.to_string(),
            total: entries.iter().map(|entry| category.amount(entry)).sum(),
            count,
        })
        .filter(|item| item.total > Decimal::ZERO)
        .collect();

    items.sort_by(|a, b| b.total.cmp(&a.total));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::LEDGER_CURRENCY;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn entry(period: &str, total: i64) -> rent_ledger_entry::Model {
        let midnight = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        rent_ledger_entry::Model {
            id: 0,
            period: period.to_string(),
            currency: LEDGER_CURRENCY.to_string(),
            sinking_fund_idr: Decimal::ZERO,
            service_charge_idr: Decimal::ZERO,
            ppn_service_charge_idr: Decimal::ZERO,
            electric_usage_idr: Decimal::ZERO,
            electric_ppn_idr: Decimal::ZERO,
            electric_area_bersama_idr: Decimal::ZERO,
            electric_pju_idr: Decimal::ZERO,
            electric_kwh: None,
            electric_tarif_per_kwh: None,
            water_usage_potable_idr: Decimal::ZERO,
            water_non_potable_idr: Decimal::ZERO,
            water_air_limbah_idr: Decimal::ZERO,
            water_ppn_air_limbah_idr: Decimal::ZERO,
            water_pemeliharaan_idr: Decimal::ZERO,
            water_area_bersama_idr: Decimal::ZERO,
            water_m3: None,
            water_tarif_per_m3: None,
            fitout_idr: Decimal::ZERO,
            service_charge_total_idr: Decimal::ZERO,
            electric_total_idr: Decimal::ZERO,
            water_total_idr: Decimal::ZERO,
            total_idr: dec(total),
            source: "manual".to_string(),
            created_at: midnight,
            updated_at: midnight,
        }
    }

    #[test]
    fn test_trend_series_monthly_identity() {
        let entries = vec![entry("2024-01", 100), entry("2024-02", 200)];
        let points = trend_series(&entries, Granularity::Monthly, TrendView::Cost, &[]);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].period, "2024-02");
        assert_eq!(points[0].total, dec(200));
        assert_eq!(points[1].period, "2024-01");
    }

    #[test]
    fn test_trend_series_yearly_grouping_sums_buckets() {
        let entries = vec![
            entry("2023-11", 50),
            entry("2024-01", 100),
            entry("2024-02", 200),
        ];
        let points = trend_series(&entries, Granularity::Yearly, TrendView::Cost, &[]);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].period, "2024");
        assert_eq!(points[0].total, dec(300));
        assert_eq!(points[1].period, "2023");
        assert_eq!(points[1].total, dec(50));
    }

    #[test]
    fn test_trend_series_quarterly_labels() {
        let entries = vec![
            entry("2024-01", 10),
            entry("2024-03", 20),
            entry("2024-04", 40),
        ];
        let points = trend_series(&entries, Granularity::Quarterly, TrendView::Cost, &[]);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].period, "2024-Q2");
        assert_eq!(points[0].total, dec(40));
        assert_eq!(points[1].period, "2024-Q1");
        assert_eq!(points[1].total, dec(30));
    }

    #[test]
    fn test_trend_series_usage_view_skips_missing_meters() {
        let mut with_meter = entry("2024-01", 100);
        with_meter.electric_kwh = Some(dec(150));
        let without_meter = entry("2024-02", 200);

        let points = trend_series(
            &[with_meter, without_meter],
            Granularity::Monthly,
            TrendView::ElectricityUsage,
            &[],
        );

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].period, "2024-01");
        assert_eq!(points[0].total, dec(150));
    }

    #[test]
    fn test_trend_series_category_filter() {
        let mut march = entry("2024-03", 1_000);
        march.electric_total_idr = dec(300);
        march.water_total_idr = dec(150);
        march.service_charge_total_idr = dec(500);

        let points = trend_series(
            &[march],
            Granularity::Monthly,
            TrendView::Cost,
            &[LedgerCategory::Electricity, LedgerCategory::Water],
        );

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].total, dec(450));
    }

    #[test]
    fn test_breakdown_orders_and_omits_zero() {
        let mut a = entry("2024-01", 0);
        a.electric_total_idr = dec(300);
        a.sinking_fund_idr = dec(500);
        let mut b = entry("2024-02", 0);
        b.electric_total_idr = dec(400);

        let items = breakdown(&[a, b]);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, "electricity");
        assert_eq!(items[0].total, dec(700));
        assert_eq!(items[0].count, 2);
        assert_eq!(items[1].category, "sinking_fund");
        assert_eq!(items[1].total, dec(500));
    }

    #[test]
    fn test_breakdown_empty_input() {
        assert!(breakdown(&[]).is_empty());
    }

    #[test]
    fn test_parsing_helpers() {
        assert_eq!("cost".parse::<TrendView>(), Ok(TrendView::Cost));
        assert!("calories".parse::<TrendView>().is_err());
        assert_eq!(
            "service_charge".parse::<LedgerCategory>(),
            Ok(LedgerCategory::ServiceCharge)
        );
        assert!("rent".parse::<LedgerCategory>().is_err());
    }
}
