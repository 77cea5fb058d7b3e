//! The rent-ledger calculator.
//!
//! Everything here is synchronous pure arithmetic over one ledger entry:
//! deriving usage costs from meter readings, inferring whether a stored
//! cost was hand-edited, and rolling the line items up into subtotals and
//! a grand total. Each money component is rounded to a whole IDR before
//! aggregation, never only on the final sum, so a record survives any
//! number of load/save cycles without drift.

pub mod session;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::period::is_month;

/// Rounds a money value to the nearest whole IDR, half away from zero.
pub fn round_idr(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Usage cost derived from a meter reading and its unit tariff.
/// Either side missing means no derivable cost. Not rounded; rounding
/// happens when the value enters a subtotal.
pub fn usage_cost(quantity: Option<Decimal>, tariff: Option<Decimal>) -> Decimal {
    match (quantity, tariff) {
        (Some(quantity), Some(tariff)) => quantity * tariff,
        _ => Decimal::ZERO,
    }
}

/// Picks the authoritative usage cost for a line: the manual value when
/// the override is on, the derived product otherwise.
pub fn resolve_usage_value(override_on: bool, override_value: Decimal, computed: Decimal) -> Decimal {
    if override_on {
        override_value
    } else {
        computed
    }
}

/// Decides whether a persisted usage cost must be treated as a manual
/// override when an entry is reopened for editing.
///
/// Override state is never persisted; it is re-derived from the stored
/// cost and the meter pair every time. If quantity and tariff are present
/// and reproduce the stored cost under rounding, auto mode regenerates
/// history exactly and the override stays off. Any missing meter value or
/// rounding mismatch means the figure was hand-edited, and auto mode
/// would silently rewrite it.
pub fn infer_override(
    stored_cost: Decimal,
    quantity: Option<Decimal>,
    tariff: Option<Decimal>,
) -> bool {
    match (quantity, tariff) {
        (Some(quantity), Some(tariff)) => round_idr(stored_cost) != round_idr(quantity * tariff),
        _ => true,
    }
}

/// Raw line items of one ledger entry plus the two session-local
/// override flags. The usage-cost fields are `None` until the user
/// enters a manual value; when the override is off they are ignored in
/// favour of the derived product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerLines {
    pub sinking_fund: Decimal,
    pub service_charge: Decimal,
    pub ppn_service_charge: Decimal,
    pub electric_usage: Option<Decimal>,
    pub electric_ppn: Decimal,
    pub electric_area_bersama: Decimal,
    pub electric_pju: Decimal,
    pub electric_kwh: Option<Decimal>,
    pub electric_tarif_per_kwh: Option<Decimal>,
    pub electric_override: bool,
    pub water_usage_potable: Option<Decimal>,
    pub water_non_potable: Decimal,
    pub water_air_limbah: Decimal,
    pub water_ppn_air_limbah: Decimal,
    pub water_pemeliharaan: Decimal,
    pub water_area_bersama: Decimal,
    pub water_m3: Option<Decimal>,
    pub water_tarif_per_m3: Option<Decimal>,
    pub water_override: bool,
    pub fitout: Decimal,
}

/// Rolled-up totals of one ledger entry, every component rounded to a
/// whole IDR before summation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerTotals {
    /// Resolved and rounded electricity usage cost.
    pub electric_usage: Decimal,
    /// Resolved and rounded potable-water usage cost.
    pub water_usage: Decimal,
    pub service_charge_total: Decimal,
    pub electric_total: Decimal,
    pub water_total: Decimal,
    pub total: Decimal,
}

/// Computes the subtotals and grand total of an entry.
///
/// Pure and idempotent; calling it twice on unchanged lines yields
/// identical totals. Negative inputs are passed through unmodified --
/// non-negativity is the caller's validation concern, checked by
/// [`validate`].
pub fn compute_totals(lines: &LedgerLines) -> LedgerTotals {
    let electric_usage = round_idr(resolve_usage_value(
        lines.electric_override,
        lines.electric_usage.unwrap_or_default(),
        usage_cost(lines.electric_kwh, lines.electric_tarif_per_kwh),
    ));
    let water_usage = round_idr(resolve_usage_value(
        lines.water_override,
        lines.water_usage_potable.unwrap_or_default(),
        usage_cost(lines.water_m3, lines.water_tarif_per_m3),
    ));

    let service_charge_total =
        round_idr(lines.service_charge) + round_idr(lines.ppn_service_charge);
    let electric_total = electric_usage
        + round_idr(lines.electric_ppn)
        + round_idr(lines.electric_area_bersama)
        + round_idr(lines.electric_pju);
    let water_total = water_usage
        + round_idr(lines.water_non_potable)
        + round_idr(lines.water_air_limbah)
        + round_idr(lines.water_ppn_air_limbah)
        + round_idr(lines.water_pemeliharaan)
        + round_idr(lines.water_area_bersama);
    let total = round_idr(lines.sinking_fund)
        + service_charge_total
        + electric_total
        + water_total
        + round_idr(lines.fitout);

    LedgerTotals {
        electric_usage,
        water_usage,
        service_charge_total,
        electric_total,
        water_total,
        total,
    }
}

/// A field-level validation finding; `field` carries the wire name of
/// the offending field so it can be reported against the right input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl FieldIssue {
    fn non_negative(field: &'static str, label: &str) -> Self {
        Self {
            field,
            message: format!("{} must be zero or greater", label),
        }
    }
}

/// Validates an entry before submission: the period must be a calendar
/// month (`YYYY-MM`, month 1-12), every money and meter value must be
/// non-negative, and a line whose override is on must actually carry a
/// manual value. All findings are recoverable; nothing is mutated.
pub fn validate(lines: &LedgerLines, period: &str) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if !is_month(period) {
        issues.push(FieldIssue {
            field: "period",
            message: "Period must be a calendar month in YYYY-MM format".to_string(),
        });
    }

    let money_fields: [(&'static str, &str, Decimal); 12] = [
        ("sinking_fund_idr", "Sinking fund", lines.sinking_fund),
        ("service_charge_idr", "Service charge", lines.service_charge),
        (
            "ppn_service_charge_idr",
            "PPN service charge",
            lines.ppn_service_charge,
        ),
        ("electric_ppn_idr", "Electric PPN", lines.electric_ppn),
        (
            "electric_area_bersama_idr",
            "Electric area bersama",
            lines.electric_area_bersama,
        ),
        ("electric_pju_idr", "Electric PJU", lines.electric_pju),
        (
            "water_non_potable_idr",
            "Water usage non-potable",
            lines.water_non_potable,
        ),
        ("water_air_limbah_idr", "Air limbah", lines.water_air_limbah),
        (
            "water_ppn_air_limbah_idr",
            "PPN air limbah",
            lines.water_ppn_air_limbah,
        ),
        (
            "water_pemeliharaan_idr",
            "Water maintenance",
            lines.water_pemeliharaan,
        ),
        (
            "water_area_bersama_idr",
            "Water area bersama",
            lines.water_area_bersama,
        ),
        ("fitout_idr", "Fitout", lines.fitout),
    ];
    for (field, label, value) in money_fields {
        if value < Decimal::ZERO {
            issues.push(FieldIssue::non_negative(field, label));
        }
    }

    let optional_fields: [(&'static str, &str, Option<Decimal>); 6] = [
        ("electric_usage_idr", "Electric usage", lines.electric_usage),
        ("electric_kwh", "Electric kWh", lines.electric_kwh),
        (
            "electric_tarif_per_kwh",
            "Electric tariff",
            lines.electric_tarif_per_kwh,
        ),
        (
            "water_usage_potable_idr",
            "Water usage potable",
            lines.water_usage_potable,
        ),
        ("water_m3", "Water m³", lines.water_m3),
        ("water_tarif_per_m3", "Water tariff", lines.water_tarif_per_m3),
    ];
    for (field, label, value) in optional_fields {
        if let Some(value) = value {
            if value < Decimal::ZERO {
                issues.push(FieldIssue::non_negative(field, label));
            }
        }
    }

    if lines.electric_override && lines.electric_usage.is_none() {
        issues.push(FieldIssue {
            field: "electric_usage_idr",
            message: "Electric usage cost is required when override is on".to_string(),
        });
    }
    if lines.water_override && lines.water_usage_potable.is_none() {
        issues.push(FieldIssue {
            field: "water_usage_potable_idr",
            message: "Water usage cost is required when override is on".to_string(),
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    #[test]
    fn test_round_idr_half_away_from_zero() {
        assert_eq!(round_idr(Decimal::new(105, 1)), dec(11)); // 10.5
        assert_eq!(round_idr(Decimal::new(104, 1)), dec(10)); // 10.4
        assert_eq!(round_idr(Decimal::new(-105, 1)), dec(-11)); // -10.5
        assert_eq!(round_idr(dec(225_000)), dec(225_000));
    }

    #[test]
    fn test_usage_cost_null_handling() {
        assert_eq!(usage_cost(None, Some(dec(5))), Decimal::ZERO);
        assert_eq!(usage_cost(Some(dec(10)), None), Decimal::ZERO);
        assert_eq!(usage_cost(None, None), Decimal::ZERO);
        assert_eq!(
            usage_cost(Some(dec(10)), Some(Decimal::new(25, 1))),
            dec(25)
        );
    }

    #[test]
    fn test_resolve_usage_value() {
        assert_eq!(resolve_usage_value(true, dec(101), dec(100)), dec(101));
        assert_eq!(resolve_usage_value(false, dec(101), dec(100)), dec(100));
    }

    #[test]
    fn test_infer_override_boundaries() {
        // Consistent: stored cost reproduces quantity x tariff.
        assert!(!infer_override(dec(100), Some(dec(10)), Some(dec(10))));
        // Rounding mismatch: the figure was hand-edited.
        assert!(infer_override(dec(101), Some(dec(10)), Some(dec(10))));
        // Missing meter data always forces the override on.
        assert!(infer_override(dec(100), None, Some(dec(10))));
        assert!(infer_override(dec(100), Some(dec(10)), None));
    }

    #[test]
    fn test_infer_override_tolerates_sub_idr_noise() {
        // 150 x 1500.001 = 225000.15 rounds to 225000: still consistent.
        assert!(!infer_override(
            dec(225_000),
            Some(dec(150)),
            Some(Decimal::new(1_500_001, 3)),
        ));
    }

    fn scenario_lines() -> LedgerLines {
        LedgerLines {
            sinking_fund: dec(500_000),
            service_charge: dec(1_000_000),
            ppn_service_charge: dec(110_000),
            electric_ppn: dec(22_500),
            electric_area_bersama: dec(50_000),
            electric_pju: dec(10_000),
            electric_kwh: Some(dec(150)),
            electric_tarif_per_kwh: Some(dec(1_500)),
            water_m3: Some(dec(20)),
            water_tarif_per_m3: Some(dec(8_000)),
            ..Default::default()
        }
    }

    #[test]
    fn test_compute_totals_end_to_end_scenario() {
        let totals = compute_totals(&scenario_lines());

        assert_eq!(totals.electric_usage, dec(225_000));
        assert_eq!(totals.electric_total, dec(307_500));
        assert_eq!(totals.water_usage, dec(160_000));
        assert_eq!(totals.water_total, dec(160_000));
        assert_eq!(totals.service_charge_total, dec(1_110_000));
        assert_eq!(totals.total, dec(2_077_500));
    }

    #[test]
    fn test_compute_totals_is_idempotent() {
        let lines = scenario_lines();
        assert_eq!(compute_totals(&lines), compute_totals(&lines));
    }

    #[test]
    fn test_compute_totals_override_beats_derived() {
        let mut lines = scenario_lines();
        lines.electric_override = true;
        lines.electric_usage = Some(dec(240_000));

        let totals = compute_totals(&lines);
        assert_eq!(totals.electric_usage, dec(240_000));
        assert_eq!(totals.electric_total, dec(322_500));
        assert_eq!(totals.total, dec(2_092_500));
    }

    #[test]
    fn test_compute_totals_rounds_components_before_summing() {
        // Two components at x.5 each: rounding per field gives 11 + 11,
        // rounding only the sum would give 21.
        let lines = LedgerLines {
            service_charge: Decimal::new(105, 1),
            ppn_service_charge: Decimal::new(105, 1),
            ..Default::default()
        };
        let totals = compute_totals(&lines);
        assert_eq!(totals.service_charge_total, dec(22));
        assert_eq!(totals.total, dec(22));
    }

    #[test]
    fn test_compute_totals_propagates_negative_inputs() {
        // No clamping; validation is upstream.
        let lines = LedgerLines {
            fitout: dec(-100),
            ..Default::default()
        };
        assert_eq!(compute_totals(&lines).total, dec(-100));
    }

    #[test]
    fn test_validate_clean_entry() {
        assert!(validate(&scenario_lines(), "2024-03").is_empty());
    }

    #[test]
    fn test_validate_reports_bad_period() {
        for bad in ["2024-3", "2024-00", "2024-13"] {
            let issues = validate(&scenario_lines(), bad);
            assert_eq!(issues.len(), 1, "expected {:?} to be rejected", bad);
            assert_eq!(issues[0].field, "period");
        }
    }

    #[test]
    fn test_validate_reports_negative_fields_individually() {
        let mut lines = scenario_lines();
        lines.fitout = dec(-1);
        lines.water_m3 = Some(dec(-20));

        let issues = validate(&lines, "2024-03");
        let fields: Vec<&str> = issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["fitout_idr", "water_m3"]);
    }

    #[test]
    fn test_validate_requires_value_when_override_on() {
        let mut lines = scenario_lines();
        lines.electric_override = true;
        lines.electric_usage = None;

        let issues = validate(&lines, "2024-03");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "electric_usage_idr");

        lines.electric_usage = Some(dec(225_000));
        assert!(validate(&lines, "2024-03").is_empty());
    }
}
