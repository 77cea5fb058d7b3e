//! Period labels and their ordering.
//!
//! Trend buckets are labelled at one of four granularities: `YYYY`,
//! `YYYY-Qn`, `YYYY-Sn` or `YYYY-MM`. `sort_key` maps every label onto a
//! single integer scale so a mixed-granularity table can still be ordered,
//! with quarter and semester labels aligned to the month of their period
//! end (Q2 sorts with June, S1 sorts with June, a bare year sorts just
//! before its own January).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use common::TrendPoint;

use crate::error::{ComputeError, Result};

/// Bucket coarseness for trend grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Monthly,
    Quarterly,
    Semester,
    #[default]
    Yearly,
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Granularity::Monthly),
            "quarterly" => Ok(Granularity::Quarterly),
            "semester" => Ok(Granularity::Semester),
            "yearly" => Ok(Granularity::Yearly),
            _ => Err(format!("Invalid granularity: {}", s)),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Monthly => "monthly",
            Granularity::Quarterly => "quarterly",
            Granularity::Semester => "semester",
            Granularity::Yearly => "yearly",
        };
        write!(f, "{}", name)
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_year(s: &str) -> Option<i64> {
    if s.len() == 4 && all_digits(s) {
        s.parse().ok()
    } else {
        None
    }
}

/// Splits a `YYYY-MM`-shaped label into its year part and month number.
/// Returns `None` for anything else; the month is not range-checked here,
/// so callers that need a calendar month check `1..=12` themselves.
fn split_month(period: &str) -> Option<(&str, u32)> {
    let (year, month) = period.split_once('-')?;
    if year.len() != 4 || !all_digits(year) || month.len() != 2 || !all_digits(month) {
        return None;
    }
    Some((year, month.parse().ok()?))
}

/// True when the label is a valid monthly period: `YYYY-MM` with the
/// month in `1..=12`. Shapes like `2024-00` or `2024-13` are rejected.
pub fn is_month(period: &str) -> bool {
    matches!(split_month(period), Some((_, month)) if (1..=12).contains(&month))
}

/// Maps a period label onto a totally ordered integer key.
///
/// Patterns are tried in order: year only, quarter, semester, month.
/// Anything else keys to `0` and therefore sorts as earliest/unknown;
/// unparseable labels are not an error here.
pub fn sort_key(period: &str) -> i64 {
    if let Some(year) = parse_year(period) {
        return year * 100;
    }

    let Some((year, rest)) = period.split_once('-') else {
        return 0;
    };
    let Some(year) = parse_year(year) else {
        return 0;
    };

    match rest {
        "Q1" => return year * 100 + 3,
        "Q2" => return year * 100 + 6,
        "Q3" => return year * 100 + 9,
        "Q4" => return year * 100 + 12,
        "S1" => return year * 100 + 6,
        "S2" => return year * 100 + 12,
        _ => {}
    }

    if rest.len() == 2 && all_digits(rest) {
        if let Ok(month) = rest.parse::<i64>() {
            return year * 100 + month;
        }
    }

    0
}

/// Orders trend points newest-first. The sort is stable, so points whose
/// labels key equal keep their original relative order.
pub fn sort_points_desc(points: &mut [TrendPoint]) {
    points.sort_by_key(|point| std::cmp::Reverse(sort_key(&point.period)));
}

/// Maps a monthly `YYYY-MM` label onto the bucket label of the requested
/// granularity. Labels that are not a valid month (including months
/// outside `1..=12`) pass through unchanged rather than producing a
/// nonsense quarter or semester bucket.
pub fn group_key(period: &str, granularity: Granularity) -> String {
    let Some((year, month)) = split_month(period) else {
        return period.to_string();
    };
    if !(1..=12).contains(&month) {
        return period.to_string();
    }

    match granularity {
        Granularity::Monthly => period.to_string(),
        Granularity::Yearly => year.to_string(),
        Granularity::Quarterly => format!("{}-Q{}", year, (month - 1) / 3 + 1),
        Granularity::Semester => format!("{}-S{}", year, if month <= 6 { 1 } else { 2 }),
    }
}

/// Advances a `YYYY-MM` period by one calendar month.
///
/// A label that is not a valid month (including months outside 1..=12)
/// is a validation error rather than a silent substitute; callers that
/// want a lenient default should ask for [`period_for_date`] explicitly.
pub fn advance_period(period: &str) -> Result<String> {
    let (year, month) = split_month(period)
        .filter(|(_, month)| (1..=12).contains(month))
        .ok_or_else(|| ComputeError::InvalidPeriod(period.to_string()))?;
    let year: i32 = year
        .parse()
        .map_err(|_| ComputeError::InvalidPeriod(period.to_string()))?;

    Ok(if month == 12 {
        format!("{:04}-01", year + 1)
    } else {
        format!("{:04}-{:02}", year, month + 1)
    })
}

/// The `YYYY-MM` label of the month containing the given date.
pub fn period_for_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn point(period: &str, total: i64) -> TrendPoint {
        TrendPoint {
            period: period.to_string(),
            total: Decimal::new(total, 0),
        }
    }

    #[test]
    fn test_sort_key_formulas() {
        assert_eq!(sort_key("2024"), 202_400);
        assert_eq!(sort_key("2024-01"), 202_401);
        assert_eq!(sort_key("2023-Q4"), 202_312);
        assert_eq!(sort_key("2023-06"), 202_306);
        assert_eq!(sort_key("2024-S1"), 202_406);
        assert_eq!(sort_key("2024-S2"), 202_412);
    }

    #[test]
    fn test_sort_key_cross_granularity_alignment() {
        // Quarter 2 aligns with June at month granularity.
        assert_eq!(sort_key("2024-Q2"), sort_key("2024-06"));
        assert_eq!(sort_key("2024-S1"), sort_key("2024-06"));
        assert_eq!(sort_key("2024-S2"), sort_key("2024-Q4"));
    }

    #[test]
    fn test_sort_key_monotonic_within_year() {
        for month in 1..12u32 {
            let earlier = format!("2024-{:02}", month);
            let later = format!("2024-{:02}", month + 1);
            assert!(sort_key(&earlier) < sort_key(&later));
        }
        assert!(sort_key("2023-12") < sort_key("2024-01"));
    }

    #[test]
    fn test_sort_key_unknown_labels() {
        assert_eq!(sort_key(""), 0);
        assert_eq!(sort_key("garbage"), 0);
        assert_eq!(sort_key("2024-Q5"), 0);
        assert_eq!(sort_key("2024-S3"), 0);
        assert_eq!(sort_key("24-01"), 0);
        assert_eq!(sort_key("2024-1"), 0);
    }

    #[test]
    fn test_sort_points_desc_scenario() {
        let mut points = vec![
            point("2023-06", 1),
            point("2024-01", 2),
            point("2023-Q4", 3),
            point("2024", 4),
        ];
        sort_points_desc(&mut points);

        let order: Vec<&str> = points.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(order, vec!["2024-01", "2024", "2023-Q4", "2023-06"]);
    }

    #[test]
    fn test_sort_points_desc_is_stable_on_ties() {
        let mut points = vec![
            point("unknown-a", 1),
            point("unknown-b", 2),
            point("2024-06", 3),
            point("2024-Q2", 4),
        ];
        sort_points_desc(&mut points);

        // 2024-06 and 2024-Q2 key equal; the unknown labels key to zero.
        // Original relative order is preserved within each tie.
        let order: Vec<&str> = points.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(order, vec!["2024-06", "2024-Q2", "unknown-a", "unknown-b"]);
    }

    #[test]
    fn test_is_month_requires_calendar_month() {
        assert!(is_month("2024-01"));
        assert!(is_month("2024-12"));
        assert!(!is_month("2024-00"));
        assert!(!is_month("2024-13"));
        assert!(!is_month("2024"));
        assert!(!is_month("2024-1"));
    }

    #[test]
    fn test_group_key() {
        assert_eq!(group_key("2024-03", Granularity::Monthly), "2024-03");
        assert_eq!(group_key("2024-03", Granularity::Quarterly), "2024-Q1");
        assert_eq!(group_key("2024-04", Granularity::Quarterly), "2024-Q2");
        assert_eq!(group_key("2024-12", Granularity::Quarterly), "2024-Q4");
        assert_eq!(group_key("2024-06", Granularity::Semester), "2024-S1");
        assert_eq!(group_key("2024-07", Granularity::Semester), "2024-S2");
        assert_eq!(group_key("2024-03", Granularity::Yearly), "2024");
    }

    #[test]
    fn test_group_key_passes_out_of_range_months_through() {
        assert_eq!(group_key("2024-00", Granularity::Quarterly), "2024-00");
        assert_eq!(group_key("2024-13", Granularity::Quarterly), "2024-13");
        assert_eq!(group_key("2024-13", Granularity::Semester), "2024-13");
        assert_eq!(group_key("2024-00", Granularity::Yearly), "2024-00");
    }

    #[test]
    fn test_advance_period() {
        assert_eq!(advance_period("2024-03").unwrap(), "2024-04");
        assert_eq!(advance_period("2024-12").unwrap(), "2025-01");
        assert_eq!(advance_period("2024-09").unwrap(), "2024-10");
    }

    #[test]
    fn test_advance_period_rejects_malformed_input() {
        for bad in ["", "2024", "2024-13", "2024-00", "2024-1", "abcd-01"] {
            assert_eq!(
                advance_period(bad),
                Err(ComputeError::InvalidPeriod(bad.to_string())),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_period_for_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(period_for_date(date), "2024-03");
        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(period_for_date(date), "2024-12");
    }

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("quarterly".parse::<Granularity>(), Ok(Granularity::Quarterly));
        assert!("weekly".parse::<Granularity>().is_err());
    }
}
