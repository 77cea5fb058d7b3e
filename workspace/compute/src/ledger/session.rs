//! One ledger-entry editing session.
//!
//! A session owns the raw line items and both usage-cost override flags;
//! the flags are never persisted and are re-inferred from the loaded
//! record on every open, so ambient/global override state cannot exist.
//! Lifecycle: populated (blank, from an existing record, or copied
//! forward from the latest record) -> edited -> submitted or deleted;
//! cancelling is simply dropping the session.

use tracing::debug;

use common::{UpsertRentLedgerRequest, LEDGER_CURRENCY};
use model::entities::rent_ledger_entry;

use crate::error::Result;
use crate::ledger::{
    compute_totals, infer_override, round_idr, validate, FieldIssue, LedgerLines, LedgerTotals,
};
use crate::period::advance_period;

/// How a session was populated. Deletion is only reachable for sessions
/// opened on an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    Blank,
    FromExisting,
    CopyForward,
}

/// A single-entry editing session; the only mutable state the core holds.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    origin: SessionOrigin,
    pub period: String,
    pub lines: LedgerLines,
}

fn lines_from_record(record: &rent_ledger_entry::Model) -> LedgerLines {
    LedgerLines {
        sinking_fund: record.sinking_fund_idr,
        service_charge: record.service_charge_idr,
        ppn_service_charge: record.ppn_service_charge_idr,
        electric_usage: Some(record.electric_usage_idr),
        electric_ppn: record.electric_ppn_idr,
        electric_area_bersama: record.electric_area_bersama_idr,
        electric_pju: record.electric_pju_idr,
        electric_kwh: record.electric_kwh,
        electric_tarif_per_kwh: record.electric_tarif_per_kwh,
        electric_override: infer_override(
            record.electric_usage_idr,
            record.electric_kwh,
            record.electric_tarif_per_kwh,
        ),
        water_usage_potable: Some(record.water_usage_potable_idr),
        water_non_potable: record.water_non_potable_idr,
        water_air_limbah: record.water_air_limbah_idr,
        water_ppn_air_limbah: record.water_ppn_air_limbah_idr,
        water_pemeliharaan: record.water_pemeliharaan_idr,
        water_area_bersama: record.water_area_bersama_idr,
        water_m3: record.water_m3,
        water_tarif_per_m3: record.water_tarif_per_m3,
        water_override: infer_override(
            record.water_usage_potable_idr,
            record.water_m3,
            record.water_tarif_per_m3,
        ),
        fitout: record.fitout_idr,
    }
}

impl EditSession {
    /// Starts a blank session for the given period; every line is zero
    /// and both overrides are off.
    pub fn blank(period: impl Into<String>) -> Self {
        Self {
            origin: SessionOrigin::Blank,
            period: period.into(),
            lines: LedgerLines::default(),
        }
    }

    /// Opens an existing record for editing. Override flags are inferred
    /// from the stored costs and meter pairs, never loaded.
    pub fn from_existing(record: &rent_ledger_entry::Model) -> Self {
        let lines = lines_from_record(record);
        debug!(
            period = %record.period,
            electric_override = lines.electric_override,
            water_override = lines.water_override,
            "opened existing ledger entry for editing"
        );
        Self {
            origin: SessionOrigin::FromExisting,
            period: record.period.clone(),
            lines,
        }
    }

    /// Starts a new entry by copying every line and meter pair from the
    /// latest record and advancing its period by one month. Fails when
    /// the source record carries a malformed period.
    pub fn copy_forward(latest: &rent_ledger_entry::Model) -> Result<Self> {
        let period = advance_period(&latest.period)?;
        debug!(from = %latest.period, to = %period, "copying ledger entry forward");
        Ok(Self {
            origin: SessionOrigin::CopyForward,
            period,
            lines: lines_from_record(latest),
        })
    }

    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    /// Live totals for the current field values.
    pub fn totals(&self) -> LedgerTotals {
        compute_totals(&self.lines)
    }

    /// Field-level findings that would block submission.
    pub fn validate(&self) -> Vec<FieldIssue> {
        validate(&self.lines, &self.period)
    }

    /// Deletion requires an entry that actually exists.
    pub fn can_delete(&self) -> bool {
        self.origin == SessionOrigin::FromExisting
    }

    /// Validates the session and produces the upsert payload: every
    /// money field rounded to a whole IDR and both usage costs resolved
    /// through their override flags. Nothing is mutated on failure.
    pub fn submit(&self) -> std::result::Result<UpsertRentLedgerRequest, Vec<FieldIssue>> {
        let issues = self.validate();
        if !issues.is_empty() {
            return Err(issues);
        }

        let totals = self.totals();
        let lines = &self.lines;
        Ok(UpsertRentLedgerRequest {
            period: self.period.clone(),
            currency: LEDGER_CURRENCY.to_string(),
            sinking_fund_idr: round_idr(lines.sinking_fund),
            service_charge_idr: round_idr(lines.service_charge),
            ppn_service_charge_idr: round_idr(lines.ppn_service_charge),
            electric_usage_idr: totals.electric_usage,
            electric_ppn_idr: round_idr(lines.electric_ppn),
            electric_area_bersama_idr: round_idr(lines.electric_area_bersama),
            electric_pju_idr: round_idr(lines.electric_pju),
            electric_kwh: lines.electric_kwh,
            electric_tarif_per_kwh: lines.electric_tarif_per_kwh,
            water_usage_potable_idr: totals.water_usage,
            water_non_potable_idr: round_idr(lines.water_non_potable),
            water_air_limbah_idr: round_idr(lines.water_air_limbah),
            water_ppn_air_limbah_idr: round_idr(lines.water_ppn_air_limbah),
            water_pemeliharaan_idr: round_idr(lines.water_pemeliharaan),
            water_area_bersama_idr: round_idr(lines.water_area_bersama),
            water_m3: lines.water_m3,
            water_tarif_per_m3: lines.water_tarif_per_m3,
            fitout_idr: round_idr(lines.fitout),
        })
    }
}
