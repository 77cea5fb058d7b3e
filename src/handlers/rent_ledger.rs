use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDateTime, Utc};
use common::{format_idr, UpsertRentLedgerRequest, LEDGER_CURRENCY};
use compute::ledger::{
    compute_totals, infer_override, round_idr, validate, FieldIssue, LedgerLines,
};
use compute::period::sort_key;
use model::entities::rent_ledger_entry;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Rent ledger entry response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RentLedgerEntryResponse {
    pub id: i32,
    /// Billing period (YYYY-MM)
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
    pub electric_kwh: Option<Decimal>,
    pub electric_tarif_per_kwh: Option<Decimal>,
    /// Potable water usage cost (m³ × tariff, or the manual override)
    pub water_usage_potable_idr: Decimal,
    pub water_non_potable_idr: Decimal,
    pub water_air_limbah_idr: Decimal,
    pub water_ppn_air_limbah_idr: Decimal,
    pub water_pemeliharaan_idr: Decimal,
    pub water_area_bersama_idr: Decimal,
    pub water_m3: Option<Decimal>,
    pub water_tarif_per_m3: Option<Decimal>,
    pub fitout_idr: Decimal,
    pub service_charge_total_idr: Decimal,
    pub electric_total_idr: Decimal,
    pub water_total_idr: Decimal,
    pub total_idr: Decimal,
    pub source: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<rent_ledger_entry::Model> for RentLedgerEntryResponse {
    fn from(model: rent_ledger_entry::Model) -> Self {
        Self {
            id: model.id,
            period: model.period,
            currency: model.currency,
            sinking_fund_idr: model.sinking_fund_idr,
            service_charge_idr: model.service_charge_idr,
            ppn_service_charge_idr: model.ppn_service_charge_idr,
            electric_usage_idr: model.electric_usage_idr,
            electric_ppn_idr: model.electric_ppn_idr,
            electric_area_bersama_idr: model.electric_area_bersama_idr,
            electric_pju_idr: model.electric_pju_idr,
            electric_kwh: model.electric_kwh,
            electric_tarif_per_kwh: model.electric_tarif_per_kwh,
            water_usage_potable_idr: model.water_usage_potable_idr,
            water_non_potable_idr: model.water_non_potable_idr,
            water_air_limbah_idr: model.water_air_limbah_idr,
            water_ppn_air_limbah_idr: model.water_ppn_air_limbah_idr,
            water_pemeliharaan_idr: model.water_pemeliharaan_idr,
            water_area_bersama_idr: model.water_area_bersama_idr,
            water_m3: model.water_m3,
            water_tarif_per_m3: model.water_tarif_per_m3,
            fitout_idr: model.fitout_idr,
            service_charge_total_idr: model.service_charge_total_idr,
            electric_total_idr: model.electric_total_idr,
            water_total_idr: model.water_total_idr,
            total_idr: model.total_idr,
            source: model.source,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Query parameters for listing rent ledger entries
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct RentLedgerListQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    /// Filter by exact billing period (YYYY-MM)
    pub period: Option<String>,
}

/// The ledger entry as raw calculator lines; the override flags come out
/// of `infer_override` so the stored usage cost is preserved whenever it
/// does not reproduce from the meter pair.
fn lines_from_request(request: &UpsertRentLedgerRequest) -> LedgerLines {
    LedgerLines {
        sinking_fund: request.sinking_fund_idr,
        service_charge: request.service_charge_idr,
        ppn_service_charge: request.ppn_service_charge_idr,
        electric_usage: Some(request.electric_usage_idr),
        electric_ppn: request.electric_ppn_idr,
        electric_area_bersama: request.electric_area_bersama_idr,
        electric_pju: request.electric_pju_idr,
        electric_kwh: request.electric_kwh,
        electric_tarif_per_kwh: request.electric_tarif_per_kwh,
        electric_override: infer_override(
            request.electric_usage_idr,
            request.electric_kwh,
            request.electric_tarif_per_kwh,
        ),
        water_usage_potable: Some(request.water_usage_potable_idr),
        water_non_potable: request.water_non_potable_idr,
        water_air_limbah: request.water_air_limbah_idr,
        water_ppn_air_limbah: request.water_ppn_air_limbah_idr,
        water_pemeliharaan: request.water_pemeliharaan_idr,
        water_area_bersama: request.water_area_bersama_idr,
        water_m3: request.water_m3,
        water_tarif_per_m3: request.water_tarif_per_m3,
        water_override: infer_override(
            request.water_usage_potable_idr,
            request.water_m3,
            request.water_tarif_per_m3,
        ),
        fitout: request.fitout_idr,
    }
}

fn validation_error_response(issues: &[FieldIssue]) -> ErrorResponse {
    // A malformed period gets its own code; everything else is a plain
    // field validation failure.
    let code = if issues.iter().any(|issue| issue.field == "period") {
        "INVALID_PERIOD"
    } else {
        "VALIDATION_ERROR"
    };
    let error = issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect::<Vec<_>>()
        .join("; ");
    ErrorResponse {
        error,
        code: code.to_string(),
        success: false,
    }
}

/// List rent ledger entries, newest period first
#[utoipa::path(
    get,
    path = "/api/v1/rent-ledger",
    tag = "rent-ledger",
    params(RentLedgerListQuery),
    responses(
        (status = 200, description = "Rent ledger entries retrieved successfully", body = ApiResponse<Vec<RentLedgerEntryResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn list_rent_ledger_entries(
    Valid(Query(query)): Valid<Query<RentLedgerListQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RentLedgerEntryResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering list_rent_ledger_entries function");

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);

    debug!("Fetching rent ledger entries - page: {}, limit: {}", page, limit);

    let mut query_builder = rent_ledger_entry::Entity::find();
    if let Some(period) = &query.period {
        query_builder = query_builder.filter(rent_ledger_entry::Column::Period.eq(period));
    }

    match query_builder.all(&state.db).await {
        Ok(mut entries) => {
            // Newest-first by the period sort key; the sort is stable so
            // equal keys keep their database order.
            entries.sort_by_key(|entry| std::cmp::Reverse(sort_key(&entry.period)));

            let response_data: Vec<RentLedgerEntryResponse> = entries
                .into_iter()
                .skip(((page - 1) * limit) as usize)
                .take(limit as usize)
                .map(RentLedgerEntryResponse::from)
                .collect();

            info!("Successfully retrieved {} rent ledger entries", response_data.len());
            let response = ApiResponse {
                data: response_data,
                message: "Rent ledger entries retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => {
            error!("Failed to retrieve rent ledger entries: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve rent ledger entries".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get the most recent rent ledger entry
///
/// This is the copy-forward source when a new period is created from the
/// previous one.
#[utoipa::path(
    get,
    path = "/api/v1/rent-ledger/latest",
    tag = "rent-ledger",
    responses(
        (status = 200, description = "Latest rent ledger entry retrieved successfully", body = ApiResponse<RentLedgerEntryResponse>),
        (status = 404, description = "The ledger is empty", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_latest_rent_ledger_entry(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RentLedgerEntryResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_latest_rent_ledger_entry function");

    match rent_ledger_entry::Entity::find().all(&state.db).await {
        Ok(entries) => {
            match entries.into_iter().max_by_key(|entry| sort_key(&entry.period)) {
                Some(latest) => {
                    debug!("Latest rent ledger entry is period {}", latest.period);
                    let response = ApiResponse {
                        data: RentLedgerEntryResponse::from(latest),
                        message: "Latest rent ledger entry retrieved successfully".to_string(),
                        success: true,
                    };
                    Ok(Json(response))
                }
                None => {
                    warn!("Latest rent ledger entry requested but the ledger is empty");
                    Err((
                        StatusCode::NOT_FOUND,
                        Json(ErrorResponse {
                            error: "The rent ledger has no entries".to_string(),
                            code: "NOT_FOUND".to_string(),
                            success: false,
                        }),
                    ))
                }
            }
        }
        Err(e) => {
            error!("Failed to retrieve latest rent ledger entry: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve latest rent ledger entry".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get the rent ledger entry for a specific period
#[utoipa::path(
    get,
    path = "/api/v1/rent-ledger/{period}",
    tag = "rent-ledger",
    params(
        ("period" = String, Path, description = "Billing period (YYYY-MM)"),
    ),
    responses(
        (status = 200, description = "Rent ledger entry retrieved successfully", body = ApiResponse<RentLedgerEntryResponse>),
        (status = 404, description = "Rent ledger entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_rent_ledger_entry(
    Path(period): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RentLedgerEntryResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_rent_ledger_entry function");
    debug!("Retrieving rent ledger entry for period: {}", period);

    match rent_ledger_entry::Entity::find()
        .filter(rent_ledger_entry::Column::Period.eq(&period))
        .one(&state.db)
        .await
    {
        Ok(Some(entry)) => {
            debug!("Rent ledger entry for period {} found", period);
            let response = ApiResponse {
                data: RentLedgerEntryResponse::from(entry),
                message: "Rent ledger entry retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Rent ledger entry for period {} not found", period);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Rent ledger entry for period {} not found", period),
                    code: "NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to retrieve rent ledger entry for period {}: {}", period, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve rent ledger entry".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Upsert the rent ledger entry for a period
///
/// Idempotent write keyed by the period. Every money field is rounded to
/// a whole IDR and all four totals are recomputed from the components
/// before the row is stored; totals sent by a client are never trusted.
#[utoipa::path(
    put,
    path = "/api/v1/rent-ledger/{period}",
    tag = "rent-ledger",
    params(
        ("period" = String, Path, description = "Billing period (YYYY-MM)"),
    ),
    request_body = UpsertRentLedgerRequest,
    responses(
        (status = 200, description = "Rent ledger entry updated successfully", body = ApiResponse<RentLedgerEntryResponse>),
        (status = 201, description = "Rent ledger entry created successfully", body = ApiResponse<RentLedgerEntryResponse>),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn upsert_rent_ledger_entry(
    Path(period): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpsertRentLedgerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RentLedgerEntryResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering upsert_rent_ledger_entry function");
    debug!("Upserting rent ledger entry for period: {}", period);

    if request.period != period {
        warn!(
            "Body period {} does not match path period {}",
            request.period, period
        );
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!(
                    "period: body period {} does not match path period {}",
                    request.period, period
                ),
                code: "VALIDATION_ERROR".to_string(),
                success: false,
            }),
        ));
    }

    if request.currency != LEDGER_CURRENCY {
        warn!("Rejecting upsert with currency {}", request.currency);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("currency: the ledger is {}-only", LEDGER_CURRENCY),
                code: "VALIDATION_ERROR".to_string(),
                success: false,
            }),
        ));
    }

    let lines = lines_from_request(&request);
    let issues = validate(&lines, &period);
    if !issues.is_empty() {
        warn!(
            "Rejecting rent ledger upsert for period {}: {} field issue(s)",
            period,
            issues.len()
        );
        return Err((StatusCode::BAD_REQUEST, Json(validation_error_response(&issues))));
    }

    let totals = compute_totals(&lines);

    trace!("Querying existing rent ledger entry for period {}", period);
    let existing = match rent_ledger_entry::Entity::find()
        .filter(rent_ledger_entry::Column::Period.eq(&period))
        .one(&state.db)
        .await
    {
        Ok(existing) => existing,
        Err(e) => {
            error!("Failed to query rent ledger entry for period {}: {}", period, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to query rent ledger entry".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let now = Utc::now().naive_utc();
    let created = existing.is_none();
    let mut entry = match existing {
        Some(model) => {
            debug!("Updating existing rent ledger entry for period {}", period);
            let active: rent_ledger_entry::ActiveModel = model.into();
            active
        }
        None => {
            debug!("Creating new rent ledger entry for period {}", period);
            rent_ledger_entry::ActiveModel {
                period: Set(period.clone()),
                created_at: Set(now),
                ..Default::default()
            }
        }
    };

    entry.currency = Set(request.currency);
    entry.sinking_fund_idr = Set(round_idr(lines.sinking_fund));
    entry.service_charge_idr = Set(round_idr(lines.service_charge));
    entry.ppn_service_charge_idr = Set(round_idr(lines.ppn_service_charge));
    entry.electric_usage_idr = Set(totals.electric_usage);
    entry.electric_ppn_idr = Set(round_idr(lines.electric_ppn));
    entry.electric_area_bersama_idr = Set(round_idr(lines.electric_area_bersama));
    entry.electric_pju_idr = Set(round_idr(lines.electric_pju));
    entry.electric_kwh = Set(lines.electric_kwh);
    entry.electric_tarif_per_kwh = Set(lines.electric_tarif_per_kwh);
    entry.water_usage_potable_idr = Set(totals.water_usage);
    entry.water_non_potable_idr = Set(round_idr(lines.water_non_potable));
    entry.water_air_limbah_idr = Set(round_idr(lines.water_air_limbah));
    entry.water_ppn_air_limbah_idr = Set(round_idr(lines.water_ppn_air_limbah));
    entry.water_pemeliharaan_idr = Set(round_idr(lines.water_pemeliharaan));
    entry.water_area_bersama_idr = Set(round_idr(lines.water_area_bersama));
    entry.water_m3 = Set(lines.water_m3);
    entry.water_tarif_per_m3 = Set(lines.water_tarif_per_m3);
    entry.fitout_idr = Set(round_idr(lines.fitout));
    entry.service_charge_total_idr = Set(totals.service_charge_total);
    entry.electric_total_idr = Set(totals.electric_total);
    entry.water_total_idr = Set(totals.water_total);
    entry.total_idr = Set(totals.total);
    entry.source = Set("manual".to_string());
    entry.updated_at = Set(now);

    let saved = if created {
        entry.insert(&state.db).await
    } else {
        entry.update(&state.db).await
    };

    match saved {
        Ok(model) => {
            // Stored totals changed; cached series must not diverge.
            state.cache.invalidate_all();

            let (status, message) = if created {
                info!(
                    "Rent ledger entry for period {} created, grand total {}",
                    period,
                    format_idr(totals.total)
                );
                (StatusCode::CREATED, "Rent ledger entry created successfully")
            } else {
                info!(
                    "Rent ledger entry for period {} updated, grand total {}",
                    period,
                    format_idr(totals.total)
                );
                (StatusCode::OK, "Rent ledger entry updated successfully")
            };
            let response = ApiResponse {
                data: RentLedgerEntryResponse::from(model),
                message: message.to_string(),
                success: true,
            };
            Ok((status, Json(response)))
        }
        Err(e) => {
            error!("Failed to upsert rent ledger entry for period {}: {}", period, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to upsert rent ledger entry".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Delete the rent ledger entry for a period
#[utoipa::path(
    delete,
    path = "/api/v1/rent-ledger/{period}",
    tag = "rent-ledger",
    params(
        ("period" = String, Path, description = "Billing period (YYYY-MM)"),
    ),
    responses(
        (status = 200, description = "Rent ledger entry deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Rent ledger entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_rent_ledger_entry(
    Path(period): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering delete_rent_ledger_entry function");
    debug!("Deleting rent ledger entry for period: {}", period);

    // An entry must exist to be deleted
    trace!("Querying existing rent ledger entry from database");
    let existing = match rent_ledger_entry::Entity::find()
        .filter(rent_ledger_entry::Column::Period.eq(&period))
        .one(&state.db)
        .await
    {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            warn!("Rent ledger entry for period {} not found", period);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Rent ledger entry for period {} not found", period),
                    code: "NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(e) => {
            error!("Failed to retrieve rent ledger entry for period {}: {}", period, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve rent ledger entry".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    trace!("Attempting to delete rent ledger entry from database");
    match existing.delete(&state.db).await {
        Ok(_) => {
            state.cache.invalidate_all();

            info!("Rent ledger entry for period {} deleted successfully", period);
            let response = ApiResponse {
                data: format!("Rent ledger entry for period {} deleted successfully", period),
                message: "Rent ledger entry deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => {
            error!("Failed to delete rent ledger entry for period {}: {}", period, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete rent ledger entry".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
