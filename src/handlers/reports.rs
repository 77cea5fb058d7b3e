use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use common::{LedgerBreakdown, TrendSeries};
use compute::period::Granularity;
use compute::trends::{breakdown, trend_series, LedgerCategory, TrendView};
use model::entities::rent_ledger_entry;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;
use tracing::{debug, error, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};

use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse};

/// Query parameters for the trend series endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct TrendsQuery {
    /// Bucket granularity: monthly, quarterly, semester or yearly (default: yearly)
    pub granularity: Option<String>,
    /// Value summed per bucket: cost, electricity_usage or water_usage (default: cost)
    pub view: Option<String>,
    /// Comma-separated category filter for the cost view
    pub categories: Option<String>,
}

/// Query parameters for the category breakdown endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct BreakdownQuery {
    /// Restrict the breakdown to one billing period (YYYY-MM)
    pub period: Option<String>,
    /// Restrict the result to a single category
    pub category: Option<String>,
}

fn bad_request(error: String) -> (StatusCode, Json<ErrorResponse>) {
    warn!("Rejecting report query: {}", error);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error,
            code: "VALIDATION_ERROR".to_string(),
            success: false,
        }),
    )
}

fn database_error(context: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: context.to_string(),
            code: "DATABASE_ERROR".to_string(),
            success: false,
        }),
    )
}

/// Get the spending/usage trend series
///
/// Entries are bucketed at the requested granularity and summed under the
/// requested view; buckets come back newest-first.
#[utoipa::path(
    get,
    path = "/api/v1/rent-ledger/trends",
    tag = "reports",
    params(TrendsQuery),
    responses(
        (status = 200, description = "Trend series retrieved successfully", body = ApiResponse<TrendSeries>),
        (status = 400, description = "Invalid granularity, view or category", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_rent_ledger_trends(
    Query(query): Query<TrendsQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TrendSeries>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_rent_ledger_trends function");

    let granularity: Granularity = match &query.granularity {
        Some(raw) => raw.parse().map_err(bad_request)?,
        None => Granularity::default(),
    };
    let view: TrendView = match &query.view {
        Some(raw) => raw.parse().map_err(bad_request)?,
        None => TrendView::default(),
    };
    let mut categories: Vec<LedgerCategory> = Vec::new();
    if let Some(raw) = &query.categories {
        for part in raw.split(',').filter(|part| !part.is_empty()) {
            categories.push(part.parse().map_err(bad_request)?);
        }
    }

    // Check cache first
    let cache_key = format!("trends_{:?}", query);
    if let Some(CachedData::Trends(series)) = state.cache.get(&cache_key).await {
        let response = ApiResponse {
            data: series,
            message: "Trend series retrieved from cache".to_string(),
            success: true,
        };
        return Ok(Json(response));
    }

    let entries = match rent_ledger_entry::Entity::find().all(&state.db).await {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to load rent ledger entries for trends: {}", e);
            return Err(database_error("Failed to compute trend series"));
        }
    };
    debug!("Computing trend series over {} entries", entries.len());

    let series = TrendSeries {
        granularity: granularity.to_string(),
        view: view.to_string(),
        trends: trend_series(&entries, granularity, view, &categories),
    };

    // Cache the result
    state
        .cache
        .insert(cache_key, CachedData::Trends(series.clone()))
        .await;

    let response = ApiResponse {
        data: series,
        message: "Trend series retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get the per-category cost breakdown
#[utoipa::path(
    get,
    path = "/api/v1/rent-ledger/breakdown",
    tag = "reports",
    params(BreakdownQuery),
    responses(
        (status = 200, description = "Breakdown retrieved successfully", body = ApiResponse<LedgerBreakdown>),
        (status = 400, description = "Invalid category", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_rent_ledger_breakdown(
    Query(query): Query<BreakdownQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LedgerBreakdown>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_rent_ledger_breakdown function");

    let category: Option<LedgerCategory> = match &query.category {
        Some(raw) => Some(raw.parse().map_err(bad_request)?),
        None => None,
    };

    // Check cache first
    let cache_key = format!("breakdown_{:?}", query);
    if let Some(CachedData::Breakdown(result)) = state.cache.get(&cache_key).await {
        let response = ApiResponse {
            data: result,
            message: "Breakdown retrieved from cache".to_string(),
            success: true,
        };
        return Ok(Json(response));
    }

    let mut query_builder = rent_ledger_entry::Entity::find();
    if let Some(period) = &query.period {
        query_builder = query_builder.filter(rent_ledger_entry::Column::Period.eq(period));
    }
    let entries = match query_builder.all(&state.db).await {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to load rent ledger entries for breakdown: {}", e);
            return Err(database_error("Failed to compute breakdown"));
        }
    };
    debug!("Computing breakdown over {} entries", entries.len());

    let mut items = breakdown(&entries);
    if let Some(category) = category {
        items.retain(|item| item.category == category.to_string());
    }

    let result = LedgerBreakdown {
        period: query.period.clone(),
        breakdown: items,
    };

    // Cache the result
    state
        .cache
        .insert(cache_key, CachedData::Breakdown(result.clone()))
        .await;

    let response = ApiResponse {
        data: result,
        message: "Breakdown retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
