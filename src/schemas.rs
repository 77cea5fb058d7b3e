use common::{BreakdownItem, LedgerBreakdown, TrendPoint, TrendSeries, UpsertRentLedgerRequest};
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::handlers::rent_ledger::{RentLedgerEntryResponse, RentLedgerListQuery};
use crate::handlers::reports::{BreakdownQuery, TrendsQuery};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for trend and breakdown responses
    pub cache: Cache<String, CachedData>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Trends(TrendSeries),
    Breakdown(LedgerBreakdown),
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::rent_ledger::list_rent_ledger_entries,
        crate::handlers::rent_ledger::get_latest_rent_ledger_entry,
        crate::handlers::rent_ledger::get_rent_ledger_entry,
        crate::handlers::rent_ledger::upsert_rent_ledger_entry,
        crate::handlers::rent_ledger::delete_rent_ledger_entry,
        crate::handlers::reports::get_rent_ledger_trends,
        crate::handlers::reports::get_rent_ledger_breakdown,
    ),
    components(
        schemas(
            ApiResponse<RentLedgerEntryResponse>,
            ApiResponse<Vec<RentLedgerEntryResponse>>,
            ApiResponse<TrendSeries>,
            ApiResponse<LedgerBreakdown>,
            ApiResponse<String>,
            ErrorResponse,
            HealthResponse,
            RentLedgerEntryResponse,
            RentLedgerListQuery,
            TrendsQuery,
            BreakdownQuery,
            UpsertRentLedgerRequest,
            TrendPoint,
            TrendSeries,
            BreakdownItem,
            LedgerBreakdown,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rent-ledger", description = "Rent ledger entry endpoints"),
        (name = "reports", description = "Trend and breakdown reporting endpoints"),
    ),
    info(
        title = "Rentrust API",
        description = "Rent ledger tracking service - utility billing breakdown, trends and category reports",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
