use crate::handlers::{
    health::health_check,
    rent_ledger::{
        delete_rent_ledger_entry, get_latest_rent_ledger_entry, get_rent_ledger_entry,
        list_rent_ledger_entries, upsert_rent_ledger_entry,
    },
    reports::{get_rent_ledger_breakdown, get_rent_ledger_trends},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Rent ledger routes; the static segments must be registered
        // before the :period capture
        .route("/api/v1/rent-ledger", get(list_rent_ledger_entries))
        .route("/api/v1/rent-ledger/latest", get(get_latest_rent_ledger_entry))
        .route("/api/v1/rent-ledger/trends", get(get_rent_ledger_trends))
        .route("/api/v1/rent-ledger/breakdown", get(get_rent_ledger_breakdown))
        .route("/api/v1/rent-ledger/:period", get(get_rent_ledger_entry))
        .route("/api/v1/rent-ledger/:period", put(upsert_rent_ledger_entry))
        .route("/api/v1/rent-ledger/:period", delete(delete_rent_ledger_entry))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
