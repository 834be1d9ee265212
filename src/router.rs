use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::require_staff;
use crate::handlers::{
    dashboard::{dashboard_data, dashboard_page},
    health::health_check,
    session::{login, login_page, logout},
};
use crate::schemas::{ApiDoc, AppState};

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Everything behind the staff gate
    let gated = Router::new()
        .route("/admin/dashboard", get(dashboard_page))
        .route("/api/v1/dashboard", get(dashboard_data))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_staff,
        ));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Login flow
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
        .merge(gated)
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
