use axum::{routing::get, Router};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D404 CAMPUS PULSE
        // ========================================
        .route(
            "/api/d404/filtered-data",
            get(handlers::d404_campus_pulse::filtered_data),
        )
        .route(
            "/api/d404/overall-metrics",
            get(handlers::d404_campus_pulse::overall_metrics),
        )
        .route(
            "/api/d404/dashboard-summary",
            get(handlers::d404_campus_pulse::dashboard_summary),
        )
        .route(
            "/api/d404/filtered-dashboard-summary",
            get(handlers::d404_campus_pulse::filtered_dashboard_summary),
        )
        .route(
            "/api/d404/facilities",
            get(handlers::d404_campus_pulse::facilities),
        )
        .route("/api/d404/years", get(handlers::d404_campus_pulse::years))
        .route("/api/d404/majors", get(handlers::d404_campus_pulse::majors))
}
