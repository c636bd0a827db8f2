use axum::{extract::Query, http::StatusCode, Json};
use contracts::dashboards::d404_campus_pulse::{
    ApiResponse, DashboardSummary, FilteredDataQuery, FilteredDataResponse, OverallMetrics,
};

use crate::dashboards::d404_campus_pulse::service;

/// Handler для получения отфильтрованных записей опроса
/// GET /api/d404/filtered-data
pub async fn filtered_data(
    Query(query): Query<FilteredDataQuery>,
) -> Result<Json<FilteredDataResponse>, StatusCode> {
    match service::get_filtered_data(&query) {
        Ok(data) => Ok(Json(FilteredDataResponse {
            success: true,
            count: data.len(),
            data,
            filters_applied: query,
        })),
        Err(e) => {
            tracing::error!("Failed to get filtered data: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handler для получения сводных показателей
/// GET /api/d404/overall-metrics
pub async fn overall_metrics(
    Query(query): Query<FilteredDataQuery>,
) -> Result<Json<ApiResponse<OverallMetrics>>, StatusCode> {
    match service::get_overall_metrics(&query) {
        Ok(metrics) => Ok(Json(ApiResponse::ok(metrics))),
        Err(e) => {
            tracing::error!("Failed to calculate overall metrics: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/d404/filtered-dashboard-summary
///
/// Без фильтров совпадает с `/api/d404/dashboard-summary`
pub async fn filtered_dashboard_summary(
    Query(query): Query<FilteredDataQuery>,
) -> Result<Json<ApiResponse<DashboardSummary>>, StatusCode> {
    summary_response(service::get_dashboard_summary(&query))
}

/// Handler для получения полной сводки дашборда
/// GET /api/d404/dashboard-summary
pub async fn dashboard_summary() -> Result<Json<ApiResponse<DashboardSummary>>, StatusCode> {
    summary_response(service::get_dashboard_summary(&FilteredDataQuery::default()))
}

fn summary_response(
    summary: anyhow::Result<DashboardSummary>,
) -> Result<Json<ApiResponse<DashboardSummary>>, StatusCode> {
    match summary {
        Ok(summary) => Ok(Json(ApiResponse::ok(summary))),
        Err(e) => {
            tracing::error!("Failed to build dashboard summary: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handler для получения списков значений фильтров
/// GET /api/d404/facilities
pub async fn facilities() -> Result<Json<ApiResponse<Vec<String>>>, StatusCode> {
    list_response(service::get_facilities(), "facilities")
}

/// GET /api/d404/years
pub async fn years() -> Result<Json<ApiResponse<Vec<String>>>, StatusCode> {
    list_response(service::get_years(), "years")
}

/// GET /api/d404/majors
pub async fn majors() -> Result<Json<ApiResponse<Vec<String>>>, StatusCode> {
    list_response(service::get_majors(), "majors")
}

fn list_response(
    values: anyhow::Result<Vec<String>>,
    what: &str,
) -> Result<Json<ApiResponse<Vec<String>>>, StatusCode> {
    match values {
        Ok(values) => {
            let count = values.len();
            Ok(Json(ApiResponse::with_count(values, count)))
        }
        Err(e) => {
            tracing::error!("Failed to list {}: {}", what, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
