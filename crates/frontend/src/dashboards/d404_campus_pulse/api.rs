use crate::shared::api_utils::{api_url, get_json, FetchError};
use async_trait::async_trait;
use contracts::dashboards::d404_campus_pulse::{
    ApiResponse, DashboardSummary, Dataset, FilteredDataQuery, FilteredDataResponse,
};

const API_BASE: &str = "/api/d404";

/// Источник текущего отфильтрованного набора записей
#[async_trait(?Send)]
pub trait DataSource {
    async fn fetch(&self, query: &FilteredDataQuery) -> Result<Dataset, FetchError>;
}

/// [`DataSource`] поверх `GET /api/d404/filtered-data`
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDataSource;

#[async_trait(?Send)]
impl DataSource for HttpDataSource {
    async fn fetch(&self, query: &FilteredDataQuery) -> Result<Dataset, FetchError> {
        get_filtered_data(query).await
    }
}

/// Значения для списков фильтров
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub facilities: Vec<String>,
    pub years: Vec<String>,
    pub majors: Vec<String>,
}

/// Получить отфильтрованный набор записей
pub async fn get_filtered_data(query: &FilteredDataQuery) -> Result<Dataset, FetchError> {
    let url = api_url(&format!("{}/filtered-data", API_BASE), &query.normalized());
    let response: FilteredDataResponse = get_json(&url).await?;
    into_dataset(response)
}

/// Получить полную сводку дашборда для текущих фильтров
pub async fn get_dashboard_summary(
    query: &FilteredDataQuery,
) -> Result<DashboardSummary, FetchError> {
    let url = api_url(
        &format!("{}/filtered-dashboard-summary", API_BASE),
        &query.normalized(),
    );
    let response: ApiResponse<DashboardSummary> = get_json(&url).await?;
    unwrap_envelope(response)
}

/// Получить значения для списков фильтров
pub async fn get_filter_options() -> Result<FilterOptions, FetchError> {
    Ok(FilterOptions {
        facilities: get_values("facilities").await?,
        years: get_values("years").await?,
        majors: get_values("majors").await?,
    })
}

async fn get_values(kind: &str) -> Result<Vec<String>, FetchError> {
    let response: ApiResponse<Vec<String>> =
        get_json(&format!("{}/{}", API_BASE, kind)).await?;
    unwrap_envelope(response)
}

/// `success: false` считается ошибкой даже при статусе 200
pub fn into_dataset(response: FilteredDataResponse) -> Result<Dataset, FetchError> {
    if response.success {
        Ok(response.data)
    } else {
        Err(FetchError::Rejected)
    }
}

fn unwrap_envelope<T>(response: ApiResponse<T>) -> Result<T, FetchError> {
    if response.success {
        Ok(response.data)
    } else {
        Err(FetchError::Rejected)
    }
}
