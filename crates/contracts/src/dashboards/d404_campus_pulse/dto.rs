use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One survey row as sent over the wire; field order is preserved
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Ordered sequence of records sharing the field set of the first one
pub type Dataset = Vec<Record>;

/// Filters of the Campus Pulse dashboard.
///
/// Every field is optional; a blank string is treated the same as an absent
/// filter. `score_range` is expected in `min-max` form (e.g. `"2-4"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredDataQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_range: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl FilteredDataQuery {
    pub fn facility(&self) -> Option<&str> {
        non_blank(&self.facility)
    }

    pub fn year(&self) -> Option<&str> {
        non_blank(&self.year)
    }

    pub fn major(&self) -> Option<&str> {
        non_blank(&self.major)
    }

    /// Inclusive score bounds, `None` when the range is absent or malformed
    pub fn score_bounds(&self) -> Option<(i64, i64)> {
        let raw = non_blank(&self.score_range)?;
        let (min, max) = raw.split_once('-')?;
        let min = min.trim().parse().ok()?;
        let max = max.trim().parse().ok()?;
        Some((min, max))
    }

    pub fn is_empty(&self) -> bool {
        self.facility().is_none()
            && self.year().is_none()
            && self.major().is_none()
            && non_blank(&self.score_range).is_none()
    }

    /// Copy with blank filters dropped, so they are not sent as `facility=`
    pub fn normalized(&self) -> Self {
        Self {
            facility: self.facility().map(str::to_string),
            year: self.year().map(str::to_string),
            major: self.major().map(str::to_string),
            score_range: non_blank(&self.score_range).map(str::to_string),
        }
    }
}

/// Response of `GET /api/d404/filtered-data`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteredDataResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Dataset,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub filters_applied: FilteredDataQuery,
}

/// Generic `{ success, data, count }` envelope used by the other d404 endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
        }
    }

    pub fn with_count(data: T, count: usize) -> Self {
        Self {
            success: true,
            data,
            count: Some(count),
        }
    }
}

/// Aggregated satisfaction metrics for the current filter selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallMetrics {
    pub total_ratings: usize,
    pub average_score: f64,
    pub median_score: f64,
    pub std_deviation: f64,
    /// Score ("1".."5") -> number of ratings
    pub score_distribution: BTreeMap<String, usize>,
    /// "Low" / "Medium" / "High" -> number of ratings
    pub category_distribution: BTreeMap<String, usize>,
    pub date_range: DateRange,
    /// Number of distinct facilities in the selection
    #[serde(default)]
    pub facilities_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Per-facility statistics, ranked by average score (1 = best)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityMetrics {
    pub facility: String,
    pub total_ratings: usize,
    pub average_score: f64,
    pub std_deviation: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub rank: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearMetrics {
    pub academic_year: String,
    pub total_ratings: usize,
    pub average_score: f64,
    pub std_deviation: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MajorMetrics {
    pub major: String,
    pub total_ratings: usize,
    pub average_score: f64,
    pub std_deviation: f64,
}

/// Ratings of one time-of-day bucket (Morning / Afternoon / Evening / Night)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeMetrics {
    pub total_ratings: usize,
    pub average_score: f64,
}

/// Monthly average score, `labels` are `YYYY-MM`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Performance,
    Improvement,
    Trend,
    Time,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub value: f64,
    pub recommendation: String,
}

/// Response data of `GET /api/d404/filtered-dashboard-summary`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub overall: OverallMetrics,
    #[serde(default)]
    pub facilities: Vec<FacilityMetrics>,
    #[serde(default)]
    pub years: Vec<YearMetrics>,
    /// At most ten majors, most rated first
    #[serde(default)]
    pub majors: Vec<MajorMetrics>,
    #[serde(default)]
    pub time_analysis: BTreeMap<String, TimeMetrics>,
    #[serde(default)]
    pub trends: TrendAnalysis,
    #[serde(default)]
    pub insights: Vec<Insight>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_with_range(range: &str) -> FilteredDataQuery {
        FilteredDataQuery {
            score_range: Some(range.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_score_bounds() {
        assert_eq!(query_with_range("2-4").score_bounds(), Some((2, 4)));
        assert_eq!(query_with_range(" 1 - 5 ").score_bounds(), Some((1, 5)));
        assert_eq!(query_with_range("high").score_bounds(), None);
        assert_eq!(query_with_range("1-2-3").score_bounds(), None);
        assert_eq!(query_with_range("").score_bounds(), None);
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let query = FilteredDataQuery {
            facility: Some("  ".to_string()),
            year: Some(String::new()),
            major: None,
            score_range: None,
        };
        assert!(query.is_empty());
        assert_eq!(query.normalized(), FilteredDataQuery::default());
    }

    #[test]
    fn test_query_skips_absent_fields() {
        let query = FilteredDataQuery {
            facility: Some("Library".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&query).unwrap();
        assert_eq!(json, r#"{"facility":"Library"}"#);
    }

    #[test]
    fn test_rejected_response_without_data() {
        let response: FilteredDataResponse =
            serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!response.success);
        assert!(response.data.is_empty());
    }

    #[test]
    fn test_record_keeps_field_order() {
        let response: FilteredDataResponse = serde_json::from_str(
            r#"{"success": true, "data": [{"zeta": 1, "alpha": "x", "mid": null}], "count": 1}"#,
        )
        .unwrap();
        let keys: Vec<&str> = response.data[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_insight_kind_is_serialized_as_type() {
        let insight = Insight {
            kind: InsightKind::Improvement,
            title: "Priority Improvement".to_string(),
            description: "Lab needs immediate attention".to_string(),
            value: 2.1,
            recommendation: "Focus improvement efforts on Lab".to_string(),
        };
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "improvement");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_summary_with_only_overall_metrics() {
        let summary: DashboardSummary = serde_json::from_str(
            r#"{"overall": {"total_ratings": 0, "average_score": 0.0, "median_score": 0.0,
                "std_deviation": 0.0, "score_distribution": {}, "category_distribution": {},
                "date_range": {"start": null, "end": null}}}"#,
        )
        .unwrap();
        assert_eq!(summary, DashboardSummary::default());
    }
}
