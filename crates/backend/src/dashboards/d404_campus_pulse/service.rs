use anyhow::Result;
use chrono::Timelike;
use contracts::dashboards::d404_campus_pulse::{
    DashboardSummary, Dataset, DateRange, FacilityMetrics, FilteredDataQuery, MajorMetrics,
    OverallMetrics, TimeMetrics, YearMetrics,
};
use std::collections::{BTreeMap, BTreeSet};

use super::analytics;
use super::repository::{self, format_timestamp, SurveyRecord};

/// Majors listed in the summary
const TOP_MAJORS: usize = 10;

/// Selections up to this size take trends and insights from the whole survey
const MIN_ROWS_FOR_OWN_ANALYTICS: usize = 10;

/// Filtered survey rows in wire form
pub fn get_filtered_data(query: &FilteredDataQuery) -> Result<Dataset> {
    let records = repository::all()?;
    Ok(apply_filters(records, query)
        .into_iter()
        .map(SurveyRecord::to_record)
        .collect())
}

/// Metrics over the filtered survey rows
pub fn get_overall_metrics(query: &FilteredDataQuery) -> Result<OverallMetrics> {
    let records = repository::all()?;
    Ok(calculate_overall_metrics(&apply_filters(records, query)))
}

/// Full dashboard summary for the filtered survey rows
pub fn get_dashboard_summary(query: &FilteredDataQuery) -> Result<DashboardSummary> {
    let records = repository::all()?;
    Ok(build_summary(records, &apply_filters(records, query)))
}

pub fn build_summary(all: &[SurveyRecord], selected: &[&SurveyRecord]) -> DashboardSummary {
    if selected.is_empty() {
        return DashboardSummary::default();
    }

    let (trends, insights) = if selected.len() > MIN_ROWS_FOR_OWN_ANALYTICS {
        (
            analytics::trend_analysis(selected),
            analytics::insights(selected),
        )
    } else {
        let everything: Vec<&SurveyRecord> = all.iter().collect();
        (
            analytics::trend_analysis(&everything),
            analytics::insights(&everything),
        )
    };

    DashboardSummary {
        overall: calculate_overall_metrics(selected),
        facilities: calculate_facility_metrics(selected),
        years: calculate_year_metrics(selected),
        majors: calculate_major_metrics(selected),
        time_analysis: calculate_time_metrics(selected),
        trends,
        insights,
    }
}

pub fn get_facilities() -> Result<Vec<String>> {
    Ok(distinct(repository::all()?, |r| &r.facility_rated))
}

pub fn get_years() -> Result<Vec<String>> {
    Ok(distinct(repository::all()?, |r| &r.academic_year))
}

pub fn get_majors() -> Result<Vec<String>> {
    Ok(distinct(repository::all()?, |r| &r.major))
}

/// Case-insensitive match on facility/year/major, inclusive score range.
/// A malformed score range is ignored.
pub fn apply_filters<'a>(
    records: &'a [SurveyRecord],
    query: &FilteredDataQuery,
) -> Vec<&'a SurveyRecord> {
    let facility = query.facility().map(str::to_lowercase);
    let year = query.year().map(str::to_lowercase);
    let major = query.major().map(str::to_lowercase);
    let bounds = query.score_bounds();

    let matches = |wanted: &Option<String>, actual: &str| {
        wanted
            .as_deref()
            .map_or(true, |wanted| actual.to_lowercase() == wanted)
    };

    records
        .iter()
        .filter(|r| matches(&facility, &r.facility_rated))
        .filter(|r| matches(&year, &r.academic_year))
        .filter(|r| matches(&major, &r.major))
        .filter(|r| {
            bounds.map_or(true, |(min, max)| {
                r.satisfaction_score >= min && r.satisfaction_score <= max
            })
        })
        .collect()
}

pub fn calculate_overall_metrics(records: &[&SurveyRecord]) -> OverallMetrics {
    if records.is_empty() {
        return OverallMetrics::default();
    }

    let mut scores: Vec<f64> = records
        .iter()
        .map(|r| r.satisfaction_score as f64)
        .collect();
    scores.sort_by(|a, b| a.total_cmp(b));

    let mut score_distribution = BTreeMap::new();
    let mut category_distribution = BTreeMap::new();
    for record in records {
        *score_distribution
            .entry(record.satisfaction_score.to_string())
            .or_insert(0) += 1;
        *category_distribution
            .entry(record.category().to_string())
            .or_insert(0) += 1;
    }

    let start = records.iter().map(|r| r.timestamp).min();
    let end = records.iter().map(|r| r.timestamp).max();
    let facilities_count = records
        .iter()
        .map(|r| r.facility_rated.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    OverallMetrics {
        total_ratings: records.len(),
        average_score: round2(mean(&scores)),
        median_score: round2(median(&scores)),
        std_deviation: round2(sample_std(&scores)),
        score_distribution,
        category_distribution,
        date_range: DateRange {
            start: start.as_ref().map(format_timestamp),
            end: end.as_ref().map(format_timestamp),
        },
        facilities_count,
    }
}

/// Facilities ranked by average score, best first. Ties keep name order.
pub fn calculate_facility_metrics(records: &[&SurveyRecord]) -> Vec<FacilityMetrics> {
    let mut facilities: Vec<FacilityMetrics> = group_scores(records, |r| r.facility_rated.clone())
        .into_iter()
        .map(|(facility, scores)| FacilityMetrics {
            facility,
            total_ratings: scores.len(),
            average_score: round2(mean(&scores)),
            std_deviation: round2(sample_std(&scores)),
            min_score: scores.iter().copied().fold(f64::INFINITY, f64::min),
            max_score: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            rank: 0,
        })
        .collect();

    facilities.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    for (i, facility) in facilities.iter_mut().enumerate() {
        facility.rank = i + 1;
    }
    facilities
}

/// Academic years in name order
pub fn calculate_year_metrics(records: &[&SurveyRecord]) -> Vec<YearMetrics> {
    group_scores(records, |r| r.academic_year.clone())
        .into_iter()
        .map(|(academic_year, scores)| YearMetrics {
            academic_year,
            total_ratings: scores.len(),
            average_score: round2(mean(&scores)),
            std_deviation: round2(sample_std(&scores)),
        })
        .collect()
}

/// Most rated majors first, at most [`TOP_MAJORS`]
pub fn calculate_major_metrics(records: &[&SurveyRecord]) -> Vec<MajorMetrics> {
    let mut majors: Vec<MajorMetrics> = group_scores(records, |r| r.major.clone())
        .into_iter()
        .map(|(major, scores)| MajorMetrics {
            major,
            total_ratings: scores.len(),
            average_score: round2(mean(&scores)),
            std_deviation: round2(sample_std(&scores)),
        })
        .collect();

    majors.sort_by(|a, b| b.total_ratings.cmp(&a.total_ratings));
    majors.truncate(TOP_MAJORS);
    majors
}

pub fn calculate_time_metrics(records: &[&SurveyRecord]) -> BTreeMap<String, TimeMetrics> {
    group_scores(records, |r| time_of_day(r.timestamp.hour()).to_string())
        .into_iter()
        .map(|(period, scores)| {
            let metrics = TimeMetrics {
                total_ratings: scores.len(),
                average_score: round2(mean(&scores)),
            };
            (period, metrics)
        })
        .collect()
}

/// Morning 5-11, Afternoon 12-16, Evening 17-21, Night otherwise
pub fn time_of_day(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Morning",
        12..=16 => "Afternoon",
        17..=21 => "Evening",
        _ => "Night",
    }
}

/// Scores grouped by `key`, groups in key order
pub(super) fn group_scores<K, F>(records: &[&SurveyRecord], key: F) -> BTreeMap<K, Vec<f64>>
where
    K: Ord,
    F: Fn(&SurveyRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for &record in records {
        groups
            .entry(key(record))
            .or_default()
            .push(record.satisfaction_score as f64);
    }
    groups
}

fn distinct<F>(records: &[SurveyRecord], field: F) -> Vec<String>
where
    F: Fn(&SurveyRecord) -> &String,
{
    records
        .iter()
        .map(|r| field(r).clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub(super) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// `values` must be sorted
fn median(values: &[f64]) -> f64 {
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Sample standard deviation (n - 1), 0 for a single value
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

pub(super) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
