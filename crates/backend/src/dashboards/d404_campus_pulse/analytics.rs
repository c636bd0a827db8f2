use chrono::Timelike;
use contracts::dashboards::d404_campus_pulse::{Insight, InsightKind, TrendAnalysis};
use std::collections::BTreeMap;

use super::repository::SurveyRecord;
use super::service::{group_scores, mean, round2, time_of_day};

/// Monthly average score in calendar order
pub fn trend_analysis(records: &[&SurveyRecord]) -> TrendAnalysis {
    let months = group_scores(records, |r| r.timestamp.format("%Y-%m").to_string());

    let mut trend = TrendAnalysis::default();
    for (month, scores) in months {
        trend.labels.push(month);
        trend.scores.push(round2(mean(&scores)));
    }
    trend
}

/// Best and worst facility, year-over-year direction and best time of day
pub fn insights(records: &[&SurveyRecord]) -> Vec<Insight> {
    let facilities = averages(records, |r| r.facility_rated.clone());
    let (Some(best), Some(worst)) = (highest(&facilities), lowest(&facilities)) else {
        return Vec::new();
    };

    let mut insights = vec![
        Insight {
            kind: InsightKind::Performance,
            title: "Best Performing Facility".to_string(),
            description: format!("{} has the highest average satisfaction score", best.0),
            value: round2(best.1),
            recommendation: format!("Replicate best practices from {}", best.0),
        },
        Insight {
            kind: InsightKind::Improvement,
            title: "Priority Improvement".to_string(),
            description: format!("{} needs immediate attention", worst.0),
            value: round2(worst.1),
            recommendation: format!("Focus improvement efforts on {}", worst.0),
        },
    ];

    let years = averages(records, |r| r.academic_year.clone());
    if let (Some(first), Some(last)) = (years.values().next(), years.values().next_back()) {
        if years.len() > 1 {
            let increasing = last > first;
            insights.push(Insight {
                kind: InsightKind::Trend,
                title: "Satisfaction Trend".to_string(),
                description: format!(
                    "Overall satisfaction is {} over the years",
                    if increasing { "increasing" } else { "decreasing" }
                ),
                value: round2(*last),
                recommendation: if increasing {
                    "Continue current initiatives".to_string()
                } else {
                    "Review current strategies".to_string()
                },
            });
        }
    }

    let periods = averages(records, |r| time_of_day(r.timestamp.hour()).to_string());
    if let Some((period, score)) = highest(&periods) {
        insights.push(Insight {
            kind: InsightKind::Time,
            title: "Best Time Period".to_string(),
            description: format!("Highest satisfaction during {}", period),
            value: round2(score),
            recommendation: format!("Schedule important activities during {}", period),
        });
    }

    insights
}

fn averages<F>(records: &[&SurveyRecord], key: F) -> BTreeMap<String, f64>
where
    F: Fn(&SurveyRecord) -> String,
{
    group_scores(records, key)
        .into_iter()
        .map(|(name, scores)| (name, mean(&scores)))
        .collect()
}

/// First entry with the highest average
fn highest(averages: &BTreeMap<String, f64>) -> Option<(&str, f64)> {
    pick(averages, |candidate, current| candidate > current)
}

/// First entry with the lowest average
fn lowest(averages: &BTreeMap<String, f64>) -> Option<(&str, f64)> {
    pick(averages, |candidate, current| candidate < current)
}

fn pick<F>(averages: &BTreeMap<String, f64>, better: F) -> Option<(&str, f64)>
where
    F: Fn(f64, f64) -> bool,
{
    averages
        .iter()
        .fold(None, |picked: Option<(&str, f64)>, (name, &avg)| match picked {
            Some((_, current)) if !better(avg, current) => picked,
            _ => Some((name.as_str(), avg)),
        })
}
