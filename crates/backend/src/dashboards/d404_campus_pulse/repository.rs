use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use contracts::dashboards::d404_campus_pulse::Record;
use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

static SURVEY: OnceCell<Vec<SurveyRecord>> = OnceCell::new();

const SAMPLE_SIZE: usize = 1000;
const SAMPLE_SEED: u64 = 42;
const SAMPLE_YEARS: [&str; 3] = ["2021-2022", "2022-2023", "2023-2024"];
const SAMPLE_MAJORS: [&str; 5] = [
    "Computer Science",
    "Mechanical",
    "Electrical",
    "Civil",
    "Business",
];
const SAMPLE_FACILITIES: [&str; 5] = ["Library", "Hostel", "Cafeteria", "Sports", "Lab"];

/// Row of the survey CSV as stored on disk
#[derive(Debug, Clone, Deserialize)]
struct SurveyRow {
    student_id: String,
    academic_year: String,
    major: String,
    facility_rated: String,
    satisfaction_score: i64,
    timestamp: String,
}

/// One satisfaction rating
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRecord {
    pub student_id: String,
    pub academic_year: String,
    pub major: String,
    pub facility_rated: String,
    pub satisfaction_score: i64,
    pub timestamp: NaiveDateTime,
}

/// Low (1-2), Medium (3), High (4-5)
pub fn satisfaction_category(score: i64) -> &'static str {
    if score <= 2 {
        "Low"
    } else if score <= 3 {
        "Medium"
    } else {
        "High"
    }
}

impl SurveyRecord {
    pub fn category(&self) -> &'static str {
        satisfaction_category(self.satisfaction_score)
    }

    /// Wire form, stored columns first, then derived ones
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("student_id".into(), json!(self.student_id));
        record.insert("academic_year".into(), json!(self.academic_year));
        record.insert("major".into(), json!(self.major));
        record.insert("facility_rated".into(), json!(self.facility_rated));
        record.insert("satisfaction_score".into(), json!(self.satisfaction_score));
        record.insert("timestamp".into(), Value::String(format_timestamp(&self.timestamp)));
        record.insert("year".into(), json!(self.timestamp.year()));
        record.insert("month".into(), json!(self.timestamp.month()));
        record.insert(
            "day_name".into(),
            Value::String(self.timestamp.format("%A").to_string()),
        );
        record.insert("hour".into(), json!(self.timestamp.hour()));
        record.insert("satisfaction_category".into(), json!(self.category()));
        record
    }
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl TryFrom<SurveyRow> for SurveyRecord {
    type Error = anyhow::Error;

    fn try_from(row: SurveyRow) -> Result<Self> {
        let timestamp = parse_timestamp(&row.timestamp)
            .with_context(|| format!("invalid timestamp '{}'", row.timestamp))?;
        Ok(Self {
            student_id: row.student_id,
            academic_year: row.academic_year,
            major: row.major,
            facility_rated: row.facility_rated,
            satisfaction_score: row.satisfaction_score,
            timestamp,
        })
    }
}

/// Parse survey CSV text. Malformed rows are skipped with a warning.
pub fn parse_survey_csv(csv_text: &str) -> Result<Vec<SurveyRecord>> {
    // Strip UTF-8 BOM if present
    let text = csv_text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for result in reader.deserialize::<SurveyRow>() {
        let record = result
            .map_err(anyhow::Error::from)
            .and_then(SurveyRecord::try_from);
        match record {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Skipping malformed survey row: {}", e);
                skipped += 1;
            }
        }
    }

    if records.is_empty() {
        anyhow::bail!("no valid survey rows ({} skipped)", skipped);
    }

    Ok(records)
}

/// Deterministic sample survey used when no data file is available
pub fn generate_sample_data() -> Vec<SurveyRecord> {
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    let start = NaiveDate::from_ymd_opt(2021, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();

    (0..SAMPLE_SIZE)
        .map(|i| SurveyRecord {
            student_id: format!("STU{}", 10000 + i),
            academic_year: SAMPLE_YEARS[rng.gen_range(0..SAMPLE_YEARS.len())].to_string(),
            major: SAMPLE_MAJORS[rng.gen_range(0..SAMPLE_MAJORS.len())].to_string(),
            facility_rated: SAMPLE_FACILITIES[rng.gen_range(0..SAMPLE_FACILITIES.len())]
                .to_string(),
            satisfaction_score: rng.gen_range(1..=5),
            timestamp: start + Duration::hours(i as i64),
        })
        .collect()
}

/// Load the survey from `path`, falling back to sample data
pub fn load_survey(path: &Path) -> Vec<SurveyRecord> {
    let loaded = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))
        .and_then(|text| parse_survey_csv(&text));

    match loaded {
        Ok(records) => {
            tracing::info!("Survey loaded: {} rows from {}", records.len(), path.display());
            records
        }
        Err(e) => {
            tracing::warn!("Error loading survey data: {:#}; using sample data", e);
            let records = generate_sample_data();
            tracing::info!("Sample data created: {} rows", records.len());
            records
        }
    }
}

pub fn initialize(path: &Path) -> Result<()> {
    SURVEY
        .set(load_survey(path))
        .map_err(|_| anyhow::anyhow!("survey store already initialized"))
}

pub fn all() -> Result<&'static [SurveyRecord]> {
    SURVEY
        .get()
        .map(Vec::as_slice)
        .context("survey store is not initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\u{FEFF}student_id,academic_year,major,facility_rated,satisfaction_score,timestamp
STU1,2022-2023,Civil,Library,4,2022-09-01 10:30:00
STU2,2022-2023,Business,Lab,not-a-number,2022-09-01 11:00:00
STU3,2023-2024,Civil,Hostel,2,2023-01-15
";

    #[test]
    fn test_parse_skips_malformed_rows() {
        let records = parse_survey_csv(CSV).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].student_id, "STU1");
        assert_eq!(records[1].timestamp.format("%H:%M").to_string(), "00:00");
    }

    #[test]
    fn test_parse_without_valid_rows_fails() {
        let text = "student_id,academic_year,major,facility_rated,satisfaction_score,timestamp\n";
        assert!(parse_survey_csv(text).is_err());
    }

    #[test]
    fn test_record_columns_and_derived_fields() {
        let records = parse_survey_csv(CSV).unwrap();
        let record = records[0].to_record();

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "student_id",
                "academic_year",
                "major",
                "facility_rated",
                "satisfaction_score",
                "timestamp",
                "year",
                "month",
                "day_name",
                "hour",
                "satisfaction_category",
            ]
        );
        assert_eq!(record["timestamp"], "2022-09-01T10:30:00");
        assert_eq!(record["day_name"], "Thursday");
        assert_eq!(record["hour"], 10);
        assert_eq!(record["satisfaction_category"], "High");
    }

    #[test]
    fn test_satisfaction_category_bounds() {
        assert_eq!(satisfaction_category(1), "Low");
        assert_eq!(satisfaction_category(2), "Low");
        assert_eq!(satisfaction_category(3), "Medium");
        assert_eq!(satisfaction_category(4), "High");
        assert_eq!(satisfaction_category(5), "High");
    }

    #[test]
    fn test_sample_data_is_deterministic() {
        let first = generate_sample_data();
        let second = generate_sample_data();

        assert_eq!(first.len(), SAMPLE_SIZE);
        assert_eq!(first, second);
        assert_eq!(first[0].student_id, "STU10000");
        assert_eq!(format_timestamp(&first[25].timestamp), "2021-01-02T01:00:00");
        assert!(first
            .iter()
            .all(|r| (1..=5).contains(&r.satisfaction_score)));
    }

    #[test]
    fn test_missing_file_falls_back_to_sample() {
        let records = load_survey(Path::new("does/not/exist.csv"));
        assert_eq!(records.len(), SAMPLE_SIZE);
    }
}
