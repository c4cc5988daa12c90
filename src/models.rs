use crate::trajectory::{parse_date, parse_weight};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every persisted profile, keyed by user name.
pub type ProgressStore = BTreeMap<String, UserProfile>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub date: NaiveDate,
    pub weight: f64,
    /// Delta from the previous entry, 0 for the first one.
    pub change: f64,
    /// Percent of the planned loss achieved at this entry. Not clamped.
    pub progress: f64,
}

/// Profiles are read through [`RawProfile`] so one malformed user never
/// costs the rest of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawProfile")]
pub struct UserProfile {
    pub start_weight: f64,
    pub goal_weight: f64,
    pub start_date: NaiveDate,
    pub goal_date: NaiveDate,
    pub logs: Vec<LogEntry>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            start_weight: 116.4,
            goal_weight: 100.0,
            start_date: NaiveDate::from_ymd_opt(2025, 5, 4).unwrap_or_default(),
            goal_date: NaiveDate::from_ymd_opt(2025, 9, 27).unwrap_or_default(),
            logs: Vec::new(),
        }
    }
}

/// On-disk profile as the browser wrote it: numbers may be text, `null` or
/// zero, dates may be empty strings, and derived entry fields may be `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawProfile {
    start_weight: Option<FieldValue>,
    goal_weight: Option<FieldValue>,
    start_date: Option<String>,
    goal_date: Option<String>,
    logs: Option<Vec<RawLogEntry>>,
}

// `change` and `progress` are recomputed after loading, so they are not read.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLogEntry {
    date: Option<String>,
    weight: Option<FieldValue>,
}

impl From<RawProfile> for UserProfile {
    fn from(raw: RawProfile) -> Self {
        let defaults = Self::default();
        let weight = |value: Option<FieldValue>, fallback: f64| {
            value.as_ref().and_then(parse_weight).unwrap_or(fallback)
        };
        let date = |value: Option<String>, fallback: NaiveDate| {
            value.as_deref().and_then(parse_date).unwrap_or(fallback)
        };

        let logs = raw
            .logs
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| {
                Some(LogEntry {
                    date: parse_date(entry.date.as_deref()?)?,
                    weight: parse_weight(entry.weight.as_ref()?)?,
                    change: 0.0,
                    progress: 0.0,
                })
            })
            .collect();

        Self {
            start_weight: weight(raw.start_weight, defaults.start_weight),
            goal_weight: weight(raw.goal_weight, defaults.goal_weight),
            start_date: date(raw.start_date, defaults.start_date),
            goal_date: date(raw.goal_date, defaults.goal_date),
            logs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Daily,
    Weekly,
}

impl Granularity {
    pub fn step_days(self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_days: i64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    pub current_weight: f64,
    pub weight_progress_pct: f64,
    pub target_weight_today: f64,
    pub remaining_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub target: f64,
    pub actual: Option<f64>,
}

/// A number typed into a form field may arrive as JSON text or as a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

#[derive(Debug, Default, Deserialize)]
pub struct LogRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub weight: Option<FieldValue>,
}

#[derive(Debug, Deserialize)]
pub struct LogForm {
    pub user: String,
    pub weight: String,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewUserRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    #[serde(default)]
    pub start_weight: Option<FieldValue>,
    #[serde(default)]
    pub goal_weight: Option<FieldValue>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub goal_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    #[serde(default)]
    pub granularity: Granularity,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub granularity: Granularity,
    pub points: Vec<SeriesPoint>,
}
