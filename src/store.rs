use crate::models::{FieldValue, LogEntry, ProgressStore, SettingsRequest, UserProfile};
use crate::trajectory::{parse_date, parse_weight, refresh_derived};
use chrono::NaiveDate;
use std::fmt;

/// Longest plan accepted from a settings update, about five years of daily
/// points.
pub const MAX_PLAN_DAYS: i64 = 1830;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    EmptyName,
    DuplicateUser(String),
    InvalidWeight(&'static str),
    InvalidDate(&'static str),
    PlanTooLong(i64),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "user name must not be empty"),
            Self::DuplicateUser(name) => write!(f, "user '{name}' already exists"),
            Self::InvalidWeight(field) => write!(f, "{field} must be a positive number"),
            Self::InvalidDate(field) => write!(f, "{field} must be a YYYY-MM-DD date"),
            Self::PlanTooLong(days) => write!(
                f,
                "plan spans {days} days; goal date must be within {MAX_PLAN_DAYS} days of the start date"
            ),
        }
    }
}

impl std::error::Error for StoreError {}

/// Parsed subset of the four plan settings. `None` leaves a field as is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SettingsUpdate {
    pub start_weight: Option<f64>,
    pub goal_weight: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub goal_date: Option<NaiveDate>,
}

impl TryFrom<SettingsRequest> for SettingsUpdate {
    type Error = StoreError;

    fn try_from(request: SettingsRequest) -> Result<Self, Self::Error> {
        let weight = |value: Option<FieldValue>, field: &'static str| match value {
            Some(value) => parse_weight(&value)
                .map(Some)
                .ok_or(StoreError::InvalidWeight(field)),
            None => Ok(None),
        };
        let date = |value: Option<String>, field: &'static str| match value {
            Some(value) => parse_date(&value)
                .map(Some)
                .ok_or(StoreError::InvalidDate(field)),
            None => Ok(None),
        };

        Ok(Self {
            start_weight: weight(request.start_weight, "startWeight")?,
            goal_weight: weight(request.goal_weight, "goalWeight")?,
            start_date: date(request.start_date, "startDate")?,
            goal_date: date(request.goal_date, "goalDate")?,
        })
    }
}

pub fn profile_or_default(store: &ProgressStore, name: &str) -> UserProfile {
    store.get(name).cloned().unwrap_or_default()
}

pub fn create_user(store: &mut ProgressStore, name: &str) -> Result<String, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::EmptyName);
    }
    if store.contains_key(name) {
        return Err(StoreError::DuplicateUser(name.to_string()));
    }
    store.insert(name.to_string(), UserProfile::default());
    Ok(name.to_string())
}

pub fn update_settings(
    profile: &UserProfile,
    update: SettingsUpdate,
) -> Result<UserProfile, StoreError> {
    let mut next = profile.clone();
    if let Some(weight) = update.start_weight {
        next.start_weight = weight;
    }
    if let Some(weight) = update.goal_weight {
        next.goal_weight = weight;
    }
    if let Some(date) = update.start_date {
        next.start_date = date;
    }
    if let Some(date) = update.goal_date {
        next.goal_date = date;
    }

    let days = (next.goal_date - next.start_date).num_days();
    if days > MAX_PLAN_DAYS {
        return Err(StoreError::PlanTooLong(days));
    }

    refresh_derived(&mut next);
    Ok(next)
}

/// Read-modify-write of one user's profile. Unknown users start from the
/// default profile and are stored once `f` succeeds; on error the store is
/// left as it was.
pub fn apply<F>(store: &mut ProgressStore, name: &str, f: F) -> Result<UserProfile, StoreError>
where
    F: FnOnce(&UserProfile) -> Result<UserProfile, StoreError>,
{
    let next = f(&profile_or_default(store, name))?;
    store.insert(name.to_string(), next.clone());
    Ok(next)
}

/// Restores log ordering, one entry per date and derived fields on data read
/// from disk.
pub fn normalize(store: &mut ProgressStore) {
    for profile in store.values_mut() {
        // stable sort keeps file order within a date, so the last write wins
        profile.logs.sort_by_key(|entry| entry.date);
        let mut deduped: Vec<LogEntry> = Vec::with_capacity(profile.logs.len());
        for entry in profile.logs.drain(..) {
            match deduped.last_mut() {
                Some(last) if last.date == entry.date => *last = entry,
                _ => deduped.push(entry),
            }
        }
        profile.logs = deduped;
        refresh_derived(profile);
    }
}
