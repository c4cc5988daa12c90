use crate::models::{FieldValue, Granularity, LogEntry, SeriesPoint, Summary, UserProfile};
use chrono::{Duration, NaiveDate};

pub fn compute_summary(profile: &UserProfile, today: NaiveDate) -> Summary {
    let total_days = total_days(profile);
    let days_elapsed = (today - profile.start_date).num_days().clamp(0, total_days);
    let days_remaining = (total_days - days_elapsed).max(0);
    let current_weight = profile
        .logs
        .last()
        .map_or(profile.start_weight, |entry| entry.weight);
    let progress = progress_pct(profile.start_weight, profile.goal_weight, current_weight);

    Summary {
        total_days,
        days_elapsed,
        days_remaining,
        current_weight,
        weight_progress_pct: round1(progress.clamp(0.0, 100.0)),
        target_weight_today: target_at(profile, total_days, today),
        remaining_kg: round1(current_weight - profile.goal_weight),
    }
}

pub fn build_series(profile: &UserProfile, granularity: Granularity) -> Series<'_> {
    Series {
        profile,
        granularity,
        total_days: total_days(profile),
    }
}

/// Inserts or replaces the entry for `date`. Missing or unusable input leaves
/// the profile untouched.
pub fn upsert_log(profile: &UserProfile, date: Option<NaiveDate>, weight: Option<f64>) -> UserProfile {
    let (Some(date), Some(weight)) = (date, weight) else {
        return profile.clone();
    };
    if !is_valid_weight(weight) {
        return profile.clone();
    }

    let mut next = profile.clone();
    let entry = LogEntry {
        date,
        weight,
        change: 0.0,
        progress: 0.0,
    };
    match next.logs.binary_search_by_key(&date, |entry| entry.date) {
        Ok(index) => next.logs[index] = entry,
        Err(index) => next.logs.insert(index, entry),
    }
    refresh_derived(&mut next);
    next
}

pub fn delete_log(profile: &UserProfile, date: NaiveDate) -> UserProfile {
    let mut next = profile.clone();
    let before = next.logs.len();
    next.logs.retain(|entry| entry.date != date);
    if next.logs.len() != before {
        refresh_derived(&mut next);
    }
    next
}

/// Recomputes `change` and `progress` for every entry from the current
/// settings. Assumes `logs` is already sorted by date.
pub fn refresh_derived(profile: &mut UserProfile) {
    let (start, goal) = (profile.start_weight, profile.goal_weight);
    let mut previous: Option<f64> = None;
    for entry in &mut profile.logs {
        entry.change = previous.map_or(0.0, |prev| round1(entry.weight - prev));
        entry.progress = round1(progress_pct(start, goal, entry.weight));
        previous = Some(entry.weight);
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn parse_weight(value: &FieldValue) -> Option<f64> {
    let weight = match value {
        FieldValue::Number(number) => *number,
        FieldValue::Text(text) => text.trim().parse::<f64>().ok()?,
        FieldValue::Other(_) => return None,
    };
    is_valid_weight(weight).then_some(weight)
}

pub fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

/// Rounds to one decimal place, never producing `-0.0`.
pub fn round1(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn progress_pct(start: f64, goal: f64, weight: f64) -> f64 {
    let span = start - goal;
    if span == 0.0 {
        return 0.0;
    }
    (start - weight) / span * 100.0
}

fn total_days(profile: &UserProfile) -> i64 {
    (profile.goal_date - profile.start_date).num_days().max(0)
}

fn target_at(profile: &UserProfile, total_days: i64, date: NaiveDate) -> f64 {
    if total_days == 0 {
        return round1(profile.start_weight);
    }
    let offset = (date - profile.start_date).num_days().clamp(0, total_days);
    let per_day = (profile.start_weight - profile.goal_weight) / total_days as f64;
    round1(profile.start_weight - per_day * offset as f64)
}

fn logged_weight(profile: &UserProfile, date: NaiveDate) -> Option<f64> {
    profile
        .logs
        .binary_search_by_key(&date, |entry| entry.date)
        .ok()
        .map(|index| profile.logs[index].weight)
}

/// Target trajectory merged with logged weights, from start date to goal date
/// inclusive. Iterating never mutates the series, so it can be walked again.
#[derive(Debug, Clone, Copy)]
pub struct Series<'a> {
    profile: &'a UserProfile,
    granularity: Granularity,
    total_days: i64,
}

impl<'a> Series<'a> {
    pub fn iter(&self) -> SeriesIter<'a> {
        SeriesIter {
            series: *self,
            next_offset: Some(0),
        }
    }

    pub fn len(&self) -> usize {
        let step = self.granularity.step_days();
        let mut points = self.total_days / step + 1;
        // weekly plans that don't land on the goal date get it as a last point
        if self.total_days % step != 0 {
            points += 1;
        }
        points as usize
    }

    /// Always false: a series holds at least the start date.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<'a> IntoIterator for &Series<'a> {
    type Item = SeriesPoint;
    type IntoIter = SeriesIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct SeriesIter<'a> {
    series: Series<'a>,
    next_offset: Option<i64>,
}

impl Iterator for SeriesIter<'_> {
    type Item = SeriesPoint;

    fn next(&mut self) -> Option<SeriesPoint> {
        let offset = self.next_offset?;
        let Series {
            profile,
            granularity,
            total_days,
        } = self.series;

        self.next_offset = if offset >= total_days {
            None
        } else {
            Some((offset + granularity.step_days()).min(total_days))
        };

        let date = profile.start_date + Duration::days(offset);
        Some(SeriesPoint {
            date,
            target: target_at(profile, total_days, date),
            actual: logged_weight(profile, date),
        })
    }
}
