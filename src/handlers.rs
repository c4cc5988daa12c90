use crate::errors::AppError;
use crate::models::{
    FieldValue, IndexQuery, LogForm, LogRequest, NewUserRequest, SeriesQuery, SeriesResponse,
    SettingsRequest, Summary, UserProfile, UsersResponse,
};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::store::{self, SettingsUpdate, StoreError};
use crate::trajectory::{
    build_series, compute_summary, delete_log, parse_date, parse_weight, upsert_log,
};
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

pub async fn index(Query(query): Query<IndexQuery>) -> Html<String> {
    let user = query.user.unwrap_or_default();
    Html(render_index(user.trim(), &today().to_string()))
}

pub async fn list_users(State(state): State<AppState>) -> Json<UsersResponse> {
    let data = state.store.lock().await;
    Json(UsersResponse {
        users: data.keys().cloned().collect(),
    })
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let mut data = state.store.lock().await;
    let name = store::create_user(&mut data, &payload.name)?;
    persist_data(&state.data_path, &data).await?;
    info!(user = %name, "created user");

    Ok((StatusCode::CREATED, Json(store::profile_or_default(&data, &name))))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<UserProfile> {
    let data = state.store.lock().await;
    Json(store::profile_or_default(&data, &name))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<SettingsRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let update = SettingsUpdate::try_from(payload)?;
    let profile = mutate(&state, &name, |profile| store::update_settings(profile, update)).await?;
    info!(user = %name, "updated settings");
    Ok(Json(profile))
}

pub async fn add_log(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<LogRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = record_log(&state, &name, payload).await?;
    Ok(Json(profile))
}

pub async fn add_log_form(
    State(state): State<AppState>,
    Form(form): Form<LogForm>,
) -> Result<Redirect, AppError> {
    let name = form.user.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("user must not be empty"));
    }
    let request = LogRequest {
        date: form.date.filter(|date| !date.trim().is_empty()),
        weight: Some(FieldValue::Text(form.weight)),
    };
    record_log(&state, &name, request).await?;
    Ok(Redirect::to(&format!("/?user={}", encode_query(&name))))
}

pub async fn remove_log(
    State(state): State<AppState>,
    Path((name, date)): Path<(String, String)>,
) -> Result<Json<UserProfile>, AppError> {
    let date = parse_date(&date).ok_or_else(|| AppError::bad_request("date must be YYYY-MM-DD"))?;
    let profile = mutate(&state, &name, |profile| Ok(delete_log(profile, date))).await?;
    info!(user = %name, %date, "deleted log entry");
    Ok(Json(profile))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<Summary> {
    let data = state.store.lock().await;
    let profile = store::profile_or_default(&data, &name);
    Json(compute_summary(&profile, today()))
}

pub async fn get_series(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<SeriesQuery>,
) -> Json<SeriesResponse> {
    let data = state.store.lock().await;
    let profile = store::profile_or_default(&data, &name);
    let points = build_series(&profile, query.granularity).iter().collect();

    Json(SeriesResponse {
        granularity: query.granularity,
        points,
    })
}

async fn record_log(state: &AppState, name: &str, payload: LogRequest) -> Result<UserProfile, AppError> {
    // an absent date means "today"; a present but unparseable one is ignored
    let date = match payload.date.as_deref() {
        Some(text) => parse_date(text),
        None => Some(today()),
    };
    let weight = payload.weight.as_ref().and_then(parse_weight);

    if date.is_none() || weight.is_none() {
        debug!(user = %name, "ignoring log entry with missing or invalid input");
        let data = state.store.lock().await;
        return Ok(store::profile_or_default(&data, name));
    }

    let profile = mutate(state, name, |profile| Ok(upsert_log(profile, date, weight))).await?;
    info!(user = %name, ?date, ?weight, "recorded weight");
    Ok(profile)
}

/// Applies `f` to one profile and persists the whole store while still holding
/// the lock.
async fn mutate<F>(state: &AppState, name: &str, f: F) -> Result<UserProfile, AppError>
where
    F: FnOnce(&UserProfile) -> Result<UserProfile, StoreError>,
{
    let mut data = state.store.lock().await;
    let profile = store::apply(&mut data, name, f)?;
    persist_data(&state.data_path, &data).await?;
    Ok(profile)
}

fn encode_query(value: &str) -> String {
    value
        .bytes()
        .map(|byte| match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (byte as char).to_string()
            }
            _ => format!("%{byte:02X}"),
        })
        .collect()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
