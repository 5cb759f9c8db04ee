//! HTTP handlers for dashboard sessions

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Crop, DisplaySettings, SessionView, Timeframe};
use crate::AppState;

/// Settings change from the dashboard controls; absent fields keep their
/// current value
#[derive(Debug, Default, Deserialize)]
pub struct SettingsInput {
    pub selected_crop: Option<String>,
    pub selected_timeframe: Option<String>,
    pub confidence_threshold: Option<f64>,
    pub show_confidence_interval: Option<bool>,
    pub weather_impact_enabled: Option<bool>,
    pub news_alerts_enabled: Option<bool>,
}

/// [`SettingsInput`] with identifiers already parsed
#[derive(Debug, Clone, Copy, Default)]
struct SettingsPatch {
    crop: Option<Crop>,
    timeframe: Option<Timeframe>,
    confidence_threshold: Option<f64>,
    show_confidence_interval: Option<bool>,
    weather_impact_enabled: Option<bool>,
    news_alerts_enabled: Option<bool>,
}

impl SettingsInput {
    fn parse(&self) -> AppResult<SettingsPatch> {
        Ok(SettingsPatch {
            crop: self.selected_crop.as_deref().map(str::parse::<Crop>).transpose()?,
            timeframe: self.selected_timeframe.as_deref().map(str::parse::<Timeframe>).transpose()?,
            confidence_threshold: self.confidence_threshold,
            show_confidence_interval: self.show_confidence_interval,
            weather_impact_enabled: self.weather_impact_enabled,
            news_alerts_enabled: self.news_alerts_enabled,
        })
    }
}

impl SettingsPatch {
    fn apply(&self, current: &DisplaySettings) -> DisplaySettings {
        DisplaySettings {
            selected_crop: self.crop.unwrap_or(current.selected_crop),
            selected_timeframe: self.timeframe.unwrap_or(current.selected_timeframe),
            confidence_threshold: self
                .confidence_threshold
                .unwrap_or(current.confidence_threshold),
            show_confidence_interval: self
                .show_confidence_interval
                .unwrap_or(current.show_confidence_interval),
            weather_impact_enabled: self
                .weather_impact_enabled
                .unwrap_or(current.weather_impact_enabled),
            news_alerts_enabled: self.news_alerts_enabled.unwrap_or(current.news_alerts_enabled),
        }
    }
}

async fn session_view(state: &AppState, id: Uuid) -> AppResult<SessionView> {
    let session = state.sessions.get(id).await?;
    let snapshot = session.snapshot().await;
    Ok(SessionView::new(snapshot, state.predictions.reference_data()))
}

/// Settings overrides from a create request; an empty body means none
fn create_input(body: &[u8]) -> AppResult<Option<SettingsInput>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let Json(input) = Json::<SettingsInput>::from_bytes(body)?;
    Ok(Some(input))
}

/// Start a dashboard session; the body may override default settings
pub async fn create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<SessionView>)> {
    let settings = match create_input(&body)? {
        Some(input) => input.parse()?.apply(&DisplaySettings::default()),
        None => DisplaySettings::default(),
    };

    let (session, handle) = state.sessions.create(&state.predictions, settings).await?;
    tracing::debug!(session = %session.id(), ticket = %handle.ticket, "Initial derivation started");
    let view = session_view(&state, session.id()).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    Ok(Json(session_view(&state, session_id).await?))
}

/// Apply a settings change, re-deriving when a derivation input changed
pub async fn update_settings(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    input: Result<Json<SettingsInput>, JsonRejection>,
) -> AppResult<Json<SessionView>> {
    let Json(input) = input?;
    let patch = input.parse()?;
    let session = state.sessions.get(session_id).await?;
    let (_, handle) = session
        .update_settings(&state.predictions, |current| patch.apply(current))
        .await;
    if let Some(handle) = handle {
        tracing::debug!(session = %session_id, ticket = %handle.ticket, "Settings change re-derives");
    }

    Ok(Json(session_view(&state, session_id).await?))
}

/// Explicit "update prediction" request
pub async fn refresh_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<SessionView>)> {
    let session = state.sessions.get(session_id).await?;
    let handle = session.refresh(&state.predictions).await;
    tracing::debug!(session = %session_id, ticket = %handle.ticket, "Refresh requested");

    Ok((StatusCode::ACCEPTED, Json(session_view(&state, session_id).await?)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
