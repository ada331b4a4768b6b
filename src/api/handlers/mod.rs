use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::error::QsortError;
use crate::layout::{layout, PyramidLayout, MAX_CARDS};
use crate::models::*;

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================
// Error Handling
// ============================================================

/// Log the full error and answer with a fixed message.
///
/// Validation errors are the caller's to fix and come back as 400 with their
/// own text; source and schema failures are 500 with `message`.
fn failure(message: &str, e: QsortError) -> ApiError {
    if e.is_validation() {
        tracing::warn!("{}: {}", message, e);
        return bad_request(&e.to_string());
    }

    tracing::error!("{}: {}", message, e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// A query parameter that is present and not blank.
fn required(param: &Option<String>) -> Option<&str> {
    param.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Teams, versions and cards
// ============================================================

pub async fn get_teams(State(state): State<AppState>) -> Result<Json<TeamsResponse>, ApiError> {
    let teams = state
        .queries
        .list_teams()
        .map_err(|e| failure("Error fetching teams", e))?;

    tracing::info!("Serving {} teams", teams.len());
    Ok(Json(TeamsResponse { teams }))
}

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    pub team: Option<String>,
}

/// Versions with at least five cards for the team.
pub async fn get_qsort_details(
    State(state): State<AppState>,
    Query(query): Query<TeamQuery>,
) -> Result<Json<VersionsResponse>, ApiError> {
    let team = required(&query.team).ok_or_else(|| bad_request("Missing team parameter"))?;

    let versions = state
        .queries
        .list_eligible_versions(team)
        .map_err(|e| failure("Error fetching Q-Sort versions", e))?;

    tracing::info!("Serving {} versions for team {}", versions.len(), team);
    Ok(Json(VersionsResponse { versions }))
}

#[derive(Debug, Deserialize)]
pub struct VersionDataQuery {
    pub version: Option<String>,
    pub team: Option<String>,
}

pub async fn get_version_data(
    State(state): State<AppState>,
    Query(query): Query<VersionDataQuery>,
) -> Result<Json<CardsResponse>, ApiError> {
    let (Some(version), Some(team)) = (required(&query.version), required(&query.team)) else {
        tracing::warn!("Bad request: missing team or version");
        return Err(bad_request(
            "Both version and team parameters are required",
        ));
    };

    let cards = state
        .queries
        .list_cards(team, version)
        .map_err(|e| failure("Error fetching version data", e))?;

    tracing::info!(
        "Serving {} cards for team {} and version {}",
        cards.len(),
        team,
        version
    );
    Ok(Json(CardsResponse { cards }))
}

pub async fn get_qsort_data(
    State(state): State<AppState>,
) -> Result<Json<QsortOverview>, ApiError> {
    state
        .queries
        .overview()
        .map(Json)
        .map_err(|e| failure("Failed to load Q-sort data", e))
}

// ============================================================
// Layout
// ============================================================

#[derive(Debug, Deserialize)]
pub struct LayoutQuery {
    pub cards: Option<String>,
}

pub async fn get_layout(Query(query): Query<LayoutQuery>) -> Result<Json<PyramidLayout>, ApiError> {
    let count: usize = required(&query.cards)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| bad_request("cards must be a non-negative integer"))?;

    if count > MAX_CARDS {
        tracing::warn!("Rejected layout request for {} cards", count);
        return Err(bad_request(&format!("cards must be at most {}", MAX_CARDS)));
    }

    Ok(Json(layout(count)))
}

// ============================================================
// Submissions
// ============================================================

pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> (StatusCode, Json<SubmitResponse>) {
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            tracing::warn!("Rejected submission body: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(SubmitResponse::rejected("Invalid submission body")),
            );
        }
    };

    if !submission.is_complete() {
        tracing::warn!("Rejected incomplete submission from {:?}", submission.name);
        return (
            StatusCode::BAD_REQUEST,
            Json(SubmitResponse::rejected(
                "Missing required fields or empty submission",
            )),
        );
    }

    match state.recorder.record(&submission) {
        Ok(number) => (StatusCode::OK, Json(SubmitResponse::accepted(number))),
        Err(e) if e.is_validation() => {
            tracing::warn!("Rejected submission: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(SubmitResponse::rejected(e.to_string())),
            )
        }
        Err(e) => {
            tracing::error!("Error saving Q-sort submission: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SubmitResponse::rejected("Failed to save submission")),
            )
        }
    }
}
