//! REST API handlers for the dashboard server
//!
//! This module defines the API routes and handlers. Response bodies are the
//! records themselves in camelCase JSON; failures use [`ApiError`].

use axum::{
    extract::{rejection::JsonRejection, MatchedPath, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::analysis::validate;
use crate::llm::NicheDraft;
use crate::models::{
    AnalysisOutcome, MonetizationInsight, Niche, NicheInsight, NicheMetrics, NicheUpdate,
    Recommendation, Record, TrendingDatum,
};
use crate::report::{self, SortKey};
use crate::store::StoreStats;

use super::error::ApiError;
use super::server::AppState;

type ApiResult<T> = Result<T, ApiError>;

const ANALYZE_FAILED: &str = "Failed to analyze YouTube niches";

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub api_key_configured: bool,
    pub records: StoreStats,
}

/// Simple acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of `POST /api/settings/openai-key`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRequest {
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

/// Query string for niche listings
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub sort: Option<String>,
}

impl ListParams {
    fn sort_key(&self) -> ApiResult<Option<SortKey>> {
        self.sort
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<SortKey>())
            .transpose()
            .map_err(|e| ApiError::bad_request("Invalid sort key").with_error(e))
    }
}

/// Response of a successful analysis run
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and metrics
        .route("/api/health", get(health_check))
        .route("/metrics", get(prometheus_metrics))
        // Settings
        .route("/api/settings/openai-key", post(update_api_key))
        // Niches
        .route("/api/niches", get(list_niches).post(create_niche))
        .route("/api/niches/export.csv", get(export_niches))
        .route(
            "/api/niches/{id}",
            get(get_niche).patch(update_niche).delete(delete_niche),
        )
        // Insights
        .route("/api/insights/niche", get(latest_niche_insight))
        .route("/api/insights/monetization", get(latest_monetization_insight))
        .route("/api/recommendations", get(list_recommendations))
        .route("/api/metrics", get(latest_metrics))
        .route("/api/trending", get(list_trending))
        // Analysis
        .route("/api/analyze", post(analyze))
        .route_layer(middleware::from_fn(track_requests))
        .with_state(state)
}

/// Record request count and latency per matched route
async fn track_requests(request: Request, next: Next) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let start = Instant::now();
    let response = next.run(request).await;
    crate::metrics::record_api_request(
        &endpoint,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

fn parse_id(raw: &str) -> ApiResult<u64> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid ID format"))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request("Invalid request body").with_error(rejection.body_text()))
}

// ============================================================================
// Health Handlers
// ============================================================================

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        api_key_configured: state.analysis.source().has_api_key().await,
        records: state.store.stats().await,
    })
}

/// Prometheus exposition
async fn prometheus_metrics(State(state): State<AppState>) -> ApiResult<Response> {
    crate::metrics::update_store_records(&state.store.stats().await);
    let body = crate::metrics::encode_metrics()
        .map_err(|e| ApiError::internal("Failed to encode metrics", e))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

// ============================================================================
// Settings Handlers
// ============================================================================

async fn update_api_key(
    State(state): State<AppState>,
    body: Result<Json<ApiKeyRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let api_key = body
        .ok()
        .and_then(|Json(request)| request.openai_api_key)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ApiError::bad_request("OpenAI API key is required"))?;

    state.analysis.source().set_api_key(api_key).await;

    Ok(Json(MessageResponse {
        message: "OpenAI API key updated successfully".to_string(),
    }))
}

// ============================================================================
// Niche Handlers
// ============================================================================

async fn sorted_niches(state: &AppState, params: &ListParams) -> ApiResult<Vec<Record<Niche>>> {
    let sort = params.sort_key()?;
    let mut niches = state.store.list_niches().await;
    if let Some(key) = sort {
        report::sort_niches(&mut niches, key);
    }
    Ok(niches)
}

/// List niches, optionally sorted
async fn list_niches(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Record<Niche>>>> {
    Ok(Json(sorted_niches(&state, &params).await?))
}

/// Download niches as CSV; store order unless `sort` is given
async fn export_niches(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Response> {
    let niches = sorted_niches(&state, &params).await?;

    let disposition = format!("attachment; filename=\"{}\"", report::CSV_FILE_NAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report::niches_to_csv(&niches),
    )
        .into_response())
}

async fn get_niche(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Record<Niche>>> {
    let id = parse_id(&id)?;
    state
        .store
        .get_niche(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Niche not found"))
}

async fn create_niche(
    State(state): State<AppState>,
    body: Result<Json<NicheDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Record<Niche>>)> {
    let niche = validate::niche(json_body(body)?, "")
        .map_err(|e| ApiError::from_error("Failed to create niche", e.into()))?;

    let record = state
        .store
        .create_niche(niche)
        .await
        .map_err(|e| ApiError::from_error("Failed to create niche", e.into()))?;

    tracing::info!(id = record.id, name = %record.name, "Niche created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_niche(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<NicheUpdate>, JsonRejection>,
) -> ApiResult<Json<Record<Niche>>> {
    let id = parse_id(&id)?;
    let update = validate::niche_update(json_body(body)?)
        .map_err(|e| ApiError::from_error("Failed to update niche", e.into()))?;

    state
        .store
        .update_niche(id, update)
        .await
        .map_err(|e| ApiError::from_error("Failed to update niche", e.into()))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Niche not found"))
}

async fn delete_niche(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    if state.store.delete_niche(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Niche not found"))
    }
}

// ============================================================================
// Insight Handlers
// ============================================================================

async fn latest_niche_insight(
    State(state): State<AppState>,
) -> ApiResult<Json<Record<NicheInsight>>> {
    state
        .store
        .latest_niche_insight()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No niche insights found"))
}

async fn latest_monetization_insight(
    State(state): State<AppState>,
) -> ApiResult<Json<Record<MonetizationInsight>>> {
    state
        .store
        .latest_monetization_insight()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No monetization insights found"))
}

async fn list_recommendations(State(state): State<AppState>) -> Json<Vec<Record<Recommendation>>> {
    Json(state.store.list_recommendations().await)
}

async fn latest_metrics(State(state): State<AppState>) -> ApiResult<Json<Record<NicheMetrics>>> {
    state
        .store
        .latest_metrics()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No metrics found"))
}

async fn list_trending(State(state): State<AppState>) -> Json<Vec<Record<TrendingDatum>>> {
    Json(state.store.list_trending().await)
}

// ============================================================================
// Analysis Handlers
// ============================================================================

/// Trigger a new analysis with the AI service
async fn analyze(State(state): State<AppState>) -> ApiResult<Json<AnalyzeResponse>> {
    match state.analysis.refresh().await {
        Ok(outcome) => Ok(Json(AnalyzeResponse {
            message: "Analysis complete".to_string(),
            outcome,
        })),
        // Bad model output is a server-side failure, not a bad request
        Err(e) => {
            if e.is_quota() {
                Err(ApiError::from_error(ANALYZE_FAILED, e))
            } else {
                Err(ApiError::internal(ANALYZE_FAILED, e))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("-1").is_err());
    }

    #[test]
    fn test_list_params_sort_key() {
        let params = ListParams {
            sort: Some("growth".to_string()),
        };
        assert_eq!(params.sort_key().unwrap(), Some(SortKey::Growth));

        let empty = ListParams {
            sort: Some(String::new()),
        };
        assert_eq!(empty.sort_key().unwrap(), None);

        let bad = ListParams {
            sort: Some("views".to_string()),
        };
        assert!(bad.sort_key().is_err());
    }

    #[test]
    fn test_api_key_request_field_name() {
        let request: ApiKeyRequest =
            serde_json::from_str(r#"{"openaiApiKey": "sk-123"}"#).unwrap();
        assert_eq!(request.openai_api_key.as_deref(), Some("sk-123"));
    }
}
