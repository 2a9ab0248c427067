use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::errors::GatewayError;
use crate::observability::metrics::get_metrics;
use crate::provider::{FoodSearch, RecipeSearch, TrendingRecipes};
use crate::server::server::AppState;
use crate::utils::constants::{DEFAULT_SEARCH_MAX_RESULTS, DEFAULT_TRENDING_MAX_RESULTS};

const TOKEN_PREVIEW_CHARS: usize = 12;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/token", post(issue_token))
        .route("/foods", get(search_foods))
        .route("/food/{id}", get(get_food))
        .route("/food/{id}/servings", get(get_food_servings))
        .route("/recipes/search", get(search_recipes))
        .route("/recipes/trending", get(trending_recipes))
        .route("/recipe/{id}", get(get_recipe))
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Gateway(GatewayError),
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::Gateway(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Gateway(err) => {
                let failure = err.failure();
                error!(status = failure.status, "{}", failure.message);
                let status = StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let mut payload = json!({ "success": false, "error": failure.message });
                if let Some(detail) = &failure.detail {
                    payload["details"] = detail.clone();
                }
                (status, Json(payload)).into_response()
            }
        }
    }
}

type ApiResult = Result<Json<Value>, ApiError>;

fn success(data: impl Serialize) -> ApiResult {
    Ok(Json(json!({ "success": true, "data": data })))
}

fn required_search(params: &HashMap<String, String>) -> Result<String, ApiError> {
    params
        .get("search")
        .map(|search| search.trim().to_owned())
        .filter(|search| !search.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing required query parameter: search".to_owned()))
}

/// Anything other than a non-negative integer falls back to the default.
fn number_param(params: &HashMap<String, String>, name: &str, default: u32) -> u32 {
    params
        .get(name)
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn text_param(params: &HashMap<String, String>, name: &str) -> Option<String> {
    params
        .get(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

#[derive(Debug, Serialize)]
struct TokenInfo {
    success: bool,
    token_type: &'static str,
    expires_at_epoch: u64,
    seconds_until_expiry: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token_preview: Option<String>,
}

fn wants_raw_token(body: &[u8]) -> bool {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|body| body.get("raw").cloned())
        .map(|raw| matches!(raw, Value::Bool(true)) || raw == json!("1") || raw == json!("true"))
        .unwrap_or(false)
}

fn token_preview(token: &str) -> String {
    let head: String = token.chars().take(TOKEN_PREVIEW_CHARS).collect();
    format!("{}...({} chars)", head, token.len())
}

async fn issue_token(State(state): State<AppState>, body: Bytes) -> Result<Json<TokenInfo>, ApiError> {
    let credential = state.gateway.tokens().get_credential().await?;
    let include_raw = wants_raw_token(&body);

    Ok(Json(TokenInfo {
        success: true,
        token_type: "Bearer",
        expires_at_epoch: credential.expires_at_unix_ts,
        seconds_until_expiry: credential.seconds_until_expiry(),
        access_token_preview: (!include_raw).then(|| token_preview(&credential.token)),
        access_token: include_raw.then_some(credential.token),
    }))
}

async fn search_foods(State(state): State<AppState>, Query(params): Query<HashMap<String, String>>) -> ApiResult {
    let search = FoodSearch {
        query: required_search(&params)?,
        max_results: number_param(&params, "limit", DEFAULT_SEARCH_MAX_RESULTS),
        page: number_param(&params, "page", 0),
    };
    success(state.gateway.search_foods(&search).await?)
}

async fn get_food(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    success(state.gateway.get_food(&id).await?)
}

/// Food detail re-expressed in Indian reference portions.
async fn get_food_servings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult {
    let food = state.gateway.get_food(&id).await?;
    let fallback_name = text_param(&params, "name").unwrap_or_default();
    let normalized = state.normalizer.normalize(Some(&food), &fallback_name);

    let category = normalized.category.map(|c| c.as_str()).unwrap_or("none");
    get_metrics().await.servings_normalized.with_label_values(&[category]).inc();

    success(json!({
        "category": normalized.category,
        "original_servings": normalized.original_servings,
        "reference_equivalents": normalized.reference_equivalents,
        "food": normalized.transformed_record,
    }))
}

async fn search_recipes(State(state): State<AppState>, Query(params): Query<HashMap<String, String>>) -> ApiResult {
    let search = RecipeSearch {
        query: required_search(&params)?,
        max_results: number_param(&params, "limit", DEFAULT_SEARCH_MAX_RESULTS),
        page: number_param(&params, "page", 0),
        recipe_types: text_param(&params, "recipe_types"),
    };
    success(state.gateway.search_recipes(&search).await?)
}

async fn trending_recipes(State(state): State<AppState>, Query(params): Query<HashMap<String, String>>) -> ApiResult {
    let trending = TrendingRecipes {
        max_results: number_param(&params, "limit", DEFAULT_TRENDING_MAX_RESULTS),
        page: number_param(&params, "page", 0),
        category: text_param(&params, "category"),
    };
    success(state.gateway.trending_recipes(&trending).await?)
}

async fn get_recipe(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    success(state.gateway.get_recipe(&id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_flag_accepts_bool_and_strings() {
        assert!(wants_raw_token(br#"{"raw": true}"#));
        assert!(wants_raw_token(br#"{"raw": "1"}"#));
        assert!(wants_raw_token(br#"{"raw": "true"}"#));
        assert!(!wants_raw_token(br#"{"raw": false}"#));
        assert!(!wants_raw_token(b""));
    }

    #[test]
    fn preview_shows_prefix_and_length() {
        assert_eq!(token_preview("abcdefghijklmnopqrstuvwxyz"), "abcdefghijkl...(26 chars)");
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let params = HashMap::from([("limit".to_owned(), "abc".to_owned()), ("page".to_owned(), "3".to_owned())]);
        assert_eq!(number_param(&params, "limit", 10), 10);
        assert_eq!(number_param(&params, "page", 0), 3);
    }

    #[test]
    fn negative_and_fractional_numbers_fall_back() {
        let params = HashMap::from([("limit".to_owned(), "-1".to_owned()), ("page".to_owned(), "1.5".to_owned())]);
        assert_eq!(number_param(&params, "limit", 10), 10);
        assert_eq!(number_param(&params, "page", 0), 0);
    }
}
