//! HTTP 接口（axum）
//!
//! 只读查询对所有人开放；写操作需 `Authorization: Bearer <token>` 与 `[admin].token` 一致。

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::catalog::{static_dataset, CatalogResolver, CatalogView, CategorySelection, Language};
use crate::config::AppConfig;
use crate::error::CatalogError;
use crate::store::{
    seed_catalog, Caller, CatalogSource, CatalogStore, CategoryRecord, SeedPayload, SeedReport,
    SkillRecord,
};

/// 处理器共享状态
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn CatalogStore>,
    pub resolver: CatalogResolver,
}

type ApiError = (StatusCode, String);

fn api_error(e: CatalogError) -> ApiError {
    let status = match &e {
        CatalogError::Unauthorized => StatusCode::UNAUTHORIZED,
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("request failed: {}", e);
    }
    (status, e.to_string())
}

/// 从请求头识别调用方
fn caller(state: &AppState, headers: &HeaderMap) -> Caller {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);
    Caller::from_token(presented, state.config.admin.token.as_deref())
}

#[derive(Debug, Serialize)]
struct SuccessResponse {
    success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeedResponse {
    success: bool,
    #[serde(flatten)]
    report: SeedReport,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogQuery {
    category: Option<String>,
    q: Option<String>,
    lang: Option<String>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/categories", get(api_categories))
        .route("/api/skills", get(api_skills).post(api_skill_upsert))
        .route("/api/skills/bulk-seed", post(api_bulk_seed))
        .route("/api/skills/by-category/:category_id", get(api_skills_by_category))
        .route("/api/skills/:id", get(api_skill_get).delete(api_skill_delete))
        .route("/api/seed/static", post(api_seed_static))
        .route("/api/catalog", get(api_catalog))
        .with_state(state)
}

async fn api_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryRecord>>, ApiError> {
    state.store.list_categories().await.map(Json).map_err(api_error)
}

async fn api_skills(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SkillRecord>>, ApiError> {
    state.store.list_skills().await.map(Json).map_err(api_error)
}

async fn api_skills_by_category(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<String>,
) -> Result<Json<Vec<SkillRecord>>, ApiError> {
    state
        .store
        .skills_by_category(&category_id)
        .await
        .map(Json)
        .map_err(api_error)
}

async fn api_skill_get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SkillRecord>, ApiError> {
    match state.store.skill_by_id(&id).await.map_err(api_error)? {
        Some(skill) => Ok(Json(skill)),
        None => Err(api_error(CatalogError::NotFound(format!("skill {}", id)))),
    }
}

async fn api_skill_upsert(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(skill): Json<SkillRecord>,
) -> Result<Json<SuccessResponse>, ApiError> {
    caller(&state, &headers).require_admin().map_err(api_error)?;
    state.store.upsert_skill(&skill).await.map_err(api_error)?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn api_skill_delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    caller(&state, &headers).require_admin().map_err(api_error)?;
    let existed = state.store.delete_skill(&id).await.map_err(api_error)?;
    if !existed {
        tracing::debug!("delete of unknown skill {}", id);
    }
    Ok(Json(SuccessResponse { success: true }))
}

async fn api_bulk_seed(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SeedPayload>,
) -> Result<Json<SeedResponse>, ApiError> {
    let caller = caller(&state, &headers);
    let report = seed_catalog(state.store.as_ref(), caller, &payload)
        .await
        .map_err(api_error)?;
    Ok(Json(SeedResponse { success: true, report }))
}

async fn api_seed_static(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SeedResponse>, ApiError> {
    let caller = caller(&state, &headers);
    let payload = SeedPayload::from_static(static_dataset());
    let report = seed_catalog(state.store.as_ref(), caller, &payload)
        .await
        .map_err(api_error)?;
    Ok(Json(SeedResponse { success: true, report }))
}

async fn api_catalog(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Json<CatalogView> {
    let lang = query
        .lang
        .as_deref()
        .and_then(Language::parse)
        .unwrap_or(state.config.app.default_language);
    let selection = query
        .category
        .as_deref()
        .map(CategorySelection::parse)
        .unwrap_or_default();
    let resolved = state.resolver.resolve().await;
    Json(CatalogView::build(
        &resolved,
        lang,
        &selection,
        query.q.as_deref().unwrap_or(""),
    ))
}
