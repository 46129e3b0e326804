use axum::{
    extract::{Query, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    config::AiProvider,
    error::{AppError, AppResult},
    models::{normalize_tags, Recommendation, Show},
    presenter::{render_alert, render_page, PageView},
    services::{filter_shows, AssistLimits, Catalog, CatalogOrigin, FilterSelection},
};

use super::{AppState, PickStats};

// Request/Response types

#[derive(Debug, Serialize)]
pub struct SharedShowsResponse {
    pub count: usize,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatesQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    /// Comma-joined tag list
    pub tags: Option<String>,
}

impl From<CandidatesQuery> for FilterSelection {
    fn from(query: CandidatesQuery) -> Self {
        let selection = FilterSelection {
            category: query.category.unwrap_or_default(),
            status: query.status.unwrap_or_default(),
            search: query.search.unwrap_or_default(),
            ..Default::default()
        };
        match query.tags {
            Some(joined) => selection.with_joined_tags(&joined),
            None => selection,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub filters: FilterSelection,
    #[serde(default)]
    pub assisted: bool,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub candidate_count: usize,
    #[serde(flatten)]
    pub recommendation: Recommendation,
}

#[derive(Debug, Serialize)]
pub struct DebugStateResponse {
    pub data_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<CatalogOrigin>,
    pub show_count: usize,
    pub tag_count: usize,
    pub tags: Vec<String>,
    pub ai_provider: AiProvider,
    pub ai_credential: bool,
    pub ai_max_candidates: usize,
    pub ai_max_prompt_bytes: usize,
    pub stats: PickStats,
}

/// Query of the picker page
///
/// Parsed by hand because tag checkboxes repeat the `tag` key.
#[derive(Debug, Default, PartialEq)]
pub struct PickerQuery {
    pub selection: FilterSelection,
    pub assisted: bool,
    pub recommend: bool,
}

impl PickerQuery {
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
            return query;
        };
        // Only used for its query parser, so the base is irrelevant
        let Ok(mut url) = Url::parse("http://localhost/") else {
            return query;
        };
        url.set_query(Some(raw));

        let mut tags: Vec<String> = Vec::new();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "category" => query.selection.category = value.into_owned(),
                "status" => query.selection.status = value.into_owned(),
                "search" => query.selection.search = value.into_owned(),
                "tag" => tags.push(value.into_owned()),
                "tags" => tags.extend(value.split(',').map(str::to_string)),
                "ai" => query.assisted = matches!(value.as_ref(), "on" | "true" | "1"),
                "action" => query.recommend = value == "recommend",
                _ => {}
            }
        }
        query.selection.tags = normalize_tags(tags.iter().map(String::as_str))
            .into_iter()
            .collect();
        query
    }
}

/// Filters the catalog and picks one candidate
async fn recommend_from(
    state: &AppState,
    catalog: &Catalog,
    selection: &FilterSelection,
    assisted: bool,
) -> (usize, Recommendation) {
    let candidates = filter_shows(&catalog.shows, selection);
    let mut rng = StdRng::from_os_rng();

    let recommendation = if assisted {
        state.selector.pick_assisted(&candidates, &mut rng).await
    } else {
        state.selector.pick_random(&candidates, &mut rng)
    };

    state.record(&recommendation).await;

    tracing::info!(
        candidates = candidates.len(),
        assisted,
        picked = recommendation.show.as_ref().map(|s| s.title.as_str()).unwrap_or("<none>"),
        fallback = recommendation.is_fallback(),
        "Recommendation served"
    );

    (candidates.len(), recommendation)
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Replace the shared in-memory show collection
pub async fn replace_shows(
    State(state): State<AppState>,
    Json(shows): Json<Vec<Show>>,
) -> Json<SharedShowsResponse> {
    let catalog = Catalog::from_shows(shows, CatalogOrigin::SharedState);
    let response = SharedShowsResponse {
        count: catalog.shows.len(),
        tags: catalog.tags.clone(),
    };

    state.inner.write().await.shared_shows = Some(catalog.shows);

    tracing::info!(count = response.count, tags = response.tags.len(), "Shared shows replaced");

    Json(response)
}

/// Drop the shared collection so the persisted blob is used again
pub async fn clear_shows(State(state): State<AppState>) -> StatusCode {
    state.inner.write().await.shared_shows = None;
    tracing::info!("Shared shows cleared");
    StatusCode::NO_CONTENT
}

/// Get the normalized tag list
pub async fn get_tags(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let catalog = state.catalog().await?;
    Ok(Json(catalog.tags))
}

/// Get the shows matching the given filters, newest first
pub async fn get_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidatesQuery>,
) -> AppResult<Json<Vec<Show>>> {
    let catalog = state.catalog().await?;
    let selection = FilterSelection::from(query);
    Ok(Json(filter_shows(&catalog.shows, &selection)))
}

/// Pick one show from the filtered candidates
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<RecommendResponse>> {
    let catalog = state.catalog().await?;
    let (candidate_count, recommendation) =
        recommend_from(&state, &catalog, &request.filters, request.assisted).await;

    Ok(Json(RecommendResponse {
        candidate_count,
        recommendation,
    }))
}

/// Render the picker page, with a recommendation when one was requested
pub async fn picker_page(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let query = PickerQuery::parse(raw.as_deref());

    let catalog = match state.catalog().await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(error = %e, "Picker page cannot load shows");
            let status = match &e {
                AppError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            return (status, Html(render_alert(&e.to_string(), &state.config.app_url)))
                .into_response();
        }
    };

    let (candidate_count, recommendation) = if query.recommend {
        let (count, rec) =
            recommend_from(&state, &catalog, &query.selection, query.assisted).await;
        (count, Some(rec))
    } else {
        (filter_shows(&catalog.shows, &query.selection).len(), None)
    };

    let html = render_page(&PageView {
        catalog: &catalog,
        selection: &query.selection,
        assisted: query.assisted,
        candidate_count,
        recommendation: recommendation.as_ref(),
        detail_url: &state.config.detail_url,
        app_url: &state.config.app_url,
    });

    Html(html).into_response()
}

/// Dump counts and configuration for test harnesses
pub async fn debug_state(State(state): State<AppState>) -> Json<DebugStateResponse> {
    let AssistLimits {
        max_candidates,
        max_prompt_bytes,
    } = state.selector.limits();
    let stats = state.stats().await;

    let (catalog, data_error) = match state.catalog().await {
        Ok(catalog) => (Some(catalog), None),
        Err(e) => (None, Some(e.to_string())),
    };
    let tags = catalog
        .as_ref()
        .map(|catalog| catalog.tags.clone())
        .unwrap_or_default();

    let response = DebugStateResponse {
        data_available: catalog.is_some(),
        data_error,
        origin: catalog.as_ref().map(|catalog| catalog.origin),
        show_count: catalog.as_ref().map_or(0, |catalog| catalog.shows.len()),
        tag_count: tags.len(),
        tags,
        ai_provider: state.config.ai_provider,
        ai_credential: state.selector.has_credential(),
        ai_max_candidates: max_candidates,
        ai_max_prompt_bytes: max_prompt_bytes,
        stats,
    };

    Json(response)
}

/// Force a random pick over the whole collection
pub async fn debug_pick_random(State(state): State<AppState>) -> AppResult<Json<Recommendation>> {
    let catalog = state.catalog().await?;
    let (_, recommendation) =
        recommend_from(&state, &catalog, &FilterSelection::default(), false).await;
    Ok(Json(recommendation))
}

/// Force an assisted pick over the whole collection
pub async fn debug_pick_ai(State(state): State<AppState>) -> AppResult<Json<Recommendation>> {
    let catalog = state.catalog().await?;
    let (_, recommendation) =
        recommend_from(&state, &catalog, &FilterSelection::default(), true).await;
    Ok(Json(recommendation))
}
