use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    response::Html,
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::models::{
    ChatRequest, ChatResponse, ModelsResponse, ScrapeRequest, ScrapeResponse,
    SelectModelRequest, SelectModelResponse,
};
use crate::error::{panic_response, AppError, Result};
use crate::summarizer::{chat, summarize};
use crate::AppState;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/models", get(models_handler))
        .route("/scrape", post(scrape_handler))
        .route("/chat", post(chat_handler))
        .route("/select_model", post(select_model_handler))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn models_handler(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.registry.labels().into_iter().map(str::to_string).collect(),
        active: state.registry.active_label(),
    })
}

async fn scrape_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeResponse>> {
    let Json(req) = payload?;
    let url = required(req.url, "URL is required")?;

    // Read once so a concurrent model switch cannot split this request.
    let model_id = state.registry.active_id();
    let start_time = Instant::now();

    let page = state.fetcher.scrape(&url).await;
    let summary = summarize(state.model.as_ref(), &page, &model_id).await;

    info!(
        %url,
        %model_id,
        scraped = page.is_ok(),
        elapsed = ?start_time.elapsed(),
        "scrape request finished"
    );

    Ok(Json(ScrapeResponse {
        scraped_text: match page {
            Ok(text) => text.into_string(),
            Err(e) => e.to_string(),
        },
        summary: summary.unwrap_or_else(|e| e.to_string()),
    }))
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(req) = payload?;
    let message = required(req.message, "Message is required")?;

    let model_id = state.registry.active_id();
    let start_time = Instant::now();

    let response = chat(state.model.as_ref(), &message, req.context.as_deref(), &model_id).await;

    info!(
        %model_id,
        answered = response.is_ok(),
        elapsed = ?start_time.elapsed(),
        "chat request finished"
    );

    Ok(Json(ChatResponse {
        response: response.unwrap_or_else(|e| e.to_string()),
    }))
}

async fn select_model_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SelectModelRequest>, JsonRejection>,
) -> Result<Json<SelectModelResponse>> {
    let Json(req) = payload?;
    let label = required(req.model, "Model name is required")?;

    let outcome = state.registry.select(&label);

    Ok(Json(SelectModelResponse {
        message: outcome.to_string(),
    }))
}

fn required(value: Option<String>, message: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(message.to_string()))
}
