//! Card generation handlers: description, layout plan, SVG render and download.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use shopcard_copy::DescriptionSource;
use shopcard_core::{
    classify, normalize_product, CardConfig, CardConfigRequest, Category, CoreError, Product,
    RawProduct, Template,
};
use shopcard_layout::{render_svg, CardPlan};
use shopcard_package::{CardBatch, PackageError, SVG_CONTENT_TYPE};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct DescribeRequest {
    product: RawProduct,
    /// Only the currency symbol affects the copy.
    #[serde(default)]
    config: CardConfigRequest,
}

#[derive(Debug, Deserialize)]
pub(super) struct CardRequest {
    product: RawProduct,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    config: CardConfigRequest,
}

#[derive(Debug, Deserialize)]
pub(super) struct DownloadRequest {
    product: RawProduct,
    #[serde(default)]
    description: Option<String>,
    /// Falls back to the profile's templates when absent.
    #[serde(default)]
    templates: Option<Vec<Template>>,
    #[serde(default)]
    config: CardConfigRequest,
}

#[derive(Debug, Serialize)]
pub(super) struct DescriptionItem {
    text: String,
    source: DescriptionSource,
    category: Category,
}

fn validation_error(request_id: &RequestId, error: &CoreError) -> ApiError {
    ApiError::new(request_id.0.clone(), "validation_error", error.to_string())
}

fn ingest(request_id: &RequestId, raw: RawProduct) -> Result<Product, ApiError> {
    normalize_product(raw).map_err(|e| validation_error(request_id, &e))
}

/// Request settings over profile defaults over built-in defaults.
fn resolve_config(
    state: &AppState,
    request_id: &RequestId,
    request: CardConfigRequest,
) -> Result<CardConfig, ApiError> {
    CardConfig::from_request(request.or(&state.profile.as_request()))
        .map_err(|e| validation_error(request_id, &e))
}

/// A caller-supplied description wins; otherwise ask the description service
/// in the card's currency.
async fn resolve_description(
    state: &AppState,
    product: &Product,
    config: &CardConfig,
    provided: Option<String>,
) -> String {
    match provided.filter(|text| !text.trim().is_empty()) {
        Some(text) => text,
        None => {
            state
                .descriptions
                .describe(product, &config.currency_symbol)
                .await
                .text
        }
    }
}

pub(super) async fn describe(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DescribeRequest>,
) -> Result<Json<ApiResponse<DescriptionItem>>, ApiError> {
    let product = ingest(&req_id, body.product)?;
    let config = resolve_config(&state, &req_id, body.config)?;
    let description = state
        .descriptions
        .describe(&product, &config.currency_symbol)
        .await;
    tracing::info!(
        item_id = %product.item_id,
        source = ?description.source,
        "description resolved"
    );

    Ok(Json(ApiResponse {
        data: DescriptionItem {
            text: description.text,
            source: description.source,
            category: classify(&product.product_name),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

async fn build_plan(
    state: &AppState,
    req_id: &RequestId,
    body: CardRequest,
) -> Result<CardPlan, ApiError> {
    let product = ingest(req_id, body.product)?;
    let config = resolve_config(state, req_id, body.config)?;
    let description = resolve_description(state, &product, &config, body.description).await;
    Ok(state.engine.layout(&product, &description, &config))
}

pub(super) async fn plan(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CardRequest>,
) -> Result<Json<ApiResponse<CardPlan>>, ApiError> {
    let plan = build_plan(&state, &req_id, body).await?;
    Ok(Json(ApiResponse {
        data: plan,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn render(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CardRequest>,
) -> Result<Response, ApiError> {
    let plan = build_plan(&state, &req_id, body).await?;
    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], render_svg(&plan)).into_response())
}

pub(super) async fn download(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DownloadRequest>,
) -> Result<Response, ApiError> {
    let product = ingest(&req_id, body.product)?;
    let config = resolve_config(&state, &req_id, body.config)?;

    let templates = body
        .templates
        .unwrap_or_else(|| state.profile.templates.clone());
    let batch = CardBatch::new(templates, state.max_cards)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let description = resolve_description(&state, &product, &config, body.description).await;
    let download = batch
        .render(&state.engine, &product, &description, &config)
        .await
        .map_err(|e: PackageError| {
            tracing::error!(item_id = %product.item_id, error = %e, "card packaging failed");
            ApiError::new(req_id.0.clone(), "internal_error", "card packaging failed")
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, download.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", download.file_name),
            ),
        ],
        download.bytes,
    )
        .into_response())
}
