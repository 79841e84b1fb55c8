//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! Only the subset of the request and response shapes needed to obtain one
//! plain-text product blurb is modelled.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use shopcard_core::{classify, format_count, format_money, Product};

use crate::error::CopyError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Client for AI-written product descriptions.
///
/// Use [`GeminiClient::new`] for production or [`GeminiClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client pointed at the production endpoint with the default model.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, CopyError> {
        Self::with_base_url(api_key, DEFAULT_MODEL, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom model and base URL.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`CopyError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, CopyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("shopcard/0.1 (product-cards)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| CopyError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Asks the model for a promotional description of `product`.
    ///
    /// # Errors
    ///
    /// - [`CopyError::Http`] on network failure or timeout.
    /// - [`CopyError::UnexpectedStatus`] on a non-2xx response.
    /// - [`CopyError::Deserialize`] if the body does not match the expected shape.
    /// - [`CopyError::EmptyResponse`] if no candidate carries non-blank text.
    pub async fn describe(
        &self,
        product: &Product,
        currency_symbol: &str,
    ) -> Result<String, CopyError> {
        let url = self.endpoint()?;
        let prompt = build_prompt(product, currency_symbol);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.8,
                max_output_tokens: 512,
            },
        };

        let response = self.client.post(url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CopyError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: format!("models/{}:generateContent", self.model),
            });
        }

        let body = response.text().await?;
        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| CopyError::Deserialize {
                context: format!("generateContent(item_id={})", product.item_id),
                source: e,
            })?;

        first_text(parsed).ok_or(CopyError::EmptyResponse)
    }

    fn endpoint(&self) -> Result<Url, CopyError> {
        let path = format!("v1beta/models/{}:generateContent", self.model);
        let mut url = self
            .base_url
            .join(&path)
            .map_err(|e| CopyError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

fn first_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
}

/// Prompt sent to the model. Only facts present on the product are stated so
/// the model is not invited to invent a rating or discount.
pub(crate) fn build_prompt(product: &Product, currency_symbol: &str) -> String {
    let category = classify(&product.product_name);
    let mut facts = vec![
        format!("Product: {}", product.product_name),
        format!("Category: {}", category.as_str()),
        format!("Price: {}", format_money(product.price, currency_symbol)),
    ];
    if let Ok(Some(original)) = product.original_price() {
        if let Some(rate) = product.discount_rate() {
            facts.push(format!(
                "Discount: {}% (was {})",
                rate.normalize(),
                format_money(original, currency_symbol)
            ));
        }
    }
    if let Some(rating) = product.rating_star {
        facts.push(format!("Rating: {}/5", rating.normalize()));
    }
    facts.push(format!("Units sold: {}", format_count(product.sales)));
    if product.ships_free() {
        facts.push("Free shipping: yes".to_string());
    }

    format!(
        "Write a short, energetic social media post promoting this product. \
         Use emojis, keep it under 600 characters, end with a call to action \
         and the hashtags {}. Do not mention any fact not listed below.\n\n{}",
        category.hashtags(),
        facts.join("\n")
    )
}
