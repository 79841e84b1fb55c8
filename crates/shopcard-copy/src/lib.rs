//! Promotional copy for product cards.
//!
//! [`FallbackGenerator`] composes a deterministic-but-for-the-CTA blurb from
//! product fields. [`DescriptionService`] prefers a cached or AI-written text
//! and falls back to it whenever the AI path is unavailable.

pub mod cta;
pub mod error;
pub mod fallback;
pub mod gemini;
pub mod service;

pub use cta::{pick_cta, CALLS_TO_ACTION};
pub use error::CopyError;
pub use fallback::FallbackGenerator;
pub use gemini::GeminiClient;
pub use service::{cache_key, Description, DescriptionService, DescriptionSource};
