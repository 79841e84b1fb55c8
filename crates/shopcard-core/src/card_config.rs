use serde::{Deserialize, Serialize};

use crate::money::DEFAULT_CURRENCY_SYMBOL;
use crate::theme::ColorOverrides;
use crate::CoreError;

/// Named visual style preset for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Modern,
    Minimal,
    Bold,
    Elegant,
    Vibrant,
    Search,
    Portrait,
}

impl Template {
    pub const ALL: [Template; 7] = [
        Template::Modern,
        Template::Minimal,
        Template::Bold,
        Template::Elegant,
        Template::Vibrant,
        Template::Search,
        Template::Portrait,
    ];

    /// Parses a template keyword, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownTemplate`] for anything outside [`Template::ALL`].
    pub fn from_keyword(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "modern" => Ok(Self::Modern),
            "minimal" => Ok(Self::Minimal),
            "bold" => Ok(Self::Bold),
            "elegant" => Ok(Self::Elegant),
            "vibrant" => Ok(Self::Vibrant),
            "search" => Ok(Self::Search),
            "portrait" => Ok(Self::Portrait),
            _ => Err(CoreError::UnknownTemplate(value.to_string())),
        }
    }

    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Minimal => "minimal",
            Self::Bold => "bold",
            Self::Elegant => "elegant",
            Self::Vibrant => "vibrant",
            Self::Search => "search",
            Self::Portrait => "portrait",
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

impl std::str::FromStr for Template {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s)
    }
}

/// Raster format the capture step should produce from a rendered card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownFormat`] for anything but png/jpeg/jpg.
    pub fn from_keyword(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            _ => Err(CoreError::UnknownFormat(value.to_string())),
        }
    }
}

/// Quality used for jpeg output when the request does not set one.
pub const DEFAULT_JPEG_QUALITY: f32 = 0.9;
pub const DEFAULT_CTA_LABEL: &str = "BUY NOW";

/// Fully resolved, immutable settings for one card render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardConfig {
    pub template: Template,
    pub format: ImageFormat,
    /// Always `Some` for jpeg and `None` for png.
    pub quality: Option<f32>,
    pub use_gradient: bool,
    pub custom_colors: ColorOverrides,
    pub dark_mode: bool,
    pub show_badge: bool,
    pub cta_label: String,
    pub currency_symbol: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            template: Template::Modern,
            format: ImageFormat::Png,
            quality: None,
            use_gradient: true,
            custom_colors: ColorOverrides::default(),
            dark_mode: false,
            show_badge: true,
            cta_label: DEFAULT_CTA_LABEL.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

/// Card settings as they arrive from a request; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardConfigRequest {
    pub template: Option<Template>,
    pub format: Option<ImageFormat>,
    pub quality: Option<f32>,
    pub use_gradient: Option<bool>,
    pub custom_colors: Option<ColorOverrides>,
    pub dark_mode: Option<bool>,
    pub show_badge: Option<bool>,
    pub cta_label: Option<String>,
    pub currency_symbol: Option<String>,
}

impl CardConfigRequest {
    /// Fills unset fields from `fallback`; fields set on `self` win.
    #[must_use]
    pub fn or(self, fallback: &CardConfigRequest) -> CardConfigRequest {
        let custom_colors = match (self.custom_colors, &fallback.custom_colors) {
            (Some(own), Some(base)) => Some(own.or(base)),
            (own, base) => own.or_else(|| base.clone()),
        };
        CardConfigRequest {
            template: self.template.or(fallback.template),
            format: self.format.or(fallback.format),
            quality: self.quality.or(fallback.quality),
            use_gradient: self.use_gradient.or(fallback.use_gradient),
            custom_colors,
            dark_mode: self.dark_mode.or(fallback.dark_mode),
            show_badge: self.show_badge.or(fallback.show_badge),
            cta_label: self.cta_label.or_else(|| fallback.cta_label.clone()),
            currency_symbol: self
                .currency_symbol
                .or_else(|| fallback.currency_symbol.clone()),
        }
    }
}

impl CardConfig {
    /// Resolves a request into a config, applying the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidQuality`] when a jpeg quality outside
    /// `(0, 1]` is requested.
    pub fn from_request(request: CardConfigRequest) -> Result<Self, CoreError> {
        let defaults = CardConfig::default();
        let format = request.format.unwrap_or(defaults.format);

        let quality = match format {
            ImageFormat::Png => None,
            ImageFormat::Jpeg => {
                let quality = request.quality.unwrap_or(DEFAULT_JPEG_QUALITY);
                if !(quality > 0.0 && quality <= 1.0) {
                    return Err(CoreError::InvalidQuality(quality));
                }
                Some(quality)
            }
        };

        let cta_label = request
            .cta_label
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .unwrap_or(defaults.cta_label);

        let currency_symbol = request
            .currency_symbol
            .map(|symbol| symbol.trim().to_string())
            .unwrap_or(defaults.currency_symbol);

        Ok(Self {
            template: request.template.unwrap_or(defaults.template),
            format,
            quality,
            use_gradient: request.use_gradient.unwrap_or(defaults.use_gradient),
            custom_colors: request.custom_colors.unwrap_or_default(),
            dark_mode: request.dark_mode.unwrap_or(defaults.dark_mode),
            show_badge: request.show_badge.unwrap_or(defaults.show_badge),
            cta_label,
            currency_symbol,
        })
    }

    /// Same settings, different template.
    #[must_use]
    pub fn with_template(&self, template: Template) -> Self {
        Self {
            template,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_keywords_roundtrip() {
        for template in Template::ALL {
            assert_eq!(Template::from_keyword(template.keyword()).unwrap(), template);
        }
    }

    #[test]
    fn template_keyword_ignores_case_and_whitespace() {
        assert_eq!(Template::from_keyword("  Bold ").unwrap(), Template::Bold);
    }

    #[test]
    fn unknown_template_is_rejected() {
        assert!(matches!(
            Template::from_keyword("retro"),
            Err(CoreError::UnknownTemplate(ref t)) if t == "retro"
        ));
    }

    #[test]
    fn format_accepts_jpg_alias() {
        assert_eq!(ImageFormat::from_keyword("JPG").unwrap(), ImageFormat::Jpeg);
        assert!(ImageFormat::from_keyword("gif").is_err());
    }

    #[test]
    fn empty_request_resolves_to_defaults() {
        let config = CardConfig::from_request(CardConfigRequest::default()).unwrap();
        assert_eq!(config, CardConfig::default());
        assert_eq!(config.template, Template::Modern);
        assert!(config.quality.is_none());
        assert!(config.use_gradient);
        assert!(config.show_badge);
        assert_eq!(config.cta_label, "BUY NOW");
        assert_eq!(config.currency_symbol, "R$");
    }

    #[test]
    fn jpeg_without_quality_gets_default_quality() {
        let config = CardConfig::from_request(CardConfigRequest {
            format: Some(ImageFormat::Jpeg),
            ..CardConfigRequest::default()
        })
        .unwrap();
        assert_eq!(config.quality, Some(DEFAULT_JPEG_QUALITY));
    }

    #[test]
    fn jpeg_quality_out_of_range_is_rejected() {
        for quality in [0.0, -0.5, 1.5, f32::NAN] {
            let result = CardConfig::from_request(CardConfigRequest {
                format: Some(ImageFormat::Jpeg),
                quality: Some(quality),
                ..CardConfigRequest::default()
            });
            assert!(
                matches!(result, Err(CoreError::InvalidQuality(_))),
                "quality {quality} should be rejected"
            );
        }
    }

    #[test]
    fn png_ignores_quality() {
        let config = CardConfig::from_request(CardConfigRequest {
            format: Some(ImageFormat::Png),
            quality: Some(7.0),
            ..CardConfigRequest::default()
        })
        .unwrap();
        assert!(config.quality.is_none());
    }

    #[test]
    fn blank_cta_label_falls_back_to_default() {
        let config = CardConfig::from_request(CardConfigRequest {
            cta_label: Some("   ".to_string()),
            ..CardConfigRequest::default()
        })
        .unwrap();
        assert_eq!(config.cta_label, DEFAULT_CTA_LABEL);
    }

    #[test]
    fn request_deserializes_from_camel_case_json() {
        let request: CardConfigRequest = serde_json::from_str(
            r##"{"template":"vibrant","format":"jpeg","quality":0.8,"darkMode":true,"customColors":{"primary":"#123456"}}"##,
        )
        .unwrap();
        assert_eq!(request.template, Some(Template::Vibrant));
        assert_eq!(request.dark_mode, Some(true));
        let config = CardConfig::from_request(request).unwrap();
        assert_eq!(config.quality, Some(0.8));
        assert_eq!(config.custom_colors.primary.as_deref(), Some("#123456"));
    }

    #[test]
    fn request_or_prefers_own_fields() {
        let own = CardConfigRequest {
            template: Some(Template::Bold),
            ..CardConfigRequest::default()
        };
        let fallback = CardConfigRequest {
            template: Some(Template::Minimal),
            dark_mode: Some(true),
            ..CardConfigRequest::default()
        };
        let merged = own.or(&fallback);
        assert_eq!(merged.template, Some(Template::Bold));
        assert_eq!(merged.dark_mode, Some(true));
    }
}
