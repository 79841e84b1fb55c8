use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::card_config::{CardConfigRequest, ImageFormat, Template};
use crate::theme::ColorOverrides;
use crate::ConfigError;

/// Operator defaults for card generation, loaded from YAML.
///
/// ```yaml
/// templates: [modern, bold, vibrant]
/// cta_label: "COMPRE AGORA"
/// currency_symbol: "R$"
/// use_gradient: true
/// custom_colors:
///   primary: "#EE4D2D"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardProfile {
    /// Templates generated when a download request names none.
    #[serde(default = "default_templates")]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub format: Option<ImageFormat>,
    #[serde(default)]
    pub quality: Option<f32>,
    #[serde(default)]
    pub cta_label: Option<String>,
    #[serde(default)]
    pub currency_symbol: Option<String>,
    #[serde(default)]
    pub use_gradient: Option<bool>,
    #[serde(default)]
    pub dark_mode: Option<bool>,
    #[serde(default)]
    pub show_badge: Option<bool>,
    #[serde(default)]
    pub custom_colors: ColorOverrides,
}

fn default_templates() -> Vec<Template> {
    vec![Template::Modern]
}

impl Default for CardProfile {
    fn default() -> Self {
        Self {
            templates: default_templates(),
            format: None,
            quality: None,
            cta_label: None,
            currency_symbol: None,
            use_gradient: None,
            dark_mode: None,
            show_badge: None,
            custom_colors: ColorOverrides::default(),
        }
    }
}

impl CardProfile {
    /// The profile expressed as a request, for merging under a caller's request.
    #[must_use]
    pub fn as_request(&self) -> CardConfigRequest {
        CardConfigRequest {
            template: self.templates.first().copied(),
            format: self.format,
            quality: self.quality,
            use_gradient: self.use_gradient,
            custom_colors: (!self.custom_colors.is_empty()).then(|| self.custom_colors.clone()),
            dark_mode: self.dark_mode,
            show_badge: self.show_badge,
            cta_label: self.cta_label.clone(),
            currency_symbol: self.currency_symbol.clone(),
        }
    }
}

/// Load and validate a card profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profile(path: &Path) -> Result<CardProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profile: CardProfile = serde_yaml::from_str(&content)?;
    validate_profile(&profile)?;

    Ok(profile)
}

fn validate_profile(profile: &CardProfile) -> Result<(), ConfigError> {
    if profile.templates.is_empty() {
        return Err(ConfigError::Validation(
            "profile must list at least one template".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for template in &profile.templates {
        if !seen.insert(*template) {
            return Err(ConfigError::Validation(format!(
                "duplicate template: '{template}'"
            )));
        }
    }

    if let Some(quality) = profile.quality {
        if !(quality > 0.0 && quality <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "quality {quality} must be in (0, 1]"
            )));
        }
    }

    if profile
        .cta_label
        .as_deref()
        .is_some_and(|label| label.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "cta_label must be non-empty when set".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_profile(yaml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(yaml.as_bytes()).expect("write profile");
        file
    }

    #[test]
    fn loads_full_profile() {
        let file = write_profile(
            "templates: [modern, bold, vibrant]\n\
             cta_label: COMPRE AGORA\n\
             currency_symbol: R$\n\
             dark_mode: true\n\
             custom_colors:\n  primary: \"#EE4D2D\"\n",
        );
        let profile = load_profile(file.path()).unwrap();
        assert_eq!(
            profile.templates,
            vec![Template::Modern, Template::Bold, Template::Vibrant]
        );
        assert_eq!(profile.cta_label.as_deref(), Some("COMPRE AGORA"));
        assert_eq!(profile.dark_mode, Some(true));
        assert_eq!(profile.custom_colors.primary.as_deref(), Some("#EE4D2D"));
    }

    #[test]
    fn templates_default_to_modern() {
        let file = write_profile("cta_label: Shop now\n");
        let profile = load_profile(file.path()).unwrap();
        assert_eq!(profile.templates, vec![Template::Modern]);
    }

    #[test]
    fn rejects_empty_template_list() {
        let file = write_profile("templates: []\n");
        let err = load_profile(file.path()).unwrap_err();
        assert!(err.to_string().contains("at least one template"));
    }

    #[test]
    fn rejects_duplicate_templates() {
        let file = write_profile("templates: [bold, bold]\n");
        let err = load_profile(file.path()).unwrap_err();
        assert!(err.to_string().contains("duplicate template: 'bold'"));
    }

    #[test]
    fn rejects_unknown_template() {
        let file = write_profile("templates: [retro]\n");
        assert!(matches!(
            load_profile(file.path()),
            Err(ConfigError::ProfileFileParse(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_quality() {
        let file = write_profile("quality: 2.0\n");
        assert!(matches!(
            load_profile(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_profile(Path::new("/nonexistent/cards.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileFileIo { ref path, .. } if path.contains("cards.yaml")));
    }

    #[test]
    fn as_request_uses_first_template() {
        let profile = CardProfile {
            templates: vec![Template::Elegant, Template::Search],
            dark_mode: Some(true),
            ..CardProfile::default()
        };
        let request = profile.as_request();
        assert_eq!(request.template, Some(Template::Elegant));
        assert_eq!(request.dark_mode, Some(true));
        assert!(request.custom_colors.is_none());
    }
}
