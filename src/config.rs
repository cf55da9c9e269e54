use anyhow::{Context, Result};
use mdtext::StyleSheet;
use serde::Deserialize;
use std::path::Path;

/// Default config file looked up in the working directory.
pub const CONFIG_FILE: &str = "mdtext.json";

/// Top-level mdtext.json schema.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL used to resolve relative link destinations.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub styles: StyleSheet,

    #[serde(default)]
    pub rewrite: RewriteDefaults,
}

/// Rewrite rules applied unless overridden on the command line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteDefaults {
    #[serde(default)]
    pub drop_images: bool,

    #[serde(default)]
    pub unwrap_links: bool,

    #[serde(default)]
    pub drop_html: bool,
}

/// Load config from `explicit`, or from `mdtext.json` in `dir` if present.
///
/// A missing default file yields defaults; a missing explicit file is an error.
pub fn load_config(dir: &Path, explicit: Option<&Path>) -> Result<Config> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => dir.join(CONFIG_FILE),
    };

    if explicit.is_none() && !config_path.exists() {
        log::debug!("no {} in {}, using defaults", CONFIG_FILE, dir.display());
        return Ok(Config::default());
    }

    let raw = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: Config = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    log::debug!("loaded config from {}", config_path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdtext::{Color, Style};

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "baseUrl": "https://example.org/docs/",
            "styles": {
                "strong": { "foreground": "red" },
                "link": { "underline": false }
            },
            "rewrite": {
                "dropImages": true,
                "unwrapLinks": false,
                "dropHtml": true
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://example.org/docs/"));
        assert_eq!(
            config.styles.strong,
            Some(Style {
                foreground: Some(Color::Red),
                ..Style::default()
            })
        );
        assert_eq!(config.styles.link.unwrap().underline, Some(false));
        assert!(config.styles.code.is_none());
        assert!(config.rewrite.drop_images);
        assert!(!config.rewrite.unwrap_links);
        assert!(config.rewrite.drop_html);
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.base_url.is_none());
        assert_eq!(config.styles, StyleSheet::default());
        assert_eq!(config.rewrite, RewriteDefaults::default());
    }

    #[test]
    fn test_missing_default_file_is_not_an_error() {
        let dir = std::env::temp_dir().join("mdtext-config-test-missing");
        let _ = std::fs::create_dir_all(&dir);
        let _ = std::fs::remove_file(dir.join(CONFIG_FILE));
        let config = load_config(&dir, None).unwrap();
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = std::env::temp_dir();
        let err = load_config(&dir, Some(Path::new("/nonexistent/mdtext.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
