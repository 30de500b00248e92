/// Gallery configuration
///
/// Every value has a default, so a missing or partial config file is fine.
/// The file lives in the user's config directory:
/// - Linux: ~/.config/portfolio-gallery/config.json
/// - macOS: ~/Library/Application Support/portfolio-gallery/config.json
/// - Windows: %APPDATA%\portfolio-gallery\config.json

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::GalleryError;

/// UI language
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Manifest read when the config does not name one
    pub fn default_manifest(self) -> &'static str {
        match self {
            Locale::En => "resource/data.JSON",
            Locale::Es => "resource/data_es.JSON",
        }
    }

    pub fn load_more(self) -> &'static str {
        match self {
            Locale::En => "Load More",
            Locale::Es => "Cargar más",
        }
    }

    pub fn no_more_images(self) -> &'static str {
        match self {
            Locale::En => "No More Images",
            Locale::Es => "No hay más imágenes",
        }
    }

    pub fn monochrome_toggle(self) -> &'static str {
        match self {
            Locale::En => "Black & White",
            Locale::Es => "Blanco y negro",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            Locale::En => "Close",
            Locale::Es => "Cerrar",
        }
    }

    pub fn placeholder_title(self, index: u32) -> String {
        match self {
            Locale::En => format!("Unknown Image {}", index),
            Locale::Es => format!("Imagen desconocida {}", index),
        }
    }

    pub fn placeholder_description(self) -> &'static str {
        match self {
            Locale::En => "This image does not have metadata in the JSON.",
            Locale::Es => "Esta imagen no tiene metadatos en el JSON.",
        }
    }
}

/// All tunables of the gallery
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GalleryConfig {
    /// Site root: an http(s) URL or a local directory
    pub site_root: String,
    /// Manifest location, relative to the site root; derived from the locale when unset
    pub manifest_path: Option<String>,
    /// Directory holding the photos, relative to the site root (trailing slash)
    pub image_base: String,
    /// Extension used when probing `1.JPEG`, `2.JPEG`, ...
    pub probe_extension: String,
    /// Upper bound on probed indices
    pub max_probe_attempts: u32,
    /// Thumbnails appended per batch
    pub images_per_page: usize,
    /// Token inserted before the extension of a monochrome variant
    pub monochrome_suffix: String,
    /// Delay between fade-out and the source swap
    pub fade_delay_ms: u64,
    /// Magnifier lens edge in logical pixels
    pub magnifier_lens: f32,
    /// Magnification of the lens relative to the displayed image
    pub magnifier_zoom: f32,
    /// Longest edge of a grid thumbnail
    pub thumbnail_size: u32,
    /// Longest edge of an enlarged image
    pub preview_max: u32,
    pub locale: Locale,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            site_root: ".".to_string(),
            manifest_path: None,
            image_base: "resource/images/portfolio-photos/Portfolio/".to_string(),
            probe_extension: "JPEG".to_string(),
            max_probe_attempts: 1000,
            images_per_page: 30,
            monochrome_suffix: "bw".to_string(),
            fade_delay_ms: 300,
            magnifier_lens: 150.0,
            magnifier_zoom: 2.5,
            thumbnail_size: 256,
            preview_max: 2048,
            locale: Locale::En,
        }
    }
}

impl GalleryConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("portfolio-gallery");
        path.push("config.json");
        Some(path)
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the config file at `path`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, GalleryError> {
        let config_error = |message: String| GalleryError::Config {
            path: path.display().to_string(),
            message,
        };

        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json).map_err(|e| config_error(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(config_error(e.to_string())),
        }
    }

    /// Manifest to fetch: the configured one, else the locale's own
    pub fn manifest_path(&self) -> &str {
        self.manifest_path
            .as_deref()
            .unwrap_or_else(|| self.locale.default_manifest())
    }

    pub fn fade_delay(&self) -> Duration {
        Duration::from_millis(self.fade_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_gallery_constants() {
        let config = GalleryConfig::default();
        assert_eq!(config.images_per_page, 30);
        assert_eq!(config.max_probe_attempts, 1000);
        assert_eq!(config.monochrome_suffix, "bw");
        assert_eq!(config.fade_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            GalleryConfig::from_json(r#"{ "images_per_page": 12, "locale": "es" }"#).unwrap();
        assert_eq!(config.images_per_page, 12);
        assert_eq!(config.locale, Locale::Es);
        assert_eq!(config.probe_extension, "JPEG");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = GalleryConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, GalleryConfig::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(GalleryConfig::load(&path), Err(GalleryError::Config { .. })));
    }

    #[test]
    fn test_manifest_follows_locale_unless_set() {
        let english = GalleryConfig::default();
        assert_eq!(english.manifest_path(), "resource/data.JSON");

        let spanish = GalleryConfig::from_json(r#"{ "locale": "es" }"#).unwrap();
        assert_eq!(spanish.manifest_path(), "resource/data_es.JSON");

        let explicit = GalleryConfig::from_json(
            r#"{ "locale": "es", "manifest_path": "meta/photos.json" }"#,
        )
        .unwrap();
        assert_eq!(explicit.manifest_path(), "meta/photos.json");
    }

    #[test]
    fn test_spanish_labels() {
        assert_eq!(Locale::Es.load_more(), "Cargar más");
        assert_eq!(Locale::En.placeholder_title(7), "Unknown Image 7");
    }
}
