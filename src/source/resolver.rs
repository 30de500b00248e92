/// Image source resolution
///
/// The gallery set comes from the JSON manifest when it can be read.
/// Otherwise the photo directory is probed for `1.JPEG`, `2.JPEG`, ...
/// until the first gap. Both branches reverse the source order so the
/// most recently added photo is shown first.

use tracing::{debug, info, warn};

use super::host::AssetHost;
use crate::error::GalleryError;
use crate::state::config::GalleryConfig;
use crate::state::data::{GallerySet, ImageDescriptor, ImageLocation, ManifestEntry};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where the gallery set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    Manifest,
    Probe,
}

/// Result of resolving the gallery
#[derive(Debug, Clone)]
pub struct Resolution {
    pub images: GallerySet,
    pub origin: SourceOrigin,
}

/// Build the gallery set, falling back to probing when the manifest fails
pub async fn resolve<H: AssetHost>(host: H, config: GalleryConfig) -> Resolution {
    let manifest_path = config.manifest_path();

    match load_manifest(&host, manifest_path).await {
        Ok(images) => {
            info!("Loaded {} images from {}", images.len(), manifest_path);
            Resolution {
                images: GallerySet::from_source_order(images),
                origin: SourceOrigin::Manifest,
            }
        }
        Err(e) => {
            warn!("Could not load manifest ({}). Falling back to auto-detecting images.", e);
            let images = probe(&host, &config).await;
            info!("Detected {} images by probing {}", images.len(), config.image_base);
            Resolution {
                images: GallerySet::from_source_order(images),
                origin: SourceOrigin::Probe,
            }
        }
    }
}

/// Fetch and parse the manifest.
///
/// Fails only when the fetch fails or the body is not a JSON array. Entries
/// that do not have the expected fields are skipped with a warning.
async fn load_manifest<H: AssetHost>(
    host: &H,
    path: &str,
) -> Result<Vec<ImageDescriptor>, GalleryError> {
    let bytes = host.fetch(path).await?;
    parse_manifest(&bytes)
}

fn parse_manifest(bytes: &[u8]) -> Result<Vec<ImageDescriptor>, GalleryError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let values: Vec<serde_json::Value> =
        serde_json::from_slice(bytes).map_err(|e| GalleryError::Manifest(e.to_string()))?;

    let mut images = Vec::with_capacity(values.len());
    for (position, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<ManifestEntry>(value) {
            Ok(entry) => images.push(entry.into()),
            Err(e) => warn!("Skipping manifest entry {}: {}", position, e),
        }
    }

    Ok(images)
}

/// Probe `{image_base}{i}.{ext}` for i = 1.. until the first missing index.
///
/// Returned in probe order.
async fn probe<H: AssetHost>(host: &H, config: &GalleryConfig) -> Vec<ImageDescriptor> {
    let mut images = Vec::new();

    for index in 1..=config.max_probe_attempts {
        let url = format!("{}{}.{}", config.image_base, index, config.probe_extension);

        match host.exists(&url).await {
            Ok(true) => {}
            Ok(false) => {
                debug!("Probe stopped at {}", url);
                break;
            }
            Err(e) => {
                debug!("Probe stopped at {}: {}", url, e);
                break;
            }
        }

        images.push(ImageDescriptor {
            location: ImageLocation::Url(url),
            title: config.locale.placeholder_title(index),
            description: config.locale.placeholder_description().to_string(),
        });
    }

    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::host::MemoryHost;
    use crate::state::config::Locale;

    const BASE: &str = "img/";
    const MANIFEST: &str = "data.JSON";

    fn config() -> GalleryConfig {
        GalleryConfig {
            manifest_path: Some(MANIFEST.to_string()),
            image_base: BASE.to_string(),
            ..GalleryConfig::default()
        }
    }

    fn photos(count: u32) -> Vec<(String, Vec<u8>)> {
        (1..=count)
            .map(|i| (format!("{}{}.JPEG", BASE, i), vec![0xFF, 0xD8]))
            .collect()
    }

    fn titles(resolution: &Resolution) -> Vec<String> {
        resolution.images.iter().map(|d| d.title.clone()).collect()
    }

    #[tokio::test]
    async fn test_manifest_order_is_reversed() {
        let manifest = r#"[
            {"filename":"1.JPEG","title":"A","description":"d1"},
            {"filename":"2.JPEG","title":"B","description":"d2"}
        ]"#;
        let host = MemoryHost::with_files([(MANIFEST, manifest.as_bytes().to_vec())]);

        let resolution = resolve(host, config()).await;
        assert_eq!(resolution.origin, SourceOrigin::Manifest);
        assert_eq!(titles(&resolution), ["B", "A"]);

        let last = resolution.images.get(1).unwrap();
        assert_eq!(last.description, "d1");
        assert_eq!(last.resolve_url(BASE), "img/1.JPEG");
    }

    #[tokio::test]
    async fn test_missing_manifest_probes_until_gap() {
        let mut files = photos(3);
        // 5 exists but 4 does not: the probe must stop at 4
        files.push((format!("{}5.JPEG", BASE), vec![0xFF, 0xD8]));
        let host = MemoryHost::with_files(files);

        let resolution = resolve(host, config()).await;
        assert_eq!(resolution.origin, SourceOrigin::Probe);
        assert_eq!(
            titles(&resolution),
            ["Unknown Image 3", "Unknown Image 2", "Unknown Image 1"]
        );

        let first = resolution.images.get(0).unwrap();
        assert_eq!(first.resolve_url("ignored/"), "img/3.JPEG");
        assert_eq!(first.description, "This image does not have metadata in the JSON.");
    }

    #[tokio::test]
    async fn test_probe_respects_attempt_limit() {
        let host = MemoryHost::with_files(photos(10));
        let config = GalleryConfig {
            max_probe_attempts: 4,
            ..config()
        };

        let resolution = resolve(host, config).await;
        assert_eq!(resolution.images.len(), 4);
    }

    #[tokio::test]
    async fn test_probe_error_ends_sequence() {
        let host = MemoryHost::with_files(photos(5)).with_broken("img/3.JPEG");

        let resolution = resolve(host, config()).await;
        assert_eq!(titles(&resolution), ["Unknown Image 2", "Unknown Image 1"]);
    }

    #[tokio::test]
    async fn test_bad_entries_are_skipped_not_fatal() {
        // No numbered photos on the host: falling back would show nothing
        let manifest = r#"[
            {"filename":"sunset.JPEG","title":"Sunset","description":"Beach"},
            {"filename":"x.JPEG","title":"X"},
            {"filename":"harbor.JPEG","title":42,"description":"d"},
            {"filename":"dunes.JPEG","title":"Dunes","description":"Desert"}
        ]"#;
        let host = MemoryHost::with_files([(MANIFEST, manifest.as_bytes().to_vec())]);

        let resolution = resolve(host, config()).await;
        assert_eq!(resolution.origin, SourceOrigin::Manifest);
        assert_eq!(titles(&resolution), ["Dunes", "Sunset"]);
        assert_eq!(resolution.images.get(1).unwrap().resolve_url(BASE), "img/sunset.JPEG");
    }

    #[tokio::test]
    async fn test_manifest_with_byte_order_mark() {
        let mut manifest = UTF8_BOM.to_vec();
        manifest.extend_from_slice(br#"[{"filename":"1.JPEG","title":"A","description":"d1"}]"#);
        let host = MemoryHost::with_files([(MANIFEST, manifest)]);

        let resolution = resolve(host, config()).await;
        assert_eq!(resolution.origin, SourceOrigin::Manifest);
        assert_eq!(titles(&resolution), ["A"]);
    }

    #[tokio::test]
    async fn test_not_an_array_falls_back() {
        let host = MemoryHost::with_files([(MANIFEST, br#"{"images":[]}"#.to_vec())]);

        let resolution = resolve(host, config()).await;
        assert_eq!(resolution.origin, SourceOrigin::Probe);
        assert!(resolution.images.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_falls_back() {
        let mut files = photos(1);
        files.push((MANIFEST.to_string(), b"[{\"filename\":".to_vec()));
        let host = MemoryHost::with_files(files);

        let resolution = resolve(host, config()).await;
        assert_eq!(resolution.origin, SourceOrigin::Probe);
        assert_eq!(titles(&resolution), ["Unknown Image 1"]);
    }

    #[tokio::test]
    async fn test_empty_manifest_is_empty_gallery() {
        let host = MemoryHost::with_files([(MANIFEST, b"[]".to_vec())]);

        let resolution = resolve(host, config()).await;
        assert_eq!(resolution.origin, SourceOrigin::Manifest);
        assert!(resolution.images.is_empty());
    }

    #[tokio::test]
    async fn test_spanish_locale_reads_spanish_manifest() {
        let english = r#"[{"filename":"1.JPEG","title":"Sunset","description":"Beach"}]"#;
        let spanish = r#"[{"filename":"1.JPEG","title":"Atardecer","description":"Playa"}]"#;
        let host = MemoryHost::with_files([
            ("resource/data.JSON", english.as_bytes().to_vec()),
            ("resource/data_es.JSON", spanish.as_bytes().to_vec()),
        ]);
        let config = GalleryConfig {
            locale: Locale::Es,
            ..GalleryConfig::default()
        };

        let resolution = resolve(host, config).await;
        assert_eq!(titles(&resolution), ["Atardecer"]);
        assert_eq!(resolution.images.get(0).unwrap().description, "Playa");
    }
}
