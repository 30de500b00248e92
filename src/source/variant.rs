/// Monochrome variants: `5.JPEG` has its black & white sibling at `5bw.JPEG`

use std::io::Cursor;

use image::ImageReader;
use tracing::debug;

use super::host::AssetHost;
use super::thumbnail;
use crate::error::GalleryError;
use crate::state::data::LoadedImage;

/// Insert `suffix` right before the extension.
///
/// The extension is everything after the last `.` of the url. It must be
/// non-empty and must not contain a `/`, otherwise there is no variant.
/// A dot file such as `dir/.hidden` counts as all extension: `dir/bw.hidden`.
pub fn variant_url(url: &str, suffix: &str) -> Option<String> {
    let dot = url.rfind('.')?;
    let extension = &url[dot + 1..];
    if extension.is_empty() || extension.contains('/') {
        return None;
    }

    Some(format!("{}{}{}", &url[..dot], suffix, &url[dot..]))
}

/// Whether the monochrome sibling of `url` loads as an image
pub async fn check_variant_exists<H: AssetHost>(host: H, url: String, suffix: String) -> bool {
    let Some(variant) = variant_url(&url, &suffix) else {
        return false;
    };

    let bytes = match host.fetch(&variant).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("No monochrome variant for {}: {}", url, e);
            return false;
        }
    };

    // Only the header needs to be valid; a full decode happens on toggle
    let readable = tokio::task::spawn_blocking(move || {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok())
            .is_some()
    })
    .await;

    matches!(readable, Ok(true))
}

/// Preload the toggle target at lightbox size
pub async fn preload<H: AssetHost>(
    host: H,
    url: String,
    max_edge: u32,
) -> Result<LoadedImage, GalleryError> {
    debug!("Preloading {}", url);
    thumbnail::load_full(host, url, max_edge).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::host::MemoryHost;
    use crate::source::thumbnail::encode_png;

    #[test]
    fn test_variant_url_inserts_suffix_before_extension() {
        assert_eq!(variant_url("5.JPEG", "bw").as_deref(), Some("5bw.JPEG"));
        assert_eq!(
            variant_url("resource/images/Portfolio/12.JPEG", "bw").as_deref(),
            Some("resource/images/Portfolio/12bw.JPEG")
        );
        assert_eq!(variant_url("a.b/photo.tar.gz", "bw").as_deref(), Some("a.b/photo.tarbw.gz"));
    }

    #[test]
    fn test_variant_url_without_extension() {
        assert_eq!(variant_url("images.d/photo", "bw"), None);
        assert_eq!(variant_url("img/photo.", "bw"), None);
        assert_eq!(variant_url("photo", "bw"), None);
        assert_eq!(variant_url("", "bw"), None);
    }

    #[test]
    fn test_variant_url_dot_file_is_all_extension() {
        assert_eq!(variant_url("images/.hidden", "bw").as_deref(), Some("images/bw.hidden"));
        assert_eq!(variant_url(".JPEG", "bw").as_deref(), Some("bw.JPEG"));
    }

    #[tokio::test]
    async fn test_check_variant_exists() {
        let host = MemoryHost::with_files([
            ("img/1.png", encode_png(8, 8)),
            ("img/1bw.png", encode_png(8, 8)),
            ("img/2.png", encode_png(8, 8)),
            ("img/3.png", encode_png(8, 8)),
            ("img/3bw.png", b"<html>404</html>".to_vec()),
        ]);

        assert!(check_variant_exists(host.clone(), "img/1.png".into(), "bw".into()).await);
        assert!(!check_variant_exists(host.clone(), "img/2.png".into(), "bw".into()).await);
        // A sibling that is not an image does not count
        assert!(!check_variant_exists(host, "img/3.png".into(), "bw".into()).await);
    }

    #[tokio::test]
    async fn test_preload_decodes_target() {
        let host = MemoryHost::with_files([("img/1bw.png", encode_png(30, 10))]);
        let loaded = preload(host.clone(), "img/1bw.png".into(), 2048).await.unwrap();
        assert_eq!(loaded.url, "img/1bw.png");
        assert_eq!((loaded.width, loaded.height), (30, 10));

        assert!(preload(host, "img/9bw.png".into(), 2048).await.is_err());
    }
}
