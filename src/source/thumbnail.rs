use image::imageops::FilterType;
use image::DynamicImage;
use iced::widget::image::Handle;

use super::host::AssetHost;
use crate::error::{GalleryError, HostError};
use crate::state::data::LoadedImage;

/// Fetch an image and decode it into a thumbnail no larger than `size` on its longest edge
pub async fn load_thumbnail<H: AssetHost>(
    host: H,
    url: String,
    size: u32,
) -> Result<LoadedImage, GalleryError> {
    let bytes = host.fetch(&url).await?;
    decode_on_pool(url, bytes, size, FilterType::Triangle).await
}

/// Fetch an image and decode it for the lightbox, capped at `max_edge`
pub async fn load_full<H: AssetHost>(
    host: H,
    url: String,
    max_edge: u32,
) -> Result<LoadedImage, GalleryError> {
    let bytes = host.fetch(&url).await?;
    decode_on_pool(url, bytes, max_edge, FilterType::Lanczos3).await
}

/// Decoding is CPU-bound, keep it off the UI thread
async fn decode_on_pool(
    url: String,
    bytes: Vec<u8>,
    max_edge: u32,
    filter: FilterType,
) -> Result<LoadedImage, GalleryError> {
    tokio::task::spawn_blocking(move || decode(&url, &bytes, max_edge, filter))
        .await
        .map_err(|e| HostError::Join(e.to_string()))?
}

/// Decode bytes and shrink to `max_edge` if larger
fn decode(
    url: &str,
    bytes: &[u8],
    max_edge: u32,
    filter: FilterType,
) -> Result<LoadedImage, GalleryError> {
    let img = image::load_from_memory(bytes).map_err(|e| GalleryError::decode(url, e))?;
    Ok(to_loaded(url, shrink(img, max_edge, filter)))
}

fn shrink(img: DynamicImage, max_edge: u32, filter: FilterType) -> DynamicImage {
    if img.width() <= max_edge && img.height() <= max_edge {
        img
    } else {
        img.resize(max_edge, max_edge, filter)
    }
}

fn to_loaded(url: &str, img: DynamicImage) -> LoadedImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    LoadedImage {
        url: url.to_string(),
        handle: Handle::from_rgba(width, height, rgba.into_raw()),
        width,
        height,
    }
}

#[cfg(test)]
pub(crate) fn encode_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 120, 40, 255]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::host::MemoryHost;

    #[test]
    fn test_decode_keeps_small_images() {
        let loaded = decode("a.png", &encode_png(40, 20), 256, FilterType::Triangle).unwrap();
        assert_eq!((loaded.width, loaded.height), (40, 20));
        assert_eq!(loaded.url, "a.png");
    }

    #[test]
    fn test_decode_shrinks_preserving_aspect() {
        let loaded = decode("a.png", &encode_png(600, 300), 256, FilterType::Triangle).unwrap();
        assert_eq!((loaded.width, loaded.height), (256, 128));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let result = decode("a.png", b"definitely not an image", 256, FilterType::Triangle);
        assert!(matches!(result, Err(GalleryError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_load_thumbnail_from_host() {
        let host = MemoryHost::with_files([("img/1.png", encode_png(512, 512))]);
        let loaded = load_thumbnail(host.clone(), "img/1.png".to_string(), 256).await.unwrap();
        assert_eq!((loaded.width, loaded.height), (256, 256));

        let missing = load_thumbnail(host, "img/2.png".to_string(), 256).await;
        assert!(matches!(missing, Err(GalleryError::Host(_))));
    }
}
