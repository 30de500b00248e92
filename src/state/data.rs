/// Shared data structures for the gallery state
///
/// These structs represent the data model that flows between
/// the loading layer and the UI layer.

use iced::widget::image::Handle;
use serde::Deserialize;

/// Where an image lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocation {
    /// Filename relative to the image base directory (e.g., "5.JPEG")
    Filename(String),
    /// Full site-relative path, already joined with the base
    Url(String),
}

/// Represents a single image of the gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub location: ImageLocation,
    pub title: String,
    pub description: String,
}

/// One element of the JSON manifest
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub filename: String,
    pub title: String,
    pub description: String,
}

impl From<ManifestEntry> for ImageDescriptor {
    fn from(entry: ManifestEntry) -> Self {
        Self {
            location: ImageLocation::Filename(entry.filename),
            title: entry.title,
            description: entry.description,
        }
    }
}

impl ImageDescriptor {
    /// Site-relative path of the full-size image
    pub fn resolve_url(&self, image_base: &str) -> String {
        match &self.location {
            ImageLocation::Filename(name) => format!("{}{}", image_base, name),
            ImageLocation::Url(url) => url.clone(),
        }
    }
}

/// The ordered images of the gallery, most recently added first.
///
/// Built once by the resolver and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GallerySet {
    images: Vec<ImageDescriptor>,
}

impl GallerySet {
    /// Build from source order (manifest or probe order); display order is the reverse
    pub fn from_source_order(mut images: Vec<ImageDescriptor>) -> Self {
        images.reverse();
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&ImageDescriptor> {
        self.images.get(index)
    }

    /// Descriptors in `range`, clamped to the set
    pub fn slice(&self, range: std::ops::Range<usize>) -> &[ImageDescriptor] {
        let end = range.end.min(self.images.len());
        let start = range.start.min(end);
        &self.images[start..end]
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &ImageDescriptor> {
        self.images.iter()
    }
}

/// A decoded image ready for display
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Site-relative path it was loaded from
    pub url: String,
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}
