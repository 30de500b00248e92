/// User interface module
///
/// - Thumbnail grid and "load more" button (gallery.rs)
/// - Canvas drawing the enlarged image and the lens (lightbox.rs)
/// - Lens geometry (magnifier.rs)

pub mod gallery;
pub mod lightbox;
pub mod magnifier;
