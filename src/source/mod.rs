/// Image loading module
///
/// This module handles:
/// - Reading the site over HTTP or from a local directory (host.rs)
/// - Resolving the gallery set from the manifest or by probing (resolver.rs)
/// - Decoding thumbnails and lightbox images (thumbnail.rs)
/// - Monochrome variant detection and preloading (variant.rs)

pub mod host;
pub mod resolver;
pub mod thumbnail;
pub mod variant;
