/// Magnifier lens geometry
///
/// Pure functions of the latest pointer position and the image bounds.
/// Nothing is remembered between pointer moves.

use iced::{Point, Rectangle, Size};

/// Lens placement and zoom for one pointer position
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MagnifierState {
    pub visible: bool,
    /// Top-left corner of the lens, in the same space as the image bounds
    pub lens_origin: Point,
    /// Image the lens shows (same as the enlarged image)
    pub source: Option<String>,
    /// Background position in percent, per axis, 0..=100
    pub background_position: (f32, f32),
}

impl MagnifierState {
    pub fn hidden() -> Self {
        Self::default()
    }
}

/// Percentage of `offset` along `dimension`, clamped to 0..=100
pub fn background_percent(offset: f32, dimension: f32) -> f32 {
    if dimension <= 0.0 {
        return 0.0;
    }
    (offset / dimension * 100.0).clamp(0.0, 100.0)
}

/// Compute the lens for a pointer at `pointer` over an image drawn in `image_bounds`.
///
/// The lens sits up and to the left of the cursor: its origin is the pointer
/// minus the lens size.
pub fn track(pointer: Point, image_bounds: Rectangle, lens: Size, source: &str) -> MagnifierState {
    let relative_x = pointer.x - image_bounds.x;
    let relative_y = pointer.y - image_bounds.y;

    MagnifierState {
        visible: true,
        lens_origin: Point::new(pointer.x - lens.width, pointer.y - lens.height),
        source: Some(source.to_string()),
        background_position: (
            background_percent(relative_x, image_bounds.width),
            background_percent(relative_y, image_bounds.height),
        ),
    }
}

/// Where the zoomed image is drawn relative to the lens origin.
///
/// Percentage background positions align the point at `percent` of the
/// image with the point at `percent` of the lens.
pub fn zoomed_offset(lens: Size, zoomed: Size, background_position: (f32, f32)) -> Point {
    let (px, py) = background_position;
    Point::new(
        (lens.width - zoomed.width) * px / 100.0,
        (lens.height - zoomed.height) * py / 100.0,
    )
}
