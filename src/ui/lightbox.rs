use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use super::magnifier::{self, MagnifierState};
use crate::state::data::LoadedImage;
use crate::Message;

/// Backdrop color the image fades into
const FADE_COLOR: Color = Color {
    r: 0.08,
    g: 0.08,
    b: 0.08,
    a: 1.0,
};

/// Canvas drawing the enlarged image, the fade and the magnifier lens
pub struct Lightbox<'a> {
    pub image: Option<&'a LoadedImage>,
    /// 1.0 = fully visible
    pub opacity: f32,
    pub magnifier: &'a MagnifierState,
    pub lens: Size,
    pub zoom: f32,
}

/// Largest rectangle with the image's aspect ratio centred in `bounds`
pub fn fit_contain(image: Size, bounds: Size) -> Rectangle {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Rectangle::new(Point::ORIGIN, Size::ZERO);
    }
    let scale = (bounds.width / image.width).min(bounds.height / image.height);
    let fitted = Size::new(image.width * scale, image.height * scale);

    Rectangle::new(
        Point::new(
            (bounds.width - fitted.width) / 2.0,
            (bounds.height - fitted.height) / 2.0,
        ),
        fitted,
    )
}

impl Lightbox<'_> {
    /// Where the image is drawn, in canvas coordinates
    fn image_rect(&self, bounds: Rectangle) -> Option<Rectangle> {
        let image = self.image?;
        Some(fit_contain(
            Size::new(image.width as f32, image.height as f32),
            bounds.size(),
        ))
    }
}

impl Program<Message> for Lightbox<'_> {
    type State = HoverState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let (Some(image), Some(rect)) = (self.image, self.image_rect(bounds)) else {
            return vec![frame.into_geometry()];
        };

        frame.draw_image(rect, &image.handle);

        // Fade by covering the image with the backdrop color
        if self.opacity < 1.0 {
            let alpha = (1.0 - self.opacity).clamp(0.0, 1.0);
            let veil = Color {
                a: alpha,
                ..FADE_COLOR
            };
            frame.fill_rectangle(rect.position(), rect.size(), veil);
        }

        // The lens only shows the image it was computed for
        let lens_matches = self.magnifier.source.as_deref() == Some(image.url.as_str());
        if self.magnifier.visible && lens_matches {
            let lens_rect = Rectangle::new(self.magnifier.lens_origin, self.lens);
            let zoomed = Size::new(rect.width * self.zoom, rect.height * self.zoom);
            let offset =
                magnifier::zoomed_offset(self.lens, zoomed, self.magnifier.background_position);

            frame.with_clip(lens_rect, |lens| {
                lens.fill_rectangle(Point::ORIGIN, self.lens, FADE_COLOR);
                lens.draw_image(Rectangle::new(offset, zoomed), &image.handle);
            });

            frame.stroke(
                &Path::rectangle(lens_rect.position(), lens_rect.size()),
                Stroke::default().with_color(Color::WHITE).with_width(2.0),
            );
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let over_image = match (cursor.position_in(bounds), self.image_rect(bounds)) {
                    (Some(position), Some(rect)) if rect.contains(position) => {
                        Some((position, rect))
                    }
                    _ => None,
                };

                match over_image {
                    Some((position, image_bounds)) => {
                        state.hovering = true;
                        return (
                            canvas::event::Status::Captured,
                            Some(Message::PointerMoved { position, image_bounds }),
                        );
                    }
                    None if state.hovering => {
                        state.hovering = false;
                        return (canvas::event::Status::Ignored, Some(Message::PointerLeft));
                    }
                    None => {}
                }
            }

            canvas::Event::Mouse(mouse::Event::CursorLeft) => {
                if state.hovering {
                    state.hovering = false;
                    return (canvas::event::Status::Ignored, Some(Message::PointerLeft));
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        _bounds: Rectangle,
        _cursor: Cursor,
    ) -> mouse::Interaction {
        if state.hovering {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

/// Whether the pointer is currently over the image
#[derive(Debug, Clone, Default)]
pub struct HoverState {
    pub hovering: bool,
}
