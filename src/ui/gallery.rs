/// Thumbnail grid
///
/// Tiles are appended in the order they are given and never re-sorted.
/// Each tile remembers the descriptor it was built from, so a click opens
/// the lightbox with that image's title and description.

use iced::widget::{button, column, container, image, scrollable, text, Column};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;

use crate::error::GalleryError;
use crate::state::config::Locale;
use crate::state::data::{ImageDescriptor, LoadedImage};
use crate::state::pagination::LoadMore;
use crate::Message;

/// Edge of a grid cell in logical pixels
const TILE_SIZE: f32 = 200.0;
const GRID_SPACING: f32 = 10.0;

#[derive(Debug, Clone)]
pub enum Thumbnail {
    Loading,
    Ready(LoadedImage),
    Failed,
}

/// One clickable cell of the grid
#[derive(Debug, Clone)]
pub struct Tile {
    pub descriptor: ImageDescriptor,
    /// Site-relative path of the full image
    pub url: String,
    pub thumbnail: Thumbnail,
}

#[derive(Debug, Default)]
pub struct Gallery {
    tiles: Vec<Tile>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Append one tile per descriptor.
    ///
    /// Returns `(tile index, url)` for every thumbnail that needs loading.
    pub fn append(
        &mut self,
        batch: &[ImageDescriptor],
        image_base: &str,
    ) -> Vec<(usize, String)> {
        batch
            .iter()
            .map(|descriptor| {
                let url = descriptor.resolve_url(image_base);
                let index = self.tiles.len();
                self.tiles.push(Tile {
                    descriptor: descriptor.clone(),
                    url: url.clone(),
                    thumbnail: Thumbnail::Loading,
                });
                (index, url)
            })
            .collect()
    }

    pub fn thumbnail_loaded(&mut self, index: usize, result: Result<LoadedImage, GalleryError>) {
        let Some(tile) = self.tiles.get_mut(index) else {
            return;
        };
        tile.thumbnail = match result {
            Ok(image) => Thumbnail::Ready(image),
            Err(e) => {
                tracing::warn!("Thumbnail failed for {}: {}", tile.url, e);
                Thumbnail::Failed
            }
        };
    }

    /// Grid of tiles followed by the "load more" button, if inserted
    pub fn view(&self, load_more: LoadMore, locale: Locale) -> Element<Message> {
        let tiles: Vec<Element<Message>> = self
            .tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| tile_view(index, tile))
            .collect();

        let grid = Wrap::with_elements(tiles)
            .spacing(GRID_SPACING)
            .line_spacing(GRID_SPACING);

        let mut content: Column<Message> = column![grid]
            .spacing(20)
            .padding(20)
            .align_x(Alignment::Center)
            .width(Length::Fill);

        match load_more {
            LoadMore::Hidden => {}
            LoadMore::Active => {
                content = content.push(
                    button(text(locale.load_more()))
                        .on_press(Message::LoadMore)
                        .padding(10),
                );
            }
            LoadMore::Exhausted => {
                // No on_press: the button renders disabled
                content = content.push(button(text(locale.no_more_images())).padding(10));
            }
        }

        scrollable(content).height(Length::Fill).into()
    }
}

fn tile_view(index: usize, tile: &Tile) -> Element<Message> {
    let face: Element<Message> = match &tile.thumbnail {
        Thumbnail::Ready(thumb) => image(thumb.handle.clone())
            .width(Length::Fixed(TILE_SIZE))
            .height(Length::Fixed(TILE_SIZE))
            .content_fit(ContentFit::Cover)
            .into(),
        Thumbnail::Loading => placeholder(text("…").size(24).into()),
        // Alt text
        Thumbnail::Failed => placeholder(text(&tile.descriptor.title).size(14).into()),
    };

    button(face)
        .on_press(Message::TileClicked(index))
        .padding(0)
        .style(button::text)
        .into()
}

fn placeholder(content: Element<Message>) -> Element<Message> {
    container(content)
        .width(Length::Fixed(TILE_SIZE))
        .height(Length::Fixed(TILE_SIZE))
        .center_x(Length::Fixed(TILE_SIZE))
        .center_y(Length::Fixed(TILE_SIZE))
        .style(container::rounded_box)
        .into()
}
