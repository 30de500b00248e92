use clap::Parser;
use iced::widget::{
    button, canvas, center, checkbox, column, container, mouse_area, opaque, row, stack, text,
    Column, Space,
};
use iced::{Alignment, Border, Color, Element, Length, Point, Rectangle, Size, Task, Theme};
use std::ops::Range;
use std::path::PathBuf;
use tracing::{debug, info, warn};

mod error;
mod source;
mod state;
mod ui;

use error::GalleryError;
use source::host::SiteHost;
use source::resolver::{self, Resolution, SourceOrigin};
use source::{thumbnail, variant};
use state::config::{GalleryConfig, Locale};
use state::data::{GallerySet, LoadedImage};
use state::modal::{
    ElementId, ModalController, ModalState, ToggleTicket, VariantStatus, FADE_STEPS,
};
use state::pagination::Pagination;
use ui::gallery::{Gallery, Thumbnail};
use ui::lightbox::Lightbox;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    name = "portfolio-gallery",
    version,
    about = "Photo portfolio gallery with lightbox, B/W toggle and magnifier"
)]
struct Cli {
    /// Site root: an http(s) URL or a local directory (overrides the config)
    site: Option<String>,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// UI language
    #[arg(long, value_enum)]
    locale: Option<Locale>,
}

/// Main application state
struct GalleryApp {
    config: GalleryConfig,
    host: SiteHost,
    /// Every known image, display order
    images: GallerySet,
    pagination: Pagination,
    gallery: Gallery,
    modal: ModalController,
    /// Where the images came from, or the loading notice
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Manifest or probe finished
    GalleryResolved(Resolution),
    /// A grid thumbnail finished loading
    ThumbnailLoaded(usize, Result<LoadedImage, GalleryError>),
    /// User clicked "load more"
    LoadMore,
    /// User clicked a grid tile
    TileClicked(usize),
    /// A press landed on the overlay, the content panel or the close control
    ModalPressed(ElementId),
    /// Full-size image for the modal opened under this generation
    EnlargedLoaded(u64, Result<LoadedImage, GalleryError>),
    /// Monochrome variant check for the modal opened under this generation
    VariantChecked(u64, bool),
    /// User changed the B/W checkbox
    MonochromeToggled(bool),
    /// The toggle target finished preloading
    VariantPreloaded(ToggleTicket, Result<LoadedImage, GalleryError>),
    /// Next step of the toggle fade
    FadeTick(ToggleTicket),
    /// Pointer moved over the enlarged image (canvas coordinates)
    PointerMoved { position: Point, image_bounds: Rectangle },
    /// Pointer left the enlarged image
    PointerLeft,
}

impl GalleryApp {
    /// Create the application and start resolving the gallery
    fn new(config: GalleryConfig) -> (Self, Task<Message>) {
        let host = SiteHost::from_root(&config.site_root);
        info!("Portfolio gallery reading from {}", config.site_root);

        let task = Task::perform(
            resolver::resolve(host.clone(), config.clone()),
            Message::GalleryResolved,
        );

        let app = GalleryApp {
            pagination: Pagination::new(0, config.images_per_page),
            config,
            host,
            images: GallerySet::default(),
            gallery: Gallery::new(),
            modal: ModalController::new(),
            status: "Loading…".to_string(),
        };

        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::GalleryResolved(resolution) => {
                let origin = match resolution.origin {
                    SourceOrigin::Manifest => "manifest",
                    SourceOrigin::Probe => "auto-detected",
                };
                self.status = if resolution.images.is_empty() {
                    format!("No images found ({})", origin)
                } else {
                    origin.to_string()
                };

                self.images = resolution.images;
                self.pagination = Pagination::new(self.images.len(), self.config.images_per_page);

                let batch = self.pagination.load_next_batch();
                self.render(batch)
            }
            Message::LoadMore => match self.pagination.load_more_clicked() {
                Some(batch) => self.render(batch),
                None => Task::none(),
            },
            Message::ThumbnailLoaded(index, result) => {
                self.gallery.thumbnail_loaded(index, result);
                Task::none()
            }
            Message::TileClicked(index) => self.open_modal(index),
            Message::ModalPressed(target) => {
                if self.modal.pointer_pressed(target) {
                    debug!("Modal closed by {:?}", target);
                }
                Task::none()
            }
            Message::EnlargedLoaded(generation, result) => {
                match result {
                    Ok(image) => {
                        self.modal.image_loaded(generation, image);
                    }
                    Err(e) => warn!("Could not load enlarged image: {}", e),
                }
                Task::none()
            }
            Message::VariantChecked(generation, exists) => {
                self.modal.variant_checked(generation, exists);
                Task::none()
            }
            Message::MonochromeToggled(checked) => {
                let suffix = &self.config.monochrome_suffix;
                let Some(request) = self.modal.toggle(checked, suffix) else {
                    return Task::none();
                };
                let ticket = request.ticket;
                let preload = variant::preload(
                    self.host.clone(),
                    request.target_url,
                    self.config.preview_max,
                );

                Task::perform(preload, move |result| Message::VariantPreloaded(ticket, result))
            }
            Message::VariantPreloaded(ticket, result) => {
                let image = match result {
                    Ok(image) => image,
                    Err(e) => {
                        warn!("Could not preload toggle target: {}", e);
                        return Task::none();
                    }
                };

                if self.modal.variant_preloaded(ticket, image) {
                    self.next_fade_tick(ticket)
                } else {
                    Task::none()
                }
            }
            Message::FadeTick(ticket) => {
                if self.modal.fade_tick(ticket) {
                    self.next_fade_tick(ticket)
                } else {
                    Task::none()
                }
            }
            Message::PointerMoved { position, image_bounds } => {
                let lens = Size::new(self.config.magnifier_lens, self.config.magnifier_lens);
                self.modal.pointer_moved(position, image_bounds, lens);
                Task::none()
            }
            Message::PointerLeft => {
                self.modal.pointer_left();
                Task::none()
            }
        }
    }

    /// Append a batch of tiles and start loading their thumbnails
    fn render(&mut self, batch: Range<usize>) -> Task<Message> {
        let loads = self
            .gallery
            .append(self.images.slice(batch), &self.config.image_base);

        Task::batch(loads.into_iter().map(|(index, url)| {
            Task::perform(
                thumbnail::load_thumbnail(self.host.clone(), url, self.config.thumbnail_size),
                move |result| Message::ThumbnailLoaded(index, result),
            )
        }))
    }

    /// Each half of the fade spans the configured fade delay
    fn next_fade_tick(&self, ticket: ToggleTicket) -> Task<Message> {
        let interval = self.config.fade_delay() / FADE_STEPS;
        Task::perform(
            async move { tokio::time::sleep(interval).await },
            move |_| Message::FadeTick(ticket),
        )
    }

    /// Open the lightbox for a tile, then load the full image and check for a B/W variant
    fn open_modal(&mut self, index: usize) -> Task<Message> {
        let Some(tile) = self.gallery.tile(index) else {
            return Task::none();
        };

        let preview = match &tile.thumbnail {
            Thumbnail::Ready(thumb) => Some(LoadedImage {
                url: tile.url.clone(),
                ..thumb.clone()
            }),
            _ => None,
        };
        let url = tile.url.clone();
        let generation = self.modal.open(
            url.clone(),
            tile.descriptor.title.clone(),
            tile.descriptor.description.clone(),
            preview,
        );

        Task::batch([
            Task::perform(
                thumbnail::load_full(self.host.clone(), url.clone(), self.config.preview_max),
                move |result| Message::EnlargedLoaded(generation, result),
            ),
            Task::perform(
                variant::check_variant_exists(
                    self.host.clone(),
                    url,
                    self.config.monochrome_suffix.clone(),
                ),
                move |exists| Message::VariantChecked(generation, exists),
            ),
        ])
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let locale = self.config.locale;

        let page: Column<Message> = column![
            text("Portfolio").size(40),
            text(self.status_line()).size(14),
            self.gallery.view(self.pagination.load_more(), locale),
        ]
        .spacing(10)
        .padding(20)
        .align_x(Alignment::Center);

        match self.modal.state() {
            Some(state) => stack![page, self.modal_view(state, locale)].into(),
            None => page.into(),
        }
    }

    /// Progress through the gallery, or the loading / empty notice
    fn status_line(&self) -> String {
        if self.images.is_empty() {
            return self.status.clone();
        }
        format!(
            "Showing {} of {} images ({})",
            self.pagination.cursor(),
            self.images.len(),
            self.status
        )
    }

    /// Overlay with the enlarged image, its title and description
    fn modal_view<'a>(&'a self, state: &'a ModalState, locale: Locale) -> Element<'a, Message> {
        let close = button(text(locale.close()))
            .on_press(Message::ModalPressed(ElementId::CloseControl))
            .style(button::secondary);

        let lightbox = canvas(Lightbox {
            image: state.displayed.as_ref(),
            opacity: state.opacity,
            magnifier: &state.magnifier,
            lens: Size::new(self.config.magnifier_lens, self.config.magnifier_lens),
            zoom: self.config.magnifier_zoom,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let mut details = column![
            row![Space::with_width(Length::Fill), close],
            lightbox,
            text(&state.title).size(28),
            text(&state.description).size(16),
        ]
        .spacing(12);

        // Hidden until the variant check confirms a B/W sibling
        if state.variant == VariantStatus::Available {
            details = details.push(
                checkbox(locale.monochrome_toggle(), state.monochrome_checked)
                    .on_toggle(Message::MonochromeToggled),
            );
        }

        let content = mouse_area(
            container(details)
                .padding(20)
                .max_width(1200.0)
                .height(Length::Fill)
                .style(|_theme: &Theme| container::Style {
                    background: Some(Color::from_rgb8(20, 20, 20).into()),
                    text_color: Some(Color::WHITE),
                    border: Border {
                        radius: 8.0.into(),
                        ..Border::default()
                    },
                    ..container::Style::default()
                }),
        )
        .on_press(Message::ModalPressed(ElementId::Content));

        let backdrop = mouse_area(center(content).padding(40).style(|_theme: &Theme| {
            container::Style {
                background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.85).into()),
                ..container::Style::default()
            }
        }))
        .on_press(Message::ModalPressed(ElementId::Backdrop));

        opaque(backdrop)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Stdout logging, filtered by RUST_LOG
fn setup_logging() {
    use tracing_subscriber::prelude::*;

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    // Default to info for iced/wgpu, debug for the gallery
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "info,wgpu_core=warn,wgpu_hal=warn,portfolio_gallery=debug",
        )
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .init();
}

/// Config file, then command line overrides
fn load_config(cli: &Cli) -> GalleryConfig {
    let path = cli.config.clone().or_else(GalleryConfig::default_path);

    let mut config = match path {
        Some(path) => match GalleryConfig::load(&path) {
            Ok(config) => {
                debug!("Config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::error!("{}; using defaults", e);
                GalleryConfig::default()
            }
        },
        None => GalleryConfig::default(),
    };

    if let Some(site) = &cli.site {
        config.site_root = site.clone();
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    config
}

fn main() -> iced::Result {
    setup_logging();

    let cli = Cli::parse();
    let config = load_config(&cli);

    iced::application("Portfolio", GalleryApp::update, GalleryApp::view)
        .theme(GalleryApp::theme)
        .centered()
        .run_with(move || GalleryApp::new(config))
}
