/// Modal lightbox state machine
///
/// CLOSED → OPEN on a tile click, OPEN → CLOSED on the close control or on a
/// press whose target is the backdrop itself. Asynchronous results
/// (full image, variant check, toggle preload) carry the generation they
/// were requested under and are dropped when it no longer matches.
///
/// A toggle swaps the image through a fade: opacity ramps down over
/// `FADE_STEPS` ticks, the preloaded image replaces the displayed one, and
/// opacity ramps back up over as many ticks.

use iced::{Point, Rectangle, Size};

use super::data::LoadedImage;
use crate::source::variant;
use crate::ui::magnifier::{self, MagnifierState};

/// Identity of a pressable region of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementId {
    /// The dimmed area around the content
    Backdrop,
    /// The content panel (image, title, description, toggle)
    Content,
    /// The close button
    CloseControl,
}

/// Whether a monochrome sibling exists for the open image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantStatus {
    Checking,
    Available,
    Absent,
}

/// Identifies one toggle request within one open modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleTicket {
    pub generation: u64,
    pub toggle: u64,
}

/// Ticks in each half of a toggle fade
pub const FADE_STEPS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FadePhase {
    Out,
    In,
}

/// A toggle fade in progress
#[derive(Debug, Clone)]
struct Fade {
    ticket: ToggleTicket,
    phase: FadePhase,
    step: u32,
    /// Swapped in at the bottom of the fade-out
    incoming: Option<LoadedImage>,
}

/// What the app must load after a toggle change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleRequest {
    pub ticket: ToggleTicket,
    pub target_url: String,
}

/// Everything shown while the modal is open
#[derive(Debug, Clone)]
pub struct ModalState {
    /// Color (original) image path
    pub source_url: String,
    pub title: String,
    pub description: String,
    pub monochrome_checked: bool,
    pub variant: VariantStatus,
    /// Image currently drawn; the tile thumbnail until the full image arrives
    pub displayed: Option<LoadedImage>,
    /// Path the displayed image should come from
    pub showing_url: String,
    /// 1.0 = fully visible, 0.0 = faded out
    pub opacity: f32,
    fade: Option<Fade>,
    pub magnifier: MagnifierState,
}

#[derive(Debug, Default)]
pub struct ModalController {
    state: Option<ModalState>,
    generation: u64,
    toggle_generation: u64,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&ModalState> {
        self.state.as_ref()
    }

    /// True while the modal opened under `generation` is still showing
    pub fn is_current(&self, generation: u64) -> bool {
        self.state.is_some() && self.generation == generation
    }

    /// Open (or re-open) the modal for an image. Returns the new generation.
    pub fn open(
        &mut self,
        source_url: String,
        title: String,
        description: String,
        preview: Option<LoadedImage>,
    ) -> u64 {
        self.generation += 1;

        self.state = Some(ModalState {
            showing_url: source_url.clone(),
            source_url,
            title,
            description,
            monochrome_checked: false,
            variant: VariantStatus::Checking,
            displayed: preview,
            opacity: 1.0,
            fade: None,
            magnifier: MagnifierState::hidden(),
        });

        self.generation
    }

    /// Close the modal. Closing a closed modal does nothing.
    pub fn close(&mut self) -> bool {
        self.state.take().is_some()
    }

    /// A press landed on `target`; only the backdrop itself closes the modal.
    pub fn pointer_pressed(&mut self, target: ElementId) -> bool {
        match target {
            ElementId::Backdrop | ElementId::CloseControl => self.close(),
            ElementId::Content => false,
        }
    }

    /// The full-size image finished loading
    pub fn image_loaded(&mut self, generation: u64, image: LoadedImage) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        match self.state.as_mut() {
            // A toggle may have moved on to another source meanwhile
            Some(state) if state.showing_url == image.url => {
                state.displayed = Some(image);
                true
            }
            _ => false,
        }
    }

    /// The monochrome variant check resolved
    pub fn variant_checked(&mut self, generation: u64, exists: bool) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        match self.state.as_mut() {
            Some(state) => {
                state.variant = if exists {
                    VariantStatus::Available
                } else {
                    VariantStatus::Absent
                };
                true
            }
            None => false,
        }
    }

    /// The toggle changed; returns the image to preload.
    pub fn toggle(&mut self, checked: bool, suffix: &str) -> Option<ToggleRequest> {
        let state = self.state.as_mut()?;
        if state.variant != VariantStatus::Available {
            return None;
        }

        let target_url = if checked {
            variant::variant_url(&state.source_url, suffix)?
        } else {
            state.source_url.clone()
        };

        self.toggle_generation += 1;
        state.monochrome_checked = checked;
        state.fade = None;
        state.opacity = 1.0;

        Some(ToggleRequest {
            ticket: ToggleTicket {
                generation: self.generation,
                toggle: self.toggle_generation,
            },
            target_url,
        })
    }

    fn is_current_toggle(&self, ticket: ToggleTicket) -> bool {
        self.is_current(ticket.generation) && self.toggle_generation == ticket.toggle
    }

    /// The toggle target finished preloading: start the fade-out.
    ///
    /// Returns true when the caller should schedule the first fade tick.
    pub fn variant_preloaded(&mut self, ticket: ToggleTicket, image: LoadedImage) -> bool {
        if !self.is_current_toggle(ticket) {
            return false;
        }
        match self.state.as_mut() {
            Some(state) => {
                state.showing_url = image.url.clone();
                state.fade = Some(Fade {
                    ticket,
                    phase: FadePhase::Out,
                    step: 0,
                    incoming: Some(image),
                });
                true
            }
            None => false,
        }
    }

    /// Advance the fade by one tick. Returns true while more ticks are needed.
    pub fn fade_tick(&mut self, ticket: ToggleTicket) -> bool {
        if !self.is_current_toggle(ticket) {
            return false;
        }
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        let Some(fade) = state.fade.as_mut().filter(|fade| fade.ticket == ticket) else {
            return false;
        };

        fade.step += 1;
        let progress = fade.step.min(FADE_STEPS) as f32 / FADE_STEPS as f32;

        match fade.phase {
            FadePhase::Out if fade.step >= FADE_STEPS => {
                if let Some(image) = fade.incoming.take() {
                    state.displayed = Some(image);
                }
                fade.phase = FadePhase::In;
                fade.step = 0;
                state.opacity = 0.0;
                true
            }
            FadePhase::Out => {
                state.opacity = 1.0 - progress;
                true
            }
            FadePhase::In if fade.step >= FADE_STEPS => {
                state.opacity = 1.0;
                state.fade = None;
                false
            }
            FadePhase::In => {
                state.opacity = progress;
                true
            }
        }
    }

    /// Pointer moved over the enlarged image
    pub fn pointer_moved(&mut self, position: Point, image_bounds: Rectangle, lens: Size) {
        if let Some(state) = self.state.as_mut() {
            let source = match &state.displayed {
                Some(image) => image.url.clone(),
                None => state.showing_url.clone(),
            };
            state.magnifier = magnifier::track(position, image_bounds, lens, &source);
        }
    }

    /// Pointer left the enlarged image
    pub fn pointer_left(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.magnifier = MagnifierState::hidden();
        }
    }
}
