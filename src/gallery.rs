//! Gallery navigation for a listing's images.
//!
//! Two independent pieces of state exist per card: the inline carousel, which
//! wraps around at both ends, and the full-screen viewer, which clamps and
//! always opens on the first image. Actions arrive by name and are resolved
//! through [`ACTION_TABLE`] before touching any state.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryAction {
    Prev,
    Next,
    Open,
    Close,
}

/// Action names accepted from the page, and what they dispatch to.
pub const ACTION_TABLE: [(&str, GalleryAction); 4] = [
    ("prev", GalleryAction::Prev),
    ("next", GalleryAction::Next),
    ("open", GalleryAction::Open),
    ("close", GalleryAction::Close),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GalleryError {
    #[error("unknown gallery action '{0}'")]
    UnknownAction(String),
    #[error("image index {index} is out of range for {total} images")]
    IndexOutOfRange { index: usize, total: usize },
    #[error("a gallery needs at least one image")]
    NoImages,
}

impl FromStr for GalleryAction {
    type Err = GalleryError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ACTION_TABLE
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, action)| *action)
            .ok_or_else(|| GalleryError::UnknownAction(name.to_string()))
    }
}

/// Where prev/next were clicked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryContext {
    #[default]
    Inline,
    Modal,
}

/// What the page must do with body scrolling after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollEffect {
    Suspend,
    Restore,
    Unchanged,
}

// Carousel on the card itself. Wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineGallery {
    index: usize,
    total: usize,
}

impl InlineGallery {
    pub fn at(index: usize, total: usize) -> Result<Self, GalleryError> {
        if total == 0 {
            return Err(GalleryError::NoImages);
        }
        if index >= total {
            return Err(GalleryError::IndexOutOfRange { index, total });
        }
        Ok(InlineGallery { index, total })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn prev(&mut self) {
        self.index = (self.index + self.total - 1) % self.total;
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.total;
    }
}

// Full-screen viewer. Clamps, and resets to the first image on open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalGallery {
    images: Vec<String>,
    index: usize,
    open: bool,
}

impl ModalGallery {
    pub fn restore(images: Vec<String>, index: usize, open: bool) -> Result<Self, GalleryError> {
        let total = images.len();
        if total == 0 {
            return Err(GalleryError::NoImages);
        }
        if index >= total {
            return Err(GalleryError::IndexOutOfRange { index, total });
        }
        Ok(ModalGallery { images, index, open })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.images.len()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn current_image(&self) -> &str {
        &self.images[self.index]
    }

    pub fn prev_enabled(&self) -> bool {
        self.index > 0
    }

    pub fn next_enabled(&self) -> bool {
        self.index + 1 < self.images.len()
    }

    pub fn open(&mut self) -> ScrollEffect {
        self.index = 0;
        self.open = true;
        ScrollEffect::Suspend
    }

    pub fn close(&mut self) -> ScrollEffect {
        self.open = false;
        ScrollEffect::Restore
    }

    pub fn prev(&mut self) {
        if self.prev_enabled() {
            self.index -= 1;
        }
    }

    pub fn next(&mut self) {
        if self.next_enabled() {
            self.index += 1;
        }
    }
}

/// Both gallery states for one rendered card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryState {
    pub inline: InlineGallery,
    pub modal: ModalGallery,
}

impl GalleryState {
    /// Rebuilds the state a page reports back (the page owns it between requests).
    pub fn restore(
        images: Vec<String>,
        inline_index: usize,
        modal_index: usize,
        modal_open: bool,
    ) -> Result<Self, GalleryError> {
        let inline = InlineGallery::at(inline_index, images.len())?;
        let modal = ModalGallery::restore(images, modal_index, modal_open)?;
        Ok(GalleryState { inline, modal })
    }

    /// Applies one action. Opening ignores where the inline carousel currently is.
    pub fn dispatch(&mut self, context: GalleryContext, action: GalleryAction) -> ScrollEffect {
        match (action, context) {
            (GalleryAction::Open, _) => self.modal.open(),
            (GalleryAction::Close, _) => self.modal.close(),
            (GalleryAction::Prev, GalleryContext::Inline) => {
                self.inline.prev();
                ScrollEffect::Unchanged
            }
            (GalleryAction::Next, GalleryContext::Inline) => {
                self.inline.next();
                ScrollEffect::Unchanged
            }
            (GalleryAction::Prev, GalleryContext::Modal) => {
                self.modal.prev();
                ScrollEffect::Unchanged
            }
            (GalleryAction::Next, GalleryContext::Modal) => {
                self.modal.next();
                ScrollEffect::Unchanged
            }
        }
    }

    pub fn dispatch_named(
        &mut self,
        context: GalleryContext,
        name: &str,
    ) -> Result<ScrollEffect, GalleryError> {
        let action: GalleryAction = name.parse()?;
        Ok(self.dispatch(context, action))
    }

    pub fn inline_image(&self) -> &str {
        &self.modal.images[self.inline.index]
    }
}

/// "2 / 5" style counter shown under an image.
pub fn counter_label(index: usize, total: usize) -> String {
    format!("{} / {}", index + 1, total)
}
