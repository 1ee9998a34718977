use serde::{Deserialize, Serialize};

use crate::capabilities::PickConfig;
use crate::event::PhotoId;
use crate::interactions::InteractionTracker;
use crate::library::{PhotoRecord, SampleLibrary};
use crate::upload::{MediaSource, UploadConfig, UploadSubmission};
use crate::{AppError, UPLOAD_SUCCESS_MESSAGE};

/// Logical screen identifiers understood by the navigation shell.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Feed,
    Upload,
    Profile,
    PhotoDetail { photo_id: PhotoId },
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    UploadSucceeded,
}

impl Notice {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::UploadSucceeded => UPLOAD_SUCCESS_MESSAGE,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Model {
    pub screen: Screen,
    /// Screens pushed over the current tab, most recent last.
    pub history: Vec<Screen>,

    // Feed
    pub library: SampleLibrary,
    pub feed: Vec<PhotoRecord>,

    // Upload
    pub submission: UploadSubmission,
    pub pending_media: Option<MediaSource>,
    pub upload_config: UploadConfig,
    pub pick_config: PickConfig,

    // Photo detail
    pub interactions: InteractionTracker,

    // Generic UI state
    pub active_error: Option<AppError>,
    pub active_notice: Option<Notice>,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    #[must_use]
    pub fn is_media_request_pending(&self) -> bool {
        self.pending_media.is_some()
    }
}
