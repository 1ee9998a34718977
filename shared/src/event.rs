use serde::{Deserialize, Serialize};
use std::fmt;

use crate::capabilities::{MediaResult, ShareResult, UploadResult};
use crate::model::Screen;
use crate::upload::MediaSource;

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(PhotoId);
typed_id!(SubmissionId);

impl SubmissionId {
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

// --- Event enum ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle & navigation
    AppStarted,
    /// Replaces the photo data with a JSON fixture supplied by the shell.
    LibraryLoaded {
        fixture: String,
    },
    ScreenChanged {
        screen: Screen,
    },
    PhotoTapped {
        photo_id: PhotoId,
    },
    BackRequested,
    RefreshRequested,

    // Upload flow
    SelectFromLibraryRequested,
    CaptureFromCameraRequested,
    CancelUploadRequested,
    SubmitUploadRequested,
    UploadSuccessAcknowledged,

    // Photo detail
    ToggleLiked {
        photo_id: PhotoId,
    },
    ToggleBookmarked {
        photo_id: PhotoId,
    },
    ShareRequested {
        photo_id: PhotoId,
    },

    ErrorDismissed,

    // Capability responses
    MediaPermissionResolved {
        source: MediaSource,
        result: MediaResult,
    },
    MediaPicked {
        source: MediaSource,
        result: MediaResult,
    },
    UploadResolved {
        submission: SubmissionId,
        result: UploadResult,
    },
    ShareResolved {
        photo_id: PhotoId,
        result: ShareResult,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::LibraryLoaded { .. } => "library_loaded",
            Self::ScreenChanged { .. } => "screen_changed",
            Self::PhotoTapped { .. } => "photo_tapped",
            Self::BackRequested => "back_requested",
            Self::RefreshRequested => "refresh_requested",
            Self::SelectFromLibraryRequested => "select_from_library_requested",
            Self::CaptureFromCameraRequested => "capture_from_camera_requested",
            Self::CancelUploadRequested => "cancel_upload_requested",
            Self::SubmitUploadRequested => "submit_upload_requested",
            Self::UploadSuccessAcknowledged => "upload_success_acknowledged",
            Self::ToggleLiked { .. } => "toggle_liked",
            Self::ToggleBookmarked { .. } => "toggle_bookmarked",
            Self::ShareRequested { .. } => "share_requested",
            Self::ErrorDismissed => "error_dismissed",
            Self::MediaPermissionResolved { .. } => "media_permission_resolved",
            Self::MediaPicked { .. } => "media_picked",
            Self::UploadResolved { .. } => "upload_resolved",
            Self::ShareResolved { .. } => "share_resolved",
        }
    }

    /// Capability responses and fixtures come from the shell; everything else is a tap.
    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Self::LibraryLoaded { .. }
                | Self::MediaPermissionResolved { .. }
                | Self::MediaPicked { .. }
                | Self::UploadResolved { .. }
                | Self::ShareResolved { .. }
        )
    }
}
