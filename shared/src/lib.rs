// lib.rs - shared core for the photo-sharing shell

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod capabilities;
pub mod event;
pub mod interactions;
pub mod library;
pub mod model;
pub mod permissions;
pub mod upload;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub use app::{App, ViewModel};
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::{Event, PhotoId, SubmissionId};
pub use interactions::{InteractionState, InteractionTracker};
pub use model::{Model, Notice, Screen};
pub use permissions::{PermissionKind, PermissionOutcome};
pub use upload::{MediaHandle, MediaSource, UploadStatus, UploadSubmission};

pub const MAX_HANDLE_LENGTH: usize = 4096;
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);
pub const MIN_UPLOAD_TIMEOUT: Duration = Duration::from_secs(1);
pub const MAX_UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);
pub const SIMULATED_UPLOAD_DELAY: Duration = Duration::from_secs(2);
pub const SHARE_MESSAGE_PREFIX: &str = "Check out this amazing photo!";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Photo uploaded successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    LibraryPermissionDenied,
    CameraPermissionDenied,
    InvalidState,
    UploadFailed,
    Timeout,
    Media,
    NotFound,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::LibraryPermissionDenied => "LIBRARY_PERMISSION_DENIED",
            Self::CameraPermissionDenied => "CAMERA_PERMISSION_DENIED",
            Self::InvalidState => "INVALID_STATE",
            Self::UploadFailed => "UPLOAD_FAILED",
            Self::Timeout => "TIMEOUT",
            Self::Media => "MEDIA_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::UploadFailed | Self::Timeout | Self::Media => {
                ErrorSeverity::Transient
            }
            Self::LibraryPermissionDenied
            | Self::CameraPermissionDenied
            | Self::InvalidState
            | Self::NotFound
            | Self::Internal => ErrorSeverity::Permanent,
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::UploadFailed | Self::Timeout | Self::Media)
    }

    #[must_use]
    pub const fn is_permission_denial(self) -> bool {
        matches!(
            self,
            Self::LibraryPermissionDenied | Self::CameraPermissionDenied
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Text suitable for an alert. Permission denials and upload failures carry
    /// their own wording; the rest map to fixed copy.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::LibraryPermissionDenied
            | ErrorKind::CameraPermissionDenied
            | ErrorKind::UploadFailed => self.message.clone(),
            ErrorKind::Timeout => "The upload timed out. Please try again.".into(),
            ErrorKind::Media => "Unable to access your photos. Please try again.".into(),
            ErrorKind::NotFound => "The requested photo could not be found.".into(),
            ErrorKind::InvalidState => "That action isn't available right now.".into(),
            ErrorKind::Internal => {
                "An unexpected error occurred. Please try again.".into()
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

pub mod app {
    use super::*;
    use crate::capabilities::{
        MediaOutput, MediaResult, ShareOutput, ShareResult, UploadRequest,
        UploadResult,
    };
    use crate::library::{share_message, Comment, PhotoRecord, PhotoSource, SampleLibrary};
    use crate::permissions;
    use tracing::{debug, info, warn};

    #[derive(Default)]
    pub struct App;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
    pub struct PhotoTile {
        pub id: String,
        pub uri: String,
        pub likes: u64,
        pub user: String,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
    pub struct UploadPanel {
        pub status: UploadStatus,
        pub preview_uri: Option<String>,
        pub can_select: bool,
        pub can_cancel: bool,
        pub can_submit: bool,
        pub is_uploading: bool,
        pub submit_label: String,
        pub failure_message: Option<String>,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
    pub struct PhotoDetailView {
        pub id: String,
        pub image_uri: String,
        pub user: String,
        pub user_avatar: String,
        pub likes_text: String,
        pub liked: bool,
        pub bookmarked: bool,
        pub caption: String,
        pub location: String,
        pub timestamp: String,
        pub comments_header: String,
        pub comments: Vec<Comment>,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
    pub struct ProfileView {
        pub name: String,
        pub username: String,
        pub bio: String,
        pub avatar_uri: String,
        pub photo_count: String,
        pub followers: String,
        pub following: String,
        pub photos: Vec<PhotoTile>,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
    pub struct ViewModel {
        pub screen: Screen,
        pub feed: Vec<PhotoTile>,
        pub profile: Option<ProfileView>,
        pub upload: Option<UploadPanel>,
        pub photo: Option<PhotoDetailView>,
        pub error_message: Option<String>,
        pub notice: Option<String>,
    }

    impl App {
        fn navigate_to(model: &mut Model, screen: Screen, caps: &Capabilities) {
            let previous = std::mem::replace(&mut model.screen, screen.clone());
            Self::on_screen_left(model, &previous);
            model.history.push(previous);
            caps.navigator.push(screen);
        }

        /// The upload screen owns the pending submission. Leaving it drops any
        /// unanswered media request, and drops the selection unless an upload
        /// is already in flight.
        fn on_screen_left(model: &mut Model, left: &Screen) {
            if *left != Screen::Upload || model.screen == Screen::Upload {
                return;
            }
            if let Some(source) = model.pending_media.take() {
                debug!(?source, "dropped pending media request on leaving upload screen");
            }
            let was_succeeded = model.submission.status() == UploadStatus::Succeeded;
            if model.submission.reset() {
                if was_succeeded {
                    model.active_notice = None;
                }
                debug!("submission reset on leaving upload screen");
            } else {
                info!(
                    status = ?model.submission.status(),
                    "left upload screen with submission in flight"
                );
            }
        }

        fn begin_media_request(model: &mut Model, source: MediaSource, caps: &Capabilities) {
            if let Some(pending) = model.pending_media {
                warn!(?pending, ?source, "media request already pending, rejecting");
                model.set_error(
                    AppError::new(ErrorKind::InvalidState, "A photo request is already pending")
                        .with_context("pending", format!("{pending:?}")),
                );
                return;
            }

            if let Err(e) = model.submission.ensure_can_select() {
                warn!(error = %e, ?source, "selection rejected");
                model.set_error(e.into());
                return;
            }

            model.pending_media = Some(source);
            caps.media
                .request_permission(source.permission(), move |result| {
                    Event::MediaPermissionResolved { source, result }
                });
        }

        fn on_permission_resolved(
            model: &mut Model,
            source: MediaSource,
            result: MediaResult,
            caps: &Capabilities,
        ) {
            if model.pending_media != Some(source) {
                warn!(?source, "permission result without matching request, ignoring");
                return;
            }

            match permissions::check_permission_result(source.permission(), result) {
                Ok(()) => {
                    let config = model.pick_config.clone();
                    match source {
                        MediaSource::Library => caps.media.pick_from_library(config, move |result| {
                            Event::MediaPicked { source, result }
                        }),
                        MediaSource::Camera => caps.media.capture_from_camera(config, move |result| {
                            Event::MediaPicked { source, result }
                        }),
                    }
                }
                Err(e) => {
                    model.pending_media = None;
                    info!(?source, code = e.code(), "media access not granted");
                    model.set_error(e);
                }
            }
        }

        fn on_media_picked(model: &mut Model, source: MediaSource, result: MediaResult) {
            if model.pending_media != Some(source) {
                warn!(?source, "media result without matching request, ignoring");
                return;
            }
            model.pending_media = None;

            match result {
                Ok(MediaOutput::Picked(handle)) => match model.submission.select(handle, source) {
                    Ok(()) => info!(?source, "image selected"),
                    Err(e) => {
                        warn!(error = %e, "picked image rejected");
                        model.set_error(e.into());
                    }
                },
                Ok(MediaOutput::Cancelled) => debug!(?source, "picker cancelled by user"),
                Ok(MediaOutput::Permission(_)) => {
                    model.set_error(AppError::new(
                        ErrorKind::Internal,
                        "Unexpected permission response to a pick request",
                    ));
                }
                Err(e) => {
                    warn!(error = %e, ?source, "media provider failed");
                    model.set_error(e.into());
                }
            }
        }

        fn submit(model: &mut Model, caps: &Capabilities) {
            match model.submission.begin_upload() {
                Ok(ticket) => {
                    info!(
                        submission = %ticket.submission,
                        attempt = model.submission.attempts(),
                        "upload started"
                    );
                    model.active_error = None;
                    let config = model.upload_config.clone().validated();
                    let submission = ticket.submission.clone();
                    caps.upload.submit(
                        UploadRequest {
                            submission: ticket.submission,
                            image: ticket.image,
                            timeout_ms: config.timeout_ms,
                            simulated_delay_ms: config.simulated_delay_ms,
                        },
                        move |result| Event::UploadResolved { submission, result },
                    );
                }
                Err(e) => {
                    warn!(error = %e, "submit rejected");
                    model.set_error(e.into());
                }
            }
        }

        fn on_upload_resolved(model: &mut Model, submission: &SubmissionId, result: UploadResult) {
            let remote_uri = result.as_ref().ok().and_then(|r| r.remote_uri.clone());
            let outcome = result.map(|_| ());
            match model.submission.complete(submission, outcome) {
                Ok(UploadStatus::Succeeded) => {
                    info!(%submission, remote_uri = remote_uri.as_deref(), "upload succeeded");
                    model.active_notice = Some(Notice::UploadSucceeded);
                }
                Ok(status) => match model.submission.last_failure().cloned() {
                    Some(failure) => {
                        warn!(%submission, error = %failure, "upload failed");
                        model.set_error(failure.into());
                    }
                    None => warn!(%submission, ?status, "upload finished without success"),
                },
                Err(e) => warn!(%submission, error = %e, "stale upload result ignored"),
            }
        }

        fn on_upload_acknowledged(model: &mut Model, caps: &Capabilities) {
            model.active_notice = None;
            match model.submission.acknowledge_success() {
                Ok(()) => {
                    Self::reload_feed(model);
                    if model.screen != Screen::Feed {
                        Self::navigate_to(model, Screen::Feed, caps);
                    }
                }
                Err(e) => warn!(error = %e, "acknowledgement without a successful upload"),
            }
        }

        fn load_library(model: &mut Model, fixture: &str) {
            match SampleLibrary::from_json(fixture) {
                Ok(library) => {
                    model.library = library;
                    Self::reload_feed(model);
                    info!(count = model.feed.len(), "photo library loaded");
                }
                Err(e) => {
                    warn!(error = %e, "photo library fixture rejected");
                    model.set_error(
                        AppError::new(ErrorKind::Internal, "Photo library could not be loaded")
                            .with_context("parse_error", e.to_string()),
                    );
                }
            }
        }

        fn open_photo(model: &mut Model, photo_id: PhotoId, caps: &Capabilities) {
            if model.library.detail(&photo_id).is_none() {
                model.set_error(
                    AppError::new(ErrorKind::NotFound, "Photo not found")
                        .with_context("photo_id", photo_id.as_str()),
                );
                return;
            }
            model.interactions.ensure(&photo_id);
            debug!(%photo_id, tracked = model.interactions.len(), "photo opened");
            Self::navigate_to(model, Screen::PhotoDetail { photo_id }, caps);
        }

        fn share(model: &mut Model, photo_id: PhotoId, caps: &Capabilities) {
            let Some(detail) = model.library.detail(&photo_id) else {
                model.set_error(
                    AppError::new(ErrorKind::NotFound, "Photo not found")
                        .with_context("photo_id", photo_id.as_str()),
                );
                return;
            };
            caps.sharing
                .share_text(share_message(&detail.caption), move |result| {
                    Event::ShareResolved { photo_id, result }
                });
        }

        fn on_share_resolved(photo_id: &PhotoId, result: ShareResult) {
            match result {
                Ok(ShareOutput::Shared) => info!(%photo_id, "photo shared"),
                Ok(ShareOutput::Dismissed) => debug!(%photo_id, "share sheet dismissed"),
                Err(e) => warn!(%photo_id, error = %e, "share failed"),
            }
        }

        fn reload_feed(model: &mut Model) {
            model.feed = model.library.feed();
            debug!(count = model.feed.len(), "feed reloaded");
        }

        fn tile(record: &PhotoRecord) -> PhotoTile {
            PhotoTile {
                id: record.id.as_str().to_owned(),
                uri: record.uri.clone(),
                likes: record.likes,
                user: record.user.clone(),
            }
        }

        fn build_upload_panel(model: &Model) -> UploadPanel {
            let submission = &model.submission;
            let is_uploading = submission.status() == UploadStatus::Uploading;
            UploadPanel {
                status: submission.status(),
                preview_uri: submission.image().map(|h| h.as_str().to_owned()),
                can_select: !model.is_media_request_pending()
                    && submission.ensure_can_select().is_ok(),
                can_cancel: submission.can_cancel(),
                can_submit: submission.can_submit(),
                is_uploading,
                submit_label: if is_uploading { "Uploading..." } else { "Upload" }.into(),
                failure_message: submission.last_failure().map(ToString::to_string),
            }
        }

        fn build_photo_detail(model: &Model, photo_id: &PhotoId) -> Option<PhotoDetailView> {
            let detail = model.library.detail(photo_id)?;
            let state = model.interactions.state(photo_id);
            let likes = model.interactions.display_like_count(photo_id, detail.likes);
            Some(PhotoDetailView {
                id: photo_id.as_str().to_owned(),
                image_uri: detail.uri,
                user: detail.user,
                user_avatar: detail.user_avatar,
                likes_text: format!("{likes} likes"),
                liked: state.liked,
                bookmarked: state.bookmarked,
                caption: detail.caption,
                location: detail.location,
                timestamp: detail.timestamp,
                comments_header: format!("Comments ({})", detail.comments.len()),
                comments: detail.comments,
            })
        }

        fn build_profile(model: &Model) -> ProfileView {
            let profile = model.library.profile();
            ProfileView {
                name: profile.name,
                username: format!("@{}", profile.username),
                bio: profile.bio,
                avatar_uri: profile.avatar_uri,
                photo_count: profile.photo_count.to_string(),
                followers: compact_count(profile.followers),
                following: compact_count(profile.following),
                photos: profile.photos.iter().map(Self::tile).collect(),
            }
        }
    }

    /// 1234 -> "1.2K", 842 -> "842".
    #[must_use]
    pub fn compact_count(n: u64) -> String {
        match n {
            0..=999 => n.to_string(),
            1_000..=999_999 => format!("{:.1}K", n as f64 / 1_000.0),
            _ => format!("{:.1}M", n as f64 / 1_000_000.0),
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(
                event = event.name(),
                user_initiated = event.is_user_initiated(),
                "update"
            );

            match event {
                Event::AppStarted => Self::reload_feed(model),

                Event::LibraryLoaded { fixture } => Self::load_library(model, &fixture),

                Event::ScreenChanged { screen } => {
                    if screen != model.screen {
                        let previous = std::mem::replace(&mut model.screen, screen);
                        Self::on_screen_left(model, &previous);
                        model.history.clear();
                    }
                }

                Event::PhotoTapped { photo_id } => Self::open_photo(model, photo_id, caps),

                Event::BackRequested => {
                    if let Some(previous) = model.history.pop() {
                        let left = std::mem::replace(&mut model.screen, previous);
                        Self::on_screen_left(model, &left);
                        caps.navigator.back();
                    } else {
                        debug!("back requested with empty history");
                    }
                }

                Event::RefreshRequested => Self::reload_feed(model),

                Event::SelectFromLibraryRequested => {
                    Self::begin_media_request(model, MediaSource::Library, caps);
                }

                Event::CaptureFromCameraRequested => {
                    Self::begin_media_request(model, MediaSource::Camera, caps);
                }

                Event::MediaPermissionResolved { source, result } => {
                    Self::on_permission_resolved(model, source, result, caps);
                }

                Event::MediaPicked { source, result } => {
                    Self::on_media_picked(model, source, result);
                }

                Event::CancelUploadRequested => {
                    if let Err(e) = model.submission.cancel() {
                        warn!(error = %e, "cancel rejected");
                        model.set_error(e.into());
                    } else {
                        model.active_error = None;
                    }
                }

                Event::SubmitUploadRequested => Self::submit(model, caps),

                Event::UploadResolved { submission, result } => {
                    Self::on_upload_resolved(model, &submission, result);
                }

                Event::UploadSuccessAcknowledged => Self::on_upload_acknowledged(model, caps),

                Event::ToggleLiked { photo_id } => {
                    let liked = model.interactions.toggle_liked(&photo_id);
                    debug!(%photo_id, liked, "like toggled");
                }

                Event::ToggleBookmarked { photo_id } => {
                    let bookmarked = model.interactions.toggle_bookmarked(&photo_id);
                    debug!(%photo_id, bookmarked, "bookmark toggled");
                }

                Event::ShareRequested { photo_id } => Self::share(model, photo_id, caps),

                Event::ShareResolved { photo_id, result } => {
                    Self::on_share_resolved(&photo_id, result);
                    return;
                }

                Event::ErrorDismissed => model.active_error = None,
            }

            caps.render.render();
        }

        fn view(&self, model: &Model) -> ViewModel {
            let upload = (model.screen == Screen::Upload).then(|| Self::build_upload_panel(model));
            let photo = match &model.screen {
                Screen::PhotoDetail { photo_id } => Self::build_photo_detail(model, photo_id),
                _ => None,
            };
            let profile = (model.screen == Screen::Profile).then(|| Self::build_profile(model));

            ViewModel {
                screen: model.screen.clone(),
                feed: model.feed.iter().map(Self::tile).collect(),
                profile,
                upload,
                photo,
                error_message: model.active_error.as_ref().map(AppError::user_facing_message),
                notice: model.active_notice.map(|n| n.message().to_owned()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::compact_count;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ErrorKind::InvalidState.code(), "INVALID_STATE");
        assert_eq!(
            ErrorKind::CameraPermissionDenied.code(),
            "CAMERA_PERMISSION_DENIED"
        );
        assert_eq!(ErrorKind::UploadFailed.code(), "UPLOAD_FAILED");
    }

    #[test]
    fn retryable_kinds() {
        assert!(ErrorKind::UploadFailed.is_retryable());
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(!ErrorKind::LibraryPermissionDenied.is_retryable());
        assert!(!ErrorKind::InvalidState.is_retryable());
    }

    #[test]
    fn permission_denials_keep_their_wording() {
        let err = AppError::new(ErrorKind::CameraPermissionDenied, "need the camera");
        assert_eq!(err.user_facing_message(), "need the camera");
        assert!(err.kind.is_permission_denial());
    }

    #[test]
    fn display_includes_code() {
        let err =
            AppError::new(ErrorKind::NotFound, "Photo not found").with_context("photo_id", "9");
        assert_eq!(err.to_string(), "[NOT_FOUND] Photo not found");
        assert_eq!(err.context.get("photo_id").map(String::as_str), Some("9"));
    }

    #[test]
    fn compact_counts() {
        assert_eq!(compact_count(842), "842");
        assert_eq!(compact_count(1_200), "1.2K");
        assert_eq!(compact_count(2_500_000), "2.5M");
    }
}
