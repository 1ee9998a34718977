use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::permissions::{PermissionKind, PermissionOutcome};
use crate::upload::MediaHandle;
use crate::{AppError, ErrorKind, ErrorSeverity};

pub const DEFAULT_IMAGE_QUALITY: u8 = 80;

/// Device media access: permission checks, the library picker and the camera.
pub struct Media<E> {
    context: CapabilityContext<MediaOperation, E>,
}

impl<Ev> Capability<Ev> for Media<Ev> {
    type Operation = MediaOperation;
    type MappedSelf<MappedEv> = Media<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Media::new(self.context.map_event(f))
    }
}

impl<E> Media<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<MediaOperation, E>) -> Self {
        Self { context }
    }

    pub fn request_permission<F>(&self, kind: PermissionKind, callback: F)
    where
        F: FnOnce(MediaResult) -> E + Send + 'static,
    {
        self.request(MediaOperation::RequestPermission { kind }, callback);
    }

    pub fn pick_from_library<F>(&self, config: PickConfig, callback: F)
    where
        F: FnOnce(MediaResult) -> E + Send + 'static,
    {
        let config = config.validated();
        self.request(MediaOperation::PickFromLibrary { config }, callback);
    }

    pub fn capture_from_camera<F>(&self, config: PickConfig, callback: F)
    where
        F: FnOnce(MediaResult) -> E + Send + 'static,
    {
        let config = config.validated();
        self.request(MediaOperation::CaptureFromCamera { config }, callback);
    }

    fn request<F>(&self, operation: MediaOperation, callback: F)
    where
        F: FnOnce(MediaResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(callback(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaOperation {
    RequestPermission { kind: PermissionKind },
    PickFromLibrary { config: PickConfig },
    CaptureFromCamera { config: PickConfig },
}

impl Operation for MediaOperation {
    type Output = MediaResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    #[default]
    Square,
    Ratio4x3,
    Ratio16x9,
    Free,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickConfig {
    pub allows_editing: bool,
    pub aspect_ratio: AspectRatio,
    pub quality: u8,
    pub images_only: bool,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            allows_editing: true,
            aspect_ratio: AspectRatio::Square,
            quality: DEFAULT_IMAGE_QUALITY,
            images_only: true,
        }
    }
}

impl PickConfig {
    #[must_use]
    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.min(100);
        self
    }

    #[must_use]
    pub fn without_editing(mut self) -> Self {
        self.allows_editing = false;
        self
    }

    #[must_use]
    pub fn validated(mut self) -> Self {
        self.quality = self.quality.clamp(1, 100);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaOutput {
    Permission(PermissionOutcome),
    Picked(MediaHandle),
    /// The user backed out of the picker. Not an error.
    Cancelled,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaError {
    #[error("media access unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("another media request is in progress")]
    Busy,

    #[error("picker returned an unusable image: {reason}")]
    InvalidImage { reason: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl MediaError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, MediaError::Busy | MediaError::Unavailable { .. })
    }
}

impl From<MediaError> for AppError {
    fn from(e: MediaError) -> Self {
        let mut error = AppError::new(ErrorKind::Media, e.to_string());
        if !e.is_retryable() {
            error.severity = ErrorSeverity::Permanent;
        }
        error
    }
}

pub type MediaResult = Result<MediaOutput, MediaError>;
