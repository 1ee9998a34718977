//! Upload workflow state machine.
//!
//! One [`UploadSubmission`] exists per upload screen. It moves
//! `Idle -> Selected -> Uploading -> Succeeded | Failed`, with `cancel` taking
//! `Selected` back to `Idle` and a retry taking `Failed` back to `Uploading`.
//! Every mutator checks the current status first, so a rejected call leaves the
//! submission exactly as it was.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::event::SubmissionId;
use crate::permissions::PermissionKind;
use crate::{
    AppError, ErrorKind, MAX_HANDLE_LENGTH, MAX_UPLOAD_TIMEOUT, MIN_UPLOAD_TIMEOUT,
    SIMULATED_UPLOAD_DELAY, UPLOAD_TIMEOUT,
};

/// Opaque reference to a locally selected or captured image (URI or path).
/// Never the bytes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct MediaHandle(String);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandleError {
    #[error("media handle is empty")]
    Empty,
    #[error("media handle too long ({len} > {max})")]
    TooLong { len: usize, max: usize },
}

impl MediaHandle {
    pub fn new(uri: impl Into<String>) -> Result<Self, HandleError> {
        let uri = uri.into();
        if uri.trim().is_empty() {
            return Err(HandleError::Empty);
        }
        if uri.len() > MAX_HANDLE_LENGTH {
            return Err(HandleError::TooLong {
                len: uri.len(),
                max: MAX_HANDLE_LENGTH,
            });
        }
        Ok(Self(uri))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MediaHandle {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MediaHandle> for String {
    fn from(handle: MediaHandle) -> Self {
        handle.0
    }
}

impl fmt::Display for MediaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSource {
    Library,
    Camera,
}

impl MediaSource {
    #[must_use]
    pub const fn permission(self) -> PermissionKind {
        match self {
            Self::Library => PermissionKind::Library,
            Self::Camera => PermissionKind::Camera,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    #[default]
    Idle,
    Selected,
    Uploading,
    Succeeded,
    Failed,
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadAction {
    Select,
    Cancel,
    Submit,
    Complete,
    Acknowledge,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {action:?} while {from}")]
    InvalidTransition {
        from: UploadStatus,
        action: UploadAction,
    },
    #[error("result for submission {received} does not match the one in flight")]
    StaleSubmission { received: SubmissionId },
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        let err = AppError::new(ErrorKind::InvalidState, e.to_string());
        match e {
            TransitionError::InvalidTransition { from, .. } => {
                err.with_context("status", from.to_string())
            }
            TransitionError::StaleSubmission { received } => {
                err.with_context("submission", received.as_str())
            }
        }
    }
}

/// Why an upload attempt did not complete. All variants are retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum UploadFailure {
    #[error("upload timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
    #[error("transport error: {message}")]
    Transport { message: String },
    #[error("upload rejected: {message}")]
    Rejected { message: String },
}

impl From<UploadFailure> for AppError {
    fn from(e: UploadFailure) -> Self {
        match &e {
            UploadFailure::TimedOut { timeout_ms } => {
                AppError::new(ErrorKind::Timeout, e.to_string())
                    .with_context("timeout_ms", timeout_ms.to_string())
            }
            UploadFailure::Transport { .. } | UploadFailure::Rejected { .. } => AppError::new(
                ErrorKind::UploadFailed,
                format!("Upload failed ({e}). Tap Upload to try again."),
            ),
        }
    }
}

/// What the upload capability needs to run one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    pub submission: SubmissionId,
    pub image: MediaHandle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UploadSubmission {
    status: UploadStatus,
    image: Option<MediaHandle>,
    source: Option<MediaSource>,
    in_flight: Option<SubmissionId>,
    attempts: u32,
    last_failure: Option<UploadFailure>,
}

impl UploadSubmission {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> UploadStatus {
        self.status
    }

    #[must_use]
    pub fn image(&self) -> Option<&MediaHandle> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn source(&self) -> Option<MediaSource> {
        self.source
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<&SubmissionId> {
        self.in_flight.as_ref()
    }

    /// Upload attempts made with the current image.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn last_failure(&self) -> Option<&UploadFailure> {
        self.last_failure.as_ref()
    }

    #[must_use]
    pub fn can_cancel(&self) -> bool {
        matches!(self.status, UploadStatus::Selected | UploadStatus::Failed)
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        matches!(self.status, UploadStatus::Selected | UploadStatus::Failed)
    }

    /// `Idle` exactly when no image is held.
    #[must_use]
    pub fn invariant_holds(&self) -> bool {
        (self.status == UploadStatus::Idle) == self.image.is_none()
            && (self.status == UploadStatus::Uploading) == self.in_flight.is_some()
    }

    pub fn ensure_can_select(&self) -> Result<(), TransitionError> {
        match self.status {
            UploadStatus::Idle | UploadStatus::Selected | UploadStatus::Failed => Ok(()),
            UploadStatus::Uploading | UploadStatus::Succeeded => {
                Err(self.reject(UploadAction::Select))
            }
        }
    }

    /// Takes a freshly picked image. Replaces any earlier selection wholesale.
    pub fn select(
        &mut self,
        image: MediaHandle,
        source: MediaSource,
    ) -> Result<(), TransitionError> {
        self.ensure_can_select()?;
        debug!(from = %self.status, ?source, "selecting image");
        *self = Self {
            status: UploadStatus::Selected,
            image: Some(image),
            source: Some(source),
            ..Self::default()
        };
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        if !self.can_cancel() {
            return Err(self.reject(UploadAction::Cancel));
        }
        debug!(from = %self.status, "submission cancelled");
        *self = Self::default();
        Ok(())
    }

    /// Moves to `Uploading` before any I/O happens so controls can be disabled
    /// on the very next render.
    pub fn begin_upload(&mut self) -> Result<UploadTicket, TransitionError> {
        if !self.can_submit() {
            return Err(self.reject(UploadAction::Submit));
        }
        let Some(image) = self.image.clone() else {
            return Err(self.reject(UploadAction::Submit));
        };

        let submission = SubmissionId::generate();
        self.status = UploadStatus::Uploading;
        self.in_flight = Some(submission.clone());
        self.attempts += 1;
        self.last_failure = None;

        Ok(UploadTicket { submission, image })
    }

    /// Applies the outcome of the attempt identified by `submission`. Results for
    /// any other attempt are rejected without touching state.
    pub fn complete(
        &mut self,
        submission: &SubmissionId,
        outcome: Result<(), UploadFailure>,
    ) -> Result<UploadStatus, TransitionError> {
        if self.in_flight.as_ref() != Some(submission) {
            return Err(TransitionError::StaleSubmission {
                received: submission.clone(),
            });
        }

        self.in_flight = None;
        match outcome {
            Ok(()) => self.status = UploadStatus::Succeeded,
            Err(failure) => {
                self.status = UploadStatus::Failed;
                self.last_failure = Some(failure);
            }
        }
        Ok(self.status)
    }

    /// `Succeeded -> Idle` once the caller has shown the success and moved on.
    pub fn acknowledge_success(&mut self) -> Result<(), TransitionError> {
        if self.status != UploadStatus::Succeeded {
            return Err(self.reject(UploadAction::Acknowledge));
        }
        *self = Self::default();
        Ok(())
    }

    /// Drops whatever is held unless an upload is in flight. Returns whether the
    /// submission was reset.
    pub fn reset(&mut self) -> bool {
        if self.status == UploadStatus::Uploading {
            return false;
        }
        *self = Self::default();
        true
    }

    fn reject(&self, action: UploadAction) -> TransitionError {
        TransitionError::InvalidTransition {
            from: self.status,
            action,
        }
    }
}

const fn millis(d: std::time::Duration) -> u64 {
    d.as_secs() * 1000 + d.subsec_millis() as u64
}

/// Knobs for the upload capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    pub timeout_ms: u64,
    /// Only used by shells that fake the upload locally.
    pub simulated_delay_ms: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            timeout_ms: millis(UPLOAD_TIMEOUT),
            simulated_delay_ms: millis(SIMULATED_UPLOAD_DELAY),
        }
    }
}

impl UploadConfig {
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self.validated()
    }

    #[must_use]
    pub fn with_simulated_delay_ms(mut self, delay_ms: u64) -> Self {
        self.simulated_delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn validated(mut self) -> Self {
        self.timeout_ms = self
            .timeout_ms
            .clamp(millis(MIN_UPLOAD_TIMEOUT), millis(MAX_UPLOAD_TIMEOUT));
        self
    }
}
