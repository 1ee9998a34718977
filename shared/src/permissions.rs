//! Permission gating shared by the library and camera paths.

use serde::{Deserialize, Serialize};

use crate::capabilities::{MediaOutput, MediaResult};
use crate::{AppError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    Library,
    Camera,
}

impl PermissionKind {
    #[must_use]
    pub const fn denied_kind(self) -> ErrorKind {
        match self {
            Self::Library => ErrorKind::LibraryPermissionDenied,
            Self::Camera => ErrorKind::CameraPermissionDenied,
        }
    }

    #[must_use]
    pub const fn denial_message(self) -> &'static str {
        match self {
            Self::Library => "Sorry, we need camera roll permissions to upload photos!",
            Self::Camera => "Sorry, we need camera permissions to take photos!",
        }
    }
}

/// Consumed immediately by the caller, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionOutcome {
    Granted,
    Denied,
}

impl PermissionOutcome {
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

pub fn ensure_granted(kind: PermissionKind, outcome: PermissionOutcome) -> Result<(), AppError> {
    if outcome.is_granted() {
        return Ok(());
    }
    Err(AppError::new(kind.denied_kind(), kind.denial_message())
        .with_context("permission", format!("{kind:?}")))
}

/// Interprets the provider's answer to a permission request. Anything other
/// than an explicit grant stops the flow.
pub fn check_permission_result(kind: PermissionKind, result: MediaResult) -> Result<(), AppError> {
    match result {
        Ok(MediaOutput::Permission(outcome)) => ensure_granted(kind, outcome),
        Ok(other) => Err(AppError::new(
            ErrorKind::Internal,
            "Unexpected response to a permission request",
        )
        .with_context("output", format!("{other:?}"))),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::MediaError;

    #[test]
    fn granted_passes() {
        assert!(ensure_granted(PermissionKind::Camera, PermissionOutcome::Granted).is_ok());
    }

    #[test]
    fn denial_carries_kind_and_message() {
        let err = ensure_granted(PermissionKind::Library, PermissionOutcome::Denied).unwrap_err();
        assert_eq!(err.kind, ErrorKind::LibraryPermissionDenied);
        assert_eq!(
            err.user_facing_message(),
            "Sorry, we need camera roll permissions to upload photos!"
        );

        let err = ensure_granted(PermissionKind::Camera, PermissionOutcome::Denied).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CameraPermissionDenied);
    }

    #[test]
    fn provider_errors_are_media_errors() {
        let err = check_permission_result(
            PermissionKind::Camera,
            Err(MediaError::Unavailable {
                reason: "no camera".into(),
            }),
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Media);
    }

    #[test]
    fn unexpected_output_is_internal() {
        let err = check_permission_result(PermissionKind::Library, Ok(MediaOutput::Cancelled))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
    }
}
