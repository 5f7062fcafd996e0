//! Tagged failures returned by the profile and note managers.
//!
//! # Invariants
//! - `FailureKind` is the machine-readable tag; transport mapping belongs to
//!   the caller.
//! - Internal failures expose a fixed message; store detail is only reachable
//!   through `Error::source()` and the error log.

use crate::model::note::NoteId;
use crate::model::profile::PrincipalId;
use crate::model::ValidationError;
use crate::repo::store::RepoError;
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CoreResult<T> = Result<T, CoreError>;

/// Machine-distinguishable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    ProfileNotFound,
    NoteNotFound,
    Validation,
    Conflict,
    NoChange,
    Internal,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProfileNotFound => "profile_not_found",
            Self::NoteNotFound => "note_not_found",
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::NoChange => "no_change",
            Self::Internal => "internal",
        }
    }
}

/// Failure of a profile or note operation.
#[derive(Debug)]
pub enum CoreError {
    /// Profile lookup or update for a principal without a profile.
    ProfileNotFound,
    /// Note operation for a principal without a profile.
    ProfileRequired,
    /// Note missing, tombstoned, or owned by someone else.
    NoteNotFound(NoteId),
    /// The caller's profile has no live notes.
    NoNotes,
    Validation(ValidationError),
    /// The principal already has a profile.
    Conflict(PrincipalId),
    /// Update request carries no effective change.
    NoChange,
    /// Store failure; the transaction was rolled back.
    Internal(RepoError),
}

impl CoreError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ProfileNotFound | Self::ProfileRequired => FailureKind::ProfileNotFound,
            Self::NoteNotFound(_) | Self::NoNotes => FailureKind::NoteNotFound,
            Self::Validation(_) => FailureKind::Validation,
            Self::Conflict(_) => FailureKind::Conflict,
            Self::NoChange => FailureKind::NoChange,
            Self::Internal(_) => FailureKind::Internal,
        }
    }

    /// Human-readable message safe to show to the caller.
    pub fn message(&self) -> String {
        match self {
            Self::ProfileNotFound => "user profile not found".to_string(),
            Self::ProfileRequired => "no user profile found".to_string(),
            Self::NoteNotFound(_) => "note not found".to_string(),
            Self::NoNotes => "no note found".to_string(),
            Self::Validation(err) => err.to_string(),
            Self::Conflict(_) => "user profile found, no need to create a new one".to_string(),
            Self::NoChange => "no new info to update".to_string(),
            Self::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Internal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ProfileNotFound => Self::ProfileNotFound,
            RepoError::NoteNotFound(note_id) => Self::NoteNotFound(note_id),
            RepoError::DuplicateProfile(principal) => Self::Conflict(principal),
            RepoError::Unchanged => Self::NoChange,
            other => Self::Internal(other),
        }
    }
}

/// Emits the failure event of one manager operation.
///
/// Client-visible failures are debug events; internal failures are errors
/// tagged with the operation's `error_code`.
pub(crate) fn log_failure(
    event: &'static str,
    module: &'static str,
    error_code: u16,
    principal: PrincipalId,
    err: &CoreError,
) {
    match err {
        CoreError::Internal(source) => error!(
            "event={event} module={module} status=error principal={principal} kind={} error_code={error_code} error={source}",
            err.kind().as_str()
        ),
        other => debug!(
            "event={event} module={module} status=rejected principal={principal} kind={}",
            other.kind().as_str()
        ),
    }
}
