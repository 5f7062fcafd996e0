//! Note domain model.
//!
//! # Invariants
//! - `owner_profile_id` is fixed at creation and never reassigned.
//! - `title` is stored trimmed and is never empty; `body` is stored verbatim.
//! - A tombstoned note (`deleted_at` set) never becomes active again.

use super::profile::ProfileId;
use super::{trimmed_required, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned surrogate key of a note.
pub type NoteId = i64;

/// One user-authored record owned by a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(rename = "noteID")]
    pub note_id: NoteId,
    #[serde(skip_serializing)]
    pub owner_profile_id: ProfileId,
    pub title: String,
    pub body: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
    #[serde(skip_serializing)]
    pub deleted_at: Option<i64>,
}

impl Note {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// User-settable note fields.
///
/// Ownership and identity fields sent by a client are dropped during
/// deserialization; the owner always comes from the resolved profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoteInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl NoteInput {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Trims a requested title, rejecting blank values.
pub fn normalize_title(value: &str) -> Result<String, ValidationError> {
    trimmed_required(value, ValidationError::TitleRequired)
}
