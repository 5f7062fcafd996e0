//! Domain model for profiles and their notes.
//!
//! # Responsibility
//! - Define the records owned by the profile and note managers.
//! - Define the only user-settable input shapes accepted by write operations.
//!
//! # Invariants
//! - A profile belongs to exactly one principal; a note to exactly one profile.
//! - Deletion is represented by `deleted_at` tombstones, not hard delete.

pub mod note;
pub mod profile;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected user input for a required text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Nickname is blank after trim.
    NicknameRequired,
    /// Note title is blank after trim.
    TitleRequired,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NicknameRequired => write!(f, "user nickname is required"),
            Self::TitleRequired => write!(f, "title is required"),
        }
    }
}

impl Error for ValidationError {}

fn trimmed_required(value: &str, missing: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(missing)
    } else {
        Ok(trimmed.to_string())
    }
}
