//! Profile domain model.
//!
//! # Invariants
//! - `profile_id` is assigned by the store and never changes.
//! - At most one live (non-tombstoned) profile exists per `principal_id`.
//! - `nickname` is stored trimmed and is never empty.

use super::{trimmed_required, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned surrogate key of a profile.
pub type ProfileId = i64;

/// Externally verified identity of the caller.
///
/// The core trusts this value completely; it is resolved by the authentication
/// layer before any operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrincipalId(u64);

impl PrincipalId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for PrincipalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public-facing identity of one principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "profileID")]
    pub profile_id: ProfileId,
    /// Never rendered; ownership is implied by the request.
    #[serde(skip_serializing)]
    pub principal_id: PrincipalId,
    pub nickname: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
    #[serde(skip_serializing)]
    pub deleted_at: Option<i64>,
}

impl Profile {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// User-settable profile fields.
///
/// Any other field of an incoming payload is dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileInput {
    #[serde(default, alias = "nickName")]
    pub nickname: String,
}

impl ProfileInput {
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
        }
    }
}

/// Trims a requested nickname, rejecting blank values.
pub fn normalize_nickname(value: &str) -> Result<String, ValidationError> {
    trimmed_required(value, ValidationError::NicknameRequired)
}
