//! Profile manager.
//!
//! # Responsibility
//! - Resolve a principal to its single live profile.
//! - Create that profile once and change its nickname.
//!
//! # Invariants
//! - Nicknames are trimmed and must not be blank.
//! - A second create for the same principal is rejected, never merged.
//! - An update that would not change the nickname is rejected as `NoChange`.

use crate::model::profile::{normalize_nickname, PrincipalId, Profile, ProfileInput};
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::store::RepoError;
use crate::service::error::{log_failure, CoreError, CoreResult};
use log::{debug, info};

const MODULE: &str = "profile";
const ERROR_CODE_RESOLVE: u16 = 1101;
const ERROR_CODE_CREATE: u16 = 1111;
const ERROR_CODE_UPDATE: u16 = 1121;

/// Profile manager over a repository implementation.
pub struct ProfileService<R: ProfileRepository> {
    repo: R,
}

impl<R: ProfileRepository> ProfileService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Gets the live profile of `principal`.
    ///
    /// Pure read; fails with `ProfileNotFound` when none exists.
    pub fn resolve(&self, principal: PrincipalId) -> CoreResult<Profile> {
        let profile = find_profile(&self.repo, principal)
            .and_then(|found| found.ok_or(CoreError::ProfileNotFound))
            .inspect_err(|err| {
                log_failure("profile_resolve", MODULE, ERROR_CODE_RESOLVE, principal, err)
            })?;
        debug!(
            "event=profile_resolve module={MODULE} status=ok principal={principal} profile_id={}",
            profile.profile_id
        );
        Ok(profile)
    }

    /// Creates the profile of `principal` from the trimmed nickname.
    ///
    /// Only `input.nickname` is read; id and timestamps come from the store.
    pub fn create(&self, principal: PrincipalId, input: &ProfileInput) -> CoreResult<Profile> {
        let profile = normalize_nickname(&input.nickname)
            .map_err(CoreError::from)
            .and_then(|nickname| {
                self.repo
                    .create_profile(principal, &nickname)
                    .map_err(CoreError::from)
            })
            .inspect_err(|err| {
                log_failure("profile_create", MODULE, ERROR_CODE_CREATE, principal, err)
            })?;
        info!(
            "event=profile_create module={MODULE} status=ok principal={principal} profile_id={}",
            profile.profile_id
        );
        Ok(profile)
    }

    /// Replaces the nickname of the profile of `principal`.
    ///
    /// A principal without a profile gets `ProfileRequired`, as note operations do.
    pub fn update(&self, principal: PrincipalId, input: &ProfileInput) -> CoreResult<Profile> {
        let profile = normalize_nickname(&input.nickname)
            .map_err(CoreError::from)
            .and_then(|nickname| {
                self.repo
                    .update_profile_nickname(principal, &nickname)
                    .map_err(|err| match err {
                        RepoError::ProfileNotFound => CoreError::ProfileRequired,
                        other => CoreError::from(other),
                    })
            })
            .inspect_err(|err| {
                log_failure("profile_update", MODULE, ERROR_CODE_UPDATE, principal, err)
            })?;
        info!(
            "event=profile_update module={MODULE} status=ok principal={principal} profile_id={}",
            profile.profile_id
        );
        Ok(profile)
    }
}

/// Looks up the live profile of `principal` without judging absence.
///
/// Shared by both managers so each can report absence its own way.
pub(crate) fn find_profile<R: ProfileRepository + ?Sized>(
    repo: &R,
    principal: PrincipalId,
) -> CoreResult<Option<Profile>> {
    repo.find_profile(principal).map_err(CoreError::from)
}
