//! Note manager.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete for the caller's own notes.
//! - Re-derive the owning profile from the principal on every call.
//!
//! # Invariants
//! - Caller-supplied ownership is never used; the owner is always the
//!   resolved profile.
//! - A note owned by another profile is reported exactly like a missing one.
//! - An empty list is reported as `NoNotes`, not as an empty success.
//! - Titles are trimmed and must not be blank; bodies are stored verbatim.

use crate::model::note::{normalize_title, Note, NoteId, NoteInput};
use crate::model::profile::{PrincipalId, Profile};
use crate::repo::note_repo::NoteRepository;
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::store::RepoError;
use crate::service::error::{log_failure, CoreError, CoreResult};
use crate::service::profile_service::find_profile;
use log::{debug, info};

const MODULE: &str = "note";
const ERROR_CODE_LIST: u16 = 1201;
const ERROR_CODE_GET: u16 = 1202;
const ERROR_CODE_CREATE: u16 = 1211;
const ERROR_CODE_UPDATE: u16 = 1221;
const ERROR_CODE_DELETE: u16 = 1231;

/// Acknowledgement of a successful soft delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub note_id: NoteId,
    pub message: String,
}

impl DeleteConfirmation {
    fn new(note_id: NoteId) -> Self {
        Self {
            note_id,
            message: format!("note ID# {note_id} deleted!"),
        }
    }
}

/// Note manager over a store that serves both profiles and notes.
pub struct NoteService<R: ProfileRepository + NoteRepository> {
    repo: R,
}

impl<R: ProfileRepository + NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists the caller's live notes in insertion order.
    pub fn list(&self, principal: PrincipalId) -> CoreResult<Vec<Note>> {
        let notes = self
            .owner(principal)
            .and_then(|owner| {
                self.repo
                    .list_notes(owner.profile_id)
                    .map_err(owner_scoped_error)
            })
            .and_then(|notes| {
                if notes.is_empty() {
                    Err(CoreError::NoNotes)
                } else {
                    Ok(notes)
                }
            })
            .inspect_err(|err| log_failure("note_list", MODULE, ERROR_CODE_LIST, principal, err))?;
        debug!(
            "event=note_list module={MODULE} status=ok principal={principal} count={}",
            notes.len()
        );
        Ok(notes)
    }

    /// Gets one of the caller's live notes.
    pub fn get(&self, principal: PrincipalId, note_id: NoteId) -> CoreResult<Note> {
        let note = self
            .owner(principal)
            .and_then(|owner| self.owned_note(&owner, note_id))
            .inspect_err(|err| log_failure("note_get", MODULE, ERROR_CODE_GET, principal, err))?;
        debug!("event=note_get module={MODULE} status=ok principal={principal} note_id={note_id}");
        Ok(note)
    }

    /// Creates a note owned by the caller's profile.
    ///
    /// Only `input.title` and `input.body` are read.
    pub fn create(&self, principal: PrincipalId, input: &NoteInput) -> CoreResult<Note> {
        let note = self
            .owner(principal)
            .and_then(|owner| {
                let title = normalize_title(&input.title)?;
                self.repo
                    .create_note(owner.profile_id, &title, &input.body)
                    .map_err(owner_scoped_error)
            })
            .inspect_err(|err| {
                log_failure("note_create", MODULE, ERROR_CODE_CREATE, principal, err)
            })?;
        info!(
            "event=note_create module={MODULE} status=ok principal={principal} profile_id={} note_id={}",
            note.owner_profile_id, note.note_id
        );
        Ok(note)
    }

    /// Replaces title and body of one of the caller's live notes.
    pub fn update(
        &self,
        principal: PrincipalId,
        note_id: NoteId,
        input: &NoteInput,
    ) -> CoreResult<Note> {
        let note = self
            .owner(principal)
            .and_then(|owner| {
                self.owned_note(&owner, note_id)?;
                let title = normalize_title(&input.title)?;
                self.repo
                    .update_note(owner.profile_id, note_id, &title, &input.body)
                    .map_err(owner_scoped_error)
            })
            .inspect_err(|err| {
                log_failure("note_update", MODULE, ERROR_CODE_UPDATE, principal, err)
            })?;
        info!(
            "event=note_update module={MODULE} status=ok principal={principal} note_id={note_id}"
        );
        Ok(note)
    }

    /// Tombstones one of the caller's live notes.
    pub fn delete(
        &self,
        principal: PrincipalId,
        note_id: NoteId,
    ) -> CoreResult<DeleteConfirmation> {
        self.owner(principal)
            .and_then(|owner| {
                self.repo
                    .soft_delete_note(owner.profile_id, note_id)
                    .map_err(owner_scoped_error)
            })
            .inspect_err(|err| {
                log_failure("note_delete", MODULE, ERROR_CODE_DELETE, principal, err)
            })?;
        info!(
            "event=note_delete module={MODULE} status=ok principal={principal} note_id={note_id}"
        );
        Ok(DeleteConfirmation::new(note_id))
    }

    fn owner(&self, principal: PrincipalId) -> CoreResult<Profile> {
        find_profile(&self.repo, principal)?.ok_or(CoreError::ProfileRequired)
    }

    fn owned_note(&self, owner: &Profile, note_id: NoteId) -> CoreResult<Note> {
        self.repo
            .get_note(owner.profile_id, note_id)
            .map_err(owner_scoped_error)?
            .ok_or(CoreError::NoteNotFound(note_id))
    }
}

/// Maps repository failures of an owner-scoped call.
///
/// The owner vanishing mid-call means the caller no longer has a profile.
fn owner_scoped_error(err: RepoError) -> CoreError {
    match err {
        RepoError::ProfileNotFound => CoreError::ProfileRequired,
        other => CoreError::from(other),
    }
}
