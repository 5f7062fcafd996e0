//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped note reads and writes.
//! - Tombstone notes instead of removing rows.
//!
//! # Invariants
//! - Scoped queries filter on `owner_profile_id` and `deleted_at IS NULL`
//!   jointly; a foreign note is indistinguishable from a missing one.
//! - `owner_profile_id` is written once on insert and never updated.
//! - Writes re-check that the owner profile is still live inside their
//!   transaction.

use crate::model::note::{Note, NoteId};
use crate::model::profile::ProfileId;
use crate::repo::store::{RepoError, RepoResult, SqliteStore, NOW_MS_SQL};
use rusqlite::{params, Connection, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    note_id,
    owner_profile_id,
    title,
    body,
    created_at,
    updated_at,
    deleted_at
FROM notes";

/// Repository interface for note lifecycle operations scoped to one owner.
pub trait NoteRepository {
    /// Lists live notes of `owner` in insertion order.
    fn list_notes(&self, owner: ProfileId) -> RepoResult<Vec<Note>>;
    /// Gets one live note by id, only when owned by `owner`.
    fn get_note(&self, owner: ProfileId, note_id: NoteId) -> RepoResult<Option<Note>>;
    /// Inserts one note owned by `owner`.
    fn create_note(&self, owner: ProfileId, title: &str, body: &str) -> RepoResult<Note>;
    /// Replaces title and body of a live note owned by `owner`.
    ///
    /// Fails with `NoteNotFound` for missing or foreign notes and `Unchanged`
    /// when both values are already current.
    fn update_note(
        &self,
        owner: ProfileId,
        note_id: NoteId,
        title: &str,
        body: &str,
    ) -> RepoResult<Note>;
    /// Tombstones a live note owned by `owner`.
    fn soft_delete_note(&self, owner: ProfileId, note_id: NoteId) -> RepoResult<()>;
    /// Gets one note regardless of owner or tombstone state.
    ///
    /// Administrative/history read; managers never call it.
    fn get_note_any_state(&self, note_id: NoteId) -> RepoResult<Option<Note>>;
}

impl NoteRepository for SqliteStore<'_> {
    fn list_notes(&self, owner: ProfileId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn().prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE owner_profile_id = ?1
               AND deleted_at IS NULL
             ORDER BY note_id ASC;"
        ))?;
        let mut rows = stmt.query([owner])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn get_note(&self, owner: ProfileId, note_id: NoteId) -> RepoResult<Option<Note>> {
        select_owned_note(self.conn(), owner, note_id)
    }

    fn create_note(&self, owner: ProfileId, title: &str, body: &str) -> RepoResult<Note> {
        let tx = self.write_tx()?;
        ensure_owner_live(&tx, owner)?;

        tx.execute(
            "INSERT INTO notes (owner_profile_id, title, body) VALUES (?1, ?2, ?3);",
            params![owner, title, body],
        )?;

        let note = select_owned_note(&tx, owner, tx.last_insert_rowid())?.ok_or_else(|| {
            RepoError::InvalidData("created note not found in read-back".to_string())
        })?;
        tx.commit()?;
        Ok(note)
    }

    fn update_note(
        &self,
        owner: ProfileId,
        note_id: NoteId,
        title: &str,
        body: &str,
    ) -> RepoResult<Note> {
        let tx = self.write_tx()?;
        ensure_owner_live(&tx, owner)?;
        let current =
            select_owned_note(&tx, owner, note_id)?.ok_or(RepoError::NoteNotFound(note_id))?;
        if current.title == title && current.body == body {
            return Err(RepoError::Unchanged);
        }

        tx.execute(
            &format!(
                "UPDATE notes
                 SET
                    title = ?1,
                    body = ?2,
                    updated_at = {NOW_MS_SQL}
                 WHERE note_id = ?3
                   AND owner_profile_id = ?4
                   AND deleted_at IS NULL;"
            ),
            params![title, body, note_id, owner],
        )?;

        let note = select_owned_note(&tx, owner, note_id)?.ok_or_else(|| {
            RepoError::InvalidData("updated note not found in read-back".to_string())
        })?;
        tx.commit()?;
        Ok(note)
    }

    fn soft_delete_note(&self, owner: ProfileId, note_id: NoteId) -> RepoResult<()> {
        let tx = self.write_tx()?;
        ensure_owner_live(&tx, owner)?;

        let changed = tx.execute(
            &format!(
                "UPDATE notes
                 SET
                    deleted_at = {NOW_MS_SQL},
                    updated_at = {NOW_MS_SQL}
                 WHERE note_id = ?1
                   AND owner_profile_id = ?2
                   AND deleted_at IS NULL;"
            ),
            params![note_id, owner],
        )?;
        if changed == 0 {
            return Err(RepoError::NoteNotFound(note_id));
        }

        tx.commit()?;
        Ok(())
    }

    fn get_note_any_state(&self, note_id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE note_id = ?1;"))?;
        let mut rows = stmt.query([note_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }
}

fn select_owned_note(
    conn: &Connection,
    owner: ProfileId,
    note_id: NoteId,
) -> RepoResult<Option<Note>> {
    let mut stmt = conn.prepare(&format!(
        "{NOTE_SELECT_SQL}
         WHERE note_id = ?1
           AND owner_profile_id = ?2
           AND deleted_at IS NULL;"
    ))?;
    let mut rows = stmt.query(params![note_id, owner])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_note_row(row)?));
    }
    Ok(None)
}

fn ensure_owner_live(conn: &Connection, owner: ProfileId) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM profiles
            WHERE profile_id = ?1
              AND deleted_at IS NULL
        );",
        [owner],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::ProfileNotFound)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let title: String = row.get("title")?;
    if title.trim().is_empty() {
        return Err(RepoError::InvalidData(
            "blank title in notes.title".to_string(),
        ));
    }

    Ok(Note {
        note_id: row.get("note_id")?,
        owner_profile_id: row.get("owner_profile_id")?,
        title,
        body: row.get("body")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        deleted_at: row.get("deleted_at")?,
    })
}
