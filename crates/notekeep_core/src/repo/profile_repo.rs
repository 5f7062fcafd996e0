//! Profile repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Resolve a principal to its live profile.
//! - Create the single profile of a principal and change its nickname.
//!
//! # Invariants
//! - Lookups only see rows with `deleted_at IS NULL`.
//! - Duplicate detection runs inside the insert transaction and is backed by
//!   the partial unique index on `profiles(principal_id)`.

use crate::model::profile::{PrincipalId, Profile, ProfileId};
use crate::repo::store::{
    is_unique_violation, principal_from_db, principal_to_db, RepoError, RepoResult, SqliteStore,
    NOW_MS_SQL,
};
use rusqlite::{params, Connection, Row};

const PROFILE_SELECT_SQL: &str = "SELECT
    profile_id,
    principal_id,
    nickname,
    created_at,
    updated_at,
    deleted_at
FROM profiles";

/// Repository interface for profile lifecycle operations.
pub trait ProfileRepository {
    /// Gets the live profile of `principal`, if any.
    fn find_profile(&self, principal: PrincipalId) -> RepoResult<Option<Profile>>;
    /// Inserts a profile for `principal`.
    ///
    /// Fails with `DuplicateProfile` when a live profile already exists.
    fn create_profile(&self, principal: PrincipalId, nickname: &str) -> RepoResult<Profile>;
    /// Replaces the nickname of the live profile of `principal`.
    ///
    /// Fails with `ProfileNotFound` or, when the nickname is already current,
    /// `Unchanged`.
    fn update_profile_nickname(
        &self,
        principal: PrincipalId,
        nickname: &str,
    ) -> RepoResult<Profile>;
}

impl ProfileRepository for SqliteStore<'_> {
    fn find_profile(&self, principal: PrincipalId) -> RepoResult<Option<Profile>> {
        select_live_profile(self.conn(), principal)
    }

    fn create_profile(&self, principal: PrincipalId, nickname: &str) -> RepoResult<Profile> {
        let tx = self.write_tx()?;
        if select_live_profile(&tx, principal)?.is_some() {
            return Err(RepoError::DuplicateProfile(principal));
        }

        tx.execute(
            "INSERT INTO profiles (principal_id, nickname) VALUES (?1, ?2);",
            params![principal_to_db(principal)?, nickname],
        )
        .map_err(|err| {
            if is_unique_violation(&err) {
                RepoError::DuplicateProfile(principal)
            } else {
                err.into()
            }
        })?;

        let profile = select_profile_by_id(&tx, tx.last_insert_rowid())?.ok_or_else(|| {
            RepoError::InvalidData("created profile not found in read-back".to_string())
        })?;
        tx.commit()?;
        Ok(profile)
    }

    fn update_profile_nickname(
        &self,
        principal: PrincipalId,
        nickname: &str,
    ) -> RepoResult<Profile> {
        let tx = self.write_tx()?;
        let current = select_live_profile(&tx, principal)?.ok_or(RepoError::ProfileNotFound)?;
        if current.nickname == nickname {
            return Err(RepoError::Unchanged);
        }

        tx.execute(
            &format!(
                "UPDATE profiles
                 SET
                    nickname = ?1,
                    updated_at = {NOW_MS_SQL}
                 WHERE profile_id = ?2
                   AND deleted_at IS NULL;"
            ),
            params![nickname, current.profile_id],
        )?;

        let profile = select_profile_by_id(&tx, current.profile_id)?.ok_or_else(|| {
            RepoError::InvalidData("updated profile not found in read-back".to_string())
        })?;
        tx.commit()?;
        Ok(profile)
    }
}

fn select_live_profile(conn: &Connection, principal: PrincipalId) -> RepoResult<Option<Profile>> {
    let mut stmt = conn.prepare(&format!(
        "{PROFILE_SELECT_SQL}
         WHERE principal_id = ?1
           AND deleted_at IS NULL;"
    ))?;
    let mut rows = stmt.query([principal_to_db(principal)?])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_profile_row(row)?));
    }
    Ok(None)
}

fn select_profile_by_id(conn: &Connection, profile_id: ProfileId) -> RepoResult<Option<Profile>> {
    let mut stmt = conn.prepare(&format!("{PROFILE_SELECT_SQL} WHERE profile_id = ?1;"))?;
    let mut rows = stmt.query([profile_id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_profile_row(row)?));
    }
    Ok(None)
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let nickname: String = row.get("nickname")?;
    if nickname.trim().is_empty() {
        return Err(RepoError::InvalidData(
            "blank nickname in profiles.nickname".to_string(),
        ));
    }

    Ok(Profile {
        profile_id: row.get("profile_id")?,
        principal_id: principal_from_db(row.get("principal_id")?)?,
        nickname,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        deleted_at: row.get("deleted_at")?,
    })
}
