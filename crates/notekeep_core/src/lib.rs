//! Core domain logic for notekeep.
//!
//! Ownership-scoped CRUD over profiles and notes: each principal owns at most
//! one profile, each profile owns its notes, and every note operation
//! re-resolves principal -> profile -> note before touching the store.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use crate::config::{bootstrap, ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId, NoteInput};
pub use model::profile::{PrincipalId, Profile, ProfileId, ProfileInput};
pub use model::ValidationError;
pub use repo::note_repo::NoteRepository;
pub use repo::profile_repo::ProfileRepository;
pub use repo::store::{RepoError, RepoResult, SqliteStore};
pub use service::error::{CoreError, CoreResult, FailureKind};
pub use service::note_service::{DeleteConfirmation, NoteService};
pub use service::profile_service::ProfileService;

/// Minimal health-check API for embedding layers.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
