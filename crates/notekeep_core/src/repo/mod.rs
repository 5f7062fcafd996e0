//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define ownership-scoped data access contracts for profiles and notes.
//! - Isolate SQLite query and transaction details from the managers.
//!
//! # Invariants
//! - Every note query filters by owner profile and by `deleted_at IS NULL`,
//!   except the explicit administrative read `get_note_any_state`.
//! - Every write runs its full read-validate-write sequence in one immediate
//!   transaction and commits only at the end.
//! - Semantic outcomes (`NoteNotFound`, `DuplicateProfile`, `Unchanged`, ...)
//!   are reported separately from store transport errors.

pub mod note_repo;
pub mod profile_repo;
pub mod store;
