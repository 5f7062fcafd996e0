//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the profile and note managers.
//! - Turn repository outcomes into tagged `CoreError` failures.
//!
//! # Invariants
//! - Every operation takes the principal explicitly; nothing is read from
//!   ambient request state.
//! - Note operations always re-resolve the principal's profile first.

pub mod error;
pub mod note_service;
pub mod profile_service;
