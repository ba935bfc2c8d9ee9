//! pawplan-core: owner-scoped pet care tracking.
//!
//! The crate is the persistence and projection core behind a pet-care
//! UI: owners, their pets, and per-pet scheduled care tasks, plus a pure
//! calendar view over the task list.
//!
//! - [`model`]: owners, pets, tasks, validation; task state is a sum
//!   type whose variant names the physical partition holding the record
//! - [`store`]: the SQLite-backed document store, covering the owner
//!   registry, the pet repository with cascade cleanup, and the
//!   split-partition task lifecycle
//! - [`calendar`]: stateless month projection and the past-date
//!   selection policy
//! - [`session`]: explicit identity context; nothing reads ambient auth
//!   state
//! - [`config`] and [`db`]: TOML configuration and SQLite plumbing
//!
//! # Conventions
//!
//! - Store operations return typed [`store::StoreError`] values; each
//!   maps to a stable [`error::ErrorCode`] for the embedding UI.
//! - Logging uses `tracing` macros; subscriber setup belongs to the
//!   embedding application.

pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod session;
pub mod store;

pub use error::ErrorCode;
pub use session::{Identity, IdentityProvider, Session};
pub use store::{Store, StoreError};
