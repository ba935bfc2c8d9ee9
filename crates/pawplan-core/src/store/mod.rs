//! Owner-scoped persistence over the split-partition document store.
//!
//! One [`Store`] handle per session. Every operation takes an explicit
//! [`Session`](crate::session::Session); there is no ambient identity.
//! Reads fail closed (empty results) when the session is unauthenticated
//! or the store is detached; writes reject with a typed [`StoreError`].
//!
//! Compound operations (owner upsert, cascade delete, toggle, batch
//! insert) are sequences of independent request/response units: no
//! multi-step transaction wraps them, and a failure partway through is
//! reported as the partially-applied state it leaves behind.

mod owners;
mod pets;
mod tasks;

pub use tasks::{BatchAbort, BatchInsert};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use crate::config::TrackerConfig;
use crate::db;
use crate::error::ErrorCode;
use crate::model::id::{PetId, TaskId};
use crate::model::validate::ValidationError;

/// Typed failure surface of every store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("document store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("pet {id} not found")]
    PetNotFound { id: PetId },

    /// The identifier is absent from its assumed partition, usually
    /// because a toggle already moved the task and the caller holds the
    /// old handle.
    #[error("task {id} not found; the identifier is no longer valid")]
    StaleTaskId { id: TaskId },

    /// The pet record was removed but some dependent task deletes failed.
    #[error("cascade for pet {pet_id} removed {deleted} of {attempted} tasks")]
    PartialCascade {
        pet_id: PetId,
        deleted: usize,
        attempted: usize,
    },

    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
}

impl StoreError {
    /// Machine-readable code for the embedding UI.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthenticated => ErrorCode::Unauthenticated,
            Self::Unavailable { .. } => ErrorCode::StoreUnavailable,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::PetNotFound { .. } => ErrorCode::PetNotFound,
            Self::StaleTaskId { .. } => ErrorCode::StaleTaskId,
            Self::PartialCascade { .. } => ErrorCode::PartialCascade,
            Self::Sql(_) => ErrorCode::SqlFailure,
        }
    }
}

/// Handle to the backing document store.
///
/// Randomness for identifiers and avatar colors is injectable through
/// [`Store::with_rng`], so tests can seed it.
pub struct Store {
    conn: Option<Connection>,
    rng: StdRng,
}

impl Store {
    /// Open (or create) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the database cannot be
    /// opened or migrated.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        match db::open_store(path) {
            Ok(conn) => Ok(Self::attached(conn)),
            Err(error) => Err(StoreError::Unavailable {
                reason: format!("{error:#}"),
            }),
        }
    }

    /// Open the store described by a [`TrackerConfig`]: its database
    /// path (explicit or platform default) and busy timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the database cannot be
    /// opened or migrated.
    pub fn from_config(config: &TrackerConfig) -> Result<Self, StoreError> {
        let path = config.database_path();
        let busy_timeout = Duration::from_millis(config.store.busy_timeout_ms);
        match db::open_store_with_timeout(&path, busy_timeout) {
            Ok(conn) => Ok(Self::attached(conn)),
            Err(error) => Err(StoreError::Unavailable {
                reason: format!("{error:#}"),
            }),
        }
    }

    /// Open an ephemeral in-memory store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the schema cannot be set
    /// up.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        match db::open_in_memory() {
            Ok(conn) => Ok(Self::attached(conn)),
            Err(error) => Err(StoreError::Unavailable {
                reason: format!("{error:#}"),
            }),
        }
    }

    /// A store with no backing database: reads degrade to empty results,
    /// writes reject with [`StoreError::Unavailable`].
    #[must_use]
    pub fn detached() -> Self {
        Self {
            conn: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the randomness source behind identifiers and avatar
    /// colors.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.conn.is_some()
    }

    fn attached(conn: Connection) -> Self {
        Self {
            conn: Some(conn),
            rng: StdRng::from_entropy(),
        }
    }

    pub(crate) fn conn(&self) -> Result<&Connection, StoreError> {
        self.conn.as_ref().ok_or_else(|| StoreError::Unavailable {
            reason: "no backing database".to_string(),
        })
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

pub(crate) fn now_us() -> i64 {
    chrono::Utc::now().timestamp_micros()
}
