//! Owner registry: idempotent upsert keyed by the external identity.

use rusqlite::{OptionalExtension, Row, params};
use tracing::{debug, warn};

use super::{Store, StoreError, now_us};
use crate::model::id::OwnerId;
use crate::model::owner::Owner;
use crate::session::Session;

impl Store {
    /// Ensure an owner record exists for the session identity.
    ///
    /// Called on entry to every write path. A missing record is inserted
    /// with `created_at_us = now`; an existing one gets its identity
    /// derived fields merged (last writer wins) and `updated_at_us`
    /// bumped. `created_at_us` never changes. Exactly one write either
    /// way, keyed by the identity itself, so repeated and concurrent
    /// calls are safe.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unauthenticated`] without an identity,
    /// [`StoreError::Unavailable`] when detached.
    pub fn ensure_owner(&self, session: &Session) -> Result<OwnerId, StoreError> {
        let identity = session.identity().ok_or(StoreError::Unauthenticated)?;
        let conn = self.conn()?;

        let now = now_us();
        conn.execute(
            "INSERT INTO owners (owner_id, display_name, email, created_at_us, updated_at_us)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(owner_id) DO UPDATE SET
                 display_name = excluded.display_name,
                 email = excluded.email,
                 updated_at_us = excluded.updated_at_us",
            params![
                identity.id.as_str(),
                identity.display_name,
                identity.email,
                now
            ],
        )?;

        debug!(owner = %identity.id, "ensured owner record");
        Ok(identity.id.clone())
    }

    /// The owner record for the current session, ensuring it exists
    /// first. Returns `None` when unauthenticated or detached.
    ///
    /// # Errors
    ///
    /// Propagates upsert or query failures.
    pub fn my_owner(&self, session: &Session) -> Result<Option<Owner>, StoreError> {
        if session.identity().is_none() {
            warn!("owner lookup without identity; returning none");
            return Ok(None);
        }
        if self.conn().is_err() {
            warn!("owner lookup with detached store; returning none");
            return Ok(None);
        }

        let owner_id = self.ensure_owner(session)?;
        self.owner_by_id(&owner_id)
    }

    /// Point lookup by owner identifier. Returns `None` when the record
    /// is absent or the store is detached.
    ///
    /// # Errors
    ///
    /// Propagates query failures.
    pub fn owner_by_id(&self, id: &OwnerId) -> Result<Option<Owner>, StoreError> {
        let Ok(conn) = self.conn() else {
            return Ok(None);
        };

        let owner = conn
            .query_row(
                "SELECT owner_id, display_name, email, created_at_us, updated_at_us
                 FROM owners WHERE owner_id = ?1",
                params![id.as_str()],
                read_owner,
            )
            .optional()?;
        Ok(owner)
    }
}

fn read_owner(row: &Row<'_>) -> rusqlite::Result<Owner> {
    Ok(Owner {
        id: OwnerId::new(row.get::<_, String>(0)?),
        display_name: row.get(1)?,
        email: row.get(2)?,
        created_at_us: row.get(3)?,
        updated_at_us: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::{Store, StoreError};
    use crate::session::{Identity, Session};

    fn store() -> Store {
        Store::open_in_memory().expect("open in-memory store")
    }

    fn session(id: &str) -> Session {
        Session::authenticated(Identity::new(id))
    }

    #[test]
    fn upsert_is_idempotent() {
        let store = store();
        let session = session("uid-1");

        let first = store.ensure_owner(&session).expect("first ensure");
        let created = store
            .my_owner(&session)
            .expect("lookup")
            .expect("owner exists");

        let second = store.ensure_owner(&session).expect("second ensure");
        let merged = store
            .my_owner(&session)
            .expect("lookup")
            .expect("owner exists");

        assert_eq!(first, second);
        assert_eq!(created.created_at_us, merged.created_at_us);
        assert!(merged.updated_at_us >= created.updated_at_us);

        let count: i64 = store
            .conn()
            .expect("attached")
            .query_row("SELECT COUNT(*) FROM owners", [], |row| row.get(0))
            .expect("count owners");
        assert_eq!(count, 1);
    }

    #[test]
    fn upsert_merges_identity_fields() {
        let store = store();
        store
            .ensure_owner(&Session::authenticated(
                Identity::new("uid-1").with_display_name("Alex"),
            ))
            .expect("first ensure");

        store
            .ensure_owner(&Session::authenticated(
                Identity::new("uid-1")
                    .with_display_name("Alexandra")
                    .with_email("alex@example.com"),
            ))
            .expect("second ensure");

        let owner = store
            .owner_by_id(&"uid-1".into())
            .expect("lookup")
            .expect("owner exists");
        assert_eq!(owner.display_name.as_deref(), Some("Alexandra"));
        assert_eq!(owner.email.as_deref(), Some("alex@example.com"));
    }

    #[test]
    fn anonymous_sessions_cannot_ensure() {
        let store = store();
        assert!(matches!(
            store.ensure_owner(&Session::anonymous()),
            Err(StoreError::Unauthenticated)
        ));
    }

    #[test]
    fn detached_store_degrades_reads_and_rejects_writes() {
        let store = Store::detached();
        let session = session("uid-1");

        assert!(matches!(
            store.ensure_owner(&session),
            Err(StoreError::Unavailable { .. })
        ));
        assert_eq!(store.my_owner(&session).expect("degraded read"), None);
        assert_eq!(
            store.owner_by_id(&"uid-1".into()).expect("degraded read"),
            None
        );
    }
}
