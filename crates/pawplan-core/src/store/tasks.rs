//! Task state store: the split-partition lifecycle.
//!
//! Two shape-identical tables back the two states. A toggle is a move
//! (delete from the current partition, reinsert into the other under a
//! fresh identifier), so "today's pending" and "completed history" queries
//! never filter across partitions. The price is identifier instability:
//! after a toggle, every previously held handle to the task is stale.

use rusqlite::{Row, params};
use std::str::FromStr;
use tracing::{debug, warn};

use super::{Store, StoreError};
use crate::model::id::{OwnerId, PetId, TaskId};
use crate::model::task::{DATE_FORMAT, NewTask, TIME_FORMAT, Task, TaskKind, TaskState};
use crate::model::validate;
use crate::session::Session;

const TASK_COLUMNS: &str = "task_id, pet_id, owner_id, title, time, date, kind";

const fn partition_table(state: TaskState) -> &'static str {
    match state {
        TaskState::Pending => "pending_tasks",
        TaskState::Completed => "completed_tasks",
    }
}

/// Outcome of a sequential batch insert.
///
/// Inserts stop at the first failure, leaving the prefix committed; the
/// trailing entries are never attempted.
#[derive(Debug)]
#[must_use]
pub struct BatchInsert {
    /// Successfully committed tasks, in input order.
    pub created: Vec<Task>,
    /// The failure that stopped the batch, if any.
    pub abort: Option<BatchAbort>,
}

#[derive(Debug)]
pub struct BatchAbort {
    /// Zero-based input index of the entry that failed.
    pub index: usize,
    pub cause: StoreError,
    /// Entries after the failing one that were never attempted.
    pub unattempted: usize,
}

impl BatchInsert {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.abort.is_none()
    }

    /// Input indices that did not make it into the store: the failing
    /// index followed by everything it cut off.
    #[must_use]
    pub fn failed_indices(&self) -> Vec<usize> {
        self.abort
            .as_ref()
            .map(|abort| (abort.index..=abort.index + abort.unattempted).collect())
            .unwrap_or_default()
    }
}

impl Store {
    /// All tasks for a pet, across both partitions.
    ///
    /// Isolation is enforced by always filtering on the session owner;
    /// a guessed `pet_id` belonging to someone else yields nothing.
    /// Fails closed: unauthenticated sessions and detached stores get an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Propagates query failures.
    pub fn tasks_by_pet(&self, session: &Session, pet_id: &PetId) -> Result<Vec<Task>, StoreError> {
        let Some(identity) = session.identity() else {
            warn!("task listing without identity; returning empty");
            return Ok(Vec::new());
        };
        let Ok(conn) = self.conn() else {
            warn!("task listing with detached store; returning empty");
            return Ok(Vec::new());
        };

        let mut tasks = Vec::new();
        for state in [TaskState::Pending, TaskState::Completed] {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM {}
                 WHERE pet_id = ?1 AND owner_id = ?2",
                partition_table(state)
            ))?;
            let rows = stmt.query_map(params![pet_id.as_str(), identity.id.as_str()], |row| {
                read_task(row, state)
            })?;
            for row in rows {
                tasks.push(row?);
            }
        }

        tasks.sort_by(|a, b| {
            (a.date, a.time, a.id.as_str()).cmp(&(b.date, b.time, b.id.as_str()))
        });
        Ok(tasks)
    }

    /// Create a task. New tasks always land in the pending partition;
    /// there is no way to create one already completed.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] on malformed attributes, otherwise the
    /// owner-upsert and insert failures.
    pub fn create_task(&mut self, session: &Session, new: &NewTask) -> Result<Task, StoreError> {
        validate::new_task(new)?;
        let owner_id = self.ensure_owner(session)?;

        let task = Task {
            id: TaskId::generate(self.rng_mut()),
            pet_id: new.pet_id.clone(),
            owner_id,
            title: new.title.clone(),
            time: new.time,
            date: new.date,
            kind: new.kind,
            state: TaskState::Pending,
        };
        self.insert_task(&task)?;

        debug!(task = %task.id, pet = %task.pet_id, "created task");
        Ok(task)
    }

    /// Insert a batch of tasks sequentially.
    ///
    /// Not transactional: each insert commits on its own, and the first
    /// failure stops the batch with the prefix already persisted. The
    /// outcome reports exactly which input indices never landed.
    pub fn create_tasks(&mut self, session: &Session, batch: &[NewTask]) -> BatchInsert {
        let mut created = Vec::with_capacity(batch.len());
        for (index, new) in batch.iter().enumerate() {
            match self.create_task(session, new) {
                Ok(task) => created.push(task),
                Err(cause) => {
                    warn!(index, %cause, "batch insert aborted");
                    return BatchInsert {
                        created,
                        abort: Some(BatchAbort {
                            index,
                            cause,
                            unattempted: batch.len() - index - 1,
                        }),
                    };
                }
            }
        }
        BatchInsert {
            created,
            abort: None,
        }
    }

    /// Replace a task's fields in place, within the partition its state
    /// tag names. A plain update never moves a task between partitions;
    /// only [`Store::toggle_task`] does.
    ///
    /// # Errors
    ///
    /// [`StoreError::StaleTaskId`] when the identifier is absent from
    /// that partition, typically because a toggle already moved it.
    pub fn update_task(&self, session: &Session, task: &Task) -> Result<Task, StoreError> {
        validate::task_title(&task.title)?;
        let owner_id = self.ensure_owner(session)?;

        let updated = self.conn()?.execute(
            &format!(
                "UPDATE {} SET pet_id = ?1, title = ?2, time = ?3, date = ?4, kind = ?5
                 WHERE task_id = ?6 AND owner_id = ?7",
                partition_table(task.state)
            ),
            params![
                task.pet_id.as_str(),
                task.title,
                task.time.format(TIME_FORMAT).to_string(),
                task.date.format(DATE_FORMAT).to_string(),
                task.kind.as_str(),
                task.id.as_str(),
                owner_id.as_str(),
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::StaleTaskId {
                id: task.id.clone(),
            });
        }

        debug!(task = %task.id, "updated task");
        Ok(Task {
            owner_id,
            ..task.clone()
        })
    }

    /// Move a task to the opposite partition.
    ///
    /// The record is removed from its current partition and reinserted
    /// into the other one under a freshly assigned identifier; the
    /// returned record is the only valid handle afterwards. The two steps
    /// commit independently; the remove is verified before the insert is
    /// attempted, so a stale handle never half-applies.
    ///
    /// # Errors
    ///
    /// [`StoreError::StaleTaskId`] when the current partition has no such
    /// identifier.
    pub fn toggle_task(&mut self, session: &Session, task: &Task) -> Result<Task, StoreError> {
        let owner_id = self.ensure_owner(session)?;

        let removed = self.conn()?.execute(
            &format!(
                "DELETE FROM {} WHERE task_id = ?1 AND owner_id = ?2",
                partition_table(task.state)
            ),
            params![task.id.as_str(), owner_id.as_str()],
        )?;
        if removed == 0 {
            return Err(StoreError::StaleTaskId {
                id: task.id.clone(),
            });
        }

        let moved = Task {
            id: TaskId::generate(self.rng_mut()),
            owner_id,
            state: task.state.flipped(),
            ..task.clone()
        };
        self.insert_task(&moved)?;

        debug!(
            old = %task.id,
            new = %moved.id,
            completed = moved.is_completed(),
            "toggled task"
        );
        Ok(moved)
    }

    /// Delete a task wherever it currently lives.
    ///
    /// The partition is resolved here (pending probed first, then
    /// completed) so callers hold no partition hint that could silently
    /// go stale. Returns which partition held the record.
    ///
    /// # Errors
    ///
    /// [`StoreError::StaleTaskId`] when neither partition has the
    /// identifier.
    pub fn delete_task(&self, session: &Session, id: &TaskId) -> Result<TaskState, StoreError> {
        let owner_id = self.ensure_owner(session)?;

        for state in [TaskState::Pending, TaskState::Completed] {
            let removed = self.conn()?.execute(
                &format!(
                    "DELETE FROM {} WHERE task_id = ?1 AND owner_id = ?2",
                    partition_table(state)
                ),
                params![id.as_str(), owner_id.as_str()],
            )?;
            if removed > 0 {
                debug!(task = %id, completed = state.is_completed(), "deleted task");
                return Ok(state);
            }
        }

        Err(StoreError::StaleTaskId { id: id.clone() })
    }

    fn insert_task(&self, task: &Task) -> Result<(), StoreError> {
        self.conn()?.execute(
            &format!(
                "INSERT INTO {} ({TASK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                partition_table(task.state)
            ),
            params![
                task.id.as_str(),
                task.pet_id.as_str(),
                task.owner_id.as_str(),
                task.title,
                task.time.format(TIME_FORMAT).to_string(),
                task.date.format(DATE_FORMAT).to_string(),
                task.kind.as_str(),
            ],
        )?;
        Ok(())
    }
}

fn read_task(row: &Row<'_>, state: TaskState) -> rusqlite::Result<Task> {
    let time_raw: String = row.get(4)?;
    let time = chrono::NaiveTime::parse_from_str(&time_raw, TIME_FORMAT).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(error))
    })?;

    let date_raw: String = row.get(5)?;
    let date = chrono::NaiveDate::parse_from_str(&date_raw, DATE_FORMAT).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(error))
    })?;

    let kind_raw: String = row.get(6)?;
    let kind = TaskKind::from_str(&kind_raw).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(error))
    })?;

    Ok(Task {
        id: TaskId::new_unchecked(row.get::<_, String>(0)?),
        pet_id: PetId::new_unchecked(row.get::<_, String>(1)?),
        owner_id: OwnerId::new(row.get::<_, String>(2)?),
        title: row.get(3)?,
        time,
        date,
        kind,
        state,
    })
}
