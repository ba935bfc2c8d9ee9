//! Task records and the two-state lifecycle.
//!
//! Task state is a sum type, not a mutable flag: the variant decides which
//! physical partition holds the record, and the only way to change it is
//! [`crate::store::Store::toggle_task`], which moves the record and assigns
//! a fresh identifier. On the wire the state still serializes as the
//! boolean `completed` field the UI layer expects.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ParseEnumError;
use super::id::{OwnerId, PetId, TaskId};

/// Storage format for the task clock time.
pub const TIME_FORMAT: &str = "%H:%M";
/// Storage format for the task calendar date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The five kinds of care task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Food,
    Walk,
    Medication,
    Play,
    Grooming,
}

impl TaskKind {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Walk => "walk",
            Self::Medication => "medication",
            Self::Play => "play",
            Self::Grooming => "grooming",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "walk" => Ok(Self::Walk),
            "medication" => Ok(Self::Medication),
            "play" => Ok(Self::Play),
            "grooming" => Ok(Self::Grooming),
            _ => Err(ParseEnumError {
                expected: "task kind",
                got: s.to_string(),
            }),
        }
    }
}

/// Which partition a task lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Pending,
    Completed,
}

impl TaskState {
    /// The opposite state, the target of a toggle.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }

    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// A persisted task. The identifier is only valid for the partition the
/// state tag names; toggling invalidates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub pet_id: PetId,
    pub owner_id: OwnerId,
    pub title: String,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(rename = "completed", with = "completed_flag")]
    pub state: TaskState,
}

impl Task {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.state.is_completed()
    }
}

/// Caller-supplied attributes for a task that does not exist yet.
///
/// There is no state field: tasks are always created pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub pet_id: PetId,
    pub title: String,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TaskKind,
}

/// Serialize a [`NaiveTime`] as the wire/storage `HH:MM` string.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    use super::TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, TIME_FORMAT).map_err(D::Error::custom)
    }
}

/// Serialize [`TaskState`] as the wire boolean `completed`.
mod completed_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TaskState;

    pub fn serialize<S: Serializer>(state: &TaskState, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(state.is_completed())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TaskState, D::Error> {
        let completed = bool::deserialize(deserializer)?;
        Ok(if completed {
            TaskState::Completed
        } else {
            TaskState::Pending
        })
    }
}
