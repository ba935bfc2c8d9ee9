//! Owner record: the authenticated identity that scopes all pets and tasks.

use serde::{Deserialize, Serialize};

use super::id::OwnerId;

/// One record per identity, created lazily on the first write and merged on
/// every subsequent write-path entry. Never explicitly deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: OwnerId,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}
