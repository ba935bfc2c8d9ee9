//! Pet records and the fixed avatar palette.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ParseEnumError;
use super::id::{OwnerId, PetId};

/// Cosmetic avatar tags. One is assigned uniformly at random when a pet is
/// created and never changes afterwards.
pub const AVATAR_PALETTE: [&str; 16] = [
    "bg-orange-100",
    "bg-amber-100",
    "bg-yellow-100",
    "bg-lime-100",
    "bg-green-100",
    "bg-teal-100",
    "bg-yellow-50",
    "bg-orange-50",
    "bg-red-100",
    "bg-rose-100",
    "bg-pink-100",
    "bg-fuchsia-100",
    "bg-purple-100",
    "bg-indigo-100",
    "bg-blue-100",
    "bg-cyan-100",
];

/// The four supported species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Other,
}

impl Species {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
            Self::Bird => "bird",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dog" => Ok(Self::Dog),
            "cat" => Ok(Self::Cat),
            "bird" => Ok(Self::Bird),
            "other" => Ok(Self::Other),
            _ => Err(ParseEnumError {
                expected: "species",
                got: s.to_string(),
            }),
        }
    }
}

/// A persisted pet. `id`, `owner_id`, and `avatar_color` are assigned by
/// the store at creation and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: PetId,
    pub owner_id: OwnerId,
    pub name: String,
    pub breed: String,
    pub age: f64,
    pub weight: f64,
    #[serde(rename = "type")]
    pub species: Species,
    pub avatar_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Caller-supplied attributes for a pet that does not exist yet.
///
/// Identifier, owner binding, and avatar color are store concerns and have
/// no fields here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    pub name: String,
    pub breed: String,
    pub age: f64,
    pub weight: f64,
    #[serde(rename = "type")]
    pub species: Species,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}
