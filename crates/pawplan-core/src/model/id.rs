//! Prefixed record identifiers.
//!
//! Pets and tasks get store-assigned identifiers: a type prefix plus a
//! random lowercase base-36 suffix. Owner identifiers are different: they
//! come from the external identity provider verbatim and carry no prefix.
//!
//! Task identifiers are deliberately *not* stable across a state toggle:
//! moving a task between partitions reinserts it under a fresh identifier.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 12;

fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_SUFFIX_LEN)
        .map(|_| {
            let index = rng.gen_range(0..ID_ALPHABET.len());
            char::from(ID_ALPHABET[index])
        })
        .collect()
}

/// Error returned when an identifier string does not carry the expected
/// prefix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {expected} identifier: '{got}'")]
pub struct InvalidId {
    pub expected: &'static str,
    pub got: String,
}

/// Stable external identifier of an owner, supplied by the identity
/// provider and used verbatim as the primary key of the owner record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Store-assigned pet identifier (`pet-` prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(String);

/// Store-assigned task identifier (`tsk-` prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

macro_rules! impl_prefixed_id {
    ($name:ident, $prefix:literal, $label:literal) => {
        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Generate a fresh identifier from the given randomness source.
            pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
                Self(format!("{}{}", Self::PREFIX, random_suffix(rng)))
            }

            /// Wrap a raw string without checking the prefix.
            ///
            /// Intended for values read back from the store, which are
            /// prefix-checked at the schema level.
            pub fn new_unchecked(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Parse an identifier, rejecting strings without the prefix.
            pub fn parse(raw: &str) -> Result<Self, InvalidId> {
                if raw.len() > Self::PREFIX.len() && raw.starts_with(Self::PREFIX) {
                    Ok(Self(raw.to_string()))
                } else {
                    Err(InvalidId {
                        expected: $label,
                        got: raw.to_string(),
                    })
                }
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

impl_prefixed_id!(PetId, "pet-", "pet");
impl_prefixed_id!(TaskId, "tsk-", "task");
