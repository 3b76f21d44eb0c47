use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Number of an indirect object within a revision.
///
/// An `ObjectNumber` is how one object refers to another that is stored
/// elsewhere in the document. The generation number is not tracked: an
/// incremental update that reuses a number replaces the object for the
/// revision that contains it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectNumber(u64);

impl ObjectNumber {
    /// Create an object number.
    pub const fn new(number: u64) -> Self {
        Self(number)
    }

    /// The raw numeric value.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ObjectNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectNumber({})", self.0)
    }
}

impl fmt::Display for ObjectNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ObjectNumber {
    fn from(number: u64) -> Self {
        Self(number)
    }
}

impl From<ObjectNumber> for u64 {
    fn from(number: ObjectNumber) -> Self {
        number.0
    }
}

/// Parses either a bare number (`"12"`) or a reference triple (`"12 0 R"`).
impl FromStr for ObjectNumber {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let number = parts
            .next()
            .ok_or_else(|| TypeError::InvalidObjectNumber(s.to_string()))?;
        match (parts.next(), parts.next(), parts.next()) {
            (None, None, None) => {}
            (Some(generation), Some("R"), None)
                if generation.chars().all(|c| c.is_ascii_digit()) => {}
            _ => return Err(TypeError::InvalidObjectNumber(s.to_string())),
        }
        number
            .parse::<u64>()
            .map(Self)
            .map_err(|_| TypeError::InvalidObjectNumber(s.to_string()))
    }
}
