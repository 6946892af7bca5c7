use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// The reserved all-zero identifier. It never names stored data; requests for
/// it are answered with a fixed sample object.
pub const SENTINEL_OBJECT_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Identifier of a stored object: always a version-4 UUID.
///
/// The only ways to obtain an `ObjectId` are [`classify`], [`FromStr`], and
/// deserialization, all of which apply the same rules. Any `ObjectId` can
/// therefore be used to address the content store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Generate a fresh random identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

/// Lowercase hyphenated form, e.g. `6f1c2b0e-8d4a-4c55-9a1e-3b7f0c9d2e11`.
impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match classify(s) {
            IdentifierClass::Valid(id) => Ok(id),
            IdentifierClass::Empty => Err(TypeError::Empty),
            IdentifierClass::Sentinel => Err(TypeError::Reserved(s.to_string())),
            IdentifierClass::Malformed(err) => Err(err),
        }
    }
}

impl TryFrom<String> for ObjectId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.to_string()
    }
}

/// Classification of a raw identifier taken from a request path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentifierClass {
    Empty,
    Sentinel,
    Valid(ObjectId),
    Malformed(TypeError),
}

/// Classify a raw identifier.
///
/// The sentinel is matched on the exact string before any parsing, so only
/// the canonical all-zero form is treated as the sample object. Every other
/// input must parse as a UUID whose version field is 4.
pub fn classify(raw: &str) -> IdentifierClass {
    if raw.is_empty() {
        return IdentifierClass::Empty;
    }
    if raw == SENTINEL_OBJECT_ID {
        return IdentifierClass::Sentinel;
    }
    match Uuid::parse_str(raw) {
        Ok(uuid) if uuid.get_version_num() == 4 => IdentifierClass::Valid(ObjectId(uuid)),
        Ok(uuid) => IdentifierClass::Malformed(TypeError::UnsupportedVersion(uuid.get_version_num())),
        Err(e) => IdentifierClass::Malformed(TypeError::InvalidUuid(e.to_string())),
    }
}
