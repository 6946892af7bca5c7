use std::fmt;

use vellum_types::{ClientId, ObjectId};

/// Client-scoped address of an object body, rendered as `client/object-id`.
///
/// Built only from a validated [`ObjectId`], so the sentinel and malformed
/// identifiers can never reach a store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    client: ClientId,
    object: ObjectId,
}

impl ObjectKey {
    pub fn new(client: ClientId, object: ObjectId) -> Self {
        Self { client, object }
    }

    pub fn client(&self) -> &ClientId {
        &self.client
    }

    pub fn object(&self) -> &ObjectId {
        &self.object
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.client, self.object)
    }
}
