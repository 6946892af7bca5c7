//! The resolved index snapshot for one client.

use serde::{Deserialize, Serialize};
use vellum_types::{ObjectDescriptor, ObjectId};

/// Ordered sequence of descriptors known for one client.
///
/// Order is whatever the resolver returned. Duplicate ids are kept as-is;
/// [`ClientIndex::find`] returns the first one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientIndex {
    entries: Vec<ObjectDescriptor>,
}

impl ClientIndex {
    pub fn new(entries: Vec<ObjectDescriptor>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectDescriptor> {
        self.entries.iter()
    }

    /// Locate the descriptor for `id`.
    ///
    /// Linear scan, stopping at the first match. Per-client indexes are small,
    /// so no lookup table is built.
    pub fn find(&self, id: &ObjectId) -> Option<&ObjectDescriptor> {
        // Compared as UUIDs, so case differences in the request still match.
        self.entries.iter().find(|d| d.object_id == *id)
    }
}

impl From<Vec<ObjectDescriptor>> for ClientIndex {
    fn from(entries: Vec<ObjectDescriptor>) -> Self {
        Self::new(entries)
    }
}

impl<'a> IntoIterator for &'a ClientIndex {
    type Item = &'a ObjectDescriptor;
    type IntoIter = std::slice::Iter<'a, ObjectDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
