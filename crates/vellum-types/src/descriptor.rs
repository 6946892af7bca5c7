use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::object::ObjectId;
use crate::temporal::http_date_from_epoch;

/// Metadata the index keeps for one stored object.
///
/// Serialized as `{"objectId": "...", "title": "...", "date": 1700000000}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDescriptor {
    pub object_id: ObjectId,
    pub title: String,
    /// Creation time in seconds since the UNIX epoch.
    pub date: i64,
}

impl ObjectDescriptor {
    pub fn new(object_id: ObjectId, title: impl Into<String>, date: i64) -> Self {
        Self {
            object_id,
            title: title.into(),
            date,
        }
    }

    /// Creation time as an RFC 1123 GMT date.
    pub fn http_date(&self) -> Result<String, TypeError> {
        http_date_from_epoch(self.date)
    }
}
