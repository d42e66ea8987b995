use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// One object to fetch and the path to write it to
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct RetrievalTask {
    pub oid: ObjectId,
    pub path: String,
}

impl From<IndexEntry> for RetrievalTask {
    /// Surrounding whitespace in the recorded name is not kept
    fn from(entry: IndexEntry) -> Self {
        RetrievalTask {
            oid: entry.oid,
            path: entry.name.trim().to_string(),
        }
    }
}
