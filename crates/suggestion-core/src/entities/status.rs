//! Status entity - a label a suggestion can be moved into

use serde::{Deserialize, Serialize};

use super::new_document_id;

/// Reference-data status ("Completed", "Watching", "Upcoming", ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: String,
    pub status_name: String,
    pub status_description: String,
}

impl Status {
    /// Create a new Status with a generated id
    pub fn new(status_name: impl Into<String>, status_description: impl Into<String>) -> Self {
        Self {
            id: new_document_id(),
            status_name: status_name.into(),
            status_description: status_description.into(),
        }
    }
}
