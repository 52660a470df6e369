//! Status database model

use sqlx::FromRow;

/// Database model for statuses table
#[derive(Debug, Clone, FromRow)]
pub struct StatusModel {
    pub id: String,
    pub status_name: String,
    pub status_description: String,
}
