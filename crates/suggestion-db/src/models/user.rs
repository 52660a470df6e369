//! User database model

use sqlx::types::Json;
use sqlx::FromRow;

use suggestion_core::entities::BasicSuggestion;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: String,
    pub object_identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub email_address: String,
    pub authored_suggestions: Json<Vec<BasicSuggestion>>,
    pub voted_on_suggestions: Json<Vec<BasicSuggestion>>,
    pub version: i64,
}
