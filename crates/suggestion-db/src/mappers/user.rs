//! User entity <-> model mapper

use sqlx::types::Json;

use suggestion_core::entities::{BasicSuggestion, User};

use crate::models::UserModel;

/// Convert UserModel to User entity
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: model.id,
            object_identifier: model.object_identifier,
            first_name: model.first_name,
            last_name: model.last_name,
            display_name: model.display_name,
            email_address: model.email_address,
            authored_suggestions: model.authored_suggestions.0,
            voted_on_suggestions: model.voted_on_suggestions.0,
            version: model.version,
        }
    }
}

/// User entity reference prepared for binding
pub struct UserWrite<'a> {
    pub id: &'a str,
    pub object_identifier: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub display_name: &'a str,
    pub email_address: &'a str,
    pub authored_suggestions: Json<&'a [BasicSuggestion]>,
    pub voted_on_suggestions: Json<&'a [BasicSuggestion]>,
    pub version: i64,
}

impl<'a> UserWrite<'a> {
    pub fn new(user: &'a User) -> Self {
        Self {
            id: &user.id,
            object_identifier: &user.object_identifier,
            first_name: &user.first_name,
            last_name: &user.last_name,
            display_name: &user.display_name,
            email_address: &user.email_address,
            authored_suggestions: Json(user.authored_suggestions.as_slice()),
            voted_on_suggestions: Json(user.voted_on_suggestions.as_slice()),
            version: user.version,
        }
    }
}
