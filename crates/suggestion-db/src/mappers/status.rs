//! Status entity <-> model mapper

use suggestion_core::entities::Status;

use crate::models::StatusModel;

/// Convert StatusModel to Status entity
impl From<StatusModel> for Status {
    fn from(model: StatusModel) -> Self {
        Status {
            id: model.id,
            status_name: model.status_name,
            status_description: model.status_description,
        }
    }
}
