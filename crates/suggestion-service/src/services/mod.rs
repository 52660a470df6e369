//! Data services
//!
//! Each service borrows a `ServiceContext` and exposes the operations the
//! presentation layer calls: cached list reads, point lookups and the
//! transactional writes that keep suggestions and users consistent.

mod cache;
pub mod context;
pub mod error;
pub mod status;
pub mod suggestion;

pub use context::{create_service_context, CacheSettings, ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use status::{StatusService, STATUS_CACHE_KEY};
pub use suggestion::{SuggestionService, SUGGESTION_CACHE_KEY};
