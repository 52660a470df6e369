//! # suggestion-service
//!
//! Application layer: the status and suggestion data services, their cached
//! reads and transactional writes, and the context that wires them to
//! storage and cache.

pub mod services;

pub use services::{
    create_service_context, CacheSettings, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, StatusService, SuggestionService, STATUS_CACHE_KEY, SUGGESTION_CACHE_KEY,
};
