//! Status service
//!
//! Cached access to the reference list of suggestion statuses.

use suggestion_core::entities::Status;
use tracing::{info, instrument};

use super::cache;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Cache key of the status list
pub const STATUS_CACHE_KEY: &str = "StatusData";

/// Status service
pub struct StatusService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatusService<'a> {
    /// Create a new StatusService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Every status, served from the cache while it is warm.
    ///
    /// On a miss the list is read from the database, cached for the status
    /// TTL and returned.
    #[instrument(skip(self))]
    pub async fn get_statuses(&self) -> ServiceResult<Vec<Status>> {
        if let Some(statuses) = cache::lookup(self.ctx.cache(), STATUS_CACHE_KEY).await {
            return Ok(statuses);
        }

        let statuses = self.ctx.status_repo().find_all().await?;
        cache::store(
            self.ctx.cache(),
            STATUS_CACHE_KEY,
            &statuses,
            self.ctx.cache_settings().status_ttl,
        )
        .await;

        Ok(statuses)
    }

    /// Insert a new status.
    ///
    /// The cached list is left alone and picks the status up when it expires.
    #[instrument(skip(self, status), fields(status_id = %status.id))]
    pub async fn create_status(&self, status: &Status) -> ServiceResult<()> {
        self.ctx.status_repo().create(status).await?;

        info!(status_name = %status.status_name, "Status created");

        Ok(())
    }
}
