//! Suggestion service
//!
//! Cached suggestion lists, point lookups, and the transactional writes that
//! keep a suggestion and its author's or voter's user document in step.

use suggestion_core::entities::{Suggestion, VoteToggle};
use suggestion_core::traits::SuggestionTransaction;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use super::cache;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Cache key of the active suggestion list
pub const SUGGESTION_CACHE_KEY: &str = "SuggestionData";

/// Suggestion service
pub struct SuggestionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SuggestionService<'a> {
    /// Create a new SuggestionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Every suggestion that is not archived, served from the cache while it is warm
    #[instrument(skip(self))]
    pub async fn get_suggestions(&self) -> ServiceResult<Vec<Suggestion>> {
        if let Some(suggestions) = cache::lookup(self.ctx.cache(), SUGGESTION_CACHE_KEY).await {
            return Ok(suggestions);
        }

        let suggestions = self.ctx.suggestion_repo().find_active().await?;
        cache::store(
            self.ctx.cache(),
            SUGGESTION_CACHE_KEY,
            &suggestions,
            self.ctx.cache_settings().suggestion_ttl,
        )
        .await;

        Ok(suggestions)
    }

    /// Active suggestions approved for release
    #[instrument(skip(self))]
    pub async fn get_approved_suggestions(&self) -> ServiceResult<Vec<Suggestion>> {
        let suggestions = self.get_suggestions().await?;
        Ok(suggestions.into_iter().filter(Suggestion::is_approved).collect())
    }

    /// Active suggestions that are neither approved nor rejected
    #[instrument(skip(self))]
    pub async fn get_suggestions_waiting_for_approval(&self) -> ServiceResult<Vec<Suggestion>> {
        let suggestions = self.get_suggestions().await?;
        Ok(suggestions
            .into_iter()
            .filter(Suggestion::is_waiting_for_approval)
            .collect())
    }

    /// Read one suggestion straight from the database
    #[instrument(skip(self))]
    pub async fn get_suggestion(&self, id: &str) -> ServiceResult<Suggestion> {
        self.ctx
            .suggestion_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Suggestion", id))
    }

    /// Replace a suggestion and drop the cached list
    ///
    /// The replace only succeeds if `suggestion.version` is still the stored
    /// version; otherwise a conflict is returned and nothing is written.
    #[instrument(skip(self, suggestion), fields(suggestion_id = %suggestion.id))]
    pub async fn update_suggestion(&self, suggestion: &Suggestion) -> ServiceResult<()> {
        suggestion.validate()?;

        self.ctx.suggestion_repo().replace(suggestion).await?;
        cache::invalidate(self.ctx.cache(), SUGGESTION_CACHE_KEY).await;

        info!(
            approved = suggestion.approved_for_release,
            rejected = suggestion.rejected,
            archived = suggestion.archived,
            "Suggestion updated"
        );

        Ok(())
    }

    /// Insert a suggestion and record it on its author, in one transaction
    #[instrument(skip(self, suggestion), fields(suggestion_id = %suggestion.id, author_id = %suggestion.author.id))]
    pub async fn create_suggestion(&self, suggestion: &Suggestion) -> ServiceResult<()> {
        suggestion.validate()?;

        let mut tx = self.ctx.suggestion_repo().begin().await?;
        let result = self.write_new_suggestion(tx.as_mut(), suggestion).await;
        finish(tx, result).await?;

        cache::invalidate(self.ctx.cache(), SUGGESTION_CACHE_KEY).await;

        info!("Suggestion created");

        Ok(())
    }

    /// Toggle `user_id`'s vote on a suggestion, in one transaction.
    ///
    /// Adds the vote when absent and withdraws it when present, mirroring
    /// the change in the user's voted-on list.
    #[instrument(skip(self))]
    pub async fn upvote_suggestion(
        &self,
        suggestion_id: &str,
        user_id: &str,
    ) -> ServiceResult<VoteToggle> {
        let mut tx = self.ctx.suggestion_repo().begin().await?;
        let result = self.toggle_vote(tx.as_mut(), suggestion_id, user_id).await;
        let toggle = finish(tx, result).await?;

        cache::invalidate(self.ctx.cache(), SUGGESTION_CACHE_KEY).await;

        info!(?toggle, "Vote toggled");

        Ok(toggle)
    }

    async fn write_new_suggestion(
        &self,
        tx: &mut dyn SuggestionTransaction,
        suggestion: &Suggestion,
    ) -> ServiceResult<()> {
        tx.insert_suggestion(suggestion).await?;

        let author_id = &suggestion.author.id;
        let mut author = tx
            .find_user(author_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", author_id.as_str()))?;

        if !author.add_authored(suggestion.to_basic()) {
            debug!("Author already lists this suggestion");
        }
        tx.replace_user(&author).await?;

        Ok(())
    }

    async fn toggle_vote(
        &self,
        tx: &mut dyn SuggestionTransaction,
        suggestion_id: &str,
        user_id: &str,
    ) -> ServiceResult<VoteToggle> {
        let mut suggestion = tx
            .find_suggestion(suggestion_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Suggestion", suggestion_id))?;

        let toggle = suggestion.toggle_vote(user_id);
        tx.replace_suggestion(&suggestion).await?;

        let mut user = tx
            .find_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;

        match toggle {
            VoteToggle::Added => {
                if !user.add_vote(suggestion.to_basic()) {
                    warn!("User already listed the suggestion as voted on");
                }
            }
            VoteToggle::Removed => {
                if !user.remove_vote(&suggestion.id) {
                    warn!("User did not list the suggestion as voted on");
                }
            }
        }
        tx.replace_user(&user).await?;

        Ok(toggle)
    }
}

/// Commit on success; otherwise abort and hand back the original error
async fn finish<T>(
    tx: Box<dyn SuggestionTransaction>,
    result: ServiceResult<T>,
) -> ServiceResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            warn!(error = %err, "Aborting transaction");
            if let Err(abort_err) = tx.abort().await {
                warn!(error = %abort_err, "Transaction abort failed");
            }
            Err(err)
        }
    }
}
