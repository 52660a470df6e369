//! SuggestionService behaviour over the in-memory store

mod common;

use std::collections::HashSet;

use common::{suggestion_by, Fixture};
use suggestion_core::entities::{Status, VoteToggle};
use suggestion_core::traits::Cache;
use suggestion_db::FailPoint;
use suggestion_service::{SuggestionService, SUGGESTION_CACHE_KEY};

// ============================================================================
// Upvote
// ============================================================================

#[tokio::test]
async fn test_upvote_then_withdraw() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let u1 = fx.add_user("u1").await;
    let u2 = fx.add_user("u2").await;

    let s1 = suggestion_by(&u1, "Dark mode");
    service.create_suggestion(&s1).await.unwrap();

    let toggle = service.upvote_suggestion(&s1.id, &u2.id).await.unwrap();
    assert_eq!(toggle, VoteToggle::Added);

    let stored = fx.stored_suggestion(&s1.id).await.unwrap();
    assert_eq!(stored.user_votes.len(), 1);
    assert!(stored.has_vote(&u2.id));
    assert!(fx.user(&u2.id).await.has_voted_on(&s1.id));

    let toggle = service.upvote_suggestion(&s1.id, &u2.id).await.unwrap();
    assert_eq!(toggle, VoteToggle::Removed);

    let stored = fx.stored_suggestion(&s1.id).await.unwrap();
    assert!(stored.user_votes.is_empty());
    assert!(!fx.user(&u2.id).await.has_voted_on(&s1.id));
}

#[tokio::test]
async fn test_double_toggle_restores_state() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;
    let voter = fx.add_user("voter").await;
    let other = fx.add_user("other").await;

    let suggestion = suggestion_by(&author, "Export to CSV");
    service.create_suggestion(&suggestion).await.unwrap();
    service
        .upvote_suggestion(&suggestion.id, &other.id)
        .await
        .unwrap();

    let votes_before = fx.stored_suggestion(&suggestion.id).await.unwrap().user_votes;
    let voted_before = fx.user(&voter.id).await.voted_on_suggestions;

    service
        .upvote_suggestion(&suggestion.id, &voter.id)
        .await
        .unwrap();
    service
        .upvote_suggestion(&suggestion.id, &voter.id)
        .await
        .unwrap();

    let after = fx.stored_suggestion(&suggestion.id).await.unwrap();
    assert_eq!(after.user_votes, votes_before);
    assert_eq!(fx.user(&voter.id).await.voted_on_suggestions, voted_before);
}

#[tokio::test]
async fn test_votes_from_distinct_users_accumulate() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;
    let suggestion = suggestion_by(&author, "Keyboard shortcuts");
    service.create_suggestion(&suggestion).await.unwrap();

    let mut voters = Vec::new();
    for name in ["a", "b", "c"] {
        let voter = fx.add_user(name).await;
        service
            .upvote_suggestion(&suggestion.id, &voter.id)
            .await
            .unwrap();
        voters.push(voter);
    }

    let stored = fx.stored_suggestion(&suggestion.id).await.unwrap();
    assert_eq!(stored.vote_count(), 3);
    for voter in &voters {
        assert!(stored.has_vote(&voter.id));
        assert!(fx.user(&voter.id).await.has_voted_on(&suggestion.id));
    }
}

#[tokio::test]
async fn test_upvote_unknown_suggestion() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let voter = fx.add_user("voter").await;

    let err = service
        .upvote_suggestion("missing", &voter.id)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_upvote_unknown_user_leaves_no_vote() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;
    let suggestion = suggestion_by(&author, "Offline mode");
    service.create_suggestion(&suggestion).await.unwrap();

    let err = service
        .upvote_suggestion(&suggestion.id, "ghost")
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let stored = fx.stored_suggestion(&suggestion.id).await.unwrap();
    assert!(stored.user_votes.is_empty());
}

#[tokio::test]
async fn test_withdraw_repairs_missing_reference() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;
    let voter = fx.add_user("voter").await;

    // vote present on the suggestion but not mirrored on the user
    let mut suggestion = suggestion_by(&author, "Import from CSV");
    suggestion.toggle_vote(&voter.id);
    fx.put_suggestion(&suggestion).await;

    let toggle = service
        .upvote_suggestion(&suggestion.id, &voter.id)
        .await
        .unwrap();

    assert_eq!(toggle, VoteToggle::Removed);
    assert!(fx
        .stored_suggestion(&suggestion.id)
        .await
        .unwrap()
        .user_votes
        .is_empty());
    assert!(!fx.user(&voter.id).await.has_voted_on(&suggestion.id));
}

// ============================================================================
// Atomicity
// ============================================================================

#[tokio::test]
async fn test_failed_user_write_aborts_upvote() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;
    let voter = fx.add_user("voter").await;
    let suggestion = suggestion_by(&author, "Dark mode");
    service.create_suggestion(&suggestion).await.unwrap();
    let before = fx.stored_suggestion(&suggestion.id).await.unwrap();

    fx.store.fail_next(FailPoint::UserWrite);
    let err = service
        .upvote_suggestion(&suggestion.id, &voter.id)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "DATABASE_ERROR");

    let after = fx.stored_suggestion(&suggestion.id).await.unwrap();
    assert_eq!(after, before);
    assert!(!fx.user(&voter.id).await.has_voted_on(&suggestion.id));
}

#[tokio::test]
async fn test_failed_user_write_aborts_create() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;
    let suggestion = suggestion_by(&author, "Dark mode");

    fx.store.fail_next(FailPoint::UserWrite);
    let err = service.create_suggestion(&suggestion).await.unwrap_err();
    assert_eq!(err.error_code(), "DATABASE_ERROR");

    assert!(fx.stored_suggestion(&suggestion.id).await.is_none());
    assert!(fx.user(&author.id).await.authored_suggestions.is_empty());
    assert!(service.get_suggestions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_records_authorship() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;
    let suggestion = suggestion_by(&author, "Dark mode");

    service.create_suggestion(&suggestion).await.unwrap();

    let stored = service.get_suggestion(&suggestion.id).await.unwrap();
    assert_eq!(stored.author, author.as_author());
    let authored = fx.user(&author.id).await.authored_suggestions;
    assert_eq!(authored, vec![suggestion.to_basic()]);
}

#[tokio::test]
async fn test_create_with_unknown_author_leaves_nothing() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let stranger = suggestion_core::entities::User::new("oid-x", "x", "x@example.com");
    let suggestion = suggestion_by(&stranger, "Orphan");

    let err = service.create_suggestion(&suggestion).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(fx.stored_suggestion(&suggestion.id).await.is_none());
}

#[tokio::test]
async fn test_create_rejects_invalid_suggestion() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;

    let empty = suggestion_by(&author, "");
    assert!(service
        .create_suggestion(&empty)
        .await
        .unwrap_err()
        .is_validation());

    let long = suggestion_by(&author, &"x".repeat(76));
    assert!(service
        .create_suggestion(&long)
        .await
        .unwrap_err()
        .is_validation());

    assert!(fx.user(&author.id).await.authored_suggestions.is_empty());
}

// ============================================================================
// Filters
// ============================================================================

#[tokio::test]
async fn test_waiting_for_approval_scenario() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;

    let s1 = suggestion_by(&author, "S1");
    let mut s2 = suggestion_by(&author, "S2");
    s2.approved_for_release = true;
    let mut s3 = suggestion_by(&author, "S3");
    s3.rejected = true;
    for s in [&s1, &s2, &s3] {
        fx.put_suggestion(s).await;
    }

    let waiting = service.get_suggestions_waiting_for_approval().await.unwrap();
    let ids: Vec<_> = waiting.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![s1.id.as_str()]);

    let approved = service.get_approved_suggestions().await.unwrap();
    let ids: Vec<_> = approved.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![s2.id.as_str()]);
}

#[tokio::test]
async fn test_filters_partition_active_suggestions() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;

    let mut all = Vec::new();
    for approved in [false, true] {
        for rejected in [false, true] {
            for archived in [false, true] {
                let mut s = suggestion_by(&author, "combo");
                s.approved_for_release = approved;
                s.rejected = rejected;
                s.archived = archived;
                fx.put_suggestion(&s).await;
                all.push(s);
            }
        }
    }

    let approved: HashSet<_> = service
        .get_approved_suggestions()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    let waiting: HashSet<_> = service
        .get_suggestions_waiting_for_approval()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();

    assert!(approved.is_disjoint(&waiting));
    for s in all.iter().filter(|s| s.archived || s.rejected) {
        assert!(!approved.contains(&s.id) && !waiting.contains(&s.id));
    }
    assert_eq!(approved.len(), 1);
    assert_eq!(waiting.len(), 1);
}

#[tokio::test]
async fn test_archived_excluded_from_list() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;

    let mut archived = suggestion_by(&author, "Old idea");
    archived.archived = true;
    fx.put_suggestion(&archived).await;

    assert!(service.get_suggestions().await.unwrap().is_empty());
    // point lookups still see it
    assert!(service.get_suggestion(&archived.id).await.unwrap().archived);
}

// ============================================================================
// Point lookup and update
// ============================================================================

#[tokio::test]
async fn test_get_suggestion_not_found() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);

    let err = service.get_suggestion("nope").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_update_with_stale_version_conflicts() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;
    let voter = fx.add_user("voter").await;
    let suggestion = suggestion_by(&author, "Dark mode");
    service.create_suggestion(&suggestion).await.unwrap();

    let mut stale = service.get_suggestion(&suggestion.id).await.unwrap();
    service
        .upvote_suggestion(&suggestion.id, &voter.id)
        .await
        .unwrap();

    stale.approve();
    let err = service.update_suggestion(&stale).await.unwrap_err();
    assert!(err.is_conflict());

    // the vote is not lost
    let stored = service.get_suggestion(&suggestion.id).await.unwrap();
    assert!(stored.has_vote(&voter.id));
    assert!(!stored.is_approved());
}

// ============================================================================
// Cache coherence
// ============================================================================

#[tokio::test]
async fn test_list_is_cached() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;
    fx.put_suggestion(&suggestion_by(&author, "Dark mode")).await;

    service.get_suggestions().await.unwrap();
    service.get_approved_suggestions().await.unwrap();
    service.get_suggestions_waiting_for_approval().await.unwrap();

    assert_eq!(fx.store.suggestion_scans(), 1);
    assert!(fx.cache.get(SUGGESTION_CACHE_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn test_update_invalidates_list() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;
    let suggestion = suggestion_by(&author, "Dark mode");
    service.create_suggestion(&suggestion).await.unwrap();

    assert!(service.get_approved_suggestions().await.unwrap().is_empty());

    let mut loaded = service.get_suggestion(&suggestion.id).await.unwrap();
    loaded.approve();
    loaded.suggestion_status = Some(Status::new("Upcoming", "Planned for release"));
    service.update_suggestion(&loaded).await.unwrap();

    let approved = service.get_approved_suggestions().await.unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(
        approved[0].suggestion_status.as_ref().map(|s| s.status_name.as_str()),
        Some("Upcoming")
    );
}

#[tokio::test]
async fn test_upvote_invalidates_list() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;
    let voter = fx.add_user("voter").await;
    let suggestion = suggestion_by(&author, "Dark mode");
    service.create_suggestion(&suggestion).await.unwrap();

    let listed = service.get_suggestions().await.unwrap();
    assert_eq!(listed[0].vote_count(), 0);

    service
        .upvote_suggestion(&suggestion.id, &voter.id)
        .await
        .unwrap();

    let listed = service.get_suggestions().await.unwrap();
    assert!(listed[0].has_vote(&voter.id));
}

#[tokio::test]
async fn test_create_invalidates_list() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;

    assert!(service.get_suggestions().await.unwrap().is_empty());

    service
        .create_suggestion(&suggestion_by(&author, "Dark mode"))
        .await
        .unwrap();

    assert_eq!(service.get_suggestions().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_upvote_keeps_cache() {
    let fx = Fixture::new();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;
    let suggestion = suggestion_by(&author, "Dark mode");
    service.create_suggestion(&suggestion).await.unwrap();
    service.get_suggestions().await.unwrap();

    assert!(service
        .upvote_suggestion(&suggestion.id, "ghost")
        .await
        .is_err());

    assert!(fx.cache.get(SUGGESTION_CACHE_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn test_broken_cache_does_not_fail_writes() {
    let fx = Fixture::with_broken_cache();
    let service = SuggestionService::new(&fx.ctx);
    let author = fx.add_user("author").await;
    let voter = fx.add_user("voter").await;
    let suggestion = suggestion_by(&author, "Dark mode");

    service.create_suggestion(&suggestion).await.unwrap();
    service
        .upvote_suggestion(&suggestion.id, &voter.id)
        .await
        .unwrap();

    let listed = service.get_suggestions().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].has_vote(&voter.id));
}
