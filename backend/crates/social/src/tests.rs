//! Social service tests over the in-memory repository.

use std::sync::Arc;

use kernel::id::{AccountId, PostId};

use crate::application::comment_service::CommentService;
use crate::application::follow_service::FollowService;
use crate::application::post_service::{PostPatch, PostService};
use crate::application::profile_service::{ProfileService, ProfileUpdateOutcome};
use crate::domain::entity::ProfilePatch;
use crate::error::SocialError;
use crate::infra::memory::MemSocialRepository;

fn setup() -> (Arc<MemSocialRepository>, AccountId, AccountId) {
    let repo = Arc::new(MemSocialRepository::new());
    let alice = AccountId::new();
    let bob = AccountId::new();
    repo.add_account(alice, "alice@example.com");
    repo.add_account(bob, "bob@example.com");
    (repo, alice, bob)
}

#[tokio::test]
async fn test_profile_create_and_duplicate() {
    let (repo, _, _) = setup();
    let service = ProfileService::new(repo);

    let profile = service
        .create(
            "alice@example.com",
            ProfilePatch {
                bio: Some("hello".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.bio.as_deref(), Some("hello"));
    assert_eq!(
        service.owner_email(&profile).await.unwrap().as_deref(),
        Some("alice@example.com"),
    );

    let duplicate = service.create("alice@example.com", ProfilePatch::default()).await;
    assert!(matches!(duplicate, Err(SocialError::Conflict(_))));
}

#[tokio::test]
async fn test_profile_create_unknown_email() {
    let (repo, _, _) = setup();
    let result = ProfileService::new(repo)
        .create("nobody@example.com", ProfilePatch::default())
        .await;
    assert!(matches!(result, Err(SocialError::NotFound(_))));
}

#[tokio::test]
async fn test_profile_update_detects_no_changes() {
    let (repo, _, _) = setup();
    let service = ProfileService::new(repo);
    let profile = service
        .create(
            "alice@example.com",
            ProfilePatch {
                bio: Some("hello".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let same = service
        .update(
            profile.profile_id,
            ProfilePatch {
                bio: Some("hello".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(matches!(same, ProfileUpdateOutcome::NoChanges));

    let changed = service
        .update(
            profile.profile_id,
            ProfilePatch {
                location: Some("Berlin".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    match changed {
        ProfileUpdateOutcome::Updated(updated) => {
            assert_eq!(updated.location.as_deref(), Some("Berlin"));
            assert_eq!(updated.bio.as_deref(), Some("hello"));
        }
        ProfileUpdateOutcome::NoChanges => panic!("expected an update"),
    }
}

#[tokio::test]
async fn test_post_create_rejects_duplicates() {
    let (repo, alice, _) = setup();
    let service = PostService::new(repo);

    service
        .create(alice, "first post".into(), None, vec!["rust".into()])
        .await
        .unwrap();

    let duplicate = service.create(alice, "first post".into(), None, vec![]).await;
    assert!(matches!(duplicate, Err(SocialError::Conflict(_))));

    // Same content with a different image is a different post
    service
        .create(
            alice,
            "first post".into(),
            Some("https://cdn.example.com/a.png".into()),
            vec![],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_post_create_requires_content() {
    let (repo, alice, _) = setup();
    let result = PostService::new(repo)
        .create(alice, "   ".into(), None, vec![])
        .await;
    assert!(matches!(result, Err(SocialError::Validation(_))));
}

#[tokio::test]
async fn test_post_update_and_delete() {
    let (repo, alice, _) = setup();
    let service = PostService::new(repo);

    let post = service
        .create(alice, "original".into(), None, vec![])
        .await
        .unwrap();

    let updated = service
        .update(
            post.post_id,
            PostPatch {
                content: Some("edited".into()),
                categories: Some(vec!["rust".into(), "rust".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.content, "edited");
    assert_eq!(updated.categories, vec!["rust"]);

    service.delete(post.post_id).await.unwrap();
    let gone = service.get(post.post_id).await;
    assert!(matches!(gone, Err(SocialError::NotFound(_))));

    let missing = service.delete(PostId::new()).await;
    assert!(matches!(missing, Err(SocialError::NotFound(_))));
}

#[tokio::test]
async fn test_comment_requires_existing_post() {
    let (repo, alice, _) = setup();
    let result = CommentService::new(repo)
        .create(alice, PostId::new(), "nice post".into())
        .await;
    assert!(matches!(result, Err(SocialError::NotFound(_))));
}

#[tokio::test]
async fn test_comment_roundtrip() {
    let (repo, alice, bob) = setup();
    let post = PostService::new(repo.clone())
        .create(alice, "hello world".into(), None, vec![])
        .await
        .unwrap();

    let comments = CommentService::new(repo);
    let comment = comments
        .create(bob, post.post_id, "  nice post  ".into())
        .await
        .unwrap();
    assert_eq!(comment.content, "nice post");

    assert_eq!(comments.list().await.unwrap().len(), 1);

    comments.delete(comment.comment_id).await.unwrap();
    let gone = comments.get(comment.comment_id).await;
    assert!(matches!(gone, Err(SocialError::NotFound(_))));
}

#[tokio::test]
async fn test_follow_rules() {
    let (repo, alice, bob) = setup();
    let service = FollowService::new(repo);

    // Self-follow rejected
    let own = service.follow(alice, alice).await;
    assert!(matches!(own, Err(SocialError::Validation(_))));

    // Unknown target rejected
    let unknown = service.follow(alice, AccountId::new()).await;
    assert!(matches!(unknown, Err(SocialError::NotFound(_))));

    let email = service.follow(alice, bob).await.unwrap();
    assert_eq!(email, "bob@example.com");

    let again = service.follow(alice, bob).await;
    assert!(matches!(again, Err(SocialError::Conflict(_))));
}

#[tokio::test]
async fn test_unfollow_rules() {
    let (repo, alice, bob) = setup();
    let service = FollowService::new(repo);

    // Not following yet
    let premature = service.unfollow(alice, bob).await;
    assert!(matches!(premature, Err(SocialError::Validation(_))));

    service.follow(alice, bob).await.unwrap();
    service.unfollow(alice, bob).await.unwrap();

    let twice = service.unfollow(alice, bob).await;
    assert!(matches!(twice, Err(SocialError::Validation(_))));
}

#[tokio::test]
async fn test_follower_listings_are_directional() {
    let (repo, alice, bob) = setup();
    let carol = AccountId::new();
    repo.add_account(carol, "carol@example.com");

    let service = FollowService::new(repo);
    service.follow(alice, bob).await.unwrap();
    service.follow(carol, bob).await.unwrap();
    service.follow(bob, alice).await.unwrap();

    let bob_followers = service.followers(bob).await.unwrap();
    assert_eq!(bob_followers.len(), 2);
    assert!(bob_followers.iter().all(|e| e.following == bob));

    let bob_following = service.following(bob).await.unwrap();
    assert_eq!(bob_following.len(), 1);
    assert_eq!(bob_following[0].following, alice);

    let alice_followers = service.followers(alice).await.unwrap();
    assert_eq!(alice_followers.len(), 1);
    assert_eq!(alice_followers[0].follower, bob);
}
