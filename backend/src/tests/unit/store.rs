use chrono::{Duration, Utc};

use crate::auth::{hash_password, verify_password, LOCKOUT_MINUTES, MAX_FAILED_LOGINS};
use crate::store::{MemoryStore, NewUser, Store, StoreError};
use crate::tests::fixtures::{LeadFixture, SignupFixture};
use speakerdrive_shared::{IdentityMetadata, IdentityMetadataUpdate, ProfileUpdate, UnlockType};

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password_hash: hash_password("correct horse battery").unwrap(),
        metadata: IdentityMetadata {
            display_name: Some("Jordan".to_string()),
            ..Default::default()
        },
        initial_credits: 10,
    }
}

#[tokio::test]
async fn create_user_creates_profile_and_rejects_duplicates() {
    let store = MemoryStore::new();
    let email = SignupFixture::default().email;
    let user = store.create_user(new_user(&email)).await.unwrap();

    let profile = store.get_profile(user.id).await.unwrap().unwrap();
    assert_eq!(profile.auth_id, user.id);
    assert_eq!(profile.unlock_credits, 10);
    assert_eq!(profile.user_role, "Owner");

    let err = store
        .create_user(new_user(&email.to_uppercase()))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn credentials_lookup_is_case_insensitive() {
    let store = MemoryStore::new();
    store.create_user(new_user("Jordan@Example.com")).await.unwrap();
    let creds = store
        .find_credentials("jordan@example.COM")
        .await
        .unwrap()
        .unwrap();
    assert!(verify_password("correct horse battery", &creds.password_hash).unwrap());
}

#[tokio::test]
async fn repeated_failures_lock_the_account() {
    let store = MemoryStore::new();
    let user = store.create_user(new_user("lock@example.com")).await.unwrap();

    for _ in 0..MAX_FAILED_LOGINS {
        store
            .record_login_failure(user.id, MAX_FAILED_LOGINS, Duration::minutes(LOCKOUT_MINUTES))
            .await
            .unwrap();
    }
    let creds = store.find_credentials("lock@example.com").await.unwrap().unwrap();
    assert_eq!(creds.failed_login_attempts, MAX_FAILED_LOGINS);
    assert!(creds.locked_until.unwrap() > Utc::now());

    store.record_login_success(user.id).await.unwrap();
    let creds = store.find_credentials("lock@example.com").await.unwrap().unwrap();
    assert_eq!(creds.failed_login_attempts, 0);
    assert!(creds.locked_until.is_none());
}

#[tokio::test]
async fn lapsed_lock_restarts_the_attempt_count() {
    let store = MemoryStore::new();
    let user = store.create_user(new_user("lapsed@example.com")).await.unwrap();

    // A lock that has already run out
    for _ in 0..MAX_FAILED_LOGINS {
        store
            .record_login_failure(user.id, MAX_FAILED_LOGINS, Duration::seconds(-1))
            .await
            .unwrap();
    }
    let creds = store.find_credentials("lapsed@example.com").await.unwrap().unwrap();
    assert!(creds.locked_until.unwrap() <= Utc::now());

    store
        .record_login_failure(user.id, MAX_FAILED_LOGINS, Duration::minutes(LOCKOUT_MINUTES))
        .await
        .unwrap();
    let creds = store.find_credentials("lapsed@example.com").await.unwrap().unwrap();
    assert_eq!(creds.failed_login_attempts, 1);
    assert!(creds.locked_until.is_none());
}

#[tokio::test]
async fn metadata_update_merges() {
    let store = MemoryStore::new();
    let user = store.create_user(new_user("merge@example.com")).await.unwrap();

    let user = store
        .update_identity_metadata(
            user.id,
            &IdentityMetadataUpdate {
                avatar_url: Some("data:image/png;base64,AAAA".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(user.metadata.display_name.as_deref(), Some("Jordan"));
    assert!(user.metadata.avatar_url.is_some());
}

#[tokio::test]
async fn remove_avatar_clears_both_records() {
    let store = MemoryStore::new();
    let user = store.create_user(new_user("avatar@example.com")).await.unwrap();
    let avatar = Some("data:image/gif;base64,R0lG".to_string());
    store
        .update_identity_metadata(
            user.id,
            &IdentityMetadataUpdate {
                avatar_url: avatar.clone(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    store
        .update_profile(
            user.id,
            &ProfileUpdate {
                avatar_url: avatar,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    store.remove_avatar(user.id).await.unwrap();

    let user = store.get_user(user.id).await.unwrap().unwrap();
    assert!(user.metadata.avatar_url.is_none());
    assert!(user.metadata.avatar_updated_at.is_some());
    assert!(store.get_profile(user.id).await.unwrap().unwrap().avatar_url.is_none());
}

#[tokio::test]
async fn leads_list_newest_first() {
    let store = MemoryStore::new();
    let mut old = LeadFixture::new(UnlockType::ContactEmail);
    old.days_ago = 300;
    let mut recent = LeadFixture::new(UnlockType::EventUrl);
    recent.days_ago = 2;

    let old = old.build();
    let recent = recent.build();
    assert!(store.insert_lead_if_absent(&old).await.unwrap());
    assert!(store.insert_lead_if_absent(&recent).await.unwrap());
    assert!(!store.insert_lead_if_absent(&recent).await.unwrap());

    let ids: Vec<String> = store
        .list_leads()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.lead.id)
        .collect();
    assert_eq!(ids, vec![recent.lead.id, old.lead.id]);
}
