use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::services::leads::LeadService;
use crate::store::{MemoryStore, NewUser, Store, StoreError};
use crate::tests::fixtures::{LeadFixture, SignupFixture};
use speakerdrive_shared::{IdentityMetadata, UnlockType, UnlockValueKind};

async fn service_with_user(credits: i32) -> (LeadService, Arc<MemoryStore>, Uuid) {
    let store = Arc::new(MemoryStore::new());
    crate::store::seed::seed_demo_leads(store.as_ref()).await.unwrap();
    let user = store
        .create_user(NewUser {
            email: SignupFixture::default().email,
            password_hash: "not-a-real-hash".to_string(),
            metadata: IdentityMetadata::default(),
            initial_credits: credits,
        })
        .await
        .unwrap();
    let dyn_store: Arc<dyn Store> = store.clone();
    (LeadService::new(dyn_store), store, user.id)
}

#[tokio::test]
async fn locked_leads_hide_their_value() {
    let (service, _store, user_id) = service_with_user(5).await;
    let leads = service.visible_leads(user_id).await.unwrap();
    assert_eq!(leads.len(), 6);
    assert!(leads.iter().all(|l| !l.is_unlocked && l.unlock_value.is_none()));
}

#[tokio::test]
async fn unlocking_lead_four_reveals_a_url() {
    let (service, _store, user_id) = service_with_user(5).await;
    let status = service.unlock(user_id, "4").await.unwrap();
    assert!(status.unlocked);
    let value = status.unlock_value.unwrap();
    assert!(UnlockValueKind::Url.accepts(&value));
    assert!(!value.contains('@'));
    assert_eq!(status.credits_remaining, Some(4));

    let lead = service.lead_for_viewer(user_id, "4").await.unwrap();
    assert!(lead.is_unlocked);
    assert_eq!(lead.unlock_value.as_deref(), Some(value.as_str()));
}

#[tokio::test]
async fn unlocking_twice_spends_one_credit() {
    let (service, store, user_id) = service_with_user(2).await;
    service.unlock(user_id, "1").await.unwrap();
    let second = service.unlock(user_id, "1").await.unwrap();
    assert_eq!(second.credits_remaining, Some(1));

    let profile = store.get_profile(user_id).await.unwrap().unwrap();
    assert_eq!(profile.unlock_credits, 1);
    assert_eq!(store.unlocks_for_user(user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_unlocks_of_one_lead_charge_once() {
    let (service, store, user_id) = service_with_user(3).await;
    let service = Arc::new(service);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.unlock(user_id, "3").await })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let profile = store.get_profile(user_id).await.unwrap().unwrap();
    assert_eq!(profile.unlock_credits, 2);
}

#[tokio::test]
async fn no_credits_means_no_unlock() {
    let (service, store, user_id) = service_with_user(0).await;
    let err = service.unlock(user_id, "1").await.unwrap_err();
    assert!(matches!(err, StoreError::InsufficientCredits));
    assert!(store.unlocks_for_user(user_id).await.unwrap().is_empty());
    assert!(!service.unlock_status(user_id, "1").await.unwrap().unlocked);
}

#[tokio::test]
async fn unknown_lead_is_not_found() {
    let (service, _store, user_id) = service_with_user(1).await;
    assert!(matches!(
        service.unlock(user_id, "missing").await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        service.unlock_status(user_id, "missing").await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn status_check_is_idempotent() {
    let (service, _store, user_id) = service_with_user(1).await;
    service.unlock(user_id, "6").await.unwrap();
    let first = service.unlock_status(user_id, "6").await.unwrap();
    let second = service.unlock_status(user_id, "6").await.unwrap();
    assert_eq!(first, second);
    assert!(first.unlocked);
}

#[tokio::test]
async fn unlocks_are_per_user() {
    let (service, store, alice) = service_with_user(1).await;
    let bob = store
        .create_user(NewUser {
            email: SignupFixture::default().email,
            password_hash: "not-a-real-hash".to_string(),
            metadata: IdentityMetadata::default(),
            initial_credits: 1,
        })
        .await
        .unwrap()
        .id;

    service.unlock(alice, "2").await.unwrap();
    assert!(service.lead_for_viewer(alice, "2").await.unwrap().is_unlocked);
    assert!(!service.lead_for_viewer(bob, "2").await.unwrap().is_unlocked);
    assert!(service.unlocked_leads(bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn dashboard_counts_leads_and_credits() {
    let (service, store, user_id) = service_with_user(3).await;
    store
        .insert_lead_if_absent(&LeadFixture::new(UnlockType::EventEmail).build())
        .await
        .unwrap();
    service.unlock(user_id, "4").await.unwrap();

    let stats = service.dashboard_stats(user_id, Utc::now()).await.unwrap();
    assert_eq!(stats.total_leads, 7);
    assert_eq!(stats.contact_leads, 3);
    assert_eq!(stats.event_leads, 4);
    assert_eq!(stats.unlocked_leads, 1);
    assert_eq!(stats.credits_remaining, 2);
    assert!(stats.added_last_week.iter().any(|l| l.id == "4"));
}
