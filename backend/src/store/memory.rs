use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use speakerdrive_shared::{
    IdentityMetadataUpdate, LeadUnlock, Profile, ProfileUpdate, User,
};

use super::{Credentials, NewUser, Store, StoreError, StoreResult, StoredLead, UnlockOutcome};

#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    password_hash: String,
    failed_login_attempts: i32,
    locked_until: Option<chrono::DateTime<Utc>>,
}

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, UserRecord>,
    emails: HashMap<String, Uuid>,
    profiles: HashMap<Uuid, Profile>,
    leads: HashMap<String, StoredLead>,
    unlocks: HashMap<(Uuid, String), LeadUnlock>,
}

/// In-process store. Every write takes the single state lock, so unlocks are
/// atomic with their credit charge.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        let email = new_user.email.to_lowercase();
        if state.emails.contains_key(&email) {
            return Err(StoreError::Conflict("Email already registered".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
            metadata: new_user.metadata,
            created_at: now,
        };
        let profile = Profile {
            id: Uuid::new_v4(),
            auth_id: user.id,
            email: email.clone(),
            display_name: None,
            services: Vec::new(),
            industries: Vec::new(),
            avatar_url: None,
            user_type: user.metadata.user_type,
            user_role: user.metadata.user_role.clone(),
            email_provider: None,
            email_setup_completed: false,
            unlock_credits: new_user.initial_credits,
            created_at: now,
            updated_at: now,
        };

        state.emails.insert(email, user.id);
        state.profiles.insert(user.id, profile);
        state.users.insert(
            user.id,
            UserRecord {
                user: user.clone(),
                password_hash: new_user.password_hash,
                failed_login_attempts: 0,
                locked_until: None,
            },
        );
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).map(|r| r.user.clone()))
    }

    async fn find_credentials(&self, email: &str) -> StoreResult<Option<Credentials>> {
        let state = self.state.read().await;
        let record = state
            .emails
            .get(&email.to_lowercase())
            .and_then(|id| state.users.get(id));
        Ok(record.map(|r| Credentials {
            user: r.user.clone(),
            password_hash: r.password_hash.clone(),
            failed_login_attempts: r.failed_login_attempts,
            locked_until: r.locked_until,
        }))
    }

    async fn record_login_failure(
        &self,
        id: Uuid,
        max_attempts: i32,
        lock_for: chrono::Duration,
    ) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let record = state
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("User".to_string()))?;
        let now = Utc::now();
        // A lapsed lock starts a fresh run of attempts
        if record.locked_until.is_some_and(|until| until <= now) {
            record.failed_login_attempts = 0;
            record.locked_until = None;
        }
        record.failed_login_attempts += 1;
        if record.failed_login_attempts >= max_attempts {
            record.locked_until = Some(now + lock_for);
        }
        Ok(())
    }

    async fn record_login_success(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if let Some(record) = state.users.get_mut(&id) {
            record.failed_login_attempts = 0;
            record.locked_until = None;
        }
        Ok(())
    }

    async fn update_identity_metadata(
        &self,
        id: Uuid,
        update: &IdentityMetadataUpdate,
    ) -> StoreResult<User> {
        let mut state = self.state.write().await;
        let record = state
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("User".to_string()))?;
        update.apply_to(&mut record.user.metadata);
        Ok(record.user.clone())
    }

    async fn remove_avatar(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let record = state
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("User".to_string()))?;
        record.user.metadata.avatar_url = None;
        record.user.metadata.avatar_updated_at = Some(Utc::now());
        if let Some(profile) = state.profiles.get_mut(&id) {
            profile.avatar_url = None;
            profile.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn get_profile(&self, auth_id: Uuid) -> StoreResult<Option<Profile>> {
        let state = self.state.read().await;
        Ok(state.profiles.get(&auth_id).cloned())
    }

    async fn update_profile(&self, auth_id: Uuid, update: &ProfileUpdate) -> StoreResult<Profile> {
        let mut state = self.state.write().await;
        let profile = state
            .profiles
            .get_mut(&auth_id)
            .ok_or_else(|| StoreError::NotFound("Profile".to_string()))?;
        update.apply_to(profile);
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn list_leads(&self) -> StoreResult<Vec<StoredLead>> {
        let state = self.state.read().await;
        let mut leads: Vec<StoredLead> = state.leads.values().cloned().collect();
        leads.sort_by(|a, b| {
            b.lead
                .added_at
                .cmp(&a.lead.added_at)
                .then_with(|| a.lead.id.cmp(&b.lead.id))
        });
        Ok(leads)
    }

    async fn get_lead(&self, id: &str) -> StoreResult<Option<StoredLead>> {
        let state = self.state.read().await;
        Ok(state.leads.get(id).cloned())
    }

    async fn insert_lead_if_absent(&self, lead: &StoredLead) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.leads.contains_key(&lead.lead.id) {
            return Ok(false);
        }
        state.leads.insert(lead.lead.id.clone(), lead.clone());
        Ok(true)
    }

    async fn unlocks_for_user(&self, user_id: Uuid) -> StoreResult<Vec<LeadUnlock>> {
        let state = self.state.read().await;
        let mut unlocks: Vec<LeadUnlock> = state
            .unlocks
            .values()
            .filter(|u| u.user_id == user_id)
            .cloned()
            .collect();
        unlocks.sort_by(|a, b| b.unlocked_at.cmp(&a.unlocked_at));
        Ok(unlocks)
    }

    async fn find_unlock(&self, user_id: Uuid, lead_id: &str) -> StoreResult<Option<LeadUnlock>> {
        let state = self.state.read().await;
        Ok(state.unlocks.get(&(user_id, lead_id.to_string())).cloned())
    }

    async fn unlock_lead(&self, user_id: Uuid, lead: &StoredLead) -> StoreResult<UnlockOutcome> {
        let mut state = self.state.write().await;
        let key = (user_id, lead.lead.id.clone());

        let credits = state
            .profiles
            .get(&user_id)
            .map(|p| p.unlock_credits)
            .ok_or_else(|| StoreError::NotFound("Profile".to_string()))?;

        if let Some(existing) = state.unlocks.get(&key) {
            return Ok(UnlockOutcome {
                unlock: existing.clone(),
                credits_remaining: credits,
                newly_unlocked: false,
            });
        }

        if credits <= 0 {
            return Err(StoreError::InsufficientCredits);
        }

        let unlock = LeadUnlock {
            user_id,
            lead_id: lead.lead.id.clone(),
            unlock_value: lead.gated_value.clone(),
            unlocked_at: Utc::now(),
        };
        state.unlocks.insert(key, unlock.clone());

        let profile = state
            .profiles
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::NotFound("Profile".to_string()))?;
        profile.unlock_credits -= 1;
        profile.updated_at = Utc::now();

        Ok(UnlockOutcome {
            unlock,
            credits_remaining: profile.unlock_credits,
            newly_unlocked: true,
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}
