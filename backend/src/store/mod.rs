//! Persistence for identities, profiles, leads and unlocks.
//!
//! Handlers only see the [`Store`] trait. [`PgStore`] is the production
//! backend; [`MemoryStore`] serves local development and the router tests.

pub mod memory;
pub mod postgres;
pub mod seed;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use speakerdrive_shared::{
    IdentityMetadata, IdentityMetadataUpdate, Lead, LeadUnlock, Profile, ProfileUpdate, User,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("No unlock credits remaining")]
    InsufficientCredits,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields needed to register an identity and its profile.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub metadata: IdentityMetadata,
    pub initial_credits: i32,
}

/// Login-time view of an identity.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: User,
    pub password_hash: String,
    pub failed_login_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
}

/// A lead as stored: the public record plus the value an unlock reveals.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredLead {
    pub lead: Lead,
    pub gated_value: String,
}

impl StoredLead {
    /// The gated value must have the shape its unlock type promises.
    pub fn validate(&self) -> Result<(), String> {
        let kind = self.lead.unlock_type.value_kind();
        if !kind.accepts(&self.gated_value) {
            return Err(format!(
                "lead {} ({}) has a gated value that is not a valid {:?}",
                self.lead.id,
                self.lead.unlock_type.label(),
                kind
            ));
        }
        if self.lead.lead_type != self.lead.unlock_type.lead_type() {
            return Err(format!(
                "lead {} is typed {} but unlocks as {}",
                self.lead.id,
                self.lead.lead_type.label(),
                self.lead.unlock_type.label()
            ));
        }
        Ok(())
    }
}

/// Result of an unlock attempt that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub struct UnlockOutcome {
    pub unlock: LeadUnlock,
    pub credits_remaining: i32,
    /// False when the lead was already unlocked and nothing was charged.
    pub newly_unlocked: bool,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Create an identity and its profile together. Fails with `Conflict`
    /// if the email is taken.
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_credentials(&self, email: &str) -> StoreResult<Option<Credentials>>;

    /// Count a failed sign-in; lock the account once `max_attempts` is reached.
    async fn record_login_failure(
        &self,
        id: Uuid,
        max_attempts: i32,
        lock_for: chrono::Duration,
    ) -> StoreResult<()>;

    async fn record_login_success(&self, id: Uuid) -> StoreResult<()>;

    /// Merge into the identity's metadata.
    async fn update_identity_metadata(
        &self,
        id: Uuid,
        update: &IdentityMetadataUpdate,
    ) -> StoreResult<User>;

    /// Clear the avatar from both identity metadata and the profile.
    async fn remove_avatar(&self, id: Uuid) -> StoreResult<()>;

    async fn get_profile(&self, auth_id: Uuid) -> StoreResult<Option<Profile>>;

    async fn update_profile(&self, auth_id: Uuid, update: &ProfileUpdate) -> StoreResult<Profile>;

    /// All leads, newest first, without any viewer overlay.
    async fn list_leads(&self) -> StoreResult<Vec<StoredLead>>;

    async fn get_lead(&self, id: &str) -> StoreResult<Option<StoredLead>>;

    /// Insert a lead unless one with the same id exists. Returns whether it was inserted.
    async fn insert_lead_if_absent(&self, lead: &StoredLead) -> StoreResult<bool>;

    async fn unlocks_for_user(&self, user_id: Uuid) -> StoreResult<Vec<LeadUnlock>>;

    async fn find_unlock(&self, user_id: Uuid, lead_id: &str) -> StoreResult<Option<LeadUnlock>>;

    /// Unlock a lead for a user. Spending the credit and recording the unlock
    /// happen atomically; an existing unlock is returned without charging.
    async fn unlock_lead(&self, user_id: Uuid, lead: &StoredLead) -> StoreResult<UnlockOutcome>;

    async fn health_check(&self) -> bool;
}
