use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use speakerdrive_shared::{
    AddedWindow, DashboardStats, Lead, LeadType, LeadUnlock, UnlockStatus,
};

use crate::store::{Store, StoreError, StoreResult, StoredLead};

/// Leads as a given user sees them: public fields, plus the gated value for
/// leads that user has unlocked.
pub struct LeadService {
    store: Arc<dyn Store>,
}

impl LeadService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn require_lead(&self, lead_id: &str) -> StoreResult<StoredLead> {
        self.store
            .get_lead(lead_id)
            .await?
            .ok_or_else(|| StoreError::NotFound("Lead".to_string()))
    }

    /// Every lead, newest first, with the viewer's unlocks overlaid.
    pub async fn visible_leads(&self, user_id: Uuid) -> StoreResult<Vec<Lead>> {
        let leads = self.store.list_leads().await?;
        let unlocks: HashMap<String, LeadUnlock> = self
            .store
            .unlocks_for_user(user_id)
            .await?
            .into_iter()
            .map(|u| (u.lead_id.clone(), u))
            .collect();

        Ok(leads
            .iter()
            .map(|stored| stored.lead.for_viewer(unlocks.get(&stored.lead.id)))
            .collect())
    }

    /// The viewer's unlocked leads.
    pub async fn unlocked_leads(&self, user_id: Uuid) -> StoreResult<Vec<Lead>> {
        Ok(self
            .visible_leads(user_id)
            .await?
            .into_iter()
            .filter(|lead| lead.is_unlocked)
            .collect())
    }

    pub async fn lead_for_viewer(&self, user_id: Uuid, lead_id: &str) -> StoreResult<Lead> {
        let stored = self.require_lead(lead_id).await?;
        let unlock = self.store.find_unlock(user_id, lead_id).await?;
        Ok(stored.lead.for_viewer(unlock.as_ref()))
    }

    pub async fn unlock_status(&self, user_id: Uuid, lead_id: &str) -> StoreResult<UnlockStatus> {
        self.require_lead(lead_id).await?;
        Ok(match self.store.find_unlock(user_id, lead_id).await? {
            Some(unlock) => UnlockStatus::from_unlock(&unlock),
            None => UnlockStatus::locked(lead_id),
        })
    }

    /// Spend one credit to reveal the lead's gated value. Unlocking a lead the
    /// user already holds returns the existing unlock free of charge.
    pub async fn unlock(&self, user_id: Uuid, lead_id: &str) -> StoreResult<UnlockStatus> {
        let stored = self.require_lead(lead_id).await?;
        let outcome = self.store.unlock_lead(user_id, &stored).await?;

        if outcome.newly_unlocked {
            info!(
                user_id = %user_id,
                lead_id = %lead_id,
                unlock_type = stored.lead.unlock_type.as_str(),
                credits_remaining = outcome.credits_remaining,
                "Lead unlocked"
            );
        }

        let mut status = UnlockStatus::from_unlock(&outcome.unlock);
        status.credits_remaining = Some(outcome.credits_remaining);
        Ok(status)
    }

    pub async fn dashboard_stats(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<DashboardStats> {
        let leads = self.visible_leads(user_id).await?;
        let credits_remaining = self
            .store
            .get_profile(user_id)
            .await?
            .map(|p| p.unlock_credits)
            .unwrap_or(0);

        let count = |t: LeadType| leads.iter().filter(|l| l.lead_type == t).count();

        Ok(DashboardStats {
            total_leads: leads.len(),
            contact_leads: count(LeadType::Contact),
            event_leads: count(LeadType::Event),
            unlocked_leads: leads.iter().filter(|l| l.is_unlocked).count(),
            credits_remaining,
            added_last_week: leads
                .iter()
                .filter(|l| AddedWindow::LastWeek.contains(l.added_at, now))
                .cloned()
                .collect(),
        })
    }
}
