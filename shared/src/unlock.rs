//! Client-side lead unlock state.
//!
//! [`UnlockTracker`] holds the per-lead `unlocked / unlocking / error` flags.
//! [`UnlockFlow`] drives a tracker against an [`UnlockApi`]. Both are free of
//! any UI framework so the same transitions run in the browser and in tests.

use async_trait::async_trait;
use std::cell::{Ref, RefCell};
use std::collections::HashMap;

use crate::{RemoteError, UnlockStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadUnlockState {
    pub unlocked: bool,
    pub unlocking: bool,
    pub error: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnlockError {
    #[error("An unlock for lead {0} is already in progress")]
    InFlight(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnlockTracker {
    leads: HashMap<String, LeadUnlockState>,
}

impl UnlockTracker {
    pub fn state(&self, lead_id: &str) -> LeadUnlockState {
        self.leads.get(lead_id).cloned().unwrap_or_default()
    }

    pub fn is_lead_unlocked(&self, lead_id: &str) -> bool {
        self.leads.get(lead_id).map(|s| s.unlocked).unwrap_or(false)
    }

    pub fn is_unlocking(&self, lead_id: &str) -> bool {
        self.leads.get(lead_id).map(|s| s.unlocking).unwrap_or(false)
    }

    pub fn error(&self, lead_id: &str) -> Option<&str> {
        self.leads.get(lead_id).and_then(|s| s.error.as_deref())
    }

    pub fn unlock_value(&self, lead_id: &str) -> Option<&str> {
        self.leads.get(lead_id).and_then(|s| s.value.as_deref())
    }

    /// Mark an unlock as started. Fails if one is already in flight for this lead.
    pub fn begin(&mut self, lead_id: &str) -> Result<(), UnlockError> {
        let state = self.leads.entry(lead_id.to_string()).or_default();
        if state.unlocking {
            return Err(UnlockError::InFlight(lead_id.to_string()));
        }
        state.unlocking = true;
        state.error = None;
        Ok(())
    }

    /// Settle an unlock started with [`begin`](Self::begin).
    pub fn complete(&mut self, lead_id: &str, result: &Result<UnlockStatus, RemoteError>) {
        let state = self.leads.entry(lead_id.to_string()).or_default();
        state.unlocking = false;
        match result {
            Ok(status) if status.unlocked => {
                state.unlocked = true;
                state.value = status.unlock_value.clone();
                state.error = None;
            }
            Ok(_) => state.error = Some("Lead could not be unlocked".to_string()),
            Err(err) => state.error = Some(err.message.clone()),
        }
    }

    /// Fold in the answer to a status check. Unlocks are permanent, so a
    /// locked answer never clears a known unlock.
    pub fn record_status(&mut self, status: &UnlockStatus) {
        if !status.unlocked {
            self.leads.entry(status.lead_id.clone()).or_default();
            return;
        }
        let state = self.leads.entry(status.lead_id.clone()).or_default();
        state.unlocked = true;
        if status.unlock_value.is_some() {
            state.value = status.unlock_value.clone();
        }
    }

    pub fn record_error(&mut self, lead_id: &str, message: impl Into<String>) {
        self.leads.entry(lead_id.to_string()).or_default().error = Some(message.into());
    }
}

/// Remote side of the unlock flow.
#[async_trait(?Send)]
pub trait UnlockApi {
    async fn unlock_status(&self, lead_id: &str) -> Result<UnlockStatus, RemoteError>;

    async fn unlock(&self, lead_id: &str) -> Result<UnlockStatus, RemoteError>;
}

/// Drives an [`UnlockTracker`] against an [`UnlockApi`].
///
/// Methods take `&self` so a single flow can be shared behind an `Rc` by UI
/// callbacks. The tracker is never borrowed across an await.
pub struct UnlockFlow<A> {
    api: A,
    tracker: RefCell<UnlockTracker>,
}

impl<A: UnlockApi> UnlockFlow<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tracker: RefCell::new(UnlockTracker::default()),
        }
    }

    pub fn tracker(&self) -> Ref<'_, UnlockTracker> {
        self.tracker.borrow()
    }

    pub fn snapshot(&self) -> UnlockTracker {
        self.tracker.borrow().clone()
    }

    /// Ask whether the lead is already unlocked. Idempotent.
    pub async fn check_status(&self, lead_id: &str) -> Result<UnlockStatus, RemoteError> {
        match self.api.unlock_status(lead_id).await {
            Ok(status) => {
                self.tracker.borrow_mut().record_status(&status);
                Ok(status)
            }
            Err(err) => {
                self.tracker.borrow_mut().record_error(lead_id, err.message.clone());
                Err(err)
            }
        }
    }

    /// Synchronous half of [`unlock`](Self::unlock), for callers that want to
    /// render the `unlocking` state before the request goes out.
    pub fn begin(&self, lead_id: &str) -> Result<(), UnlockError> {
        self.tracker.borrow_mut().begin(lead_id)
    }

    /// Issue the remote unlock for a lead already marked with [`begin`](Self::begin).
    pub async fn send_unlock(&self, lead_id: &str) -> Result<UnlockStatus, UnlockError> {
        let result = self.api.unlock(lead_id).await;
        self.tracker.borrow_mut().complete(lead_id, &result);
        let status = result?;
        if !status.unlocked {
            return Err(RemoteError::new("Lead could not be unlocked").into());
        }
        Ok(status)
    }

    pub async fn unlock(&self, lead_id: &str) -> Result<UnlockStatus, UnlockError> {
        self.begin(lead_id)?;
        self.send_unlock(lead_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{UnlockType, UnlockValueKind};
    use chrono::Utc;
    use std::cell::Cell;

    struct FakeApi {
        values: HashMap<String, String>,
        unlocked: RefCell<HashMap<String, String>>,
        fail_unlock: bool,
        unlock_calls: Cell<usize>,
    }

    impl FakeApi {
        fn new() -> Self {
            let values = [
                ("1", "david.chen@techcorp.com"),
                ("4", "https://www.crowe.com/events/insights-multiplier"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
            Self {
                values,
                unlocked: RefCell::new(HashMap::new()),
                fail_unlock: false,
                unlock_calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail_unlock: true,
                ..Self::new()
            }
        }
    }

    fn status(lead_id: &str, value: Option<&String>) -> UnlockStatus {
        match value {
            Some(value) => UnlockStatus {
                lead_id: lead_id.to_string(),
                unlocked: true,
                unlock_value: Some(value.clone()),
                unlocked_at: Some(Utc::now()),
                credits_remaining: None,
            },
            None => UnlockStatus::locked(lead_id),
        }
    }

    #[async_trait(?Send)]
    impl UnlockApi for FakeApi {
        async fn unlock_status(&self, lead_id: &str) -> Result<UnlockStatus, RemoteError> {
            Ok(status(lead_id, self.unlocked.borrow().get(lead_id)))
        }

        async fn unlock(&self, lead_id: &str) -> Result<UnlockStatus, RemoteError> {
            self.unlock_calls.set(self.unlock_calls.get() + 1);
            if self.fail_unlock {
                return Err(RemoteError::new("Not enough credits").with_code("INSUFFICIENT_CREDITS"));
            }
            let value = self
                .values
                .get(lead_id)
                .cloned()
                .ok_or_else(|| RemoteError::new("Lead not found"))?;
            self.unlocked
                .borrow_mut()
                .insert(lead_id.to_string(), value.clone());
            Ok(status(lead_id, Some(&value)))
        }
    }

    #[tokio::test]
    async fn successful_unlock_stores_the_returned_value() {
        let flow = UnlockFlow::new(FakeApi::new());
        let status = flow.unlock("1").await.unwrap();

        let tracker = flow.tracker();
        assert!(tracker.is_lead_unlocked("1"));
        assert!(!tracker.is_unlocking("1"));
        assert_eq!(tracker.error("1"), None);
        assert_eq!(tracker.unlock_value("1"), status.unlock_value.as_deref());
    }

    #[tokio::test]
    async fn failed_unlock_leaves_lead_locked_with_error() {
        let flow = UnlockFlow::new(FakeApi::failing());
        let err = flow.unlock("1").await.unwrap_err();

        assert!(matches!(err, UnlockError::Remote(_)));
        let tracker = flow.tracker();
        assert!(!tracker.is_lead_unlocked("1"));
        assert!(!tracker.is_unlocking("1"));
        assert_eq!(tracker.error("1"), Some("Not enough credits"));
    }

    #[tokio::test]
    async fn checking_status_twice_changes_nothing() {
        let flow = UnlockFlow::new(FakeApi::new());
        flow.unlock("4").await.unwrap();

        flow.check_status("4").await.unwrap();
        let once = flow.snapshot();
        flow.check_status("4").await.unwrap();
        assert_eq!(flow.snapshot(), once);
        assert!(once.is_lead_unlocked("4"));

        flow.check_status("1").await.unwrap();
        flow.check_status("1").await.unwrap();
        assert!(!flow.tracker().is_lead_unlocked("1"));
    }

    #[tokio::test]
    async fn event_url_lead_unlocks_to_a_url() {
        let flow = UnlockFlow::new(FakeApi::new());
        flow.unlock("4").await.unwrap();

        let tracker = flow.tracker();
        let value = tracker.unlock_value("4").unwrap();
        assert!(UnlockType::EventUrl.value_kind().accepts(value));
        assert!(!UnlockValueKind::Email.accepts(value));
    }

    #[tokio::test]
    async fn second_unlock_while_in_flight_is_rejected_locally() {
        let flow = UnlockFlow::new(FakeApi::new());
        flow.begin("1").unwrap();

        let err = flow.unlock("1").await.unwrap_err();
        assert_eq!(err, UnlockError::InFlight("1".to_string()));
        assert_eq!(flow.api.unlock_calls.get(), 0);

        flow.send_unlock("1").await.unwrap();
        assert_eq!(flow.api.unlock_calls.get(), 1);
        assert!(flow.tracker().is_lead_unlocked("1"));
    }

    #[test]
    fn locked_status_never_downgrades_a_known_unlock() {
        let mut tracker = UnlockTracker::default();
        tracker.begin("2").unwrap();
        tracker.complete(
            "2",
            &Ok(UnlockStatus {
                lead_id: "2".to_string(),
                unlocked: true,
                unlock_value: Some("https://enterprise-ai-summit.com".to_string()),
                unlocked_at: Some(Utc::now()),
                credits_remaining: Some(24),
            }),
        );

        tracker.record_status(&UnlockStatus::locked("2"));
        assert!(tracker.is_lead_unlocked("2"));
        assert_eq!(tracker.unlock_value("2"), Some("https://enterprise-ai-summit.com"));
    }
}
