use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod catalog;
pub mod filter;
pub mod integrations;
pub mod profile;
pub mod prompts;
pub mod unlock;

pub use catalog::Catalog;
pub use filter::{AddedWindow, FilterCriteria, FilterDimension, LeadSort, SortDirection, SortField};
pub use integrations::{ChatRequest, ChatbotResponse, ContactFinderResult, ContactSearch};
pub use profile::{
    IdentityMetadataUpdate, OnboardingRequest, ProfileApi, ProfileEditor, ProfileUpdate,
    ProfileUpdateOutcome, ProfileView,
};
pub use prompts::{Prompt, PromptDeck, PromptLibrary, PromptSection};
pub use unlock::{LeadUnlockState, UnlockApi, UnlockError, UnlockFlow, UnlockTracker};

/// Error returned by a remote call, as seen by a client.
///
/// Deserializes from the backend's error envelope (`code` + `message`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

// ============================================
// LEADS
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadType {
    Contact,
    Event,
}

impl LeadType {
    pub const ALL: [LeadType; 2] = [LeadType::Contact, LeadType::Event];

    pub fn label(&self) -> &'static str {
        match self {
            LeadType::Contact => "Contact",
            LeadType::Event => "Event",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadType::Contact => "contact",
            LeadType::Event => "event",
        }
    }
}

impl std::str::FromStr for LeadType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contact" => Ok(LeadType::Contact),
            "event" => Ok(LeadType::Event),
            other => Err(format!("unknown lead type '{}'", other)),
        }
    }
}

/// What kind of value an unlock reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockValueKind {
    Email,
    Url,
}

impl UnlockValueKind {
    /// Whether `value` has the shape of this kind.
    pub fn accepts(&self, value: &str) -> bool {
        let value = value.trim();
        match self {
            UnlockValueKind::Email => {
                let mut parts = value.splitn(2, '@');
                let local = parts.next().unwrap_or_default();
                let domain = parts.next().unwrap_or_default();
                !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
                    && !value.contains(char::is_whitespace)
            }
            UnlockValueKind::Url => url::Url::parse(value)
                .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockType {
    ContactEmail,
    EventEmail,
    EventUrl,
}

impl UnlockType {
    pub const ALL: [UnlockType; 3] = [
        UnlockType::ContactEmail,
        UnlockType::EventEmail,
        UnlockType::EventUrl,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UnlockType::ContactEmail => "Contact Email",
            UnlockType::EventEmail => "Event Email",
            UnlockType::EventUrl => "Event URL",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnlockType::ContactEmail => "contact_email",
            UnlockType::EventEmail => "event_email",
            UnlockType::EventUrl => "event_url",
        }
    }

    pub fn lead_type(&self) -> LeadType {
        match self {
            UnlockType::ContactEmail => LeadType::Contact,
            UnlockType::EventEmail | UnlockType::EventUrl => LeadType::Event,
        }
    }

    pub fn value_kind(&self) -> UnlockValueKind {
        match self {
            UnlockType::ContactEmail | UnlockType::EventEmail => UnlockValueKind::Email,
            UnlockType::EventUrl => UnlockValueKind::Url,
        }
    }
}

impl std::str::FromStr for UnlockType {
    type Err = String;

    /// Accepts both the wire form (`event_url`) and the label (`Event URL`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(' ', "_");
        match normalized.as_str() {
            "contact_email" => Ok(UnlockType::ContactEmail),
            "event_email" => Ok(UnlockType::EventEmail),
            "event_url" => Ok(UnlockType::EventUrl),
            _ => Err(format!("unknown unlock type '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionType {
    Com,
    Org,
    Edu,
    Gov,
    Net,
}

impl ExtensionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionType::Com => "com",
            ExtensionType::Org => "org",
            ExtensionType::Edu => "edu",
            ExtensionType::Gov => "gov",
            ExtensionType::Net => "net",
        }
    }
}

impl std::str::FromStr for ExtensionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "com" => Ok(ExtensionType::Com),
            "org" => Ok(ExtensionType::Org),
            "edu" => Ok(ExtensionType::Edu),
            "gov" => Ok(ExtensionType::Gov),
            "net" => Ok(ExtensionType::Net),
            other => Err(format!("unknown extension type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    pub location: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub format: String,
}

/// A prospective contact or event a user may unlock.
///
/// `unlock_value` and `is_unlocked` are relative to the viewing user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub focus: String,
    pub image_url: String,
    pub lead_type: LeadType,
    pub unlock_type: UnlockType,
    pub unlock_value: Option<String>,
    pub is_unlocked: bool,
    pub industry_category: String,
    pub extension_type: ExtensionType,
    pub added_at: DateTime<Utc>,
    pub linkedin_url: Option<String>,
    pub event_purpose: String,
    pub detailed_info: Option<String>,
    pub host_organization: Option<String>,
    pub target_audience: Option<String>,
    pub company_size: Option<String>,
    pub location: Option<String>,
    pub event_details: Option<EventDetails>,
}

impl Lead {
    pub fn is_event(&self) -> bool {
        self.lead_type == LeadType::Event
    }

    /// Copy with the viewer's unlock overlaid.
    pub fn for_viewer(&self, unlock: Option<&LeadUnlock>) -> Lead {
        let mut lead = self.clone();
        match unlock {
            Some(unlock) => {
                lead.is_unlocked = true;
                lead.unlock_value = Some(unlock.unlock_value.clone());
            }
            None => {
                lead.is_unlocked = false;
                lead.unlock_value = None;
            }
        }
        lead
    }
}

#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadUnlock {
    pub user_id: Uuid,
    pub lead_id: String,
    pub unlock_value: String,
    pub unlocked_at: DateTime<Utc>,
}

/// Answer to "is this lead unlocked for me?"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockStatus {
    pub lead_id: String,
    pub unlocked: bool,
    pub unlock_value: Option<String>,
    pub unlocked_at: Option<DateTime<Utc>>,
    /// Credits left after the call, when known.
    #[serde(default)]
    pub credits_remaining: Option<i32>,
}

impl UnlockStatus {
    pub fn locked(lead_id: impl Into<String>) -> Self {
        Self {
            lead_id: lead_id.into(),
            unlocked: false,
            unlock_value: None,
            unlocked_at: None,
            credits_remaining: None,
        }
    }

    pub fn from_unlock(unlock: &LeadUnlock) -> Self {
        Self {
            lead_id: unlock.lead_id.clone(),
            unlocked: true,
            unlock_value: Some(unlock.unlock_value.clone()),
            unlocked_at: Some(unlock.unlocked_at),
            credits_remaining: None,
        }
    }
}

// ============================================
// IDENTITY & PROFILE
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserType {
    Admin,
    #[default]
    Client,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "Admin",
            UserType::Client => "Client",
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(UserType::Admin),
            "Client" => Ok(UserType::Client),
            other => Err(format!("unknown user type '{}'", other)),
        }
    }
}

/// Free-form data the auth provider keeps alongside an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IdentityMetadata {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub avatar_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default = "default_user_role")]
    pub user_role: String,
}

fn default_user_role() -> String {
    "Owner".to_string()
}

/// An authenticated identity, as exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub metadata: IdentityMetadata,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name shown in navigation: metadata name, else the email's local part.
    pub fn display_name(&self) -> String {
        self.metadata
            .display_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email_local_part(&self.email).to_string())
    }
}

pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Stored profile record, keyed by the owning identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub auth_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub services: Vec<String>,
    pub industries: Vec<String>,
    pub avatar_url: Option<String>,
    pub user_type: UserType,
    pub user_role: String,
    pub email_provider: Option<String>,
    pub email_setup_completed: bool,
    pub unlock_credits: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================
// AUTH
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

// ============================================
// DASHBOARD
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_leads: usize,
    pub contact_leads: usize,
    pub event_leads: usize,
    pub unlocked_leads: usize,
    pub credits_remaining: i32,
    pub added_last_week: Vec<Lead>,
}
