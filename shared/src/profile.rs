//! Profile view, partial updates and the edit flow shared by every profile screen.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::collections::HashMap;

use crate::{IdentityMetadata, Profile, RemoteError, User};

pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;
pub const AVATAR_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

pub const LOAD_FAILED: &str = "Failed to load profile data";
pub const UPDATE_FAILED: &str = "Failed to update profile";

/// Check an avatar upload before it is encoded.
pub fn validate_avatar(size: usize, mime: &str) -> Result<(), String> {
    if size > MAX_AVATAR_BYTES {
        return Err("File size must be less than 2MB".to_string());
    }
    if !AVATAR_MIME_TYPES.contains(&mime) {
        return Err("File must be an image (JPEG, PNG, or GIF)".to_string());
    }
    Ok(())
}

/// What a profile screen shows: the stored profile with identity fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    pub display_name: String,
    pub services: Vec<String>,
    pub industries: Vec<String>,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl ProfileView {
    pub fn compose(profile: &Profile, user: &User) -> Self {
        let display_name = profile
            .display_name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| user.metadata.display_name.clone())
            .unwrap_or_default();
        let avatar_url = profile
            .avatar_url
            .clone()
            .filter(|a| !a.is_empty())
            .or_else(|| user.metadata.avatar_url.clone());

        Self {
            display_name,
            services: profile.services.clone(),
            industries: profile.industries.clone(),
            email: user.email.clone(),
            avatar_url,
        }
    }

    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.display_name {
            self.display_name = name.clone();
        }
        if let Some(services) = &update.services {
            self.services = services.clone();
        }
        if let Some(industries) = &update.industries {
            self.industries = industries.clone();
        }
        if let Some(avatar) = &update.avatar_url {
            self.avatar_url = Some(avatar.clone());
        }
    }
}

/// Partial profile update. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_setup_completed: Option<bool>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ProfileUpdate::default()
    }

    /// The part of this update mirrored into identity metadata, if any.
    pub fn identity_patch(&self) -> Option<IdentityMetadataUpdate> {
        if self.display_name.is_none() && self.avatar_url.is_none() {
            return None;
        }
        Some(IdentityMetadataUpdate {
            display_name: self.display_name.clone(),
            avatar_url: self.avatar_url.clone(),
            avatar_updated_at: None,
        })
    }

    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(name) = &self.display_name {
            profile.display_name = Some(name.clone());
        }
        if let Some(services) = &self.services {
            profile.services = services.clone();
        }
        if let Some(industries) = &self.industries {
            profile.industries = industries.clone();
        }
        if let Some(avatar) = &self.avatar_url {
            profile.avatar_url = Some(avatar.clone());
        }
        if let Some(provider) = &self.email_provider {
            profile.email_provider = Some(provider.clone());
        }
        if let Some(done) = self.email_setup_completed {
            profile.email_setup_completed = done;
        }
    }
}

/// Partial identity-metadata update; merged into the existing metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityMetadataUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_updated_at: Option<DateTime<Utc>>,
}

impl IdentityMetadataUpdate {
    pub fn apply_to(&self, metadata: &mut IdentityMetadata) {
        if let Some(name) = &self.display_name {
            metadata.display_name = Some(name.clone());
        }
        if let Some(avatar) = &self.avatar_url {
            metadata.avatar_url = Some(avatar.clone());
        }
        if let Some(at) = self.avatar_updated_at {
            metadata.avatar_updated_at = Some(at);
        }
    }
}

/// First-run form: who the user is and what they offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnboardingRequest {
    pub full_name: String,
    pub services: Vec<String>,
    pub industries: Vec<String>,
}

impl OnboardingRequest {
    pub const MAX_INDUSTRIES: usize = 3;

    pub fn validate(&self) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        if self.full_name.trim().chars().count() < 2 {
            errors.insert(
                "full_name".to_string(),
                "Full name must be at least 2 characters".to_string(),
            );
        }
        if self.services.is_empty() {
            errors.insert(
                "services".to_string(),
                "Please select at least one service".to_string(),
            );
        }
        if self.industries.is_empty() {
            errors.insert(
                "industries".to_string(),
                "Please select at least one industry".to_string(),
            );
        } else if self.industries.len() > Self::MAX_INDUSTRIES {
            errors.insert(
                "industries".to_string(),
                "Please select no more than 3 industries".to_string(),
            );
        }
        errors
    }

    pub fn identity_update(&self) -> IdentityMetadataUpdate {
        IdentityMetadataUpdate {
            display_name: Some(self.full_name.trim().to_string()),
            ..Default::default()
        }
    }

    pub fn profile_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            services: Some(self.services.clone()),
            industries: Some(self.industries.clone()),
            ..Default::default()
        }
    }
}

/// Remote side of the profile edit flow.
#[async_trait(?Send)]
pub trait ProfileApi {
    async fn fetch_profile(&self) -> Result<ProfileView, RemoteError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), RemoteError>;

    async fn update_identity_metadata(
        &self,
        update: &IdentityMetadataUpdate,
    ) -> Result<User, RemoteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdateOutcome {
    /// The profile record write went through and the local view was merged.
    pub saved: bool,
    pub error: Option<String>,
}

/// Holds the loaded profile and applies edits against a [`ProfileApi`].
pub struct ProfileEditor<A> {
    api: A,
    profile: RefCell<Option<ProfileView>>,
    error: RefCell<Option<String>>,
}

impl<A: ProfileApi> ProfileEditor<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            profile: RefCell::new(None),
            error: RefCell::new(None),
        }
    }

    pub fn profile(&self) -> Ref<'_, Option<ProfileView>> {
        self.profile.borrow()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub async fn load(&self) -> Result<ProfileView, String> {
        match self.api.fetch_profile().await {
            Ok(view) => {
                *self.profile.borrow_mut() = Some(view.clone());
                *self.error.borrow_mut() = None;
                Ok(view)
            }
            Err(_) => {
                *self.error.borrow_mut() = Some(LOAD_FAILED.to_string());
                Err(LOAD_FAILED.to_string())
            }
        }
    }

    /// Write the profile, merge locally, then mirror name/avatar into identity
    /// metadata. A failed mirror is reported but the merge stays.
    pub async fn update(&self, update: &ProfileUpdate) -> ProfileUpdateOutcome {
        if self.api.update_profile(update).await.is_err() {
            return ProfileUpdateOutcome {
                saved: false,
                error: Some(UPDATE_FAILED.to_string()),
            };
        }

        if let Some(view) = self.profile.borrow_mut().as_mut() {
            view.apply(update);
        }

        let error = match update.identity_patch() {
            Some(patch) => self
                .api
                .update_identity_metadata(&patch)
                .await
                .err()
                .map(|_| UPDATE_FAILED.to_string()),
            None => None,
        };

        ProfileUpdateOutcome { saved: true, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserType;
    use uuid::Uuid;

    fn profile(user: &User) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            auth_id: user.id,
            email: user.email.clone(),
            display_name: None,
            services: vec!["Keynote Speaking".to_string()],
            industries: vec!["Finance".to_string()],
            avatar_url: None,
            user_type: UserType::Client,
            user_role: "Owner".to_string(),
            email_provider: None,
            email_setup_completed: false,
            unlock_credits: 25,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "jane@speakerdrive.com".to_string(),
            metadata: IdentityMetadata {
                display_name: Some("Jane Speaker".to_string()),
                avatar_url: Some("data:image/png;base64,AAAA".to_string()),
                ..Default::default()
            },
            created_at: Utc::now(),
        }
    }

    struct FakeApi {
        user: User,
        stored: RefCell<Profile>,
        fail_metadata: bool,
        metadata_writes: RefCell<Vec<IdentityMetadataUpdate>>,
    }

    impl FakeApi {
        fn new(fail_metadata: bool) -> Self {
            let user = user();
            let stored = RefCell::new(profile(&user));
            Self {
                user,
                stored,
                fail_metadata,
                metadata_writes: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl ProfileApi for FakeApi {
        async fn fetch_profile(&self) -> Result<ProfileView, RemoteError> {
            Ok(ProfileView::compose(&self.stored.borrow(), &self.user))
        }

        async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), RemoteError> {
            update.apply_to(&mut self.stored.borrow_mut());
            Ok(())
        }

        async fn update_identity_metadata(
            &self,
            update: &IdentityMetadataUpdate,
        ) -> Result<User, RemoteError> {
            if self.fail_metadata {
                return Err(RemoteError::new("metadata store unavailable"));
            }
            self.metadata_writes.borrow_mut().push(update.clone());
            let mut user = self.user.clone();
            update.apply_to(&mut user.metadata);
            Ok(user)
        }
    }

    #[test]
    fn view_falls_back_to_identity_metadata() {
        let user = user();
        let view = ProfileView::compose(&profile(&user), &user);
        assert_eq!(view.display_name, "Jane Speaker");
        assert_eq!(view.avatar_url.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(view.email, "jane@speakerdrive.com");
    }

    #[tokio::test]
    async fn failed_metadata_write_keeps_primary_update() {
        let editor = ProfileEditor::new(FakeApi::new(true));
        editor.load().await.unwrap();

        let update = ProfileUpdate {
            display_name: Some("Jane Q. Speaker".to_string()),
            ..Default::default()
        };
        let outcome = editor.update(&update).await;

        assert!(outcome.saved);
        assert_eq!(outcome.error.as_deref(), Some(UPDATE_FAILED));
        assert_eq!(
            editor.api.stored.borrow().display_name.as_deref(),
            Some("Jane Q. Speaker")
        );
        assert_eq!(
            editor.profile().as_ref().map(|p| p.display_name.as_str()),
            Some("Jane Q. Speaker")
        );
    }

    #[tokio::test]
    async fn services_only_update_skips_metadata() {
        let editor = ProfileEditor::new(FakeApi::new(false));
        editor.load().await.unwrap();

        let outcome = editor
            .update(&ProfileUpdate {
                services: Some(vec!["Consulting".to_string()]),
                ..Default::default()
            })
            .await;

        assert_eq!(outcome, ProfileUpdateOutcome { saved: true, error: None });
        assert!(editor.api.metadata_writes.borrow().is_empty());
        assert_eq!(editor.api.stored.borrow().industries, vec!["Finance"]);
    }

    #[test]
    fn onboarding_enforces_name_services_and_industry_bounds() {
        let request = OnboardingRequest {
            full_name: "J".to_string(),
            services: vec![],
            industries: vec!["A", "B", "C", "D"].into_iter().map(String::from).collect(),
        };
        let errors = request.validate();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["industries"], "Please select no more than 3 industries");

        let ok = OnboardingRequest {
            full_name: "Jo".to_string(),
            services: vec!["Consulting".to_string()],
            industries: vec!["Finance".to_string()],
        };
        assert!(ok.validate().is_empty());
    }

    #[test]
    fn avatar_validation_rejects_oversize_and_non_images() {
        assert!(validate_avatar(1024, "image/png").is_ok());
        assert!(validate_avatar(MAX_AVATAR_BYTES + 1, "image/png").is_err());
        assert!(validate_avatar(1024, "image/webp").is_err());
        assert!(validate_avatar(1024, "application/pdf").is_err());
    }
}
