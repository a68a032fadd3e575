// API service layer for communicating with backend
use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_storage::{LocalStorage, Storage};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use speakerdrive_shared::{
    IdentityMetadataUpdate, ProfileApi, ProfileUpdate, ProfileView, RemoteError, UnlockApi,
    UnlockStatus, User,
};

const API_BASE_URL: &str = "/api/v1";
const AUTH_TOKEN_KEY: &str = "speakerdrive_auth_token";

pub type ApiResult<T> = Result<T, RemoteError>;

fn network_error(e: gloo_net::Error) -> RemoteError {
    RemoteError::new(e.to_string()).with_code("NETWORK_ERROR")
}

// ============================================
// HTTP CLIENT
// ============================================

pub struct ApiClient;

impl ApiClient {
    pub fn auth_token() -> Option<String> {
        LocalStorage::get::<String>(AUTH_TOKEN_KEY).ok()
    }

    pub fn set_auth_token(token: &str) {
        let _ = LocalStorage::set(AUTH_TOKEN_KEY, token);
    }

    pub fn clear_auth_token() {
        LocalStorage::delete(AUTH_TOKEN_KEY);
    }

    fn url(endpoint: &str) -> String {
        format!("{}{}", API_BASE_URL, endpoint)
    }

    fn authorized(req: RequestBuilder) -> RequestBuilder {
        match Self::auth_token() {
            Some(token) => req.header("Authorization", &format!("Bearer {}", token)),
            None => req,
        }
    }

    /// Pass 2xx responses through; turn anything else into the backend's error envelope.
    async fn check(response: Response) -> ApiResult<Response> {
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        Err(response.json::<RemoteError>().await.unwrap_or_else(|_| {
            RemoteError::new(format!("HTTP Error: {}", status)).with_code(format!("HTTP_{}", status))
        }))
    }

    async fn read<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        Self::check(response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| RemoteError::new(e.to_string()).with_code("PARSE_ERROR"))
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        req: RequestBuilder,
        body: &B,
    ) -> ApiResult<T> {
        let response = Self::authorized(req)
            .json(body)
            .map_err(|e| RemoteError::new(e.to_string()).with_code("SERIALIZE_ERROR"))?
            .send()
            .await
            .map_err(network_error)?;
        Self::read(response).await
    }

    pub async fn get<T: DeserializeOwned>(endpoint: &str) -> ApiResult<T> {
        let response = Self::authorized(Request::get(&Self::url(endpoint)))
            .send()
            .await
            .map_err(network_error)?;
        Self::read(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(endpoint: &str, body: &B) -> ApiResult<T> {
        Self::send_json(Request::post(&Self::url(endpoint)), body).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(endpoint: &str, body: &B) -> ApiResult<T> {
        Self::send_json(Request::patch(&Self::url(endpoint)), body).await
    }

    /// POST without a body, for endpoints that answer JSON.
    pub async fn post_empty<T: DeserializeOwned>(endpoint: &str) -> ApiResult<T> {
        let response = Self::authorized(Request::post(&Self::url(endpoint)))
            .send()
            .await
            .map_err(network_error)?;
        Self::read(response).await
    }

    /// Requests answered with `204 No Content`.
    pub async fn send_no_content(req: RequestBuilder) -> ApiResult<()> {
        let response = Self::authorized(req).send().await.map_err(network_error)?;
        Self::check(response).await.map(|_| ())
    }

    pub async fn delete(endpoint: &str) -> ApiResult<()> {
        Self::send_no_content(Request::delete(&Self::url(endpoint))).await
    }

    pub async fn put_form<T: DeserializeOwned>(
        endpoint: &str,
        form: &web_sys::FormData,
    ) -> ApiResult<T> {
        let response = Self::authorized(Request::put(&Self::url(endpoint)))
            .body(form.clone())
            .map_err(|e| RemoteError::new(e.to_string()).with_code("SERIALIZE_ERROR"))?
            .send()
            .await
            .map_err(network_error)?;
        Self::read(response).await
    }
}

// ============================================
// COMMON TYPES
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

// ============================================
// AUTH SERVICE
// ============================================

pub mod auth {
    use super::*;
    use speakerdrive_shared::{AuthResponse, LoginRequest, SignupRequest};

    pub async fn login(email: &str, password: &str) -> ApiResult<AuthResponse> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = ApiClient::post("/auth/login", &req).await?;
        ApiClient::set_auth_token(&response.token);
        Ok(response)
    }

    pub async fn signup(email: &str, password: &str) -> ApiResult<AuthResponse> {
        let req = SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = ApiClient::post("/auth/signup", &req).await?;
        ApiClient::set_auth_token(&response.token);
        Ok(response)
    }

    /// Sign out remotely, then drop the local token whatever the outcome.
    pub async fn logout() -> ApiResult<()> {
        let result = ApiClient::send_no_content(Request::post(&ApiClient::url("/auth/logout"))).await;
        ApiClient::clear_auth_token();
        result
    }

    pub async fn session() -> ApiResult<User> {
        ApiClient::get("/auth/session").await
    }

    pub async fn refresh() -> ApiResult<AuthResponse> {
        let response: AuthResponse = ApiClient::post_empty("/auth/refresh").await?;
        ApiClient::set_auth_token(&response.token);
        Ok(response)
    }

    pub async fn update_user(update: &IdentityMetadataUpdate) -> ApiResult<User> {
        ApiClient::patch("/auth/user", update).await
    }
}

// ============================================
// LEADS SERVICE
// ============================================

pub mod leads {
    use super::*;
    use speakerdrive_shared::Lead;

    /// Largest page the backend will serve. Listing screens load every page
    /// and narrow the whole set locally.
    pub const PAGE_LIMIT: i64 = 100;

    pub fn list_endpoint(path: &str, page: i64) -> String {
        format!("{}?page={}&per_page={}", path, page.max(1), PAGE_LIMIT)
    }

    /// Page to request after `meta`, if the listing continues.
    pub fn next_page(meta: &PaginationMeta) -> Option<i64> {
        (meta.has_next && meta.page < meta.total_pages).then(|| meta.page + 1)
    }

    async fn fetch_all(path: &str) -> ApiResult<Vec<Lead>> {
        let mut leads = Vec::new();
        let mut page = 1;
        loop {
            let batch: PaginatedResponse<Lead> = ApiClient::get(&list_endpoint(path, page)).await?;
            leads.extend(batch.data);
            match next_page(&batch.meta) {
                Some(next) => page = next,
                None => return Ok(leads),
            }
        }
    }

    pub async fn list() -> ApiResult<Vec<Lead>> {
        fetch_all("/leads").await
    }

    pub async fn mine() -> ApiResult<Vec<Lead>> {
        fetch_all("/leads/mine").await
    }

    pub async fn get(id: &str) -> ApiResult<Lead> {
        ApiClient::get(&format!("/leads/{}", encode(id))).await
    }

    pub async fn unlock_status(id: &str) -> ApiResult<UnlockStatus> {
        ApiClient::get(&format!("/leads/{}/unlock", encode(id))).await
    }

    pub async fn unlock(id: &str) -> ApiResult<UnlockStatus> {
        ApiClient::post_empty(&format!("/leads/{}/unlock", encode(id))).await
    }

    fn encode(id: &str) -> String {
        String::from(js_sys::encode_uri_component(id))
    }
}

// ============================================
// PROFILE SERVICE
// ============================================

pub mod profile {
    use super::*;
    use speakerdrive_shared::OnboardingRequest;

    pub async fn fetch() -> ApiResult<ProfileView> {
        ApiClient::get("/profile").await
    }

    pub async fn update(update: &ProfileUpdate) -> ApiResult<ProfileView> {
        ApiClient::patch("/profile", update).await
    }

    pub async fn complete_onboarding(req: &OnboardingRequest) -> ApiResult<ProfileView> {
        ApiClient::post("/profile/onboarding", req).await
    }

    pub async fn upload_avatar(file: &web_sys::File) -> ApiResult<ProfileView> {
        let form = web_sys::FormData::new()
            .map_err(|_| RemoteError::new("Could not prepare upload"))?;
        form.append_with_blob_and_filename("avatar", file, &file.name())
            .map_err(|_| RemoteError::new("Could not prepare upload"))?;
        ApiClient::put_form("/profile/avatar", &form).await
    }

    pub async fn remove_avatar() -> ApiResult<()> {
        ApiClient::delete("/profile/avatar").await
    }
}

// ============================================
// DASHBOARD, CATALOG & PROMPTS
// ============================================

pub mod dashboard {
    use super::*;
    use speakerdrive_shared::DashboardStats;

    pub async fn stats() -> ApiResult<DashboardStats> {
        ApiClient::get("/dashboard").await
    }
}

pub mod catalog {
    use super::*;
    use speakerdrive_shared::{Catalog, PromptDeck};

    pub async fn get() -> ApiResult<Catalog> {
        ApiClient::get("/catalog").await
    }

    pub async fn prompt_deck(id: &str) -> ApiResult<PromptDeck> {
        ApiClient::get(&format!("/prompts/{}", id)).await
    }
}

// ============================================
// INTEGRATIONS
// ============================================

pub mod integrations {
    use super::*;
    use speakerdrive_shared::{ChatRequest, ChatbotResponse, ContactFinderResult, ContactSearch};

    pub async fn find_contact(search: &ContactSearch) -> ApiResult<ContactFinderResult> {
        ApiClient::post("/contact-finder/search", search).await
    }

    pub async fn chat(message: &str) -> ApiResult<ChatbotResponse> {
        let req = ChatRequest {
            message: message.to_string(),
        };
        ApiClient::post("/chat", &req).await
    }
}

// ============================================
// FLOW BACKENDS
// ============================================

/// [`UnlockApi`] over the leads endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HttpUnlockApi;

#[async_trait(?Send)]
impl UnlockApi for HttpUnlockApi {
    async fn unlock_status(&self, lead_id: &str) -> Result<UnlockStatus, RemoteError> {
        leads::unlock_status(lead_id).await
    }

    async fn unlock(&self, lead_id: &str) -> Result<UnlockStatus, RemoteError> {
        leads::unlock(lead_id).await
    }
}

/// [`ProfileApi`] over the profile and identity endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HttpProfileApi;

#[async_trait(?Send)]
impl ProfileApi for HttpProfileApi {
    async fn fetch_profile(&self) -> Result<ProfileView, RemoteError> {
        profile::fetch().await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), RemoteError> {
        profile::update(update).await.map(|_| ())
    }

    async fn update_identity_metadata(
        &self,
        update: &IdentityMetadataUpdate,
    ) -> Result<User, RemoteError> {
        auth::update_user(update).await
    }
}
