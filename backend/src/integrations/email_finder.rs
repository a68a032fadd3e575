use serde_json::Value;

use speakerdrive_shared::{ContactFinderResult, ContactSearch};

use super::{IntegrationError, IntegrationResult};
use crate::config::EmailFinderConfig;

pub const SERVICE: &str = "email_finder";

/// Client for the email-finder REST API
pub struct EmailFinderClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl EmailFinderClient {
    pub fn new(config: &EmailFinderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Look up an email address by name and company domain, or by LinkedIn URL.
    pub async fn search(&self, search: &ContactSearch) -> IntegrationResult<ContactFinderResult> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(IntegrationError::NotConfigured(SERVICE))?;

        let (query, company_domain) = search.query_params();
        let mut params = vec![("query", query)];
        if let Some(domain) = company_domain {
            params.push(("company_domain", domain));
        }

        let response = self
            .client
            .get(format!("{}/api/v2/email/finder", self.base_url))
            .header("x-api-key", api_key)
            .header("Accept", "application/json")
            .query(&params)
            .send()
            .await
            .map_err(|source| IntegrationError::Request { service: SERVICE, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IntegrationError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|source| IntegrationError::Request { service: SERVICE, source })?;

        Ok(parse_result(raw))
    }
}

fn first_str(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| raw.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Pull the commonly used fields out of the upstream payload, keeping the rest in `raw`.
pub fn parse_result(raw: Value) -> ContactFinderResult {
    ContactFinderResult {
        email: first_str(&raw, &["email"]),
        full_name: first_str(&raw, &["full_name", "name"]),
        company_domain: first_str(&raw, &["company_domain", "domain"]),
        status: first_str(&raw, &["status", "email_status"]),
        raw,
    }
}
