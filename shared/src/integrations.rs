use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Contact-finder query: either a name at a company domain, or a LinkedIn profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ContactSearch {
    Manual {
        full_name: String,
        company_domain: String,
    },
    Linkedin {
        linkedin_url: String,
    },
}

fn is_linkedin_host(host: &str) -> bool {
    host == "linkedin.com" || host.ends_with(".linkedin.com")
}

impl ContactSearch {
    /// `(query, company_domain)` as sent to the email-finder API.
    pub fn query_params(&self) -> (String, Option<String>) {
        match self {
            ContactSearch::Manual {
                full_name,
                company_domain,
            } => (
                full_name.trim().to_string(),
                Some(company_domain.trim().to_string()),
            ),
            ContactSearch::Linkedin { linkedin_url } => (linkedin_url.trim().to_string(), None),
        }
    }

    /// Field name → message for every missing or malformed input.
    pub fn validate(&self) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        match self {
            ContactSearch::Manual {
                full_name,
                company_domain,
            } => {
                if full_name.trim().is_empty() {
                    errors.insert("full_name".to_string(), "Full name is required".to_string());
                }
                let domain = company_domain.trim();
                if domain.is_empty() {
                    errors.insert(
                        "company_domain".to_string(),
                        "Company domain is required".to_string(),
                    );
                } else if !domain.contains('.') || domain.contains(char::is_whitespace) {
                    errors.insert(
                        "company_domain".to_string(),
                        "Company domain must look like example.com".to_string(),
                    );
                }
            }
            ContactSearch::Linkedin { linkedin_url } => {
                let is_linkedin = url::Url::parse(linkedin_url.trim())
                    .ok()
                    .and_then(|u| u.host_str().map(is_linkedin_host))
                    .unwrap_or(false);
                if !is_linkedin {
                    errors.insert(
                        "linkedin_url".to_string(),
                        "Enter a valid LinkedIn profile URL".to_string(),
                    );
                }
            }
        }
        errors
    }
}

/// What the email finder returned for a search.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContactFinderResult {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company_domain: Option<String>,
    /// Deliverability as reported upstream, e.g. "valid" or "risky".
    #[serde(default)]
    pub status: Option<String>,
    /// Untouched upstream payload.
    #[serde(default)]
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatbotResponse {
    pub response: String,
    pub status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_search_requires_name_and_domain() {
        let search = ContactSearch::Manual {
            full_name: " ".to_string(),
            company_domain: "crowe".to_string(),
        };
        let errors = search.validate();
        assert!(errors.contains_key("full_name"));
        assert!(errors.contains_key("company_domain"));
    }

    #[test]
    fn linkedin_search_maps_to_query_only() {
        let search = ContactSearch::Linkedin {
            linkedin_url: "https://www.linkedin.com/in/davidchen".to_string(),
        };
        assert!(search.validate().is_empty());
        assert_eq!(
            search.query_params(),
            ("https://www.linkedin.com/in/davidchen".to_string(), None)
        );
    }

    #[test]
    fn linkedin_url_must_be_on_a_linkedin_host() {
        for url in [
            "https://linkedin.com/in/davidchen",
            "https://uk.linkedin.com/in/davidchen",
        ] {
            let search = ContactSearch::Linkedin { linkedin_url: url.to_string() };
            assert!(search.validate().is_empty(), "{}", url);
        }
        for url in [
            "https://evillinkedin.com/in/davidchen",
            "https://linkedin.com.example.org/in/davidchen",
            "not a url",
        ] {
            let search = ContactSearch::Linkedin { linkedin_url: url.to_string() };
            assert!(search.validate().contains_key("linkedin_url"), "{}", url);
        }
    }

    #[test]
    fn search_is_tagged_by_mode() {
        let search: ContactSearch = serde_json::from_str(
            r#"{"mode":"manual","full_name":"Tiffany Hiscock","company_domain":"crowe.com"}"#,
        )
        .unwrap();
        assert_eq!(
            search.query_params(),
            ("Tiffany Hiscock".to_string(), Some("crowe.com".to_string()))
        );
    }
}
