//! Request validation helpers
//!
//! Checks accumulate into a single `VALIDATION_ERROR` with per-field details.

use std::collections::HashMap;

use crate::error::AppError;

/// Email validation
pub mod email {
    /// Normalize an email address, or `None` if it is not shaped like one.
    pub fn normalize(value: &str) -> Option<String> {
        let email = value.trim().to_lowercase();
        let (local, domain) = email.split_once('@')?;
        if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
            return None;
        }
        // Domain needs at least one dot with text on both sides
        let (host, tld) = domain.rsplit_once('.')?;
        if host.is_empty() || tld.is_empty() {
            return None;
        }
        Some(email)
    }
}

/// Collects per-field problems into a single `VALIDATION_ERROR`.
#[derive(Debug, Default)]
pub struct Validator {
    details: HashMap<String, Vec<String>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn error(mut self, field: &str, message: String) -> Self {
        self.details.entry(field.to_string()).or_default().push(message);
        self
    }

    pub fn email(self, value: &str, field: &str) -> Self {
        if value.trim().is_empty() {
            self.error(field, format!("{} is required", field))
        } else if email::normalize(value).is_none() {
            self.error(field, "Invalid email format".to_string())
        } else {
            self
        }
    }

    /// Counted in characters after trimming.
    pub fn min_length(self, value: &str, field: &str, min: usize) -> Self {
        if value.trim().chars().count() < min {
            self.error(field, format!("{} must be at least {} characters", field, min))
        } else {
            self
        }
    }

    pub fn max_items<T>(self, value: &[T], field: &str, max: usize) -> Self {
        if value.len() > max {
            self.error(field, format!("{} cannot have more than {} items", field, max))
        } else {
            self
        }
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.details.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError {
                details: self.details,
            })
        }
    }
}
