//! Lead filter criteria and the predicate that applies them.
//!
//! The same [`FilterCriteria`] is deserialized from backend query strings and
//! edited by the frontend's filter sidebar, so both sides narrow leads the
//! same way.

use chrono::{DateTime, Duration, Utc};
use serde::de::value::StrDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Lead, LeadType, UnlockType};

/// When a lead was added, bucketed the way the filter sidebar offers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddedWindow {
    LastWeek,
    LastMonth,
    LastYear,
    Older,
}

impl AddedWindow {
    pub const ALL: [AddedWindow; 4] = [
        AddedWindow::LastWeek,
        AddedWindow::LastMonth,
        AddedWindow::LastYear,
        AddedWindow::Older,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AddedWindow::LastWeek => "Within the Last Week",
            AddedWindow::LastMonth => "Within the Last Month",
            AddedWindow::LastYear => "Within the Last Year",
            AddedWindow::Older => "Over 1 Year Ago",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AddedWindow::LastWeek => "last_week",
            AddedWindow::LastMonth => "last_month",
            AddedWindow::LastYear => "last_year",
            AddedWindow::Older => "older",
        }
    }

    pub fn contains(&self, added_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let age = now - added_at;
        match self {
            AddedWindow::LastWeek => age <= Duration::days(7),
            AddedWindow::LastMonth => age <= Duration::days(30),
            AddedWindow::LastYear => age <= Duration::days(365),
            AddedWindow::Older => age > Duration::days(365),
        }
    }
}

impl std::str::FromStr for AddedWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AddedWindow::ALL
            .into_iter()
            .find(|w| w.as_str() == s || w.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown timeframe '{}'", s))
    }
}

/// The dimensions a user can filter leads by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterDimension {
    LeadType,
    UnlockType,
    Industry,
    Organization,
    Location,
    AddedWithin,
    Search,
    EventSearch,
}

/// Current value of every filter dimension. `None` (or blank) means "any".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    #[serde(deserialize_with = "blank_as_none")]
    pub lead_type: Option<LeadType>,
    #[serde(deserialize_with = "blank_as_none")]
    pub unlock_type: Option<UnlockType>,
    pub industry: Option<String>,
    pub organization: Option<String>,
    pub location: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub added_within: Option<AddedWindow>,
    pub search: Option<String>,
    pub event_search: Option<String>,
}

/// An empty select (`?lead_type=`) leaves the dimension unset.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            let value: StrDeserializer<'_, D::Error> = raw.trim().into_deserializer();
            T::deserialize(value).map(Some)
        }
        _ => Ok(None),
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(needle))
        .unwrap_or(false)
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.lead_type.is_none()
            && self.unlock_type.is_none()
            && self.added_within.is_none()
            && non_blank(&self.industry).is_none()
            && non_blank(&self.organization).is_none()
            && non_blank(&self.location).is_none()
            && non_blank(&self.search).is_none()
            && non_blank(&self.event_search).is_none()
    }

    pub fn clear(&mut self) {
        *self = FilterCriteria::default();
    }

    /// Set one dimension from the raw text of a form control.
    ///
    /// An empty value clears the dimension. Select values that do not parse
    /// also clear it.
    pub fn set(&mut self, dimension: FilterDimension, value: &str) {
        let text = Some(value.to_string()).filter(|v| !v.trim().is_empty());
        match dimension {
            FilterDimension::LeadType => self.lead_type = value.parse().ok(),
            FilterDimension::UnlockType => self.unlock_type = value.parse().ok(),
            FilterDimension::AddedWithin => self.added_within = value.parse().ok(),
            FilterDimension::Industry => self.industry = text,
            FilterDimension::Organization => self.organization = text,
            FilterDimension::Location => self.location = text,
            FilterDimension::Search => self.search = text,
            FilterDimension::EventSearch => self.event_search = text,
        }
    }

    /// Raw text of a dimension, for binding back into a form control.
    pub fn get(&self, dimension: FilterDimension) -> String {
        match dimension {
            FilterDimension::LeadType => self.lead_type.map(|t| t.as_str().to_string()),
            FilterDimension::UnlockType => self.unlock_type.map(|t| t.as_str().to_string()),
            FilterDimension::AddedWithin => self.added_within.map(|w| w.as_str().to_string()),
            FilterDimension::Industry => self.industry.clone(),
            FilterDimension::Organization => self.organization.clone(),
            FilterDimension::Location => self.location.clone(),
            FilterDimension::Search => self.search.clone(),
            FilterDimension::EventSearch => self.event_search.clone(),
        }
        .unwrap_or_default()
    }

    /// Every set dimension must match.
    pub fn matches(&self, lead: &Lead, now: DateTime<Utc>) -> bool {
        if let Some(lead_type) = self.lead_type {
            if lead.lead_type != lead_type {
                return false;
            }
        }

        if let Some(unlock_type) = self.unlock_type {
            if lead.unlock_type != unlock_type {
                return false;
            }
        }

        if let Some(window) = self.added_within {
            if !window.contains(lead.added_at, now) {
                return false;
            }
        }

        if let Some(industry) = non_blank(&self.industry) {
            if !contains_ci(Some(&lead.industry_category), &industry) {
                return false;
            }
        }

        if let Some(org) = non_blank(&self.organization) {
            if !contains_ci(lead.host_organization.as_deref(), &org)
                && !contains_ci(Some(&lead.focus), &org)
            {
                return false;
            }
        }

        if let Some(location) = non_blank(&self.location) {
            let event_location = lead.event_details.as_ref().map(|d| d.location.as_str());
            if !contains_ci(lead.location.as_deref(), &location)
                && !contains_ci(event_location, &location)
            {
                return false;
            }
        }

        if let Some(query) = non_blank(&self.event_search) {
            if !lead.is_event() || !contains_ci(Some(&lead.name), &query) {
                return false;
            }
        }

        if let Some(query) = non_blank(&self.search) {
            if !searchable_text(lead).any(|field| contains_ci(Some(field), &query)) {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, leads: &[Lead], now: DateTime<Utc>) -> Vec<Lead> {
        leads
            .iter()
            .filter(|lead| self.matches(lead, now))
            .cloned()
            .collect()
    }
}

fn searchable_text(lead: &Lead) -> impl Iterator<Item = &str> {
    let details = lead.event_details.as_ref();
    [
        Some(lead.name.as_str()),
        Some(lead.focus.as_str()),
        Some(lead.industry_category.as_str()),
        Some(lead.event_purpose.as_str()),
        Some(lead.unlock_type.label()),
        lead.detailed_info.as_deref(),
        lead.host_organization.as_deref(),
        lead.target_audience.as_deref(),
        lead.company_size.as_deref(),
        lead.location.as_deref(),
        details.map(|d| d.location.as_str()),
        details.map(|d| d.event_type.as_str()),
        details.map(|d| d.format.as_str()),
    ]
    .into_iter()
    .flatten()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    #[default]
    AddedAt,
    Industry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeadSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl LeadSort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Stable sort; ties keep their id order.
    pub fn sort(&self, leads: &mut [Lead]) {
        leads.sort_by(|a, b| {
            let ordering = match self.field {
                SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                SortField::AddedAt => a.added_at.cmp(&b.added_at),
                SortField::Industry => a
                    .industry_category
                    .to_lowercase()
                    .cmp(&b.industry_category.to_lowercase()),
            };
            let ordering = match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });
    }
}
