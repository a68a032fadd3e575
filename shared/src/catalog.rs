use serde::{Deserialize, Serialize};

/// Option lists offered by filters, onboarding and the contact finder.
///
/// The backend loads this from a JSON file when one is configured; any list
/// missing from the file keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub locations: Vec<String>,
    pub industries: Vec<String>,
    pub timeframes: Vec<String>,
    pub event_formats: Vec<String>,
    pub organization_types: Vec<String>,
    pub services: Vec<String>,
    pub company_sizes: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            locations: owned(&[
                "United States - All (Multi-Region)",
                "United States - Northeast",
                "United States - Southeast",
                "United States - Midwest",
                "United States - Southwest",
                "United States - West Coast",
                "United States - Pacific Northwest",
                "Virtual - Remote only",
                "Canada - All Regions",
                "Europe - All Regions",
                "Asia Pacific - All Regions",
                "Global - Other/Unspecified",
                "US - Regional (Southwest)",
                "US - National (Multi-Region)",
                "US - Regional (Southeast)",
            ]),
            industries: owned(&[
                "Technology",
                "Healthcare",
                "Finance",
                "Education",
                "Manufacturing",
                "Retail",
                "Media",
                "Government",
                "Non-Profit",
                "Other",
            ]),
            timeframes: owned(&[
                "Within the Last Week",
                "Within the Last Month",
                "Within the Last Year",
                "Over 1 Year Ago",
            ]),
            event_formats: owned(&[
                "Conference",
                "Summit",
                "Workshop/Seminar",
                "Tradeshow/Convention",
                "Forum/Roundtable",
                "Consulting Potential",
                "Others",
            ]),
            organization_types: owned(&[
                "Corporation",
                "Education Institution",
                "Government Body",
                "Professional Association",
                "Small/Medium Business",
                "Community Organization",
                "Nonprofit Organization",
                "Other",
            ]),
            services: owned(&[
                "Keynote Speaking",
                "Workshops & Training",
                "Executive Coaching",
                "Consulting",
                "Panel Moderation",
                "Emcee / Host",
            ]),
            company_sizes: owned(&["1 - 100", "101 - 500", "501 - 1000", "1000+"]),
        }
    }
}

impl Catalog {
    pub fn has_industry(&self, industry: &str) -> bool {
        self.industries.iter().any(|i| i.eq_ignore_ascii_case(industry))
    }

    pub fn has_service(&self, service: &str) -> bool {
        self.services.iter().any(|s| s.eq_ignore_ascii_case(service))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_default_lists() {
        let catalog: Catalog =
            serde_json::from_str(r#"{"industries": ["Aerospace", "Energy"]}"#).unwrap();
        assert_eq!(catalog.industries, vec!["Aerospace", "Energy"]);
        assert_eq!(catalog.locations, Catalog::default().locations);
        assert!(catalog.has_industry("energy"));
        assert!(!catalog.has_industry("Finance"));
    }

    #[test]
    fn timeframes_line_up_with_added_windows() {
        let catalog = Catalog::default();
        for window in crate::AddedWindow::ALL {
            assert!(catalog.timeframes.iter().any(|t| t == window.label()));
        }
    }
}
