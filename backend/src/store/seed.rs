//! Demo leads loaded at startup when `SEED_DEMO_LEADS` is on.

use chrono::{DateTime, Duration, Utc};

use speakerdrive_shared::{EventDetails, ExtensionType, Lead, UnlockType};

use super::{Store, StoreResult, StoredLead};

fn unsplash(photo: &str) -> String {
    format!(
        "https://images.unsplash.com/{}?w=800&auto=format&fit=crop&q=60&ixlib=rb-4.0.3",
        photo
    )
}

struct LeadSeed {
    id: &'static str,
    name: &'static str,
    focus: &'static str,
    photo: &'static str,
    unlock_type: UnlockType,
    gated_value: &'static str,
    industry: &'static str,
    extension: ExtensionType,
    days_ago: i64,
    linkedin: &'static str,
    purpose: &'static str,
}

impl LeadSeed {
    fn build(self, now: DateTime<Utc>) -> StoredLead {
        StoredLead {
            lead: Lead {
                id: self.id.to_string(),
                name: self.name.to_string(),
                focus: self.focus.to_string(),
                image_url: unsplash(self.photo),
                lead_type: self.unlock_type.lead_type(),
                unlock_type: self.unlock_type,
                unlock_value: None,
                is_unlocked: false,
                industry_category: self.industry.to_string(),
                extension_type: self.extension,
                added_at: now - Duration::days(self.days_ago),
                linkedin_url: Some(self.linkedin.to_string()),
                event_purpose: self.purpose.to_string(),
                detailed_info: None,
                host_organization: None,
                target_audience: None,
                company_size: None,
                location: None,
                event_details: None,
            },
            gated_value: self.gated_value.to_string(),
        }
    }
}

const CROWE_PURPOSE: &str = "Event Name: Crowe Insights Multiplier\n\n\
Target Audience: Executives and industry leaders\n\n\
Event Overview: The Crowe Insights Multiplier event focuses on timely topics for businesses and \
features prominent speakers discussing economic trends, AI developments, and tax impacts.\n\n\
Date researched from available information: September 2024. May recur or include related \
opportunities; see event source.";

const CROWE_DETAILS: &str = "Professional Role:\n\
Tiffany Hiscock serves as the Lead Talent Business Advisor and Assistant Director at Crowe. In this \
role, she focuses on leadership assessment and development, influencing talent strategies that \
align with business goals.\n\n\
Professional Background:\n\
Tiffany has extensive experience in talent development, having previously worked as a Senior \
Assessment & Development Consultant at Vaya Group, with earlier roles at Valtera Corporation and \
Ace Hardware.\n\n\
Influence & Network:\n\
Within her role at Crowe, Tiffany interacts with a network of executives and decision-makers, \
which makes her a useful first contact for speakers engaging with this event.";

/// The demo lead set, with `added_at` relative to `now`.
pub fn demo_leads(now: DateTime<Utc>) -> Vec<StoredLead> {
    let mut david = LeadSeed {
        id: "1",
        name: "David Chen",
        focus: "VP of Engineering at TechCorp",
        photo: "photo-1560250097-0b93528c311a",
        unlock_type: UnlockType::ContactEmail,
        gated_value: "david.chen@techcorp.com",
        industry: "Technology",
        extension: ExtensionType::Com,
        days_ago: 200,
        linkedin: "https://linkedin.com/in/davidchen",
        purpose: "Experienced engineering leader with expertise in AI and cloud infrastructure.",
    }
    .build(now);
    david.lead.company_size = Some("101 - 500".to_string());
    david.lead.location = Some("United States".to_string());

    let mut summit = LeadSeed {
        id: "2",
        name: "Enterprise AI Summit",
        focus: "Enterprise AI Implementation",
        photo: "photo-1551434678-e076c223a692",
        unlock_type: UnlockType::EventUrl,
        gated_value: "https://www.enterpriseaisummit.com/speakers/apply",
        industry: "Technology",
        extension: ExtensionType::Com,
        days_ago: 120,
        linkedin: "https://linkedin.com/company/enterprise-ai-summit",
        purpose: "Premier conference focused on enterprise AI adoption and implementation strategies.",
    }
    .build(now);
    summit.lead.host_organization = Some("Enterprise Tech Forum".to_string());
    summit.lead.target_audience = Some("CTOs, CIOs, Tech Leaders".to_string());
    summit.lead.location = Some("Virtual/Unspecified".to_string());

    let mut sarah = LeadSeed {
        id: "3",
        name: "Sarah Martinez",
        focus: "Chief Innovation Officer at HealthTech Inc",
        photo: "photo-1573497019940-1c28c88b4f3e",
        unlock_type: UnlockType::ContactEmail,
        gated_value: "sarah.martinez@healthtechinc.com",
        industry: "Healthcare",
        extension: ExtensionType::Com,
        days_ago: 20,
        linkedin: "https://linkedin.com/in/sarahmartinez",
        purpose: "Healthcare innovation expert specializing in digital transformation.",
    }
    .build(now);
    sarah.lead.company_size = Some("1000+".to_string());
    sarah.lead.location = Some("Canada".to_string());

    let mut crowe = LeadSeed {
        id: "4",
        name: "Crowe Insights Multiplier",
        focus: "Economic Trends & AI Developments",
        photo: "photo-1551434678-e076c223a692",
        unlock_type: UnlockType::EventUrl,
        gated_value: "https://www.crowe.com/insights/crowe-insights-multiplier",
        industry: "Business",
        extension: ExtensionType::Com,
        days_ago: 3,
        linkedin: "https://linkedin.com/company/crowe",
        purpose: CROWE_PURPOSE,
    }
    .build(now);
    crowe.lead.detailed_info = Some(CROWE_DETAILS.to_string());
    crowe.lead.host_organization = Some("Crowe LLP".to_string());
    crowe.lead.target_audience =
        Some("Business leaders, entrepreneurs, creators, and changemakers".to_string());
    crowe.lead.event_details = Some(EventDetails {
        location: "Chicago, United States".to_string(),
        event_type: "In-person".to_string(),
        format: "Keynotes, panels, workshops".to_string(),
    });

    let mut michael = LeadSeed {
        id: "5",
        name: "Michael Chang",
        focus: "Head of Digital Transformation",
        photo: "photo-1519085360753-af0119f7cbe7",
        unlock_type: UnlockType::ContactEmail,
        gated_value: "michael.chang@changadvisory.com",
        industry: "Consulting",
        extension: ExtensionType::Com,
        days_ago: 500,
        linkedin: "https://linkedin.com/in/michaelchang",
        purpose: "Digital transformation strategist with focus on enterprise modernization.",
    }
    .build(now);
    michael.lead.company_size = Some("501 - 1000".to_string());
    michael.lead.location = Some("United States".to_string());

    let mut fintech = LeadSeed {
        id: "6",
        name: "Global FinTech Forum",
        focus: "Future of Banking",
        photo: "photo-1505373877841-8d25f7d46678",
        unlock_type: UnlockType::EventEmail,
        gated_value: "speakers@globalfintechforum.org",
        industry: "Finance",
        extension: ExtensionType::Org,
        days_ago: 25,
        linkedin: "https://linkedin.com/company/global-fintech-forum",
        purpose: "Annual gathering of financial technology leaders and innovators.",
    }
    .build(now);
    fintech.lead.host_organization = Some("Global FinTech Association".to_string());
    fintech.lead.target_audience = Some("Banking Executives, FinTech Leaders".to_string());
    fintech.lead.location = Some("United Kingdom".to_string());

    vec![david, summit, sarah, crowe, michael, fintech]
}

/// Insert the demo leads that are not already present. Leads whose gated
/// value does not fit their unlock type are skipped with a warning.
pub async fn seed_demo_leads(store: &dyn Store) -> StoreResult<usize> {
    let mut inserted = 0;
    for lead in demo_leads(Utc::now()) {
        if let Err(reason) = lead.validate() {
            tracing::warn!("Skipping demo lead: {}", reason);
            continue;
        }
        if store.insert_lead_if_absent(&lead).await? {
            inserted += 1;
        }
    }
    tracing::info!("Seeded {} demo leads", inserted);
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use speakerdrive_shared::{AddedWindow, UnlockValueKind};

    #[test]
    fn demo_leads_are_valid() {
        for lead in demo_leads(Utc::now()) {
            assert!(lead.validate().is_ok(), "{:?}", lead.validate());
        }
    }

    #[test]
    fn lead_four_unlocks_to_a_url() {
        let leads = demo_leads(Utc::now());
        let crowe = leads.iter().find(|l| l.lead.id == "4").unwrap();
        assert_eq!(crowe.lead.unlock_type, UnlockType::EventUrl);
        assert!(UnlockValueKind::Url.accepts(&crowe.gated_value));
        assert!(!UnlockValueKind::Email.accepts(&crowe.gated_value));
    }

    #[test]
    fn added_windows_cover_the_demo_set() {
        let now = Utc::now();
        let leads = demo_leads(now);
        let in_window = |w: AddedWindow| {
            leads
                .iter()
                .filter(|l| w.contains(l.lead.added_at, now))
                .count()
        };
        assert_eq!(in_window(AddedWindow::LastWeek), 1);
        assert_eq!(in_window(AddedWindow::Older), 1);
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemoryStore::new();
        assert_eq!(seed_demo_leads(&store).await.unwrap(), 6);
        assert_eq!(seed_demo_leads(&store).await.unwrap(), 0);
        assert_eq!(store.list_leads().await.unwrap().len(), 6);
    }
}
