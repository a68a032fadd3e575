pub mod contact_finder;
pub mod dashboard;
pub mod lead_details;
pub mod leads;
pub mod onboarding;
pub mod settings;
pub mod smart_tools;
