pub mod api_auth;
pub mod api_integrations;
pub mod api_leads;
pub mod api_profile;
