pub mod config;
pub mod leads;
pub mod store;
