pub mod avatar;
pub mod leads;
