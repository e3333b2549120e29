//! Settings routes - Configuration dump

pub mod api;

pub use api::api_settings;
