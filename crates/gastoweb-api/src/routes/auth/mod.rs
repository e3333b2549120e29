//! Auth routes - Demo login and register
//!
//! Nothing is verified against an account store. A valid submit remembers
//! the email and sends the browser on to `/app`.

pub mod api;
pub mod page;

pub use api::{htmx_auth_check, htmx_auth_submit};
pub use page::page_auth;
