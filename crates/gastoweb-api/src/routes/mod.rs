//! Route modules for the HTTP server
//!
//! Each feature module follows the same layout:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints and HTMX partial responses
//! - page.rs: Full page rendering
//!
//! toast.rs holds the toast slot shared by both screens.

pub mod auth;
pub mod expenses;
pub mod settings;
pub mod toast;
