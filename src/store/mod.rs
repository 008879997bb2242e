//! Observable client-side state
//!
//! Both stores are plain containers built on `tokio::sync::watch`; they are
//! created by the caller and passed to whatever needs them.

mod app;
mod auth;

pub use app::*;
pub use auth::*;
