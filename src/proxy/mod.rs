// proxy module - API reverse proxy route (/api/proxy)

pub mod config;
pub mod server;

pub mod common;
pub mod handlers; // API endpoint handlers
pub mod middleware; // Axum middleware
pub mod upstream; // Upstream client

pub use config::ProxyConfig;
pub use server::{build_router, AppState, AxumServer};
