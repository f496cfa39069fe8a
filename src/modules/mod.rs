pub mod config;
pub mod format;
pub mod logger;
pub mod session;
pub mod token;

pub use config::*;
pub use logger::*;
pub use token::{TokenManager, TokenProvider};
