pub mod client;

pub use client::{RelayedResponse, UpstreamClient};
