//! Entry-page redirect decision.
//!
//! Mirrors what the landing screen does on mount: an account with cached user
//! info and an access token goes straight to its role's page; an access token
//! alone is decoded for its `role` claim; a lone refresh token means the caller
//! must refresh first and ask again.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value;

use crate::models::{Role, UserInfo};
use crate::modules::token::TokenProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryDecision {
    Redirect(&'static str),
    /// Only a refresh token is present
    RefreshRequired,
    StayOnLanding,
}

/// Read the `role` claim from a JWT access token without verifying it
pub fn role_from_access_token(token: &str) -> Option<Role> {
    let payload = token.split('.').nth(1)?;
    // Some issuers keep the padding
    let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Value = serde_json::from_slice(&decoded).ok()?;
    claims
        .get("role")
        .and_then(|r| r.as_str())
        .map(|r| Role::from(r.to_string()))
}

pub fn decide_entry(
    user_info: Option<&UserInfo>,
    access_token: Option<&str>,
    has_refresh_token: bool,
) -> EntryDecision {
    match (user_info, access_token) {
        (Some(info), Some(_)) => redirect_for(&info.role),
        (None, Some(token)) => match role_from_access_token(token) {
            Some(role) => redirect_for(&role),
            None => EntryDecision::StayOnLanding,
        },
        (_, None) if has_refresh_token => EntryDecision::RefreshRequired,
        _ => EntryDecision::StayOnLanding,
    }
}

/// Same decision, reading state from a token provider
pub fn decide_entry_from(provider: &dyn TokenProvider) -> EntryDecision {
    let user_info = provider.user_info();
    let access_token = provider.access_token();
    decide_entry(
        user_info.as_ref(),
        access_token.as_deref(),
        provider.refresh_token().is_some(),
    )
}

fn redirect_for(role: &Role) -> EntryDecision {
    match role.landing_path() {
        Some(path) => EntryDecision::Redirect(path),
        None => EntryDecision::StayOnLanding,
    }
}
