use serde::{Deserialize, Serialize};

/// Account role as issued by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Academy,
    Temp,
    TempAcademy,
    TempUser,
    Other(String),
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "USER" => Role::User,
            "ACADEMY" => Role::Academy,
            "TEMP" => Role::Temp,
            "TEMP_ACADEMY" => Role::TempAcademy,
            "TEMP_USER" => Role::TempUser,
            _ => Role::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::User => "USER".to_string(),
            Role::Academy => "ACADEMY".to_string(),
            Role::Temp => "TEMP".to_string(),
            Role::TempAcademy => "TEMP_ACADEMY".to_string(),
            Role::TempUser => "TEMP_USER".to_string(),
            Role::Other(raw) => raw,
        }
    }
}

impl Role {
    /// Page a signed-in account lands on
    pub fn landing_path(&self) -> Option<&'static str> {
        match self {
            Role::User => Some("/parent"),
            Role::Academy => Some("/academy"),
            Role::Temp => Some("/signup/role"),
            Role::TempAcademy => Some("/signup/academy/onboarding"),
            Role::TempUser => Some("/signup/parent/onboarding"),
            Role::Other(_) => None,
        }
    }
}

/// Cached user info kept next to the tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
}
