//! Auth service DTOs
//!
//! The auth API wraps every answer in the same envelope; field names are
//! camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Envelope returned by every auth endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<AuthData>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub requires_verification: Option<bool>,
}

impl AuthResponse {
    pub fn access_token(&self) -> Option<&str> {
        self.data.as_ref()?.access_token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.data.as_ref()?.user.as_ref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.data.as_ref()?.profile.as_ref()
    }

    /// Human-readable outcome: the error if present, else the message
    pub fn summary(&self) -> &str {
        self.error.as_deref().unwrap_or(&self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub profile: Option<Profile>,
}

/// User record as returned on login / verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Profile record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// Partial profile update; unset fields are not sent
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}
