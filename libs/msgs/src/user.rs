//! PostgreSQL user messages. The addressing targets clusters; the user is
//! named separately.

use serde::{Deserialize, Serialize};

use crate::Addressing;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowUserRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    /// Only show users whose passwords expire within this many days.
    #[serde(rename = "Expired", default, skip_serializing_if = "Option::is_none")]
    pub expired_within_days: Option<u32>,

    #[serde(rename = "ShowSystemAccounts", default)]
    pub show_system_accounts: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    #[serde(rename = "Username")]
    pub username: String,

    /// Empty asks the server to generate one.
    #[serde(rename = "Password", default, skip_serializing_if = "String::is_empty")]
    pub password: String,

    #[serde(rename = "PasswordLength", default, skip_serializing_if = "Option::is_none")]
    pub password_length: Option<u32>,

    #[serde(rename = "PasswordAgeDays", default, skip_serializing_if = "Option::is_none")]
    pub valid_days: Option<u32>,

    #[serde(rename = "ManagedUser", default)]
    pub managed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteUserRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    #[serde(rename = "Username")]
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    #[serde(rename = "Username")]
    pub username: String,

    #[serde(rename = "Password", default, skip_serializing_if = "String::is_empty")]
    pub password: String,

    #[serde(rename = "RotatePassword", default)]
    pub rotate_password: bool,

    #[serde(rename = "PasswordAgeDays", default, skip_serializing_if = "Option::is_none")]
    pub valid_days: Option<u32>,

    #[serde(rename = "ExpireUser", default)]
    pub expire: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserResult {
    #[serde(rename = "Results", default, deserialize_with = "crate::de::nullable")]
    pub results: Vec<UserDetail>,
}

/// Per-cluster outcome for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDetail {
    #[serde(rename = "ClusterName")]
    pub cluster_name: String,

    #[serde(rename = "Username")]
    pub username: String,

    #[serde(rename = "Password")]
    pub password: String,

    #[serde(rename = "ValidUntil")]
    pub valid_until: String,

    #[serde(rename = "Error")]
    pub error: bool,

    #[serde(rename = "ErrorMessage")]
    pub error_message: String,
}
