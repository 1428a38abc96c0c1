//! Operator access control: pgo users and pgo roles.
//!
//! These are accounts of the API server itself, not PostgreSQL users.

use serde::{Deserialize, Serialize};

use crate::Addressing;

/// Show or delete pgo users; the explicit names are usernames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PgouserRequest {
    #[serde(flatten)]
    pub addressing: Addressing,
}

/// Create or update one pgo user (the single explicit name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PgouserSpec {
    #[serde(flatten)]
    pub addressing: Addressing,

    #[serde(rename = "PgouserPassword", default, skip_serializing_if = "String::is_empty")]
    pub password: String,

    /// Comma-separated role names.
    #[serde(rename = "PgouserRoles", default, skip_serializing_if = "String::is_empty")]
    pub roles: String,

    /// Comma-separated namespaces the user may act in.
    #[serde(rename = "PgouserNamespaces", default, skip_serializing_if = "String::is_empty")]
    pub namespaces: String,

    #[serde(rename = "AllNamespaces", default)]
    pub all_namespaces: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowPgouserResult {
    #[serde(rename = "UserInfo", default, deserialize_with = "crate::de::nullable")]
    pub users: Vec<PgouserInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgouserInfo {
    #[serde(rename = "Username")]
    pub username: String,

    #[serde(rename = "Role", default, deserialize_with = "crate::de::nullable")]
    pub roles: Vec<String>,

    #[serde(rename = "Namespace", default, deserialize_with = "crate::de::nullable")]
    pub namespaces: Vec<String>,
}

/// Show or delete pgo roles; the explicit names are role names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PgoroleRequest {
    #[serde(flatten)]
    pub addressing: Addressing,
}

/// Create or update one pgo role (the single explicit name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PgoroleSpec {
    #[serde(flatten)]
    pub addressing: Addressing,

    /// Comma-separated permission names.
    #[serde(rename = "PgorolePermissions", default)]
    pub permissions: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowPgoroleResult {
    #[serde(rename = "RoleInfo", default, deserialize_with = "crate::de::nullable")]
    pub roles: Vec<PgoroleInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgoroleInfo {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Permissions")]
    pub permissions: String,
}
