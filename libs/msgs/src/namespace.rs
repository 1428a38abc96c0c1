//! Namespace messages.
//!
//! Namespace operations address namespaces by name through the same
//! `Args` list; the `Namespace` field is the caller's current namespace.

use serde::{Deserialize, Serialize};

use crate::Addressing;

/// Request shared by show, create, delete and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceRequest {
    #[serde(flatten)]
    pub addressing: Addressing,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowNamespaceResult {
    /// The user the server evaluated access for.
    #[serde(rename = "Username", default)]
    pub username: String,

    #[serde(rename = "Results", default, deserialize_with = "crate::de::nullable")]
    pub results: Vec<NamespaceDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceDetail {
    #[serde(rename = "Namespace")]
    pub namespace: String,

    /// The operator is installed to manage this namespace.
    #[serde(rename = "InstallationAccess")]
    pub installation_access: bool,

    /// The requesting user may operate in this namespace.
    #[serde(rename = "UserAccess")]
    pub user_access: bool,
}
