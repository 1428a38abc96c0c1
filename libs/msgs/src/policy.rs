//! SQL policy messages.

use serde::{Deserialize, Serialize};

use crate::Addressing;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowPolicyRequest {
    #[serde(flatten)]
    pub addressing: Addressing,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowPolicyResult {
    #[serde(rename = "Results", default, deserialize_with = "crate::de::nullable")]
    pub results: Vec<PolicyDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyDetail {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "SQL")]
    pub sql: String,
}

/// Create a policy from inline SQL or a URL. The single explicit name is
/// the policy name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePolicyRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    #[serde(rename = "URL", default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(rename = "SQL", default, skip_serializing_if = "String::is_empty")]
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletePolicyRequest {
    #[serde(flatten)]
    pub addressing: Addressing,
}

/// Apply the named policies to the clusters matched by the selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyPolicyRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    #[serde(rename = "DryRun", default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplyPolicyResult {
    /// Names of the clusters the policies were (or would be) applied to.
    #[serde(rename = "Name", alias = "Names", default, deserialize_with = "crate::de::nullable")]
    pub clusters: Vec<String>,
}
