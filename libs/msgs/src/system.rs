//! Server-wide queries: version and namespace status.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionResult {
    #[serde(rename = "Version", default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusResult {
    #[serde(rename = "Result", default, deserialize_with = "crate::de::nullable")]
    pub result: StatusDetail,
}

/// Aggregate figures for one namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusDetail {
    #[serde(rename = "OperatorStartTime")]
    pub operator_start_time: String,

    #[serde(rename = "NumDatabases")]
    pub num_databases: u64,

    #[serde(rename = "NumClaims")]
    pub num_claims: u64,

    #[serde(rename = "VolumeCap")]
    pub volume_cap: String,

    /// Image tag to number of databases running it.
    #[serde(rename = "DbTags", default, deserialize_with = "crate::de::nullable")]
    pub db_tags: BTreeMap<String, u64>,

    /// Pods that are not ready.
    #[serde(rename = "NotReady", default, deserialize_with = "crate::de::nullable")]
    pub not_ready: Vec<String>,
}
