//! pgAdmin web console messages.

use serde::{Deserialize, Serialize};

use crate::{Addressing, ClusterSelection};

/// Add pgAdmin to the addressed clusters. Sent as `POST /pgadmin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePgadminRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    /// Named storage configuration for the pgAdmin volume.
    #[serde(rename = "StorageConfig", default, skip_serializing_if = "String::is_empty")]
    pub storage_config: String,

    #[serde(rename = "PVCSize", default, skip_serializing_if = "String::is_empty")]
    pub pvc_size: String,
}

/// Remove pgAdmin from the addressed clusters. Sent as `DELETE /pgadmin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletePgadminRequest {
    #[serde(flatten)]
    pub addressing: Addressing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowPgadminRequest {
    #[serde(flatten)]
    pub selection: ClusterSelection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowPgadminResult {
    #[serde(rename = "Results", default, deserialize_with = "crate::de::nullable")]
    pub results: Vec<PgadminDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgadminDetail {
    #[serde(rename = "ClusterName")]
    pub cluster_name: String,

    #[serde(rename = "HasPgAdmin")]
    pub has_pgadmin: bool,

    #[serde(rename = "ServiceName")]
    pub service_name: String,

    #[serde(rename = "ServiceClusterIP")]
    pub service_cluster_ip: String,

    #[serde(rename = "ServiceExternalIP")]
    pub service_external_ip: String,

    /// Database users synced into pgAdmin.
    #[serde(rename = "Users", deserialize_with = "crate::de::nullable")]
    pub users: Vec<String>,
}
