//! pgBouncer connection pooler messages.

use serde::{Deserialize, Serialize};

use crate::{Addressing, ClusterSelection};

/// CPU and memory settings for the pgBouncer pods. Empty means the
/// server default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgbouncerResources {
    #[serde(rename = "CPURequest", default)]
    pub cpu_request: String,

    #[serde(rename = "CPULimit", default)]
    pub cpu_limit: String,

    #[serde(rename = "MemoryRequest", default)]
    pub memory_request: String,

    #[serde(rename = "MemoryLimit", default)]
    pub memory_limit: String,

    /// Zero leaves the replica count to the server.
    #[serde(rename = "Replicas", default)]
    pub replicas: i32,
}

/// Add pgBouncer to the addressed clusters. Sent as `POST /pgbouncer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePgbouncerRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    #[serde(flatten)]
    pub resources: PgbouncerResources,
}

/// Remove pgBouncer from the addressed clusters. Sent as `DELETE /pgbouncer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletePgbouncerRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    /// Also drop the pgbouncer user and every object it owns.
    #[serde(rename = "Uninstall", default)]
    pub uninstall: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowPgbouncerRequest {
    #[serde(flatten)]
    pub selection: ClusterSelection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowPgbouncerResult {
    #[serde(rename = "Results", default, deserialize_with = "crate::de::nullable")]
    pub results: Vec<PgbouncerDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgbouncerDetail {
    #[serde(rename = "ClusterName")]
    pub cluster_name: String,

    #[serde(rename = "HasPgBouncer")]
    pub has_pgbouncer: bool,

    #[serde(rename = "ServiceName")]
    pub service_name: String,

    #[serde(rename = "ServiceClusterIP")]
    pub service_cluster_ip: String,

    #[serde(rename = "ServiceExternalIP")]
    pub service_external_ip: String,

    #[serde(rename = "Username")]
    pub username: String,

    #[serde(rename = "Password")]
    pub password: String,
}

/// Resize pgBouncer or rotate its password. Sent as `PUT /pgbouncer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePgbouncerRequest {
    #[serde(flatten)]
    pub selection: ClusterSelection,

    #[serde(flatten)]
    pub resources: PgbouncerResources,

    #[serde(rename = "RotatePassword", default)]
    pub rotate_password: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePgbouncerResult {
    #[serde(rename = "Results", default, deserialize_with = "crate::de::nullable")]
    pub results: Vec<PgbouncerUpdateDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgbouncerUpdateDetail {
    #[serde(rename = "ClusterName")]
    pub cluster_name: String,

    #[serde(rename = "HasPgBouncer")]
    pub has_pgbouncer: bool,

    #[serde(rename = "Error")]
    pub error: bool,

    #[serde(rename = "ErrorMessage")]
    pub error_message: String,
}
