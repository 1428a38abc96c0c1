//! PostgreSQL cluster messages.

use serde::{Deserialize, Serialize};

use crate::Addressing;

/// Show one or more clusters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowClusterRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    /// Only show clusters running this image tag.
    #[serde(rename = "Ccpimagetag", default)]
    pub image_tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowClusterResult {
    #[serde(rename = "Results", default, deserialize_with = "crate::de::nullable")]
    pub results: Vec<ClusterDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterDetail {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Namespace")]
    pub namespace: String,

    #[serde(rename = "ImageTag")]
    pub image_tag: String,

    #[serde(rename = "Pods", default, deserialize_with = "crate::de::nullable")]
    pub pods: Vec<ClusterPod>,

    #[serde(rename = "Services", default, deserialize_with = "crate::de::nullable")]
    pub services: Vec<ClusterService>,

    #[serde(rename = "Labels", default, deserialize_with = "crate::de::nullable")]
    pub labels: std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterPod {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Phase")]
    pub phase: String,

    #[serde(rename = "NodeName")]
    pub node_name: String,

    #[serde(rename = "Ready")]
    pub ready: bool,

    /// primary, replica, pgbouncer, pgbackrest, ...
    #[serde(rename = "Type")]
    pub pod_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterService {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "ClusterIP")]
    pub cluster_ip: String,

    #[serde(rename = "ExternalIP")]
    pub external_ip: String,
}

/// Create a cluster. The single explicit name is the new cluster's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateClusterRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    #[serde(rename = "ReplicaCount", default)]
    pub replica_count: u32,

    #[serde(rename = "CCPImageTag", default, skip_serializing_if = "String::is_empty")]
    pub image_tag: String,

    /// Comma-separated policy names applied at creation.
    #[serde(rename = "Policies", default, skip_serializing_if = "String::is_empty")]
    pub policies: String,

    #[serde(rename = "UserLabels", default, skip_serializing_if = "String::is_empty")]
    pub labels: String,

    #[serde(rename = "Database", default, skip_serializing_if = "String::is_empty")]
    pub database: String,

    #[serde(rename = "Username", default, skip_serializing_if = "String::is_empty")]
    pub username: String,

    #[serde(rename = "PVCSize", default, skip_serializing_if = "String::is_empty")]
    pub pvc_size: String,

    #[serde(rename = "AutofailFlag", default)]
    pub autofail: bool,

    #[serde(rename = "MetricsFlag", default)]
    pub metrics: bool,

    #[serde(rename = "PgbouncerFlag", default)]
    pub pgbouncer: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateClusterResult {
    #[serde(rename = "Result", alias = "result", default, deserialize_with = "crate::de::nullable")]
    pub result: CreateClusterDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateClusterDetail {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Database")]
    pub database: String,

    #[serde(rename = "Users", default, deserialize_with = "crate::de::nullable")]
    pub users: Vec<CreateClusterUser>,

    #[serde(rename = "WorkflowID")]
    pub workflow_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateClusterUser {
    #[serde(rename = "Username")]
    pub username: String,

    /// May be empty depending on what the server is allowed to return.
    #[serde(rename = "Password")]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteClusterRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    #[serde(rename = "DeleteData", default)]
    pub delete_data: bool,

    #[serde(rename = "DeleteBackups", default)]
    pub delete_backups: bool,
}

/// Toggle for a cluster setting in an update; `DoNothing` leaves it alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateToggle {
    #[default]
    DoNothing,
    Enable,
    Disable,
}

impl UpdateToggle {
    /// Map a pair of mutually exclusive enable/disable flags.
    pub fn from_flags(enable: bool, disable: bool) -> Self {
        match (enable, disable) {
            (true, false) => Self::Enable,
            (false, true) => Self::Disable,
            _ => Self::DoNothing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateClusterRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    #[serde(rename = "Autofail", default)]
    pub autofail: UpdateToggle,

    #[serde(rename = "Startup", default)]
    pub startup: bool,

    #[serde(rename = "Shutdown", default)]
    pub shutdown: bool,
}

/// Test connectivity of every endpoint of the addressed clusters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestClusterRequest {
    #[serde(flatten)]
    pub addressing: Addressing,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestClusterResult {
    #[serde(rename = "Results", default, deserialize_with = "crate::de::nullable")]
    pub results: Vec<ClusterTestDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterTestDetail {
    #[serde(rename = "ClusterName")]
    pub cluster_name: String,

    #[serde(rename = "Endpoints", default, deserialize_with = "crate::de::nullable")]
    pub endpoints: Vec<ClusterTestEndpoint>,
}

impl ClusterTestDetail {
    pub fn all_available(&self) -> bool {
        self.endpoints.iter().all(|endpoint| endpoint.available)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterTestEndpoint {
    #[serde(rename = "InstanceType")]
    pub instance_type: String,

    #[serde(rename = "Message")]
    pub message: String,

    #[serde(rename = "Available")]
    pub available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResponseEnvelope;

    #[test]
    fn show_request_flattens_addressing() {
        let request = ShowClusterRequest {
            addressing: Addressing::new("pgo").with_names(["hippo"]),
            image_tag: String::new(),
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["Args"], serde_json::json!(["hippo"]));
        assert_eq!(value["Namespace"], "pgo");
        assert!(value.get("addressing").is_none());
    }

    #[test]
    fn show_result_tolerates_sparse_details() {
        let body = r#"{"Status":{"Code":"ok"},"Results":[{"Name":"hippo","Pods":[{"Name":"hippo-0","Ready":true}]}]}"#;
        let envelope: ResponseEnvelope<ShowClusterResult> = serde_json::from_str(body).unwrap();
        let result = envelope.into_result().unwrap();

        assert_eq!(result.results[0].name, "hippo");
        assert!(result.results[0].pods[0].ready);
        assert!(result.results[0].services.is_empty());
    }

    #[test]
    fn update_toggle_from_flags() {
        assert_eq!(UpdateToggle::from_flags(true, false), UpdateToggle::Enable);
        assert_eq!(UpdateToggle::from_flags(false, true), UpdateToggle::Disable);
        assert_eq!(UpdateToggle::from_flags(false, false), UpdateToggle::DoNothing);
    }

    #[test]
    fn create_result_accepts_lowercase_result_key() {
        let body = r#"{"status":{"code":"ok"},"result":{"Name":"hippo","Users":[{"Username":"testuser","Password":"pw"}]}}"#;
        let envelope: ResponseEnvelope<CreateClusterResult> = serde_json::from_str(body).unwrap();

        assert_eq!(envelope.payload.result.users[0].username, "testuser");
    }
}
