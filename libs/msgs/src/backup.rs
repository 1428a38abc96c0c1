//! pgBackRest backup messages.

use serde::{Deserialize, Serialize};

use crate::Addressing;

/// Start a backup of each addressed cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBackrestBackupRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    /// Extra options passed through to pgBackRest, e.g. `--type=full`.
    #[serde(rename = "BackupOpts", default, skip_serializing_if = "String::is_empty")]
    pub backup_opts: String,

    /// `local`, `s3`, or `local,s3`.
    #[serde(rename = "BackrestStorageType", default, skip_serializing_if = "String::is_empty")]
    pub storage_type: String,
}

/// Payload of the backup listing, fetched with a query-string GET.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowBackrestResult {
    #[serde(rename = "Items", default, deserialize_with = "crate::de::nullable")]
    pub items: Vec<BackrestDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackrestDetail {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "StorageType")]
    pub storage_type: String,

    #[serde(rename = "Backups", default, deserialize_with = "crate::de::nullable")]
    pub backups: Vec<BackrestBackup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackrestBackup {
    #[serde(rename = "Label")]
    pub label: String,

    /// `full`, `diff` or `incr`.
    #[serde(rename = "Type")]
    pub backup_type: String,

    /// Unix seconds.
    #[serde(rename = "StartTime")]
    pub start_time: i64,

    #[serde(rename = "StopTime")]
    pub stop_time: i64,

    #[serde(rename = "DatabaseSize")]
    pub database_size: u64,

    #[serde(rename = "BackupSize")]
    pub backup_size: u64,
}
