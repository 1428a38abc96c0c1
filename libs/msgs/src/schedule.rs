//! Scheduled task messages.
//!
//! The cron expression is passed through as-is; the server validates it.

use serde::{Deserialize, Serialize};

use crate::Addressing;

/// What a schedule runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    Pgbackrest,
    Policy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    #[serde(rename = "Name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Five-field cron expression.
    #[serde(rename = "Schedule")]
    pub schedule: String,

    #[serde(rename = "ScheduleType")]
    pub schedule_type: ScheduleType,

    /// `full`, `diff` or `incr` for pgBackRest schedules.
    #[serde(rename = "PGBackRestType", default, skip_serializing_if = "String::is_empty")]
    pub backrest_type: String,

    #[serde(rename = "BackrestStorageType", default, skip_serializing_if = "String::is_empty")]
    pub storage_type: String,

    #[serde(rename = "PolicyName", default, skip_serializing_if = "String::is_empty")]
    pub policy: String,

    #[serde(rename = "Database", default, skip_serializing_if = "String::is_empty")]
    pub database: String,
}

/// Show or delete schedules of the addressed clusters, or one schedule by
/// name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(flatten)]
    pub addressing: Addressing,

    #[serde(rename = "ScheduleName", default, skip_serializing_if = "String::is_empty")]
    pub schedule_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_type_is_lowercase_on_the_wire() {
        let request = CreateScheduleRequest {
            addressing: Addressing::new("pgo").with_names(["hippo"]),
            name: String::new(),
            schedule: "0 1 * * *".to_string(),
            schedule_type: ScheduleType::Pgbackrest,
            backrest_type: "full".to_string(),
            storage_type: String::new(),
            policy: String::new(),
            database: String::new(),
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["ScheduleType"], "pgbackrest");
        assert_eq!(value["Schedule"], "0 1 * * *");
        assert!(value.get("PolicyName").is_none());
    }
}
