//! pgBackRest backup commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use pgo_msgs::backup::{BackrestDetail, CreateBackrestBackupRequest};
use tabled::Tabled;

use crate::api;
use crate::output::{or_dash, print_table};
use crate::session::Session;

use super::{print_lines, render, CommandContext, TargetArgs};

/// Backup commands.
#[derive(Debug, Args)]
pub struct BackupCommand {
    #[command(subcommand)]
    command: BackupSubcommand,
}

#[derive(Debug, Subcommand)]
enum BackupSubcommand {
    /// Start a backup of clusters.
    Create(CreateArgs),

    /// List the backups of clusters.
    Show(ShowArgs),
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Options passed through to pgBackRest, e.g. --type=full.
    #[arg(long, allow_hyphen_values = true)]
    backup_opts: Option<String>,

    /// local, s3, or local,s3.
    #[arg(long)]
    pgbackrest_storage_type: Option<String>,
}

#[derive(Debug, Args)]
struct ShowArgs {
    #[command(flatten)]
    target: TargetArgs,
}

impl BackupCommand {
    pub async fn run(self, ctx: &CommandContext, session: &Session) -> Result<()> {
        match self.command {
            BackupSubcommand::Create(args) => create(ctx, session, args).await,
            BackupSubcommand::Show(args) => show(ctx, session, args).await,
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct BackupRow {
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Storage")]
    storage: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Type")]
    backup_type: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Database Size")]
    database_size: String,
    #[tabled(rename = "Backup Size")]
    backup_size: String,
}

fn backup_rows(details: &[BackrestDetail]) -> Vec<BackupRow> {
    details
        .iter()
        .flat_map(|detail| {
            detail.backups.iter().map(move |backup| BackupRow {
                cluster: detail.name.clone(),
                storage: or_dash(&detail.storage_type),
                label: backup.label.clone(),
                backup_type: backup.backup_type.clone(),
                duration: format!(
                    "{}s",
                    backup.stop_time.saturating_sub(backup.start_time).max(0)
                ),
                database_size: human_size(backup.database_size),
                backup_size: human_size(backup.backup_size),
            })
        })
        .collect()
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes}B")
    } else {
        format!("{value:.1}{}", UNITS[unit])
    }
}

async fn create(ctx: &CommandContext, session: &Session, args: CreateArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    for addressing in args.target.plan(&namespace)? {
        let request = CreateBackrestBackupRequest {
            addressing,
            backup_opts: args.backup_opts.clone().unwrap_or_default(),
            storage_type: args.pgbackrest_storage_type.clone().unwrap_or_default(),
        };
        let envelope = api::backup::create(session, &request).await?;
        render(ctx.format, &envelope, |result| print_lines(&result.results))?;
    }
    Ok(())
}

async fn show(ctx: &CommandContext, session: &Session, args: ShowArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    for addressing in args.target.plan(&namespace)? {
        let name = addressing.names.first().cloned().unwrap_or_default();
        let envelope = api::backup::show(session, &name, &addressing).await?;
        render(ctx.format, &envelope, |result| {
            print_table(&backup_rows(&result.items));
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pgo_msgs::backup::BackrestBackup;

    use super::*;

    #[test]
    fn one_row_per_backup() {
        let details = vec![BackrestDetail {
            name: "hippo".to_string(),
            storage_type: "local".to_string(),
            backups: vec![
                BackrestBackup {
                    label: "20240101-000000F".to_string(),
                    backup_type: "full".to_string(),
                    start_time: 100,
                    stop_time: 160,
                    database_size: 2048,
                    backup_size: 512,
                },
                BackrestBackup {
                    label: "20240102-000000I".to_string(),
                    backup_type: "incr".to_string(),
                    ..Default::default()
                },
            ],
        }];

        let rows = backup_rows(&details);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].duration, "60s");
        assert_eq!(rows[0].database_size, "2.0KiB");
        assert_eq!(rows[0].backup_size, "512B");
        assert_eq!(rows[1].backup_type, "incr");
    }

    #[test]
    fn out_of_range_timestamps_do_not_overflow() {
        let details = vec![BackrestDetail {
            name: "hippo".to_string(),
            backups: vec![
                BackrestBackup {
                    start_time: i64::MIN,
                    stop_time: i64::MAX,
                    ..Default::default()
                },
                BackrestBackup {
                    start_time: i64::MAX,
                    stop_time: i64::MIN,
                    ..Default::default()
                },
            ],
            ..Default::default()
        }];

        let rows = backup_rows(&details);
        assert_eq!(rows[0].duration, format!("{}s", i64::MAX));
        assert_eq!(rows[1].duration, "0s");
    }

    #[test]
    fn sizes_scale_through_units() {
        assert_eq!(human_size(0), "0B");
        assert_eq!(human_size(1536), "1.5KiB");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3.0GiB");
    }
}
