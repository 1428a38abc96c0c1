//! pgAdmin web console commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use pgo_msgs::pgadmin::{
    CreatePgadminRequest, DeletePgadminRequest, PgadminDetail, ShowPgadminRequest,
};
use tabled::Tabled;

use crate::api;
use crate::output::{or_dash, print_table};
use crate::session::Session;

use super::{print_lines, render, ClusterTargetArgs, CommandContext};

/// pgAdmin commands.
#[derive(Debug, Args)]
pub struct PgadminCommand {
    #[command(subcommand)]
    command: PgadminSubcommand,
}

#[derive(Debug, Subcommand)]
enum PgadminSubcommand {
    /// Add pgAdmin to clusters.
    Create(CreateArgs),

    /// Remove pgAdmin from clusters.
    Delete(TargetOnlyArgs),

    /// Show pgAdmin details of clusters.
    Show(TargetOnlyArgs),
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[command(flatten)]
    target: ClusterTargetArgs,

    /// Storage configuration for the pgAdmin volume.
    #[arg(long)]
    storage_config: Option<String>,

    /// Size of the pgAdmin volume claim, e.g. 1Gi.
    #[arg(long)]
    pvc_size: Option<String>,
}

#[derive(Debug, Args)]
struct TargetOnlyArgs {
    #[command(flatten)]
    target: ClusterTargetArgs,
}

impl PgadminCommand {
    pub async fn run(self, ctx: &CommandContext, session: &Session) -> Result<()> {
        let namespace = ctx.require_namespace()?;
        match self.command {
            PgadminSubcommand::Create(args) => {
                let request = CreatePgadminRequest {
                    addressing: args.target.addressing(&namespace)?,
                    storage_config: args.storage_config.unwrap_or_default(),
                    pvc_size: args.pvc_size.unwrap_or_default(),
                };
                let envelope = api::pgadmin::create(session, &request).await?;
                render(ctx.format, &envelope, |result| print_lines(&result.results))?;
            }
            PgadminSubcommand::Delete(args) => {
                let request = DeletePgadminRequest {
                    addressing: args.target.addressing(&namespace)?,
                };
                let envelope = api::pgadmin::delete(session, &request).await?;
                render(ctx.format, &envelope, |result| print_lines(&result.results))?;
            }
            PgadminSubcommand::Show(args) => {
                let request = ShowPgadminRequest {
                    selection: args.target.addressing(&namespace)?.into(),
                };
                let envelope = api::pgadmin::show(session, &request).await?;
                render(ctx.format, &envelope, |result| {
                    let rows: Vec<PgadminRow> =
                        result.results.iter().map(PgadminRow::from).collect();
                    print_table(&rows);
                })?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Tabled)]
struct PgadminRow {
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Cluster IP")]
    cluster_ip: String,
    #[tabled(rename = "External IP")]
    external_ip: String,
    #[tabled(rename = "Users")]
    users: String,
}

impl From<&PgadminDetail> for PgadminRow {
    fn from(detail: &PgadminDetail) -> Self {
        let service = if detail.has_pgadmin {
            or_dash(&detail.service_name)
        } else {
            "(not enabled)".to_string()
        };
        Self {
            cluster: detail.cluster_name.clone(),
            service,
            cluster_ip: or_dash(&detail.service_cluster_ip),
            external_ip: or_dash(&detail.service_external_ip),
            users: or_dash(&detail.users.join(",")),
        }
    }
}
