//! pgBouncer connection pooler commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use pgo_msgs::pgbouncer::{
    CreatePgbouncerRequest, DeletePgbouncerRequest, PgbouncerDetail, PgbouncerResources,
    PgbouncerUpdateDetail, ShowPgbouncerRequest, UpdatePgbouncerRequest,
};
use tabled::Tabled;

use crate::api;
use crate::output::{or_dash, print_table, print_warning};
use crate::session::Session;

use super::{print_lines, render, ClusterTargetArgs, CommandContext};

/// pgBouncer commands.
#[derive(Debug, Args)]
pub struct PgbouncerCommand {
    #[command(subcommand)]
    command: PgbouncerSubcommand,
}

#[derive(Debug, Subcommand)]
enum PgbouncerSubcommand {
    /// Add pgBouncer to clusters.
    Create(CreateArgs),

    /// Remove pgBouncer from clusters.
    Delete(DeleteArgs),

    /// Show pgBouncer details of clusters.
    Show(ShowArgs),

    /// Resize pgBouncer or rotate its password.
    Update(UpdateArgs),
}

#[derive(Debug, Clone, Default, Args)]
struct ResourceArgs {
    /// Millicores of CPU to request.
    #[arg(long)]
    cpu: Option<String>,

    /// Millicores of CPU to limit to.
    #[arg(long)]
    cpu_limit: Option<String>,

    /// Memory to request, e.g. 128Mi.
    #[arg(long)]
    memory: Option<String>,

    /// Memory to limit to.
    #[arg(long)]
    memory_limit: Option<String>,

    /// Number of pgBouncer pods; the server default applies when unset.
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..))]
    replicas: Option<i32>,
}

impl From<ResourceArgs> for PgbouncerResources {
    fn from(args: ResourceArgs) -> Self {
        Self {
            cpu_request: args.cpu.unwrap_or_default(),
            cpu_limit: args.cpu_limit.unwrap_or_default(),
            memory_request: args.memory.unwrap_or_default(),
            memory_limit: args.memory_limit.unwrap_or_default(),
            replicas: args.replicas.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[command(flatten)]
    target: ClusterTargetArgs,

    #[command(flatten)]
    resources: ResourceArgs,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    #[command(flatten)]
    target: ClusterTargetArgs,

    /// Also remove the pgbouncer user and the objects it owns.
    #[arg(long)]
    uninstall: bool,
}

#[derive(Debug, Args)]
struct ShowArgs {
    #[command(flatten)]
    target: ClusterTargetArgs,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    #[command(flatten)]
    target: ClusterTargetArgs,

    #[command(flatten)]
    resources: ResourceArgs,

    /// Rotate the pgBouncer service account password.
    #[arg(long)]
    rotate_password: bool,
}

impl PgbouncerCommand {
    pub async fn run(self, ctx: &CommandContext, session: &Session) -> Result<()> {
        let namespace = ctx.require_namespace()?;
        match self.command {
            PgbouncerSubcommand::Create(args) => {
                let request = CreatePgbouncerRequest {
                    addressing: args.target.addressing(&namespace)?,
                    resources: args.resources.into(),
                };
                let envelope = api::pgbouncer::create(session, &request).await?;
                render(ctx.format, &envelope, |result| print_lines(&result.results))?;
            }
            PgbouncerSubcommand::Delete(args) => {
                let request = DeletePgbouncerRequest {
                    addressing: args.target.addressing(&namespace)?,
                    uninstall: args.uninstall,
                };
                let envelope = api::pgbouncer::delete(session, &request).await?;
                render(ctx.format, &envelope, |result| print_lines(&result.results))?;
            }
            PgbouncerSubcommand::Show(args) => {
                let request = ShowPgbouncerRequest {
                    selection: args.target.addressing(&namespace)?.into(),
                };
                let envelope = api::pgbouncer::show(session, &request).await?;
                render(ctx.format, &envelope, |result| {
                    let rows: Vec<PgbouncerRow> =
                        result.results.iter().map(PgbouncerRow::from).collect();
                    print_table(&rows);
                })?;
            }
            PgbouncerSubcommand::Update(args) => {
                let request = UpdatePgbouncerRequest {
                    selection: args.target.addressing(&namespace)?.into(),
                    resources: args.resources.into(),
                    rotate_password: args.rotate_password,
                };
                let envelope = api::pgbouncer::update(session, &request).await?;
                render(ctx.format, &envelope, |result| print_updates(&result.results))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Tabled)]
struct PgbouncerRow {
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Password")]
    password: String,
    #[tabled(rename = "Cluster IP")]
    cluster_ip: String,
    #[tabled(rename = "External IP")]
    external_ip: String,
}

impl From<&PgbouncerDetail> for PgbouncerRow {
    fn from(detail: &PgbouncerDetail) -> Self {
        if !detail.has_pgbouncer {
            return Self {
                cluster: detail.cluster_name.clone(),
                service: "(not enabled)".to_string(),
                username: "-".to_string(),
                password: "-".to_string(),
                cluster_ip: "-".to_string(),
                external_ip: "-".to_string(),
            };
        }
        Self {
            cluster: detail.cluster_name.clone(),
            service: or_dash(&detail.service_name),
            username: or_dash(&detail.username),
            password: or_dash(&detail.password),
            cluster_ip: or_dash(&detail.service_cluster_ip),
            external_ip: or_dash(&detail.service_external_ip),
        }
    }
}

fn print_updates(details: &[PgbouncerUpdateDetail]) {
    for detail in details {
        if detail.error {
            print_warning(&format!("{}: {}", detail.cluster_name, detail.error_message));
        } else if !detail.has_pgbouncer {
            println!("{}: pgBouncer is not enabled", detail.cluster_name);
        } else {
            println!("{}: pgBouncer updated", detail.cluster_name);
        }
    }
}
