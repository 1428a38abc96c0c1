//! Cluster commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use pgo_msgs::cluster::{
    ClusterDetail, ClusterTestDetail, CreateClusterRequest, DeleteClusterRequest,
    ShowClusterRequest, TestClusterRequest, UpdateClusterRequest, UpdateToggle,
};
use pgo_msgs::Addressing;
use tabled::Tabled;

use crate::api;
use crate::error::CliError;
use crate::output::{or_dash, print_success, print_table, print_warning};
use crate::session::Session;

use super::{print_lines, render, CommandContext, TargetArgs};

/// Cluster commands.
#[derive(Debug, Args)]
pub struct ClusterCommand {
    #[command(subcommand)]
    command: ClusterSubcommand,
}

#[derive(Debug, Subcommand)]
enum ClusterSubcommand {
    /// Show clusters.
    Show(ShowArgs),

    /// Create a cluster.
    Create(CreateArgs),

    /// Delete clusters.
    Delete(DeleteArgs),

    /// Update cluster settings, or start and stop clusters.
    Update(UpdateArgs),

    /// Test connectivity to every endpoint of the clusters.
    Test(TargetOnlyArgs),
}

#[derive(Debug, Args)]
struct ShowArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Only clusters running this image tag.
    #[arg(long)]
    ccp_image_tag: Option<String>,
}

#[derive(Debug, Args)]
struct CreateArgs {
    /// Name of the new cluster.
    name: String,

    /// Number of replicas to create alongside the primary.
    #[arg(long, default_value_t = 0)]
    replica_count: u32,

    /// Container image tag.
    #[arg(long)]
    ccp_image_tag: Option<String>,

    /// Comma-separated policies to apply after creation.
    #[arg(long)]
    policies: Option<String>,

    /// Comma-separated key=value labels.
    #[arg(long)]
    labels: Option<String>,

    /// Initial database name.
    #[arg(long)]
    database: Option<String>,

    /// Initial database user.
    #[arg(long)]
    username: Option<String>,

    /// Size of the data volume, e.g. 10Gi.
    #[arg(long)]
    pvc_size: Option<String>,

    /// Enable automated failover.
    #[arg(long)]
    autofail: bool,

    /// Deploy the metrics sidecar.
    #[arg(long)]
    metrics: bool,

    /// Deploy a pgBouncer connection pooler.
    #[arg(long)]
    pgbouncer: bool,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Also delete the data volumes.
    #[arg(long)]
    delete_data: bool,

    /// Also delete the backups.
    #[arg(long)]
    delete_backups: bool,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Turn automated failover on.
    #[arg(long, conflicts_with = "disable_autofail")]
    enable_autofail: bool,

    /// Turn automated failover off.
    #[arg(long)]
    disable_autofail: bool,

    /// Start a shut-down cluster.
    #[arg(long, conflicts_with = "shutdown")]
    startup: bool,

    /// Shut the cluster down, keeping its data.
    #[arg(long)]
    shutdown: bool,
}

#[derive(Debug, Args)]
struct TargetOnlyArgs {
    #[command(flatten)]
    target: TargetArgs,
}

impl ClusterCommand {
    pub async fn run(self, ctx: &CommandContext, session: &Session) -> Result<()> {
        match self.command {
            ClusterSubcommand::Show(args) => show(ctx, session, args).await,
            ClusterSubcommand::Create(args) => create(ctx, session, args).await,
            ClusterSubcommand::Delete(args) => delete(ctx, session, args).await,
            ClusterSubcommand::Update(args) => update(ctx, session, args).await,
            ClusterSubcommand::Test(args) => test(ctx, session, args).await,
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct ClusterRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Image")]
    image_tag: String,
    #[tabled(rename = "Ready")]
    ready: String,
    #[tabled(rename = "Services")]
    services: String,
}

impl From<&ClusterDetail> for ClusterRow {
    fn from(detail: &ClusterDetail) -> Self {
        let ready = detail.pods.iter().filter(|pod| pod.ready).count();
        Self {
            name: detail.name.clone(),
            namespace: detail.namespace.clone(),
            image_tag: or_dash(&detail.image_tag),
            ready: format!("{}/{}", ready, detail.pods.len()),
            services: or_dash(
                &detail
                    .services
                    .iter()
                    .map(|service| format!("{} ({})", service.name, service.cluster_ip))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct EndpointRow {
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Instance")]
    instance: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Message")]
    message: String,
}

fn endpoint_rows(detail: &ClusterTestDetail) -> Vec<EndpointRow> {
    detail
        .endpoints
        .iter()
        .map(|endpoint| EndpointRow {
            cluster: detail.cluster_name.clone(),
            instance: endpoint.instance_type.clone(),
            status: if endpoint.available { "UP" } else { "DOWN" },
            message: or_dash(&endpoint.message),
        })
        .collect()
}

async fn show(ctx: &CommandContext, session: &Session, args: ShowArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    for addressing in args.target.plan(&namespace)? {
        let request = ShowClusterRequest {
            addressing,
            image_tag: args.ccp_image_tag.clone().unwrap_or_default(),
        };
        let envelope = api::cluster::show(session, &request).await?;
        render(ctx.format, &envelope, |result| {
            let rows: Vec<ClusterRow> = result.results.iter().map(ClusterRow::from).collect();
            print_table(&rows);
        })?;
    }
    Ok(())
}

async fn create(ctx: &CommandContext, session: &Session, args: CreateArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    if args.name.trim().is_empty() {
        return Err(CliError::usage("Cluster name must not be empty.").into());
    }

    let request = CreateClusterRequest {
        addressing: Addressing::new(namespace).with_names([args.name.clone()]),
        replica_count: args.replica_count,
        image_tag: args.ccp_image_tag.unwrap_or_default(),
        policies: args.policies.unwrap_or_default(),
        labels: args.labels.unwrap_or_default(),
        database: args.database.unwrap_or_default(),
        username: args.username.unwrap_or_default(),
        pvc_size: args.pvc_size.unwrap_or_default(),
        autofail: args.autofail,
        metrics: args.metrics,
        pgbouncer: args.pgbouncer,
    };

    let envelope = api::cluster::create(session, &request).await?;
    render(ctx.format, &envelope, |result| {
        let detail = &result.result;
        print_success(&format!("Created cluster {}", or_dash(&detail.name)));
        if !detail.workflow_id.is_empty() {
            println!("workflow id: {}", detail.workflow_id);
        }
        if !detail.database.is_empty() {
            println!("database name: {}", detail.database);
        }
        for user in &detail.users {
            println!("user: {}", user.username);
            if !user.password.is_empty() {
                println!("password: {}", user.password);
            }
        }
    })?;
    Ok(())
}

async fn delete(ctx: &CommandContext, session: &Session, args: DeleteArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    for addressing in args.target.plan(&namespace)? {
        let request = DeleteClusterRequest {
            addressing,
            delete_data: args.delete_data,
            delete_backups: args.delete_backups,
        };
        let envelope = api::cluster::delete(session, &request).await?;
        render(ctx.format, &envelope, |result| print_lines(&result.results))?;
    }
    Ok(())
}

async fn update(ctx: &CommandContext, session: &Session, args: UpdateArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    let autofail = UpdateToggle::from_flags(args.enable_autofail, args.disable_autofail);
    if autofail == UpdateToggle::DoNothing && !args.startup && !args.shutdown {
        return Err(CliError::usage(
            "Nothing to update. Use --enable-autofail, --disable-autofail, --startup or --shutdown.",
        )
        .into());
    }

    for addressing in args.target.plan(&namespace)? {
        let request = UpdateClusterRequest {
            addressing,
            autofail,
            startup: args.startup,
            shutdown: args.shutdown,
        };
        let envelope = api::cluster::update(session, &request).await?;
        render(ctx.format, &envelope, |result| print_lines(&result.results))?;
    }
    Ok(())
}

async fn test(ctx: &CommandContext, session: &Session, args: TargetOnlyArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    for addressing in args.target.plan(&namespace)? {
        let request = TestClusterRequest { addressing };
        let envelope = api::cluster::test(session, &request).await?;
        render(ctx.format, &envelope, |result| {
            let rows: Vec<EndpointRow> = result.results.iter().flat_map(endpoint_rows).collect();
            print_table(&rows);
            for detail in result.results.iter().filter(|detail| !detail.all_available()) {
                print_warning(&format!("{} has unavailable endpoints", detail.cluster_name));
            }
        })?;
    }
    Ok(())
}
