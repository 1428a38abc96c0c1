//! SQL policy commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use pgo_msgs::policy::{
    ApplyPolicyRequest, CreatePolicyRequest, DeletePolicyRequest, PolicyDetail, ShowPolicyRequest,
};
use pgo_msgs::Addressing;
use tabled::Tabled;

use crate::api;
use crate::error::CliError;
use crate::output::{or_dash, print_success, print_table};
use crate::session::Session;

use super::{print_lines, render, CommandContext, TargetArgs};

/// Policy commands.
#[derive(Debug, Args)]
pub struct PolicyCommand {
    #[command(subcommand)]
    command: PolicySubcommand,
}

#[derive(Debug, Subcommand)]
enum PolicySubcommand {
    /// Show policies.
    Show(TargetOnlyArgs),

    /// Create a policy from a SQL file or a URL.
    Create(CreateArgs),

    /// Delete policies.
    Delete(TargetOnlyArgs),

    /// Apply policies to the clusters matching a selector.
    Apply(ApplyArgs),
}

#[derive(Debug, Args)]
struct TargetOnlyArgs {
    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Debug, Args)]
struct CreateArgs {
    /// Policy name.
    name: String,

    /// File holding the policy SQL.
    #[arg(long, value_name = "PATH", conflicts_with = "url")]
    in_file: Option<PathBuf>,

    /// URL the server fetches the policy SQL from.
    #[arg(long)]
    url: Option<String>,
}

#[derive(Debug, Args)]
struct ApplyArgs {
    /// Policy names.
    #[arg(required = true)]
    policies: Vec<String>,

    /// Selector for the clusters to apply to.
    #[arg(short, long, required = true)]
    selector: String,

    /// Only report which clusters would be affected.
    #[arg(long)]
    dry_run: bool,
}

impl PolicyCommand {
    pub async fn run(self, ctx: &CommandContext, session: &Session) -> Result<()> {
        match self.command {
            PolicySubcommand::Show(args) => show(ctx, session, args).await,
            PolicySubcommand::Create(args) => create(ctx, session, args).await,
            PolicySubcommand::Delete(args) => delete(ctx, session, args).await,
            PolicySubcommand::Apply(args) => apply(ctx, session, args).await,
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct PolicyRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "SQL")]
    sql: String,
}

impl From<&PolicyDetail> for PolicyRow {
    fn from(detail: &PolicyDetail) -> Self {
        Self {
            name: detail.name.clone(),
            url: or_dash(&detail.url),
            sql: or_dash(detail.sql.lines().next().unwrap_or_default()),
        }
    }
}

async fn show(ctx: &CommandContext, session: &Session, args: TargetOnlyArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    for addressing in args.target.plan(&namespace)? {
        let request = ShowPolicyRequest { addressing };
        let envelope = api::policy::show(session, &request).await?;
        render(ctx.format, &envelope, |result| {
            let rows: Vec<PolicyRow> = result.results.iter().map(PolicyRow::from).collect();
            print_table(&rows);
        })?;
    }
    Ok(())
}

async fn create(ctx: &CommandContext, session: &Session, args: CreateArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;

    let (sql, url) = match (args.in_file, args.url) {
        (Some(path), None) => {
            let sql = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read policy SQL from {:?}", path))?;
            (sql, String::new())
        }
        (None, Some(url)) => (String::new(), url),
        _ => return Err(CliError::usage("Use exactly one of --in-file or --url.").into()),
    };

    let request = CreatePolicyRequest {
        addressing: Addressing::new(namespace).with_names([args.name.clone()]),
        url,
        sql,
    };
    let envelope = api::policy::create(session, &request).await?;
    render(ctx.format, &envelope, |_| {
        print_success(&format!("Created policy {}", args.name));
    })?;
    Ok(())
}

async fn delete(ctx: &CommandContext, session: &Session, args: TargetOnlyArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    for addressing in args.target.plan(&namespace)? {
        let request = DeletePolicyRequest { addressing };
        let envelope = api::policy::delete(session, &request).await?;
        render(ctx.format, &envelope, |result| print_lines(&result.results))?;
    }
    Ok(())
}

async fn apply(ctx: &CommandContext, session: &Session, args: ApplyArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    let target = TargetArgs {
        names: args.policies,
        selector: Some(args.selector),
        all: false,
    };
    let request = ApplyPolicyRequest {
        addressing: target.single(&namespace)?,
        dry_run: args.dry_run,
    };

    let envelope = api::policy::apply(session, &request).await?;
    render(ctx.format, &envelope, |result| {
        let verb = if args.dry_run { "would be applied to" } else { "applied to" };
        if result.clusters.is_empty() {
            println!("No clusters matched the selector.");
        }
        for cluster in &result.clusters {
            println!("policy {verb} {cluster}");
        }
    })?;
    Ok(())
}
