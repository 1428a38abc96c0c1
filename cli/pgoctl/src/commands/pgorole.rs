//! API server role commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use pgo_msgs::access::{PgoroleInfo, PgoroleRequest, PgoroleSpec};
use pgo_msgs::Addressing;
use tabled::Tabled;

use crate::api;
use crate::output::{or_dash, print_table};
use crate::session::Session;

use super::{print_lines, render, CommandContext, TargetArgs};

/// pgo role commands.
#[derive(Debug, Args)]
pub struct PgoroleCommand {
    #[command(subcommand)]
    command: PgoroleSubcommand,
}

#[derive(Debug, Subcommand)]
enum PgoroleSubcommand {
    /// Show pgo roles.
    Show(TargetOnlyArgs),

    /// Create a pgo role.
    Create(SpecArgs),

    /// Delete pgo roles.
    Delete(TargetOnlyArgs),

    /// Replace a pgo role's permissions.
    Update(SpecArgs),
}

#[derive(Debug, Args)]
struct TargetOnlyArgs {
    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Debug, Args)]
struct SpecArgs {
    /// Role name.
    name: String,

    /// Comma-separated permissions, e.g. ShowCluster,CreateBackup.
    #[arg(long, required = true)]
    permissions: String,
}

impl PgoroleCommand {
    pub async fn run(self, ctx: &CommandContext, session: &Session) -> Result<()> {
        let namespace = ctx.resolve_namespace().unwrap_or_default();
        match self.command {
            PgoroleSubcommand::Show(args) => {
                let request = PgoroleRequest {
                    addressing: args.target.single(&namespace)?,
                };
                let envelope = api::access::show_pgoroles(session, &request).await?;
                render(ctx.format, &envelope, |result| {
                    let rows: Vec<PgoroleRow> =
                        result.roles.iter().map(PgoroleRow::from).collect();
                    print_table(&rows);
                })?;
            }
            PgoroleSubcommand::Create(args) => {
                let envelope = api::access::create_pgorole(session, &args.into_spec(&namespace)).await?;
                render(ctx.format, &envelope, |result| print_lines(&result.results))?;
            }
            PgoroleSubcommand::Delete(args) => {
                let request = PgoroleRequest {
                    addressing: args.target.single(&namespace)?,
                };
                let envelope = api::access::delete_pgoroles(session, &request).await?;
                render(ctx.format, &envelope, |result| print_lines(&result.results))?;
            }
            PgoroleSubcommand::Update(args) => {
                let envelope = api::access::update_pgorole(session, &args.into_spec(&namespace)).await?;
                render(ctx.format, &envelope, |result| print_lines(&result.results))?;
            }
        }
        Ok(())
    }
}

impl SpecArgs {
    fn into_spec(self, namespace: &str) -> PgoroleSpec {
        PgoroleSpec {
            addressing: Addressing::new(namespace).with_names([self.name]),
            permissions: self.permissions,
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct PgoroleRow {
    #[tabled(rename = "Role")]
    name: String,
    #[tabled(rename = "Permissions")]
    permissions: String,
}

impl From<&PgoroleInfo> for PgoroleRow {
    fn from(info: &PgoroleInfo) -> Self {
        Self {
            name: info.name.clone(),
            permissions: or_dash(&info.permissions),
        }
    }
}
