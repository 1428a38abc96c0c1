//! Namespace commands.
//!
//! Namespaces are addressed by name through the same argument list as
//! other resources, and every name goes out in a single request.

use anyhow::Result;
use clap::{Args, Subcommand};
use pgo_msgs::namespace::{NamespaceDetail, NamespaceRequest};
use tabled::Tabled;

use crate::api;
use crate::output::print_table;
use crate::session::Session;

use super::{print_lines, render, CommandContext, TargetArgs};

/// Namespace commands.
#[derive(Debug, Args)]
pub struct NamespaceCommand {
    #[command(subcommand)]
    command: NamespaceSubcommand,
}

#[derive(Debug, Subcommand)]
enum NamespaceSubcommand {
    /// Show namespaces and your access to them.
    Show(ShowArgs),

    /// Add namespaces for the Operator to manage.
    Create(NamesArgs),

    /// Remove namespaces from the Operator.
    Delete(NamesArgs),

    /// Refresh Operator resources in namespaces.
    Update(NamesArgs),
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Namespace names.
    names: Vec<String>,

    /// Every namespace the Operator knows about.
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Args)]
struct NamesArgs {
    /// Namespace names.
    #[arg(required = true)]
    names: Vec<String>,
}

impl NamespaceCommand {
    pub async fn run(self, ctx: &CommandContext, session: &Session) -> Result<()> {
        match self.command {
            NamespaceSubcommand::Show(args) => show(ctx, session, args).await,
            NamespaceSubcommand::Create(args) => {
                let request = request(ctx, &args.names)?;
                let envelope = api::namespace::create(session, &request).await?;
                render(ctx.format, &envelope, |result| print_lines(&result.results))?;
                Ok(())
            }
            NamespaceSubcommand::Delete(args) => {
                let request = request(ctx, &args.names)?;
                let envelope = api::namespace::delete(session, &request).await?;
                render(ctx.format, &envelope, |result| print_lines(&result.results))?;
                Ok(())
            }
            NamespaceSubcommand::Update(args) => {
                let request = request(ctx, &args.names)?;
                let envelope = api::namespace::update(session, &request).await?;
                render(ctx.format, &envelope, |result| print_lines(&result.results))?;
                Ok(())
            }
        }
    }
}

/// The current namespace is optional here; the targets are the names.
fn request(ctx: &CommandContext, names: &[String]) -> Result<NamespaceRequest> {
    let target = TargetArgs {
        names: names.to_vec(),
        selector: None,
        all: false,
    };
    let addressing = target.single(&ctx.resolve_namespace().unwrap_or_default())?;
    Ok(NamespaceRequest { addressing })
}

#[derive(Debug, Clone, Tabled)]
struct NamespaceRow {
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Operator Access")]
    installation_access: &'static str,
    #[tabled(rename = "Your Access")]
    user_access: &'static str,
}

fn access(granted: bool) -> &'static str {
    if granted {
        "accessible"
    } else {
        "no access"
    }
}

impl From<&NamespaceDetail> for NamespaceRow {
    fn from(detail: &NamespaceDetail) -> Self {
        Self {
            namespace: detail.namespace.clone(),
            installation_access: access(detail.installation_access),
            user_access: access(detail.user_access),
        }
    }
}

async fn show(ctx: &CommandContext, session: &Session, args: ShowArgs) -> Result<()> {
    let current = ctx.resolve_namespace().unwrap_or_default();
    let mut names = args.names;
    if names.is_empty() && !args.all {
        // Without a target, show the current namespace.
        names.push(ctx.require_namespace()?);
    }
    let target = TargetArgs {
        names,
        selector: None,
        all: args.all,
    };
    let request = NamespaceRequest {
        addressing: target.single(&current)?,
    };

    let envelope = api::namespace::show(session, &request).await?;
    render(ctx.format, &envelope, |result| {
        if !result.username.is_empty() {
            println!("pgo username: {}", result.username);
        }
        let rows: Vec<NamespaceRow> = result.results.iter().map(NamespaceRow::from).collect();
        print_table(&rows);
    })?;
    Ok(())
}
