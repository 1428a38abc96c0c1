//! API server user commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use pgo_msgs::access::{PgouserInfo, PgouserRequest, PgouserSpec};
use pgo_msgs::Addressing;
use tabled::Tabled;

use crate::api;
use crate::error::CliError;
use crate::output::{or_dash, print_table};
use crate::session::Session;

use super::{print_lines, render, CommandContext, TargetArgs};

/// pgo user commands.
#[derive(Debug, Args)]
pub struct PgouserCommand {
    #[command(subcommand)]
    command: PgouserSubcommand,
}

#[derive(Debug, Subcommand)]
enum PgouserSubcommand {
    /// Show pgo users.
    Show(TargetOnlyArgs),

    /// Create a pgo user.
    Create(SpecArgs),

    /// Delete pgo users.
    Delete(TargetOnlyArgs),

    /// Change a pgo user's password, roles or namespaces.
    Update(SpecArgs),
}

#[derive(Debug, Args)]
struct TargetOnlyArgs {
    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Debug, Args)]
struct SpecArgs {
    /// Username.
    name: String,

    #[arg(long)]
    pgouser_password: Option<String>,

    /// Comma-separated pgo roles.
    #[arg(long)]
    pgouser_roles: Option<String>,

    /// Comma-separated namespaces the user may act in.
    #[arg(long, conflicts_with = "all_namespaces")]
    pgouser_namespaces: Option<String>,

    /// Grant access to every namespace.
    #[arg(long)]
    all_namespaces: bool,
}

impl PgouserCommand {
    pub async fn run(self, ctx: &CommandContext, session: &Session) -> Result<()> {
        match self.command {
            PgouserSubcommand::Show(args) => show(ctx, session, args).await,
            PgouserSubcommand::Create(args) => create(ctx, session, args).await,
            PgouserSubcommand::Delete(args) => delete(ctx, session, args).await,
            PgouserSubcommand::Update(args) => update(ctx, session, args).await,
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct PgouserRow {
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Roles")]
    roles: String,
    #[tabled(rename = "Namespaces")]
    namespaces: String,
}

impl From<&PgouserInfo> for PgouserRow {
    fn from(info: &PgouserInfo) -> Self {
        Self {
            username: info.username.clone(),
            roles: or_dash(&info.roles.join(",")),
            namespaces: or_dash(&info.namespaces.join(",")),
        }
    }
}

impl SpecArgs {
    fn into_spec(self, namespace: &str) -> PgouserSpec {
        PgouserSpec {
            addressing: Addressing::new(namespace).with_names([self.name]),
            password: self.pgouser_password.unwrap_or_default(),
            roles: self.pgouser_roles.unwrap_or_default(),
            namespaces: self.pgouser_namespaces.unwrap_or_default(),
            all_namespaces: self.all_namespaces,
        }
    }
}

async fn show(ctx: &CommandContext, session: &Session, args: TargetOnlyArgs) -> Result<()> {
    let namespace = ctx.resolve_namespace().unwrap_or_default();
    let request = PgouserRequest {
        addressing: args.target.single(&namespace)?,
    };
    let envelope = api::access::show_pgousers(session, &request).await?;
    render(ctx.format, &envelope, |result| {
        let rows: Vec<PgouserRow> = result.users.iter().map(PgouserRow::from).collect();
        print_table(&rows);
    })?;
    Ok(())
}

async fn create(ctx: &CommandContext, session: &Session, args: SpecArgs) -> Result<()> {
    if args.pgouser_password.as_deref().unwrap_or_default().is_empty() {
        return Err(CliError::usage("--pgouser-password is required to create a pgo user.").into());
    }
    let namespace = ctx.resolve_namespace().unwrap_or_default();
    let request = args.into_spec(&namespace);
    let envelope = api::access::create_pgouser(session, &request).await?;
    render(ctx.format, &envelope, |result| print_lines(&result.results))?;
    Ok(())
}

async fn delete(ctx: &CommandContext, session: &Session, args: TargetOnlyArgs) -> Result<()> {
    let namespace = ctx.resolve_namespace().unwrap_or_default();
    let request = PgouserRequest {
        addressing: args.target.single(&namespace)?,
    };
    let envelope = api::access::delete_pgousers(session, &request).await?;
    render(ctx.format, &envelope, |result| print_lines(&result.results))?;
    Ok(())
}

async fn update(ctx: &CommandContext, session: &Session, args: SpecArgs) -> Result<()> {
    let namespace = ctx.resolve_namespace().unwrap_or_default();
    let request = args.into_spec(&namespace);
    let envelope = api::access::update_pgouser(session, &request).await?;
    render(ctx.format, &envelope, |result| print_lines(&result.results))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_carries_the_single_username() {
        let args = SpecArgs {
            name: "alice".to_string(),
            pgouser_password: Some("secret".to_string()),
            pgouser_roles: Some("admin,readonly".to_string()),
            pgouser_namespaces: None,
            all_namespaces: true,
        };
        let spec = args.into_spec("pgo");

        assert_eq!(spec.addressing.names, vec!["alice".to_string()]);
        assert_eq!(spec.roles, "admin,readonly");
        assert!(spec.namespaces.is_empty());
        assert!(spec.all_namespaces);
    }

    #[test]
    fn row_joins_roles_and_namespaces() {
        let info = PgouserInfo {
            username: "alice".to_string(),
            roles: vec!["admin".to_string(), "ops".to_string()],
            namespaces: Vec::new(),
        };
        let row = PgouserRow::from(&info);
        assert_eq!(row.roles, "admin,ops");
        assert_eq!(row.namespaces, "-");
    }
}
