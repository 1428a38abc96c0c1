//! Commands for PostgreSQL users inside clusters.
//!
//! The target addresses clusters; the user is named with `--username`.

use anyhow::Result;
use clap::{Args, Subcommand};
use pgo_msgs::user::{
    CreateUserRequest, DeleteUserRequest, ShowUserRequest, UpdateUserRequest, UserDetail,
};
use tabled::Tabled;

use crate::api;
use crate::error::CliError;
use crate::output::{or_dash, print_table, print_warning};
use crate::session::Session;

use super::{render, CommandContext, TargetArgs};

/// User commands.
#[derive(Debug, Args)]
pub struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    /// Show users of clusters.
    Show(ShowArgs),

    /// Create a user in clusters.
    Create(CreateArgs),

    /// Delete a user from clusters.
    Delete(DeleteArgs),

    /// Change a user's password or expiry.
    Update(UpdateArgs),
}

#[derive(Debug, Args)]
struct ShowArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Only users whose passwords expire within this many days.
    #[arg(long, value_name = "DAYS")]
    expired: Option<u32>,

    /// Include system accounts.
    #[arg(long)]
    show_system_accounts: bool,
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Username to create.
    #[arg(long)]
    username: String,

    /// Password; generated by the server when omitted.
    #[arg(long)]
    password: Option<String>,

    /// Length of a generated password.
    #[arg(long)]
    password_length: Option<u32>,

    /// Days until the password expires.
    #[arg(long, value_name = "DAYS")]
    valid_days: Option<u32>,

    /// Let the Operator manage the credentials.
    #[arg(long)]
    managed: bool,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Username to delete.
    #[arg(long)]
    username: String,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Username to update.
    #[arg(long)]
    username: String,

    /// New password.
    #[arg(long, conflicts_with = "rotate_password")]
    password: Option<String>,

    /// Have the server generate a new password.
    #[arg(long)]
    rotate_password: bool,

    /// Days until the password expires.
    #[arg(long, value_name = "DAYS")]
    valid_days: Option<u32>,

    /// Expire the user's password now.
    #[arg(long)]
    expire_user: bool,
}

impl UserCommand {
    pub async fn run(self, ctx: &CommandContext, session: &Session) -> Result<()> {
        match self.command {
            UserSubcommand::Show(args) => show(ctx, session, args).await,
            UserSubcommand::Create(args) => create(ctx, session, args).await,
            UserSubcommand::Delete(args) => delete(ctx, session, args).await,
            UserSubcommand::Update(args) => update(ctx, session, args).await,
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct UserRow {
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Password")]
    password: String,
    #[tabled(rename = "Expires")]
    valid_until: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&UserDetail> for UserRow {
    fn from(detail: &UserDetail) -> Self {
        Self {
            cluster: detail.cluster_name.clone(),
            username: detail.username.clone(),
            password: or_dash(&detail.password),
            valid_until: or_dash(&detail.valid_until),
            status: if detail.error {
                format!("error: {}", detail.error_message)
            } else {
                "ok".to_string()
            },
        }
    }
}

fn print_users(details: &[UserDetail]) {
    let rows: Vec<UserRow> = details.iter().map(UserRow::from).collect();
    print_table(&rows);
    let failed = details.iter().filter(|detail| detail.error).count();
    if failed > 0 {
        print_warning(&format!("{failed} cluster(s) reported an error"));
    }
}

fn require_username(username: &str) -> Result<(), CliError> {
    if username.trim().is_empty() {
        return Err(CliError::usage("--username must not be empty."));
    }
    Ok(())
}

async fn show(ctx: &CommandContext, session: &Session, args: ShowArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    for addressing in args.target.plan(&namespace)? {
        let request = ShowUserRequest {
            addressing,
            expired_within_days: args.expired,
            show_system_accounts: args.show_system_accounts,
        };
        let envelope = api::user::show(session, &request).await?;
        render(ctx.format, &envelope, |result| print_users(&result.results))?;
    }
    Ok(())
}

async fn create(ctx: &CommandContext, session: &Session, args: CreateArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    require_username(&args.username)?;
    for addressing in args.target.plan(&namespace)? {
        let request = CreateUserRequest {
            addressing,
            username: args.username.clone(),
            password: args.password.clone().unwrap_or_default(),
            password_length: args.password_length,
            valid_days: args.valid_days,
            managed: args.managed,
        };
        let envelope = api::user::create(session, &request).await?;
        render(ctx.format, &envelope, |result| print_users(&result.results))?;
    }
    Ok(())
}

async fn delete(ctx: &CommandContext, session: &Session, args: DeleteArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    require_username(&args.username)?;
    for addressing in args.target.plan(&namespace)? {
        let request = DeleteUserRequest {
            addressing,
            username: args.username.clone(),
        };
        let envelope = api::user::delete(session, &request).await?;
        render(ctx.format, &envelope, |result| print_users(&result.results))?;
    }
    Ok(())
}

async fn update(ctx: &CommandContext, session: &Session, args: UpdateArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    require_username(&args.username)?;
    for addressing in args.target.plan(&namespace)? {
        let request = UpdateUserRequest {
            addressing,
            username: args.username.clone(),
            password: args.password.clone().unwrap_or_default(),
            rotate_password: args.rotate_password,
            valid_days: args.valid_days,
            expire: args.expire_user,
        };
        let envelope = api::user::update(session, &request).await?;
        render(ctx.format, &envelope, |result| print_users(&result.results))?;
    }
    Ok(())
}
