//! Scheduled task commands.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use pgo_msgs::schedule::{CreateScheduleRequest, ScheduleRequest, ScheduleType};
use pgo_msgs::Addressing;

use crate::api;
use crate::error::CliError;
use crate::session::Session;

use super::{print_lines, render, CommandContext, TargetArgs};

/// Schedule commands.
#[derive(Debug, Args)]
pub struct ScheduleCommand {
    #[command(subcommand)]
    command: ScheduleSubcommand,
}

#[derive(Debug, Subcommand)]
enum ScheduleSubcommand {
    /// Schedule a recurring task for clusters.
    Create(CreateArgs),

    /// Delete schedules.
    Delete(LookupArgs),

    /// Show schedules.
    Show(LookupArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScheduleKind {
    Pgbackrest,
    Policy,
}

impl From<ScheduleKind> for ScheduleType {
    fn from(kind: ScheduleKind) -> Self {
        match kind {
            ScheduleKind::Pgbackrest => ScheduleType::Pgbackrest,
            ScheduleKind::Policy => ScheduleType::Policy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackrestType {
    Full,
    Diff,
    Incr,
}

impl BackrestType {
    fn as_str(self) -> &'static str {
        match self {
            BackrestType::Full => "full",
            BackrestType::Diff => "diff",
            BackrestType::Incr => "incr",
        }
    }
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Five-field cron expression, e.g. "0 1 * * *".
    #[arg(long)]
    schedule: String,

    #[arg(long, value_enum)]
    schedule_type: ScheduleKind,

    /// Required for pgbackrest schedules.
    #[arg(long, value_enum)]
    pgbackrest_backup_type: Option<BackrestType>,

    #[arg(long)]
    pgbackrest_storage_type: Option<String>,

    /// Required for policy schedules.
    #[arg(long)]
    policy: Option<String>,

    /// Database a policy runs against.
    #[arg(long)]
    database: Option<String>,

    /// Schedule name; the server derives one when omitted.
    #[arg(long)]
    name: Option<String>,
}

#[derive(Debug, Args)]
struct LookupArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// A single schedule, instead of a cluster target.
    #[arg(long)]
    schedule_name: Option<String>,
}

impl ScheduleCommand {
    pub async fn run(self, ctx: &CommandContext, session: &Session) -> Result<()> {
        match self.command {
            ScheduleSubcommand::Create(args) => create(ctx, session, args).await,
            ScheduleSubcommand::Delete(args) => {
                for request in lookup_requests(ctx, args)? {
                    let envelope = api::schedule::delete(session, &request).await?;
                    render(ctx.format, &envelope, |result| print_lines(&result.results))?;
                }
                Ok(())
            }
            ScheduleSubcommand::Show(args) => {
                for request in lookup_requests(ctx, args)? {
                    let envelope = api::schedule::show(session, &request).await?;
                    render(ctx.format, &envelope, |result| print_lines(&result.results))?;
                }
                Ok(())
            }
        }
    }
}

/// Check that `expr` has exactly five whitespace-separated fields.
fn validate_cron(expr: &str) -> Result<(), CliError> {
    let fields = expr.split_whitespace().count();
    if fields != 5 {
        return Err(CliError::usage(format!(
            "--schedule must have 5 fields (minute hour day month weekday), got {fields}."
        )));
    }
    Ok(())
}

fn create_request(
    addressing: Addressing,
    args: &CreateArgs,
) -> Result<CreateScheduleRequest, CliError> {
    validate_cron(&args.schedule)?;

    let backrest_type = match (args.schedule_type, args.pgbackrest_backup_type) {
        (ScheduleKind::Pgbackrest, Some(kind)) => kind.as_str().to_string(),
        (ScheduleKind::Pgbackrest, None) => {
            return Err(CliError::usage(
                "--pgbackrest-backup-type is required for pgbackrest schedules.",
            ))
        }
        (ScheduleKind::Policy, _) => String::new(),
    };

    let policy = args.policy.clone().unwrap_or_default();
    if args.schedule_type == ScheduleKind::Policy && policy.is_empty() {
        return Err(CliError::usage("--policy is required for policy schedules."));
    }

    Ok(CreateScheduleRequest {
        addressing,
        name: args.name.clone().unwrap_or_default(),
        schedule: args.schedule.clone(),
        schedule_type: args.schedule_type.into(),
        backrest_type,
        storage_type: args.pgbackrest_storage_type.clone().unwrap_or_default(),
        policy,
        database: args.database.clone().unwrap_or_default(),
    })
}

async fn create(ctx: &CommandContext, session: &Session, args: CreateArgs) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    let plan = args.target.plan(&namespace)?;
    // Flag errors surface before the first call.
    let requests = plan
        .into_iter()
        .map(|addressing| create_request(addressing, &args))
        .collect::<Result<Vec<_>, _>>()?;

    for request in requests {
        let envelope = api::schedule::create(session, &request).await?;
        render(ctx.format, &envelope, |result| print_lines(&result.results))?;
    }
    Ok(())
}

fn lookup_requests(ctx: &CommandContext, args: LookupArgs) -> Result<Vec<ScheduleRequest>> {
    let namespace = ctx.require_namespace()?;
    if let Some(schedule_name) = args.schedule_name.filter(|name| !name.trim().is_empty()) {
        return Ok(vec![ScheduleRequest {
            addressing: Addressing::new(namespace),
            schedule_name,
        }]);
    }

    let requests = args
        .target
        .plan(&namespace)?
        .into_iter()
        .map(|addressing| ScheduleRequest {
            addressing,
            schedule_name: String::new(),
        })
        .collect();
    Ok(requests)
}
