//! CLI commands.

mod backup;
mod cluster;
mod context;
mod namespace;
mod pgadmin;
mod pgbouncer;
mod pgorole;
mod pgouser;
mod policy;
mod schedule;
mod status;
mod user;
mod version;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use pgo_msgs::{Addressing, AddressingError, ApplicationError, ResponseEnvelope};
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::env::{EnvSource, ProcessEnv, PGO_NAMESPACE};
use crate::error::{CliError, SetupError};
use crate::output::{print_single, OutputFormat};
use crate::session::{Session, SessionOptions};

/// pgo - manage PostgreSQL clusters through the Operator API server.
#[derive(Debug, Parser)]
#[command(name = "pgo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Namespace to operate in.
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// API server base URL, e.g. https://127.0.0.1:8443.
    #[arg(long, global = true, value_name = "URL")]
    apiserver_url: Option<String>,

    /// CA bundle that signed the API server certificate.
    #[arg(long, global = true, value_name = "PATH")]
    pgo_ca_cert: Option<PathBuf>,

    /// Client certificate presented to the API server.
    #[arg(long, global = true, value_name = "PATH")]
    pgo_client_cert: Option<PathBuf>,

    /// Private key for the client certificate.
    #[arg(long, global = true, value_name = "PATH")]
    pgo_client_key: Option<PathBuf>,

    /// Accept a server certificate issued for a different host name.
    /// The certificate chain is still checked against the CA bundle.
    #[arg(long, global = true)]
    disable_tls_hostname_verification: bool,

    /// Log requests and responses to stderr.
    #[arg(long, global = true, env = "PGO_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage PostgreSQL clusters.
    Cluster(cluster::ClusterCommand),

    /// Manage namespaces watched by the Operator.
    Namespace(namespace::NamespaceCommand),

    /// Manage SQL policies.
    Policy(policy::PolicyCommand),

    /// Manage PostgreSQL users inside clusters.
    User(user::UserCommand),

    /// Manage API server users.
    Pgouser(pgouser::PgouserCommand),

    /// Manage API server roles.
    Pgorole(pgorole::PgoroleCommand),

    /// Manage pgBackRest backups.
    Backup(backup::BackupCommand),

    /// Manage scheduled tasks.
    Schedule(schedule::ScheduleCommand),

    /// Manage the pgBouncer connection pooler of clusters.
    Pgbouncer(pgbouncer::PgbouncerCommand),

    /// Manage the pgAdmin web console of clusters.
    Pgadmin(pgadmin::PgadminCommand),

    /// Show a summary of the namespace.
    Status,

    /// Show client and API server versions.
    Version(version::VersionCommand),

    /// Show or change saved defaults.
    Context(context::ContextCommand),
}

impl Cli {
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        let ctx = CommandContext {
            config,
            format: self.output,
            namespace: self.namespace,
            session_options: SessionOptions {
                apiserver_url: self.apiserver_url,
                ca_cert: self.pgo_ca_cert,
                client_cert: self.pgo_client_cert,
                client_key: self.pgo_client_key,
                disable_hostname_verification: self.disable_tls_hostname_verification,
            },
        };

        match self.command {
            Commands::Context(cmd) => cmd.run(&ctx),
            Commands::Version(cmd) if cmd.client_only() => {
                version::print_client(ctx.format);
                Ok(())
            }
            command => {
                let session = ctx.session()?;
                command.dispatch(&ctx, &session).await
            }
        }
    }
}

impl Commands {
    async fn dispatch(self, ctx: &CommandContext, session: &Session) -> Result<()> {
        match self {
            Commands::Cluster(cmd) => cmd.run(ctx, session).await,
            Commands::Namespace(cmd) => cmd.run(ctx, session).await,
            Commands::Policy(cmd) => cmd.run(ctx, session).await,
            Commands::User(cmd) => cmd.run(ctx, session).await,
            Commands::Pgouser(cmd) => cmd.run(ctx, session).await,
            Commands::Pgorole(cmd) => cmd.run(ctx, session).await,
            Commands::Backup(cmd) => cmd.run(ctx, session).await,
            Commands::Schedule(cmd) => cmd.run(ctx, session).await,
            Commands::Pgbouncer(cmd) => cmd.run(ctx, session).await,
            Commands::Pgadmin(cmd) => cmd.run(ctx, session).await,
            Commands::Status => status::run(ctx, session).await,
            Commands::Version(_) => version::run(ctx, session).await,
            Commands::Context(cmd) => cmd.run(ctx),
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
    namespace: Option<String>,
    session_options: SessionOptions,
}

impl CommandContext {
    /// Build the session for this invocation.
    pub fn session(&self) -> Result<Session, SetupError> {
        Session::establish(
            &self.session_options,
            &ProcessEnv,
            self.config.apiserver_url.as_deref(),
        )
    }

    /// Resolve the namespace: flag, then `PGO_NAMESPACE`, then saved context.
    pub fn resolve_namespace(&self) -> Option<String> {
        resolve_namespace(
            self.namespace.as_deref(),
            &ProcessEnv,
            self.config.context.namespace.as_deref(),
        )
    }

    /// Require a namespace to be specified.
    pub fn require_namespace(&self) -> Result<String, CliError> {
        self.resolve_namespace().ok_or_else(|| {
            CliError::usage(
                "No namespace specified. Use --namespace, set PGO_NAMESPACE, or run `pgo context use-namespace`.",
            )
        })
    }
}

fn resolve_namespace(
    flag: Option<&str>,
    env: &dyn EnvSource,
    saved: Option<&str>,
) -> Option<String> {
    flag.filter(|ns| !ns.trim().is_empty())
        .map(str::to_string)
        .or_else(|| env.var(PGO_NAMESPACE))
        .or_else(|| saved.filter(|ns| !ns.trim().is_empty()).map(str::to_string))
}

/// Names, or a selector, or `--all`.
#[derive(Debug, Clone, Default, Args)]
pub struct TargetArgs {
    /// Resource names.
    pub names: Vec<String>,

    /// Label selector, e.g. env=prod.
    #[arg(short, long)]
    pub selector: Option<String>,

    /// Every resource in the namespace.
    #[arg(long)]
    pub all: bool,
}

impl TargetArgs {
    /// Addressing for each call, in the order the calls are issued.
    ///
    /// A selector or `--all` yields one call with no name; otherwise one
    /// call per name, in argument order.
    pub fn plan(&self, namespace: &str) -> Result<Vec<Addressing>, AddressingError> {
        let selector = self.selector.clone().unwrap_or_default();
        let combined = Addressing::new(namespace)
            .with_names(self.names.iter().cloned())
            .with_selector(selector.clone())
            .with_all(self.all);
        combined.validate_namespace()?;
        combined.validate()?;

        if !selector.trim().is_empty() || self.all {
            debug!(selector = %selector, all = self.all, "addressing by selector");
            return Ok(vec![Addressing::new(namespace)
                .with_selector(selector)
                .with_all(self.all)]);
        }

        Ok(self.names.iter().map(|name| combined.for_name(name)).collect())
    }

    /// One addressing carrying every populated mode, for operations that
    /// take the whole target set in a single request.
    pub fn single(&self, namespace: &str) -> Result<Addressing, AddressingError> {
        let addressing = Addressing::new(namespace)
            .with_names(self.names.iter().cloned())
            .with_selector(self.selector.clone().unwrap_or_default())
            .with_all(self.all);
        addressing.validate()?;
        Ok(addressing)
    }
}

/// Cluster names or a selector, for add-on operations that have no `--all`.
#[derive(Debug, Clone, Default, Args)]
pub struct ClusterTargetArgs {
    /// Cluster names.
    pub names: Vec<String>,

    /// Label selector, e.g. env=prod.
    #[arg(short, long)]
    pub selector: Option<String>,
}

impl ClusterTargetArgs {
    /// One addressing for every named or selected cluster.
    pub fn addressing(&self, namespace: &str) -> Result<Addressing, AddressingError> {
        let addressing = TargetArgs {
            names: self.names.clone(),
            selector: self.selector.clone(),
            all: false,
        }
        .single(namespace)?;
        addressing.validate_namespace()?;
        Ok(addressing)
    }
}

/// Print the envelope as JSON, or hand the accepted payload to `table`.
///
/// An `error` application status is returned instead of rendered.
fn render<T: Serialize>(
    format: OutputFormat,
    envelope: &ResponseEnvelope<T>,
    table: impl FnOnce(&T),
) -> Result<(), ApplicationError> {
    let payload = envelope.payload()?;
    match format {
        OutputFormat::Json => print_single(envelope),
        OutputFormat::Table => table(payload),
    }
    Ok(())
}

/// Print each result line.
fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pgo_msgs::AddressingMode;

    use super::*;

    fn target(names: &[&str], selector: Option<&str>, all: bool) -> TargetArgs {
        TargetArgs {
            names: names.iter().map(|name| name.to_string()).collect(),
            selector: selector.map(str::to_string),
            all,
        }
    }

    #[test]
    fn names_become_one_call_each_in_order() {
        let plan = target(&["a", "b", "c"], None, false).plan("pgo").unwrap();
        let names: Vec<_> = plan.iter().map(|a| a.names.clone()).collect();
        assert_eq!(names, vec![vec!["a"], vec!["b"], vec!["c"]]);
        assert!(plan.iter().all(|a| a.namespace == "pgo"));
    }

    #[test]
    fn selector_wins_over_names() {
        let plan = target(&["a", "b"], Some("env=prod"), false).plan("pgo").unwrap();
        assert_eq!(plan.len(), 1);
        assert!(plan[0].names.is_empty());
        assert_eq!(plan[0].selector, "env=prod");
    }

    #[test]
    fn all_is_a_single_call() {
        let plan = target(&[], None, true).plan("pgo").unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].modes(), vec![AddressingMode::All]);
    }

    #[test]
    fn empty_target_is_rejected_before_any_call() {
        assert_eq!(
            target(&[], None, false).plan("pgo"),
            Err(AddressingError::NoTarget)
        );
        assert_eq!(
            target(&[], Some(""), false).single("pgo"),
            Err(AddressingError::NoTarget)
        );
    }

    #[test]
    fn blank_namespace_is_rejected_before_any_call() {
        assert_eq!(
            target(&["hippo"], None, false).plan(" "),
            Err(AddressingError::EmptyNamespace)
        );
    }

    #[test]
    fn cluster_target_needs_names_or_selector() {
        let target = ClusterTargetArgs {
            names: vec![],
            selector: None,
        };
        assert_eq!(target.addressing("pgo"), Err(AddressingError::NoTarget));

        let target = ClusterTargetArgs {
            names: vec!["hippo".to_string()],
            selector: Some("env=prod".to_string()),
        };
        let addressing = target.addressing("pgo").unwrap();
        assert_eq!(addressing.names, vec!["hippo"]);
        assert_eq!(addressing.selector, "env=prod");
        assert!(!addressing.all);
    }

    #[test]
    fn pgbouncer_update_parses_resource_flags() {
        let cli = Cli::try_parse_from([
            "pgo",
            "pgbouncer",
            "update",
            "hippo",
            "--cpu",
            "250m",
            "--replicas",
            "2",
            "--rotate-password",
        ]);
        assert!(cli.is_ok());

        let zero_replicas =
            Cli::try_parse_from(["pgo", "pgbouncer", "update", "hippo", "--replicas", "0"]);
        assert!(zero_replicas.is_err());
    }

    #[test]
    fn namespace_precedence() {
        let env = HashMap::from([(PGO_NAMESPACE, "from-env")]);
        let empty: HashMap<&str, &str> = HashMap::new();

        assert_eq!(
            resolve_namespace(Some("flag"), &env, Some("saved")).as_deref(),
            Some("flag")
        );
        assert_eq!(
            resolve_namespace(None, &env, Some("saved")).as_deref(),
            Some("from-env")
        );
        assert_eq!(
            resolve_namespace(None, &empty, Some("saved")).as_deref(),
            Some("saved")
        );
        assert_eq!(resolve_namespace(None, &empty, None), None);
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pgo",
            "cluster",
            "show",
            "hippo",
            "-n",
            "pgouser1",
            "--apiserver-url",
            "https://pgo:8443",
            "-o",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.namespace.as_deref(), Some("pgouser1"));
        assert_eq!(cli.apiserver_url.as_deref(), Some("https://pgo:8443"));
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn command_tree_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
