//! Context commands (saved defaults for API server and namespace).

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::error::CliError;
use crate::output::{print_single, print_success, OutputFormat};
use crate::session::normalize_server_url;

use super::CommandContext;

/// Manage saved CLI context. Local only; nothing is sent to the server.
#[derive(Debug, Args)]
pub struct ContextCommand {
    #[command(subcommand)]
    command: ContextSubcommand,
}

#[derive(Debug, Subcommand)]
enum ContextSubcommand {
    /// Show the saved context.
    Show,

    /// Save a default namespace.
    UseNamespace {
        /// Namespace name.
        namespace: String,
    },

    /// Save a default API server URL.
    SetApiserver {
        /// Base URL, e.g. https://127.0.0.1:8443.
        url: String,
    },

    /// Clear the saved context.
    Clear,
}

#[derive(Debug, Serialize)]
struct ContextView {
    apiserver_url: Option<String>,
    namespace: Option<String>,
}

impl ContextCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        match self.command {
            ContextSubcommand::Show => show(ctx),
            ContextSubcommand::UseNamespace { namespace } => use_namespace(ctx, namespace),
            ContextSubcommand::SetApiserver { url } => set_apiserver(ctx, &url),
            ContextSubcommand::Clear => clear(ctx),
        }
    }
}

fn show(ctx: &CommandContext) -> Result<()> {
    let view = ContextView {
        apiserver_url: ctx.config.apiserver_url.clone(),
        namespace: ctx.config.context.namespace.clone(),
    };

    match ctx.format {
        OutputFormat::Json => print_single(&view),
        OutputFormat::Table => {
            println!(
                "apiserver_url: {}",
                view.apiserver_url.as_deref().unwrap_or("-")
            );
            println!("namespace: {}", view.namespace.as_deref().unwrap_or("-"));
        }
    }

    Ok(())
}

fn use_namespace(ctx: &CommandContext, namespace: String) -> Result<()> {
    let mut config = ctx.config.clone();
    config.context.namespace = Some(namespace.clone());
    config.save()?;

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "namespace": namespace })),
        OutputFormat::Table => print_success(&format!("Default namespace set to {namespace}")),
    }
    Ok(())
}

fn set_apiserver(ctx: &CommandContext, url: &str) -> Result<()> {
    let url = normalize_server_url(url).map_err(|err| CliError::usage(err.to_string()))?;
    let mut config = ctx.config.clone();
    config.apiserver_url = Some(url.clone());
    config.save()?;

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "apiserver_url": url })),
        OutputFormat::Table => print_success(&format!("API server set to {url}")),
    }
    Ok(())
}

fn clear(ctx: &CommandContext) -> Result<()> {
    let mut config = ctx.config.clone();
    config.apiserver_url = None;
    config.context.namespace = None;
    config.save()?;

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "ok": true })),
        OutputFormat::Table => print_success("Cleared saved context"),
    }

    Ok(())
}
