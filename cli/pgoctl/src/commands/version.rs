//! Client and API server versions.

use anyhow::Result;
use clap::Args;
use pgo_msgs::CLIENT_VERSION;
use serde_json::json;

use crate::api;
use crate::output::{print_single, OutputFormat};
use crate::session::Session;

use super::{render, CommandContext};

#[derive(Debug, Args)]
pub struct VersionCommand {
    /// Only print the client version; no server call is made.
    #[arg(long)]
    client: bool,
}

impl VersionCommand {
    pub fn client_only(&self) -> bool {
        self.client
    }
}

pub fn print_client(format: OutputFormat) {
    match format {
        OutputFormat::Json => print_single(&json!({ "ClientVersion": CLIENT_VERSION })),
        OutputFormat::Table => println!("pgo client version {CLIENT_VERSION}"),
    }
}

pub async fn run(ctx: &CommandContext, session: &Session) -> Result<()> {
    let envelope = api::system::version(session).await?;
    render(ctx.format, &envelope, |result| {
        println!("pgo client version {CLIENT_VERSION}");
        println!("pgo-apiserver version {}", result.version);
    })?;
    Ok(())
}
