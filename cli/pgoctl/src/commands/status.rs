//! Namespace status summary.

use anyhow::Result;
use pgo_msgs::system::StatusDetail;
use tabled::Tabled;

use crate::api;
use crate::output::{or_dash, print_table};
use crate::session::Session;

use super::{render, CommandContext};

#[derive(Debug, Clone, Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn row(field: &str, value: impl ToString) -> FieldRow {
    FieldRow {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn status_rows(detail: &StatusDetail) -> Vec<FieldRow> {
    let mut rows = vec![
        row("Operator Start", or_dash(&detail.operator_start_time)),
        row("Databases", detail.num_databases),
        row("Claims", detail.num_claims),
        row("Total Volume Size", or_dash(&detail.volume_cap)),
    ];
    for (tag, count) in &detail.db_tags {
        rows.push(row(&format!("Image {tag}"), count));
    }
    rows.push(row(
        "Not Ready",
        if detail.not_ready.is_empty() {
            "-".to_string()
        } else {
            detail.not_ready.join(", ")
        },
    ));
    rows
}

pub async fn run(ctx: &CommandContext, session: &Session) -> Result<()> {
    let namespace = ctx.require_namespace()?;
    let envelope = api::system::status(session, &namespace).await?;
    render(ctx.format, &envelope, |result| {
        print_table(&status_rows(&result.result));
    })?;
    Ok(())
}
