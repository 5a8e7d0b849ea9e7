//! The `timestable report` command.

use std::path::PathBuf;

use anyhow::Result;

use timestable_report::write_html_report;

use crate::context::{AppContext, GlobalArgs};

pub fn execute(global: &GlobalArgs, output: PathBuf) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let progress = ctx.progress();
    write_html_report(&progress, &output)?;
    tracing::info!(path = %output.display(), "report written");
    println!(
        "{}",
        ctx.messages
            .t("report.written", &[("path", &output.display())])
    );
    Ok(())
}
