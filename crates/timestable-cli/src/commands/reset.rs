//! The `timestable reset` command.

use anyhow::{Context, Result};

use timestable_core::storage::{self, PROGRESS_KEY};
use timestable_core::traits::KeyValueStore;

use crate::context::{AppContext, GlobalArgs};

pub fn execute(global: &GlobalArgs, yes: bool) -> Result<()> {
    let ctx = AppContext::load(global)?;
    if !yes {
        println!("{}", ctx.messages.t("reset.confirm", &[]));
        return Ok(());
    }

    ctx.store
        .remove(PROGRESS_KEY)
        .context("failed to remove progress")?;
    storage::clear_quiz_state(&*ctx.store).context("failed to remove quiz state")?;
    tracing::info!(data_dir = %ctx.config.data_dir.display(), "progress reset");
    println!("{}", ctx.messages.t("reset.done", &[]));
    Ok(())
}
