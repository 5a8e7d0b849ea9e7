//! The `timestable resume` command.

use anyhow::Result;

use timestable_core::driver::SessionStart;
use timestable_core::storage;

use crate::commands::session;
use crate::context::{AppContext, GlobalArgs};

pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let Some(snapshot) = storage::load_quiz_state(&*ctx.store) else {
        println!("{}", ctx.messages.t("quiz.nothingToResume", &[]));
        return Ok(());
    };
    session::run(&ctx, SessionStart::Resume(snapshot)).await?;
    Ok(())
}
