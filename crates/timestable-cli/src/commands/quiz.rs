//! The `timestable quiz` command.

use anyhow::Result;

use timestable_core::driver::SessionStart;
use timestable_core::model::{Difficulty, QuizMode};

use crate::commands::session;
use crate::context::{AppContext, GlobalArgs};

pub async fn execute(global: &GlobalArgs, difficulty: Option<Difficulty>) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let difficulty = difficulty.unwrap_or(ctx.config.default_difficulty);
    session::run(
        &ctx,
        SessionStart::New {
            mode: QuizMode::Quiz,
            difficulty,
        },
    )
    .await?;
    Ok(())
}
