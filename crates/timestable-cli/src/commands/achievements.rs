//! The `timestable achievements` command.

use anyhow::Result;

use timestable_core::achievements::AchievementId;

use crate::context::{AppContext, GlobalArgs};

pub fn execute(global: &GlobalArgs) -> Result<()> {
    use comfy_table::{Cell, Table};

    let ctx = AppContext::load(global)?;
    let progress = ctx.progress();
    let m = &ctx.messages;

    let mut table = Table::new();
    for id in AchievementId::ALL {
        let mark = if progress.achievements.contains(&id) {
            "[x]"
        } else {
            "[ ]"
        };
        table.add_row(vec![
            Cell::new(mark),
            Cell::new(m.achievement_name(id)),
            Cell::new(m.achievement_description(id)),
        ]);
    }

    println!(
        "{}",
        m.t(
            "achievements.title",
            &[
                ("unlocked", &progress.achievements.len()),
                ("total", &AchievementId::ALL.len()),
            ]
        )
    );
    println!("{table}");
    Ok(())
}
