//! The `timestable learn` command.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use timestable_core::learn::{describe_cell, formula_text, grid, speak_formula, GRID_SIZE};
use timestable_core::traits::Narrator;
use timestable_speech::create_narrator;

use crate::context::{AppContext, GlobalArgs};
use crate::i18n::Messages;
use crate::input::parse_cell;

fn print_grid(messages: &Messages) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    let mut header = vec![Cell::new("×")];
    header.extend((1..=GRID_SIZE).map(Cell::new));
    table.set_header(header);

    for (row, products) in (1..).zip(grid(GRID_SIZE)) {
        let mut cells = vec![Cell::new(row)];
        cells.extend(products.into_iter().map(Cell::new));
        table.add_row(cells);
    }

    println!("{}", messages.t("learn.title", &[]));
    println!("{table}");
}

async fn show_cell(
    ctx: &AppContext,
    narrator: &dyn Narrator,
    speech: bool,
    multiplicand: u32,
    multiplier: u32,
) -> Result<()> {
    let m = &ctx.messages;
    let info = describe_cell(multiplicand, multiplier);
    println!("{}", info.equation);
    println!(
        "{}",
        m.t(
            "learn.formula",
            &[("formula", &formula_text(multiplicand, multiplier, ctx.locale))]
        )
    );
    if info.other_combinations.is_empty() {
        println!("{}", m.t("learn.noOtherCombinations", &[("product", &info.product)]));
    } else {
        let list = info
            .other_combinations
            .iter()
            .map(|(a, b)| format!("{a} × {b}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}", m.t("learn.otherCombinations", &[("list", &list)]));
    }

    if let Err(e) = speak_formula(narrator, multiplicand, multiplier, speech, ctx.locale).await {
        tracing::warn!(narrator = narrator.name(), "speech failed: {e:#}");
    }
    Ok(())
}

pub async fn execute(global: &GlobalArgs, cell: Option<String>, no_speech: bool) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let narrator = create_narrator(&ctx.config.speech).context("failed to set up speech")?;
    let speech = !no_speech && ctx.config.speech.enabled;

    if !speech {
        println!("{}", ctx.messages.t("learn.speechOff", &[]));
    } else if !narrator.is_supported() {
        println!(
            "{}",
            ctx.messages
                .t("learn.speechUnavailable", &[("name", &narrator.name())])
        );
    }

    if let Some(cell) = cell {
        let (multiplicand, multiplier) = parse_cell(&cell)
            .with_context(|| ctx.messages.t("learn.invalidCell", &[("input", &cell)]))?;
        show_cell(&ctx, narrator.as_ref(), speech, multiplicand, multiplier).await?;
        if let Err(e) = narrator.finish().await {
            tracing::warn!("speech failed: {e:#}");
        }
        return Ok(());
    }

    print_grid(&ctx.messages);
    println!("{}", ctx.messages.t("learn.prompt", &[]));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "q" | "quit" | "exit") {
            break;
        }
        match parse_cell(line) {
            Some((multiplicand, multiplier)) => {
                show_cell(&ctx, narrator.as_ref(), speech, multiplicand, multiplier).await?;
            }
            None => println!("{}", ctx.messages.t("learn.invalidCell", &[("input", &line)])),
        }
    }

    if let Err(e) = narrator.finish().await {
        tracing::warn!("speech failed: {e:#}");
    }
    Ok(())
}
