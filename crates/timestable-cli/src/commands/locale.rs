//! The `timestable locale` command.

use anyhow::{bail, Context, Result};

use timestable_core::locale::Locale;
use timestable_core::storage;

use crate::context::{AppContext, GlobalArgs};
use crate::i18n::Messages;

pub fn execute(global: &GlobalArgs, tag: Option<String>) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let available = Locale::ALL
        .iter()
        .map(|l| format!("{} ({})", l.tag(), l.native_name()))
        .collect::<Vec<_>>()
        .join(", ");

    let Some(tag) = tag else {
        let locale = ctx.locale;
        println!(
            "{}",
            ctx.messages.t(
                "locale.current",
                &[("name", &locale.native_name()), ("tag", &locale.tag())]
            )
        );
        println!("{}", ctx.messages.t("locale.available", &[("list", &available)]));
        return Ok(());
    };

    let Ok(locale) = tag.parse::<Locale>() else {
        bail!("unsupported locale '{tag}', expected one of: {available}");
    };
    storage::save_locale(&*ctx.store, locale).context("failed to save locale")?;
    if ctx.config.locale.is_some_and(|configured| configured != locale) {
        tracing::warn!(%locale, "a locale set in config or TIMESTABLE_LOCALE takes precedence");
    }
    println!(
        "{}",
        Messages::load(locale).t("locale.changed", &[("name", &locale.native_name())])
    );
    Ok(())
}
