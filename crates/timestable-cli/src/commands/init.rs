//! The `timestable init` command.

use std::path::Path;

use anyhow::Result;

use timestable_core::config::{TutorConfig, LOCAL_CONFIG_FILE};

pub fn execute() -> Result<()> {
    if Path::new(LOCAL_CONFIG_FILE).exists() {
        println!("{LOCAL_CONFIG_FILE} already exists, skipping.");
        return Ok(());
    }

    let body = TutorConfig::default().to_toml()?;
    std::fs::write(LOCAL_CONFIG_FILE, format!("{HEADER}{body}"))?;
    println!("Created {LOCAL_CONFIG_FILE}");

    println!("\nNext steps:");
    println!("  1. Edit {LOCAL_CONFIG_FILE} (speech program, daily target, language)");
    println!("  2. Run: timestable learn");
    println!("  3. Run: timestable quiz");

    Ok(())
}

const HEADER: &str = "\
# timestable configuration
#
# locale = \"en\"            # zh, en, de or ja; unset uses the saved preference
# [speech] args may use {voice}, {rate} and {text} placeholders.

";
