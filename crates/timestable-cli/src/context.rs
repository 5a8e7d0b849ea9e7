//! Per-invocation application state: config, store and locale.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use timestable_core::clock::{Clock, SystemClock};
use timestable_core::config::{load_config_from, TutorConfig};
use timestable_core::locale::Locale;
use timestable_core::model::UserProgress;
use timestable_core::storage;
use timestable_storage::FileStore;

use crate::i18n::Messages;

/// Flags shared by every subcommand.
pub struct GlobalArgs {
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub struct AppContext {
    pub config: TutorConfig,
    pub store: Arc<FileStore>,
    pub clock: Arc<SystemClock>,
    pub locale: Locale,
    pub messages: Messages,
}

impl AppContext {
    /// Load config, open the store and settle the interface locale.
    ///
    /// A locale from the config or `TIMESTABLE_LOCALE` wins over the stored
    /// preference.
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let mut config = load_config_from(args.config.as_deref())?;
        if let Some(dir) = &args.data_dir {
            config.data_dir = dir.clone();
        }
        let store = FileStore::open(&config.data_dir).with_context(|| {
            format!("failed to open data directory {}", config.data_dir.display())
        })?;
        let locale = config
            .locale
            .unwrap_or_else(|| storage::load_locale(&store));
        tracing::debug!(data_dir = %config.data_dir.display(), %locale, "context loaded");

        Ok(Self {
            config,
            store: Arc::new(store),
            clock: Arc::new(SystemClock),
            locale,
            messages: Messages::load(locale),
        })
    }

    /// Progress as of today, with the configured daily target applied.
    pub fn progress(&self) -> UserProgress {
        let mut progress = storage::load_progress(&*self.store, self.clock.today());
        progress.set_daily_target(self.config.daily_target);
        progress
    }
}
