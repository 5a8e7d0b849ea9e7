//! Embedded message catalogs.

use serde_json::Value;

use timestable_core::achievements::AchievementId;
use timestable_core::locale::Locale;

fn catalog_source(locale: Locale) -> &'static str {
    match locale {
        Locale::Zh => include_str!("../messages/zh.json"),
        Locale::En => include_str!("../messages/en.json"),
        Locale::De => include_str!("../messages/de.json"),
        Locale::Ja => include_str!("../messages/ja.json"),
    }
}

/// Localized strings for one locale.
pub struct Messages {
    locale: Locale,
    catalog: Value,
}

impl Messages {
    /// Load the catalog for `locale`, falling back to the default locale when
    /// it does not parse.
    pub fn load(locale: Locale) -> Self {
        match serde_json::from_str(catalog_source(locale)) {
            Ok(catalog) => Self { locale, catalog },
            Err(e) => {
                tracing::warn!(%locale, error = %e, "message catalog unreadable, using default");
                let fallback = Locale::default();
                let catalog = serde_json::from_str(catalog_source(fallback)).unwrap_or(Value::Null);
                Self {
                    locale: fallback,
                    catalog,
                }
            }
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Look up a dotted key and substitute `{name}` placeholders.
    ///
    /// Unknown keys come back verbatim.
    pub fn t(&self, key: &str, params: &[(&str, &dyn ToString)]) -> String {
        let found = key
            .split('.')
            .try_fold(&self.catalog, |node, part| node.get(part))
            .and_then(Value::as_str);
        let Some(template) = found else {
            tracing::debug!(key, "missing message");
            return key.to_string();
        };
        params
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), &value.to_string())
            })
    }

    pub fn achievement_name(&self, id: AchievementId) -> String {
        self.t(&id.info().name_key(), &[])
    }

    pub fn achievement_description(&self, id: AchievementId) -> String {
        self.t(&id.info().description_key(), &[])
    }
}
