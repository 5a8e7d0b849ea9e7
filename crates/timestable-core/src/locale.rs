//! Supported interface locales.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A supported locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
    De,
    Ja,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::Zh, Locale::En, Locale::De, Locale::Ja];

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
            Locale::De => "de",
            Locale::Ja => "ja",
        }
    }

    /// Name of the language in that language.
    pub fn native_name(&self) -> &'static str {
        match self {
            Locale::Zh => "中文",
            Locale::En => "English",
            Locale::De => "Deutsch",
            Locale::Ja => "日本語",
        }
    }

    /// Voice tag handed to the speech backend.
    pub fn voice(&self) -> &'static str {
        match self {
            Locale::Zh => "zh-CN",
            Locale::En => "en-US",
            Locale::De => "de-DE",
            Locale::Ja => "ja-JP",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        // Accept region-qualified tags like "en-US" or "zh_CN".
        let primary = lower.split(['-', '_']).next().unwrap_or_default();
        Locale::ALL
            .into_iter()
            .find(|l| l.tag() == primary)
            .ok_or_else(|| format!("unsupported locale: {s}"))
    }
}
