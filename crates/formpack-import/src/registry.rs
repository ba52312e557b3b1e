//! Known formpacks and supported locales.

use serde::{Deserialize, Serialize};

/// Formpack identifiers shipped with this build.
pub const FORMPACK_IDS: &[&str] = &["doctor-letter", "notfallpass", "offlabel-antrag"];

/// UI locales a record can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLocale {
    De,
    En,
}

impl SupportedLocale {
    pub const ALL: &'static [SupportedLocale] = &[SupportedLocale::De, SupportedLocale::En];

    pub fn code(&self) -> &'static str {
        match self {
            SupportedLocale::De => "de",
            SupportedLocale::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.code() == code)
    }
}

/// Locales accepted by default.
pub const SUPPORTED_LOCALES: &[SupportedLocale] = SupportedLocale::ALL;

pub fn is_supported_locale(code: &str) -> bool {
    SupportedLocale::from_code(code).is_some()
}

/// Options for an import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Formpack ids this application knows about. Ids outside this set are
    /// reported as unknown rather than mismatched.
    pub formpack_ids: Vec<String>,
    /// Locales a record may be stored in.
    pub locales: Vec<SupportedLocale>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            formpack_ids: FORMPACK_IDS.iter().map(|id| id.to_string()).collect(),
            locales: SUPPORTED_LOCALES.to_vec(),
        }
    }
}

impl ImportOptions {
    pub fn is_known_formpack(&self, id: &str) -> bool {
        self.formpack_ids.iter().any(|known| known == id)
    }

    /// Parses `code` and checks it against the configured locales.
    pub fn accepted_locale(&self, code: &str) -> Option<SupportedLocale> {
        SupportedLocale::from_code(code).filter(|locale| self.locales.contains(locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_codes() {
        assert_eq!(SupportedLocale::from_code("de"), Some(SupportedLocale::De));
        assert_eq!(SupportedLocale::from_code("en"), Some(SupportedLocale::En));
        assert!(!is_supported_locale("fr"));
        assert!(!is_supported_locale("DE"));
        assert!(!is_supported_locale(""));
    }

    #[test]
    fn locale_serializes_as_code() {
        assert_eq!(serde_json::to_string(&SupportedLocale::De).unwrap(), "\"de\"");
    }

    #[test]
    fn default_options_know_shipped_formpacks() {
        let options = ImportOptions::default();
        for id in FORMPACK_IDS {
            assert!(options.is_known_formpack(id));
        }
        assert!(!options.is_known_formpack("unknown"));
    }

    #[test]
    fn default_options_accept_every_locale() {
        let options = ImportOptions::default();
        assert_eq!(options.accepted_locale("de"), Some(SupportedLocale::De));
        assert_eq!(options.accepted_locale("en"), Some(SupportedLocale::En));
        assert_eq!(options.accepted_locale("fr"), None);
    }

    #[test]
    fn restricted_locales_are_honoured() {
        let options = ImportOptions {
            locales: vec![SupportedLocale::De],
            ..ImportOptions::default()
        };
        assert_eq!(options.accepted_locale("de"), Some(SupportedLocale::De));
        assert_eq!(options.accepted_locale("en"), None);
    }
}
