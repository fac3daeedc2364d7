//! Locale detection and localized kind labels.

use std::fmt;

use crate::issue::Severity;

/// Supported locales for diagnostic kind labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// English (default)
    #[default]
    En,
    /// Russian
    Ru,
    /// Belarusian
    Be,
}

impl Locale {
    /// Detects the locale from the process environment.
    ///
    /// Checks `COLANG_LANG` first, then `LANG`, and falls back to English.
    #[must_use]
    pub fn detect() -> Self {
        if let Ok(lang) = std::env::var("COLANG_LANG")
            && let Some(locale) = Self::parse(&lang)
        {
            return locale;
        }

        if let Ok(lang) = std::env::var("LANG")
            && let Some(locale) = Self::parse(&lang)
        {
            return locale;
        }

        Self::En
    }

    /// Parses a locale from a language tag such as `ru_RU.UTF-8`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let tag = s.to_lowercase();
        if tag.starts_with("en") {
            Some(Self::En)
        } else if tag.starts_with("ru") {
            Some(Self::Ru)
        } else if tag.starts_with("be") {
            Some(Self::Be)
        } else {
            None
        }
    }

    /// The localized label for an issue of the given severity.
    #[must_use]
    pub const fn severity_label(&self, severity: Severity) -> &'static str {
        match (self, severity) {
            (Self::En, Severity::Error) => "error",
            (Self::En, Severity::Warning) => "warning",
            (Self::Ru, Severity::Error) => "ошибка",
            (Self::Ru, Severity::Warning) => "предупреждение",
            (Self::Be, Severity::Error) => "памылка",
            (Self::Be, Severity::Warning) => "папярэджанне",
        }
    }

    /// The localized label for a note.
    #[must_use]
    pub const fn note_label(&self) -> &'static str {
        match self {
            Self::En => "note",
            Self::Ru => "примечание",
            Self::Be => "заўвага",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Ru => write!(f, "ru"),
            Self::Be => write!(f, "be"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Locale::parse("en_US.UTF-8"), Some(Locale::En));
        assert_eq!(Locale::parse("ru_RU.UTF-8"), Some(Locale::Ru));
        assert_eq!(Locale::parse("be_BY.UTF-8"), Some(Locale::Be));
        assert_eq!(Locale::parse("de_DE.UTF-8"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Locale::En.severity_label(Severity::Error), "error");
        assert_eq!(Locale::Ru.severity_label(Severity::Warning), "предупреждение");
        assert_eq!(Locale::Be.note_label(), "заўвага");
    }
}
