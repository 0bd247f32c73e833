use serde::{Deserialize, Serialize};

/// Supported message locales. `en` doubles as the fallback for
/// unrecognized configured codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    De,
    #[default]
    En,
}

impl Locale {
    /// Parse a configured locale code. Unrecognized codes yield `None`;
    /// the caller decides on (and logs) the fallback.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "de" => Some(Self::De),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    /// Date/time pattern used when no explicit override is configured.
    pub fn default_datetime_pattern(self) -> &'static str {
        match self {
            Self::De => "%d.%m.%Y %H:%M:%S",
            Self::En => "%Y-%m-%d %H:%M:%S",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codes() {
        assert_eq!(Locale::parse("de"), Some(Locale::De));
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse(" EN "), Some(Locale::En));
    }

    #[test]
    fn test_parse_unknown_code() {
        assert_eq!(Locale::parse("fr"), None);
        assert_eq!(Locale::parse(""), None);
    }

    #[test]
    fn test_default_patterns() {
        assert_eq!(Locale::De.default_datetime_pattern(), "%d.%m.%Y %H:%M:%S");
        assert_eq!(Locale::En.default_datetime_pattern(), "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn test_fallback_locale_is_en() {
        assert_eq!(Locale::default(), Locale::En);
    }
}
