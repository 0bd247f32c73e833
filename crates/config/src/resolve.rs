use std::path::PathBuf;

use {
    chrono::format::{Item, StrftimeItems},
    chrono_tz::Tz,
    secrecy::SecretString,
    tracing::warn,
};

use {rollcall_common::ConfigError, rollcall_i18n::Locale};

use crate::schema::RollcallConfig;

/// Immutable configuration resolved once at startup and threaded by
/// reference into every handler. No ambient globals.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub token: SecretString,
    pub default_channel: Option<u64>,
    pub locale: Locale,
    pub timezone: Tz,
    /// The effective strftime pattern: a validated explicit override,
    /// or the locale default.
    pub datetime_format: String,
    pub lang_file: Option<PathBuf>,
}

/// Environment overrides. Variable names follow the bot's `.env`
/// contract; env values win over file values.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub token: Option<String>,
    pub default_channel_id: Option<String>,
    pub locale: Option<String>,
    pub timezone: Option<String>,
    pub datetime_format: Option<String>,
    pub lang_file: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            token: non_empty_var("DISCORD_TOKEN"),
            default_channel_id: non_empty_var("DEFAULT_CHANNEL_ID"),
            locale: non_empty_var("BOT_LANG"),
            timezone: non_empty_var("BOT_TZ"),
            datetime_format: non_empty_var("BOT_DATEFMT"),
            lang_file: non_empty_var("LANG_FILE"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve file + environment into the immutable startup configuration.
///
/// Only a missing token is fatal — it has no usable fallback. Every
/// other bad value is logged and substituted: unknown locale → `en`,
/// invalid timezone → UTC, invalid pattern → locale default, unparsable
/// default channel id → none.
pub fn resolve(file: RollcallConfig, env: EnvOverrides) -> Result<ResolvedConfig, ConfigError> {
    let token = env
        .token
        .or(file.discord.token)
        // An unresolved `${...}` placeholder is not a token.
        .filter(|t| !t.trim().is_empty() && !t.contains("${"))
        .ok_or(ConfigError::MissingToken)?;

    let locale = resolve_locale(env.locale.or(file.format.locale));
    let timezone = resolve_timezone(env.timezone.or(file.format.timezone));
    let datetime_format = resolve_pattern(env.datetime_format.or(file.format.datetime_format), locale);
    let default_channel = resolve_default_channel(env.default_channel_id.or(file.discord.default_channel_id));
    let lang_file = env.lang_file.or(file.lang_file).map(PathBuf::from);

    Ok(ResolvedConfig {
        token: SecretString::new(token),
        default_channel,
        locale,
        timezone,
        datetime_format,
        lang_file,
    })
}

fn resolve_locale(raw: Option<String>) -> Locale {
    let Some(code) = raw else {
        return Locale::default();
    };
    match Locale::parse(&code) {
        Some(locale) => locale,
        None => {
            let err = ConfigError::InvalidLocale(code);
            warn!(error = %err, fallback = Locale::default().as_str(), "using fallback locale");
            Locale::default()
        },
    }
}

fn resolve_timezone(raw: Option<String>) -> Tz {
    let Some(id) = raw else {
        return Tz::UTC;
    };
    match id.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            let err = ConfigError::InvalidTimezone(id);
            warn!(error = %err, "using UTC");
            Tz::UTC
        },
    }
}

fn resolve_pattern(raw: Option<String>, locale: Locale) -> String {
    let Some(pattern) = raw else {
        return locale.default_datetime_pattern().to_string();
    };
    if pattern_is_valid(&pattern) {
        pattern
    } else {
        let err = ConfigError::InvalidPattern(pattern);
        warn!(error = %err, fallback = locale.default_datetime_pattern(), "using locale default pattern");
        locale.default_datetime_pattern().to_string()
    }
}

/// A pattern is usable when chrono's strftime parser accepts every item.
/// Validating here keeps per-invocation formatting infallible.
fn pattern_is_valid(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

fn resolve_default_channel(raw: Option<String>) -> Option<u64> {
    let id = raw?;
    match id.parse::<u64>() {
        Ok(parsed) if parsed != 0 => Some(parsed),
        _ => {
            let err = ConfigError::InvalidChannelId(id);
            warn!(error = %err, "ignoring configured default channel");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_token() -> EnvOverrides {
        EnvOverrides {
            token: Some("tok".to_string()),
            ..EnvOverrides::default()
        }
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let result = resolve(RollcallConfig::default(), EnvOverrides::default());
        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_unresolved_placeholder_is_not_a_token() {
        let mut file = RollcallConfig::default();
        file.discord.token = Some("${DISCORD_TOKEN}".to_string());
        let result = resolve(file, EnvOverrides::default());
        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_defaults_without_any_settings() {
        let config = resolve(RollcallConfig::default(), with_token()).unwrap();
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.datetime_format, "%Y-%m-%d %H:%M:%S");
        assert!(config.default_channel.is_none());
        assert!(config.lang_file.is_none());
    }

    #[test]
    fn test_locale_drives_default_pattern() {
        let env = EnvOverrides {
            locale: Some("de".to_string()),
            ..with_token()
        };
        let config = resolve(RollcallConfig::default(), env).unwrap();
        assert_eq!(config.locale, Locale::De);
        assert_eq!(config.datetime_format, "%d.%m.%Y %H:%M:%S");
    }

    #[test]
    fn test_explicit_pattern_wins_over_locale() {
        let env = EnvOverrides {
            locale: Some("de".to_string()),
            datetime_format: Some("%Y/%m/%d".to_string()),
            ..with_token()
        };
        let config = resolve(RollcallConfig::default(), env).unwrap();
        assert_eq!(config.datetime_format, "%Y/%m/%d");
    }

    #[test]
    fn test_invalid_pattern_falls_back_to_locale_default() {
        let env = EnvOverrides {
            locale: Some("de".to_string()),
            datetime_format: Some("%d.%m.%Y %Q".to_string()),
            ..with_token()
        };
        let config = resolve(RollcallConfig::default(), env).unwrap();
        assert_eq!(config.datetime_format, "%d.%m.%Y %H:%M:%S");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_en() {
        let env = EnvOverrides {
            locale: Some("fr".to_string()),
            ..with_token()
        };
        let config = resolve(RollcallConfig::default(), env).unwrap();
        assert_eq!(config.locale, Locale::En);
    }

    #[test]
    fn test_invalid_timezone_falls_back_to_utc() {
        let env = EnvOverrides {
            timezone: Some("Mars/Olympus_Mons".to_string()),
            ..with_token()
        };
        let config = resolve(RollcallConfig::default(), env).unwrap();
        assert_eq!(config.timezone, Tz::UTC);
    }

    #[test]
    fn test_valid_timezone_is_kept() {
        let env = EnvOverrides {
            timezone: Some("Europe/Berlin".to_string()),
            ..with_token()
        };
        let config = resolve(RollcallConfig::default(), env).unwrap();
        assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
    }

    #[test]
    fn test_bad_default_channel_is_ignored() {
        let env = EnvOverrides {
            default_channel_id: Some("not-a-number".to_string()),
            ..with_token()
        };
        let config = resolve(RollcallConfig::default(), env).unwrap();
        assert!(config.default_channel.is_none());
    }

    #[test]
    fn test_env_wins_over_file() {
        let mut file = RollcallConfig::default();
        file.format.locale = Some("de".to_string());
        file.discord.default_channel_id = Some("111".to_string());
        let env = EnvOverrides {
            locale: Some("en".to_string()),
            default_channel_id: Some("222".to_string()),
            ..with_token()
        };
        let config = resolve(file, env).unwrap();
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.default_channel, Some(222));
    }
}
