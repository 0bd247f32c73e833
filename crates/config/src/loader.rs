use std::path::{Path, PathBuf};

use tracing::debug;

use rollcall_common::ConfigError;

use crate::schema::RollcallConfig;

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "rollcall.toml",
    "rollcall.yaml",
    "rollcall.yml",
    "rollcall.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<RollcallConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. the explicit path, when one was given on the command line
/// 2. `./rollcall.{toml,yaml,yml,json}` (project-local)
/// 3. `~/.config/rollcall/rollcall.{toml,yaml,yml,json}` (user-global)
///
/// No file anywhere is fine — the environment alone can carry a full
/// configuration. A file that exists but fails to parse is a hard error.
pub fn discover_and_load(explicit: Option<&Path>) -> Result<RollcallConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        return load_config(&path);
    }
    debug!("no config file found, using defaults and environment");
    Ok(RollcallConfig::default())
}

fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dir) = home_dir().map(|h| h.join(".config").join("rollcall")) {
        for name in CONFIG_FILENAMES {
            let p = dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> Result<RollcallConfig, ConfigError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    let parse_err = |message: String| ConfigError::Parse {
        path: path.display().to_string(),
        message,
    };

    match ext {
        "toml" => toml::from_str(raw).map_err(|e| parse_err(e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| parse_err(e.to_string())),
        "json" => serde_json::from_str(raw).map_err(|e| parse_err(e.to_string())),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Replace `${ENV_VAR}` placeholders in the raw config text.
/// Unresolvable or malformed placeholders are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        let Some(end) = tail.find('}') else {
            // No closing brace: emit the remainder verbatim.
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &tail[..end];
        match lookup(name) {
            Some(value) if !name.is_empty() => out.push_str(&value),
            _ => {
                out.push_str("${");
                out.push_str(name);
                out.push('}');
            },
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_env(name: &str) -> Option<String> {
        match name {
            "ROLLCALL_TEST_TOKEN" => Some("tok-123".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_substitutes_known_var() {
        assert_eq!(
            substitute_with("token = \"${ROLLCALL_TEST_TOKEN}\"", fake_env),
            "token = \"tok-123\""
        );
    }

    #[test]
    fn test_leaves_unknown_var() {
        assert_eq!(substitute_with("${NOPE}", fake_env), "${NOPE}");
    }

    #[test]
    fn test_malformed_placeholders() {
        assert_eq!(substitute_with("${unclosed", fake_env), "${unclosed");
        assert_eq!(substitute_with("a ${} b", fake_env), "a ${} b");
        assert_eq!(substitute_with("plain text", fake_env), "plain text");
    }

    #[test]
    fn test_multiple_placeholders() {
        assert_eq!(
            substitute_with("${ROLLCALL_TEST_TOKEN}/${ROLLCALL_TEST_TOKEN}", fake_env),
            "tok-123/tok-123"
        );
    }

    #[test]
    fn test_load_toml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rollcall.toml");
        std::fs::write(
            &path,
            r#"
            [discord]
            token = "abc"
            default_channel_id = "123456789012345678"

            [format]
            locale = "de"
            timezone = "Europe/Berlin"
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.discord.token.as_deref(), Some("abc"));
        assert_eq!(
            config.discord.default_channel_id.as_deref(),
            Some("123456789012345678")
        );
        assert_eq!(config.format.locale.as_deref(), Some("de"));
        assert_eq!(config.format.timezone.as_deref(), Some("Europe/Berlin"));
        assert!(config.format.datetime_format.is_none());
    }

    #[test]
    fn test_load_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rollcall.json");
        std::fs::write(&path, r#"{"format": {"locale": "en"}}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.format.locale.as_deref(), Some("en"));
        assert!(config.discord.token.is_none());
    }

    #[test]
    fn test_malformed_file_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rollcall.toml");
        std::fs::write(&path, "this is not toml [").unwrap();

        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_a_hard_error() {
        let missing = Path::new("/nonexistent/rollcall.toml");
        assert!(matches!(
            discover_and_load(Some(missing)),
            Err(ConfigError::Io { .. })
        ));
    }
}
