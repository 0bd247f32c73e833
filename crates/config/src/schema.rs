use serde::{Deserialize, Serialize};

/// Root configuration file schema (`rollcall.toml` and friends).
/// Every field is optional; environment variables override file values
/// and resolution applies the documented fallbacks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RollcallConfig {
    pub discord: DiscordConfig,
    pub format: FormatConfig,
    /// Path to a JSON message-catalog override.
    pub lang_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token. `${DISCORD_TOKEN}` placeholders are substituted before
    /// parsing, and the `DISCORD_TOKEN` variable itself wins over this.
    pub token: Option<String>,

    /// Fallback channel for snapshot uploads when the invocation gives
    /// no channel argument. Kept as a string so ids survive every
    /// config format and env overrides unchanged.
    pub default_channel_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Message locale ("de" or "en").
    pub locale: Option<String>,

    /// IANA timezone identifier (e.g. "Europe/Berlin").
    pub timezone: Option<String>,

    /// strftime pattern overriding the locale default.
    pub datetime_format: Option<String>,
}
