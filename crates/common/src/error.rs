//! Error taxonomy: user mistakes, startup configuration failures and
//! operational faults are kept apart because they are reported through
//! different paths.

use thiserror::Error;

/// Errors attributable to the invoking user. Reported directly and only
/// to the invoker with a localized message; never logged as faults.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("command invoked outside a guild")]
    GuildOnly,

    #[error("invoker lacks the Manage Server permission")]
    ManageServerRequired,

    #[error("role {0} no longer exists in this guild")]
    GroupNotFound(u64),

    /// An explicitly requested channel was invalid or not postable.
    /// Terminal; never silently overridden by fallback.
    #[error("cannot post in channel {0}")]
    ChannelForbidden(u64),

    #[error("no usable target channel")]
    NoTargetChannel,
}

impl UserError {
    /// Catalog key of the localized reply shown to the invoker.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::GuildOnly => "err.guild_only",
            Self::ManageServerRequired => "err.need_manage_guild",
            Self::GroupNotFound(_) => "err.role_not_found",
            Self::ChannelForbidden(_) => "err.missing_perms",
            Self::NoTargetChannel => "err.no_target_channel",
        }
    }
}

/// Operational failures. The user sees a generic localized message; the
/// full cause goes to the log. The invocation aborts without retry.
#[derive(Debug, Error)]
pub enum SystemError {
    /// The client has not been granted the privileged member-list
    /// capability; enumeration fails fast instead of returning a
    /// partial set.
    #[error("member-list access is not granted to this client")]
    MemberAccessMissing,

    #[error("member enumeration failed")]
    EnumerationFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("csv encoding failed")]
    EncodingFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("sending the snapshot failed")]
    SendFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("completion window elapsed before the follow-up was sent")]
    DeadlineExceeded,
}

/// Startup configuration failures. Values with a usable fallback are
/// logged and substituted during resolution; the variants here also
/// serve as the structured payload of those warnings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bot token missing; set DISCORD_TOKEN or [discord].token")]
    MissingToken,

    #[error("unrecognized locale code {0:?}")]
    InvalidLocale(String),

    #[error("invalid IANA timezone {0:?}")]
    InvalidTimezone(String),

    #[error("invalid date/time format pattern {0:?}")]
    InvalidPattern(String),

    #[error("invalid channel id {0:?}")]
    InvalidChannelId(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("unsupported config format: .{0}")]
    UnsupportedFormat(String),
}

/// The per-invocation result error of the dispatcher. Handled entirely
/// within the invocation's own task; never escapes to other invocations.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    System(#[from] SystemError),
}

impl CommandError {
    /// Catalog key of the localized reply shown to the invoker. System
    /// faults all collapse into one generic message; the cause is for
    /// the operator log, not the user.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::User(e) => e.message_key(),
            Self::System(_) => "err.snapshot_failed",
        }
    }

    /// True for faults that should be logged as operational errors.
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_keys_are_stable() {
        assert_eq!(UserError::GuildOnly.message_key(), "err.guild_only");
        assert_eq!(
            UserError::ChannelForbidden(42).message_key(),
            "err.missing_perms"
        );
        assert_eq!(
            UserError::GroupNotFound(7).message_key(),
            "err.role_not_found"
        );
    }

    #[test]
    fn test_system_errors_share_generic_key() {
        let errors: Vec<CommandError> = vec![
            SystemError::MemberAccessMissing.into(),
            SystemError::DeadlineExceeded.into(),
            SystemError::SendFailed("boom".into()).into(),
        ];
        for e in errors {
            assert_eq!(e.message_key(), "err.snapshot_failed");
            assert!(e.is_system());
        }
    }

    #[test]
    fn test_user_errors_are_not_system() {
        let e: CommandError = UserError::NoTargetChannel.into();
        assert!(!e.is_system());
        assert_eq!(e.message_key(), "err.no_target_channel");
    }
}
