//! Platform seams. The pipeline talks to the hosting platform only
//! through these traits; the transport crate binds them to a live
//! client per invocation, tests bind them to in-memory fakes.

use {
    async_trait::async_trait,
    rollcall_common::{CsvDocument, GroupRef, MemberRecord},
};

/// Why member enumeration failed upstream.
#[derive(Debug, thiserror::Error)]
pub enum MemberFetchError {
    /// The client lacks the privileged member-list capability. This is
    /// a config-time precondition; enumeration fails fast rather than
    /// returning whatever happens to be cached.
    #[error("member-list access not granted")]
    AccessMissing,

    #[error("member fetch failed")]
    Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Full member enumeration for one guild.
///
/// Implementations must fetch the member list to exhaustion before
/// returning; a partial page must never be returned as the full set.
#[async_trait]
pub trait MemberSource: Send + Sync {
    /// True if the group currently exists in the guild.
    async fn group_exists(&self, group: &GroupRef) -> Result<bool, MemberFetchError>;

    /// All members currently holding the group, in platform order.
    /// Empty is a valid, successful result.
    async fn members_of(&self, group: &GroupRef) -> Result<Vec<MemberRecord>, MemberFetchError>;
}

/// Why a delivery candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    /// Channel does not exist or is not visible to the client.
    NotFound,
    /// Channel belongs to a different guild.
    ForeignGuild,
    /// Missing View Channel, Send Messages or Attach Files.
    MissingPermissions,
}

impl GateRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::ForeignGuild => "foreign-guild",
            Self::MissingPermissions => "missing-permissions",
        }
    }
}

/// Validates posting rights on a delivery candidate.
#[async_trait]
pub trait ChannelGate: Send + Sync {
    async fn validate(&self, channel: u64) -> Result<(), GateRejection>;
}

#[derive(Debug, thiserror::Error)]
#[error("send to channel {channel} failed")]
pub struct SinkError {
    pub channel: u64,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Sends the final summary text plus attachment in one message.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn send_document(
        &self,
        channel: u64,
        text: &str,
        document: &CsvDocument,
    ) -> Result<(), SinkError>;
}
