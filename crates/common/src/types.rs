//! Core value types flowing through the snapshot pipeline.

/// A role to snapshot, as supplied by the invocation. Immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRef {
    pub id: u64,
    pub name: String,
}

/// One member holding the group at snapshot time. The id is the
/// platform's opaque stable identifier, rendered as a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub id: String,
    pub display_name: String,
}

/// The transient per-invocation dataset: one captured instant shared by
/// every record. Constructed fresh for each invocation, never persisted.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub group: GroupRef,
    /// The formatted creation instant. Captured once; every CSV row and
    /// the summary message reuse this exact string.
    pub taken_at: String,
    pub members: Vec<MemberRecord>,
    pub locale: String,
    pub timezone: String,
}

/// Encoded CSV artifact plus its suggested filename. Derived
/// deterministically from a snapshot; immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// How the delivery channel was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// The invocation supplied a channel argument.
    Explicit,
    /// The configured fallback channel.
    ConfiguredDefault,
    /// The channel the invocation itself occurred in.
    InvocationChannel,
}

impl ResolutionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::ConfiguredDefault => "configured-default",
            Self::InvocationChannel => "invocation-channel",
        }
    }
}

/// The validated destination channel for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryTarget {
    pub channel: u64,
    pub source: ResolutionSource,
}
