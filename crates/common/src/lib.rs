//! Shared data model and error taxonomy for the snapshot pipeline.

pub mod error;
pub mod types;

pub use error::{CommandError, ConfigError, SystemError, UserError};
pub use types::{CsvDocument, DeliveryTarget, GroupRef, MemberRecord, ResolutionSource, Snapshot};
