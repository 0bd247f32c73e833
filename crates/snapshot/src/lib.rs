//! The snapshot export pipeline.
//!
//! One invocation flows through: member enumeration → single timestamp
//! capture → byte-exact CSV encoding → delivery-target resolution →
//! all-or-nothing send. The hosting platform sits behind the traits in
//! [`platform`]; the transport binds them per invocation and drives the
//! pipeline through the [`registry`].

pub mod context;
pub mod deliver;
pub mod dispatch;
pub mod encode;
pub mod enumerate;
pub mod platform;
pub mod registry;
pub mod timestamp;

pub use context::AppContext;
pub use dispatch::{COMPLETION_WINDOW, SnapshotArgs, SnapshotReport, run_snapshot};
pub use registry::{CommandContext, CommandRegistry, PlatformArcs, SNAPSHOT_COMMAND};
