//! Command registry.
//!
//! Maps a command name to a boxed async handler so the pipeline stays
//! decoupled from the transport's dispatch mechanism. The transport
//! validates arguments, binds the platform handles and looks the
//! handler up by the wire-level command name.

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use rollcall_common::CommandError;

use crate::{
    context::AppContext,
    dispatch::{SnapshotArgs, SnapshotReport, run_snapshot},
    platform::{ChannelGate, DocumentSink, MemberSource},
};

/// Wire name of the snapshot command.
pub const SNAPSHOT_COMMAND: &str = "snapshot";

/// Per-invocation platform handles supplied by the transport.
#[derive(Clone)]
pub struct PlatformArcs {
    pub members: Arc<dyn MemberSource>,
    pub gate: Arc<dyn ChannelGate>,
    pub sink: Arc<dyn DocumentSink>,
}

/// Everything a handler receives: the startup context, the validated
/// arguments and the platform bound to this invocation.
pub struct CommandContext {
    pub app: Arc<AppContext>,
    pub args: SnapshotArgs,
    pub platform: PlatformArcs,
}

pub type CommandResult = Result<SnapshotReport, CommandError>;

/// A boxed async command handler.
pub type HandlerFn =
    Box<dyn Fn(CommandContext) -> Pin<Box<dyn Future<Output = CommandResult> + Send>> + Send + Sync>;

#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, HandlerFn>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in commands installed.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(
            SNAPSHOT_COMMAND,
            Box::new(|ctx| {
                Box::pin(async move { run_snapshot(&ctx.app, &ctx.platform, &ctx.args).await })
            }),
        );
        registry
    }

    pub fn register(&mut self, name: &'static str, handler: HandlerFn) {
        self.handlers.insert(name, handler);
    }

    pub fn get(&self, name: &str) -> Option<&HandlerFn> {
        self.handlers.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }
}
