//! Discord transport.
//!
//! Owns the serenity gateway client, registers the slash command and
//! translates interactions into registry invocations. The pipeline's
//! platform traits are bound to the live guild context per invocation.

mod adapters;
mod commands;
mod handler;

pub use handler::start_client;
