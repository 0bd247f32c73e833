//! Per-invocation orchestration.
//!
//! The transport acknowledges the interaction before calling in here;
//! everything below may be slow. Each invocation is an independent unit
//! of work with no shared mutable state, so any number of them can run
//! concurrently without coordination. Either the full message plus
//! attachment reaches the target channel, or nothing does.

use std::time::Duration;

use {
    chrono::Utc,
    tokio::time::timeout,
    tracing::info,
};

use rollcall_common::{CommandError, DeliveryTarget, GroupRef, Snapshot, SystemError, UserError};

use crate::{
    context::AppContext,
    deliver::{DeliveryCandidates, resolve_target},
    encode::build_document,
    enumerate::{enumerate_members, fetch_to_system},
    registry::PlatformArcs,
    timestamp::{filename_stamp, format_instant},
};

/// Discord invalidates the interaction token 15 minutes after the
/// deferred acknowledgment; a follow-up after that is lost.
pub const COMPLETION_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Validated invocation arguments.
#[derive(Debug, Clone)]
pub struct SnapshotArgs {
    pub group: GroupRef,
    pub explicit_channel: Option<u64>,
    pub invocation_channel: u64,
}

/// What a successful invocation produced, for the confirmation reply
/// and diagnostics.
#[derive(Debug, Clone)]
pub struct SnapshotReport {
    pub target: DeliveryTarget,
    pub member_count: usize,
    pub timestamp: String,
    pub filename: String,
}

/// Run the snapshot pipeline under the platform completion window.
/// Exceeding the window is a delivery failure; the invocation is not
/// retried.
pub async fn run_snapshot(
    app: &AppContext,
    platform: &PlatformArcs,
    args: &SnapshotArgs,
) -> Result<SnapshotReport, CommandError> {
    match timeout(COMPLETION_WINDOW, snapshot_pipeline(app, platform, args)).await {
        Ok(result) => result,
        Err(_) => Err(SystemError::DeadlineExceeded.into()),
    }
}

async fn snapshot_pipeline(
    app: &AppContext,
    platform: &PlatformArcs,
    args: &SnapshotArgs,
) -> Result<SnapshotReport, CommandError> {
    let group = &args.group;

    if !platform
        .members
        .group_exists(group)
        .await
        .map_err(fetch_to_system)?
    {
        return Err(UserError::GroupNotFound(group.id).into());
    }

    let members = enumerate_members(platform.members.as_ref(), group).await?;

    // One instant per snapshot. The formatted string goes verbatim into
    // every CSV row, the summary message and the filename stamp.
    let now = Utc::now();
    let snapshot = Snapshot {
        group: group.clone(),
        taken_at: format_instant(now, app.config.timezone, &app.config.datetime_format),
        members,
        locale: app.config.locale.as_str().to_string(),
        timezone: app.config.timezone.name().to_string(),
    };
    let document = build_document(&snapshot, &filename_stamp(now, app.config.timezone))?;

    let target = resolve_target(
        DeliveryCandidates {
            explicit: args.explicit_channel,
            configured_default: app.config.default_channel,
            invocation_channel: args.invocation_channel,
        },
        platform.gate.as_ref(),
    )
    .await?;

    let summary = compose_summary(app, group, snapshot.members.len(), &snapshot.taken_at);
    platform
        .sink
        .send_document(target.channel, &summary, &document)
        .await
        .map_err(|e| SystemError::SendFailed(Box::new(e)))?;

    info!(
        group = %group.name,
        members = snapshot.members.len(),
        channel = target.channel,
        source = target.source.as_str(),
        "snapshot delivered"
    );

    Ok(SnapshotReport {
        target,
        member_count: snapshot.members.len(),
        timestamp: snapshot.taken_at,
        filename: document.filename,
    })
}

fn compose_summary(app: &AppContext, group: &GroupRef, count: usize, timestamp: &str) -> String {
    let locale = app.config.locale;
    let header = app.catalog.render(
        locale,
        "post.header",
        &[("role", group.name.as_str()), ("count", &count.to_string())],
    );
    let stamp_line = app
        .catalog
        .render(locale, "post.timestamp", &[("timestamp", timestamp)]);
    format!("{header}\n{stamp_line}")
}
