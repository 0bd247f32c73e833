use std::sync::Arc;

use {
    async_trait::async_trait,
    secrecy::ExposeSecret,
    serenity::all::{
        Client, Command, CommandInteraction, Context, CreateInteractionResponse,
        CreateInteractionResponseFollowup, CreateInteractionResponseMessage, EventHandler,
        GatewayIntents, Interaction, Ready,
    },
    tracing::{debug, error, info, warn},
};

use {
    rollcall_common::{CommandError, GroupRef, UserError},
    rollcall_snapshot::{
        AppContext, CommandContext, CommandRegistry, PlatformArcs, SnapshotArgs,
        platform::{ChannelGate, DocumentSink, MemberSource},
    },
};

use crate::{
    adapters::GuildPlatform,
    commands::{OPTION_CHANNEL, OPTION_ROLE, snapshot_command},
};

/// Build and run the serenity client until it disconnects.
///
/// GUILD_MEMBERS is the privileged capability the enumerator depends
/// on; without it the member-list endpoint refuses the fetch and the
/// pipeline reports the distinct access error instead of a partial set.
pub async fn start_client(app: Arc<AppContext>) -> anyhow::Result<()> {
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;
    let token = app.config.token.expose_secret().to_string();
    let handler = Handler {
        app,
        registry: Arc::new(CommandRegistry::with_builtin()),
    };
    let mut client = Client::builder(&token, intents)
        .event_handler(handler)
        .await?;
    client.start().await?;
    Ok(())
}

struct Handler {
    app: Arc<AppContext>,
    registry: Arc<CommandRegistry>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "connected to discord");
        let command = snapshot_command(&self.app.catalog, self.app.config.locale);
        if let Err(e) = Command::create_global_command(&ctx.http, command).await {
            error!(error = %e, "failed to register slash commands");
        }
    }

    // serenity dispatches every event on its own task, so one slow or
    // failing invocation never stalls the others.
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.handle_command(ctx, command).await;
        }
    }
}

impl Handler {
    async fn handle_command(&self, ctx: Context, command: CommandInteraction) {
        let Some(handler) = self.registry.get(command.data.name.as_str()) else {
            warn!(command = %command.data.name, "unknown command");
            return;
        };

        // Gates that must answer before the deferred acknowledgment.
        let Some(guild_id) = command.guild_id else {
            self.respond_now(&ctx, &command, &self.localized_error(&UserError::GuildOnly.into()))
                .await;
            return;
        };
        if !invoker_can_manage_guild(&command) {
            let text = self.localized_error(&UserError::ManageServerRequired.into());
            self.respond_now(&ctx, &command, &text).await;
            return;
        }
        let Some((group, explicit_channel)) = parse_args(&command) else {
            // The role option is declared required; reaching this means
            // the payload was malformed.
            warn!(command = %command.data.name, "missing required role option");
            let text = self
                .app
                .catalog
                .text(self.app.config.locale, "err.snapshot_failed")
                .to_string();
            self.respond_now(&ctx, &command, &text).await;
            return;
        };

        // Acknowledge before any potentially slow operation; the final
        // result arrives as an asynchronous follow-up.
        let defer =
            CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new().ephemeral(true));
        if let Err(e) = command.create_response(&ctx.http, defer).await {
            warn!(error = %e, "failed to acknowledge interaction");
            return;
        }

        let platform = Arc::new(GuildPlatform::new(&ctx, guild_id));
        let members: Arc<dyn MemberSource> = platform.clone();
        let gate: Arc<dyn ChannelGate> = platform.clone();
        let sink: Arc<dyn DocumentSink> = platform;
        let invocation = CommandContext {
            app: Arc::clone(&self.app),
            args: SnapshotArgs {
                group,
                explicit_channel,
                invocation_channel: command.channel_id.get(),
            },
            platform: PlatformArcs { members, gate, sink },
        };

        match handler(invocation).await {
            Ok(report) => {
                let text = self.app.catalog.render(
                    self.app.config.locale,
                    "ok.posted",
                    &[("channel", &format!("<#{}>", report.target.channel))],
                );
                self.follow_up(&ctx, &command, &text).await;
            },
            Err(err) => {
                if err.is_system() {
                    error!(error = ?err, command = %command.data.name, "snapshot invocation failed");
                } else {
                    debug!(error = %err, "invocation rejected");
                }
                let text = self.localized_error(&err);
                self.follow_up(&ctx, &command, &text).await;
            },
        }
    }

    /// Ephemeral direct response, for errors raised before the defer.
    async fn respond_now(&self, ctx: &Context, command: &CommandInteraction, text: &str) {
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(text)
                .ephemeral(true),
        );
        if let Err(e) = command.create_response(&ctx.http, response).await {
            warn!(error = %e, "failed to send interaction response");
        }
    }

    /// Ephemeral follow-up, for anything after the defer.
    async fn follow_up(&self, ctx: &Context, command: &CommandInteraction, text: &str) {
        let follow_up = CreateInteractionResponseFollowup::new()
            .content(text)
            .ephemeral(true);
        if let Err(e) = command.create_followup(&ctx.http, follow_up).await {
            warn!(error = %e, "failed to send follow-up");
        }
    }

    fn localized_error(&self, err: &CommandError) -> String {
        let locale = self.app.config.locale;
        match err {
            CommandError::User(UserError::ChannelForbidden(channel)) => self.app.catalog.render(
                locale,
                err.message_key(),
                &[("channel", &format!("<#{channel}>"))],
            ),
            _ => self.app.catalog.text(locale, err.message_key()).to_string(),
        }
    }
}

/// The invoker needs Manage Server; interaction payloads carry the
/// member's computed permissions.
fn invoker_can_manage_guild(command: &CommandInteraction) -> bool {
    command
        .member
        .as_ref()
        .and_then(|m| m.permissions)
        .is_some_and(|p| p.manage_guild())
}

fn parse_args(command: &CommandInteraction) -> Option<(GroupRef, Option<u64>)> {
    use serenity::all::ResolvedValue;

    let mut group = None;
    let mut channel = None;
    for option in command.data.options() {
        match (option.name, option.value) {
            (OPTION_ROLE, ResolvedValue::Role(role)) => {
                group = Some(GroupRef {
                    id: role.id.get(),
                    name: role.name.clone(),
                });
            },
            (OPTION_CHANNEL, ResolvedValue::Channel(partial)) => {
                channel = Some(partial.id.get());
            },
            _ => {},
        }
    }
    group.map(|g| (g, channel))
}
