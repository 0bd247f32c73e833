//! Platform trait implementations over a live serenity context.
//!
//! One [`GuildPlatform`] is built per invocation and bound to the guild
//! the command came from; invocations never share adapter state.

use std::sync::Arc;

use {
    async_trait::async_trait,
    serenity::{
        all::{
            Cache, Channel, ChannelId, Context, CreateAllowedMentions, CreateAttachment,
            CreateMessage, GuildId, Http, Permissions, RoleId, UserId,
        },
        http::{HttpError, StatusCode},
    },
};

use {
    rollcall_common::{CsvDocument, GroupRef, MemberRecord},
    rollcall_snapshot::platform::{
        ChannelGate, DocumentSink, GateRejection, MemberFetchError, MemberSource, SinkError,
    },
};

/// Largest member page the list endpoint serves; a shorter page marks
/// the end of the list.
const MEMBER_PAGE_SIZE: u64 = 1000;

/// Permissions the bot needs in a delivery channel.
const POST_PERMISSIONS: Permissions = Permissions::VIEW_CHANNEL
    .union(Permissions::SEND_MESSAGES)
    .union(Permissions::ATTACH_FILES);

pub struct GuildPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
    guild_id: GuildId,
    bot_user: UserId,
}

impl GuildPlatform {
    pub fn new(ctx: &Context, guild_id: GuildId) -> Self {
        let bot_user = ctx.cache.current_user().id;
        Self {
            http: Arc::clone(&ctx.http),
            cache: Arc::clone(&ctx.cache),
            guild_id,
            bot_user,
        }
    }

    /// Page through the guild member list until exhaustion. Partial
    /// pages never leak out as a complete result.
    async fn fetch_all_members(&self) -> Result<Vec<serenity::all::Member>, MemberFetchError> {
        let mut all = Vec::new();
        let mut after: Option<UserId> = None;
        loop {
            let batch = self
                .guild_id
                .members(&self.http, Some(MEMBER_PAGE_SIZE), after)
                .await
                .map_err(member_fetch_error)?;
            let page_len = batch.len() as u64;
            after = batch.last().map(|m| m.user.id);
            all.extend(batch);
            if page_len < MEMBER_PAGE_SIZE {
                return Ok(all);
            }
        }
    }
}

/// The member-list endpoint answers 403 when the privileged members
/// capability was not granted in the developer portal.
fn member_fetch_error(err: serenity::Error) -> MemberFetchError {
    if let serenity::Error::Http(HttpError::UnsuccessfulRequest(ref response)) = err
        && response.status_code == StatusCode::FORBIDDEN
    {
        return MemberFetchError::AccessMissing;
    }
    MemberFetchError::Upstream(Box::new(err))
}

#[async_trait]
impl MemberSource for GuildPlatform {
    async fn group_exists(&self, group: &GroupRef) -> Result<bool, MemberFetchError> {
        let roles = self
            .guild_id
            .roles(&self.http)
            .await
            .map_err(|e| MemberFetchError::Upstream(Box::new(e)))?;
        Ok(roles.contains_key(&RoleId::new(group.id)))
    }

    async fn members_of(&self, group: &GroupRef) -> Result<Vec<MemberRecord>, MemberFetchError> {
        let role_id = RoleId::new(group.id);
        let members = self.fetch_all_members().await?;
        Ok(members
            .into_iter()
            .filter(|m| m.roles.contains(&role_id))
            .map(|m| MemberRecord {
                id: m.user.id.to_string(),
                display_name: m.display_name().to_string(),
            })
            .collect())
    }
}

#[async_trait]
impl ChannelGate for GuildPlatform {
    async fn validate(&self, channel: u64) -> Result<(), GateRejection> {
        if channel == 0 {
            return Err(GateRejection::NotFound);
        }
        let channel = match ChannelId::new(channel).to_channel(&self.http).await {
            Ok(Channel::Guild(channel)) => channel,
            Ok(_) | Err(_) => return Err(GateRejection::NotFound),
        };
        if channel.guild_id != self.guild_id {
            return Err(GateRejection::ForeignGuild);
        }
        let member = self
            .guild_id
            .member(&self.http, self.bot_user)
            .await
            .map_err(|_| GateRejection::NotFound)?;

        // Cache lookups are synchronous; the guild ref must not be held
        // across an await.
        let permissions = {
            let Some(guild) = self.cache.guild(self.guild_id) else {
                return Err(GateRejection::NotFound);
            };
            guild.user_permissions_in(&channel, &member)
        };
        if permissions.contains(POST_PERMISSIONS) {
            Ok(())
        } else {
            Err(GateRejection::MissingPermissions)
        }
    }
}

#[async_trait]
impl DocumentSink for GuildPlatform {
    async fn send_document(
        &self,
        channel: u64,
        text: &str,
        document: &CsvDocument,
    ) -> Result<(), SinkError> {
        let message = CreateMessage::new()
            .content(text)
            .add_file(CreateAttachment::bytes(
                document.bytes.clone(),
                document.filename.clone(),
            ))
            // Role and user mentions in the summary stay visual only.
            .allowed_mentions(CreateAllowedMentions::new());
        ChannelId::new(channel)
            .send_message(&self.http, message)
            .await
            .map(|_| ())
            .map_err(|e| SinkError {
                channel,
                source: Box::new(e),
            })
    }
}
