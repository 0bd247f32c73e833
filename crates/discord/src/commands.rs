use serenity::all::{ChannelType, CommandOptionType, CreateCommand, CreateCommandOption};

use {
    rollcall_i18n::{Catalog, Locale},
    rollcall_snapshot::SNAPSHOT_COMMAND,
};

/// Option names on the wire.
pub const OPTION_ROLE: &str = "role";
pub const OPTION_CHANNEL: &str = "channel";

/// The global `/snapshot` command definition, described in the
/// configured locale.
pub fn snapshot_command(catalog: &Catalog, locale: Locale) -> CreateCommand {
    CreateCommand::new(SNAPSHOT_COMMAND)
        .description(catalog.text(locale, "cmd.description"))
        .dm_permission(false)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Role,
                OPTION_ROLE,
                catalog.text(locale, "arg.role"),
            )
            .required(true),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Channel,
                OPTION_CHANNEL,
                catalog.text(locale, "arg.channel"),
            )
            .channel_types(vec![ChannelType::Text])
            .required(false),
        )
}
