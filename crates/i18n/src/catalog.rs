use std::{collections::HashMap, path::Path};

use tracing::warn;

use crate::Locale;

/// Message catalog: locale → key → template. Built once at startup and
/// threaded through the application context; lookups never fail — a
/// missing entry falls back to `en`, then to the key itself.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: HashMap<Locale, HashMap<String, String>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The built-in catalog with both supported locales fully populated.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert(Locale::De, de_messages());
        entries.insert(Locale::En, en_messages());
        Self { entries }
    }

    /// Built-ins overlaid with entries from a JSON catalog file of the
    /// shape `{"de": {"key": "text"}, "en": {...}}`. A missing or
    /// malformed file keeps the built-ins; unknown locale codes in the
    /// file are skipped. Both cases are logged, never surfaced to users.
    pub fn load_or_builtin(path: &Path) -> Self {
        let mut catalog = Self::builtin();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "catalog file unreadable, using built-ins");
                return catalog;
            },
        };
        let parsed: HashMap<String, HashMap<String, String>> = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "catalog file malformed, using built-ins");
                return catalog;
            },
        };
        for (code, messages) in parsed {
            match Locale::parse(&code) {
                Some(locale) => {
                    catalog.entries.entry(locale).or_default().extend(messages);
                },
                None => warn!(locale = %code, "unknown locale in catalog file, skipped"),
            }
        }
        catalog
    }

    /// Look up a message template.
    pub fn text<'a>(&'a self, locale: Locale, key: &'a str) -> &'a str {
        self.entries
            .get(&locale)
            .and_then(|m| m.get(key))
            .or_else(|| self.entries.get(&Locale::En).and_then(|m| m.get(key)))
            .map(String::as_str)
            .unwrap_or(key)
    }

    /// Fill `{placeholder}` slots in a template.
    pub fn render(&self, locale: Locale, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.text(locale, key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

fn de_messages() -> HashMap<String, String> {
    to_map(&[
        (
            "cmd.description",
            "CSV-Snapshot aller Mitglieder mit einer Rolle; Upload in einen Kanal.",
        ),
        ("arg.role", "Rolle, deren Mitglieder erfasst werden"),
        (
            "arg.channel",
            "(Optional) Zielkanal für die CSV (sonst Default- oder aktueller Kanal)",
        ),
        (
            "err.guild_only",
            "❌ Dieser Befehl kann nur in einem Server genutzt werden.",
        ),
        (
            "err.need_manage_guild",
            "❌ Du benötigst die Berechtigung **Server verwalten**.",
        ),
        (
            "err.role_not_found",
            "❌ Diese Rolle existiert in diesem Server nicht (mehr).",
        ),
        (
            "err.missing_perms",
            "❌ Fehlende Rechte in {channel} (Nachrichten senden / Dateien anhängen / Kanal ansehen).",
        ),
        ("err.no_target_channel", "❌ Konnte keinen Zielkanal ermitteln."),
        (
            "err.snapshot_failed",
            "❌ Der Snapshot konnte nicht erstellt werden. Bitte versuche es erneut.",
        ),
        ("ok.posted", "✅ Snapshot erstellt und in {channel} gepostet."),
        ("post.header", "📸 Snapshot für Rolle {role} – {count} Nutzer"),
        ("post.timestamp", "🕒 Erstellt am: {timestamp}"),
    ])
}

fn en_messages() -> HashMap<String, String> {
    to_map(&[
        (
            "cmd.description",
            "CSV snapshot of members with a role; uploads to a channel.",
        ),
        ("arg.role", "Role whose members to snapshot"),
        (
            "arg.channel",
            "(Optional) Target channel for the CSV (else default/current)",
        ),
        ("err.guild_only", "❌ This command can only be used in a server."),
        (
            "err.need_manage_guild",
            "❌ You need the **Manage Server** permission.",
        ),
        (
            "err.role_not_found",
            "❌ That role does not exist in this server (anymore).",
        ),
        (
            "err.missing_perms",
            "❌ Missing permissions in {channel} (Send Messages / Attach Files / View Channel).",
        ),
        ("err.no_target_channel", "❌ Could not determine a target channel."),
        (
            "err.snapshot_failed",
            "❌ The snapshot could not be created. Please try again.",
        ),
        ("ok.posted", "✅ Snapshot created and posted in {channel}."),
        ("post.header", "📸 Snapshot for role {role} – {count} members"),
        ("post.timestamp", "🕒 Created at: {timestamp}"),
    ])
}

fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_locales_cover_the_same_keys() {
        let de = de_messages();
        let en = en_messages();
        let mut de_keys: Vec<_> = de.keys().collect();
        let mut en_keys: Vec<_> = en.keys().collect();
        de_keys.sort();
        en_keys.sort();
        assert_eq!(de_keys, en_keys);
    }

    #[test]
    fn test_text_lookup_and_en_fallback() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.text(Locale::De, "post.timestamp"),
            "🕒 Erstellt am: {timestamp}"
        );
        // Unknown key falls through to the key itself.
        assert_eq!(catalog.text(Locale::De, "no.such.key"), "no.such.key");
    }

    #[test]
    fn test_render_fills_placeholders() {
        let catalog = Catalog::builtin();
        let text = catalog.render(
            Locale::En,
            "post.header",
            &[("role", "Member"), ("count", "2")],
        );
        assert_eq!(text, "📸 Snapshot for role Member – 2 members");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let catalog = Catalog::builtin();
        let text = catalog.render(Locale::En, "ok.posted", &[]);
        assert!(text.contains("{channel}"));
    }

    #[test]
    fn test_file_override_merges_over_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lang.json");
        std::fs::write(
            &path,
            r#"{"en": {"ok.posted": "posted to {channel}"}, "xx": {"ok.posted": "?"}}"#,
        )
        .unwrap();

        let catalog = Catalog::load_or_builtin(&path);
        assert_eq!(catalog.text(Locale::En, "ok.posted"), "posted to {channel}");
        // Untouched keys keep their built-in text.
        assert_eq!(
            catalog.text(Locale::En, "post.timestamp"),
            "🕒 Created at: {timestamp}"
        );
    }

    #[test]
    fn test_missing_file_keeps_builtins() {
        let catalog = Catalog::load_or_builtin(Path::new("/nonexistent/lang.json"));
        assert_eq!(
            catalog.text(Locale::En, "post.timestamp"),
            "🕒 Created at: {timestamp}"
        );
    }
}
