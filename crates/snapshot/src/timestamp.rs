//! Timezone-aware timestamp rendering.
//!
//! The dispatcher samples "now" exactly once per snapshot; the resulting
//! string is reused verbatim for the summary message, every CSV row and
//! the filename stamp. Timezone and pattern come pre-validated from the
//! startup configuration, so rendering here is infallible.

use {
    chrono::{DateTime, Utc},
    chrono_tz::Tz,
};

/// Pattern for the filesystem-safe stamp embedded in filenames.
const FILENAME_PATTERN: &str = "%Y-%m-%d_%H-%M-%S";

/// Render the captured instant in the configured timezone and pattern.
pub fn format_instant(instant: DateTime<Utc>, tz: Tz, pattern: &str) -> String {
    instant.with_timezone(&tz).format(pattern).to_string()
}

/// Filesystem-safe stamp of the same instant, in the same timezone.
pub fn filename_stamp(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(FILENAME_PATTERN).to_string()
}
