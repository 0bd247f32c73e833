//! Localization provider.
//!
//! Maps a locale code to message templates and a default date/time
//! pattern. Two locales ship built in; an optional JSON catalog file
//! can override individual messages.

mod catalog;
mod locale;

pub use catalog::Catalog;
pub use locale::Locale;
