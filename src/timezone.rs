//! Timezone name resolution and the process-wide default timezone.

use std::{env, sync::OnceLock};

use time_tz::{TimeZone, Tz, timezones};

use crate::error::{Error, Result};

/// The environment variable consulted for the process default timezone when
/// [set_default_zone] has not been called.
pub const DEFAULT_ZONE_ENV_VAR: &str = "TZFIELD_TIME_ZONE";

/// A timezone argument that is either a canonical name still to be resolved
/// or an already-resolved handle into the timezone database.
///
/// Every public operation that takes a timezone accepts `impl Into<ZoneRef>`,
/// so callers can pass `"Pacific/Auckland"` and handles interchangeably.
#[derive(Debug, Clone, Copy)]
pub enum ZoneRef<'a> {
    /// A canonical timezone name such as `"America/New_York"`.
    Name(&'a str),
    /// A handle into the timezone database.
    Handle(&'static Tz),
}

impl ZoneRef<'_> {
    /// Resolve this reference to a timezone database handle.
    ///
    /// # Errors
    /// Returns [Error::UnknownZone] when a name does not match any timezone
    /// in the database.
    pub fn resolve(self) -> Result<&'static Tz> {
        match self {
            ZoneRef::Name(name) => resolve(name),
            ZoneRef::Handle(tz) => Ok(tz),
        }
    }

    /// The canonical name of the referenced timezone.
    ///
    /// For the [ZoneRef::Name] variant this is the string as given, whether
    /// or not it resolves.
    pub fn name(&self) -> &str {
        match self {
            ZoneRef::Name(name) => name,
            ZoneRef::Handle(tz) => tz.name(),
        }
    }
}

impl<'a> From<&'a str> for ZoneRef<'a> {
    fn from(name: &'a str) -> Self {
        ZoneRef::Name(name)
    }
}

impl<'a> From<&'a String> for ZoneRef<'a> {
    fn from(name: &'a String) -> Self {
        ZoneRef::Name(name)
    }
}

impl From<&'static Tz> for ZoneRef<'_> {
    fn from(tz: &'static Tz) -> Self {
        ZoneRef::Handle(tz)
    }
}

/// Resolve a canonical timezone name to a timezone database handle.
///
/// # Errors
/// Returns [Error::UnknownZone] when the name does not match any timezone in
/// the database. This is the validation entry point for form fields: reject
/// the value, do not crash.
pub fn resolve(name: &str) -> Result<&'static Tz> {
    timezones::get_by_name(name).ok_or_else(|| Error::UnknownZone(name.to_owned()))
}

static DEFAULT_ZONE: OnceLock<&'static Tz> = OnceLock::new();

/// Set the process default timezone used by
/// [adjust_to_default](crate::adjust_to_default) and
/// [localize_to_default](crate::localize_to_default).
///
/// The default is fixed once read. Calling this after the default has been
/// resolved (by an earlier call or by first use) leaves the existing value in
/// place and logs a warning.
///
/// # Errors
/// Returns [Error::UnknownZone] when a zone name cannot be resolved.
pub fn set_default_zone<'a>(zone: impl Into<ZoneRef<'a>>) -> Result<()> {
    let tz = zone.into().resolve()?;

    if DEFAULT_ZONE.set(tz).is_err() {
        let current = DEFAULT_ZONE.get().map(|tz| tz.name()).unwrap_or("UTC");
        tracing::warn!(
            "default timezone is already {current}, ignoring request to set it to {}",
            tz.name()
        );
    } else {
        tracing::debug!("default timezone set to {}", tz.name());
    }

    Ok(())
}

/// The process default timezone.
///
/// Resolution order: the zone given to [set_default_zone], then the zone
/// named by the [DEFAULT_ZONE_ENV_VAR] environment variable, then UTC. An
/// unknown name in the environment variable falls back to UTC with a warning
/// rather than failing, since this is read lazily from conversion calls.
pub fn default_zone() -> &'static Tz {
    DEFAULT_ZONE.get_or_init(|| match env::var(DEFAULT_ZONE_ENV_VAR) {
        Ok(name) => match timezones::get_by_name(&name) {
            Some(tz) => tz,
            None => {
                tracing::warn!(
                    "{DEFAULT_ZONE_ENV_VAR} names unknown timezone \"{name}\", using UTC"
                );
                timezones::db::UTC
            }
        },
        Err(_) => timezones::db::UTC,
    })
}
