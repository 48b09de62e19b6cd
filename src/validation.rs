//! Declaration-time checks for timezone model fields.

use time_tz::{TimeZone, timezones};

use crate::error::{Error, Result};

/// Check that every zone name in `zone_names` fits within `max_length`
/// characters.
///
/// Intended to run when a timezone field is declared, before any user input
/// is seen: a field too short to store a known zone name is a programming
/// mistake, not a validation failure.
///
/// # Errors
/// Returns [Error::FieldTooShort] naming the longest offending zone.
pub fn check_max_length<I, S>(max_length: usize, zone_names: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut longest: Option<(String, usize)> = None;

    for name in zone_names {
        let name = name.as_ref();
        // Lengths are counted in characters to match how a text field's
        // maximum length is declared.
        let length = name.chars().count();

        if longest.as_ref().is_none_or(|(_, longest)| length > *longest) {
            longest = Some((name.to_owned(), length));
        }
    }

    match longest {
        Some((zone, length)) if length > max_length => Err(Error::FieldTooShort {
            max_length,
            length,
            zone,
        }),
        _ => Ok(()),
    }
}

/// Check `max_length` against every zone name in the timezone database.
///
/// This is the check to use for a field whose choices are "all known
/// timezones" rather than an explicit list.
pub fn check_max_length_all_zones(max_length: usize) -> Result<()> {
    check_max_length(max_length, timezones::iter().map(|tz| tz.name()))
}
