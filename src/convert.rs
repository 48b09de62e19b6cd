//! Converts timestamps between named timezones.

use time::{OffsetDateTime, PrimitiveDateTime};
use time_tz::{OffsetDateTimeExt, OffsetResult, PrimitiveDateTimeExt, TimeZone, Tz};

use crate::{
    error::{Error, Result},
    timezone::{ZoneRef, default_zone},
};

/// A point in time that either carries an offset or is a bare wall-clock
/// reading with no timezone attached.
///
/// Conversion always produces an aware [OffsetDateTime]; this type only
/// exists on the input side so callers can pass either kind of value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamp {
    /// A wall-clock reading with no timezone. Conversion interprets it as
    /// local time in the source zone.
    Naive(PrimitiveDateTime),
    /// A fully determined instant. Conversion re-expresses it in the target
    /// zone without changing the instant.
    Aware(OffsetDateTime),
}

impl From<PrimitiveDateTime> for Timestamp {
    fn from(value: PrimitiveDateTime) -> Self {
        Timestamp::Naive(value)
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(value: OffsetDateTime) -> Self {
        Timestamp::Aware(value)
    }
}

/// Adjust a timestamp from one timezone into another.
///
/// A naive `value` is first interpreted as local time in `from_zone`, keeping
/// its wall-clock reading. An aware `value` already determines an instant, so
/// `from_zone` plays no part and is not required to resolve. The result is
/// the same instant expressed in `to_zone`.
///
/// # Errors
/// Returns [Error::UnknownZone] when a zone name that is needed for the
/// conversion cannot be resolved, and [Error::SkippedLocalTime] when a naive
/// value has no valid reading in `from_zone` (it falls inside a clock jump
/// such as the start of daylight saving). An ambiguous naive value (read
/// twice when clocks go back) takes the earlier occurrence.
pub fn adjust<'a, 'b>(
    value: impl Into<Timestamp>,
    from_zone: impl Into<ZoneRef<'a>>,
    to_zone: impl Into<ZoneRef<'b>>,
) -> Result<OffsetDateTime> {
    let to_tz = to_zone.into().resolve()?;

    let aware = match value.into() {
        Timestamp::Aware(value) => value,
        Timestamp::Naive(value) => attach_zone(value, from_zone.into().resolve()?)?,
    };

    Ok(aware.to_timezone(to_tz))
}

/// Adjust a timestamp from `from_zone` into the process default timezone.
///
/// Behaves like [adjust] with the target zone omitted; see
/// [default_zone](crate::default_zone) for how the default is chosen.
pub fn adjust_to_default<'a>(
    value: impl Into<Timestamp>,
    from_zone: impl Into<ZoneRef<'a>>,
) -> Result<OffsetDateTime> {
    adjust(value, from_zone, ZoneRef::Handle(default_zone()))
}

/// Express a timestamp read in the process default timezone as local time in
/// `zone`.
///
/// This is the display-side convenience for stored values: the application
/// keeps timestamps in its configured default zone and this converts them to
/// the timezone a user selected.
pub fn localize_to_default<'a>(
    value: impl Into<Timestamp>,
    zone: impl Into<ZoneRef<'a>>,
) -> Result<OffsetDateTime> {
    adjust(value, ZoneRef::Handle(default_zone()), zone)
}

fn attach_zone(value: PrimitiveDateTime, tz: &'static Tz) -> Result<OffsetDateTime> {
    match value.assume_timezone(tz) {
        OffsetResult::Some(aware) => Ok(aware),
        OffsetResult::Ambiguous(earlier, _) => Ok(earlier),
        OffsetResult::None => Err(Error::SkippedLocalTime(value, tz.name().to_owned())),
    }
}
