//! Defines the crate error type and the classes of failure it covers.

use std::io;

use time::PrimitiveDateTime;

/// The errors that may occur while validating timezones, converting
/// timestamps, or building the coordinate table.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The supplied name does not match any timezone in the timezone
    /// database.
    ///
    /// This is a validation error: form and field layers should reject the
    /// value and re-prompt the user.
    #[error("unknown timezone \"{0}\"")]
    UnknownZone(String),

    /// A naive date-time has no valid reading in the target timezone because
    /// it falls inside a clock jump such as the start of daylight saving.
    #[error("{0} does not exist in timezone \"{1}\" (skipped by an offset transition)")]
    SkippedLocalTime(PrimitiveDateTime, String),

    /// A timezone field was declared with a `max_length` too small to hold
    /// every known zone name.
    ///
    /// Unlike [Error::UnknownZone], this signals a programming mistake in the
    /// field declaration rather than bad user input, so it should be raised
    /// at startup and treated as fatal.
    #[error(
        "max_length {max_length} is too small for timezone \"{zone}\" ({length} characters)"
    )]
    FieldTooShort {
        /// The declared maximum field length.
        max_length: usize,
        /// The zone name that did not fit.
        zone: String,
        /// The length of that zone name in characters.
        length: usize,
    },

    /// A zone table line did not have the country-code, coordinates, and
    /// zone-name fields. Aborts the table build.
    #[error("malformed zone table line {line_number}: \"{line}\"")]
    MalformedTableLine {
        /// The 1-based line number within the table.
        line_number: usize,
        /// The offending line.
        line: String,
    },

    /// A zone table coordinate field did not match the `±DDMM[SS]±DDDMM[SS]`
    /// grammar. Aborts the table build.
    #[error("invalid coordinates \"{coordinates}\" on zone table line {line_number}")]
    InvalidCoordinates {
        /// The 1-based line number within the table.
        line_number: usize,
        /// The offending coordinate field.
        coordinates: String,
    },

    /// The zone table file could not be read.
    #[error("could not read the zone table: {0}")]
    TableIo(#[from] io::Error),
}

/// A convenience alias for results carrying the crate [Error].
pub type Result<T> = std::result::Result<T, Error>;
