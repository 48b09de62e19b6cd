//! Utilities backing a timezone-selection form field.
//!
//! Three small, independent pieces:
//!
//! - [adjust], [adjust_to_default], and [localize_to_default] convert
//!   timestamps between named timezones, attaching a zone to naive values.
//! - [resolve] and [check_max_length] validate timezone names for form input
//!   and field declarations.
//! - [lookup] resolves a timezone to the approximate coordinates of its
//!   principal city, parsed once per process from the timezone database's
//!   `zone.tab` table.
//!
//! Zone resolution and all offset rules come from the `time-tz` database;
//! this crate computes no timezone rules of its own.

#![warn(missing_docs)]

mod convert;
mod coordinates;
mod error;
mod timezone;
mod validation;

pub use convert::{Timestamp, adjust, adjust_to_default, localize_to_default};
pub use coordinates::{Point, WGS84_SRID, ZONE_TAB_PATH, ZoneTab, lookup};
pub use error::{Error, Result};
pub use timezone::{DEFAULT_ZONE_ENV_VAR, ZoneRef, default_zone, resolve, set_default_zone};
pub use validation::{check_max_length, check_max_length_all_zones};
