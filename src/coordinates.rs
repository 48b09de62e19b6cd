//! Resolves timezone identifiers to representative geographic coordinates.
//!
//! The tz database ships a `zone.tab` table mapping each zone to the
//! coordinates of its principal city. This module parses that table once per
//! process and answers point lookups by zone name.

use std::{collections::HashMap, fs, path::Path, sync::OnceLock};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    timezone::ZoneRef,
};

/// The spatial reference identifier for WGS84, the coordinate system used by
/// the zone table.
pub const WGS84_SRID: u32 = 4326;

/// Where `zone.tab` lives on hosts with a standard timezone database install.
pub const ZONE_TAB_PATH: &str = "/usr/share/zoneinfo/zone.tab";

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Decimal degrees east of the prime meridian, negative west.
    pub longitude: f64,
    /// Decimal degrees north of the equator, negative south.
    pub latitude: f64,
    /// The spatial reference system identifier, always [WGS84_SRID].
    pub srid: u32,
}

impl Point {
    fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            srid: WGS84_SRID,
        }
    }
}

/// The parsed zone coordinate table: zone name to representative [Point].
///
/// Read-only once built. The process-wide copy used by [lookup] is built on
/// first use; build one explicitly with [ZoneTab::load] or [ZoneTab::parse]
/// to control the source.
#[derive(Debug, Clone)]
pub struct ZoneTab {
    points: HashMap<String, Point>,
}

impl ZoneTab {
    /// Read and parse a zone table file.
    ///
    /// # Errors
    /// Returns [Error::TableIo] when the file cannot be read, or a parse
    /// error as described in [ZoneTab::parse].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;

        Self::parse(&text)
    }

    /// Parse zone table text.
    ///
    /// Lines starting with `#` and blank lines are skipped. Every other line
    /// must carry at least a country code, a coordinate field, and a zone
    /// name separated by whitespace; anything after the zone name is an
    /// ignored comment, so spaces there never fragment the name.
    ///
    /// # Errors
    /// The table is trusted and static, so the first bad line aborts the
    /// whole parse with [Error::MalformedTableLine] or
    /// [Error::InvalidCoordinates] rather than being skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut points = HashMap::new();

        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_ascii_whitespace();
            let (Some(_country_code), Some(coordinates), Some(zone)) =
                (fields.next(), fields.next(), fields.next())
            else {
                return Err(Error::MalformedTableLine {
                    line_number,
                    line: line.to_owned(),
                });
            };

            let point =
                parse_coordinates(coordinates).ok_or_else(|| Error::InvalidCoordinates {
                    line_number,
                    coordinates: coordinates.to_owned(),
                })?;

            points.insert(zone.to_owned(), point);
        }

        Ok(Self { points })
    }

    /// The coordinates recorded for `zone`, or `None` when the table has no
    /// entry for it.
    pub fn get(&self, zone: &str) -> Option<Point> {
        self.points.get(zone).copied()
    }

    /// The number of zones in the table.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

static ZONE_TAB: OnceLock<ZoneTab> = OnceLock::new();

/// The representative coordinates for a timezone, read from the host's
/// `zone.tab` table.
///
/// The table is parsed on first call and cached for the life of the process;
/// later calls never re-read the file. A zone without a table entry (for
/// example an alias or a legacy name) is `Ok(None)`, not an error.
///
/// # Errors
/// Only the lazy build can fail: [Error::TableIo] when [ZONE_TAB_PATH] cannot
/// be read, or a parse error for a malformed table. A failed build is not
/// cached, so a later call retries.
pub fn lookup<'a>(zone: impl Into<ZoneRef<'a>>) -> Result<Option<Point>> {
    let table = match ZONE_TAB.get() {
        Some(table) => table,
        None => {
            let table = ZoneTab::load(ZONE_TAB_PATH)?;
            tracing::debug!(
                "parsed {} zone coordinate entries from {ZONE_TAB_PATH}",
                table.len()
            );
            // A racing thread may have installed its copy first; the tables
            // are identical, so the loser's copy is simply dropped.
            ZONE_TAB.get_or_init(|| table)
        }
    };

    Ok(table.get(zone.into().name()))
}

/// Parses the zone table's `±DDMM[SS]±DDDMM[SS]` coordinate field, latitude
/// then longitude, into decimal degrees.
fn parse_coordinates(coordinates: &str) -> Option<Point> {
    let bytes = coordinates.as_bytes();

    let (latitude, rest) = parse_component(bytes, 2)?;
    let (longitude, rest) = parse_component(rest, 3)?;

    if !rest.is_empty() {
        return None;
    }

    Some(Point::new(longitude, latitude))
}

/// One signed sexagesimal component: a sign, `degree_digits` degree digits,
/// two minute digits, and optionally two second digits.
fn parse_component(bytes: &[u8], degree_digits: usize) -> Option<(f64, &[u8])> {
    let (sign, rest) = match *bytes.first()? {
        b'+' => (1.0, &bytes[1..]),
        b'-' => (-1.0, &bytes[1..]),
        _ => return None,
    };

    let (degrees, rest) = parse_digits(rest, degree_digits)?;
    let (minutes, rest) = parse_digits(rest, 2)?;
    // Seconds are present exactly when the next byte is neither the
    // longitude sign nor the end of the field.
    let (seconds, rest) = match rest.first().copied() {
        Some(b'+' | b'-') | None => (0, rest),
        Some(_) => parse_digits(rest, 2)?,
    };

    let value = f64::from(degrees) + f64::from(minutes * 60 + seconds) / 3600.0;

    Some((sign * value, rest))
}

fn parse_digits(bytes: &[u8], count: usize) -> Option<(u32, &[u8])> {
    if bytes.len() < count {
        return None;
    }

    let (digits, rest) = bytes.split_at(count);
    let mut value = 0;

    for &byte in digits {
        if !byte.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u32::from(byte - b'0');
    }

    Some((value, rest))
}

#[cfg(test)]
mod tests {
    use std::{io::Write, path::Path};

    use crate::{
        Error,
        coordinates::{
            Point, WGS84_SRID, ZONE_TAB_PATH, ZoneTab, lookup, parse_coordinates,
        },
        timezone::resolve,
    };

    const SAMPLE_TABLE: &str = "\
# tz zone descriptions
#
# country-code coordinates zone comments
US\t+404251-0740023\tAmerica/New_York\tEastern (most areas)
NZ\t-3652+17446\tPacific/Auckland\tmost of New Zealand
AD\t+4230+00131\tEurope/Andorra
";

    fn assert_close(want: f64, got: f64) {
        assert!(
            (want - got).abs() < 1e-4,
            "want {want} within 1e-4 of {got}"
        );
    }

    #[test]
    fn parses_full_precision_coordinates() {
        let got = parse_coordinates("+404251-0740023").unwrap();

        assert_close(40.0 + (42.0 * 60.0 + 51.0) / 3600.0, got.latitude);
        assert_close(-(74.0 + 23.0 / 3600.0), got.longitude);
        assert_eq!(WGS84_SRID, got.srid);
    }

    #[test]
    fn parses_coordinates_without_seconds() {
        let got = parse_coordinates("-3652+17446").unwrap();

        assert_close(-(36.0 + (52.0 * 60.0) / 3600.0), got.latitude);
        assert_close(174.0 + (46.0 * 60.0) / 3600.0, got.longitude);
    }

    #[test]
    fn parses_mixed_precision_coordinates() {
        // Seconds on the latitude only.
        let got = parse_coordinates("+404251-07400").unwrap();

        assert_close(40.0 + (42.0 * 60.0 + 51.0) / 3600.0, got.latitude);
        assert_close(-74.0, got.longitude);
    }

    #[test]
    fn rejects_coordinates_outside_the_grammar() {
        let bad = [
            "",
            "404251-0740023",   // missing latitude sign
            "+404251",          // missing longitude
            "+4042510740023",   // missing longitude sign
            "+4042x1-0740023",  // non-digit
            "+404251-07400231", // trailing digit
            "+404251-0740023 ", // trailing space
            "+40425-0740023",   // truncated seconds
            "+404251+-0740023", // double sign
        ];

        for coordinates in bad {
            assert!(
                parse_coordinates(coordinates).is_none(),
                "{coordinates:?} should not parse"
            );
        }
    }

    #[test]
    fn parses_a_table_keyed_by_zone_name() {
        let table = ZoneTab::parse(SAMPLE_TABLE).unwrap();

        assert_eq!(3, table.len());

        let new_york = table.get("America/New_York").unwrap();
        assert_close(40.7142, new_york.latitude);
        assert_close(-74.0064, new_york.longitude);

        let auckland = table.get("Pacific/Auckland").unwrap();
        assert_close(-36.8667, auckland.latitude);
        assert_close(174.7667, auckland.longitude);
    }

    #[test]
    fn comment_and_blank_lines_contribute_no_entries() {
        let table = ZoneTab::parse("# only comments\n\n# and blanks\n").unwrap();

        assert!(table.is_empty());
    }

    #[test]
    fn absent_zone_is_none_not_an_error() {
        let table = ZoneTab::parse(SAMPLE_TABLE).unwrap();

        assert_eq!(None, table.get("Not/AZone"));
    }

    #[test]
    fn short_line_aborts_the_parse_with_its_line_number() {
        let text = "US\t+404251-0740023\tAmerica/New_York\nUS\n";

        let got = ZoneTab::parse(text);

        assert!(matches!(
            got,
            Err(Error::MalformedTableLine { line_number: 2, line }) if line == "US"
        ));
    }

    #[test]
    fn bad_coordinates_abort_the_parse_with_their_line_number() {
        let text = "# header\nUS\tnowhere\tAmerica/New_York\n";

        let got = ZoneTab::parse(text);

        assert!(matches!(
            got,
            Err(Error::InvalidCoordinates { line_number: 2, coordinates })
                if coordinates == "nowhere"
        ));
    }

    #[test]
    fn loads_a_table_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_TABLE.as_bytes()).unwrap();

        let table = ZoneTab::load(file.path()).unwrap();

        assert_eq!(3, table.len());
        assert!(table.get("Europe/Andorra").is_some());
    }

    #[test]
    fn missing_table_file_is_an_io_error() {
        let got = ZoneTab::load("/no/such/zone.tab");

        assert!(matches!(got, Err(Error::TableIo(_))));
    }

    #[test]
    fn point_serializes_with_its_srid() {
        let point = Point::new(-74.0, 40.7);

        let got = serde_json::to_value(point).unwrap();

        assert_eq!(
            serde_json::json!({"longitude": -74.0, "latitude": 40.7, "srid": 4326}),
            got
        );
    }

    // Exercises the process-wide cache against the host's own table, so it
    // only runs where the timezone database is installed.
    #[test]
    fn lookup_memoizes_the_host_table() {
        if !Path::new(ZONE_TAB_PATH).exists() {
            return;
        }

        let first = lookup("America/New_York").unwrap();
        let second = lookup("America/New_York").unwrap();

        assert!(first.is_some());
        assert_eq!(first, second);

        let handle = resolve("America/New_York").unwrap();
        assert_eq!(first, lookup(handle).unwrap());

        assert_eq!(None, lookup("Not/AZone").unwrap());
    }
}
