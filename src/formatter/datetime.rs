//! Local date-time to UTC basic-format conversion for calendar events.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, TimeZone, Utc};

/// Input layouts accepted from `datetime-local` style fields.
const INPUT_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Converts a local date-time in the system time zone to `YYYYMMDDTHHMMSSZ`.
///
/// Empty input yields an empty string.
pub fn to_utc_basic(local: &str) -> Result<String> {
    to_utc_basic_in(local, &Local)
}

/// Converts a date-time in the time zone `tz` to `YYYYMMDDTHHMMSSZ`.
///
/// Sub-second precision is dropped. Ambiguous local times (DST fold) resolve
/// to the earlier instant.
///
/// ```
/// use chrono::FixedOffset;
/// use lazyqr::formatter::datetime::to_utc_basic_in;
///
/// let berlin_winter = FixedOffset::east_opt(3600).unwrap();
/// assert_eq!(
///     to_utc_basic_in("2024-03-01T09:30", &berlin_winter).unwrap(),
///     "20240301T083000Z"
/// );
/// ```
pub fn to_utc_basic_in<Tz: TimeZone>(local: &str, tz: &Tz) -> Result<String> {
    let local = local.trim();
    if local.is_empty() {
        return Ok(String::new());
    }

    let naive = INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(local, format).ok())
        .context(format!(
            "Invalid date and time '{local}'. Expected YYYY-MM-DDTHH:MM"
        ))?;

    let zoned = tz
        .from_local_datetime(&naive)
        .earliest()
        .context(format!("'{local}' does not exist in the local time zone"))?;

    Ok(zoned.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string())
}
