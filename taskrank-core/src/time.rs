//! Clock helpers: wall-clock "now" in an IANA zone, deadline instants.
//!
//! The engine works on naive wall-clock datetimes. Resolving the caller's
//! zone happens here, once, before ranking starts.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

/// Parse an IANA zone name like "Europe/Kyiv".
pub fn parse_zone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Wall-clock time in `tz` at the given UTC instant.
pub fn wall_clock_at(instant: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}

/// Current wall-clock time in the named zone.
pub fn now_in_zone(tz: &str) -> Result<NaiveDateTime> {
    Ok(wall_clock_at(Utc::now(), parse_zone(tz)?))
}

/// Parse a caller-supplied "now" override.
///
/// Accepts "2026-02-20 13:30", "2026-02-20T13:30:00" or a bare date (midnight).
pub fn parse_wall_clock(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid datetime '{s}': {e}"))?;
    Ok(deadline_instant(date))
}

/// A deadline date is due at the start of that day.
pub fn deadline_instant(deadline: NaiveDate) -> NaiveDateTime {
    deadline.and_time(NaiveTime::MIN)
}
