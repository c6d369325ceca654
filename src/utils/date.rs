use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// UTC datetime without timezone complexity.
///
/// Field order matters: the derived `Ord` compares year first, then month,
/// day, hour, minute, second, which is exactly chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Parse a front-matter timestamp.
    ///
    /// Accepted forms:
    /// - `YYYY-MM-DD`
    /// - `YYYY-MM-DD HH:MM`
    /// - `YYYY-MM-DD HH:MM:SS`
    /// - `YYYY-MM-DDTHH:MM:SSZ` (RFC3339, UTC only)
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();

        // Minimum: "YYYY-MM-DD" (10 chars)
        if bytes.len() < 10 {
            return None;
        }

        // Parse date part
        let year = parse_u16(&bytes[0..4])?;
        if bytes[4] != b'-' {
            return None;
        }
        let month = parse_u8(&bytes[5..7])?;
        if bytes[7] != b'-' {
            return None;
        }
        let day = parse_u8(&bytes[8..10])?;

        let (hour, minute, second) = match bytes.len() {
            10 => (0, 0, 0),
            // "YYYY-MM-DD HH:MM"
            16 if bytes[10] == b' ' && bytes[13] == b':' => {
                (parse_u8(&bytes[11..13])?, parse_u8(&bytes[14..16])?, 0)
            }
            // "YYYY-MM-DD HH:MM:SS"
            19 if bytes[10] == b' ' && bytes[13] == b':' && bytes[16] == b':' => (
                parse_u8(&bytes[11..13])?,
                parse_u8(&bytes[14..16])?,
                parse_u8(&bytes[17..19])?,
            ),
            // "YYYY-MM-DDTHH:MM:SSZ"
            20 if bytes[10] == b'T'
                && bytes[13] == b':'
                && bytes[16] == b':'
                && bytes[19] == b'Z' =>
            {
                (
                    parse_u8(&bytes[11..13])?,
                    parse_u8(&bytes[14..16])?,
                    parse_u8(&bytes[17..19])?,
                )
            }
            _ => return None,
        };

        let dt = Self::new(year, month, day, hour, minute, second);
        dt.validate().ok()?;
        Some(dt)
    }

    pub fn validate(&self) -> Result<()> {
        let Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = *self;

        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }

        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }
        if hour > 23 {
            bail!("hour is invalid: {hour}");
        }
        if minute > 59 {
            bail!("minute is invalid: {minute}");
        }
        if second > 59 {
            bail!("second is invalid: {second}");
        }

        Ok(())
    }

    #[inline]
    fn is_leap_year(year: u16) -> bool {
        year.is_multiple_of(4) && (!year.is_multiple_of(100) || year.is_multiple_of(400))
    }

    #[inline]
    fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }
}

/// Formats as `YYYY-MM-DD HH:MM:SS`, which `parse` accepts back.
impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl Serialize for DateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid datetime: `{s}`")))
    }
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + d as u16;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let dt = DateTime::parse("2020-01-01").unwrap();
        assert_eq!(dt, DateTime::from_ymd(2020, 1, 1));
    }

    #[test]
    fn test_parse_date_and_minutes() {
        let dt = DateTime::parse("2020-01-01 10:00").unwrap();
        assert_eq!(dt, DateTime::new(2020, 1, 1, 10, 0, 0));
    }

    #[test]
    fn test_parse_full_time() {
        let dt = DateTime::parse("2013-07-28 08:10:45").unwrap();
        assert_eq!(dt, DateTime::new(2013, 7, 28, 8, 10, 45));
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = DateTime::parse("2024-06-15T14:30:45Z").unwrap();
        assert_eq!(dt, DateTime::new(2024, 6, 15, 14, 30, 45));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DateTime::parse("").is_none());
        assert!(DateTime::parse("not a date").is_none());
        assert!(DateTime::parse("2020-1-1").is_none());
        assert!(DateTime::parse("2020-01-01 10").is_none());
        assert!(DateTime::parse("2020/01/01").is_none());
        // Trailing junk after an otherwise valid stamp
        assert!(DateTime::parse("2020-01-01 10:00 extra").is_none());
    }

    #[test]
    fn test_parse_rejects_invalid_calendar() {
        // Month 13
        assert!(DateTime::parse("2020-13-01").is_none());
        // Day 32
        assert!(DateTime::parse("2020-01-32").is_none());
        // Feb 29 in a non-leap year
        assert!(DateTime::parse("2023-02-29").is_none());
        // Hour 24
        assert!(DateTime::parse("2020-01-01 24:00").is_none());
    }

    #[test]
    fn test_validate_leap_year() {
        assert!(DateTime::new(2024, 2, 29, 12, 0, 0).validate().is_ok());
        assert!(DateTime::new(2000, 2, 29, 12, 0, 0).validate().is_ok()); // divisible by 400
        assert!(DateTime::new(2023, 2, 29, 12, 0, 0).validate().is_err());
        assert!(DateTime::new(1900, 2, 29, 12, 0, 0).validate().is_err()); // divisible by 100 but not 400
    }

    #[test]
    fn test_ordering_is_chronological() {
        let earlier = DateTime::parse("2020-01-01 10:00").unwrap();
        let later = DateTime::parse("2020-02-01 09:00").unwrap();
        assert!(earlier < later);

        let same_day_morning = DateTime::new(2020, 5, 5, 8, 0, 0);
        let same_day_evening = DateTime::new(2020, 5, 5, 20, 0, 0);
        assert!(same_day_morning < same_day_evening);

        let equal = DateTime::parse("2020-01-01 10:00").unwrap();
        assert_eq!(earlier, equal);
    }

    #[test]
    fn test_display_round_trips() {
        let dt = DateTime::new(2020, 1, 1, 10, 0, 0);
        assert_eq!(dt.to_string(), "2020-01-01 10:00:00");
        assert_eq!(DateTime::parse(&dt.to_string()), Some(dt));
    }

    #[test]
    fn test_serde_string_round_trip() {
        let dt = DateTime::parse("2013-07-28 08:10").unwrap();
        let json = serde_json::to_string(&dt).unwrap();
        assert_eq!(json, "\"2013-07-28 08:10:00\"");
        let back: DateTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dt);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result: Result<DateTime, _> = serde_json::from_str("\"yesterday\"");
        assert!(result.is_err());
    }
}
