//! Duration rendering for the two places durations appear: the live display
//! label and the `HH:MM:SS` workbook columns.

use chrono::TimeDelta;

/// Compact display form: `"42s"`, `"5m07s"`, `"1h03m09s"`.
///
/// The leading unit is unpadded; everything after it is two digits. Negative
/// inputs render as zero.
pub fn format_brief(delta: TimeDelta) -> String {
    let total = delta.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}h{minutes:02}m{seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

/// Workbook column form: zero-padded `HH:MM:SS`, truncated to whole seconds.
pub fn format_hms(delta: TimeDelta) -> String {
    let total = delta.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Inverse of [`format_hms`]. Hours may exceed two digits; minutes and
/// seconds must be below 60.
pub fn parse_hms(value: &str) -> Option<TimeDelta> {
    let mut parts = value.split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }
    Some(TimeDelta::seconds(hours * 3600 + minutes * 60 + seconds))
}

/// Serde adapter storing a [`TimeDelta`] as an `HH:MM:SS` string.
pub mod hms {
    use chrono::TimeDelta;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::{format_hms, parse_hms};

    pub fn serialize<S: Serializer>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_hms(*delta))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_hms(&raw).ok_or_else(|| D::Error::custom(format!("invalid duration '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brief_seconds_only() {
        assert_eq!(format_brief(TimeDelta::seconds(0)), "0s");
        assert_eq!(format_brief(TimeDelta::seconds(59)), "59s");
    }

    #[test]
    fn brief_minutes_pad_seconds() {
        assert_eq!(format_brief(TimeDelta::seconds(60)), "1m00s");
        assert_eq!(format_brief(TimeDelta::seconds(307)), "5m07s");
        assert_eq!(format_brief(TimeDelta::seconds(3599)), "59m59s");
    }

    #[test]
    fn brief_hours_pad_rest() {
        assert_eq!(format_brief(TimeDelta::seconds(3600)), "1h00m00s");
        assert_eq!(format_brief(TimeDelta::seconds(3789)), "1h03m09s");
    }

    #[test]
    fn brief_negative_clamps_to_zero() {
        assert_eq!(format_brief(TimeDelta::seconds(-5)), "0s");
    }

    #[test]
    fn hms_is_fully_padded() {
        assert_eq!(format_hms(TimeDelta::seconds(0)), "00:00:00");
        assert_eq!(format_hms(TimeDelta::seconds(3661)), "01:01:01");
        assert_eq!(format_hms(TimeDelta::seconds(90)), "00:01:30");
    }

    #[test]
    fn parse_hms_round_trips() {
        for seconds in [0, 1, 59, 60, 3599, 3600, 86399, 90000] {
            let delta = TimeDelta::seconds(seconds);
            assert_eq!(parse_hms(&format_hms(delta)), Some(delta));
        }
    }

    #[test]
    fn parse_hms_rejects_malformed_input() {
        assert_eq!(parse_hms(""), None);
        assert_eq!(parse_hms("12:34"), None);
        assert_eq!(parse_hms("12:34:56:78"), None);
        assert_eq!(parse_hms("aa:00:00"), None);
        assert_eq!(parse_hms("00:60:00"), None);
        assert_eq!(parse_hms("00:00:61"), None);
    }
}
