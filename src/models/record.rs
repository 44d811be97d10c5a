use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::duration::hms;

/// One completed work session, as it appears as a workbook row.
///
/// Immutable once constructed. Column names and order are fixed; the create
/// and append paths serialize through this same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(rename = "Start Time", with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(rename = "End Time", with = "clock_time")]
    pub end_time: NaiveTime,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Pause Time", with = "hms")]
    pub pause_duration: TimeDelta,
    #[serde(rename = "Total Work Time", with = "hms")]
    pub work_duration: TimeDelta,
    #[serde(rename = "Comment")]
    pub comment: String,
}

impl SessionRecord {
    /// Name of the monthly ledger this record belongs to, `YYYY-MM`.
    pub fn ledger_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// Serde adapter storing a [`NaiveTime`] as `HH:MM:SS`, dropping any
/// sub-second component.
mod clock_time {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M:%S";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .map_err(|err| D::Error::custom(format!("invalid time '{raw}': {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionRecord {
        SessionRecord {
            start_time: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 45, 30).unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            pause_duration: TimeDelta::seconds(600),
            work_duration: TimeDelta::seconds(8430),
            comment: "code review".to_string(),
        }
    }

    #[test]
    fn ledger_key_is_year_month() {
        assert_eq!(sample().ledger_key(), "2024-03");
    }

    #[test]
    fn serializes_with_fixed_columns() {
        let json = serde_json::to_string(&sample()).unwrap();
        let columns = [
            "\"Start Time\"",
            "\"End Time\"",
            "\"Date\"",
            "\"Pause Time\"",
            "\"Total Work Time\"",
            "\"Comment\"",
        ];
        let positions: Vec<usize> = columns
            .iter()
            .map(|column| json.find(column).unwrap_or_else(|| panic!("missing column {column}")))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "columns out of order: {json}");

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let row = value.as_object().unwrap();
        assert_eq!(row.len(), 6);
        assert_eq!(row["Start Time"], "09:15:00");
        assert_eq!(row["End Time"], "11:45:30");
        assert_eq!(row["Date"], "2024-03-18");
        assert_eq!(row["Pause Time"], "00:10:00");
        assert_eq!(row["Total Work Time"], "02:20:30");
        assert_eq!(row["Comment"], "code review");
    }

    #[test]
    fn deserializes_back_to_the_same_record() {
        let record = sample();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: SessionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn rejects_rows_with_bad_durations() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["Pause Time"] = serde_json::json!("ten minutes");
        assert!(serde_json::from_value::<SessionRecord>(value).is_err());
    }
}
