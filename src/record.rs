use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::time::{ShiftDuration, TimeOfDay};

pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One saved work session. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub name: String,
    pub date: String,
    pub duration: ShiftDuration,
    pub end_time: TimeOfDay,
}

impl Record {
    /// Composes a record saved at `saved_at` with a fresh unique name.
    pub fn compose(saved_at: NaiveDateTime, duration: ShiftDuration, end_time: TimeOfDay) -> Self {
        Self {
            name: new_record_name(),
            date: saved_at.format(RECORD_DATE_FORMAT).to_string(),
            duration,
            end_time,
        }
    }
}

/// ULIDs sort by creation time and stay unique within the same millisecond.
pub fn new_record_name() -> String {
    ulid::Ulid::new().to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn saved_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 31)
            .unwrap()
            .and_hms_opt(18, 4, 9)
            .unwrap()
    }

    #[test]
    fn composed_records_get_distinct_names() {
        let duration = ShiftDuration::new(8, 0).unwrap();
        let end_time = TimeOfDay::from_hm(17, 0).unwrap();

        let first = Record::compose(saved_at(), duration, end_time);
        let second = Record::compose(saved_at(), duration, end_time);

        assert_ne!(first.name, second.name);
        assert_eq!(first.date, "2025-05-31 18:04:09");
        assert_eq!(first.date, second.date);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let record = Record {
            name: "01JWJ1Y2ZQ0000000000000000".to_string(),
            date: "2025-05-31 18:04:09".to_string(),
            duration: ShiftDuration::new(2, 15).unwrap(),
            end_time: TimeOfDay::from_hm(20, 19).unwrap(),
        };

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "01JWJ1Y2ZQ0000000000000000",
                "date": "2025-05-31 18:04:09",
                "duration": "2:15",
                "endTime": "8:19 PM",
            })
        );
        assert_eq!(serde_json::from_value::<Record>(json).unwrap(), record);
    }

    #[test]
    fn rejects_records_with_invalid_times() {
        let json = r#"{"name":"a","date":"d","duration":"2:75","endTime":"8:19 PM"}"#;

        assert!(serde_json::from_str::<Record>(json).is_err());
    }
}
