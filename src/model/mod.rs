pub mod attendance;
pub mod employee;
pub mod page;
pub mod stats;

pub use attendance::{Attendance, AttendanceCreate, AttendanceFilter, AttendanceStatus, StatusCounts};
pub use employee::{Employee, EmployeeCreate};
pub use page::{Listing, PageMeta, PageRequest};
pub use stats::DashboardStats;

/// Server timestamps arrive either as RFC 3339 or as a naive UTC
/// `2024-01-01T09:30:00.123456` without offset.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT))
            .ok()
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(NAIVE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp {raw:?}")))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn accepts_naive_and_offset_forms() {
            let naive = parse("2024-01-01T09:30:00.123456").unwrap();
            let zulu = parse("2024-01-01T09:30:00.123456Z").unwrap();
            let shifted = parse("2024-01-01T11:30:00.123456+02:00").unwrap();
            assert_eq!(naive, zulu);
            assert_eq!(naive, shifted);
            assert!(parse("yesterday").is_none());
        }
    }
}
