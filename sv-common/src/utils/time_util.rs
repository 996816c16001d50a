use chrono::{DateTime, Utc};

pub struct TimeUtil {}

// ISO8601 with ':' and '.' replaced so the timestamp is filename-safe and
// filenames sort lexically by creation time
const BACKUP_TS_FORMAT: &str = "%Y-%m-%dT%H-%M-%S-%3fZ";

impl TimeUtil {
    #[inline(always)]
    pub fn backup_timestamp() -> String {
        Self::backup_timestamp_at(Utc::now())
    }

    #[inline(always)]
    pub fn backup_timestamp_at(datetime: DateTime<Utc>) -> String {
        datetime.format(BACKUP_TS_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_backup_timestamp_format() {
        let datetime = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 15).unwrap();
        let ts = TimeUtil::backup_timestamp_at(datetime);
        assert_eq!(ts, "2024-06-01T08-30-15-000Z");
        assert!(!ts.contains(':'));
        assert!(!ts.contains('.'));
    }

    #[test]
    fn test_timestamps_sort_lexically_by_time() {
        let older = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert!(TimeUtil::backup_timestamp_at(newer) > TimeUtil::backup_timestamp_at(older));
    }
}
