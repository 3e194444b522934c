use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

/// Timestamp layout used in stored filenames: `20240131_235959`.
const FILE_STAMP: &[FormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");

pub trait TimeSource {
    fn current_time(&self) -> OffsetDateTime;
}

#[derive(Clone)]
pub struct SystemTime {}

impl TimeSource for SystemTime {
    fn current_time(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Formats a receipt timestamp for use in a filename.
pub fn file_stamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(&FILE_STAMP)
        .expect("failed to format filename timestamp")
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::file_stamp;

    #[test]
    fn file_stamp_layout() {
        let stamp = file_stamp(datetime!(2024-01-31 23:59:59 UTC));
        assert_eq!(stamp, "20240131_235959");
    }
}
