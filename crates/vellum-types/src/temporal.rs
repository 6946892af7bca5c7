use chrono::{DateTime, TimeZone, Utc};

use crate::error::TypeError;

/// RFC 1123 layout pinned to the GMT zone name, e.g.
/// `Mon, 02 Jan 2006 15:04:05 GMT`.
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format an instant as an RFC 1123 GMT date.
pub fn format_http_date(instant: DateTime<Utc>) -> String {
    instant.format(HTTP_DATE_FORMAT).to_string()
}

/// Format epoch seconds as an RFC 1123 GMT date.
pub fn http_date_from_epoch(secs: i64) -> Result<String, TypeError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(format_http_date)
        .ok_or(TypeError::TimestampOutOfRange(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_reference_time() {
        // 2006-01-02T15:04:05Z
        assert_eq!(
            http_date_from_epoch(1_136_214_245).unwrap(),
            "Mon, 02 Jan 2006 15:04:05 GMT"
        );
    }

    #[test]
    fn formats_epoch_zero() {
        assert_eq!(http_date_from_epoch(0).unwrap(), "Thu, 01 Jan 1970 00:00:00 GMT");
    }

    #[test]
    fn pads_single_digit_day() {
        let t = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_http_date(t), "Tue, 05 Mar 2024 07:08:09 GMT");
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            http_date_from_epoch(i64::MAX),
            Err(TypeError::TimestampOutOfRange(i64::MAX))
        );
    }
}
