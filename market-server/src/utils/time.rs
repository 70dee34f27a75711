//! Timestamp helpers
//!
//! All persisted timestamps are RFC 3339 strings in UTC, written by the
//! application rather than the database so that guarded updates can bind
//! them as plain values.

use chrono::{SecondsFormat, Utc};

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_now_is_parseable_utc() {
        let now = now_rfc3339();
        let parsed = DateTime::parse_from_rfc3339(&now).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }
}
