use chrono::{DateTime, Duration, Utc};

/// Scale a base threshold by the fixed factor of two.
pub fn threshold(value: f64) -> f64 {
    value * 2.0
}

/// UNIX timestamp one week from now (UTC).
pub fn expiry() -> i64 {
    expiry_from(Utc::now())
}

/// UNIX timestamp one week after `now`.
pub fn expiry_from(now: DateTime<Utc>) -> i64 {
    (now + Duration::weeks(1)).timestamp()
}
