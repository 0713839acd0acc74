use chrono::{DateTime, Duration, Utc};

/// Absolute session lifetime in hours, counted from login.
pub const SESSION_LIMIT_HOURS: i64 = 6;

pub fn session_limit() -> Duration {
    Duration::hours(SESSION_LIMIT_HOURS)
}

/// True once more than `limit` has elapsed since `issued_at`.
///
/// A session exactly `limit` old is still valid. An `issued_at` in the future
/// (clock moved backwards) counts as not expired.
pub fn is_expired(issued_at: DateTime<Utc>, now: DateTime<Utc>, limit: Duration) -> bool {
    now - issued_at > limit
}

/// Time left before the cutoff, clamped at zero.
pub fn remaining(issued_at: DateTime<Utc>, now: DateTime<Utc>, limit: Duration) -> Duration {
    (issued_at + limit - now).max(Duration::zero())
}
