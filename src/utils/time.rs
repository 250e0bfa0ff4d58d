use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Creation time embedded in a v7 id, at millisecond precision.
pub fn timestamp_of(id: &Uuid) -> Option<DateTime<Utc>> {
    let (secs, nanos) = id.get_timestamp()?.to_unix();
    Utc.timestamp_opt(secs as i64, nanos).single()
}
