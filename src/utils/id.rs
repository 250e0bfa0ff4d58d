use chrono::{DateTime, Utc};
use std::sync::Mutex;
use uuid::{NoContext, Timestamp, Uuid};

/// Hands out UUIDv7 ids that are strictly increasing for the lifetime of the
/// generator, even when several are requested within the same millisecond or the
/// wall clock steps backwards.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Mutex<u128>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> Uuid {
        self.next_at(Utc::now())
    }

    /// Next id whose embedded timestamp is `at`, unless that would not sort after
    /// the previous id, in which case the previous id plus one is used.
    pub fn next_at(&self, at: DateTime<Utc>) -> Uuid {
        let candidate = v7_at(at).as_u128();
        let mut last = self.last.lock().unwrap_or_else(|p| p.into_inner());
        let next = if candidate > *last { candidate } else { *last + 1 };
        *last = next;
        Uuid::from_u128(next)
    }
}

fn v7_at(at: DateTime<Utc>) -> Uuid {
    let secs = at.timestamp().max(0) as u64;
    Uuid::new_v7(Timestamp::from_unix(
        NoContext,
        secs,
        at.timestamp_subsec_nanos(),
    ))
}
