use time::OffsetDateTime;

/// Source of the current time for `GLOBAL` attributes.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> OffsetDateTime;

    fn now_local(&self) -> OffsetDateTime;
}

#[derive(Clone, Copy, Default, Debug)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    /// Falls back to UTC when the local offset cannot be determined
    /// (e.g. in a multi-threaded process on unix).
    fn now_local(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

/// A clock standing still, local time being the instant in its own offset.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now_utc(&self) -> OffsetDateTime {
        self.0.to_offset(time::UtcOffset::UTC)
    }

    fn now_local(&self) -> OffsetDateTime {
        self.0
    }
}
