use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

// Mocking out time so that it is possible to run tests that depend on time.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// System that gets the real time and is used when not testing
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to. Used to replay several reminder runs
/// against the same deadline.
pub struct StaticTimeSys {
    timestamp: AtomicI64,
}

impl StaticTimeSys {
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp: AtomicI64::new(timestamp),
        }
    }

    pub fn set(&self, timestamp: i64) {
        self.timestamp.store(timestamp, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.timestamp.fetch_add(millis, Ordering::SeqCst);
    }
}

impl ISys for StaticTimeSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.timestamp.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_time_only_moves_when_told() {
        let sys = StaticTimeSys::new(1000);
        assert_eq!(sys.get_timestamp_millis(), 1000);
        sys.advance(500);
        assert_eq!(sys.get_timestamp_millis(), 1500);
        sys.set(10);
        assert_eq!(sys.get_timestamp_millis(), 10);
    }
}
