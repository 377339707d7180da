use chrono::{DateTime, Duration, Utc};

/// Policy for the lazy Cleaning -> Available transition. Evaluated on read
/// paths; there is no background scheduler.
#[derive(Debug, Clone, Copy)]
pub struct AutoReleasePolicy {
    delay: Duration,
}

impl AutoReleasePolicy {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::seconds(secs as i64))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a room whose most recent closed rental ended at
    /// `actual_exit` is due for release at `now`. Callers must only pass
    /// exits of closed rentals; an active rental never qualifies a room.
    pub fn is_due(&self, actual_exit: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        actual_exit <= now - self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_release_threshold() {
        let policy = AutoReleasePolicy::from_secs(60);
        let exit = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        assert!(!policy.is_due(exit, exit));
        assert!(!policy.is_due(exit, exit + Duration::seconds(59)));
        assert!(policy.is_due(exit, exit + Duration::seconds(60)));
        assert!(policy.is_due(exit, exit + Duration::minutes(5)));
    }
}
