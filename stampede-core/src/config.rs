use crate::{
    DEFAULT_CONCURRENT_USERS, DEFAULT_MAX_WAIT, DEFAULT_REQUEST_INTERVAL, DEFAULT_TOTAL_SESSIONS,
};
use std::num::NonZeroU32;
use std::time::Duration;

/// Run parameters for one load-generation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Simulated user sessions launched over the run.
    pub total_sessions: NonZeroU32,
    /// Upper bound on sessions executing their steps at the same time.
    pub concurrent_users: NonZeroU32,
    /// Spacing input for the deferred session start offsets.
    pub request_interval: Duration,
    /// Bound on the post-submission waiting phase; in-flight sessions are
    /// never cancelled when it expires.
    pub max_wait: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_sessions: DEFAULT_TOTAL_SESSIONS,
            concurrent_users: DEFAULT_CONCURRENT_USERS,
            request_interval: DEFAULT_REQUEST_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl RunConfig {
    pub fn new(
        total_sessions: NonZeroU32,
        concurrent_users: NonZeroU32,
        request_interval: Duration,
    ) -> Self {
        Self {
            total_sessions,
            concurrent_users,
            request_interval,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}
