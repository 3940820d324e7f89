use std::num::NonZeroU32;
use std::time::Duration;

pub const DEFAULT_TOTAL_SESSIONS: NonZeroU32 = unsafe { NonZeroU32::new_unchecked(100) };

pub const DEFAULT_CONCURRENT_USERS: NonZeroU32 = unsafe { NonZeroU32::new_unchecked(10) };

pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

/// How long the scheduler waits for all sessions before giving up on the
/// waiting phase (the sessions themselves are never cancelled).
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(300);

/// Retries allowed per step after the initial attempt.
pub const MAX_RETRIES: u32 = 3;

/// First backoff delay; doubles per retry (100ms, 200ms, 400ms).
pub const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Wall-clock bound for a single request attempt.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(15);

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
