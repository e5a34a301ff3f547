//! Retry policy and backoff arithmetic.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of attempts per call.
const DEFAULT_MAX_ATTEMPTS: u32 = 6;

/// Default delay before the first retry, in milliseconds.
const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;

/// How a resilient call retries.
///
/// The default policy retries everything, including client-class HTTP
/// statuses. [`RetryPolicy::strict`] fails fast on statuses that cannot
/// succeed on a second try.
///
/// # Examples
///
/// ```
/// use fabula_retry::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 6);
/// assert_eq!(policy.initial_delay, Duration::from_secs(1));
/// assert!(!policy.is_fatal_status(400));
/// assert!(RetryPolicy::strict().is_fatal_status(400));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of remote calls allowed, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// HTTP statuses that abort immediately instead of retrying
    pub fatal_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            fatal_statuses: Vec::new(),
        }
    }
}

impl RetryPolicy {
    /// Create a policy that retries every failure.
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            fatal_statuses: Vec::new(),
        }
    }

    /// Default timing, but malformed requests, bad credentials and unknown
    /// models are treated as permanent.
    pub fn strict() -> Self {
        Self::default().with_fatal_statuses(vec![400, 401, 403, 404])
    }

    /// Replace the set of permanent HTTP statuses.
    pub fn with_fatal_statuses(mut self, statuses: Vec<u16>) -> Self {
        self.fatal_statuses = statuses;
        self
    }

    /// Whether `status` aborts the call without retrying.
    pub fn is_fatal_status(&self, status: u16) -> bool {
        self.fatal_statuses.contains(&status)
    }

    /// Delay before retry number `attempt` (0-indexed), before any server hint.
    pub fn backoff(&self, attempt: u32) -> Duration {
        backoff_delay(self.initial_delay, attempt)
    }
}

/// Serializable retry settings, as found in configuration files.
///
/// ```
/// use fabula_retry::RetrySettings;
/// use std::time::Duration;
///
/// let settings = RetrySettings {
///     max_attempts: 3,
///     initial_delay_ms: 250,
///     fatal_statuses: vec![401],
/// };
/// let policy = settings.to_policy();
/// assert_eq!(policy.initial_delay, Duration::from_millis(250));
/// assert!(policy.is_fatal_status(401));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetrySettings {
    /// Total number of remote calls allowed, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// HTTP statuses that abort immediately instead of retrying
    #[serde(default)]
    pub fatal_statuses: Vec<u16>,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_initial_delay_ms() -> u64 {
    DEFAULT_INITIAL_DELAY_MS
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            fatal_statuses: Vec::new(),
        }
    }
}

impl RetrySettings {
    /// Convert into a runtime policy.
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.initial_delay_ms))
            .with_fatal_statuses(self.fatal_statuses.clone())
    }
}

/// Exponential backoff without jitter: `initial * 2^attempt`.
///
/// Saturates at [`Duration::MAX`] instead of overflowing.
///
/// ```
/// use fabula_retry::backoff_delay;
/// use std::time::Duration;
///
/// let initial = Duration::from_millis(1000);
/// assert_eq!(backoff_delay(initial, 0), Duration::from_millis(1000));
/// assert_eq!(backoff_delay(initial, 1), Duration::from_millis(2000));
/// assert_eq!(backoff_delay(initial, 3), Duration::from_millis(8000));
/// ```
pub fn backoff_delay(initial: Duration, attempt: u32) -> Duration {
    if initial.is_zero() {
        return Duration::ZERO;
    }
    match 2u32.checked_pow(attempt) {
        Some(factor) => initial.checked_mul(factor).unwrap_or(Duration::MAX),
        None => Duration::MAX,
    }
}

/// Delay actually slept: the larger of local backoff and server hint.
///
/// A server hint may lengthen a wait but never shorten it.
pub fn effective_delay(computed: Duration, server_hint: Option<Duration>) -> Duration {
    match server_hint {
        Some(hint) => computed.max(hint),
        None => computed,
    }
}
