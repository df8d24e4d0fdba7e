use std::time::Duration;

/// Error-body substrings the inference provider emits for conditions that
/// resolve on their own (cold model start, saturated workers, flaky 5xx).
///
/// These are contractually tied to the provider's unversioned error
/// vocabulary; anything else is terminal on first sight.
pub const TRANSIENT_MARKERS: [&str; 4] = [
    "Service Unavailable",
    "Model too busy",
    "Internal Server Error",
    "loading",
];

/// Whether an upstream failure is worth retrying
///
/// Classification is by textual containment against [`TRANSIENT_MARKERS`].
/// The status code is accepted so callers can plug in structured
/// classification if the provider ever grows one, but is currently unused.
pub fn is_transient(message: &str, _status: Option<u16>) -> bool {
    TRANSIENT_MARKERS.iter().any(|marker| message.contains(marker))
}

/// Wait strategy between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayPolicy {
    /// No wait (single-attempt policies)
    None,
    /// Same delay after every failed attempt
    Fixed(Duration),
    /// Base delay multiplied by the attempt number just failed
    Linear(Duration),
}

/// Retry budget for one upstream call
///
/// Budgets are deliberately not uniform: long-running models get few
/// attempts with long delays and a generous timeout, cold-start models get
/// more attempts with short fixed delays.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: DelayPolicy,
    /// Per-attempt request timeout
    pub timeout: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: DelayPolicy, timeout: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            timeout,
        }
    }

    /// One attempt, no delay. For endpoints that never retried upstream.
    pub const fn single() -> Self {
        Self::new(1, DelayPolicy::None, Duration::from_secs(120))
    }

    /// Cold-start models: 5 attempts, fixed 2 s delay
    pub const fn cold_start() -> Self {
        Self::new(5, DelayPolicy::Fixed(Duration::from_secs(2)), Duration::from_secs(30))
    }

    /// Classification models: 3 attempts, linearly scaled 5 s delay
    pub const fn classification() -> Self {
        Self::new(3, DelayPolicy::Linear(Duration::from_secs(5)), Duration::from_secs(30))
    }

    /// Long-running models: 3 attempts, linearly scaled 10 s delay,
    /// 10-minute per-attempt timeout
    pub const fn long_running() -> Self {
        Self::new(3, DelayPolicy::Linear(Duration::from_secs(10)), Duration::from_secs(600))
    }

    /// Delay to wait after `attempt` (1-based) has failed
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.delay {
            DelayPolicy::None => Duration::ZERO,
            DelayPolicy::Fixed(base) => base,
            DelayPolicy::Linear(base) => base * attempt,
        }
    }
}
