use std::future::Future;
use std::time::Duration;

use crate::error::Result;
use crate::ui;

/// Sentinel status reported when polling gives up without a terminal
/// answer; the run still succeeds and the CI job decides what to do.
pub const RETRY_SENTINEL: &str = "RETRY MAXIMUM REACHED";

/// Bounded polling state machine
///
/// One initial check plus up to `remaining` re-checks. The transition
/// logic is pure; the async driver below supplies observations and
/// pacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Polling { remaining: u32 },
    Settled(String),
    RetriesExhausted,
}

impl PollState {
    /// Initial state allowing `max_attempts` re-checks after the first
    pub fn start(max_attempts: u32) -> Self {
        PollState::Polling {
            remaining: max_attempts,
        }
    }

    /// Feed one observed status into the machine
    pub fn observe(self, status: &str, is_terminal: fn(&str) -> bool) -> Self {
        match self {
            PollState::Polling { remaining } => {
                if is_terminal(status) {
                    PollState::Settled(status.to_string())
                } else if remaining > 0 {
                    PollState::Polling {
                        remaining: remaining - 1,
                    }
                } else {
                    PollState::RetriesExhausted
                }
            }
            settled => settled,
        }
    }

    /// Feed a failed status check into the machine
    ///
    /// Inside the polling loops a fetch failure is not fatal: it burns an
    /// attempt like any non-terminal observation.
    pub fn observe_failure(self) -> Self {
        match self {
            PollState::Polling { remaining } if remaining > 0 => PollState::Polling {
                remaining: remaining - 1,
            },
            PollState::Polling { .. } => PollState::RetriesExhausted,
            settled => settled,
        }
    }
}

/// How the machine ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollVerdict {
    Settled(String),
    RetriesExhausted,
}

impl PollVerdict {
    /// The value reported to the CI job
    pub fn output_value(&self) -> &str {
        match self {
            PollVerdict::Settled(status) => status,
            PollVerdict::RetriesExhausted => RETRY_SENTINEL,
        }
    }
}

/// Pacing between poll attempts
///
/// Production uses a fixed delay; tests inject [NoDelay] so polling runs
/// instantly.
#[allow(async_fn_in_trait)]
pub trait Pacer {
    async fn pause(&self);
}

/// Waits a fixed duration between attempts
pub struct FixedDelay(pub Duration);

impl Pacer for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.0).await;
    }
}

/// No waiting; for tests
pub struct NoDelay;

impl Pacer for NoDelay {
    async fn pause(&self) {}
}

/// Drive the state machine until it settles or runs out of attempts
///
/// Failed status checks are reported and retried along with pending
/// statuses; exhausted retries are a normal verdict, not an error.
pub async fn poll_until_settled<P, F, Fut>(
    max_attempts: u32,
    pacer: &P,
    is_terminal: fn(&str) -> bool,
    mut fetch: F,
) -> PollVerdict
where
    P: Pacer,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let mut state = PollState::start(max_attempts);

    loop {
        state = match fetch().await {
            Ok(status) => state.observe(&status, is_terminal),
            Err(e) => {
                ui::display_status(&format!("Status check failed, will retry: {}", e));
                state.observe_failure()
            }
        };

        match state {
            PollState::Polling { .. } => pacer.pause().await,
            PollState::Settled(status) => return PollVerdict::Settled(status),
            PollState::RetriesExhausted => return PollVerdict::RetriesExhausted,
        }
    }
}

/// Terminal statuses of a pipeline promotion
pub fn promotion_is_terminal(status: &str) -> bool {
    matches!(status, "succeeded" | "completed" | "failed")
}

/// Terminal statuses of a deployment release; anything but `pending`
/// has settled
pub fn release_is_terminal(status: &str) -> bool {
    status != "pending"
}
