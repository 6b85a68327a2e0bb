//! Deadline-bounded futures.
//!
//! Every RPC call made by the resolver runs under a deadline. When the
//! deadline is reached the pending future is dropped and its eventual result
//! is discarded. Dropping does not guarantee the request is aborted at the
//! transport level: an HTTP request already on the wire may still complete on
//! the remote side, only nobody is listening for the answer anymore.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::blockchain::models::EndpointClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline of {}ms elapsed", .budget.as_millis())]
pub struct DeadlineElapsed {
    pub budget: Duration,
}

impl DeadlineElapsed {
    pub fn budget_ms(&self) -> u64 {
        self.budget.as_millis() as u64
    }
}

/// Races `operation` against a timer of `budget`; whichever finishes first
/// wins.
pub async fn with_deadline<F>(budget: Duration, operation: F) -> Result<F::Output, DeadlineElapsed>
where
    F: Future,
{
    tokio::time::timeout(budget, operation)
        .await
        .map_err(|_| DeadlineElapsed { budget })
}

/// Per-endpoint time budgets. Local dev nodes get longer since they can be
/// slow to boot; public endpoints must fail fast so the next one gets a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointBudgets {
    pub local: Duration,
    pub public: Duration,
}

impl Default for EndpointBudgets {
    fn default() -> Self {
        Self {
            local: Duration::from_millis(15_000),
            public: Duration::from_millis(8_000),
        }
    }
}

impl EndpointBudgets {
    pub fn for_class(&self, class: EndpointClass) -> Duration {
        match class {
            EndpointClass::Local => self.local,
            EndpointClass::Public => self.public,
        }
    }
}
