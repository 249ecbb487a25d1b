//! Multi-strategy element resolution.
//!
//! Candidates are tried strictly in priority order. Each candidate gets a
//! bounded polling wait; a candidate timing out is an ordinary outcome that
//! falls through to the next one. Only exhausting the whole list raises
//! [`EngineError::ElementNotFound`], naming the field rather than any single
//! locator.

use crate::error::EngineError;
use crate::locator::{Locator, LogicalField};
use crate::surface::{ElementHandle, Surface, SurfaceError};
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Per-candidate outcome. Timeouts are values here, not errors; raised
/// failures are reserved for exhausting every candidate.
enum CandidateOutcome {
    Found(ElementHandle),
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct Resolver {
    timeout: Duration,
    poll_interval: Duration,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

impl Resolver {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Resolve `field` to a live element in the current rendering context.
    ///
    /// Read-only: no retries beyond the per-candidate polling wait.
    pub async fn resolve<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        field: &LogicalField,
    ) -> Result<ElementHandle, EngineError> {
        for (index, candidate) in field.candidates.iter().enumerate() {
            match self.try_candidate(surface, candidate).await? {
                CandidateOutcome::Found(handle) => {
                    debug!(field = %field.name, candidate = %candidate, rank = index + 1, "resolved");
                    return Ok(handle);
                }
                CandidateOutcome::TimedOut => {
                    debug!(field = %field.name, candidate = %candidate, "candidate timed out, falling through");
                }
            }
        }
        Err(EngineError::ElementNotFound {
            field: field.name.clone(),
            candidates_tried: field.candidates.len(),
        })
    }

    /// Wait for a single locator to match; used for page-ready anchors.
    pub async fn wait_for<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        locator: &Locator,
        name: &str,
    ) -> Result<ElementHandle, EngineError> {
        match self.try_candidate(surface, locator).await? {
            CandidateOutcome::Found(handle) => Ok(handle),
            CandidateOutcome::TimedOut => Err(EngineError::ElementNotFound {
                field: name.to_string(),
                candidates_tried: 1,
            }),
        }
    }

    /// Poll one candidate until it matches or its window closes. The first
    /// query always runs, even with a zero timeout.
    async fn try_candidate<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        locator: &Locator,
    ) -> Result<CandidateOutcome, SurfaceError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(handle) = surface.query(locator).await? {
                return Ok(CandidateOutcome::Found(handle));
            }
            if Instant::now() >= deadline {
                return Ok(CandidateOutcome::TimedOut);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
