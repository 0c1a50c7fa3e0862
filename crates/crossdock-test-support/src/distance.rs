//! Distance doubles — scripted `DistanceProvider` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use crossdock_core::distance::{Coordinate, DistanceProvider, RouteLeg};
use crossdock_core::error::DomainError;

/// A distance provider that answers every measurement with a fixed leg and
/// records each requested (from, to) pair, optionally failing after a set
/// number of successful calls.
#[derive(Debug)]
pub struct FixedDistanceProvider {
    leg: RouteLeg,
    fail_after: Option<usize>,
    calls: Mutex<Vec<(Coordinate, Coordinate)>>,
}

impl FixedDistanceProvider {
    /// Answers every call with `leg`.
    #[must_use]
    pub fn new(leg: RouteLeg) -> Self {
        Self {
            leg,
            fail_after: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers the first `successes` calls with `leg`, then fails.
    #[must_use]
    pub fn failing_after(leg: RouteLeg, successes: usize) -> Self {
        Self {
            leg,
            fail_after: Some(successes),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of every (from, to) pair requested so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<(Coordinate, Coordinate)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of measurement calls made so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DistanceProvider for FixedDistanceProvider {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteLeg, DomainError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((from, to));
        if let Some(successes) = self.fail_after {
            if calls.len() > successes {
                return Err(DomainError::RouteComputation(
                    "distance service exhausted".to_owned(),
                ));
            }
        }
        Ok(self.leg)
    }
}

/// A distance provider that fails every measurement.
#[derive(Debug)]
pub struct FailingDistanceProvider;

#[async_trait]
impl DistanceProvider for FailingDistanceProvider {
    async fn route(&self, _from: Coordinate, _to: Coordinate) -> Result<RouteLeg, DomainError> {
        Err(DomainError::RouteComputation(
            "distance service unavailable".to_owned(),
        ))
    }
}
