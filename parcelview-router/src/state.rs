//! Per-cycle state machine
//!
//! ```text
//! Idle -> Deciding -> (ResolvingAddress)? -> (ResolvingParcel)? -> Reconciling -> Idle
//! ```
//!
//! A rejected cycle never leaves `Idle`. A bookkeeping-only cycle goes
//! straight from `Deciding` back to `Idle`.

use crate::error::{Result, RouteError};
use serde::Serialize;

/// Where a cycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleState {
    Idle,
    Deciding,
    ResolvingAddress,
    ResolvingParcel,
    Reconciling,
}

/// What the cycle wants to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleStep {
    Begin,
    ResolveAddress,
    ResolveParcels,
    Reconcile,
    Finish,
}

impl CycleState {
    /// Transition table
    pub fn advance(self, step: CycleStep) -> Result<CycleState> {
        use CycleState::*;
        use CycleStep::*;

        let next = match (self, step) {
            (Idle, Begin) => Deciding,
            (Deciding, ResolveAddress) => ResolvingAddress,
            (Deciding | ResolvingAddress, ResolveParcels) => ResolvingParcel,
            (Deciding | ResolvingAddress | ResolvingParcel, Reconcile) => Reconciling,
            (Deciding | Reconciling, Finish) => Idle,
            (from, step) => return Err(RouteError::InvalidTransition { from, step }),
        };
        Ok(next)
    }
}

/// Walks a cycle through the table and records every state it enters
#[derive(Debug, Clone)]
pub struct CycleTracker {
    state: CycleState,
    visited: Vec<CycleState>,
}

impl Default for CycleTracker {
    fn default() -> Self {
        Self {
            state: CycleState::Idle,
            visited: vec![CycleState::Idle],
        }
    }
}

impl CycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn step(&mut self, step: CycleStep) -> Result<()> {
        self.state = self.state.advance(step)?;
        self.visited.push(self.state);
        Ok(())
    }

    pub fn into_visited(self) -> Vec<CycleState> {
        self.visited
    }
}
