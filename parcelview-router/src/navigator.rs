//! Route history and navigation driver
//!
//! The navigator plays the part of the browser router: it holds the current
//! route plus back/forward stacks, runs the search entry guard, follows its
//! redirect, commits the final location and hands the transition to the
//! orchestrator's after-navigation hook.

use crate::error::Result;
use crate::orchestrator::{CycleReport, EntryDecision, Orchestrator};
use parcelview_core::{NavigationRequest, RouteLocation, RouteName};
use std::sync::Arc;
use tracing::debug;

/// How one navigation ended
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// The route was committed and the after-navigation hook ran
    Completed(CycleReport),
    /// The search entry guard cancelled the navigation
    Aborted,
    /// A fetch was running; nothing changed
    Rejected,
}

impl NavigationOutcome {
    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            NavigationOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Navigator {
    orchestrator: Arc<Orchestrator>,
    current: RouteLocation,
    back: Vec<RouteLocation>,
    forward: Vec<RouteLocation>,
}

impl Navigator {
    /// Start at the home route with empty history
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            current: RouteLocation::home(),
            back: Vec::new(),
            forward: Vec::new(),
        }
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    pub fn current(&self) -> &RouteLocation {
        &self.current
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    /// Parse `path_and_query` and navigate to it
    pub async fn navigate_path(&mut self, path_and_query: &str) -> Result<NavigationOutcome> {
        let to = RouteLocation::parse(path_and_query)?;
        self.navigate(to).await
    }

    /// Push a new location.
    ///
    /// A `/search` target goes through the entry guard once; its redirect
    /// always names an address or `not-found` route, never another search.
    pub async fn navigate(&mut self, to: RouteLocation) -> Result<NavigationOutcome> {
        let mut target = to;
        if target.name == RouteName::Search {
            match self.orchestrator.before_enter_search(&target).await {
                EntryDecision::Redirect(next) => {
                    debug!(from = %target, to = %next, "search redirect");
                    target = next;
                }
                EntryDecision::Abort => return Ok(NavigationOutcome::Aborted),
                EntryDecision::Rejected => return Ok(NavigationOutcome::Rejected),
            }
        }

        let saved = self.history();
        let previous = std::mem::replace(&mut self.current, target.clone());
        self.back.push(previous.clone());
        self.forward.clear();
        self.after_commit(target, previous, saved).await
    }

    /// Step back one entry; `None` when history is empty
    pub async fn back(&mut self) -> Result<Option<NavigationOutcome>> {
        let saved = self.history();
        let Some(target) = self.back.pop() else {
            return Ok(None);
        };
        let previous = std::mem::replace(&mut self.current, target.clone());
        self.forward.push(previous.clone());
        self.after_commit(target, previous, saved).await.map(Some)
    }

    /// Step forward one entry; `None` when there is nothing ahead
    pub async fn forward(&mut self) -> Result<Option<NavigationOutcome>> {
        let saved = self.history();
        let Some(target) = self.forward.pop() else {
            return Ok(None);
        };
        let previous = std::mem::replace(&mut self.current, target.clone());
        self.back.push(previous.clone());
        self.after_commit(target, previous, saved).await.map(Some)
    }

    fn history(&self) -> History {
        History {
            current: self.current.clone(),
            back: self.back.clone(),
            forward: self.forward.clone(),
        }
    }

    /// Run the after-navigation hook; a rejected navigation is rolled back.
    async fn after_commit(
        &mut self,
        target: RouteLocation,
        previous: RouteLocation,
        saved: History,
    ) -> Result<NavigationOutcome> {
        let request = NavigationRequest::new(target, previous);
        let report = self.orchestrator.after_each(&request).await?;
        if report.is_rejected() {
            debug!(route = %request.target, "navigation rejected; restoring history");
            self.current = saved.current;
            self.back = saved.back;
            self.forward = saved.forward;
            return Ok(NavigationOutcome::Rejected);
        }
        Ok(NavigationOutcome::Completed(report))
    }
}

/// Route and history stacks as they were before a navigation
#[derive(Debug)]
struct History {
    current: RouteLocation,
    back: Vec<RouteLocation>,
    forward: Vec<RouteLocation>,
}
