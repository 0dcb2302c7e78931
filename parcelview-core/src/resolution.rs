//! Typed outcome of a resolver call

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a resolver call produced
///
/// `NotFound` is a valid terminal answer. `Failed` covers non-response
/// failures (transport errors, undecodable bodies) and carries the reason
/// for logging. `Superseded` means a newer request was issued for the same
/// slot before this one came back, so the response was discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Found(T),
    NotFound,
    Failed(String),
    Superseded,
}

/// Payload-free summary of a [`Resolution`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Found,
    NotFound,
    Failed,
    Superseded,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Found => "found",
            Outcome::NotFound => "not-found",
            Outcome::Failed => "failed",
            Outcome::Superseded => "superseded",
        })
    }
}

impl<T> Resolution<T> {
    pub fn outcome(&self) -> Outcome {
        match self {
            Resolution::Found(_) => Outcome::Found,
            Resolution::NotFound => Outcome::NotFound,
            Resolution::Failed(_) => Outcome::Failed,
            Resolution::Superseded => Outcome::Superseded,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolution::NotFound)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Resolution::Failed(_))
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            Resolution::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_found(self) -> Option<T> {
        match self {
            Resolution::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Found(value) => Resolution::Found(f(value)),
            Resolution::NotFound => Resolution::NotFound,
            Resolution::Failed(reason) => Resolution::Failed(reason),
            Resolution::Superseded => Resolution::Superseded,
        }
    }
}
