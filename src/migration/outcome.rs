use serde::Deserialize;
use std::{fmt, str::FromStr};

/// Result of trying to create one entity on the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created { url: Option<String> },
    SkippedAlreadyExists,
    Failed(String),
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created { url: Some(url) } => write!(f, "created ({})", url),
            Outcome::Created { url: None } => write!(f, "created"),
            Outcome::SkippedAlreadyExists => write!(f, "already exists, skipped"),
            Outcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Branches,
    #[serde(alias = "pullrequests")]
    PullRequests,
}

impl Phase {
    /// Every phase, in the order a run executes them.
    pub const ALL: [Phase; 2] = [Phase::Branches, Phase::PullRequests];
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "branches" => Ok(Phase::Branches),
            "pull_requests" | "pullrequests" | "prs" => Ok(Phase::PullRequests),
            other => Err(format!("unknown phase `{}`", other)),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Branches => write!(f, "branches"),
            Phase::PullRequests => write!(f, "pull requests"),
        }
    }
}

/// Outcome of a single item, labelled with what it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    pub item: String,
    pub outcome: Outcome,
}

/// Every item outcome of one phase, in source listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub results: Vec<ItemResult>,
}

impl PhaseReport {
    pub fn new(phase: Phase) -> Self {
        PhaseReport {
            phase,
            results: Vec::new(),
        }
    }

    pub fn record(&mut self, item: impl Into<String>, outcome: Outcome) {
        self.results.push(ItemResult {
            item: item.into(),
            outcome,
        });
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.results.iter().map(|result| &result.outcome)
    }
}
