use super::outcome::{ItemResult, Outcome, Phase, PhaseReport};
use std::fmt;

/// Outcome counts of a single phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Counts {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Created { .. } => self.created += 1,
            Outcome::SkippedAlreadyExists => self.skipped += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.skipped + self.failed
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created {}, skipped {}, failed {}",
            self.created, self.skipped, self.failed
        )
    }
}

/// Aggregated result of a migration run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub branches: Counts,
    pub pull_requests: Counts,
    /// Phases that could not list their entities, with the reason.
    pub aborted: Vec<(Phase, String)>,
    pub failures: Vec<(Phase, ItemResult)>,
}

impl RunSummary {
    pub fn record_report(&mut self, report: &PhaseReport) {
        let counts = self.counts_mut(report.phase);
        report.outcomes().for_each(|outcome| counts.record(outcome));

        self.failures.extend(
            report
                .results
                .iter()
                .filter(|result| result.outcome.is_failed())
                .map(|result| (report.phase, result.to_owned())),
        );
    }

    pub fn record_abort(&mut self, phase: Phase, reason: impl Into<String>) {
        self.aborted.push((phase, reason.into()));
    }

    pub fn counts(&self, phase: Phase) -> Counts {
        match phase {
            Phase::Branches => self.branches,
            Phase::PullRequests => self.pull_requests,
        }
    }

    fn counts_mut(&mut self, phase: Phase) -> &mut Counts {
        match phase {
            Phase::Branches => &mut self.branches,
            Phase::PullRequests => &mut self.pull_requests,
        }
    }

    pub fn failed(&self) -> usize {
        self.branches.failed + self.pull_requests.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn has_aborted_phases(&self) -> bool {
        !self.aborted.is_empty()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Migration summary")?;
        writeln!(f, "  branches:      {}", self.branches)?;
        write!(f, "  pull requests: {}", self.pull_requests)?;

        for (phase, result) in &self.failures {
            write!(f, "\n  {} / {}: {}", phase, result.item, result.outcome)?;
        }

        for (phase, reason) in &self.aborted {
            write!(f, "\n  {} phase aborted: {}", phase, reason)?;
        }

        Ok(())
    }
}
