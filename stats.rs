//! Counters collected while enumerating.

use std::fmt::{Display, Formatter, Result};

use tabled::{settings::Style, Table, Tabled};

use crate::engine::Rule;

/// Running totals for one enumeration. Obtainable from the enumerator after
/// the run finishes, or mid-run through the session handle.
#[derive(Debug, Default, Clone, PartialEq, Eq, Tabled)]
pub struct Stats {
    /// Skeletons whose assignment space was built successfully.
    pub skeletons: u64,
    /// Skeletons skipped because some slot had an empty domain.
    pub skeletons_skipped: u64,
    /// Assignments inspected by the duplicate filter.
    pub candidates_visited: u64,
    /// Candidates that survived every filter and reached the callback.
    pub emitted: u64,
    pub pruned_commutative: u64,
    pub pruned_idempotent: u64,
    pub pruned_double_application: u64,
    pub pruned_same_gate: u64,
    pub pruned_fingerprint: u64,
}

impl Stats {
    pub(crate) fn record_prune(&mut self, rule: Rule) {
        match rule {
            Rule::Commutative => self.pruned_commutative += 1,
            Rule::Idempotent => self.pruned_idempotent += 1,
            Rule::DoubleApplication => self.pruned_double_application += 1,
            Rule::SameGate => self.pruned_same_gate += 1,
            Rule::Fingerprint => self.pruned_fingerprint += 1,
        }
    }

    /// Total number of candidates rejected by any pruning rule.
    #[must_use]
    pub fn pruned(&self) -> u64 {
        self.pruned_commutative
            + self.pruned_idempotent
            + self.pruned_double_application
            + self.pruned_same_gate
            + self.pruned_fingerprint
    }

    pub(crate) fn merge(&mut self, other: &Stats) {
        self.skeletons += other.skeletons;
        self.skeletons_skipped += other.skeletons_skipped;
        self.candidates_visited += other.candidates_visited;
        self.emitted += other.emitted;
        self.pruned_commutative += other.pruned_commutative;
        self.pruned_idempotent += other.pruned_idempotent;
        self.pruned_double_application += other.pruned_double_application;
        self.pruned_same_gate += other.pruned_same_gate;
        self.pruned_fingerprint += other.pruned_fingerprint;
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let mut table = Table::new([self]);
        table.with(Style::modern());
        write!(f, "{table}")
    }
}
