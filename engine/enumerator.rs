use bon::Builder;
use rustc_hash::FxHashMap;

use crate::{
    engine::{
        filter::{simulate, structural_verdict, Rule, Verdict},
        materialize::materialize,
        odometer::Odometer,
    },
    error::{EnumerationError, Result},
    grammar::{Grammar, SymbolIdx},
    provider::Provider,
    skeleton::{AssignmentSpace, Skeleton},
    stats::Stats,
};

/// Returned by the callback to keep the sweep going or end it early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

/// How an enumeration run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every skeleton was swept to completion.
    Exhausted,
    /// The callback asked to stop.
    Stopped,
}

/// Lifetime of the fingerprint-to-minimal-size memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FingerprintRetention {
    /// Cleared at the start of every [`Enumerator::enumerate`] call.
    #[default]
    Sweep,
    /// Kept across calls on the same enumerator.
    Keep,
}

/// Knobs for one enumerator. Construct with [`EnumerationOptions::builder`].
#[derive(Debug, Clone, Builder)]
pub struct EnumerationOptions {
    #[builder(default)]
    pub fingerprint_retention: FingerprintRetention,
    /// Candidates spanning at most this many slots are exempt from
    /// fingerprint pruning. Trivial shapes are cheaper to emit than to
    /// simulate and memoize.
    #[builder(default = 2)]
    pub simulation_threshold: usize,
}

impl Default for EnumerationOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// What the callback asked the engine to do after it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Pending {
    #[default]
    None,
    Stop,
    NextSkeleton,
    AdvanceFrom(usize),
}

/// The callback's view of the candidate it was handed, plus hooks to steer
/// the sweep.
pub struct Session<'a, P: Provider> {
    grammar: &'a Grammar<P>,
    skeleton: &'a Skeleton,
    assignment: Vec<SymbolIdx>,
    stats: &'a Stats,
    minimal_sizes: &'a mut FxHashMap<P::Value, usize>,
    pending: &'a mut Pending,
}

impl<P: Provider> Session<'_, P> {
    #[must_use]
    pub fn skeleton(&self) -> &Skeleton {
        self.skeleton
    }

    /// The symbol assigned to each slot, leaves first.
    #[must_use]
    pub fn current_assignment(&self) -> &[SymbolIdx] {
        &self.assignment
    }

    /// Sum of the per-symbol costs of the current assignment.
    #[must_use]
    pub fn cost(&self) -> i64 {
        self.assignment
            .iter()
            .map(|&idx| i64::from(self.grammar.symbol(idx).cost()))
            .sum()
    }

    /// Slot-order symbol names, for logging.
    #[must_use]
    pub fn describe(&self) -> String {
        self.assignment
            .iter()
            .map(|&idx| self.grammar.symbol(idx).name())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[must_use]
    pub fn stats(&self) -> &Stats {
        self.stats
    }

    /// Register an externally computed fingerprint for the current
    /// candidate. Returns `false` when a candidate of equal or smaller size
    /// already produced the same value; the caller will usually discard the
    /// candidate in that case.
    pub fn record_fingerprint(&mut self, value: P::Value) -> bool {
        record_fingerprint(self.minimal_sizes, value, self.skeleton.slot_count())
    }

    /// End the whole sweep after this callback returns.
    pub fn request_stop(&mut self) {
        *self.pending = Pending::Stop;
    }

    /// Abandon the rest of this skeleton's assignment space.
    pub fn request_next_skeleton(&mut self) {
        if *self.pending != Pending::Stop {
            *self.pending = Pending::NextSkeleton;
        }
    }

    /// Skip every assignment differing from the current one only below
    /// `position`, as if the filter had rejected the candidate there.
    pub fn request_advance_from(&mut self, position: usize) {
        if *self.pending == Pending::None {
            *self.pending = Pending::AdvanceFrom(position);
        }
    }
}

pub(crate) fn record_fingerprint<V: std::hash::Hash + Eq>(
    minimal_sizes: &mut FxHashMap<V, usize>,
    value: V,
    size: usize,
) -> bool {
    match minimal_sizes.entry(value) {
        std::collections::hash_map::Entry::Occupied(mut entry) => {
            if *entry.get() <= size {
                return false;
            }
            entry.insert(size);
            true
        }
        std::collections::hash_map::Entry::Vacant(entry) => {
            entry.insert(size);
            true
        }
    }
}

/// Sequential sweep over a list of skeletons.
///
/// Owns the fingerprint memo and the run statistics; both survive across
/// [`Enumerator::enumerate`] calls (subject to
/// [`EnumerationOptions::fingerprint_retention`]).
pub struct Enumerator<'g, P: Provider> {
    grammar: &'g Grammar<P>,
    provider: P,
    options: EnumerationOptions,
    minimal_sizes: FxHashMap<P::Value, usize>,
    stats: Stats,
}

impl<'g, P: Provider> Enumerator<'g, P> {
    pub fn new(grammar: &'g Grammar<P>, provider: P) -> Self {
        Self::with_options(grammar, provider, EnumerationOptions::default())
    }

    pub fn with_options(
        grammar: &'g Grammar<P>,
        provider: P,
        options: EnumerationOptions,
    ) -> Self {
        Self {
            grammar,
            provider,
            options,
            minimal_sizes: FxHashMap::default(),
            stats: Stats::default(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Sweep each skeleton's assignment space in odometer order, handing
    /// every surviving candidate's store to `callback`.
    ///
    /// Skeletons whose shape no combination of symbols can inhabit are
    /// skipped, not failed. Grammar and materialization defects abort the
    /// sweep with an error.
    pub fn enumerate<I, F>(&mut self, skeletons: I, mut callback: F) -> Result<Outcome>
    where
        I: IntoIterator<Item = Skeleton>,
        F: FnMut(&mut Session<'_, P>, P::Store) -> Control,
    {
        if self.options.fingerprint_retention == FingerprintRetention::Sweep {
            self.minimal_sizes.clear();
        }

        let grammar = self.grammar;
        for skeleton in skeletons {
            let skeleton = skeleton.normalized(grammar.max_arity());
            let space = match AssignmentSpace::build(grammar, &skeleton) {
                Ok(space) => space,
                Err(EnumerationError::UnsupportedTopology { slot }) => {
                    tracing::debug!(slot, "no symbol fits a slot, skipping skeleton");
                    self.stats.skeletons_skipped += 1;
                    continue;
                }
                Err(fatal) => return Err(fatal),
            };
            self.stats.skeletons += 1;
            tracing::debug!(
                slots = skeleton.slot_count(),
                assignments = space.cardinalities().iter().product::<usize>(),
                "sweeping skeleton"
            );

            let mut odometer = Odometer::new(&space);
            loop {
                self.stats.candidates_visited += 1;
                let cursors = odometer.current();

                if let Verdict::Duplicate { resume_at, rule } =
                    structural_verdict(grammar, &skeleton, &space, cursors)
                {
                    self.stats.record_prune(rule);
                    let more = if resume_at > 0 {
                        odometer.advance_from(resume_at)
                    } else {
                        odometer.advance()
                    };
                    if more {
                        continue;
                    }
                    break;
                }

                if skeleton.slot_count() > self.options.simulation_threshold {
                    if let Some(value) = simulate(grammar, &skeleton, &space, cursors) {
                        if !record_fingerprint(
                            &mut self.minimal_sizes,
                            value,
                            skeleton.slot_count(),
                        ) {
                            self.stats.record_prune(Rule::Fingerprint);
                            if odometer.advance() {
                                continue;
                            }
                            break;
                        }
                    }
                }

                let assignment = space.resolve(cursors);
                let store = materialize(&self.provider, grammar, &skeleton, &space, cursors)?;
                self.stats.emitted += 1;

                let mut pending = Pending::None;
                let mut session = Session {
                    grammar,
                    skeleton: &skeleton,
                    assignment,
                    stats: &self.stats,
                    minimal_sizes: &mut self.minimal_sizes,
                    pending: &mut pending,
                };
                let control = callback(&mut session, store);

                if control == Control::Stop || pending == Pending::Stop {
                    return Ok(Outcome::Stopped);
                }
                match pending {
                    Pending::NextSkeleton => break,
                    Pending::AdvanceFrom(position) => {
                        if !odometer.advance_from(position) {
                            break;
                        }
                    }
                    Pending::None | Pending::Stop => {
                        if !odometer.advance() {
                            break;
                        }
                    }
                }
            }
        }

        Ok(Outcome::Exhausted)
    }
}
