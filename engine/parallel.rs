use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use rustc_hash::FxHashMap;

use crate::{
    engine::{
        enumerator::{record_fingerprint, Control, EnumerationOptions, Outcome},
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

/// The parallel callback's view of one surviving candidate.
///
/// Unlike the sequential session this cannot steer the odometer; workers own
/// whole skeletons and the only cross-worker signal is the stop flag.
pub struct ParallelSession<'a, P: Provider> {
    grammar: &'a Grammar<P>,
    skeleton: &'a Skeleton,
    assignment: Vec<SymbolIdx>,
    minimal_sizes: &'a Mutex<FxHashMap<P::Value, usize>>,
    stop: &'a AtomicBool,
}

impl<P: Provider> ParallelSession<'_, P> {
    #[must_use]
    pub fn skeleton(&self) -> &Skeleton {
        self.skeleton
    }

    #[must_use]
    pub fn current_assignment(&self) -> &[SymbolIdx] {
        &self.assignment
    }

    #[must_use]
    pub fn cost(&self) -> i64 {
        self.assignment
            .iter()
            .map(|&idx| i64::from(self.grammar.symbol(idx).cost()))
            .sum()
    }

    /// Register a fingerprint in the shared memo. Best-effort across
    /// workers: two candidates with the same value may both return `true`
    /// when their registrations race.
    pub fn record_fingerprint(&self, value: P::Value) -> bool {
        let mut minimal_sizes = self
            .minimal_sizes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        record_fingerprint(&mut minimal_sizes, value, self.skeleton.slot_count())
    }

    /// Ask every worker to finish its current candidate and stop.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Skeleton-granularity parallel sweep.
///
/// Skeletons are distributed to worker threads over a queue; each worker
/// runs the full sequential pipeline on the skeletons it receives, so every
/// structural jump stays valid. The fingerprint memo is shared behind a
/// mutex and checked without cross-worker ordering, so functional-duplicate
/// pruning is best-effort: a duplicate pair split across workers may
/// occasionally both survive.
pub struct ParallelEnumerator<'g, P: Provider> {
    grammar: &'g Grammar<P>,
    options: EnumerationOptions,
    workers: usize,
    stats: Stats,
}

impl<'g, P: Provider> ParallelEnumerator<'g, P> {
    pub fn new(grammar: &'g Grammar<P>) -> Self {
        Self::with_options(grammar, EnumerationOptions::default())
    }

    pub fn with_options(grammar: &'g Grammar<P>, options: EnumerationOptions) -> Self {
        let workers = std::thread::available_parallelism().map_or(1, usize::from);
        Self {
            grammar,
            options,
            workers,
            stats: Stats::default(),
        }
    }

    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    #[must_use]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Sweep the skeletons across the worker pool.
    ///
    /// The callback runs on worker threads and may be invoked concurrently;
    /// the provider is shared by reference and must hand out independent
    /// stores.
    pub fn enumerate<I, F>(&mut self, provider: &P, skeletons: I, callback: F) -> Result<Outcome>
    where
        P: Sync,
        P::Value: Send,
        I: IntoIterator<Item = Skeleton>,
        F: Fn(&ParallelSession<'_, P>, P::Store) -> Control + Send + Sync,
    {
        let (sender, receiver) = crossbeam_channel::unbounded();
        for skeleton in skeletons {
            // The queue is unbounded and the receiver outlives this loop.
            let _ = sender.send(skeleton);
        }
        drop(sender);

        let minimal_sizes = Mutex::new(FxHashMap::default());
        let stop = AtomicBool::new(false);
        let grammar = self.grammar;
        let options = &self.options;
        let callback = &callback;

        let results: Vec<Result<Stats>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..self.workers)
                .map(|_| {
                    let receiver = receiver.clone();
                    let minimal_sizes = &minimal_sizes;
                    let stop = &stop;
                    scope.spawn(move || {
                        sweep_worker(
                            grammar,
                            options,
                            provider,
                            receiver,
                            minimal_sizes,
                            stop,
                            callback,
                        )
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("worker panicked"))
                .collect()
        });

        for result in results {
            self.stats.merge(&result?);
        }
        if stop.load(Ordering::Relaxed) {
            Ok(Outcome::Stopped)
        } else {
            Ok(Outcome::Exhausted)
        }
    }
}

fn sweep_worker<P, F>(
    grammar: &Grammar<P>,
    options: &EnumerationOptions,
    provider: &P,
    receiver: crossbeam_channel::Receiver<Skeleton>,
    minimal_sizes: &Mutex<FxHashMap<P::Value, usize>>,
    stop: &AtomicBool,
    callback: &F,
) -> Result<Stats>
where
    P: Provider,
    F: Fn(&ParallelSession<'_, P>, P::Store) -> Control,
{
    let mut stats = Stats::default();

    for skeleton in receiver.iter() {
        if stop.load(Ordering::Relaxed) {
            break;
        }

        let skeleton = skeleton.normalized(grammar.max_arity());
        let space = match AssignmentSpace::build(grammar, &skeleton) {
            Ok(space) => space,
            Err(EnumerationError::UnsupportedTopology { slot }) => {
                tracing::debug!(slot, "no symbol fits a slot, skipping skeleton");
                stats.skeletons_skipped += 1;
                continue;
            }
            Err(fatal) => return Err(fatal),
        };
        stats.skeletons += 1;

        let mut odometer = Odometer::new(&space);
        loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            stats.candidates_visited += 1;
            let cursors = odometer.current();

            if let Verdict::Duplicate { resume_at, rule } =
                structural_verdict(grammar, &skeleton, &space, cursors)
            {
                stats.record_prune(rule);
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

            if skeleton.slot_count() > options.simulation_threshold {
                if let Some(value) = simulate(grammar, &skeleton, &space, cursors) {
                    let fresh = {
                        let mut minimal_sizes = minimal_sizes
                            .lock()
                            .unwrap_or_else(std::sync::PoisonError::into_inner);
                        record_fingerprint(&mut minimal_sizes, value, skeleton.slot_count())
                    };
                    if !fresh {
                        stats.record_prune(Rule::Fingerprint);
                        if odometer.advance() {
                            continue;
                        }
                        break;
                    }
                }
            }

            let assignment = space.resolve(cursors);
            let store = materialize(provider, grammar, &skeleton, &space, cursors)?;
            stats.emitted += 1;

            let session = ParallelSession {
                grammar,
                skeleton: &skeleton,
                assignment,
                minimal_sizes,
                stop,
            };
            if callback(&session, store) == Control::Stop {
                stop.store(true, Ordering::Relaxed);
                break;
            }
            if !odometer.advance() {
                break;
            }
        }
    }

    Ok(stats)
}
