use rustc_hash::FxHashSet;

use crate::{
    grammar::{Attributes, Grammar, Operation, SymbolIdx},
    provider::Provider,
    skeleton::{AssignmentSpace, Skeleton},
    util::{is_non_decreasing, is_unique},
};

/// Which pruning rule rejected a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Commutative,
    SameGate,
    Idempotent,
    DoubleApplication,
    Fingerprint,
}

/// Outcome of the duplicate filter for one assignment.
///
/// `Duplicate` carries the earliest slot whose change could produce a
/// not-yet-visited candidate; the engine feeds it straight into
/// [`Odometer::advance_from`](crate::engine::Odometer::advance_from).
/// `resume_at == 0` claims no jump beyond a plain advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Unique,
    Duplicate { resume_at: usize, rule: Rule },
}

/// Decide whether the current assignment is the canonical representative of
/// its symmetry class, using only the skeleton structure and the grammar
/// attributes.
///
/// Slots are scanned from the sink towards the leaves. All jump targets
/// rely on the odometer's lexicographic order: when a violation is first
/// observed, every remaining assignment that differs only below the target
/// violates the same rule.
pub(crate) fn structural_verdict<P: Provider>(
    grammar: &Grammar<P>,
    skeleton: &Skeleton,
    space: &AssignmentSpace,
    cursors: &[usize],
) -> Verdict {
    let mut seen_gates: FxHashSet<Vec<SymbolIdx>> = FxHashSet::default();

    for index in (0..skeleton.slot_count()).rev() {
        let symbol = space.symbol_at(index, cursors[index]);
        let attributes = grammar.attributes_of(symbol);
        if attributes.is_empty() {
            continue;
        }

        let children = skeleton.children_of(index);
        let mut leaf_symbols = Vec::with_capacity(children.len());
        let mut leaf_positions = Vec::with_capacity(children.len());
        for &child in &children {
            let assigned = space.symbol_at(child, cursors[child]);
            if grammar.symbol(assigned).is_terminal() {
                leaf_symbols.push(assigned);
                leaf_positions.push(child);
            }
        }

        if attributes.contains(Attributes::COMMUTATIVE) && !is_non_decreasing(&leaf_symbols) {
            let mut positions = leaf_positions.clone();
            positions.sort_unstable();
            return Verdict::Duplicate {
                resume_at: positions[1],
                rule: Rule::Commutative,
            };
        }

        if attributes.contains(Attributes::SAME_GATE_EXISTS)
            && !children.is_empty()
            && leaf_symbols.len() == children.len()
        {
            let mut gate = leaf_symbols.clone();
            gate.push(symbol);
            if !seen_gates.insert(gate) {
                let resume_at = leaf_positions.iter().copied().min().unwrap_or(0);
                return Verdict::Duplicate {
                    resume_at,
                    rule: Rule::SameGate,
                };
            }
        }

        if attributes.contains(Attributes::IDEMPOTENT) {
            if !is_unique(&leaf_symbols) {
                let mut positions = leaf_positions.clone();
                positions.sort_unstable();
                return Verdict::Duplicate {
                    resume_at: positions[1],
                    rule: Rule::Idempotent,
                };
            }

            // Identical whole subtrees under an idempotent symbol collapse
            // too, but equality is not monotone in cursor order, so no jump
            // stronger than a plain advance is claimed.
            let subtrees: Vec<Vec<SymbolIdx>> = children
                .iter()
                .filter(|&&child| !grammar.symbol(space.symbol_at(child, cursors[child])).is_terminal())
                .map(|&child| {
                    skeleton
                        .subtree_slots(child)
                        .into_iter()
                        .map(|slot| space.symbol_at(slot, cursors[slot]))
                        .collect()
                })
                .collect();
            if !is_unique(&subtrees) {
                return Verdict::Duplicate {
                    resume_at: 0,
                    rule: Rule::Idempotent,
                };
            }
        }

        if attributes.contains(Attributes::NO_DOUBLE_APPLICATION)
            && grammar.symbol(symbol).arity() == 1
            && children.len() == 1
        {
            let child = children[0];
            if space.symbol_at(child, cursors[child]) == symbol {
                return Verdict::Duplicate {
                    resume_at: child,
                    rule: Rule::DoubleApplication,
                };
            }
        }
    }

    Verdict::Unique
}

/// Evaluate the candidate's semantic fingerprint bottom-up over the DFS
/// order, using the per-symbol operations.
///
/// Returns `None` as soon as any assigned symbol lacks an operation; the
/// simulation-based pruning pass is then skipped for this candidate.
pub(crate) fn simulate<P: Provider>(
    grammar: &Grammar<P>,
    skeleton: &Skeleton,
    space: &AssignmentSpace,
    cursors: &[usize],
) -> Option<P::Value> {
    let mut values: Vec<Option<P::Value>> = vec![None; skeleton.slot_count()];

    for &slot in skeleton.dfs_post_order() {
        let symbol = space.symbol_at(slot, cursors[slot]);
        let operation = grammar.symbol(symbol).operation()?;
        let children = skeleton.children_of(slot);
        let value = match operation {
            Operation::Nullary(op) => op(),
            Operation::Unary(op) => op(values[children[0]].as_ref()?),
            Operation::Binary(op) => op(
                values[children[0]].as_ref()?,
                values[children[1]].as_ref()?,
            ),
            Operation::Ternary(op) => op(
                values[children[0]].as_ref()?,
                values[children[1]].as_ref()?,
                values[children[2]].as_ref()?,
            ),
        };
        values[slot] = Some(value);
    }

    values[skeleton.sink_index()].take()
}
