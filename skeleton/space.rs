use crate::{
    error::{EnumerationError, Result},
    grammar::{Grammar, SymbolIdx},
    provider::Provider,
    skeleton::Skeleton,
};

/// Per-slot candidate symbols for one normalized skeleton.
///
/// Slot `i` may carry exactly the symbols whose arity equals the slot's
/// connected-input count; the sink is further restricted to the grammar's
/// root candidates. Computed once per skeleton and then swept by the
/// odometer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentSpace {
    domains: Vec<Vec<SymbolIdx>>,
}

impl AssignmentSpace {
    /// Build the per-slot domains.
    ///
    /// Fails with [`UnsupportedTopology`](EnumerationError::UnsupportedTopology)
    /// if any slot's domain comes out empty -- the skeleton cannot carry this
    /// grammar and should be skipped.
    pub fn build<P: Provider>(grammar: &Grammar<P>, skeleton: &Skeleton) -> Result<Self> {
        let sink = skeleton.sink_index();
        let mut domains = Vec::with_capacity(skeleton.slot_count());

        for slot in 0..skeleton.slot_count() {
            let arity = skeleton.connected_inputs(slot) as u32;
            let mut candidates: Vec<SymbolIdx> = grammar.symbols_with_arity(arity).to_vec();
            if slot == sink {
                candidates.retain(|idx| grammar.root_candidates().contains(idx));
            }
            if candidates.is_empty() {
                return Err(EnumerationError::UnsupportedTopology { slot });
            }
            domains.push(candidates);
        }

        Ok(AssignmentSpace { domains })
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.domains.len()
    }

    #[must_use]
    pub fn domain(&self, slot: usize) -> &[SymbolIdx] {
        &self.domains[slot]
    }

    /// Domain sizes, in slot order; these are the odometer's radices.
    #[must_use]
    pub fn cardinalities(&self) -> Vec<usize> {
        self.domains.iter().map(Vec::len).collect()
    }

    /// Resolve one slot's cursor to the chosen symbol.
    #[must_use]
    pub fn symbol_at(&self, slot: usize, cursor: usize) -> SymbolIdx {
        self.domains[slot][cursor]
    }

    /// Resolve a whole cursor vector to symbols, in slot order.
    #[must_use]
    pub fn resolve(&self, cursors: &[usize]) -> Vec<SymbolIdx> {
        cursors
            .iter()
            .enumerate()
            .map(|(slot, &cursor)| self.domains[slot][cursor])
            .collect()
    }
}
