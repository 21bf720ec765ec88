use std::cell::OnceCell;
use std::fmt::{self, Debug};

use bitvec::prelude::*;

/// One fixed topology over which symbol assignments range.
///
/// A skeleton is an ordered list of slots. Each slot holds a fixed-size
/// tuple of input references: `0` marks a free (unconnected) input that will
/// ultimately bind to some terminal symbol, and `k > 0` is a 1-based
/// reference to the earlier slot `k - 1`. All references point strictly
/// backwards, so the graph is a DAG, and the last slot is the unique sink.
///
/// Skeletons arrive from an external generator in "raw" form, where free
/// inputs are still implicit placeholders. The engine runs
/// [`Skeleton::normalized`] once per skeleton to expand every free input
/// into an explicit leaf slot before sweeping assignments.
#[derive(Clone)]
pub struct Skeleton {
    pub(crate) slots: Vec<Vec<u32>>,
    dfs: OnceCell<Vec<usize>>,
}

impl PartialEq for Skeleton {
    fn eq(&self, other: &Self) -> bool {
        // The cached DFS order is derived state and does not take part.
        self.slots == other.slots
    }
}

impl Eq for Skeleton {}

impl Skeleton {
    /// Wrap a slot list.
    ///
    /// # Panics
    ///
    /// Panics if a reference points at the current or a later slot, or if a
    /// non-sink slot is referenced by nobody (two sinks). Both indicate a
    /// malformed generator, not bad input data.
    #[must_use]
    pub fn new(slots: Vec<Vec<u32>>) -> Self {
        assert!(!slots.is_empty(), "skeleton must have at least one slot");

        let mut referenced = bitvec![0; slots.len()];
        for (index, slot) in slots.iter().enumerate() {
            for &input in slot {
                assert!(
                    (input as usize) <= index,
                    "slot {index} references slot {} which is not earlier",
                    input as usize - 1,
                );
                if input > 0 {
                    referenced.set(input as usize - 1, true);
                }
            }
        }
        for index in 0..slots.len() - 1 {
            assert!(
                referenced[index],
                "slot {index} is referenced by no later slot; the sink must be unique",
            );
        }

        Skeleton {
            slots,
            dfs: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The slot's input references; `0` entries are free inputs.
    #[must_use]
    pub fn inputs_of(&self, slot: usize) -> &[u32] {
        &self.slots[slot]
    }

    /// Number of connected (non-zero) inputs of the slot. The symbol
    /// assigned to the slot must have exactly this arity.
    #[must_use]
    pub fn connected_inputs(&self, slot: usize) -> usize {
        self.slots[slot].iter().filter(|&&input| input > 0).count()
    }

    /// By construction the last slot is always the unique sink.
    #[must_use]
    pub fn sink_index(&self) -> usize {
        self.slots.len() - 1
    }

    /// Whether the slot has no connected inputs. Meaningful on normalized
    /// skeletons, where every remaining zero belongs to a leaf slot.
    #[must_use]
    pub fn is_leaf(&self, slot: usize) -> bool {
        self.slots[slot].iter().all(|&input| input == 0)
    }

    /// The connected children of `slot`, as 0-based slot indices in input
    /// order.
    #[must_use]
    pub fn children_of(&self, slot: usize) -> Vec<usize> {
        self.slots[slot]
            .iter()
            .filter(|&&input| input > 0)
            .map(|&input| input as usize - 1)
            .collect()
    }

    /// Bottom-up construction order: every child precedes its parents, the
    /// sink comes last, shared children appear once. Computed once per
    /// skeleton and cached.
    #[must_use]
    pub fn dfs_post_order(&self) -> &[usize] {
        self.dfs.get_or_init(|| {
            let mut visited = bitvec![0; self.slots.len()];
            let mut order = Vec::with_capacity(self.slots.len());
            self.post_order_from(self.sink_index(), &mut visited, &mut order);
            order
        })
    }

    fn post_order_from(&self, slot: usize, visited: &mut BitVec, order: &mut Vec<usize>) {
        if visited[slot] {
            return;
        }
        visited.set(slot, true);
        for child in self.children_of(slot) {
            self.post_order_from(child, visited, order);
        }
        order.push(slot);
    }

    /// The assignment entries covered by the subtree rooted at `slot`, in
    /// DFS pre-order. Shared slots appear once per occurrence.
    #[must_use]
    pub(crate) fn subtree_slots(&self, slot: usize) -> Vec<usize> {
        let mut slots = Vec::new();
        self.collect_subtree(slot, &mut slots);
        slots
    }

    fn collect_subtree(&self, slot: usize, slots: &mut Vec<usize>) {
        slots.push(slot);
        for child in self.children_of(slot) {
            self.collect_subtree(child, slots);
        }
    }
}

impl Debug for Skeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Skeleton")
            .field("slots", &self.slots)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::Skeleton;

    #[test]
    fn sink_is_last_slot() {
        let skeleton = Skeleton::new(vec![vec![0, 0], vec![1, 0]]);
        assert_eq!(skeleton.sink_index(), 1);
        assert_eq!(skeleton.connected_inputs(0), 0);
        assert_eq!(skeleton.connected_inputs(1), 1);
    }

    #[test]
    #[should_panic(expected = "not earlier")]
    fn forward_reference_panics() {
        let _ = Skeleton::new(vec![vec![2, 0], vec![0, 0]]);
    }

    #[test]
    #[should_panic(expected = "sink must be unique")]
    fn two_sinks_panic() {
        let _ = Skeleton::new(vec![vec![0, 0], vec![0, 0]]);
    }

    #[test]
    fn post_order_visits_children_first_and_shares() {
        // 0 and 1 feed 2; 0 and 2 feed the sink 3. Slot 0 is shared.
        let skeleton = Skeleton::new(vec![vec![0], vec![0], vec![1, 2], vec![1, 3]]);
        let order = skeleton.dfs_post_order();
        assert_eq!(order.len(), 4);
        assert_eq!(*order.last().unwrap(), 3);
        let position = |slot: usize| order.iter().position(|&s| s == slot).unwrap();
        assert!(position(0) < position(2));
        assert!(position(1) < position(2));
        assert!(position(2) < position(3));
        // Cached result is stable.
        assert_eq!(skeleton.dfs_post_order(), order);
    }

    #[test]
    fn subtree_slots_follow_pre_order() {
        let skeleton = Skeleton::new(vec![vec![0], vec![1, 0], vec![2, 0]]);
        assert_eq!(skeleton.subtree_slots(2), vec![2, 1, 0]);
        assert_eq!(skeleton.subtree_slots(1), vec![1, 0]);
    }
}
