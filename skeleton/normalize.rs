use crate::skeleton::skeleton::Skeleton;

impl Skeleton {
    /// Pre-process a raw skeleton for assignment sweeping.
    ///
    /// Two passes:
    ///
    /// 1. every free (`0`) input is expanded into a fresh explicit leaf slot,
    ///    padded with `max_arity` zero inputs. Leaf slots are prepended, so
    ///    they occupy the fastest-changing odometer positions; existing
    ///    references are remapped accordingly. The result has no free input
    ///    left on any operator slot;
    /// 2. whenever all of a slot's children are leaves, its references are
    ///    stored in ascending order. Leaf slots are interchangeable until a
    ///    symbol is assigned, so this removes one axis of symmetric
    ///    assignments before the duplicate filter ever runs.
    ///
    /// Raw zeros are free inputs, so normalizing an already-normalized
    /// skeleton would expand its leaf slots again; the engine normalizes
    /// each incoming skeleton exactly once.
    #[must_use]
    pub fn normalized(&self, max_arity: u32) -> Skeleton {
        let free_inputs: usize = self
            .slots
            .iter()
            .map(|slot| slot.iter().filter(|&&input| input == 0).count())
            .sum();

        let mut slots = Vec::with_capacity(free_inputs + self.slots.len());
        for _ in 0..free_inputs {
            slots.push(vec![0; max_arity as usize]);
        }

        let mut next_leaf = 1;
        for slot in &self.slots {
            let remapped = slot
                .iter()
                .map(|&input| {
                    if input == 0 {
                        let leaf = next_leaf;
                        next_leaf += 1;
                        leaf
                    } else {
                        input + free_inputs as u32
                    }
                })
                .collect();
            slots.push(remapped);
        }

        let mut normalized = Skeleton::new(slots);
        normalized.reorder_leaf_children();
        normalized
    }

    /// Sort each slot's references when every child is a leaf.
    fn reorder_leaf_children(&mut self) {
        for index in (0..self.slots.len()).rev() {
            let all_leaves = self
                .children_of(index)
                .iter()
                .all(|&child| self.is_leaf(child));
            if all_leaves {
                self.slots[index].sort_unstable();
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::skeleton::Skeleton;

    #[test]
    fn free_inputs_become_leaf_slots() {
        // And(leaf, leaf): one raw slot, both inputs free.
        let raw = Skeleton::new(vec![vec![0, 0]]);
        let normalized = raw.normalized(2);

        assert_eq!(normalized.slot_count(), 3);
        assert!(normalized.is_leaf(0));
        assert!(normalized.is_leaf(1));
        assert_eq!(normalized.inputs_of(2), &[1, 2]);
        assert_eq!(normalized.connected_inputs(2), 2);
        assert_eq!(normalized.sink_index(), 2);
    }

    #[test]
    fn connected_references_are_remapped() {
        // Slot 1 consumes slot 0 plus one free input.
        let raw = Skeleton::new(vec![vec![0, 0], vec![1, 0]]);
        let normalized = raw.normalized(2);

        // Three free inputs expand into leaves 0..3.
        assert_eq!(normalized.slot_count(), 5);
        assert_eq!(normalized.inputs_of(3), &[1, 2]);
        // Slot 1's connected reference keeps its position; its free input
        // binds to the third fresh leaf.
        assert_eq!(normalized.inputs_of(4), &[4, 3]);
        assert_eq!(normalized.connected_inputs(4), 2);
    }

    #[test]
    fn leaf_pairs_are_stored_sorted() {
        // Raw references out of order over two future leaves.
        let raw = Skeleton::new(vec![vec![0], vec![0], vec![2, 1]]);
        let normalized = raw.normalized(1);

        // Slots 0 and 1 wrap the two free inputs; 2 and 3 are the original
        // unary slots, and the sink's all-leaf children... none: children of
        // the sink are the unary slots, so its order is preserved.
        assert_eq!(normalized.inputs_of(4), &[4, 3]);
    }

    #[test]
    fn sorted_when_all_children_are_leaves() {
        let raw = Skeleton::new(vec![vec![0, 0]]);
        let normalized = raw.normalized(2);
        let sink = normalized.sink_index();
        let mut sorted = normalized.inputs_of(sink).to_vec();
        sorted.sort_unstable();
        assert_eq!(normalized.inputs_of(sink), sorted.as_slice());
    }
}
