use crate::skeleton::AssignmentSpace;

/// Mixed-radix counter over a skeleton's assignment space.
///
/// One cursor per slot; slot 0 is the fastest-changing digit. The duplicate
/// filter relies on this order: incrementing at position `p` never disturbs
/// a slot above `p`, and resetting the slots below `p` lands on the
/// lexicographically smallest member of the remaining space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Odometer {
    cursors: Vec<usize>,
    radices: Vec<usize>,
}

impl Odometer {
    #[must_use]
    pub fn new(space: &AssignmentSpace) -> Self {
        Odometer {
            cursors: vec![0; space.slot_count()],
            radices: space.cardinalities(),
        }
    }

    #[must_use]
    pub fn current(&self) -> &[usize] {
        &self.cursors
    }

    /// Step to the next assignment. Returns `false` iff every digit rolled
    /// over, i.e. the space is exhausted.
    pub fn advance(&mut self) -> bool {
        self.carry_from(0)
    }

    /// Reset every slot strictly below `position` to its first candidate,
    /// then carry-increment starting at `position`.
    ///
    /// This is the jump-ahead primitive: when every assignment differing
    /// only in slots below `position` is known to be equivalent to one
    /// already rejected, this skips the whole class in O(slots).
    pub fn advance_from(&mut self, position: usize) -> bool {
        for cursor in &mut self.cursors[..position] {
            *cursor = 0;
        }
        self.carry_from(position)
    }

    fn carry_from(&mut self, position: usize) -> bool {
        for slot in position..self.cursors.len() {
            if self.cursors[slot] + 1 == self.radices[slot] {
                self.cursors[slot] = 0;
            } else {
                self.cursors[slot] += 1;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use super::Odometer;
    use crate::{
        grammar::{Grammar, SymbolSpec},
        skeleton::{AssignmentSpace, Skeleton},
        testing::{binary, nullary, Exprs},
    };

    fn space(terminals: usize, raw: Vec<Vec<u32>>) -> AssignmentSpace {
        let mut specs = Vec::new();
        for index in 0..terminals {
            specs.push(SymbolSpec::new(format!("t{index}"), 0, nullary("t")));
        }
        specs.push(SymbolSpec::new("and", 2, binary("and")));
        let grammar = Grammar::<Exprs>::build(specs).unwrap();
        let skeleton = Skeleton::new(raw).normalized(2);
        AssignmentSpace::build(&grammar, &skeleton).unwrap()
    }

    #[test]
    fn visits_the_whole_product_without_repeats() {
        // Two chained binary slots over three free inputs: cardinalities
        // [3, 3, 3, 1, 1] with three terminals.
        let space = space(3, vec![vec![0, 0], vec![1, 0]]);
        let mut odometer = Odometer::new(&space);

        let product: usize = space.cardinalities().iter().product();
        let mut seen = BTreeSet::new();
        seen.insert(odometer.current().to_vec());
        let mut steps = 1;
        while odometer.advance() {
            assert!(seen.insert(odometer.current().to_vec()), "repeat visited");
            steps += 1;
        }

        assert_eq!(steps, product);
        assert_eq!(seen.len(), product);
    }

    #[test]
    fn advance_from_resets_below_and_increments_at_position() {
        let space = space(4, vec![vec![0, 0], vec![1, 0], vec![2, 0]]);
        let mut odometer = Odometer::new(&space);
        // Cardinalities: [4, 4, 4, 4, 1, 1, 1].

        for _ in 0..3 {
            assert!(odometer.advance());
        }
        assert_eq!(&odometer.current()[..4], &[3, 0, 0, 0]);

        assert!(odometer.advance_from(1));
        assert_eq!(&odometer.current()[..4], &[0, 1, 0, 0]);

        for _ in 0..2 {
            assert!(odometer.advance());
        }
        assert!(odometer.advance_from(2));
        assert_eq!(&odometer.current()[..4], &[0, 0, 1, 0]);

        // Carry past a saturated digit: set slot 3 to its last value first.
        for _ in 0..3 {
            assert!(odometer.advance_from(3));
        }
        assert_eq!(&odometer.current()[..4], &[0, 0, 1, 3]);
        assert!(odometer.advance_from(2));
        assert_eq!(&odometer.current()[..4], &[0, 0, 2, 3]);
    }

    #[test]
    fn exhaustion_reports_false_once() {
        let space = space(2, vec![vec![0, 0]]);
        let mut odometer = Odometer::new(&space);

        let mut count = 1;
        while odometer.advance() {
            count += 1;
        }
        assert_eq!(count, 4);
        assert_eq!(odometer.current(), &[0, 0, 0]);
    }

    #[test]
    fn advance_from_end_exhausts() {
        let space = space(2, vec![vec![0, 0]]);
        let mut odometer = Odometer::new(&space);
        // The sink has a single candidate; carrying at it rolls off the end.
        assert!(!odometer.advance_from(2));
    }
}
