/// Check that a slice contains no repeated element.
///
/// Sorts a local copy, so `O(n log n)`; the inputs here are child lists of
/// at most three entries.
pub(crate) fn is_unique<T: Ord + Clone>(items: &[T]) -> bool {
    let mut sorted = items.to_vec();
    sorted.sort();
    sorted.windows(2).all(|w| w[0] != w[1])
}

/// Check that a slice is non-decreasing.
pub(crate) fn is_non_decreasing<T: Ord>(items: &[T]) -> bool {
    items.windows(2).all(|w| w[0] <= w[1])
}

#[cfg(test)]
mod test {
    use super::{is_non_decreasing, is_unique};

    #[test]
    fn unique_slices() {
        assert!(is_unique::<u32>(&[]));
        assert!(is_unique(&[1]));
        assert!(is_unique(&[2, 1, 3]));
        assert!(!is_unique(&[2, 1, 2]));
    }

    #[test]
    fn non_decreasing_slices() {
        assert!(is_non_decreasing::<u32>(&[]));
        assert!(is_non_decreasing(&[1, 1, 2]));
        assert!(!is_non_decreasing(&[1, 2, 1]));
    }
}
