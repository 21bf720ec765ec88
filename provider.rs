use std::hash::Hash;

/// The target-representation contract the engine builds candidates against.
///
/// A provider knows how to open a fresh store (a logic network, a formula
/// store, an SMT context), and how to register the finished root node as the
/// store's output. The per-symbol node constructors live on the grammar
/// itself, see [`Constructor`](crate::grammar::Constructor).
///
/// `Value` is the semantic fingerprint the duplicate filter memoizes when
/// simulation-based pruning is enabled -- typically a truth-table word.
/// Providers that do not simulate can set `Value = ()`.
pub trait Provider {
    type Store;
    type Node: Clone;
    type Value: Clone + Eq + Hash;

    /// Open a fresh, empty target store for one candidate.
    fn construct(&self) -> Self::Store;

    /// Register `root` as the output of the finished store.
    fn output(&self, store: &mut Self::Store, root: Self::Node);
}
