//! # Grammar-guided exhaustive enumeration of typed expression trees.
//!
//! Sweep every expression that can be built from a user-supplied grammar of
//! typed operators -- logic gates, temporal-logic connectives, SMT operators --
//! over a family of fixed DAG shapes ("skeletons"), skipping symmetric and
//! duplicate candidates before they are ever materialized, and hand each
//! surviving candidate to a caller-supplied callback.
//!
//! The library currently supports:
//! * grammars of symbols with arity 0 to 3, per-symbol cost, and structural
//!   attributes (commutative, idempotent, no double application, same gate
//!   exists),
//! * odometer-style sweeping of all symbol assignments over a skeleton, with
//!   position-aware jump-ahead past whole equivalence classes of rejected
//!   assignments,
//! * semantic pruning of functionally duplicate candidates via per-symbol
//!   simulation callbacks and a fingerprint-to-minimal-size memo,
//! * lazy bottom-up materialization of surviving candidates into a concrete
//!   target store with shared terminal nodes,
//! * a skeleton-granularity parallel sweep with best-effort duplicate
//!   accumulation.
//!
//! The following snippet enumerates every AND expression over two inputs
//! that survives commutativity and idempotence pruning:
//!
//! ```rust
//! use enumrs::engine::{Control, Enumerator};
//! use enumrs::grammar::{Attributes, Constructor, Grammar, SymbolSpec};
//! use enumrs::provider::Provider;
//! use enumrs::skeleton::Skeleton;
//!
//! struct Strings;
//!
//! impl Provider for Strings {
//!     type Store = Vec<String>;
//!     type Node = String;
//!     type Value = ();
//!
//!     fn construct(&self) -> Self::Store {
//!         Vec::new()
//!     }
//!
//!     fn output(&self, store: &mut Self::Store, root: Self::Node) {
//!         store.push(root);
//!     }
//! }
//!
//! let grammar = Grammar::<Strings>::build(vec![
//!     SymbolSpec::new("a", 0, Constructor::Nullary(Box::new(|_| "a".to_string()))),
//!     SymbolSpec::new("b", 0, Constructor::Nullary(Box::new(|_| "b".to_string()))),
//!     SymbolSpec::new(
//!         "and",
//!         2,
//!         Constructor::Binary(Box::new(|_, l, r| format!("({l} & {r})"))),
//!     )
//!     .with_attributes(Attributes::COMMUTATIVE),
//! ])
//! .unwrap();
//!
//! // One binary operator slot; both inputs free, to be bound to terminals.
//! let skeleton = Skeleton::new(vec![vec![0, 0]]);
//!
//! let mut emitted = Vec::new();
//! let mut enumerator = Enumerator::new(&grammar, Strings);
//! enumerator
//!     .enumerate([skeleton], |_, store| {
//!         emitted.extend(store);
//!         Control::Continue
//!     })
//!     .unwrap();
//!
//! // "(b & a)" is skipped: it is the same candidate as "(a & b)".
//! assert_eq!(emitted, vec!["(a & a)", "(a & b)", "(b & b)"]);
//! ```
//!
//! Main entry points:
//!
//! * [`crate::grammar::Grammar::build`] -- validate and index a symbol catalogue
//! * [`crate::engine::Enumerator::enumerate`] -- sweep a list of skeletons sequentially
//! * [`crate::engine::ParallelEnumerator::enumerate`] -- sweep skeletons across worker threads
//! * [`crate::engine::Session`] -- the callback's handle into the running sweep
//!
//! Skeletons are produced by an external generator and consumed as plain
//! slot/input-reference lists; see [`crate::skeleton::Skeleton`].

pub mod engine;
pub mod error;
pub mod grammar;
pub mod provider;
pub mod skeleton;
pub mod stats;
pub(crate) mod util;

pub use crate::error::{EnumerationError, Result};

#[cfg(test)]
pub(crate) mod testing;
