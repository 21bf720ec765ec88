use rustc_hash::FxHashMap;

use crate::{
    error::{EnumerationError, Result},
    grammar::{Constructor, Grammar, SymbolIdx},
    provider::Provider,
    skeleton::{AssignmentSpace, Skeleton},
};

/// Build the provider-native object for one surviving assignment.
///
/// Slots are constructed bottom-up along the DFS post-order, so every child
/// node exists before its parent asks for it. Leaf nodes are keyed by symbol
/// and shared: two slots assigned the same terminal receive the same node.
/// Every terminal of the grammar is constructed up front, highest symbol
/// index first, so the provider sees a stable registration order regardless
/// of which terminals this assignment happens to use.
pub(crate) fn materialize<P: Provider>(
    provider: &P,
    grammar: &Grammar<P>,
    skeleton: &Skeleton,
    space: &AssignmentSpace,
    cursors: &[usize],
) -> Result<P::Store> {
    let mut store = provider.construct();

    let mut leaves: FxHashMap<SymbolIdx, P::Node> = FxHashMap::default();
    for &terminal in grammar.terminals().iter().rev() {
        match grammar.symbol(terminal).constructor() {
            Constructor::Nullary(build) => {
                leaves.insert(terminal, build(&mut store));
            }
            other => {
                return Err(EnumerationError::UnsupportedArity {
                    symbol: terminal.0,
                    arity: other.arity(),
                })
            }
        }
    }

    let mut built: FxHashMap<usize, P::Node> = FxHashMap::default();
    for &slot in skeleton.dfs_post_order() {
        let symbol = space.symbol_at(slot, cursors[slot]);
        if grammar.symbol(symbol).is_terminal() {
            built.insert(slot, leaves[&symbol].clone());
            continue;
        }

        let children = skeleton.children_of(slot);
        let constructor = grammar.symbol(symbol).constructor();
        if constructor.arity() as usize != children.len() {
            return Err(EnumerationError::UnsupportedArity {
                symbol: symbol.0,
                arity: constructor.arity(),
            });
        }

        let node = match constructor {
            Constructor::Nullary(build) => build(&mut store),
            Constructor::Unary(build) => build(&mut store, built[&children[0]].clone()),
            Constructor::Binary(build) => build(
                &mut store,
                built[&children[0]].clone(),
                built[&children[1]].clone(),
            ),
            Constructor::Ternary(build) => build(
                &mut store,
                built[&children[0]].clone(),
                built[&children[1]].clone(),
                built[&children[2]].clone(),
            ),
        };
        built.insert(slot, node);
    }

    let root = built[&skeleton.sink_index()].clone();
    provider.output(&mut store, root);
    Ok(store)
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::materialize;
    use crate::{
        grammar::{Grammar, SymbolSpec},
        skeleton::{AssignmentSpace, Skeleton},
        testing::{binary, nullary, Expr, Exprs},
    };

    fn fixture() -> (Grammar<Exprs>, Skeleton, AssignmentSpace) {
        let grammar = Grammar::build(vec![
            SymbolSpec::new("a", 0, nullary("a")),
            SymbolSpec::new("b", 0, nullary("b")),
            SymbolSpec::new("and", 2, binary("and")),
        ])
        .unwrap();
        let skeleton = Skeleton::new(vec![vec![0, 0], vec![0, 1]]).normalized(2);
        let space = AssignmentSpace::build(&grammar, &skeleton).unwrap();
        (grammar, skeleton, space)
    }

    #[test]
    fn builds_bottom_up() {
        let (grammar, skeleton, space) = fixture();

        // Normalization leaves the sink with one leaf child and one gate
        // child, in that order.
        let store = materialize(&Exprs, &grammar, &skeleton, &space, &[0, 1, 0, 0, 0]).unwrap();
        assert_eq!(store.outputs.len(), 1);
        assert_eq!(store.outputs[0].render(), "and(a, and(a, b))");
    }

    #[test]
    fn leaves_with_the_same_symbol_are_shared() {
        let (grammar, skeleton, space) = fixture();

        let store = materialize(&Exprs, &grammar, &skeleton, &space, &[0, 0, 0, 0, 0]).unwrap();
        let root = &store.outputs[0];
        let Expr::Apply(_, outer) = root.as_ref() else {
            panic!("sink must be an application");
        };
        let Expr::Apply(_, inner) = outer[1].as_ref() else {
            panic!("inner slot must be an application");
        };
        // All three "a" references resolve to one node.
        assert!(Rc::ptr_eq(&inner[0], &inner[1]));
        assert!(Rc::ptr_eq(&inner[0], &outer[0]));
    }
}
