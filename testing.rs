//! Shared fixtures for unit tests: a tiny expression-tree provider and
//! helpers that wrap its constructors and operations.

use std::rc::Rc;

use crate::{
    grammar::{Constructor, Operation},
    provider::Provider,
};

/// A symbolic expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Expr {
    Leaf(&'static str),
    Apply(&'static str, Vec<Rc<Expr>>),
}

impl Expr {
    pub(crate) fn render(&self) -> String {
        match self {
            Expr::Leaf(name) => (*name).to_owned(),
            Expr::Apply(name, children) => {
                let inner: Vec<String> = children.iter().map(|c| c.render()).collect();
                format!("{}({})", name, inner.join(", "))
            }
        }
    }
}

/// Nodes produced so far, with every finished root collected in `outputs`.
#[derive(Debug, Default)]
pub(crate) struct ExprStore {
    pub(crate) outputs: Vec<Rc<Expr>>,
}

/// Provider building shared [`Expr`] trees, fingerprinted as 8-row truth
/// tables packed into a `u64`.
pub(crate) struct Exprs;

impl Provider for Exprs {
    type Store = ExprStore;
    type Node = Rc<Expr>;
    type Value = u64;

    fn construct(&self) -> Self::Store {
        ExprStore::default()
    }

    fn output(&self, store: &mut Self::Store, root: Self::Node) {
        store.outputs.push(root);
    }
}

pub(crate) fn nullary(name: &'static str) -> Constructor<Exprs> {
    Constructor::Nullary(Box::new(move |_| Rc::new(Expr::Leaf(name))))
}

pub(crate) fn unary(name: &'static str) -> Constructor<Exprs> {
    Constructor::Unary(Box::new(move |_, child| {
        Rc::new(Expr::Apply(name, vec![child]))
    }))
}

pub(crate) fn binary(name: &'static str) -> Constructor<Exprs> {
    Constructor::Binary(Box::new(move |_, left, right| {
        Rc::new(Expr::Apply(name, vec![left, right]))
    }))
}

/// Truth table of a projection variable over three inputs.
pub(crate) fn var_op(mask: u64) -> Operation<Exprs> {
    Operation::Nullary(Box::new(move || mask))
}

pub(crate) fn and_op() -> Operation<Exprs> {
    Operation::Binary(Box::new(|left, right| left & right))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{and_op, var_op, Expr};
    use crate::grammar::Operation;

    #[test]
    fn render_nests_applications() {
        use std::rc::Rc;

        let a = Rc::new(Expr::Leaf("a"));
        let b = Rc::new(Expr::Leaf("b"));
        let and = Rc::new(Expr::Apply("and", vec![a.clone(), b]));
        let not = Expr::Apply("not", vec![and]);
        assert_eq!(not.render(), "not(and(a, b))");
        assert_eq!(a.render(), "a");
    }

    #[test]
    fn operations_compute_truth_tables() {
        let Operation::Binary(and) = and_op() else {
            unreachable!()
        };
        let Operation::Nullary(a) = var_op(0xAA) else {
            unreachable!()
        };
        assert_eq!(and(&a(), &0xCC), 0x88);
    }
}
