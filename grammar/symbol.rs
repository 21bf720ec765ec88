use std::fmt::{self, Debug, Display};

use derive_more::derive::From;

use crate::provider::Provider;

/// Stable index of a symbol in its grammar, assigned at build time.
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Debug, From)]
pub struct SymbolIdx(pub u32);

impl Display for SymbolIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SymbolIdx {
    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Structural attributes driving the duplicate filter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attributes: u8 {
        /// `op(a, b)` equals `op(b, a)`: only the sorted leaf order is canonical.
        const COMMUTATIVE = 1;
        /// `op(a, a)` collapses: repeated leaf children are rejected.
        const IDEMPOTENT = 1 << 1;
        /// `op(op(x))` collapses: a unary symbol may not parent itself.
        const NO_DOUBLE_APPLICATION = 1 << 2;
        /// Two slots computing the same gate over the same leaves are redundant.
        const SAME_GATE_EXISTS = 1 << 3;
    }
}

type Ctor0<P> = Box<dyn Fn(&mut <P as Provider>::Store) -> <P as Provider>::Node + Send + Sync>;
type Ctor1<P> = Box<
    dyn Fn(&mut <P as Provider>::Store, <P as Provider>::Node) -> <P as Provider>::Node
        + Send
        + Sync,
>;
type Ctor2<P> = Box<
    dyn Fn(
            &mut <P as Provider>::Store,
            <P as Provider>::Node,
            <P as Provider>::Node,
        ) -> <P as Provider>::Node
        + Send
        + Sync,
>;
type Ctor3<P> = Box<
    dyn Fn(
            &mut <P as Provider>::Store,
            <P as Provider>::Node,
            <P as Provider>::Node,
            <P as Provider>::Node,
        ) -> <P as Provider>::Node
        + Send
        + Sync,
>;

/// A per-symbol node constructor.
///
/// The callback set is closed and fixed at grammar-build time, so a tagged
/// variant per arity replaces any runtime-polymorphic dispatch. Arities
/// outside 0..=3 are deliberately unrepresentable.
pub enum Constructor<P: Provider> {
    Nullary(Ctor0<P>),
    Unary(Ctor1<P>),
    Binary(Ctor2<P>),
    Ternary(Ctor3<P>),
}

impl<P: Provider> Constructor<P> {
    /// Number of children the constructor consumes.
    #[must_use]
    pub fn arity(&self) -> u32 {
        match self {
            Constructor::Nullary(_) => 0,
            Constructor::Unary(_) => 1,
            Constructor::Binary(_) => 2,
            Constructor::Ternary(_) => 3,
        }
    }
}

impl<P: Provider> Debug for Constructor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constructor(arity = {})", self.arity())
    }
}

type Op0<P> = Box<dyn Fn() -> <P as Provider>::Value + Send + Sync>;
type Op1<P> = Box<dyn Fn(&<P as Provider>::Value) -> <P as Provider>::Value + Send + Sync>;
type Op2<P> = Box<
    dyn Fn(&<P as Provider>::Value, &<P as Provider>::Value) -> <P as Provider>::Value
        + Send
        + Sync,
>;
type Op3<P> = Box<
    dyn Fn(
            &<P as Provider>::Value,
            &<P as Provider>::Value,
            &<P as Provider>::Value,
        ) -> <P as Provider>::Value
        + Send
        + Sync,
>;

/// A per-symbol semantic operation over fingerprint values.
///
/// Mirrors [`Constructor`] but computes the symbol's function on child
/// fingerprints (e.g. truth tables) instead of building store nodes. Used by
/// the simulation-based pruning pass; optional.
pub enum Operation<P: Provider> {
    Nullary(Op0<P>),
    Unary(Op1<P>),
    Binary(Op2<P>),
    Ternary(Op3<P>),
}

impl<P: Provider> Operation<P> {
    #[must_use]
    pub fn arity(&self) -> u32 {
        match self {
            Operation::Nullary(_) => 0,
            Operation::Unary(_) => 1,
            Operation::Binary(_) => 2,
            Operation::Ternary(_) => 3,
        }
    }
}

/// One symbol of the catalogue handed to [`Grammar::build`](crate::grammar::Grammar::build).
pub struct SymbolSpec<P: Provider> {
    pub(crate) name: String,
    pub(crate) arity: u32,
    pub(crate) cost: i32,
    pub(crate) constructor: Constructor<P>,
    pub(crate) operation: Option<Operation<P>>,
    pub(crate) attributes: Attributes,
    pub(crate) root: bool,
}

impl<P: Provider> SymbolSpec<P> {
    /// Declare a symbol. The declared `arity` must match the constructor's
    /// shape; the mismatch is reported by `Grammar::build`, not here.
    #[must_use]
    pub fn new(name: impl Into<String>, arity: u32, constructor: Constructor<P>) -> Self {
        SymbolSpec {
            name: name.into(),
            arity,
            cost: 1,
            constructor,
            operation: None,
            attributes: Attributes::empty(),
            root: false,
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn with_operation(mut self, operation: Operation<P>) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Mark the symbol as eligible for the sink slot of a skeleton.
    #[must_use]
    pub fn root(mut self) -> Self {
        self.root = true;
        self
    }
}

/// An immutable symbol of a built grammar.
pub struct Symbol<P: Provider> {
    pub(crate) name: String,
    pub(crate) arity: u32,
    pub(crate) cost: i32,
    pub(crate) constructor: Constructor<P>,
    pub(crate) operation: Option<Operation<P>>,
    pub(crate) attributes: Attributes,
    pub(crate) root: bool,
}

impl<P: Provider> Symbol<P> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn arity(&self) -> u32 {
        self.arity
    }

    #[must_use]
    pub fn cost(&self) -> i32 {
        self.cost
    }

    #[must_use]
    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.arity == 0
    }

    #[must_use]
    pub fn constructor(&self) -> &Constructor<P> {
        &self.constructor
    }

    #[must_use]
    pub fn operation(&self) -> Option<&Operation<P>> {
        self.operation.as_ref()
    }
}

impl<P: Provider> Debug for Symbol<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("cost", &self.cost)
            .field("attributes", &self.attributes)
            .field("root", &self.root)
            .finish()
    }
}
