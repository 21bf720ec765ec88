#![allow(clippy::module_inception)]

mod grammar;
mod symbol;

pub use crate::grammar::grammar::Grammar;
pub use crate::grammar::symbol::{
    Attributes, Constructor, Operation, Symbol, SymbolIdx, SymbolSpec,
};
