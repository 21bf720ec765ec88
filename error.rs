use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnumerationError>;

/// A structural problem detected while building a [`Grammar`](crate::grammar::Grammar).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarDefect {
    #[error("the grammar has no symbols")]
    Empty,

    #[error("the grammar has no terminal (arity-0) symbol to ground the recursion")]
    NoTerminal,

    #[error("symbol {index} declares arity {declared} but its constructor takes {actual} children")]
    ArityMismatch {
        index: u32,
        declared: u32,
        actual: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumerationError {
    /// Fatal: the symbol catalogue is malformed. Raised at grammar-build time.
    #[error("invalid grammar: {0}")]
    InvalidGrammar(#[from] GrammarDefect),

    /// Recoverable per skeleton: some slot admits no symbol of the grammar.
    /// The engine skips the skeleton and continues with the next one.
    #[error("unsupported topology: slot {slot} admits no symbol of the grammar")]
    UnsupportedTopology { slot: usize },

    /// Fatal: a symbol's arity fell outside the closed set {0, 1, 2, 3}
    /// supported by the materializer. Indicates a grammar/engine mismatch,
    /// not bad input data.
    #[error("unsupported arity {arity} for symbol {symbol} during materialization")]
    UnsupportedArity { symbol: u32, arity: u32 },
}

#[cfg(test)]
mod test {
    use super::{EnumerationError, GrammarDefect};

    #[test]
    fn grammar_defect_converts_to_enumeration_error() {
        let err: EnumerationError = GrammarDefect::NoTerminal.into();
        assert_eq!(
            err,
            EnumerationError::InvalidGrammar(GrammarDefect::NoTerminal)
        );
    }

    #[test]
    fn errors_render_their_context() {
        let err = EnumerationError::UnsupportedTopology { slot: 3 };
        assert!(err.to_string().contains("slot 3"));
    }
}
