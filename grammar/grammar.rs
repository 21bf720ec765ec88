use crate::{
    error::{GrammarDefect, Result},
    grammar::symbol::{Attributes, Symbol, SymbolIdx, SymbolSpec},
    provider::Provider,
};

/// An immutable, ordered catalogue of symbols.
///
/// Built once, then shared by reference with every engine that sweeps it.
/// Construction partitions the symbols by arity so that per-slot candidate
/// lookups are O(1) afterwards.
pub struct Grammar<P: Provider> {
    symbols: Vec<Symbol<P>>,
    by_arity: Vec<Vec<SymbolIdx>>,
    terminals: Vec<SymbolIdx>,
    roots: Vec<SymbolIdx>,
    max_arity: u32,
}

impl<P: Provider> Grammar<P> {
    /// Validate and index a symbol catalogue.
    ///
    /// Fails with [`InvalidGrammar`](crate::EnumerationError::InvalidGrammar)
    /// if the catalogue is empty, if no terminal (arity-0) symbol exists, or
    /// if a symbol's declared arity does not match its constructor's shape.
    pub fn build(specs: Vec<SymbolSpec<P>>) -> Result<Self> {
        if specs.is_empty() {
            return Err(GrammarDefect::Empty.into());
        }

        let mut symbols = Vec::with_capacity(specs.len());
        let mut max_arity = 0;
        for (index, spec) in specs.into_iter().enumerate() {
            let actual = spec.constructor.arity();
            if spec.arity != actual {
                return Err(GrammarDefect::ArityMismatch {
                    index: index as u32,
                    declared: spec.arity,
                    actual,
                }
                .into());
            }
            if let Some(operation) = &spec.operation {
                if operation.arity() != spec.arity {
                    return Err(GrammarDefect::ArityMismatch {
                        index: index as u32,
                        declared: spec.arity,
                        actual: operation.arity(),
                    }
                    .into());
                }
            }
            max_arity = max_arity.max(spec.arity);
            symbols.push(Symbol {
                name: spec.name,
                arity: spec.arity,
                cost: spec.cost,
                constructor: spec.constructor,
                operation: spec.operation,
                attributes: spec.attributes,
                root: spec.root,
            });
        }

        let mut by_arity = vec![Vec::new(); max_arity as usize + 1];
        let mut terminals = Vec::new();
        let mut roots = Vec::new();
        for (index, symbol) in symbols.iter().enumerate() {
            let idx = SymbolIdx(index as u32);
            by_arity[symbol.arity as usize].push(idx);
            if symbol.is_terminal() {
                terminals.push(idx);
            }
            if symbol.root {
                roots.push(idx);
            }
        }

        if terminals.is_empty() {
            return Err(GrammarDefect::NoTerminal.into());
        }

        // Root policy: no symbol marked root means every symbol is
        // root-eligible. Callers restricting the sink must mark at least one.
        if roots.is_empty() {
            roots = (0..symbols.len()).map(|i| SymbolIdx(i as u32)).collect();
        }

        Ok(Grammar {
            symbols,
            by_arity,
            terminals,
            roots,
            max_arity,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[must_use]
    pub fn symbol(&self, idx: SymbolIdx) -> &Symbol<P> {
        &self.symbols[idx.as_usize()]
    }

    #[must_use]
    pub fn symbols(&self) -> &[Symbol<P>] {
        &self.symbols
    }

    /// Indices of symbols whose arity is exactly `arity`.
    #[must_use]
    pub fn symbols_with_arity(&self, arity: u32) -> &[SymbolIdx] {
        self.by_arity
            .get(arity as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Symbols eligible for the sink slot; all symbols when none was marked.
    #[must_use]
    pub fn root_candidates(&self) -> &[SymbolIdx] {
        &self.roots
    }

    #[must_use]
    pub fn terminals(&self) -> &[SymbolIdx] {
        &self.terminals
    }

    #[must_use]
    pub fn attributes_of(&self, idx: SymbolIdx) -> Attributes {
        self.symbol(idx).attributes
    }

    #[must_use]
    pub fn max_arity(&self) -> u32 {
        self.max_arity
    }
}
