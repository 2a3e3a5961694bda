use std::fmt::Display;

use rustc_hash::FxHashSet;

use crate::api::{Grammar, END_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
}

/// A grammar symbol tagged with its kind, assigned once by a [`SymbolTable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    name: String,
    kind: SymbolKind,
}

impl Symbol {
    pub fn terminal(name: &str) -> Self {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::Terminal,
        }
    }

    pub fn non_terminal(name: &str) -> Self {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::NonTerminal,
        }
    }

    pub fn end_marker() -> Self {
        Self::terminal(END_MARKER)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Naming convention used when the grammar does not know a name:
/// at least one letter, and all letters uppercase (`S`, `EXPR`, `S'`).
pub fn looks_like_non_terminal(name: &str) -> bool {
    let mut letters = name.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| c.is_uppercase())
}

/// Decides the kind of every symbol name seen in the producer's output.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    non_terminals: FxHashSet<String>,
    terminals: FxHashSet<String>,
}

impl SymbolTable {
    /// Non-terminals are exactly the keys of `productions`;
    /// everything else mentioned in a body is a terminal.
    pub fn from_grammar(grammar: &Grammar) -> Self {
        let non_terminals: FxHashSet<String> = grammar.productions.keys().cloned().collect();
        let terminals = grammar
            .productions
            .values()
            .flatten()
            .flat_map(|body| body.split_whitespace())
            .filter(|sym| !non_terminals.contains(*sym))
            .map(|sym| sym.to_string())
            .collect();
        SymbolTable {
            non_terminals,
            terminals,
        }
    }

    /// No grammar in context; every name goes through the naming convention.
    pub fn heuristic() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.non_terminals.is_empty() && self.terminals.is_empty()
    }

    pub fn kind_of(&self, name: &str) -> SymbolKind {
        if name == END_MARKER || self.terminals.contains(name) {
            SymbolKind::Terminal
        } else if self.non_terminals.contains(name) || looks_like_non_terminal(name) {
            // unknown names include the augmented start symbol added by the producer
            SymbolKind::NonTerminal
        } else {
            SymbolKind::Terminal
        }
    }

    pub fn classify(&self, name: &str) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind: self.kind_of(name),
        }
    }
}
