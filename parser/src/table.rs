use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;

use crate::{
    api::ParsingTableEntry,
    symbols::{Symbol, SymbolTable},
    Result, ViewError,
};

pub type StateId = usize;

/// Shown for a state/symbol pair without an entry.
pub const NO_ACTION: &str = "-";

/// Split a `"<state>_<symbol>"` key at the first underscore.
/// The state never contains `_`, so symbols that do still come out whole.
pub fn split_table_key(key: &str) -> Result<(StateId, &str)> {
    let (state, symbol) = key
        .split_once('_')
        .ok_or_else(|| ViewError::malformed_key(key, "missing '_' separator"))?;
    let state = state
        .parse::<StateId>()
        .map_err(|_| ViewError::malformed_key(key, "state is not a non-negative integer"))?;
    if symbol.is_empty() {
        return Err(ViewError::malformed_key(key, "empty symbol"));
    }
    Ok((state, symbol))
}

/// The ACTION/GOTO matrix rebuilt from the flat wire table.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTable {
    states: Vec<StateId>,
    terminals: Vec<Symbol>,
    non_terminals: Vec<Symbol>,
    cells: FxHashMap<(StateId, Symbol), ParsingTableEntry>,
    diagnostics: Vec<ViewError>,
}

/// Classify every key of the wire table. Bad keys are skipped and reported
/// in [`ClassifiedTable::diagnostics`]; one bad cell never drops the table.
pub fn decode_table(
    raw: &IndexMap<String, ParsingTableEntry>,
    symbols: &SymbolTable,
) -> ClassifiedTable {
    let mut states = BTreeSet::new();
    let mut terminals = IndexSet::new();
    let mut non_terminals = IndexSet::new();
    let mut cells = FxHashMap::default();
    let mut diagnostics = vec![];

    for (key, entry) in raw {
        let (state, name) = match split_table_key(key) {
            Ok(r) => r,
            Err(e) => {
                diagnostics.push(e);
                continue;
            }
        };
        let symbol = symbols.classify(name);
        let cell = (state, symbol);
        if cells.contains_key(&cell) {
            // "0_a" and "00_a"
            diagnostics.push(ViewError::malformed_key(key, "duplicates an earlier cell"));
            continue;
        }
        states.insert(state);
        if cell.1.is_terminal() {
            terminals.insert(cell.1.clone());
        } else {
            non_terminals.insert(cell.1.clone());
        }
        cells.insert(cell, entry.clone());
    }

    terminals.insert(Symbol::end_marker());

    ClassifiedTable {
        states: states.into_iter().collect(),
        terminals: terminals.into_iter().collect(),
        non_terminals: non_terminals.into_iter().collect(),
        cells,
        diagnostics,
    }
}

impl ClassifiedTable {
    /// Ascending.
    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    /// First-observed order; the end marker is always present exactly once.
    pub fn terminals(&self) -> &[Symbol] {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &[Symbol] {
        &self.non_terminals
    }

    pub fn diagnostics(&self) -> &[ViewError] {
        &self.diagnostics
    }

    pub fn num_entries(&self) -> usize {
        self.cells.len()
    }

    pub fn lookup(&self, state: StateId, symbol: &Symbol) -> Option<&ParsingTableEntry> {
        self.cells.get(&(state, symbol.clone()))
    }

    /// Like [`ClassifiedTable::lookup`], resolving the name against the
    /// table's own alphabet.
    pub fn lookup_name(&self, state: StateId, name: &str) -> Option<&ParsingTableEntry> {
        self.symbol(name).and_then(|sym| self.lookup(state, sym))
    }

    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.terminals
            .iter()
            .chain(self.non_terminals.iter())
            .find(|sym| sym.name() == name)
    }

    pub fn cell_text(&self, state: StateId, symbol: &Symbol) -> String {
        match self.lookup(state, symbol) {
            Some(entry) => entry.to_string(),
            None => NO_ACTION.to_string(),
        }
    }

    /// All cells of one row, ACTION columns then GOTO columns.
    pub fn row(&self, state: StateId) -> Vec<String> {
        self.columns()
            .map(|sym| self.cell_text(state, sym))
            .collect()
    }

    fn columns(&self) -> impl Iterator<Item = &Symbol> {
        self.terminals.iter().chain(self.non_terminals.iter())
    }

    /// Plain-text grid:
    ///
    /// ```text
    /// State | ACTION                  | GOTO
    ///       | a        b        $      | S       A
    /// 0     | shift 3  shift 4  -      | goto 1  goto 2
    /// ```
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.columns().map(|sym| sym.name().chars().count()).collect();
        let rows: Vec<(String, Vec<String>)> = self
            .states
            .iter()
            .map(|state| (state.to_string(), self.row(*state)))
            .collect();
        for (_, cells) in &rows {
            for (w, cell) in widths.iter_mut().zip(cells) {
                *w = (*w).max(cell.chars().count());
            }
        }
        let state_w = rows
            .iter()
            .map(|(s, _)| s.len())
            .max()
            .unwrap_or(0)
            .max("State".len());

        let n_term = self.terminals.len();
        let group_width = |ws: &[usize]| ws.iter().sum::<usize>() + 2 * ws.len().saturating_sub(1);
        let join = |cells: &[String], ws: &[usize]| {
            cells
                .iter()
                .zip(ws)
                .map(|(c, w)| format!("{:<w$}", c, w = *w))
                .collect::<Vec<_>>()
                .join("  ")
        };

        let mut lines = vec![];
        lines.push(format!(
            "{:<sw$} | {:<aw$} | GOTO",
            "State",
            "ACTION",
            sw = state_w,
            aw = group_width(&widths[..n_term])
        ));
        let headers: Vec<String> = self.columns().map(|sym| sym.name().to_string()).collect();
        lines.push(format!(
            "{:<sw$} | {} | {}",
            "",
            join(&headers[..n_term], &widths[..n_term]),
            join(&headers[n_term..], &widths[n_term..]),
            sw = state_w
        ));
        for (state, cells) in &rows {
            lines.push(format!(
                "{:<sw$} | {} | {}",
                state,
                join(&cells[..n_term], &widths[..n_term]),
                join(&cells[n_term..], &widths[n_term..]),
                sw = state_w
            ));
        }

        let mut out = String::new();
        for line in lines {
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}
