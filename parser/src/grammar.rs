use indexmap::IndexMap;

use crate::{
    api::{Grammar, ParseRequest},
    symbols::SymbolTable,
    Result, ViewError,
};

impl Grammar {
    /// Structural well-formedness only; nothing here looks at LR(1) properties.
    pub fn check(&self) -> Result<()> {
        if !self.productions.contains_key(&self.start_symbol) {
            return Err(ViewError::MalformedGrammar(format!(
                "start symbol {:?} has no productions",
                self.start_symbol
            )));
        }
        for (lhs, bodies) in &self.productions {
            if lhs.trim().is_empty() {
                return Err(ViewError::MalformedGrammar(
                    "empty non-terminal name".to_string(),
                ));
            }
            if let Some(idx) = bodies.iter().position(|body| body.trim().is_empty()) {
                return Err(ViewError::MalformedGrammar(format!(
                    "production #{} of {:?} is empty",
                    idx, lhs
                )));
            }
        }
        Ok(())
    }

    pub fn symbols(&self) -> SymbolTable {
        SymbolTable::from_grammar(self)
    }
}

/// Parse grammar text: well-formed JSON, `productions` mapping names to lists
/// of strings, `start_symbol` a string, plus [`Grammar::check`].
pub fn validate(text: &str) -> Result<Grammar> {
    let grammar: Grammar =
        serde_json::from_str(text).map_err(|e| ViewError::MalformedGrammar(e.to_string()))?;
    grammar.check()?;
    Ok(grammar)
}

/// Canonical text form, used to re-populate the editor after a successful parse.
pub fn serialize(grammar: &Grammar) -> String {
    // string keys only; this cannot fail
    serde_json::to_string_pretty(grammar).unwrap_or_default()
}

/// The grammar the editor starts with.
pub fn default_grammar() -> Grammar {
    let mut productions = IndexMap::new();
    productions.insert("S".to_string(), vec!["A A".to_string()]);
    productions.insert("A".to_string(), vec!["a A".to_string(), "b".to_string()]);
    Grammar {
        productions,
        start_symbol: "S".to_string(),
    }
}

/// Editable grammar text plus the input string, as held by the input form.
#[derive(Debug, Clone)]
pub struct GrammarModel {
    text: String,
    grammar: Option<Grammar>,
    input: String,
    error: Option<ViewError>,
}

impl Default for GrammarModel {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarModel {
    pub fn new() -> Self {
        Self::from_grammar(default_grammar(), "a a b")
    }

    pub fn from_grammar(grammar: Grammar, input: &str) -> Self {
        GrammarModel {
            text: serialize(&grammar),
            grammar: Some(grammar),
            input: input.to_string(),
            error: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Last grammar that passed validation.
    pub fn grammar(&self) -> Option<&Grammar> {
        self.grammar.as_ref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    /// Replace the editor contents. The text is not validated until
    /// [`GrammarModel::apply_text`] or [`GrammarModel::request`].
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
    }

    /// Validate the editor contents. On success the text is replaced by its
    /// canonical form; on failure the error is kept until the next
    /// successful validation.
    pub fn apply_text(&mut self) -> Result<&Grammar> {
        match validate(&self.text) {
            Ok(grammar) => {
                self.text = serialize(&grammar);
                self.error = None;
                Ok(self.grammar.insert(grammar))
            }
            Err(e) => {
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Submission is blocked while the last validation failed.
    pub fn can_submit(&self) -> bool {
        self.error.is_none()
    }

    /// Build the request body from the current text and input.
    pub fn request(&mut self) -> Result<ParseRequest> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        let grammar = self.apply_text()?.clone();
        Ok(ParseRequest {
            grammar,
            input_string: self.input.clone(),
        })
    }
}
