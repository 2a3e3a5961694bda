use std::fmt::Display;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The designated terminal that marks the end of the input.
pub const END_MARKER: &str = "$";

/// A context-free grammar as the user edits it.
/// Each production body is a space-delimited sequence of symbols;
/// the non-terminals are exactly the keys of `productions`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Grammar {
    /// Non-terminal name to its alternatives, in the order they were written.
    pub productions: IndexMap<String, Vec<String>>,
    /// Must be one of the keys of `productions`.
    pub start_symbol: String,
}

/// Body of `POST /api/parse`.
///
/// Serializes in the nested shape:
/// `{ "grammar": { "productions": ..., "start_symbol": ... }, "input_string": ... }`.
/// Deserialization also accepts the flat shape, where `grammar` holds the
/// productions directly and `start_symbol` sits next to it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "WireRequest")]
pub struct ParseRequest {
    pub grammar: Grammar,
    /// Free text; may be empty.
    pub input_string: String,
}

/// Which of the two equivalent request layouts to put on the wire.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestShape {
    #[default]
    Nested,
    Flat,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireRequest {
    Nested {
        grammar: Grammar,
        input_string: String,
    },
    Flat {
        grammar: IndexMap<String, Vec<String>>,
        start_symbol: String,
        input_string: String,
    },
}

impl From<WireRequest> for ParseRequest {
    fn from(req: WireRequest) -> Self {
        match req {
            WireRequest::Nested {
                grammar,
                input_string,
            } => ParseRequest {
                grammar,
                input_string,
            },
            WireRequest::Flat {
                grammar,
                start_symbol,
                input_string,
            } => ParseRequest {
                grammar: Grammar {
                    productions: grammar,
                    start_symbol,
                },
                input_string,
            },
        }
    }
}

#[derive(Serialize)]
struct FlatRequestRef<'a> {
    grammar: &'a IndexMap<String, Vec<String>>,
    start_symbol: &'a str,
    input_string: &'a str,
}

impl ParseRequest {
    pub fn to_json(&self, shape: RequestShape) -> String {
        let res = match shape {
            RequestShape::Nested => serde_json::to_string(self),
            RequestShape::Flat => serde_json::to_string(&FlatRequestRef {
                grammar: &self.grammar.productions,
                start_symbol: &self.grammar.start_symbol,
                input_string: &self.input_string,
            }),
        };
        // string keys and string values only; this cannot fail
        res.unwrap_or_default()
    }
}

/// A production with a parse-progress marker and one lookahead terminal.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LR1Item {
    pub non_terminal: String,
    /// Right-hand side, symbols separated by spaces.
    pub production: String,
    /// Index of the gap the dot sits in: 0 is before the first symbol,
    /// the symbol count is after the last one.
    /// Signed, so that a bogus negative value from the producer is reported
    /// instead of failing the whole response.
    pub dot_position: i64,
    /// A terminal or the end marker.
    pub lookahead: String,
}

impl LR1Item {
    pub fn symbols(&self) -> Vec<&str> {
        self.production.split_whitespace().collect()
    }

    /// Dot at the end; the item calls for a reduction.
    pub fn is_reducible(&self) -> bool {
        self.dot_position == self.symbols().len() as i64
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LR1State {
    pub state: usize,
    /// Kept in the order received, so that the display is stable.
    pub items: Vec<LR1Item>,
}

/// The kind of a table entry or of a recorded parser step.
///
/// Accepts both the long names and the short codes.
/// Unknown codes are kept verbatim and displayed as received.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    Shift,
    Reduce,
    Goto,
    Accept,
    Other(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Shift => "shift",
            ActionKind::Reduce => "reduce",
            ActionKind::Goto => "goto",
            ActionKind::Accept => "accept",
            ActionKind::Other(code) => code,
        }
    }
}

impl From<String> for ActionKind {
    fn from(code: String) -> Self {
        match code.as_str() {
            "shift" | "s" => ActionKind::Shift,
            "reduce" | "r" => ActionKind::Reduce,
            "goto" | "g" => ActionKind::Goto,
            "accept" | "acc" | "a" => ActionKind::Accept,
            _ => ActionKind::Other(code),
        }
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"<action> <value>"`; the value is left out for `accept` and when empty.
pub fn action_text(action: &ActionKind, value: &str) -> String {
    if *action == ActionKind::Accept || value.is_empty() {
        action.to_string()
    } else {
        format!("{} {}", action, value)
    }
}

/// The producer sends strings, but numbers and null are tolerated.
fn value_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ParsingTableEntry {
    pub action: ActionKind,
    /// Target state for shift/goto, production index for reduce,
    /// empty for accept.
    #[serde(default, deserialize_with = "value_as_string")]
    pub value: String,
}

impl Display for ParsingTableEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&action_text(&self.action, &self.value))
    }
}

/// One recorded parser configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ParsingStep {
    /// Bottom first. The symbol of the bottom entry may be empty.
    pub stack: Vec<(usize, String)>,
    /// Remaining input, end marker included.
    pub input: Vec<String>,
    pub action: ActionKind,
    #[serde(default, deserialize_with = "value_as_string")]
    pub value: String,
}

/// Successful answer of the producer. Never mutated after receipt.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ParserResponse {
    pub lr1_sets: Vec<LR1State>,
    /// Keys are `"<state>_<symbol>"`; order is kept as received.
    pub parsing_table: IndexMap<String, ParsingTableEntry>,
    pub parsing_steps: Vec<ParsingStep>,
}

/// Body of a failed request.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ErrorReply {
    pub detail: Option<String>,
    /// Some producers use `error` instead of `detail`.
    pub error: Option<String>,
}

impl ErrorReply {
    pub fn message(self) -> Option<String> {
        self.detail.or(self.error)
    }
}
