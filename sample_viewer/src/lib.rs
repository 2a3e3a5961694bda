use std::{cell::RefCell, collections::VecDeque, time::Duration};

use lr1view::{
    api::{Grammar, ParserResponse},
    grammar::default_grammar,
    items::RenderedState,
    replay::Replay,
    table::ClassifiedTable,
    url::Url,
    ParseBackend, ProducerReply,
};
use serde_json::{json, Value};

/// Grammar used by most tests: `S → A A`, `A → a A | b`.
pub fn sample_grammar() -> Grammar {
    default_grammar()
}

fn items(list: &[(&str, &str, i64, &str)]) -> Value {
    Value::Array(
        list.iter()
            .map(|(nt, prod, dot, la)| {
                json!({
                    "non_terminal": nt,
                    "production": prod,
                    "dot_position": dot,
                    "lookahead": la,
                })
            })
            .collect(),
    )
}

/// Canonical LR(1) collection, table and trace of `a b b` for [`sample_grammar`],
/// as the producer sends it. Productions are numbered 1: `S → A A`,
/// 2: `A → a A`, 3: `A → b`.
pub fn sample_response_json() -> Value {
    json!({
        "lr1_sets": [
            { "state": 0, "items": items(&[
                ("S'", "S", 0, "$"),
                ("S", "A A", 0, "$"),
                ("A", "a A", 0, "a"),
                ("A", "a A", 0, "b"),
                ("A", "b", 0, "a"),
                ("A", "b", 0, "b"),
            ]) },
            { "state": 1, "items": items(&[("S'", "S", 1, "$")]) },
            { "state": 2, "items": items(&[
                ("S", "A A", 1, "$"),
                ("A", "a A", 0, "$"),
                ("A", "b", 0, "$"),
            ]) },
            { "state": 3, "items": items(&[
                ("A", "a A", 1, "a"),
                ("A", "a A", 1, "b"),
                ("A", "a A", 0, "a"),
                ("A", "a A", 0, "b"),
                ("A", "b", 0, "a"),
                ("A", "b", 0, "b"),
            ]) },
            { "state": 4, "items": items(&[("A", "b", 1, "a"), ("A", "b", 1, "b")]) },
            { "state": 5, "items": items(&[("S", "A A", 2, "$")]) },
            { "state": 6, "items": items(&[
                ("A", "a A", 1, "$"),
                ("A", "a A", 0, "$"),
                ("A", "b", 0, "$"),
            ]) },
            { "state": 7, "items": items(&[("A", "b", 1, "$")]) },
            { "state": 8, "items": items(&[("A", "a A", 2, "a"), ("A", "a A", 2, "b")]) },
            { "state": 9, "items": items(&[("A", "a A", 2, "$")]) },
        ],
        "parsing_table": {
            "0_a": { "action": "shift", "value": "3" },
            "0_b": { "action": "shift", "value": "4" },
            "0_S": { "action": "goto", "value": "1" },
            "0_A": { "action": "goto", "value": "2" },
            "1_$": { "action": "accept", "value": "" },
            "2_a": { "action": "shift", "value": "6" },
            "2_b": { "action": "shift", "value": "7" },
            "2_A": { "action": "goto", "value": "5" },
            "3_a": { "action": "shift", "value": "3" },
            "3_b": { "action": "shift", "value": "4" },
            "3_A": { "action": "goto", "value": "8" },
            "4_a": { "action": "reduce", "value": "3" },
            "4_b": { "action": "reduce", "value": "3" },
            "5_$": { "action": "reduce", "value": "1" },
            "6_a": { "action": "shift", "value": "6" },
            "6_b": { "action": "shift", "value": "7" },
            "6_A": { "action": "goto", "value": "9" },
            "7_$": { "action": "reduce", "value": "3" },
            "8_a": { "action": "reduce", "value": "2" },
            "8_b": { "action": "reduce", "value": "2" },
            "9_$": { "action": "reduce", "value": "2" },
        },
        "parsing_steps": [
            { "stack": [[0, ""]], "input": ["a", "b", "b", "$"], "action": "shift", "value": "3" },
            { "stack": [[0, ""], [3, "a"]], "input": ["b", "b", "$"], "action": "shift", "value": "4" },
            { "stack": [[0, ""], [3, "a"], [4, "b"]], "input": ["b", "$"], "action": "reduce", "value": "3" },
            { "stack": [[0, ""], [3, "a"], [8, "A"]], "input": ["b", "$"], "action": "reduce", "value": "2" },
            { "stack": [[0, ""], [2, "A"]], "input": ["b", "$"], "action": "shift", "value": "7" },
            { "stack": [[0, ""], [2, "A"], [7, "b"]], "input": ["$"], "action": "reduce", "value": "3" },
            { "stack": [[0, ""], [2, "A"], [5, "A"]], "input": ["$"], "action": "reduce", "value": "1" },
            { "stack": [[0, ""], [1, "S"]], "input": ["$"], "action": "accept", "value": "" },
        ],
    })
}

pub fn sample_response() -> ParserResponse {
    serde_json::from_value(sample_response_json()).unwrap()
}

pub fn ok_reply(response: &Value) -> ProducerReply {
    ProducerReply {
        status: 200,
        body: response.to_string(),
    }
}

pub fn error_reply(status: u16, detail: &str) -> ProducerReply {
    ProducerReply {
        status,
        body: json!({ "detail": detail }).to_string(),
    }
}

/// Answers requests from a queue and remembers what was sent.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: RefCell<VecDeque<std::result::Result<ProducerReply, String>>>,
    sent: RefCell<Vec<Value>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<std::result::Result<ProducerReply, String>>) -> Self {
        ScriptedBackend {
            replies: RefCell::new(replies.into()),
            sent: RefCell::new(vec![]),
        }
    }

    pub fn sent(&self) -> Vec<Value> {
        self.sent.borrow().clone()
    }
}

impl ParseBackend for ScriptedBackend {
    fn post(
        &self,
        _url: &Url,
        body: &str,
        _timeout: Duration,
    ) -> std::result::Result<ProducerReply, String> {
        self.sent.borrow_mut().push(serde_json::from_str(body).unwrap());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()))
    }
}

/// Check every row of the table; each expected row is
/// `"<state> | <cell> | <cell> ..."`, ACTION columns then GOTO columns.
pub fn check_table_rows(table: &ClassifiedTable, expected: &[&str]) {
    let rows: Vec<String> = table
        .states()
        .iter()
        .map(|s| {
            let mut cells = vec![s.to_string()];
            cells.extend(table.row(*s));
            cells.join(" | ")
        })
        .collect();
    assert_eq!(rows.len(), expected.len(), "row count; got {:#?}", rows);
    for (idx, (got, exp)) in rows.iter().zip(expected).enumerate() {
        assert_eq!(got, exp, "row {}", idx);
    }
}

pub fn check_items(state: &RenderedState, expected: &[&str]) {
    let got: Vec<&str> = state.items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(got, expected, "state {}", state.state);
}

/// Each expected step is `(stack, input, action)`.
pub fn check_trace(replay: &Replay, expected: &[(&str, &str, &str)]) {
    assert_eq!(replay.len(), expected.len());
    for (view, (stack, input, action)) in replay.iter().zip(expected) {
        assert_eq!(view.stack_text, *stack, "stack at step {}", view.index);
        assert_eq!(view.input_text, *input, "input at step {}", view.index);
        assert_eq!(view.action_line, *action, "action at step {}", view.index);
    }
}
