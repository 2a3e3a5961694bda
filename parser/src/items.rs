use crate::{
    api::{LR1Item, LR1State},
    ViewError,
};

pub const DOT: char = '•';
pub const ARROW: &str = "→";

/// Put the dot in gap `dot` of `symbols`: `•A A`, `a•A`, `A A•`.
/// The dot takes the place of the separating space.
pub fn dotted_body(symbols: &[&str], dot: usize) -> String {
    let mut out = String::new();
    for (idx, symbol) in symbols.iter().enumerate() {
        if idx == dot {
            out.push(DOT);
        } else if idx > 0 {
            out.push(' ');
        }
        out.push_str(symbol);
    }
    if dot >= symbols.len() {
        out.push(DOT);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub text: String,
    /// Set when the dot position had to be clamped.
    pub issue: Option<ViewError>,
    /// Dot at the end of a well-formed item.
    pub reducible: bool,
}

/// `"<non_terminal> → <dotted body>, <lookahead>"`.
pub fn render_item(item: &LR1Item) -> RenderedItem {
    let symbols = item.symbols();
    let len = symbols.len();
    let (dot, issue) = if item.dot_position < 0 || item.dot_position > len as i64 {
        let clamped = item.dot_position.clamp(0, len as i64) as usize;
        let issue = ViewError::InvalidDotPosition {
            item: format!("{} {} {}", item.non_terminal, ARROW, item.production),
            dot_position: item.dot_position,
            len,
        };
        (clamped, Some(issue))
    } else {
        (item.dot_position as usize, None)
    };

    RenderedItem {
        text: format!(
            "{} {} {}, {}",
            item.non_terminal,
            ARROW,
            dotted_body(&symbols, dot),
            item.lookahead
        ),
        reducible: issue.is_none() && item.is_reducible(),
        issue,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedState {
    pub state: usize,
    pub items: Vec<RenderedItem>,
}

impl RenderedState {
    pub fn issues(&self) -> impl Iterator<Item = &ViewError> {
        self.items.iter().filter_map(|item| item.issue.as_ref())
    }

    pub fn to_text(&self) -> String {
        let mut out = format!("State {}:\n", self.state);
        for item in &self.items {
            out.push_str("  ");
            out.push_str(&item.text);
            if item.issue.is_some() {
                out.push_str("  (!)");
            }
            out.push('\n');
        }
        out
    }
}

pub fn render_state(state: &LR1State) -> RenderedState {
    RenderedState {
        state: state.state,
        items: state.items.iter().map(render_item).collect(),
    }
}

pub fn render_sets(sets: &[LR1State]) -> Vec<RenderedState> {
    sets.iter().map(render_state).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(nt: &str, production: &str, dot_position: i64, lookahead: &str) -> LR1Item {
        LR1Item {
            non_terminal: nt.to_string(),
            production: production.to_string(),
            dot_position,
            lookahead: lookahead.to_string(),
        }
    }

    #[test]
    fn test_dot_positions() {
        assert_eq!(render_item(&item("A", "a A", 1, "$")).text, "A → a•A, $");
        assert_eq!(render_item(&item("S", "A A", 0, "$")).text, "S → •A A, $");
        assert_eq!(render_item(&item("S", "A A", 2, "$")).text, "S → A A•, $");
        assert_eq!(render_item(&item("A", "b", 1, "a")).text, "A → b•, a");
        assert!(render_item(&item("A", "b", 1, "a")).reducible);
        assert!(!render_item(&item("A", "a A", 1, "$")).reducible);
        assert_eq!(render_item(&item("E", "", 0, "$")).text, "E → •, $");
        // irregular spacing in the production is normalized
        assert_eq!(render_item(&item("S", " A   A ", 1, "$")).text, "S → A•A, $");
    }

    #[test]
    fn test_one_dot_per_item() {
        let syms = ["x", "y", "z"];
        for dot in 0..=syms.len() {
            let body = dotted_body(&syms, dot);
            assert_eq!(body.matches(DOT).count(), 1);
        }
        assert!(dotted_body(&syms, 0).starts_with(DOT));
        assert!(dotted_body(&syms, 3).ends_with(DOT));
    }

    #[test]
    fn test_bad_dot_is_clamped_and_flagged() {
        let r = render_item(&item("A", "a A", 5, "$"));
        assert_eq!(r.text, "A → a A•, $");
        assert!(!r.reducible);
        assert_eq!(
            r.issue,
            Some(ViewError::InvalidDotPosition {
                item: "A → a A".to_string(),
                dot_position: 5,
                len: 2,
            })
        );

        let r = render_item(&item("A", "a A", -1, "$"));
        assert_eq!(r.text, "A → •a A, $");
        assert!(r.issue.is_some());

        let state = render_state(&LR1State {
            state: 3,
            items: vec![item("A", "a A", 5, "$"), item("A", "b", 0, "$")],
        });
        assert_eq!(state.issues().count(), 1);
        assert_eq!(state.to_text(), "State 3:\n  A → a A•, $  (!)\n  A → •b, $\n");
    }
}
