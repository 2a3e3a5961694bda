use std::sync::Arc;

use crate::api::{action_text, ParsingStep};

/// `"<state><symbol> "` for each pair, bottom first: `[[0,""],[4,"a"]]` is `"0 4a "`.
pub fn render_stack(stack: &[(usize, String)]) -> String {
    stack
        .iter()
        .map(|(state, symbol)| format!("{}{} ", state, symbol))
        .collect()
}

pub fn render_input(input: &[String]) -> String {
    input.join(" ")
}

/// One step, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub index: usize,
    pub stack_text: String,
    pub input_text: String,
    pub action_line: String,
}

impl StepView {
    pub fn new(index: usize, step: &ParsingStep) -> Self {
        StepView {
            index,
            stack_text: render_stack(&step.stack),
            input_text: render_input(&step.input),
            action_line: action_text(&step.action, &step.value),
        }
    }

    pub fn to_text(&self) -> String {
        format!(
            "Step {}\n  Stack:  {}\n  Input:  {}\n  Action: {}\n",
            self.index + 1,
            self.stack_text.trim_end(),
            self.input_text,
            self.action_line
        )
    }
}

/// Read-only, randomly indexable view of a recorded parse.
///
/// The trace is fully materialized and shared; the only state is the
/// selected step. Nothing here checks that consecutive steps agree.
#[derive(Debug, Clone)]
pub struct Replay {
    steps: Arc<[ParsingStep]>,
    cursor: Option<usize>,
}

impl Default for Replay {
    fn default() -> Self {
        Self::new(Arc::from(Vec::new()))
    }
}

impl Replay {
    pub fn new(steps: Arc<[ParsingStep]>) -> Self {
        let cursor = if steps.is_empty() { None } else { Some(0) };
        Replay { steps, cursor }
    }

    pub fn from_steps(steps: &[ParsingStep]) -> Self {
        Self::new(steps.into())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The shared trace; replays of the same result point at the same steps.
    pub fn steps(&self) -> &[ParsingStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<StepView> {
        self.steps.get(index).map(|s| StepView::new(index, s))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<StepView> {
        self.cursor.and_then(|idx| self.step(idx))
    }

    /// Out-of-range requests land on the nearest step.
    pub fn select(&mut self, index: usize) -> Option<usize> {
        if !self.steps.is_empty() {
            self.cursor = Some(index.min(self.steps.len() - 1));
        }
        self.cursor
    }

    pub fn forward(&mut self) -> Option<usize> {
        match self.cursor {
            Some(idx) => self.select(idx.saturating_add(1)),
            None => None,
        }
    }

    pub fn back(&mut self) -> Option<usize> {
        match self.cursor {
            Some(idx) => self.select(idx.saturating_sub(1)),
            None => None,
        }
    }

    pub fn rewind(&mut self) -> Option<usize> {
        self.select(0)
    }

    pub fn last(&mut self) -> Option<usize> {
        self.select(usize::MAX)
    }

    pub fn iter(&self) -> impl Iterator<Item = StepView> + '_ {
        self.steps
            .iter()
            .enumerate()
            .map(|(idx, s)| StepView::new(idx, s))
    }

    pub fn to_text(&self) -> String {
        self.iter().map(|s| s.to_text()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ActionKind;

    fn step(stack: &[(usize, &str)], input: &str, action: ActionKind, value: &str) -> ParsingStep {
        ParsingStep {
            stack: stack.iter().map(|(s, y)| (*s, y.to_string())).collect(),
            input: input.split_whitespace().map(|s| s.to_string()).collect(),
            action,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_step_view() {
        let view = StepView::new(
            0,
            &step(&[(0, ""), (4, "a")], "a b $", ActionKind::Shift, "7"),
        );
        assert_eq!(view.stack_text, "0 4a ");
        assert_eq!(view.input_text, "a b $");
        assert_eq!(view.action_line, "shift 7");

        let view = StepView::new(5, &step(&[(0, ""), (1, "S")], "$", ActionKind::Accept, ""));
        assert_eq!(view.action_line, "accept");
        assert_eq!(
            view.to_text(),
            "Step 6\n  Stack:  0 1S\n  Input:  $\n  Action: accept\n"
        );
    }

    #[test]
    fn test_navigation_clamps() {
        let mut replay = Replay::from_steps(&[
            step(&[(0, "")], "b $", ActionKind::Shift, "4"),
            step(&[(0, ""), (4, "b")], "$", ActionKind::Reduce, "3"),
            step(&[(0, ""), (1, "S")], "$", ActionKind::Accept, ""),
        ]);
        assert_eq!(replay.cursor(), Some(0));
        assert_eq!(replay.back(), Some(0));
        assert_eq!(replay.forward(), Some(1));
        assert_eq!(replay.select(10), Some(2));
        assert_eq!(replay.forward(), Some(2));
        assert_eq!(replay.current().unwrap().action_line, "accept");
        assert_eq!(replay.rewind(), Some(0));
        assert_eq!(replay.last(), Some(2));

        // re-reading does not move anything
        let first: Vec<_> = replay.iter().collect();
        let second: Vec<_> = replay.iter().collect();
        assert_eq!(first, second);
        assert_eq!(replay.cursor(), Some(2));
        assert!(replay.step(3).is_none());
    }

    #[test]
    fn test_empty_trace() {
        let mut replay = Replay::default();
        assert!(replay.is_empty());
        assert_eq!(replay.cursor(), None);
        assert_eq!(replay.select(3), None);
        assert_eq!(replay.forward(), None);
        assert!(replay.current().is_none());
        assert_eq!(replay.to_text(), "");
    }
}
